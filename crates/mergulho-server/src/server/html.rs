//! HTML pages.

use std::fmt::Write;

use chrono::DateTime;
use serde_json::Value;

use mergulho_core::{Document, Fields};

/// Escape text for HTML element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Path of a sighting's page.
pub fn sighting_path(registro: &str) -> String {
    format!("/avistamentos/{}", urlencoding::encode(registro))
}

/// Render a stored value as plain text. Null renders empty.
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Render an epoch-seconds `date` as `dd/mm/YYYY HH:MM` (UTC).
///
/// Missing, null and zero render empty; a value that is not a valid
/// timestamp renders as is.
pub fn format_date(value: Option<&Value>) -> String {
    let seconds = match value {
        None | Some(Value::Null) => return String::new(),
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(_) => None,
    };

    match seconds {
        Some(0) => String::new(),
        Some(secs) => match DateTime::from_timestamp(secs, 0) {
            Some(dt) => dt.format("%d/%m/%Y %H:%M").to_string(),
            None => display_value(value),
        },
        None => display_value(value),
    }
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
<meta charset="utf-8">
<title>{title} - Mergulho Virtual</title>
<style>
body {{ font-family: sans-serif; margin: 2rem; color: #123; }}
table {{ border-collapse: collapse; width: 100%; }}
th, td {{ border: 1px solid #9ab; padding: 0.3rem 0.6rem; text-align: left; }}
th {{ background: #def; }}
nav.pager {{ margin: 1rem 0; display: flex; gap: 1rem; }}
form.filters {{ margin-bottom: 1rem; }}
</style>
</head>
<body>
<h1>{title}</h1>
{body}
</body>
</html>
"#,
        title = escape(title),
        body = body,
    )
}

fn pager(page: u64, prev_url: Option<&str>, next_url: Option<&str>) -> String {
    let mut nav = String::from(r#"<nav class="pager">"#);
    if let Some(url) = prev_url {
        let _ = write!(nav, r#"<a href="{}">&laquo; Anterior</a>"#, escape(url));
    }
    let _ = write!(nav, "<span>Página {}</span>", page);
    if let Some(url) = next_url {
        let _ = write!(nav, r#"<a href="{}">Próxima &raquo;</a>"#, escape(url));
    }
    nav.push_str("</nav>");
    nav
}

fn input(name: &str, label: &str, value: Option<&str>, kind: &str) -> String {
    format!(
        r#"<label>{label} <input type="{kind}" name="{name}" value="{value}"></label> "#,
        label = escape(label),
        kind = kind,
        name = escape(name),
        value = escape(value.unwrap_or("")),
    )
}

/// Navigation state of a listing page.
#[derive(Debug)]
pub struct Listing<'a> {
    pub items: &'a [Document],
    pub page: u64,
    pub page_size: u64,
    pub prev_url: Option<String>,
    pub next_url: Option<String>,
}

/// Columns shown in the sightings table.
const SIGHTING_COLUMNS: [(&str, &str); 6] = [
    ("registro", "Registro"),
    ("nome_popular", "Nome popular"),
    ("nome_cientifico", "Nome científico"),
    ("local", "Local"),
    ("quantidade", "Quantidade"),
    ("observador", "Observador"),
];

/// Sightings listing with its filter form.
pub fn sightings_list(
    listing: &Listing<'_>,
    day: Option<i64>,
    month: Option<i64>,
    year: Option<i64>,
) -> String {
    let mut body = String::new();

    let text = |v: Option<i64>| v.map(|n| n.to_string());
    let _ = write!(
        body,
        r#"<form class="filters" method="get" action="/avistamentos">{}{}{}<input type="hidden" name="page_size" value="{}"><button type="submit">Filtrar</button></form>"#,
        input("dia_registro", "Dia", text(day).as_deref(), "number"),
        input("mes_registro", "Mês", text(month).as_deref(), "number"),
        input("ano_registro", "Ano", text(year).as_deref(), "number"),
        listing.page_size,
    );

    body.push_str("<table><thead><tr>");
    for (_, heading) in SIGHTING_COLUMNS {
        let _ = write!(body, "<th>{}</th>", escape(heading));
    }
    body.push_str("<th>Data</th></tr></thead><tbody>");

    for doc in listing.items {
        body.push_str("<tr>");
        for (field, _) in SIGHTING_COLUMNS {
            let value = display_value(doc.get(field));
            if field == "registro" {
                let _ = write!(
                    body,
                    r#"<td><a href="{}">{}</a></td>"#,
                    escape(&sighting_path(&value)),
                    escape(&value)
                );
            } else {
                let _ = write!(body, "<td>{}</td>", escape(&value));
            }
        }
        let _ = write!(
            body,
            "<td>{}/{}/{}</td></tr>",
            escape(&display_value(doc.get("dia_registro"))),
            escape(&display_value(doc.get("mes_registro"))),
            escape(&display_value(doc.get("ano_registro"))),
        );
    }
    if listing.items.is_empty() {
        let _ = write!(
            body,
            r#"<tr><td colspan="{}">Nenhum avistamento encontrado.</td></tr>"#,
            SIGHTING_COLUMNS.len() + 1
        );
    }
    body.push_str("</tbody></table>");
    body.push_str(&pager(
        listing.page,
        listing.prev_url.as_deref(),
        listing.next_url.as_deref(),
    ));

    layout("Avistamentos", &body)
}

fn fields_table(fields: &Fields) -> String {
    let mut table = String::from("<table><tbody>");
    for (name, value) in fields {
        let _ = write!(
            table,
            "<tr><th>{}</th><td>{}</td></tr>",
            escape(name),
            escape(&display_value(Some(value)))
        );
    }
    table.push_str("</tbody></table>");
    table
}

/// A single sighting.
pub fn sighting_view(registro: &str, fields: &Fields, image_url: Option<&str>) -> String {
    let path = sighting_path(registro);
    let mut body = String::new();

    if let Some(url) = image_url {
        let _ = write!(
            body,
            r#"<p><img src="{}" alt="Avistamento {}" style="max-width: 40rem"></p>"#,
            escape(url),
            escape(registro)
        );
    }
    body.push_str(&fields_table(fields));
    let _ = write!(
        body,
        r#"<p><a href="{edit}">Editar</a> <a href="/avistamentos">Voltar à lista</a></p>
<form method="post" action="{delete}"><button type="submit">Excluir</button></form>"#,
        edit = escape(&format!("{}/edit", path)),
        delete = escape(&format!("{}/delete", path)),
    );

    layout(&format!("Avistamento {}", registro), &body)
}

/// Edit form for a sighting. Submits as a form POST to the sighting.
pub fn sighting_edit(registro: &str, fields: &Fields) -> String {
    let path = sighting_path(registro);
    let mut body = String::new();

    let _ = write!(body, r#"<form method="post" action="{}"><table><tbody>"#, escape(&path));
    let _ = write!(
        body,
        r#"<tr><th>registro</th><td><input type="text" name="registro" value="{}" readonly></td></tr>"#,
        escape(registro)
    );
    for (name, value) in fields {
        if name == "registro" {
            continue;
        }
        let _ = write!(
            body,
            r#"<tr><th>{name}</th><td><input type="text" name="{name}" value="{value}"></td></tr>"#,
            name = escape(name),
            value = escape(&display_value(Some(value))),
        );
    }
    let _ = write!(
        body,
        r#"</tbody></table><p><button type="submit">Salvar</button> <a href="{}">Cancelar</a></p></form>"#,
        escape(&path)
    );

    layout(&format!("Editar avistamento {}", registro), &body)
}

const TELEMETRY_COLUMNS: [(&str, &str); 5] = [
    ("oid", "OID"),
    ("title", "Título"),
    ("latitude", "Latitude"),
    ("longitude", "Longitude"),
    ("notes", "Notas"),
];

/// Telemetry listing with its filter form. Dates are echoed as typed.
pub fn telemetry_list(
    listing: &Listing<'_>,
    oid: Option<&str>,
    date_start: Option<&str>,
    date_end: Option<&str>,
) -> String {
    let mut body = String::new();

    let _ = write!(
        body,
        r#"<form class="filters" method="get" action="/telemetria">{}{}{}<input type="hidden" name="page_size" value="{}"><button type="submit">Filtrar</button></form>"#,
        input("oid", "OID", oid, "text"),
        input("date_start", "De", date_start, "date"),
        input("date_end", "Até", date_end, "date"),
        listing.page_size,
    );

    body.push_str("<table><thead><tr><th>Data</th>");
    for (_, heading) in TELEMETRY_COLUMNS {
        let _ = write!(body, "<th>{}</th>", escape(heading));
    }
    body.push_str("</tr></thead><tbody>");

    for doc in listing.items {
        let _ = write!(body, "<tr><td>{}</td>", escape(&format_date(doc.get("date"))));
        for (field, _) in TELEMETRY_COLUMNS {
            let _ = write!(body, "<td>{}</td>", escape(&display_value(doc.get(field))));
        }
        body.push_str("</tr>");
    }
    if listing.items.is_empty() {
        let _ = write!(
            body,
            r#"<tr><td colspan="{}">Nenhum registro de telemetria encontrado.</td></tr>"#,
            TELEMETRY_COLUMNS.len() + 1
        );
    }
    body.push_str("</tbody></table>");
    body.push_str(&pager(
        listing.page,
        listing.prev_url.as_deref(),
        listing.next_url.as_deref(),
    ));

    layout("Telemetria", &body)
}
