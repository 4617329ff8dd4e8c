//! HTTP API tests against a file-backed store.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Request, StatusCode, header};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;
use url::Url;

use mergulho_core::{DocumentStore, Fields};
use mergulho_file::FileStore;
use mergulho_server::server::{AppState, router};

struct TestApp {
    _dir: TempDir,
    store: Arc<FileStore>,
    app: Router,
}

fn fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {}", other),
    }
}

async fn app() -> TestApp {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FileStore::new(dir.path()));

    for (registro, dia, ano) in [
        ("A-001", "9", "2024"),
        ("A-002", "9", "2023"),
        ("A-003", "10", "2024"),
    ] {
        store
            .set(
                "avistamentos",
                registro,
                fields(json!({
                    "registro": registro,
                    "nome_popular": "Tubarão-limão",
                    "dia_registro": dia,
                    "mes_registro": "1",
                    "ano_registro": ano,
                    "local": "Sancho",
                })),
            )
            .await
            .unwrap();
    }

    // 2024-01-15 00:00 UTC is 1705276800.
    for (id, oid, date) in [
        ("t1", "shark-7", json!(1705276800)),
        ("t2", "shark-7", json!(1705320000)),
        ("t3", "shark-9", json!(1705363199)),
        ("t4", "shark-7", json!(1705363200)),
    ] {
        store
            .set(
                "telemetria",
                id,
                fields(json!({"oid": oid, "title": "Tigre", "date": date, "latitude": -3.85, "longitude": -32.42})),
            )
            .await
            .unwrap();
    }

    let state = AppState::new(store.clone())
        .with_image_base_url(Url::parse("https://cdn.example.org/fotos").unwrap());
    TestApp {
        _dir: dir,
        store,
        app: router(state),
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, body.to_vec())
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let (status, _, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

async fn get_text(app: &Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let (status, _, body) = send(app, request).await;
    (status, String::from_utf8(body).unwrap())
}

#[tokio::test]
async fn root_and_health() {
    let t = app().await;

    let (status, body) = get_json(&t.app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Virtual Diving API"}));

    let (status, body) = get_text(&t.app, "/-/healthy").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn lists_sightings_as_json() {
    let t = app().await;

    let (status, body) = get_json(&t.app, "/avistamentos?format=json&page_size=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);
    assert_eq!(body["page_size"], 2);
    assert_eq!(body["count"], 2);
    assert_eq!(body["items"][0]["registro"], "A-001");
    assert_eq!(body["items"][1]["registro"], "A-002");

    let (_, body) = get_json(&t.app, "/avistamentos?format=json&page=2&page_size=2").await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["items"][0]["registro"], "A-003");
}

#[tokio::test]
async fn paging_parameters_are_clamped() {
    let t = app().await;

    let (status, body) = get_json(&t.app, "/avistamentos?format=json&page=0&page_size=500").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);
    assert_eq!(body["page_size"], 100);
    assert_eq!(body["count"], 3);

    let (status, body) = get_json(&t.app, "/avistamentos?format=json&page=abc&page_size=-4").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);
    assert_eq!(body["page_size"], 1);
    assert_eq!(body["items"][0]["registro"], "A-001");

    let (_, body) = get_json(&t.app, "/telemetria?format=json&page=-3&page_size=0").await;
    assert_eq!(body["page"], 1);
    assert_eq!(body["page_size"], 1);
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn accept_header_selects_json() {
    let t = app().await;

    let request = Request::builder()
        .uri("/avistamentos")
        .header(header::ACCEPT, "application/json")
        .body(Body::empty())
        .unwrap();
    let (status, headers, body) = send(&t.app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        headers[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("application/json")
    );
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["count"], 3);
}

#[tokio::test]
async fn filters_and_counts_sightings() {
    let t = app().await;

    let (_, body) = get_json(&t.app, "/avistamentos?format=json&dia_registro=9&ano_registro=2024").await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["items"][0]["registro"], "A-001");

    let (status, body) = get_json(&t.app, "/avistamentos?count=true&dia_registro=9").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"count": 2}));

    // Blank form fields and junk numbers are ignored.
    let (_, body) = get_json(&t.app, "/avistamentos?count=1&dia_registro=&ano_registro=abc").await;
    assert_eq!(body, json!({"count": 3}));
}

#[tokio::test]
async fn sightings_html_has_pager_links() {
    let t = app().await;

    let (status, page) = get_text(&t.app, "/avistamentos?page=1&page_size=2&ano_registro=2024").await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("A-001"));
    assert!(page.contains("A-003"));
    assert!(!page.contains("A-002"));
    assert!(page.contains("/avistamentos?page=2&amp;page_size=2&amp;ano_registro=2024"));
}

#[tokio::test]
async fn views_a_sighting() {
    let t = app().await;

    let (status, body) = get_json(&t.app, "/avistamentos/A-001?format=json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["registro"], "A-001");
    assert_eq!(body["local"], "Sancho");
    assert_eq!(body["image_url"], "https://cdn.example.org/fotos/imagens/A-001.jpg");

    let (status, page) = get_text(&t.app, "/avistamentos/A-001").await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("Sancho"));
    assert!(page.contains("https://cdn.example.org/fotos/imagens/A-001.jpg"));
}

#[tokio::test]
async fn missing_sighting_is_404() {
    let t = app().await;

    let (status, body) = get_json(&t.app, "/avistamentos/Z-999?format=json").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"detail": "Avistamento não encontrado"}));

    let request = Request::builder()
        .method("DELETE")
        .uri("/avistamentos/Z-999")
        .body(Body::empty())
        .unwrap();
    let (status, _, _) = send(&t.app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn edit_form_keeps_registro_readonly() {
    let t = app().await;

    let (status, page) = get_text(&t.app, "/avistamentos/A-002/edit").await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("readonly"));
    assert!(page.contains("A-002"));
}

#[tokio::test]
async fn put_merges_fields() {
    let t = app().await;

    let request = Request::builder()
        .method("PUT")
        .uri("/avistamentos/A-001?format=json")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"local": "Atalaia", "quantidade": "3"}"#))
        .unwrap();
    let (status, _, body) = send(&t.app, request).await;
    assert_eq!(status, StatusCode::OK);

    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["message"], "Avistamento atualizado com sucesso");
    assert_eq!(body["avistamento"]["local"], "Atalaia");
    assert_eq!(body["avistamento"]["quantidade"], "3");
    assert_eq!(body["avistamento"]["nome_popular"], "Tubarão-limão");

    let stored = t.store.get("avistamentos", "A-001").await.unwrap().unwrap();
    assert_eq!(stored.get("local"), Some(&json!("Atalaia")));
}

#[tokio::test]
async fn put_on_missing_sighting_is_404() {
    let t = app().await;

    let request = Request::builder()
        .method("PUT")
        .uri("/avistamentos/Z-999")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"local": "Atalaia"}"#))
        .unwrap();
    let (status, _, _) = send(&t.app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(t.store.get("avistamentos", "Z-999").await.unwrap().is_none());
}

#[tokio::test]
async fn post_json_creates_sighting() {
    let t = app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/avistamentos/B-100")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"registro": "B-100", "nome_popular": "Raia-manta"}"#))
        .unwrap();
    let (status, _, body) = send(&t.app, request).await;
    assert_eq!(status, StatusCode::OK);

    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["message"], "Avistamento criado com sucesso");
    assert_eq!(body["avistamento"]["nome_popular"], "Raia-manta");

    let stored = t.store.get("avistamentos", "B-100").await.unwrap().unwrap();
    assert_eq!(stored.get("nome_popular"), Some(&json!("Raia-manta")));
}

#[tokio::test]
async fn post_invalid_json_is_400() {
    let t = app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/avistamentos/B-100")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("[1, 2]"))
        .unwrap();
    let (status, _, body) = send(&t.app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let body: Value = serde_json::from_slice(&body).unwrap();
    assert!(body["detail"].as_str().unwrap().starts_with("invalid JSON object"));
}

#[tokio::test]
async fn post_form_updates_and_redirects() {
    let t = app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/avistamentos/A-003")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("registro=A-003&local=Rata&sexo=&comportamento=None"))
        .unwrap();
    let (status, headers, _) = send(&t.app, request).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers[header::LOCATION], "/avistamentos/A-003");

    let stored = t.store.get("avistamentos", "A-003").await.unwrap().unwrap();
    assert_eq!(stored.get("local"), Some(&json!("Rata")));
    assert_eq!(stored.get("sexo"), None);
    assert_eq!(stored.get("comportamento"), None);
}

#[tokio::test]
async fn delete_removes_sighting() {
    let t = app().await;

    let request = Request::builder()
        .method("DELETE")
        .uri("/avistamentos/A-002?format=json")
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(&t.app, request).await;
    assert_eq!(status, StatusCode::OK);

    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        body,
        json!({"message": "Avistamento deletado com sucesso", "registro": "A-002"})
    );
    assert!(t.store.get("avistamentos", "A-002").await.unwrap().is_none());
}

#[tokio::test]
async fn delete_form_redirects_to_listing() {
    let t = app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/avistamentos/A-001/delete")
        .body(Body::empty())
        .unwrap();
    let (status, headers, _) = send(&t.app, request).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers[header::LOCATION], "/avistamentos");
    assert!(t.store.get("avistamentos", "A-001").await.unwrap().is_none());
}

#[tokio::test]
async fn telemetry_filters_by_oid_and_dates() {
    let t = app().await;

    let (status, body) = get_json(&t.app, "/telemetria?format=json&oid=shark-7").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
    assert_eq!(body["items"][0]["date"], 1705276800);
    assert_eq!(body["items"][2]["date"], 1705363200);

    let (_, body) = get_json(
        &t.app,
        "/telemetria?format=json&date_start=2024-01-15&date_end=2024-01-15",
    )
    .await;
    assert_eq!(body["count"], 3);
    assert_eq!(body["items"][2]["oid"], "shark-9");

    let (_, body) = get_json(&t.app, "/telemetria?count=true&oid=shark-7&date_start=1705300000").await;
    assert_eq!(body, json!({"count": 2}));

    let (_, body) = get_json(&t.app, "/telemetria?count=true&oid=").await;
    assert_eq!(body, json!({"count": 4}));
}

#[tokio::test]
async fn telemetry_html_echoes_dates() {
    let t = app().await;

    let (status, page) = get_text(
        &t.app,
        "/telemetria?page_size=1&oid=shark-7&date_start=2024-01-15",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("15/01/2024 00:00"));
    assert!(page.contains(r#"value="2024-01-15""#));
    assert!(page.contains("/telemetria?page=2&amp;page_size=1&amp;oid=shark-7&amp;date_start=2024-01-15"));
}
