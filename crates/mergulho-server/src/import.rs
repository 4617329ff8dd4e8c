//! CSV imports into the sightings and telemetry collections.

use std::io::Read;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use mergulho_core::{DocumentStore, Fields, sightings, telemetry};

/// One row of the sightings spreadsheet.
///
/// Every value is kept as text, including the day/month/year columns that
/// the sighting filters compare as strings. A few headers in the source
/// spreadsheet use different spellings from the stored field names.
#[derive(Debug, Deserialize, Serialize)]
pub struct SightingRow {
    pub registro: String,
    pub nome_popular: String,
    pub nome_cientifico: String,
    pub observador: String,
    pub classificacao_observador: String,
    pub dia_registro: String,
    pub mes_registro: String,
    pub ano_registro: String,
    pub local: String,
    pub quantidade: String,
    pub comportamento: String,
    pub tamanho_estimado: String,
    pub sexo: String,
    pub interacao: String,
    pub modo_registro: String,
    pub link_instagram: String,
    pub dia_anotacao: String,
    pub mes_anotacao: String,
    pub ano_anotacao: String,
    pub responsavel_anotacao: String,
    pub operadora_empresa_foto: String,
    #[serde(alias = "Recebido_por")]
    pub recebido_por: String,
    #[serde(alias = "observação")]
    pub observacao: String,
    #[serde(rename = "outra_ID")]
    pub outra_id: String,
    #[serde(alias = "Concatenado")]
    pub concatenado: String,
}

/// One row of a telemetry CSV, as written by `convert wildlife`.
#[derive(Debug, Deserialize)]
pub struct TelemetryRow {
    pub oid: String,
    pub title: String,
    pub date: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub notes: String,
}

impl TelemetryRow {
    /// Stored form: a blank date is null, blank coordinates are 0.0.
    pub fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.insert("oid".to_string(), Value::String(self.oid));
        fields.insert("title".to_string(), Value::String(self.title));
        fields.insert("date".to_string(), self.date.map(Value::from).unwrap_or(Value::Null));
        fields.insert("latitude".to_string(), Value::from(self.latitude.unwrap_or(0.0)));
        fields.insert("longitude".to_string(), Value::from(self.longitude.unwrap_or(0.0)));
        fields.insert("notes".to_string(), Value::String(self.notes));
        fields
    }
}

fn to_fields<T: Serialize>(row: &T) -> Result<Fields> {
    match serde_json::to_value(row)? {
        Value::Object(fields) => Ok(fields),
        other => anyhow::bail!("row did not serialize to an object: {}", other),
    }
}

/// Import sightings, each keyed by its `registro`. Re-importing upserts.
///
/// Stops after `limit` rows when given. Returns the number imported.
pub async fn import_sightings<R: Read>(
    store: &dyn DocumentStore,
    reader: R,
    limit: Option<usize>,
) -> Result<usize> {
    let mut csv = csv::Reader::from_reader(reader);
    let mut count = 0;

    for (index, row) in csv.deserialize::<SightingRow>().enumerate() {
        if limit.is_some_and(|n| count >= n) {
            break;
        }
        let row = row.with_context(|| format!("Invalid sighting on CSV row {}", index + 1))?;
        let id = row.registro.clone();
        store
            .set(sightings::COLLECTION, &id, to_fields(&row)?)
            .await
            .with_context(|| format!("Failed to store sighting {}", id))?;
        debug!(registro = %id, "Imported sighting");
        count += 1;
    }

    info!(count, "Imported sightings");
    Ok(count)
}

/// Import telemetry fixes, each under a store-generated id.
///
/// Stops after `limit` rows when given. Returns the number imported.
pub async fn import_telemetry<R: Read>(
    store: &dyn DocumentStore,
    reader: R,
    limit: Option<usize>,
) -> Result<usize> {
    let mut csv = csv::Reader::from_reader(reader);
    let mut count = 0;

    for (index, row) in csv.deserialize::<TelemetryRow>().enumerate() {
        if limit.is_some_and(|n| count >= n) {
            break;
        }
        let row = row.with_context(|| format!("Invalid telemetry on CSV row {}", index + 1))?;
        let id = store
            .add(telemetry::COLLECTION, row.into_fields())
            .await
            .context("Failed to store telemetry")?;
        debug!(%id, "Imported telemetry");
        count += 1;
    }

    info!(count, "Imported telemetry");
    Ok(count)
}
