//! Conversion of wildlife tracking exports to telemetry CSV.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// A tracking export: deployments, each with its recorded locations.
#[derive(Debug, Default, Deserialize)]
pub struct WildlifeExport {
    #[serde(default)]
    pub deployments: Vec<Deployment>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Deployment {
    #[serde(rename = "_id", default)]
    pub id: ObjectId,
    #[serde(default)]
    pub title: Value,
    #[serde(default)]
    pub locations: Vec<Location>,
}

/// Extended-JSON object id, `{"$oid": "..."}`.
#[derive(Debug, Default, Deserialize)]
pub struct ObjectId {
    #[serde(rename = "$oid")]
    pub oid: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub date: Value,
    #[serde(default)]
    pub latitude: Value,
    #[serde(default)]
    pub longitude: Value,
    #[serde(default)]
    pub notes: Value,
}

/// One flattened location, in telemetry CSV column order.
#[derive(Debug, PartialEq, Serialize)]
pub struct TelemetryRecord {
    pub oid: String,
    pub title: String,
    pub date: String,
    pub latitude: String,
    pub longitude: String,
    pub notes: String,
}

/// Missing and null values become empty cells.
fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl WildlifeExport {
    /// One record per location, deployments in order.
    pub fn flatten(&self) -> Vec<TelemetryRecord> {
        self.deployments
            .iter()
            .flat_map(|deployment| {
                deployment.locations.iter().map(move |location| TelemetryRecord {
                    oid: deployment.id.oid.clone().unwrap_or_default(),
                    title: cell(&deployment.title),
                    date: cell(&location.date),
                    latitude: cell(&location.latitude),
                    longitude: cell(&location.longitude),
                    notes: cell(&location.notes),
                })
            })
            .collect()
    }
}

/// Default output path: the input with its extension replaced by `.csv`.
pub fn default_output(input: &Path) -> PathBuf {
    input.with_extension("csv")
}

/// Decode a wildlife export.
pub fn read_export<R: Read>(reader: R) -> Result<WildlifeExport> {
    serde_json::from_reader(reader).context("Failed to decode wildlife JSON")
}

/// Write telemetry records with a header row.
pub fn write_records<W: Write>(records: &[TelemetryRecord], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for record in records {
        csv.serialize(record).context("Failed to write CSV row")?;
    }
    csv.flush().context("Failed to flush CSV output")?;
    Ok(())
}

/// Convert the export at `input`, writing next to it unless `output` is given.
///
/// Returns the output path and row count, or `None` when there was nothing
/// to write.
pub fn convert_wildlife_file(input: &Path, output: Option<&Path>) -> Result<Option<(PathBuf, usize)>> {
    let file = std::fs::File::open(input)
        .with_context(|| format!("Failed to open {}", input.display()))?;
    let export = read_export(std::io::BufReader::new(file))
        .with_context(|| format!("Invalid export {}", input.display()))?;

    let records = export.flatten();
    if records.is_empty() {
        info!(input = %input.display(), "No locations to convert");
        return Ok(None);
    }

    let output = output.map(Path::to_path_buf).unwrap_or_else(|| default_output(input));
    let file = std::fs::File::create(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    write_records(&records, file)?;

    info!(rows = records.len(), output = %output.display(), "Converted wildlife export");
    Ok(Some((output, records.len())))
}
