use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Map, Value as JsonValue};

use crate::data::Value;
use crate::selection::SelectedSubset;

/// Output format, chosen from the target file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => ExportFormat::Json,
            _ => ExportFormat::Csv,
        }
    }
}

/// CSV with a header row of column names; nulls become empty fields.
pub fn write_csv<W: Write>(subset: &SelectedSubset, writer: W) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(&subset.columns)
        .context("writing CSV header")?;
    for row in &subset.rows {
        let record: Vec<String> = row
            .cells
            .iter()
            .map(|v| match v {
                Value::Null => String::new(),
                other => other.to_string(),
            })
            .collect();
        out.write_record(&record)
            .with_context(|| format!("writing CSV row {}", row.index))?;
    }
    out.flush().context("flushing CSV output")?;
    Ok(())
}

/// Array of objects keyed by column name, with the dataset row index
/// under `"_row"`.
pub fn to_json(subset: &SelectedSubset) -> Result<String> {
    let records: Vec<JsonValue> = subset
        .rows
        .iter()
        .map(|row| {
            let mut obj = Map::new();
            obj.insert("_row".to_string(), JsonValue::from(row.index));
            for (name, cell) in subset.columns.iter().zip(&row.cells) {
                obj.insert(name.clone(), serde_json::to_value(cell)?);
            }
            Ok(JsonValue::Object(obj))
        })
        .collect::<Result<_, serde_json::Error>>()
        .context("encoding selection as JSON")?;
    serde_json::to_string_pretty(&records).context("serializing JSON")
}

/// Write `subset` to `path` in the format implied by its extension.
pub fn export_to_file(subset: &SelectedSubset, path: &Path) -> Result<ExportFormat> {
    let format = ExportFormat::from_path(path);
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    match format {
        ExportFormat::Csv => write_csv(subset, file)?,
        ExportFormat::Json => {
            let mut file = file;
            file.write_all(to_json(subset)?.as_bytes())
                .with_context(|| format!("writing {}", path.display()))?;
        }
    }
    log::info!(
        "Exported {} selected rows to {} as {format:?}",
        subset.len(),
        path.display()
    );
    Ok(format)
}
