use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::{DataType, Schema};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::model::{LaunchDataset, LaunchOutcome, LaunchRecord};

pub const COL_LAUNCH_SITE: &str = "Launch Site";
pub const COL_PAYLOAD_MASS: &str = "Payload Mass (kg)";
pub const COL_CLASS: &str = "class";
pub const COL_BOOSTER_CATEGORY: &str = "Booster Version Category";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a launch dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row naming at least the four launch columns
/// * `.json`    – `[{ "Launch Site": ..., "Payload Mass (kg)": ..., ... }, ...]`
/// * `.parquet` – one column per field, as written by `df.to_parquet()`
///
/// Columns other than the four launch columns are ignored.  An empty file
/// is an error because the payload selector has no bounds to offer.
pub fn load_file(path: &Path) -> Result<LaunchDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    if dataset.is_empty() {
        bail!("{} contains no launch records", path.display());
    }
    Ok(dataset)
}

/// Match a header against a required column.  The class column is matched
/// case-insensitively because both `class` and `Class` occur in the wild.
fn header_matches(header: &str, column: &str) -> bool {
    let header = header.trim();
    if column == COL_CLASS {
        header.eq_ignore_ascii_case(column)
    } else {
        header == column
    }
}

fn outcome_from_f64(v: f64, row: usize) -> Result<LaunchOutcome> {
    if v.fract() != 0.0 {
        bail!("Row {row}: class value {v} is not 0 or 1");
    }
    LaunchOutcome::from_class(v as i64)
        .with_context(|| format!("Row {row}: class value {v} is not 0 or 1"))
}

/// Payload masses must be finite so the dataset bounds stay usable.
fn finite_payload(v: f64, row: usize) -> Result<f64> {
    if !v.is_finite() {
        bail!("Row {row}: payload {v} is not a finite number");
    }
    Ok(v)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Positions of the launch columns within a CSV header row.
struct CsvColumns {
    site: usize,
    payload: usize,
    class: usize,
    booster: usize,
}

impl CsvColumns {
    fn locate(headers: &[String]) -> Result<Self> {
        let find = |column: &str| {
            headers
                .iter()
                .position(|h| header_matches(h, column))
                .with_context(|| format!("CSV missing '{column}' column"))
        };
        Ok(CsvColumns {
            site: find(COL_LAUNCH_SITE)?,
            payload: find(COL_PAYLOAD_MASS)?,
            class: find(COL_CLASS)?,
            booster: find(COL_BOOSTER_CATEGORY)?,
        })
    }
}

fn load_csv(path: &Path) -> Result<LaunchDataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let cols = CsvColumns::locate(&headers)?;

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let cell = |idx: usize| record.get(idx).unwrap_or("").trim();

        let payload_text = cell(cols.payload);
        let payload_mass_kg = payload_text.parse::<f64>().with_context(|| {
            format!("Row {row_no}: payload '{payload_text}' is not a number")
        })?;
        let payload_mass_kg = finite_payload(payload_mass_kg, row_no)?;

        let class_text = cell(cols.class);
        let class = class_text
            .parse::<f64>()
            .with_context(|| format!("Row {row_no}: class '{class_text}' is not a number"))?;

        records.push(LaunchRecord {
            launch_site: cell(cols.site).to_string(),
            payload_mass_kg,
            outcome: outcome_from_f64(class, row_no)?,
            booster_version_category: cell(cols.booster).to_string(),
        });
    }

    Ok(LaunchDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Launch Site": "CCAFS LC-40",
///     "Payload Mass (kg)": 525.0,
///     "class": 0,
///     "Booster Version Category": "v1.0"
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<LaunchDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let class = json_field(obj, COL_CLASS, i)?
            .as_f64()
            .with_context(|| format!("Row {i}: '{COL_CLASS}' is not a number"))?;

        let payload = json_field(obj, COL_PAYLOAD_MASS, i)?
            .as_f64()
            .with_context(|| format!("Row {i}: '{COL_PAYLOAD_MASS}' is not a number"))?;

        records.push(LaunchRecord {
            launch_site: json_string(obj, COL_LAUNCH_SITE, i)?,
            payload_mass_kg: finite_payload(payload, i)?,
            outcome: outcome_from_f64(class, i)?,
            booster_version_category: json_string(obj, COL_BOOSTER_CATEGORY, i)?,
        });
    }

    Ok(LaunchDataset::from_records(records))
}

fn json_field<'a>(
    obj: &'a Map<String, JsonValue>,
    column: &str,
    row: usize,
) -> Result<&'a JsonValue> {
    obj.iter()
        .find(|(k, _)| header_matches(k, column))
        .map(|(_, v)| v)
        .with_context(|| format!("Row {row}: missing '{column}'"))
}

fn json_string(obj: &Map<String, JsonValue>, column: &str, row: usize) -> Result<String> {
    json_field(obj, column, row)?
        .as_str()
        .map(|s| s.trim().to_string())
        .with_context(|| format!("Row {row}: '{column}' is not a string"))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing launch records.
///
/// Expected schema:
/// - `Launch Site`, `Booster Version Category`: Utf8 or LargeUtf8
/// - `Payload Mass (kg)`: Float64, Float32, Int64 or Int32
/// - `class`: Int64, Int32 or Float64
fn load_parquet(path: &Path) -> Result<LaunchDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    let mut row_offset = 0usize;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let site_col = batch.column(parquet_index(&schema, COL_LAUNCH_SITE)?);
        let payload_col = batch.column(parquet_index(&schema, COL_PAYLOAD_MASS)?);
        let class_col = batch.column(parquet_index(&schema, COL_CLASS)?);
        let booster_col = batch.column(parquet_index(&schema, COL_BOOSTER_CATEGORY)?);

        for row in 0..batch.num_rows() {
            let row_no = row_offset + row;
            let class = extract_f64(class_col, row)
                .with_context(|| format!("Row {row_no}: failed to read '{COL_CLASS}'"))?;
            let payload = extract_f64(payload_col, row)
                .with_context(|| format!("Row {row_no}: failed to read '{COL_PAYLOAD_MASS}'"))?;
            records.push(LaunchRecord {
                launch_site: extract_string(site_col, row)
                    .with_context(|| format!("Row {row_no}: failed to read '{COL_LAUNCH_SITE}'"))?,
                payload_mass_kg: finite_payload(payload, row_no)?,
                outcome: outcome_from_f64(class, row_no)?,
                booster_version_category: extract_string(booster_col, row).with_context(|| {
                    format!("Row {row_no}: failed to read '{COL_BOOSTER_CATEGORY}'")
                })?,
            });
        }
        row_offset += batch.num_rows();
    }

    Ok(LaunchDataset::from_records(records))
}

// -- Parquet / Arrow helpers --

fn parquet_index(schema: &Schema, column: &str) -> Result<usize> {
    schema
        .fields()
        .iter()
        .position(|f| header_matches(f.name(), column))
        .with_context(|| format!("Parquet file missing '{column}' column"))
}

/// Read a numeric cell as `f64`, whatever the physical number type.
fn extract_f64(col: &Arc<dyn Array>, row: usize) -> Result<f64> {
    if col.is_null(row) {
        bail!("null value");
    }
    let any = col.as_any();
    let value = match col.data_type() {
        DataType::Float64 => any.downcast_ref::<Float64Array>().map(|a| a.value(row)),
        DataType::Float32 => any.downcast_ref::<Float32Array>().map(|a| a.value(row) as f64),
        DataType::Int64 => any.downcast_ref::<Int64Array>().map(|a| a.value(row) as f64),
        DataType::Int32 => any.downcast_ref::<Int32Array>().map(|a| a.value(row) as f64),
        other => bail!("Expected a numeric column, got {other:?}"),
    };
    value.context("column type does not match its declared data type")
}

fn extract_string(col: &Arc<dyn Array>, row: usize) -> Result<String> {
    if col.is_null(row) {
        bail!("null value");
    }
    match col.data_type() {
        DataType::Utf8 => Ok(col.as_string::<i32>().value(row).trim().to_string()),
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(row).trim().to_string()),
        other => bail!("Expected a string column, got {other:?}"),
    }
}
