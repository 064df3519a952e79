use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, Float32Array, Float64Array};
use ndarray::Array1;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;

use super::opacity::TabulatedOpacity;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a tabulated opacity from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – Parquet file with `nu` and `kappa` Float64 columns
/// * `.json`    – `{ "nu": [...], "kappa": [...] }`
/// * `.csv`     – header row with `nu` and `kappa` columns
///
/// Tables sorted by decreasing frequency (e.g. tabulated by wavelength) are
/// reversed.
pub fn load_opacity(path: &Path) -> Result<TabulatedOpacity> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let (nu, kappa) = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path)?,
        "json" => load_json(path)?,
        "csv" => load_csv(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    into_opacity(nu, kappa).with_context(|| format!("invalid opacity table {}", path.display()))
}

fn into_opacity(mut nu: Vec<f64>, mut kappa: Vec<f64>) -> Result<TabulatedOpacity> {
    if nu.len() >= 2 && nu[0] > nu[nu.len() - 1] {
        nu.reverse();
        kappa.reverse();
    }
    Ok(TabulatedOpacity::new(Array1::from_vec(nu), Array1::from_vec(kappa))?)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct JsonOpacity {
    nu: Vec<f64>,
    kappa: Vec<f64>,
}

fn load_json(path: &Path) -> Result<(Vec<f64>, Vec<f64>)> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let table: JsonOpacity = serde_json::from_str(&text).context("parsing JSON")?;
    Ok((table.nu, table.kappa))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<(Vec<f64>, Vec<f64>)> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?.clone();

    let nu_idx = headers
        .iter()
        .position(|h| h.trim() == "nu")
        .context("CSV missing 'nu' column")?;
    let kappa_idx = headers
        .iter()
        .position(|h| h.trim() == "kappa")
        .context("CSV missing 'kappa' column")?;

    let mut nu = Vec::new();
    let mut kappa = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        nu.push(parse_field(record.get(nu_idx), row_no, "nu")?);
        kappa.push(parse_field(record.get(kappa_idx), row_no, "kappa")?);
    }

    Ok((nu, kappa))
}

fn parse_field(field: Option<&str>, row: usize, col: &str) -> Result<f64> {
    let tok = field.unwrap_or("").trim();
    tok.parse::<f64>()
        .with_context(|| format!("Row {row}, {col}: '{tok}' is not a number"))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

fn load_parquet(path: &Path) -> Result<(Vec<f64>, Vec<f64>)> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut nu = Vec::new();
    let mut kappa = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let nu_idx = schema
            .index_of("nu")
            .map_err(|_| anyhow::anyhow!("Parquet file missing 'nu' column"))?;
        let kappa_idx = schema
            .index_of("kappa")
            .map_err(|_| anyhow::anyhow!("Parquet file missing 'kappa' column"))?;

        nu.extend(extract_f64_column(batch.column(nu_idx).as_ref()).context("reading 'nu'")?);
        kappa.extend(extract_f64_column(batch.column(kappa_idx).as_ref()).context("reading 'kappa'")?);
    }

    Ok((nu, kappa))
}

/// Read a Float64 or Float32 column; nulls become NaN and are rejected later
/// by the opacity validation.
fn extract_f64_column(col: &dyn Array) -> Result<Vec<f64>> {
    if let Some(f64_arr) = col.as_any().downcast_ref::<Float64Array>() {
        Ok(f64_arr.iter().map(|v| v.unwrap_or(f64::NAN)).collect())
    } else if let Some(f32_arr) = col.as_any().downcast_ref::<Float32Array>() {
        Ok(f32_arr.iter().map(|v| v.map_or(f64::NAN, f64::from)).collect())
    } else {
        bail!("column type is {:?}, expected Float64 or Float32", col.data_type())
    }
}
