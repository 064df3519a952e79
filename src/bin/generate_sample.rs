use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::Float64Array;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use dust_emissivities::constants::SPEED_OF_LIGHT;
use dust_emissivities::numeric::logspace;

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Toy silicate-like absorption (cm^2/g): beta = 2 in the sub-mm, flat in the
/// UV, with 9.7 and 18 micron features.
fn kappa(nu: f64) -> f64 {
    let wavelength_um = SPEED_OF_LIGHT / nu * 1e4;
    let continuum = 1e4 / (1.0 + wavelength_um.powi(2));
    let features = gaussian(wavelength_um.ln(), 9.7f64.ln(), 0.08, 3e3)
        + gaussian(wavelength_um.ln(), 18f64.ln(), 0.12, 1e3);
    continuum + features
}

fn main() -> Result<()> {
    // 1 cm to 0.01 micron, 100 points per decade
    let nu = logspace(SPEED_OF_LIGHT.log10(), (SPEED_OF_LIGHT / 1e-6).log10(), 601);
    let kappa_values: Vec<f64> = nu.iter().map(|&n| kappa(n)).collect();

    let schema = Arc::new(Schema::new(vec![
        Field::new("nu", DataType::Float64, false),
        Field::new("kappa", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Float64Array::from(nu.to_vec())),
            Arc::new(Float64Array::from(kappa_values)),
        ],
    )
    .context("building record batch")?;

    // Write Parquet
    let output_path = "sample_opacity.parquet";
    let file = std::fs::File::create(output_path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;

    println!("Wrote {} opacity samples to {output_path}", nu.len());
    Ok(())
}
