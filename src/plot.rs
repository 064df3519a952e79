//! Heatmap of an emissivity table on log-scaled frequency (x) and state
//! variable (y) axes.

use std::path::Path;

use anyhow::{Context, Result};
use image::{Rgb, RgbImage};

use crate::color::{heat, scale};
use crate::data::model::Emissivities;
use crate::error::EmissivityError;

/// Decades of dynamic range shown below the peak.
const DYNAMIC_RANGE_DECADES: f64 = 6.0;

/// Render a normalized copy of `emissivities` as a `width` x `height` image.
///
/// Values are shown as `log10(|jnu|)` clipped to six decades below the peak,
/// with the highest state variable at the top.
pub fn render_heatmap(
    emissivities: &Emissivities,
    width: u32,
    height: u32,
) -> Result<RgbImage, EmissivityError> {
    let mut normalized = emissivities.clone();
    normalized.normalize()?;
    let (_, var, nu, jnu) = normalized.parts()?;

    let mut img = RgbImage::new(width, height);
    let peak = jnu.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if !(peak > 0.0) || !peak.is_finite() {
        return Ok(img);
    }
    let vmax = peak.log10();
    let vmin = vmax - DYNAMIC_RANGE_DECADES;

    let columns = nearest_log_indices(nu.iter().copied(), width as usize);
    let rows = nearest_log_indices(var.iter().copied(), height as usize);

    for (py, &ivar) in rows.iter().rev().enumerate() {
        for (px, &inu) in columns.iter().enumerate() {
            let value = jnu[[inu, ivar]].abs().max(10f64.powf(vmin)).min(peak);
            let color = heat(scale(value.log10(), vmin, vmax));
            img.put_pixel(px as u32, py as u32, Rgb([color.red, color.green, color.blue]));
        }
    }
    Ok(img)
}

/// Render and write the heatmap as PNG.
pub fn save_heatmap(emissivities: &Emissivities, path: &Path, width: u32, height: u32) -> Result<()> {
    let img = render_heatmap(emissivities, width, height)?;
    img.save(path)
        .with_context(|| format!("writing heatmap {}", path.display()))?;
    Ok(())
}

/// For `n` pixels evenly spaced in log10 across `axis`, the index of the
/// nearest sample (in log space) for each pixel.
fn nearest_log_indices(axis: impl Iterator<Item = f64>, n: usize) -> Vec<usize> {
    let logs: Vec<f64> = axis.map(f64::log10).collect();
    let (Some(&first), Some(&last)) = (logs.first(), logs.last()) else {
        return Vec::new();
    };

    (0..n)
        .map(|p| {
            let target = first + (p as f64 + 0.5) / n as f64 * (last - first);
            let i = logs.partition_point(|&l| l < target);
            if i == 0 {
                0
            } else if i == logs.len() || target - logs[i - 1] <= logs[i] - target {
                i - 1
            } else {
                i
            }
        })
        .collect()
}
