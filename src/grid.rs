//! Frequency grid merging for the LTE solver.

use std::fmt;

use ndarray::{Array1, ArrayView1};

/// A side of the Planck support that the opacity model does not reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverageWarning {
    /// Planck function for the lowest temperature extends below the opacity grid.
    LowTemperature,
    /// Planck function for the highest temperature extends above the opacity grid.
    HighTemperature,
}

impl fmt::Display for CoverageWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoverageWarning::LowTemperature => write!(
                f,
                "Planck function for lowest temperature not completely covered by opacity function"
            ),
            CoverageWarning::HighTemperature => write!(
                f,
                "Planck function for highest temperature not completely covered by opacity function"
            ),
        }
    }
}

/// Merged frequency axis plus the coverage problems found while building it.
#[derive(Debug, Clone)]
pub struct GridMerge {
    pub nu: Array1<f64>,
    pub warnings: Vec<CoverageWarning>,
}

/// Union of two frequency axes, sorted ascending, exact duplicates removed.
pub fn nu_common(a: ArrayView1<f64>, b: ArrayView1<f64>) -> Array1<f64> {
    let mut nu: Vec<f64> = a.iter().chain(b.iter()).copied().collect();
    nu.sort_by(f64::total_cmp);
    nu.dedup();
    Array1::from_vec(nu)
}

/// Merge the Planck support with the opacity frequency grid and clip the
/// result to the range the opacity grid covers.
///
/// Partial coverage is not an error: the merged axis is truncated and a
/// [`CoverageWarning`] is recorded for each uncovered side.
pub fn merge_frequency_grid(planck_nu: ArrayView1<f64>, opacity_nu: ArrayView1<f64>) -> GridMerge {
    let mut nu = nu_common(planck_nu, opacity_nu);
    let mut warnings = Vec::new();

    let (Some(planck_min), Some(planck_max)) = (min_of(planck_nu), max_of(planck_nu)) else {
        return GridMerge { nu, warnings };
    };
    let (Some(opacity_min), Some(opacity_max)) = (min_of(opacity_nu), max_of(opacity_nu)) else {
        return GridMerge { nu, warnings };
    };

    if planck_min < opacity_min {
        warnings.push(CoverageWarning::LowTemperature);
        nu = nu.iter().copied().filter(|&v| v >= opacity_min).collect();
    }

    if planck_max > opacity_max {
        warnings.push(CoverageWarning::HighTemperature);
        nu = nu.iter().copied().filter(|&v| v <= opacity_max).collect();
    }

    GridMerge { nu, warnings }
}

fn min_of(values: ArrayView1<f64>) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

fn max_of(values: ArrayView1<f64>) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}
