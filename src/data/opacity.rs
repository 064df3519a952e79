//! Absorption opacity models.
//!
//! The LTE solver only needs a frequency grid, the absorption coefficient on
//! that grid and a Planck-mean opacity. All of it sits behind
//! [`OpacityModel`] so dust models with their own tabulation can plug in.

use ndarray::{Array1, ArrayView1};

use crate::error::EmissivityError;
use crate::numeric::{integrate_loglog, interp_loglog, monotonically_increasing};

/// Frequency-dependent absorption opacity of a dust model.
pub trait OpacityModel {
    /// Frequencies (Hz), strictly increasing and positive.
    fn nu(&self) -> ArrayView1<'_, f64>;

    /// Mass absorption coefficient (cm^2/g) at each of [`OpacityModel::nu`].
    fn kappa(&self) -> ArrayView1<'_, f64>;

    /// Mean opacity weighted by the spectrum `bnu` sampled on `nu`.
    ///
    /// The default interpolates `kappa` onto `nu` in log-log space and returns
    /// `∫ kappa bnu dnu / ∫ bnu dnu`.
    fn planck_mean_opacity(&self, nu: ArrayView1<f64>, bnu: ArrayView1<f64>) -> f64 {
        let kappa = interp_loglog(self.nu(), self.kappa(), nu);
        let weighted = &kappa * &bnu;
        integrate_loglog(nu, weighted.view()) / integrate_loglog(nu, bnu)
    }
}

/// Opacity given as a table of `(nu, kappa)` samples.
#[derive(Debug, Clone, PartialEq)]
pub struct TabulatedOpacity {
    nu: Array1<f64>,
    kappa: Array1<f64>,
}

impl TabulatedOpacity {
    /// Build from matching frequency and absorption arrays.
    pub fn new(nu: Array1<f64>, kappa: Array1<f64>) -> Result<Self, EmissivityError> {
        if nu.is_empty() {
            return Err(EmissivityError::shape("nu", "should not be empty"));
        }
        if nu.len() != kappa.len() {
            return Err(EmissivityError::shape(
                "kappa",
                format!("length {} but nu has {}", kappa.len(), nu.len()),
            ));
        }
        if !monotonically_increasing(nu.view()) {
            return Err(EmissivityError::NotMonotonic("nu"));
        }
        if nu[0] <= 0.0 {
            return Err(EmissivityError::NonPositive("nu"));
        }
        if kappa.iter().any(|&k| k < 0.0) {
            return Err(EmissivityError::NegativeValue("kappa"));
        }
        Ok(Self { nu, kappa })
    }
}

impl OpacityModel for TabulatedOpacity {
    fn nu(&self) -> ArrayView1<'_, f64> {
        self.nu.view()
    }

    fn kappa(&self) -> ArrayView1<'_, f64> {
        self.kappa.view()
    }
}
