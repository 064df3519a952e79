use ndarray::{Array1, ArrayView1};

use super::logspace;
use crate::constants::{BOLTZMANN, PLANCK, SPEED_OF_LIGHT, WIEN_FREQUENCY};

/// Frequency samples per decade in [`planck_nu_range`].
const POINTS_PER_DECADE: f64 = 100.0;

/// Planck spectral radiance B_nu(T) in erg/s/cm^2/Hz/sr.
///
/// Far into the Wien tail `exp(h nu / k T)` overflows and the radiance is
/// returned as exactly zero.
pub fn b_nu(nu: f64, temperature: f64) -> f64 {
    let x = PLANCK * nu / (BOLTZMANN * temperature);
    2.0 * PLANCK * nu.powi(3) / (SPEED_OF_LIGHT * SPEED_OF_LIGHT) / x.exp_m1()
}

/// [`b_nu`] evaluated on every frequency of `nu`.
pub fn b_nu_spectrum(nu: ArrayView1<f64>, temperature: f64) -> Array1<f64> {
    nu.mapv(|n| b_nu(n, temperature))
}

/// Frequencies over which the Planck function carries non-negligible power
/// for every temperature in `[t_min, t_max]`.
///
/// Spans three decades below the peak at `t_min` up to one decade above the
/// peak at `t_max`. Empty when either temperature is not finite and positive.
pub fn planck_nu_range(t_min: f64, t_max: f64) -> Array1<f64> {
    let log_nu_min = (WIEN_FREQUENCY * t_min / 1e3).log10();
    let log_nu_max = (WIEN_FREQUENCY * t_max * 1e1).log10();
    if !log_nu_min.is_finite() || !log_nu_max.is_finite() {
        return Array1::zeros(0);
    }
    let n_nu = ((log_nu_max - log_nu_min) * POINTS_PER_DECADE).ceil().max(1.0) as usize + 1;
    logspace(log_nu_min, log_nu_max, n_nu)
}
