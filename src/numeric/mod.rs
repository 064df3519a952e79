//! Numerical primitives shared by the solver and the opacity model.
//!
//! Everything here works on log-spaced frequency grids spanning many decades,
//! so integration and interpolation are done in log-log space.

pub mod integrate;
pub mod interpolate;
pub mod planck;

pub use integrate::integrate_loglog;
pub use interpolate::interp_loglog;
pub use planck::{b_nu, b_nu_spectrum, planck_nu_range};

use ndarray::{Array1, ArrayView1};

/// `n` values spaced uniformly in log10 between `10^start_exp` and `10^stop_exp`.
pub fn logspace(start_exp: f64, stop_exp: f64, n: usize) -> Array1<f64> {
    match n {
        0 => Array1::zeros(0),
        1 => Array1::from_elem(1, 10f64.powf(start_exp)),
        _ => {
            let step = (stop_exp - start_exp) / (n - 1) as f64;
            Array1::from_iter((0..n).map(|i| 10f64.powf(start_exp + step * i as f64)))
        }
    }
}

/// Whether every element is strictly greater than the one before it.
///
/// NaN compares false, so any NaN makes the sequence non-monotonic.
pub fn monotonically_increasing(values: ArrayView1<f64>) -> bool {
    (1..values.len()).all(|i| values[i] > values[i - 1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_logspace_endpoints() {
        let v = logspace(1.0, 3.0, 3);
        assert_eq!(v.len(), 3);
        assert!((v[0] - 10.0).abs() < 1e-12);
        assert!((v[1] - 100.0).abs() < 1e-10);
        assert!((v[2] - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_logspace_degenerate_counts() {
        assert!(logspace(0.0, 1.0, 0).is_empty());
        assert_eq!(logspace(2.0, 5.0, 1).to_vec(), vec![100.0]);
    }

    #[test]
    fn test_monotonic_detection() {
        assert!(monotonically_increasing(array![1.0, 2.0, 3.0].view()));
        assert!(!monotonically_increasing(array![1.0, 1.0, 3.0].view()));
        assert!(!monotonically_increasing(array![1.0, f64::NAN, 3.0].view()));
        assert!(monotonically_increasing(array![5.0].view()));
    }
}
