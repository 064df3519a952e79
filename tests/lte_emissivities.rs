//! Integration test: LTE emissivities for a grey (constant opacity) grain.
//!
//! With `kappa = 1 cm^2/g` everywhere the Planck-mean opacity is exactly one,
//! so the specific energy of each column reduces to `4 sigma T^4`.

use approx::assert_relative_eq;
use ndarray::Array1;

use dust_emissivities::constants::STEFAN_BOLTZMANN;
use dust_emissivities::grid::{merge_frequency_grid, CoverageWarning};
use dust_emissivities::numeric::{b_nu_spectrum, integrate_loglog, logspace, planck_nu_range};
use dust_emissivities::{Emissivities, OpacityModel, TabulatedOpacity};

const N_TEMP: usize = 10;
const T_MIN: f64 = 10.0;
const T_MAX: f64 = 1000.0;

fn grey_opacity() -> TabulatedOpacity {
    TabulatedOpacity::new(logspace(10.0, 20.0, 50), Array1::ones(50)).expect("valid opacity")
}

fn solved() -> (TabulatedOpacity, Emissivities) {
    let opacity = grey_opacity();
    let mut e = Emissivities::new();
    e.set_lte(&opacity, N_TEMP, T_MIN, T_MAX).expect("LTE solve should succeed");
    (opacity, e)
}

#[test]
fn test_grey_grain_table_shape_and_signs() {
    let (opacity, e) = solved();

    let merge = merge_frequency_grid(planck_nu_range(T_MIN, T_MAX).view(), opacity.nu());
    // The 10 K Planck support reaches below 1e10 Hz.
    assert_eq!(merge.warnings, vec![CoverageWarning::LowTemperature]);

    let nu = e.nu().unwrap();
    let var = e.var().unwrap();
    let jnu = e.jnu().unwrap();
    assert_eq!(nu, &merge.nu);
    assert_eq!(var.len(), N_TEMP);
    assert_eq!(jnu.dim(), (nu.len(), N_TEMP));
    assert!(jnu.iter().all(|&v| v >= 0.0));
    assert!((1..N_TEMP).all(|i| var[i] > var[i - 1]));
}

#[test]
fn test_grey_grain_specific_energy_follows_stefan_boltzmann() {
    let (opacity, e) = solved();
    let nu = e.nu().unwrap();
    let var = e.var().unwrap();
    let temperatures = logspace(T_MIN.log10(), T_MAX.log10(), N_TEMP);

    for (i, &t) in temperatures.iter().enumerate() {
        let bnu = b_nu_spectrum(nu.view(), t);
        let kappa_planck = opacity.planck_mean_opacity(nu.view(), bnu.view());
        assert_relative_eq!(kappa_planck, 1.0, max_relative = 1e-12);
        assert_relative_eq!(
            var[i],
            4.0 * STEFAN_BOLTZMANN * t.powi(4) * kappa_planck,
            max_relative = 1e-12
        );
    }
}

#[test]
fn test_grey_grain_columns_are_planck_spectra() {
    let (_, e) = solved();
    let nu = e.nu().unwrap();
    let jnu = e.jnu().unwrap();
    let t = T_MAX;
    let expected = b_nu_spectrum(nu.view(), t);
    for (got, want) in jnu.column(N_TEMP - 1).iter().zip(expected.iter()) {
        assert_relative_eq!(*got, *want, max_relative = 1e-9);
    }
}

#[test]
fn test_normalized_columns_integrate_to_one() {
    let (_, mut e) = solved();
    e.normalize().expect("table is complete");

    let nu = e.nu().unwrap();
    let jnu = e.jnu().unwrap();
    for column in jnu.columns() {
        let per_nu = &column / nu;
        assert_relative_eq!(integrate_loglog(nu.view(), per_nu.view()), 1.0, max_relative = 1e-10);
    }
}

#[test]
fn test_renormalizing_is_stable() {
    let (_, mut e) = solved();
    e.normalize().unwrap();
    let once = e.jnu().unwrap().clone();
    e.normalize().unwrap();
    for (a, b) in once.iter().zip(e.jnu().unwrap().iter()) {
        assert_relative_eq!(*a, *b, max_relative = 1e-10);
    }
}

#[test]
fn test_solve_is_deterministic() {
    let (_, a) = solved();
    let (_, b) = solved();
    assert_eq!(a.hash().unwrap(), b.hash().unwrap());
}
