//! Emissivities of dust in local thermodynamic equilibrium.
//!
//! At LTE the grain emits like a blackbody scaled by its absorption opacity
//! (Kirchhoff's law), so one table column per dust temperature is
//! `jnu = kappa(nu) B_nu(T)`, indexed by the specific energy the grain must
//! absorb to sit at that temperature, `4 sigma T^4 kappa_P(T)`.

use log::{debug, warn};
use ndarray::{Array1, Array2};

use super::model::{Emissivities, EmissivityVariable};
use super::opacity::OpacityModel;
use crate::config::LteConfig;
use crate::constants::STEFAN_BOLTZMANN;
use crate::error::EmissivityError;
use crate::grid::merge_frequency_grid;
use crate::numeric::{b_nu_spectrum, interp_loglog, logspace, planck_nu_range};

impl Emissivities {
    /// Fill the table with LTE emissivities for `n_temp` temperatures spaced
    /// logarithmically between `temp_min` and `temp_max`.
    ///
    /// The table is only replaced once every field has been validated; on
    /// error the previous contents are kept.
    pub fn set_lte<M: OpacityModel + ?Sized>(
        &mut self,
        opacity: &M,
        n_temp: usize,
        temp_min: f64,
        temp_max: f64,
    ) -> Result<(), EmissivityError> {
        let temperatures = logspace(temp_min.log10(), temp_max.log10(), n_temp);

        let planck_nu = planck_nu_range(temp_min, temp_max);
        if planck_nu.is_empty() {
            return Err(EmissivityError::shape(
                "nu",
                format!("no Planck support for temperatures {temp_min} K to {temp_max} K"),
            ));
        }
        let merge = merge_frequency_grid(planck_nu.view(), opacity.nu());
        for warning in &merge.warnings {
            warn!("{warning}");
        }
        let nu = merge.nu;

        let kappa_nu = interp_loglog(opacity.nu(), opacity.kappa(), nu.view());

        let mut var = Array1::<f64>::zeros(n_temp);
        let mut jnu = Array2::<f64>::zeros((nu.len(), n_temp));

        for (it, &t) in temperatures.iter().enumerate() {
            let bnu = b_nu_spectrum(nu.view(), t);
            jnu.column_mut(it).assign(&(&kappa_nu * &bnu));

            let kappa_planck = opacity.planck_mean_opacity(nu.view(), bnu.view());
            var[it] = 4.0 * STEFAN_BOLTZMANN * t.powi(4) * kappa_planck;
        }

        debug!(
            "LTE emissivities: {} frequencies x {} temperatures ({temp_min} K to {temp_max} K)",
            nu.len(),
            n_temp
        );

        let mut table = Emissivities::new();
        table.set_is_lte(true);
        table.set_var_name(Some(EmissivityVariable::SpecificEnergy));
        table.set_nu(nu)?;
        table.set_var(var)?;
        table.set_jnu(jnu)?;

        *self = table;
        Ok(())
    }

    /// [`Emissivities::set_lte`] with the sampling taken from `config`.
    pub fn set_lte_with<M: OpacityModel + ?Sized>(
        &mut self,
        opacity: &M,
        config: &LteConfig,
    ) -> Result<(), EmissivityError> {
        self.set_lte(opacity, config.n_temp, config.temp_min, config.temp_max)
    }
}
