use std::fmt;
use std::str::FromStr;

use log::debug;
use ndarray::{Array1, Array2, ArrayD, Ix1, Ix2, IxDyn};
use sha2::{Digest, Sha256};

use crate::error::EmissivityError;
use crate::numeric::{integrate_loglog, monotonically_increasing};

// ---------------------------------------------------------------------------
// EmissivityVariable – what indexes the second axis of the table
// ---------------------------------------------------------------------------

/// The physical quantity the emissivities are tabulated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmissivityVariable {
    /// Specific energy absorbed (erg/s/g).
    SpecificEnergy,
}

impl EmissivityVariable {
    /// Name of the variable, also used as its column name on disk.
    pub fn name(&self) -> &'static str {
        match self {
            EmissivityVariable::SpecificEnergy => "specific_energy",
        }
    }

    /// Single-letter tag stored in the `emissvar` keyword.
    pub fn code(&self) -> &'static str {
        match self {
            EmissivityVariable::SpecificEnergy => "E",
        }
    }

    /// Inverse of [`EmissivityVariable::code`].
    pub fn from_code(code: &str) -> Result<Self, EmissivityError> {
        match code {
            "E" => Ok(EmissivityVariable::SpecificEnergy),
            other => Err(EmissivityError::UnsupportedVariable(other.to_string())),
        }
    }
}

impl FromStr for EmissivityVariable {
    type Err = EmissivityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "specific_energy" => Ok(EmissivityVariable::SpecificEnergy),
            other => Err(EmissivityError::UnsupportedVariable(other.to_string())),
        }
    }
}

impl fmt::Display for EmissivityVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// IntoNdArray – coercion of setter inputs
// ---------------------------------------------------------------------------

/// Values accepted by the [`Emissivities`] setters.
///
/// Plain sequences and nested rows are coerced into an n-dimensional array
/// so the setters can check dimensionality uniformly.
pub trait IntoNdArray {
    fn into_ndarray(self) -> Result<ArrayD<f64>, EmissivityError>;
}

impl IntoNdArray for ArrayD<f64> {
    fn into_ndarray(self) -> Result<ArrayD<f64>, EmissivityError> {
        Ok(self)
    }
}

impl IntoNdArray for Array1<f64> {
    fn into_ndarray(self) -> Result<ArrayD<f64>, EmissivityError> {
        Ok(self.into_dyn())
    }
}

impl IntoNdArray for Array2<f64> {
    fn into_ndarray(self) -> Result<ArrayD<f64>, EmissivityError> {
        Ok(self.into_dyn())
    }
}

impl IntoNdArray for Vec<f64> {
    fn into_ndarray(self) -> Result<ArrayD<f64>, EmissivityError> {
        Ok(Array1::from_vec(self).into_dyn())
    }
}

impl IntoNdArray for &[f64] {
    fn into_ndarray(self) -> Result<ArrayD<f64>, EmissivityError> {
        self.to_vec().into_ndarray()
    }
}

impl IntoNdArray for Vec<Vec<f64>> {
    fn into_ndarray(self) -> Result<ArrayD<f64>, EmissivityError> {
        let rows = self.len();
        let cols = self.first().map_or(0, Vec::len);
        if self.iter().any(|row| row.len() != cols) {
            return Err(EmissivityError::shape("array", "rows have unequal lengths"));
        }
        let flat: Vec<f64> = self.into_iter().flatten().collect();
        ArrayD::from_shape_vec(IxDyn(&[rows, cols]), flat)
            .map_err(|e| EmissivityError::shape("array", e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Emissivities – the invariant-enforcing table
// ---------------------------------------------------------------------------

/// Emissivity `jnu` tabulated on a frequency axis `nu` and a state variable
/// axis `var`.
///
/// Fields are only reachable through validating setters, so a stored table
/// always satisfies:
/// * `nu` and `var` are 1-D, non-empty, strictly increasing and positive;
/// * `jnu` exists only alongside `nu` and `var`, has shape
///   `(nu.len(), var.len())`, and holds no negative values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Emissivities {
    is_lte: bool,
    var_name: Option<EmissivityVariable>,
    var: Option<Array1<f64>>,
    nu: Option<Array1<f64>>,
    jnu: Option<Array2<f64>>,
}

impl Emissivities {
    /// An empty, non-LTE table.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_lte(&self) -> bool {
        self.is_lte
    }

    pub fn var_name(&self) -> Option<EmissivityVariable> {
        self.var_name
    }

    /// State variable values (one per column of `jnu`).
    pub fn var(&self) -> Option<&Array1<f64>> {
        self.var.as_ref()
    }

    /// Frequencies in Hz (one per row of `jnu`).
    pub fn nu(&self) -> Option<&Array1<f64>> {
        self.nu.as_ref()
    }

    pub fn jnu(&self) -> Option<&Array2<f64>> {
        self.jnu.as_ref()
    }

    pub fn set_is_lte(&mut self, is_lte: bool) {
        self.is_lte = is_lte;
    }

    pub fn set_var_name(&mut self, var_name: Option<EmissivityVariable>) {
        self.var_name = var_name;
    }

    /// Set the frequency axis.
    ///
    /// Fails if `jnu` is already set and the new axis has a different length.
    pub fn set_nu(&mut self, value: impl IntoNdArray) -> Result<(), EmissivityError> {
        let nu = validate_axis("nu", value)?;
        if let Some(jnu) = &self.jnu {
            if jnu.nrows() != nu.len() {
                return Err(EmissivityError::shape(
                    "nu",
                    format!("length {} does not match jnu with {} rows", nu.len(), jnu.nrows()),
                ));
            }
        }
        self.nu = Some(nu);
        Ok(())
    }

    /// Set the state variable axis.
    ///
    /// Fails if `jnu` is already set and the new axis has a different length.
    pub fn set_var(&mut self, value: impl IntoNdArray) -> Result<(), EmissivityError> {
        let var = validate_axis("var", value)?;
        if let Some(jnu) = &self.jnu {
            if jnu.ncols() != var.len() {
                return Err(EmissivityError::shape(
                    "var",
                    format!("length {} does not match jnu with {} columns", var.len(), jnu.ncols()),
                ));
            }
        }
        self.var = Some(var);
        Ok(())
    }

    /// Set the emissivities. `nu` and `var` must already be set.
    pub fn set_jnu(&mut self, value: impl IntoNdArray) -> Result<(), EmissivityError> {
        let n_nu = match &self.nu {
            Some(nu) => nu.len(),
            None => {
                return Err(EmissivityError::MissingDependency {
                    field: "jnu",
                    dependency: "nu",
                })
            }
        };
        let n_var = match &self.var {
            Some(var) => var.len(),
            None => {
                return Err(EmissivityError::MissingDependency {
                    field: "jnu",
                    dependency: "var",
                })
            }
        };

        let value = value.into_ndarray()?;
        let shape = value.shape().to_vec();
        let jnu = value
            .into_dimensionality::<Ix2>()
            .map_err(|_| EmissivityError::shape("jnu", format!("{shape:?} should be a 2-D array")))?;
        if jnu.dim() != (n_nu, n_var) {
            return Err(EmissivityError::shape(
                "jnu",
                format!("{shape:?} but expected ({n_nu}, {n_var})"),
            ));
        }
        if jnu.iter().any(|&v| v < 0.0) {
            return Err(EmissivityError::NegativeValue("jnu"));
        }

        self.jnu = Some(jnu);
        Ok(())
    }

    /// Whether the variable name, both axes and the emissivities are all set.
    pub fn all_set(&self) -> bool {
        self.var_name.is_some() && self.var.is_some() && self.nu.is_some() && self.jnu.is_some()
    }

    /// Borrow every field of a complete table.
    pub(crate) fn parts(
        &self,
    ) -> Result<(EmissivityVariable, &Array1<f64>, &Array1<f64>, &Array2<f64>), EmissivityError> {
        match (&self.var_name, &self.var, &self.nu, &self.jnu) {
            (Some(name), Some(var), Some(nu), Some(jnu)) => Ok((*name, var, nu, jnu)),
            _ => Err(EmissivityError::IncompleteTable),
        }
    }

    /// Scale every column of `jnu` so that `∫ jnu / nu dnu = 1`.
    ///
    /// Columns whose integral is zero or not finite are left unchanged.
    pub fn normalize(&mut self) -> Result<(), EmissivityError> {
        let (Some(nu), Some(jnu)) = (&self.nu, &mut self.jnu) else {
            return Err(EmissivityError::IncompleteTable);
        };

        for (ivar, mut column) in jnu.columns_mut().into_iter().enumerate() {
            let per_nu = &column / nu;
            let norm = integrate_loglog(nu.view(), per_nu.view());
            if norm.is_finite() && norm > 0.0 {
                column /= norm;
            } else {
                debug!("Cannot normalize emissivity column {ivar}: integral is {norm}");
            }
        }
        Ok(())
    }

    /// Content fingerprint of the table as a lowercase hex SHA-256 digest.
    ///
    /// Covers, in order: the LTE flag, the variable name, then the
    /// little-endian bytes of `var`, `nu` and `jnu` (row-major).
    pub fn hash(&self) -> Result<String, EmissivityError> {
        let (var_name, var, nu, jnu) = self.parts()?;

        let mut hasher = Sha256::new();
        hasher.update(self.is_lte.to_string().as_bytes());
        hasher.update(var_name.name().as_bytes());
        for value in var.iter().chain(nu.iter()).chain(jnu.iter()) {
            hasher.update(value.to_le_bytes());
        }
        Ok(format!("{:x}", hasher.finalize()))
    }
}

/// Shared checks for `nu` and `var`.
fn validate_axis(field: &'static str, value: impl IntoNdArray) -> Result<Array1<f64>, EmissivityError> {
    let value = value.into_ndarray()?;
    let shape = value.shape().to_vec();
    let axis = value
        .into_dimensionality::<Ix1>()
        .map_err(|_| EmissivityError::shape(field, format!("{shape:?} should be a 1-D sequence")))?;
    if axis.is_empty() {
        return Err(EmissivityError::shape(field, "should not be empty"));
    }
    if !monotonically_increasing(axis.view()) {
        return Err(EmissivityError::NotMonotonic(field));
    }
    if axis[0] <= 0.0 {
        return Err(EmissivityError::NonPositive(field));
    }
    Ok(axis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn complete_table() -> Emissivities {
        let mut e = Emissivities::new();
        e.set_var_name(Some(EmissivityVariable::SpecificEnergy));
        e.set_nu(vec![1e10, 1e11, 1e12]).unwrap();
        e.set_var(vec![1.0, 2.0]).unwrap();
        e.set_jnu(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
        e
    }

    #[test]
    fn test_new_table_is_empty() {
        let e = Emissivities::new();
        assert!(!e.is_lte());
        assert!(e.var_name().is_none());
        assert!(e.nu().is_none());
        assert!(!e.all_set());
    }

    #[test]
    fn test_valid_axis_is_stored_unchanged() {
        let mut e = Emissivities::new();
        e.set_nu(vec![1.0, 2.0, 5.0]).unwrap();
        assert_eq!(e.nu().unwrap(), &array![1.0, 2.0, 5.0]);
        e.set_var(&[0.5, 0.7][..]).unwrap();
        assert_eq!(e.var().unwrap(), &array![0.5, 0.7]);
    }

    #[test]
    fn test_axis_rejections_keep_previous_value() {
        let mut e = Emissivities::new();
        e.set_nu(vec![1.0, 2.0]).unwrap();

        assert_eq!(e.set_nu(vec![2.0, 1.0]), Err(EmissivityError::NotMonotonic("nu")));
        assert_eq!(e.set_nu(vec![0.0, 1.0]), Err(EmissivityError::NonPositive("nu")));
        assert_eq!(e.set_nu(vec![-3.0, -1.0]), Err(EmissivityError::NonPositive("nu")));
        assert!(matches!(
            e.set_nu(Array2::<f64>::ones((2, 2))),
            Err(EmissivityError::InvalidShape { field: "nu", .. })
        ));
        assert!(matches!(
            e.set_nu(Vec::<f64>::new()),
            Err(EmissivityError::InvalidShape { field: "nu", .. })
        ));

        assert_eq!(e.nu().unwrap(), &array![1.0, 2.0]);
    }

    #[test]
    fn test_jnu_requires_axes() {
        let mut e = Emissivities::new();
        assert_eq!(
            e.set_jnu(vec![vec![1.0]]),
            Err(EmissivityError::MissingDependency { field: "jnu", dependency: "nu" })
        );
        e.set_nu(vec![1.0]).unwrap();
        assert_eq!(
            e.set_jnu(vec![vec![1.0]]),
            Err(EmissivityError::MissingDependency { field: "jnu", dependency: "var" })
        );
    }

    #[test]
    fn test_jnu_shape_and_sign_checks() {
        let mut e = complete_table();
        let before = e.jnu().cloned();

        assert!(matches!(
            e.set_jnu(Array2::<f64>::zeros((2, 3))),
            Err(EmissivityError::InvalidShape { field: "jnu", .. })
        ));
        assert!(matches!(
            e.set_jnu(vec![1.0, 2.0, 3.0]),
            Err(EmissivityError::InvalidShape { field: "jnu", .. })
        ));
        assert!(matches!(
            e.set_jnu(vec![vec![1.0, 2.0], vec![3.0]]),
            Err(EmissivityError::InvalidShape { .. })
        ));
        assert_eq!(
            e.set_jnu(array![[1.0, 2.0], [3.0, -4.0], [5.0, 6.0]]),
            Err(EmissivityError::NegativeValue("jnu"))
        );

        assert_eq!(e.jnu().cloned(), before);
    }

    #[test]
    fn test_axis_length_must_track_existing_jnu() {
        let mut e = complete_table();
        assert!(e.set_nu(vec![1.0, 2.0]).is_err());
        assert!(e.set_var(vec![1.0, 2.0, 3.0]).is_err());
        assert!(e.set_nu(vec![1.0, 2.0, 3.0]).is_ok());
    }

    #[test]
    fn test_variable_tags() {
        assert_eq!(EmissivityVariable::from_code("E"), Ok(EmissivityVariable::SpecificEnergy));
        assert_eq!(
            EmissivityVariable::from_code("T"),
            Err(EmissivityError::UnsupportedVariable("T".into()))
        );
        assert_eq!(
            "specific_energy".parse::<EmissivityVariable>(),
            Ok(EmissivityVariable::SpecificEnergy)
        );
        assert!("temperature".parse::<EmissivityVariable>().is_err());
    }

    #[test]
    fn test_hash_is_deterministic() {
        let e = complete_table();
        let h1 = e.hash().unwrap();
        assert_eq!(h1, e.hash().unwrap());
        assert_eq!(h1.len(), 64);
    }

    #[test]
    fn test_hash_changes_with_each_field() {
        let base = complete_table();
        let h = base.hash().unwrap();

        let mut e = base.clone();
        e.set_is_lte(true);
        assert_ne!(e.hash().unwrap(), h);

        let mut e = base.clone();
        e.set_var(vec![1.0, 2.5]).unwrap();
        assert_ne!(e.hash().unwrap(), h);

        let mut e = base.clone();
        e.set_nu(vec![1e10, 1e11, 2e12]).unwrap();
        assert_ne!(e.hash().unwrap(), h);

        let mut e = base.clone();
        e.set_jnu(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.5]]).unwrap();
        assert_ne!(e.hash().unwrap(), h);
    }

    #[test]
    fn test_hash_requires_complete_table() {
        let mut e = complete_table();
        e.set_var_name(None);
        assert_eq!(e.hash(), Err(EmissivityError::IncompleteTable));
    }

    #[test]
    fn test_normalize_requires_jnu() {
        let mut e = Emissivities::new();
        e.set_nu(vec![1.0, 2.0]).unwrap();
        assert_eq!(e.normalize(), Err(EmissivityError::IncompleteTable));
    }

    #[test]
    fn test_normalize_skips_zero_columns() {
        let mut e = complete_table();
        e.set_jnu(vec![vec![0.0, 2.0], vec![0.0, 4.0], vec![0.0, 6.0]]).unwrap();
        e.normalize().unwrap();
        let jnu = e.jnu().unwrap();
        assert!(jnu.column(0).iter().all(|&v| v == 0.0));
        let nu = e.nu().unwrap();
        let per_nu = &jnu.column(1) / nu;
        let integral = integrate_loglog(nu.view(), per_nu.view());
        assert!((integral - 1.0).abs() < 1e-12);
    }
}
