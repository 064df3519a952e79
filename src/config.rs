use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

/// Temperature sampling for an LTE emissivity table.
///
/// Any field missing from a config file keeps its default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LteConfig {
    /// Number of temperatures (columns of the table).
    pub n_temp: usize,
    /// Lowest dust temperature (K).
    pub temp_min: f64,
    /// Highest dust temperature (K).
    pub temp_max: f64,
}

impl Default for LteConfig {
    fn default() -> Self {
        Self {
            n_temp: 1200,
            temp_min: 0.1,
            temp_max: 100_000.0,
        }
    }
}

impl LteConfig {
    /// Read a JSON config file, e.g. `{ "n_temp": 400, "temp_max": 2000.0 }`.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: LteConfig = serde_json::from_str(&text).context("parsing config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject sampling ranges that cannot produce a valid table.
    pub fn validate(&self) -> Result<()> {
        if self.n_temp == 0 {
            bail!("n_temp must be at least 1");
        }
        if !(self.temp_min > 0.0) {
            bail!("temp_min must be positive, got {}", self.temp_min);
        }
        if !(self.temp_max >= self.temp_min) {
            bail!(
                "temp_max ({}) must not be below temp_min ({})",
                self.temp_max,
                self.temp_min
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "n_temp": 40, "temp_max": 2000.0 }}"#).unwrap();
        let config = LteConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.n_temp, 40);
        assert_eq!(config.temp_min, 0.1);
        assert_eq!(config.temp_max, 2000.0);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "ntemp": 40 }}"#).unwrap();
        assert!(LteConfig::from_json_file(file.path()).is_err());
    }

    #[test]
    fn test_validate_ranges() {
        assert!(LteConfig::default().validate().is_ok());
        let bad = LteConfig { n_temp: 0, ..Default::default() };
        assert!(bad.validate().is_err());
        let bad = LteConfig { temp_min: 10.0, temp_max: 1.0, ..Default::default() };
        assert!(bad.validate().is_err());
    }
}
