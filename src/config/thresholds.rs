use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};

/// Gate decision thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Impact at or above which a hard violation rejects outright (default: 0.6)
    #[serde(default = "default_tau_reject")]
    pub tau_reject: f64,

    /// Impact at or above which a violation must be repaired (default: 0.3)
    #[serde(default = "default_tau_repair")]
    pub tau_repair: f64,

    /// Maximum repair passes per candidate (default: 2)
    #[serde(default = "default_max_repairs")]
    pub max_repairs: usize,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            tau_reject: default_tau_reject(),
            tau_repair: default_tau_repair(),
            max_repairs: default_max_repairs(),
        }
    }
}

impl GateConfig {
    pub fn validate(&self) -> Result<()> {
        validate_unit(self.tau_reject, "tau_reject")?;
        validate_unit(self.tau_repair, "tau_repair")?;
        if self.tau_repair > self.tau_reject {
            return Err(Error::Configuration(format!(
                "tau_repair ({:.2}) must not exceed tau_reject ({:.2})",
                self.tau_repair, self.tau_reject
            )));
        }
        Ok(())
    }
}

/// Check that a threshold lies in `[0.0, 1.0]` and is finite.
pub(crate) fn validate_unit(value: f64, name: &str) -> Result<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::Configuration(format!(
            "{name} must be between 0.0 and 1.0, got {value}"
        )))
    }
}

fn default_tau_reject() -> f64 {
    0.6
}
fn default_tau_repair() -> f64 {
    0.3
}
fn default_max_repairs() -> usize {
    2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = GateConfig::default();
        assert_eq!(config.tau_reject, 0.6);
        assert_eq!(config.tau_repair, 0.3);
        assert_eq!(config.max_repairs, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let config = GateConfig {
            tau_reject: 1.2,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_nan_threshold() {
        let config = GateConfig {
            tau_repair: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let config: GateConfig = toml::from_str("max_repairs = 5").unwrap();
        assert_eq!(config.max_repairs, 5);
        assert_eq!(config.tau_reject, 0.6);
    }
}
