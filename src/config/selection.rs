use super::thresholds::validate_unit;
use crate::errors::{Error, Result};
use crate::selection::McdaMethod;
use serde::{Deserialize, Serialize};

/// Selection pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Minimum top score required to pick a winner without human review (default: 0.55)
    #[serde(default = "default_p_best_threshold")]
    pub p_best_threshold: f64,

    /// Monte Carlo draws for robust weight sampling (default: 2000)
    #[serde(default = "default_n_samples")]
    pub n_samples: usize,

    /// Ranking strategy used when the Pareto front has more than one member
    #[serde(default)]
    pub method: McdaMethod,

    /// Seed for weight sampling, so identical inputs select identically
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Context profile name (default: "default")
    #[serde(default = "default_profile")]
    pub profile: String,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            p_best_threshold: default_p_best_threshold(),
            n_samples: default_n_samples(),
            method: McdaMethod::default(),
            seed: default_seed(),
            profile: default_profile(),
        }
    }
}

impl SelectionConfig {
    pub fn validate(&self) -> Result<()> {
        validate_unit(self.p_best_threshold, "p_best_threshold")?;
        if self.n_samples == 0 {
            return Err(Error::Configuration(
                "n_samples must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_p_best_threshold() -> f64 {
    0.55
}
fn default_n_samples() -> usize {
    2000
}
fn default_seed() -> u64 {
    42
}
fn default_profile() -> String {
    "default".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SelectionConfig::default();
        assert_eq!(config.p_best_threshold, 0.55);
        assert_eq!(config.n_samples, 2000);
        assert_eq!(config.method, McdaMethod::RobustWeight);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_samples_rejected() {
        let config = SelectionConfig {
            n_samples: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn method_parses_from_kebab_case() {
        let config: SelectionConfig = toml::from_str(r#"method = "topsis""#).unwrap();
        assert_eq!(config.method, McdaMethod::Topsis);
        let config: SelectionConfig = toml::from_str(r#"method = "robust-weight""#).unwrap();
        assert_eq!(config.method, McdaMethod::RobustWeight);
    }
}
