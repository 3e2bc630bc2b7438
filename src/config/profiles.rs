//! Context profiles: per-axis floors, targets and weight ranges.
//!
//! A profile reflects the deployment domain. Built-in profiles:
//! - **default**: balanced floors, safety and harm avoidance weighted slightly higher
//! - **disaster**: safety and harm avoidance dominate; privacy and autonomy relaxed
//! - **medical**: strict privacy and safety floors
//! - **education**: fairness and autonomy emphasized
//!
//! # Example
//!
//! ```rust
//! use policygate::config::profiles::ProfileName;
//! use policygate::core::Axis;
//!
//! let medical = ProfileName::Medical.to_profile();
//! assert!(medical.axis(Axis::Privacy).e_min > ProfileName::Default.to_profile().axis(Axis::Privacy).e_min);
//! ```

use super::thresholds::validate_unit;
use crate::core::Axis;
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Floor, target and sampling range for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisProfile {
    /// Minimum acceptable value; below it the candidate is filtered out
    pub e_min: f64,
    /// Ideal value; no credit is given above it
    pub e_target: f64,
    /// `(low, high)` bounds for weight sampling
    pub weight_range: (f64, f64),
}

impl AxisProfile {
    pub const fn new(e_min: f64, e_target: f64, low: f64, high: f64) -> Self {
        Self {
            e_min,
            e_target,
            weight_range: (low, high),
        }
    }

    pub fn weight_midpoint(&self) -> f64 {
        (self.weight_range.0 + self.weight_range.1) / 2.0
    }

    pub fn validate(&self, axis: Axis) -> Result<()> {
        validate_unit(self.e_min, &format!("{axis}.e_min"))?;
        validate_unit(self.e_target, &format!("{axis}.e_target"))?;
        if self.e_min > self.e_target {
            return Err(Error::Configuration(format!(
                "{axis}: e_min ({}) must not exceed e_target ({})",
                self.e_min, self.e_target
            )));
        }
        let (low, high) = self.weight_range;
        if !(low.is_finite() && high.is_finite()) || low < 0.0 || low > high {
            return Err(Error::Configuration(format!(
                "{axis}: weight_range ({low}, {high}) must satisfy 0 <= low <= high"
            )));
        }
        Ok(())
    }
}

/// One `AxisProfile` per axis, selected by deployment context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextProfile {
    #[serde(default)]
    pub name: String,
    pub safety: AxisProfile,
    pub fairness: AxisProfile,
    pub privacy: AxisProfile,
    pub autonomy: AxisProfile,
    pub harm_avoidance: AxisProfile,
}

impl ContextProfile {
    pub fn axis(&self, axis: Axis) -> &AxisProfile {
        match axis {
            Axis::Safety => &self.safety,
            Axis::Fairness => &self.fairness,
            Axis::Privacy => &self.privacy,
            Axis::Autonomy => &self.autonomy,
            Axis::HarmAvoidance => &self.harm_avoidance,
        }
    }

    pub fn axis_mut(&mut self, axis: Axis) -> &mut AxisProfile {
        match axis {
            Axis::Safety => &mut self.safety,
            Axis::Fairness => &mut self.fairness,
            Axis::Privacy => &mut self.privacy,
            Axis::Autonomy => &mut self.autonomy,
            Axis::HarmAvoidance => &mut self.harm_avoidance,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for axis in Axis::ALL {
            self.axis(axis).validate(axis)?;
        }
        let total: f64 = Axis::ALL.iter().map(|&a| self.axis(a).weight_range.1).sum();
        if total <= 0.0 {
            return Err(Error::Configuration(format!(
                "profile '{}': at least one axis needs a positive weight",
                self.name
            )));
        }
        Ok(())
    }

    /// Weight-range midpoints normalized to sum to 1.
    ///
    /// Used wherever a single fixed weighting is needed (D2, D∞, TOPSIS).
    pub fn midpoint_weights(&self) -> [f64; 5] {
        let raw = Axis::ALL.map(|a| self.axis(a).weight_midpoint());
        normalize_weights(raw)
    }

    pub fn weight_ranges(&self) -> BTreeMap<Axis, (f64, f64)> {
        Axis::ALL
            .iter()
            .map(|&a| (a, self.axis(a).weight_range))
            .collect()
    }
}

/// A `[profiles.<name>]` table from the config file.
///
/// Axes left out are taken from the built-in profile of the same name, or
/// from `default` when the name is new.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety: Option<AxisProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fairness: Option<AxisProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy: Option<AxisProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autonomy: Option<AxisProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub harm_avoidance: Option<AxisProfile>,
}

impl ProfileOverride {
    pub fn axis(&self, axis: Axis) -> Option<AxisProfile> {
        match axis {
            Axis::Safety => self.safety,
            Axis::Fairness => self.fairness,
            Axis::Privacy => self.privacy,
            Axis::Autonomy => self.autonomy,
            Axis::HarmAvoidance => self.harm_avoidance,
        }
    }

    /// Resolve against the built-in base for `name`.
    pub fn resolve(&self, name: &str) -> ContextProfile {
        let mut profile = ProfileName::parse(name)
            .unwrap_or(ProfileName::Default)
            .to_profile();
        profile.name = name.to_string();
        for axis in Axis::ALL {
            if let Some(overridden) = self.axis(axis) {
                *profile.axis_mut(axis) = overridden;
            }
        }
        profile
    }
}

impl From<ContextProfile> for ProfileOverride {
    fn from(profile: ContextProfile) -> Self {
        Self {
            safety: Some(profile.safety),
            fairness: Some(profile.fairness),
            privacy: Some(profile.privacy),
            autonomy: Some(profile.autonomy),
            harm_avoidance: Some(profile.harm_avoidance),
        }
    }
}

/// Scale `weights` to sum to 1; all-zero input becomes uniform.
pub fn normalize_weights(weights: [f64; 5]) -> [f64; 5] {
    let sum: f64 = weights.iter().sum();
    if sum > 0.0 {
        weights.map(|w| w / sum)
    } else {
        [0.2; 5]
    }
}

/// Built-in profile names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileName {
    Default,
    Disaster,
    Medical,
    Education,
}

impl ProfileName {
    pub const ALL: [ProfileName; 4] = [
        ProfileName::Default,
        ProfileName::Disaster,
        ProfileName::Medical,
        ProfileName::Education,
    ];

    pub fn to_profile(self) -> ContextProfile {
        let name = self.as_str().to_string();
        match self {
            ProfileName::Default => ContextProfile {
                name,
                safety: AxisProfile::new(0.4, 0.9, 0.2, 0.3),
                fairness: AxisProfile::new(0.4, 0.9, 0.15, 0.25),
                privacy: AxisProfile::new(0.4, 0.9, 0.15, 0.25),
                autonomy: AxisProfile::new(0.4, 0.9, 0.1, 0.2),
                harm_avoidance: AxisProfile::new(0.4, 0.9, 0.2, 0.3),
            },
            ProfileName::Disaster => ContextProfile {
                name,
                safety: AxisProfile::new(0.5, 0.95, 0.25, 0.4),
                fairness: AxisProfile::new(0.4, 0.9, 0.15, 0.25),
                privacy: AxisProfile::new(0.3, 0.8, 0.05, 0.15),
                autonomy: AxisProfile::new(0.3, 0.8, 0.05, 0.15),
                harm_avoidance: AxisProfile::new(0.5, 0.95, 0.25, 0.4),
            },
            ProfileName::Medical => ContextProfile {
                name,
                safety: AxisProfile::new(0.6, 0.95, 0.25, 0.35),
                fairness: AxisProfile::new(0.4, 0.9, 0.1, 0.2),
                privacy: AxisProfile::new(0.6, 0.95, 0.25, 0.35),
                autonomy: AxisProfile::new(0.5, 0.9, 0.15, 0.25),
                harm_avoidance: AxisProfile::new(0.5, 0.95, 0.15, 0.25),
            },
            ProfileName::Education => ContextProfile {
                name,
                safety: AxisProfile::new(0.4, 0.9, 0.1, 0.2),
                fairness: AxisProfile::new(0.5, 0.95, 0.25, 0.35),
                privacy: AxisProfile::new(0.5, 0.9, 0.15, 0.25),
                autonomy: AxisProfile::new(0.5, 0.9, 0.2, 0.3),
                harm_avoidance: AxisProfile::new(0.4, 0.9, 0.1, 0.2),
            },
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "default" => Some(ProfileName::Default),
            "disaster" => Some(ProfileName::Disaster),
            "medical" => Some(ProfileName::Medical),
            "education" => Some(ProfileName::Education),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProfileName::Default => "default",
            ProfileName::Disaster => "disaster",
            ProfileName::Medical => "medical",
            ProfileName::Education => "education",
        }
    }
}

impl std::fmt::Display for ProfileName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProfileName {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ProfileName::parse(s).ok_or_else(|| Error::UnknownProfile {
            name: s.to_string(),
            available: ProfileName::ALL.iter().map(|p| p.to_string()).collect(),
        })
    }
}

impl Default for ContextProfile {
    fn default() -> Self {
        ProfileName::Default.to_profile()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_profiles_are_valid() {
        for name in ProfileName::ALL {
            let profile = name.to_profile();
            assert!(profile.validate().is_ok(), "{name}");
            assert_eq!(profile.name, name.as_str());
        }
    }

    #[test]
    fn midpoint_weights_sum_to_one() {
        for name in ProfileName::ALL {
            let sum: f64 = name.to_profile().midpoint_weights().iter().sum();
            assert!((sum - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn floor_above_target_is_invalid() {
        let mut profile = ContextProfile::default();
        profile.privacy = AxisProfile::new(0.95, 0.5, 0.1, 0.2);
        assert!(profile.validate().is_err());
    }

    #[test]
    fn inverted_weight_range_is_invalid() {
        let mut profile = ContextProfile::default();
        profile.safety = AxisProfile::new(0.4, 0.9, 0.3, 0.1);
        assert!(profile.validate().is_err());
    }

    #[test]
    fn unknown_name_lists_available() {
        let err = "orbital".parse::<ProfileName>().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("orbital"));
        assert!(message.contains("medical"));
    }

    #[test]
    fn override_keeps_builtin_axes_it_does_not_name() {
        let partial = ProfileOverride {
            privacy: Some(AxisProfile::new(0.8, 0.99, 0.3, 0.4)),
            ..ProfileOverride::default()
        };
        let medical = ProfileName::Medical.to_profile();
        let resolved = partial.resolve("medical");
        assert_eq!(resolved.privacy.e_min, 0.8);
        assert_eq!(resolved.safety, medical.safety);
        assert_eq!(resolved.harm_avoidance, medical.harm_avoidance);
    }

    #[test]
    fn override_with_new_name_starts_from_default() {
        let partial = ProfileOverride {
            safety: Some(AxisProfile::new(0.5, 0.9, 0.2, 0.4)),
            ..ProfileOverride::default()
        };
        let resolved = partial.resolve("newsroom");
        let base = ContextProfile::default();
        assert_eq!(resolved.name, "newsroom");
        assert_eq!(resolved.safety.weight_range, (0.2, 0.4));
        assert_eq!(resolved.fairness, base.fairness);
        assert_eq!(resolved.autonomy, base.autonomy);
    }

    #[test]
    fn normalize_all_zero_is_uniform() {
        assert_eq!(normalize_weights([0.0; 5]), [0.2; 5]);
    }
}
