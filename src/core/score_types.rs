//! Clamped unit-interval scale shared by every stage of the gate.
//!
//! Strengths, confidences, severities, axis values and semantic drift all
//! live on the same `[0.0, 1.0]` scale. Encoding the scale in a newtype keeps
//! out-of-range values from leaking between stages: every value is clamped
//! when it is constructed, including when it is deserialized.
//!
//! # Examples
//!
//! ```rust
//! use policygate::core::UnitInterval;
//!
//! let strength = UnitInterval::new(0.85);
//! assert_eq!(strength.value(), 0.85);
//!
//! // Out-of-bounds values are clamped
//! assert_eq!(UnitInterval::new(1.7).value(), 1.0);
//! assert_eq!(UnitInterval::new(-0.2).value(), 0.0);
//!
//! // NaN collapses to the lower bound
//! assert_eq!(UnitInterval::new(f64::NAN).value(), 0.0);
//! ```

use serde::{Deserialize, Serialize};

/// Value on the `[0.0, 1.0]` scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct UnitInterval(f64);

impl UnitInterval {
    pub const ZERO: UnitInterval = UnitInterval(0.0);
    pub const ONE: UnitInterval = UnitInterval(1.0);

    /// Create a new value, clamping to `[0.0, 1.0]`.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            Self(0.0)
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    /// Get the raw value.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Complement `1 - x`, used by the probabilistic OR.
    pub fn complement(self) -> Self {
        Self(1.0 - self.0)
    }
}

impl From<f64> for UnitInterval {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<UnitInterval> for f64 {
    fn from(value: UnitInterval) -> Self {
        value.0
    }
}

impl std::fmt::Display for UnitInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_upper_bound() {
        assert_eq!(UnitInterval::new(3.0).value(), 1.0);
    }

    #[test]
    fn clamps_lower_bound() {
        assert_eq!(UnitInterval::new(-3.0).value(), 0.0);
    }

    #[test]
    fn complement_stays_in_range() {
        assert_eq!(UnitInterval::new(0.25).complement().value(), 0.75);
        assert_eq!(UnitInterval::ONE.complement(), UnitInterval::ZERO);
    }

    #[test]
    fn deserialization_clamps() {
        let value: UnitInterval = serde_json::from_str("1.5").unwrap();
        assert_eq!(value.value(), 1.0);
    }

    #[test]
    fn serializes_as_plain_number() {
        let json = serde_json::to_string(&UnitInterval::new(0.5)).unwrap();
        assert_eq!(json, "0.5");
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn always_in_bounds(value in -1000.0..1000.0f64) {
            let unit = UnitInterval::new(value);
            prop_assert!(unit.value() >= 0.0 && unit.value() <= 1.0);
        }

        #[test]
        fn clamping_preserves_order(a in -2.0..2.0f64, b in -2.0..2.0f64) {
            if a <= b {
                prop_assert!(UnitInterval::new(a) <= UnitInterval::new(b));
            }
        }
    }
}
