pub mod score_types;

pub use score_types::UnitInterval;

use crate::gate::GateResult;
use crate::scoring::AxisScore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Violation codes in their fixed processing order.
///
/// `W0` and `W1` are hard constraints: they can only be rejected or escalated,
/// never repaired. `W2`..`W4` are repairable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ViolationCode {
    /// Dignity or integrity breach: dehumanizing language, instruction override.
    W0,
    /// Domination: coercive control, elimination of others.
    W1,
    /// Manipulation or missing consent.
    W2,
    /// Dependency and lock-in.
    W3,
    /// Irreversibility.
    W4,
}

impl ViolationCode {
    pub const ALL: [ViolationCode; 5] = [
        ViolationCode::W0,
        ViolationCode::W1,
        ViolationCode::W2,
        ViolationCode::W3,
        ViolationCode::W4,
    ];

    /// Hard codes are permanently non-repairable.
    pub fn is_hard(self) -> bool {
        matches!(self, ViolationCode::W0 | ViolationCode::W1)
    }

    pub fn is_repairable(self) -> bool {
        !self.is_hard()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ViolationCode::W0 => "W0",
            ViolationCode::W1 => "W1",
            ViolationCode::W2 => "W2",
            ViolationCode::W3 => "W3",
            ViolationCode::W4 => "W4",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViolationCode::W0 => "dignity/integrity",
            ViolationCode::W1 => "domination",
            ViolationCode::W2 => "manipulation",
            ViolationCode::W3 => "lock-in",
            ViolationCode::W4 => "irreversibility",
        }
    }
}

impl std::fmt::Display for ViolationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Independent quality dimension scored for every surviving candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Safety,
    Fairness,
    Privacy,
    Autonomy,
    HarmAvoidance,
}

impl Axis {
    pub const ALL: [Axis; 5] = [
        Axis::Safety,
        Axis::Fairness,
        Axis::Privacy,
        Axis::Autonomy,
        Axis::HarmAvoidance,
    ];

    /// Position of this axis in [`Axis::ALL`], used for dense per-axis vectors.
    pub fn index(self) -> usize {
        match self {
            Axis::Safety => 0,
            Axis::Fairness => 1,
            Axis::Privacy => 2,
            Axis::Autonomy => 3,
            Axis::HarmAvoidance => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Axis::Safety => "safety",
            Axis::Fairness => "fairness",
            Axis::Privacy => "privacy",
            Axis::Autonomy => "autonomy",
            Axis::HarmAvoidance => "harm_avoidance",
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A text proposal flowing through one gate or selection run.
///
/// The repair stage may replace `text`; the id stays the same across versions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub scores: BTreeMap<Axis, AxisScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gate_result: Option<GateResult>,
}

impl Candidate {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            metadata: BTreeMap::new(),
            scores: BTreeMap::new(),
            gate_result: None,
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Next logical version of this candidate carrying rewritten text.
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            id: self.id.clone(),
            text: text.into(),
            metadata: self.metadata.clone(),
            scores: BTreeMap::new(),
            gate_result: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_order_is_fixed() {
        let mut codes = vec![
            ViolationCode::W3,
            ViolationCode::W0,
            ViolationCode::W4,
            ViolationCode::W1,
            ViolationCode::W2,
        ];
        codes.sort();
        assert_eq!(codes, ViolationCode::ALL.to_vec());
    }

    #[test]
    fn only_w0_and_w1_are_hard() {
        let hard: Vec<_> = ViolationCode::ALL
            .iter()
            .filter(|code| code.is_hard())
            .collect();
        assert_eq!(hard, vec![&ViolationCode::W0, &ViolationCode::W1]);
    }

    #[test]
    fn axis_index_matches_all_order() {
        for (i, axis) in Axis::ALL.iter().enumerate() {
            assert_eq!(axis.index(), i);
        }
    }

    #[test]
    fn candidate_deserializes_without_scores() {
        let candidate: Candidate =
            serde_json::from_str(r#"{"id": "c1", "text": "hello"}"#).unwrap();
        assert_eq!(candidate.id, "c1");
        assert!(candidate.metadata.is_empty());
        assert!(candidate.gate_result.is_none());
    }

    #[test]
    fn with_text_keeps_id_and_metadata() {
        let original = Candidate::new("c1", "before")
            .with_metadata("persona", serde_json::json!("analyst"));
        let next = original.with_text("after");
        assert_eq!(next.id, "c1");
        assert_eq!(next.text, "after");
        assert_eq!(next.metadata, original.metadata);
        assert_eq!(original.text, "before");
    }
}
