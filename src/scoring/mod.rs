//! Axis scorers: five independent lexical quality estimates per candidate.

pub mod axes;

pub use axes::{default_scorers, IndicatorScorer};

use crate::core::{Axis, Candidate, UnitInterval};
use crate::detection::DetectionContext;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Score on one axis, with the keywords that moved it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisScore {
    pub value: UnitInterval,
    pub confidence: UnitInterval,
    /// Positive indicators found
    #[serde(default)]
    pub evidence: Vec<String>,
    /// Negative indicators found
    #[serde(default)]
    pub counterevidence: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

impl AxisScore {
    pub fn new(value: f64, confidence: f64) -> Self {
        Self {
            value: UnitInterval::new(value),
            confidence: UnitInterval::new(confidence),
            evidence: Vec::new(),
            counterevidence: Vec::new(),
            notes: String::new(),
        }
    }
}

pub trait AxisScorer: Send + Sync {
    fn axis(&self) -> Axis;

    fn score(&self, candidate: &Candidate, context: Option<&DetectionContext>) -> AxisScore;
}

/// Run every scorer once, keyed by the axis it reports.
///
/// A scorer that panics reports a zero score with zero confidence for its
/// axis; the other scorers still run.
pub fn score_all(
    scorers: &[Box<dyn AxisScorer>],
    candidate: &Candidate,
    context: Option<&DetectionContext>,
) -> BTreeMap<Axis, AxisScore> {
    scorers
        .iter()
        .map(|scorer| {
            let axis = scorer.axis();
            let score = catch_unwind(AssertUnwindSafe(|| scorer.score(candidate, context)))
                .unwrap_or_else(|_| {
                    tracing::warn!(
                        %axis,
                        candidate = %candidate.id,
                        "scorer failed; scoring axis as zero"
                    );
                    AxisScore {
                        notes: "scorer failed".to_string(),
                        ..AxisScore::new(0.0, 0.0)
                    }
                });
            (axis, score)
        })
        .collect()
}
