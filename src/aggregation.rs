//! Violation aggregation.
//!
//! Evidence is grouped by violation code and combined with a probabilistic OR,
//! so one strong signal is enough to indicate a violation while several weak
//! signals still compound:
//!
//! ```text
//! severity   = 1 - Π(1 - strength_i)
//! confidence = 1 - Π(1 - confidence_i)
//! ```
//!
//! The result is independent of evidence order: groups are keyed in a
//! `BTreeMap` and the factors inside each group are multiplied in sorted
//! order, so permuting the input yields bit-identical output.

use crate::core::{UnitInterval, ViolationCode};
use crate::detection::Evidence;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Aggregated, code-classified conclusion for one evaluation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub code: ViolationCode,
    pub severity: UnitInterval,
    pub confidence: UnitInterval,
    pub repairable: bool,
    pub evidence: Vec<Evidence>,
    pub suggested_repairs: Vec<String>,
}

impl Violation {
    pub fn impact_score(&self) -> f64 {
        self.severity.value() * self.confidence.value()
    }

    pub fn is_hard(&self) -> bool {
        self.code.is_hard()
    }
}

/// Combine evidence into one violation per code, sorted by code.
pub fn aggregate_evidence_to_violations(evidence: &[Evidence]) -> Vec<Violation> {
    let mut groups: BTreeMap<ViolationCode, Vec<&Evidence>> = BTreeMap::new();
    for item in evidence {
        groups.entry(item.code).or_default().push(item);
    }

    groups
        .into_iter()
        .map(|(code, items)| build_violation(code, items))
        .collect()
}

fn build_violation(code: ViolationCode, mut items: Vec<&Evidence>) -> Violation {
    items.sort_by(|a, b| compare_evidence(a, b));

    let severity = probabilistic_or(items.iter().map(|e| e.strength));
    let confidence = probabilistic_or(items.iter().map(|e| e.confidence));

    Violation {
        code,
        severity,
        confidence,
        repairable: code.is_repairable(),
        evidence: items.into_iter().cloned().collect(),
        suggested_repairs: suggested_repairs(code)
            .iter()
            .map(|s| s.to_string())
            .collect(),
    }
}

/// `1 - Π(1 - p_i)`, multiplied in ascending order of `p_i`.
pub fn probabilistic_or(values: impl Iterator<Item = UnitInterval>) -> UnitInterval {
    let mut values: Vec<f64> = values.map(UnitInterval::value).collect();
    values.sort_by(f64::total_cmp);
    let miss = values.iter().fold(1.0, |acc, p| acc * (1.0 - p));
    UnitInterval::new(1.0 - miss)
}

fn compare_evidence(a: &Evidence, b: &Evidence) -> Ordering {
    a.detector_id
        .cmp(&b.detector_id)
        .then_with(|| a.span.cmp(&b.span))
        .then_with(|| a.message.cmp(&b.message))
        .then_with(|| a.strength.value().total_cmp(&b.strength.value()))
        .then_with(|| a.confidence.value().total_cmp(&b.confidence.value()))
        .then_with(|| a.tags.cmp(&b.tags))
}

/// Advisory, human-readable repair suggestions per code.
pub fn suggested_repairs(code: ViolationCode) -> &'static [&'static str] {
    match code {
        ViolationCode::W0 => &[
            "Remove dehumanizing or instruction-override language",
            "Route to human review; this class cannot be repaired automatically",
        ],
        ViolationCode::W1 => &[
            "Replace domination framing with collaboration",
            "Remove any intent to eliminate or coerce others",
        ],
        ViolationCode::W2 => &[
            "Obtain informed consent",
            "Disclose intent and mechanics transparently",
        ],
        ViolationCode::W3 => &[
            "Offer data portability",
            "Provide a clear exit path without penalty",
        ],
        ViolationCode::W4 => &[
            "Introduce staged, reversible steps",
            "Require human review before lasting changes",
        ],
    }
}
