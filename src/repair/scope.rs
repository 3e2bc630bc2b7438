//! Stage 3: scope reduction.
//!
//! Fallback used when concept mapping and constraint injection changed
//! nothing on a pass. Softens absolute and unbounded quantifiers.

use super::{RepairAction, RepairStage};
use once_cell::sync::Lazy;
use regex::Regex;

const DRIFT_PER_REDUCTION: f64 = 0.05;
const MAX_DRIFT: f64 = 0.2;

static SCOPE_TABLE: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"\bpermanently\b", "for a defined, reviewable period"),
        (r"\bpermanent\b", "time-limited"),
        (r"\bforever\b", "for a defined period"),
        (
            r"\b(?:all|every)\s+(users|people|customers|competitors|humans)\b",
            "selected ${1}",
        ),
        (r"\beveryone\b", "participating stakeholders"),
        (r"\balways\b", "where appropriate"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        let regex = Regex::new(&format!("(?i){pattern}"))
            .unwrap_or_else(|e| panic!("invalid scope pattern {pattern:?}: {e}"));
        (regex, replacement)
    })
    .collect()
});

/// Apply the whole scope table as one action, or `None` if nothing matched.
pub fn reduce(text: &mut String, iteration: usize) -> Option<RepairAction> {
    let before = text.clone();
    let mut reductions = 0usize;

    for (pattern, replacement) in SCOPE_TABLE.iter() {
        let count = pattern.find_iter(text.as_str()).count();
        if count > 0 {
            reductions += count;
            *text = pattern.replace_all(text.as_str(), *replacement).into_owned();
        }
    }

    if reductions == 0 || *text == before {
        return None;
    }

    Some(RepairAction::new(
        RepairStage::ScopeReduction,
        format!("narrowed {reductions} unbounded quantifier(s)"),
        before,
        text.clone(),
        (DRIFT_PER_REDUCTION * reductions as f64).min(MAX_DRIFT),
        iteration,
    ))
}
