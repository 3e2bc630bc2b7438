//! Stage 1: destructive-to-constructive concept substitution.

use super::{RepairAction, RepairStage};
use once_cell::sync::Lazy;
use regex::Regex;

/// Drift contributed per substituted occurrence.
const DRIFT_PER_SUBSTITUTION: f64 = 0.1;
/// Ceiling on drift for one mapping entry.
const MAX_DRIFT: f64 = 0.3;

pub struct ConceptMapping {
    pub pattern: Regex,
    pub replacement: &'static str,
    pub label: &'static str,
}

fn mapping(pattern: &str, replacement: &'static str, label: &'static str) -> ConceptMapping {
    ConceptMapping {
        pattern: Regex::new(&format!("(?i){pattern}"))
            .unwrap_or_else(|e| panic!("invalid concept pattern {pattern:?}: {e}")),
        replacement,
        label,
    }
}

pub static CONCEPT_TABLE: Lazy<Vec<ConceptMapping>> = Lazy::new(|| {
    vec![
        mapping(r"\bdominat(?:e|es|ing)\b", "collaborate with", "dominate"),
        mapping(r"\bdomination\b", "collaboration", "domination"),
        mapping(r"\bcrush\b", "outperform", "crush"),
        mapping(r"\beliminate\b", "address", "eliminate"),
        mapping(r"\block[-\s]?in\b", "provide flexible commitment to", "lock-in"),
        mapping(
            r"\bmake\s+(them|users|customers|people)\s+(?:dependent|reliant)\b",
            "support ${1} in becoming self-sufficient",
            "engineered dependence",
        ),
        mapping(r"\b(?:trap|captive)\s+(users|customers|audiences?)\b", "retain ${1} by choice", "captive users"),
        mapping(r"\b(?:cannot|can't)\s+(leave|cancel|export|switch)\b", "can ${1} at any time", "blocked exit"),
        mapping(r"\bmanipulat(?:e|es|ing)\b", "inform", "manipulate"),
        mapping(r"\bmanipulation\b", "transparent communication", "manipulation"),
        mapping(r"\btrick\s+(users|people|customers|them)\s+into\b", "clearly invite ${1} to consider", "trick"),
        mapping(
            r"\bwithout\s+(?:their\s+)?(?:consent|knowledge|telling\s+them)\b",
            "with their informed consent",
            "without consent",
        ),
        mapping(r"\bdark\s+patterns?\b", "clear design choices", "dark patterns"),
        mapping(r"\bhidden\s+(fees|terms|tracking)\b", "disclosed ${1}", "hidden terms"),
        mapping(
            r"\bexploit\s+(their|users'?|human)\s+",
            "respect ${1} ",
            "exploit",
        ),
        mapping(r"\birreversibl(e|y)\b", "reversibl${1}", "irreversible"),
        mapping(
            r"\b(?:cannot|can't|can\s+not)\s+be\s+(undone|reversed)\b",
            "can be reviewed and ${1}",
            "cannot be undone",
        ),
        mapping(r"\bno\s+(?:way|going|turning)\s+back\b", "a clear path back", "no way back"),
        mapping(
            r"\b(?:destroy|erase)\s+(?:all|every|the\s+entire)\b",
            "carefully retire selected",
            "wholesale destruction",
        ),
    ]
});

/// Apply every matching table entry in order. Each entry that matched
/// produces one action; `text` is updated in place.
pub fn apply(text: &mut String, iteration: usize) -> Vec<RepairAction> {
    let mut actions = Vec::new();

    for entry in CONCEPT_TABLE.iter() {
        let count = entry.pattern.find_iter(text.as_str()).count();
        if count == 0 {
            continue;
        }
        let after = entry
            .pattern
            .replace_all(text.as_str(), entry.replacement)
            .into_owned();
        if after == *text {
            continue;
        }
        actions.push(RepairAction::new(
            RepairStage::ConceptMapping,
            format!(
                "mapped '{}' ({} occurrence{}) to '{}'",
                entry.label,
                count,
                if count == 1 { "" } else { "s" },
                entry.replacement.replace("${1}", "…")
            ),
            text.clone(),
            after.clone(),
            (DRIFT_PER_SUBSTITUTION * count as f64).min(MAX_DRIFT),
            iteration,
        ));
        *text = after;
    }

    actions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_lock_in_case_insensitively() {
        let mut text = "Our design uses Lock-In to keep users.".to_string();
        let actions = apply(&mut text, 1);
        assert_eq!(actions.len(), 1);
        assert_eq!(text, "Our design uses provide flexible commitment to to keep users.");
        assert_eq!(actions[0].before_text, "Our design uses Lock-In to keep users.");
        assert_eq!(actions[0].after_text, text);
    }

    #[test]
    fn drift_scales_with_count_and_is_capped() {
        let mut once = "eliminate".to_string();
        let mut many = "eliminate eliminate eliminate eliminate eliminate".to_string();
        let a = apply(&mut once, 1);
        let b = apply(&mut many, 1);
        assert!((a[0].semantic_drift.value() - 0.1).abs() < 1e-12);
        assert!((b[0].semantic_drift.value() - MAX_DRIFT).abs() < 1e-12);
    }

    #[test]
    fn capture_groups_are_preserved() {
        let mut text = "There are hidden fees.".to_string();
        apply(&mut text, 1);
        assert_eq!(text, "There are disclosed fees.");
    }

    #[test]
    fn no_match_means_no_action() {
        let mut text = "A calm and helpful plan.".to_string();
        assert!(apply(&mut text, 1).is_empty());
        assert_eq!(text, "A calm and helpful plan.");
    }
}
