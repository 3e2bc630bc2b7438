//! Irreversible-harm language.
//!
//! Explicit catastrophic harm to people is a domination-class hard violation
//! (W1); everything else is reported as irreversibility (W4).

use super::rules::{LexicalDetector, PatternRule};
use crate::core::ViolationCode::{W1, W4};
use once_cell::sync::Lazy;

pub const DETECTOR_ID: &str = "irreversible";

pub static RULES: Lazy<Vec<PatternRule>> = Lazy::new(|| {
    vec![
        PatternRule::new(
            W1,
            r"\b(?:kill|exterminate|wipe\s+out)\s+(?:all\s+)?(?:people|humans|them|the\s+population)\b",
            0.9,
            0.9,
            "catastrophic harm to people",
        ),
        PatternRule::new(
            W4,
            r"\b(?:cannot|can't|can\s+not)\s+be\s+(?:undone|reversed)\b",
            0.6,
            0.7,
            "cannot be undone",
        ),
        PatternRule::new(
            W4,
            r"\b(?:destroy|erase)\s+(?:all|every|the\s+entire)\b",
            0.6,
            0.7,
            "wholesale destruction",
        ),
        PatternRule::new(W4, r"\birreversibl[ey]\b", 0.55, 0.7, "irreversible"),
        PatternRule::new(
            W4,
            r"\bno\s+(?:way|going|turning)\s+back\b",
            0.5,
            0.6,
            "no way back",
        ),
        PatternRule::new(W4, r"\bpermanent(?:ly)?\b", 0.4, 0.6, "permanence"),
        PatternRule::new(W4, r"\bforever\b", 0.3, 0.5, "forever"),
        // Japanese
        PatternRule::new(W4, r"取り返しのつかない", 0.6, 0.7, "irreversible (ja)"),
    ]
});

pub fn detector() -> LexicalDetector {
    LexicalDetector::new(DETECTOR_ID, &RULES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Candidate;
    use crate::detection::Detector;

    fn codes(text: &str) -> Vec<crate::core::ViolationCode> {
        detector()
            .detect(&Candidate::new("t", text), None)
            .into_iter()
            .map(|e| e.code)
            .collect()
    }

    #[test]
    fn catastrophic_harm_is_hard() {
        assert_eq!(codes("The plan is to wipe out the population."), vec![W1]);
    }

    #[test]
    fn permanence_is_repairable_class() {
        assert_eq!(codes("This change applies permanently."), vec![W4]);
    }

    #[test]
    fn reversible_is_not_irreversible() {
        assert!(codes("Every step is reversible.").is_empty());
    }
}
