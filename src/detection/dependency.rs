//! Dependency and lock-in language (W3).

use super::rules::{LexicalDetector, PatternRule};
use crate::core::ViolationCode::W3;
use once_cell::sync::Lazy;

pub const DETECTOR_ID: &str = "dependency";

pub static RULES: Lazy<Vec<PatternRule>> = Lazy::new(|| {
    vec![
        PatternRule::new(
            W3,
            r"\bmake\s+(?:them|users|customers|people)\s+(?:dependent|reliant)\b",
            0.6,
            0.7,
            "engineered dependence",
        ),
        PatternRule::new(
            W3,
            r"\b(?:trap|captive)\s+(?:users|customers|audiences?)\b",
            0.6,
            0.7,
            "captive users",
        ),
        PatternRule::new(W3, r"\block[-\s]?in\b", 0.55, 0.7, "lock-in"),
        PatternRule::new(
            W3,
            r"\b(?:cannot|can't)\s+(?:leave|cancel|export|switch)\b",
            0.45,
            0.6,
            "blocked exit",
        ),
        PatternRule::new(
            W3,
            r"\bkeep\s+(?:users|customers|people|them)\s+from\s+leaving\b",
            0.25,
            0.4,
            "retention pressure",
        ),
        PatternRule::new(W3, r"\bswitching\s+costs?\b", 0.3, 0.5, "switching costs"),
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

    #[test]
    fn fires_on_lock_in_variants() {
        for text in ["vendor lock-in", "a lock in strategy", "LOCKIN"] {
            let evidence = detector().detect(&Candidate::new("t", text), None);
            assert_eq!(evidence.len(), 1, "{text}");
        }
    }

    #[test]
    fn retention_phrase_alone_is_weak() {
        let evidence = detector().detect(
            &Candidate::new("t", "We keep users from leaving with better service."),
            None,
        );
        assert_eq!(evidence.len(), 1);
        let impact = evidence[0].strength.value() * evidence[0].confidence.value();
        assert!(impact < 0.3);
    }

    #[test]
    fn ignores_blocks_and_locks() {
        let evidence = detector().detect(
            &Candidate::new("t", "Unlock insights from the block layer."),
            None,
        );
        assert!(evidence.is_empty());
    }
}
