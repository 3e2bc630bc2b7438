//! Domination language: coercive control and elimination of others (W1).

use super::rules::{LexicalDetector, PatternRule};
use crate::core::ViolationCode::W1;
use once_cell::sync::Lazy;

pub const DETECTOR_ID: &str = "domination";

pub static RULES: Lazy<Vec<PatternRule>> = Lazy::new(|| {
    vec![
        // Explicit commitments score highest
        PatternRule::new(
            W1,
            r"\b(?:will|must|shall|going\s+to)\s+(?:dominate|crush|subjugate|conquer)\b",
            0.85,
            0.9,
            "command-style domination",
        ),
        PatternRule::new(
            W1,
            r"\beliminate\s+(?:all\s+)?(?:competitors|rivals|opposition|dissent|critics)\b",
            0.8,
            0.85,
            "elimination of others",
        ),
        PatternRule::new(
            W1,
            r"\bsubjugat\w*",
            0.8,
            0.8,
            "subjugation",
        ),
        PatternRule::new(
            W1,
            r"\b(?:total|absolute|complete)\s+control\s+over\b",
            0.7,
            0.75,
            "total control",
        ),
        PatternRule::new(
            W1,
            r"\bforce\s+(?:them|users|people|everyone|customers)\s+to\b",
            0.65,
            0.7,
            "coercion",
        ),
        PatternRule::new(
            W1,
            r"\bdominat(?:e|es|ed|ing|ion)\b",
            0.6,
            0.7,
            "domination term",
        ),
        // Japanese
        PatternRule::new(W1, r"服従させ", 0.8, 0.8, "subjugation (ja)"),
        PatternRule::new(W1, r"支配する", 0.6, 0.7, "domination term (ja)"),
        PatternRule::new(W1, r"競合を排除", 0.75, 0.8, "elimination of others (ja)"),
    ]
});

pub fn detector() -> LexicalDetector {
    LexicalDetector::new(DETECTOR_ID, &RULES)
}
