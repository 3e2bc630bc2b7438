//! Dignity-violation language (W0).

use super::rules::{LexicalDetector, PatternRule};
use crate::core::ViolationCode::W0;
use once_cell::sync::Lazy;

pub const DETECTOR_ID: &str = "dignity";

pub static RULES: Lazy<Vec<PatternRule>> = Lazy::new(|| {
    vec![
        PatternRule::new(
            W0,
            r"\b(?:subhuman|vermin|inferior\s+(?:race|people|beings))\b",
            0.9,
            0.9,
            "dehumanizing label",
        ),
        PatternRule::new(
            W0,
            r"\btreat\s+(?:them|people|users|workers|humans)\s+as\s+(?:mere\s+)?(?:tools|objects|cattle|disposable)\b",
            0.8,
            0.85,
            "people as instruments",
        ),
        PatternRule::new(
            W0,
            r"\b(?:worthless|disposable)\s+(?:people|humans|lives|workers)\b",
            0.75,
            0.8,
            "worthless lives",
        ),
        PatternRule::new(
            W0,
            r"\b(?:humiliate|degrade|dehumani[sz]\w*)\b",
            0.6,
            0.7,
            "degradation",
        ),
        // Japanese
        PatternRule::new(W0, r"人間以下", 0.9, 0.9, "dehumanizing label (ja)"),
        PatternRule::new(W0, r"使い捨ての(?:人間|労働者)", 0.75, 0.8, "worthless lives (ja)"),
    ]
});

pub fn detector() -> LexicalDetector {
    LexicalDetector::new(DETECTOR_ID, &RULES)
}
