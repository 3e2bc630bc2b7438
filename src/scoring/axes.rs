//! Keyword-indicator scorers.
//!
//! Each axis counts distinct positive and negative indicator stems (prefix
//! match on a word boundary, case-insensitive) and moves a fixed base value
//! by a per-indicator bonus or penalty.

use super::{AxisScore, AxisScorer};
use crate::core::{Axis, Candidate};
use crate::detection::DetectionContext;
use once_cell::sync::Lazy;
use regex::RegexSet;

const CONFIDENCE_WITH_SIGNAL: f64 = 0.7;
const CONFIDENCE_WITHOUT_SIGNAL: f64 = 0.5;

/// Compiled indicator table for one axis.
pub struct Indicators {
    pub base: f64,
    pub penalty: f64,
    pub bonus: f64,
    positive: &'static [&'static str],
    negative: &'static [&'static str],
    positive_set: RegexSet,
    negative_set: RegexSet,
}

impl Indicators {
    fn new(
        base: f64,
        penalty: f64,
        bonus: f64,
        positive: &'static [&'static str],
        negative: &'static [&'static str],
    ) -> Self {
        Self {
            base,
            penalty,
            bonus,
            positive,
            negative,
            positive_set: compile(positive),
            negative_set: compile(negative),
        }
    }

    fn matches(set: &RegexSet, words: &'static [&'static str], text: &str) -> Vec<String> {
        set.matches(text)
            .into_iter()
            .map(|i| words[i].to_string())
            .collect()
    }
}

fn compile(words: &[&str]) -> RegexSet {
    let patterns = words
        .iter()
        .map(|w| format!(r"(?i)\b{}", regex::escape(w)));
    RegexSet::new(patterns).unwrap_or_else(|e| panic!("invalid indicator table: {e}"))
}

static SAFETY: Lazy<Indicators> = Lazy::new(|| {
    Indicators::new(
        0.6,
        0.15,
        0.1,
        &["safety", "safeguard", "verif", "test", "monitor", "review", "audit"],
        &["unsafe", "danger", "bypass", "disable", "override", "untested", "reckless", "risky"],
    )
});

static FAIRNESS: Lazy<Indicators> = Lazy::new(|| {
    Indicators::new(
        0.65,
        0.15,
        0.08,
        &["fair", "equal", "equitab", "inclusi", "unbiased", "accessib", "divers"],
        &["discriminat", "exclu", "biased", "unfair", "privileged", "eliminate"],
    )
});

static PRIVACY: Lazy<Indicators> = Lazy::new(|| {
    Indicators::new(
        0.6,
        0.2,
        0.1,
        &["consent", "anonymi", "encrypt", "privacy", "opt-in", "data minimi", "portab", "delete"],
        &["track", "surveil", "share data", "personal data", "fingerprint", "harvest", "collect all"],
    )
});

static AUTONOMY: Lazy<Indicators> = Lazy::new(|| {
    Indicators::new(
        0.6,
        0.15,
        0.1,
        &["choice", "choose", "opt-out", "freedom", "voluntar", "informed", "self-sufficien", "empower"],
        &["force", "lock-in", "lock in", "mandatory", "coerc", "dependen", "keep users from", "trap", "no choice"],
    )
});

static HARM_AVOIDANCE: Lazy<Indicators> = Lazy::new(|| {
    Indicators::new(
        0.65,
        0.2,
        0.08,
        &["prevent harm", "protect", "mitigat", "reversib", "rollback", "wellbeing", "well-being", "care"],
        &["harmful", "cause harm", "destroy", "eliminate", "kill", "damage", "permanent", "irreversib", "crush", "attack"],
    )
});

/// Generic scorer over one static indicator table.
pub struct IndicatorScorer {
    axis: Axis,
    indicators: &'static Lazy<Indicators>,
}

impl IndicatorScorer {
    pub const fn new(axis: Axis, indicators: &'static Lazy<Indicators>) -> Self {
        Self { axis, indicators }
    }
}

impl AxisScorer for IndicatorScorer {
    fn axis(&self) -> Axis {
        self.axis
    }

    fn score(&self, candidate: &Candidate, _context: Option<&DetectionContext>) -> AxisScore {
        let table: &Indicators = self.indicators;
        let text = candidate.text.as_str();
        let positive = Indicators::matches(&table.positive_set, table.positive, text);
        let negative = Indicators::matches(&table.negative_set, table.negative, text);

        let value = table.base - table.penalty * negative.len() as f64
            + table.bonus * positive.len() as f64;
        let fired = !(positive.is_empty() && negative.is_empty());
        let confidence = if fired {
            CONFIDENCE_WITH_SIGNAL
        } else {
            CONFIDENCE_WITHOUT_SIGNAL
        };

        let mut score = AxisScore::new(value, confidence);
        score.notes = if fired {
            format!(
                "{} positive, {} negative indicator(s)",
                positive.len(),
                negative.len()
            )
        } else {
            "no indicators; base value".to_string()
        };
        score.evidence = positive;
        score.counterevidence = negative;
        score
    }
}

pub fn safety() -> IndicatorScorer {
    IndicatorScorer::new(Axis::Safety, &SAFETY)
}

pub fn fairness() -> IndicatorScorer {
    IndicatorScorer::new(Axis::Fairness, &FAIRNESS)
}

pub fn privacy() -> IndicatorScorer {
    IndicatorScorer::new(Axis::Privacy, &PRIVACY)
}

pub fn autonomy() -> IndicatorScorer {
    IndicatorScorer::new(Axis::Autonomy, &AUTONOMY)
}

pub fn harm_avoidance() -> IndicatorScorer {
    IndicatorScorer::new(Axis::HarmAvoidance, &HARM_AVOIDANCE)
}

/// One scorer per axis, in [`Axis::ALL`] order.
pub fn default_scorers() -> Vec<Box<dyn super::AxisScorer>> {
    vec![
        Box::new(safety()),
        Box::new(fairness()),
        Box::new(privacy()),
        Box::new(autonomy()),
        Box::new(harm_avoidance()),
    ]
}
