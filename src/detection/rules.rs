//! Lexical rule tables and the generic scanner shared by the built-in detectors.

use super::{DetectionContext, Detector, Evidence};
use crate::core::{Candidate, ViolationCode};
use once_cell::sync::Lazy;
use regex::Regex;

/// Upper bound on evidence emitted by one rule for one text.
const MAX_MATCHES_PER_RULE: usize = 8;

/// One compiled pattern with its fixed signal strength.
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub code: ViolationCode,
    pub pattern: Regex,
    pub strength: f64,
    pub confidence: f64,
    pub label: &'static str,
}

impl PatternRule {
    /// Compile a case-insensitive rule. Patterns are static literals, so a
    /// compile failure is a programming error.
    pub fn new(
        code: ViolationCode,
        pattern: &str,
        strength: f64,
        confidence: f64,
        label: &'static str,
    ) -> Self {
        let pattern = Regex::new(&format!("(?i){pattern}"))
            .unwrap_or_else(|e| panic!("invalid detector pattern {pattern:?}: {e}"));
        Self {
            code,
            pattern,
            strength,
            confidence,
            label,
        }
    }
}

/// Scan `text` with every rule in `rules`.
pub fn scan(
    rules: &[PatternRule],
    text: &str,
    detector_id: &str,
    context: Option<&DetectionContext>,
) -> Vec<Evidence> {
    let profile_tag = context.and_then(DetectionContext::profile_tag);

    rules
        .iter()
        .flat_map(|rule| {
            rule.pattern
                .find_iter(text)
                .take(MAX_MATCHES_PER_RULE)
                .map(move |m| (rule, m))
        })
        .map(|(rule, m)| {
            let mut evidence = Evidence::new(
                rule.code,
                format!("{}: \"{}\"", rule.label, m.as_str()),
                rule.strength,
                rule.confidence,
                detector_id,
            )
            .with_span(m.start(), m.end())
            .with_tag(rule.label);
            if let Some(tag) = &profile_tag {
                evidence = evidence.with_tag(tag.clone());
            }
            evidence
        })
        .collect()
}

/// Detector backed by a static rule table.
pub struct LexicalDetector {
    id: &'static str,
    rules: &'static Lazy<Vec<PatternRule>>,
}

impl LexicalDetector {
    pub const fn new(id: &'static str, rules: &'static Lazy<Vec<PatternRule>>) -> Self {
        Self { id, rules }
    }

    pub fn rules(&self) -> &[PatternRule] {
        self.rules
    }
}

impl Detector for LexicalDetector {
    fn id(&self) -> &str {
        self.id
    }

    fn detect(&self, candidate: &Candidate, context: Option<&DetectionContext>) -> Vec<Evidence> {
        let evidence = scan(self.rules(), &candidate.text, self.id, context);
        for item in &evidence {
            tracing::debug!(
                detector = self.id,
                candidate = %candidate.id,
                code = %item.code,
                strength = item.strength.value(),
                "{}",
                item.message
            );
        }
        evidence
    }
}
