//! Evidence detectors.
//!
//! A detector turns raw candidate text into typed [`Evidence`]. Detectors are
//! pure: no side effects, and "no match" is an empty vector rather than an
//! error. Several detectors may fire on the same text; the aggregator combines
//! their evidence per violation code, so registry order never affects the
//! outcome.
//!
//! The default wiring lives in [`create_default_registry`], an explicit
//! factory whose result is passed to the gate by constructor injection.

pub mod dependency;
pub mod dignity;
pub mod domination;
pub mod injection;
pub mod irreversible;
pub mod rules;

use crate::core::{Candidate, UnitInterval, ViolationCode};
use serde::{Deserialize, Serialize};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

pub use rules::{LexicalDetector, PatternRule};

/// A single raw signal from one detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub code: ViolationCode,
    pub message: String,
    pub strength: UnitInterval,
    pub confidence: UnitInterval,
    pub detector_id: String,
    /// Byte range of the match in the scanned text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<(usize, usize)>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Evidence {
    pub fn new(
        code: ViolationCode,
        message: impl Into<String>,
        strength: f64,
        confidence: f64,
        detector_id: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            strength: UnitInterval::new(strength),
            confidence: UnitInterval::new(confidence),
            detector_id: detector_id.into(),
            span: None,
            tags: Vec::new(),
        }
    }

    pub fn with_span(mut self, start: usize, end: usize) -> Self {
        self.span = Some((start, end));
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}

/// Optional deployment context handed to detectors, the repair engine and scorers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionContext {
    /// Name of the active context profile, if any.
    #[serde(default)]
    pub profile: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl DetectionContext {
    pub fn for_profile(profile: impl Into<String>) -> Self {
        Self {
            profile: Some(profile.into()),
            tags: Vec::new(),
        }
    }

    pub fn profile_tag(&self) -> Option<String> {
        self.profile.as_ref().map(|p| format!("profile:{p}"))
    }
}

/// Pluggable scanner producing evidence from candidate text.
pub trait Detector: Send + Sync {
    fn id(&self) -> &str;

    fn detect(&self, candidate: &Candidate, context: Option<&DetectionContext>) -> Vec<Evidence>;
}

/// Ordered collection of detectors.
#[derive(Clone, Default)]
pub struct DetectorRegistry {
    detectors: Vec<Arc<dyn Detector>>,
}

impl DetectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, detector: impl Detector + 'static) {
        self.detectors.push(Arc::new(detector));
    }

    pub fn with(mut self, detector: impl Detector + 'static) -> Self {
        self.register(detector);
        self
    }

    pub fn ids(&self) -> Vec<&str> {
        self.detectors.iter().map(|d| d.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    /// Run every detector and concatenate their evidence.
    ///
    /// A detector that panics is treated as having found nothing; the
    /// remaining detectors still run.
    pub fn detect_all(
        &self,
        candidate: &Candidate,
        context: Option<&DetectionContext>,
    ) -> Vec<Evidence> {
        self.detectors
            .iter()
            .flat_map(|detector| {
                catch_unwind(AssertUnwindSafe(|| detector.detect(candidate, context)))
                    .unwrap_or_else(|_| {
                        tracing::warn!(
                            detector = detector.id(),
                            candidate = %candidate.id,
                            "detector failed; treating as no evidence"
                        );
                        Vec::new()
                    })
            })
            .collect()
    }
}

impl std::fmt::Debug for DetectorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetectorRegistry")
            .field("detectors", &self.ids())
            .finish()
    }
}

/// Registry with the five built-in lexical detectors.
pub fn create_default_registry() -> DetectorRegistry {
    DetectorRegistry::new()
        .with(domination::detector())
        .with(irreversible::detector())
        .with(dependency::detector())
        .with(dignity::detector())
        .with(injection::detector())
}
