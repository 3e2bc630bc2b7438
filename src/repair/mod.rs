//! Staged, bounded, auditable text repair.
//!
//! One call to [`RepairEngine::repair`] is one repair pass:
//!
//! 1. **Concept mapping**: lexical destructive→constructive substitution.
//! 2. **Constraint injection**: bracketed qualifier per repairable code.
//! 3. **Scope reduction**: only when stages 1–2 changed nothing this pass.
//! 4. **Goal reframe**: named in the taxonomy; no rewrite rules exist for it,
//!    so the pass ends there.
//!
//! The engine never mutates the input candidate. It returns the rewritten
//! text and an append-only log of actions; building the next candidate
//! version is the gate's job.

pub mod concept_map;
pub mod constraints;
pub mod scope;

use crate::aggregation::Violation;
use crate::core::{Candidate, UnitInterval, ViolationCode};
use crate::detection::DetectionContext;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairStage {
    ConceptMapping,
    ConstraintInjection,
    ScopeReduction,
    GoalReframe,
}

impl RepairStage {
    pub fn as_str(self) -> &'static str {
        match self {
            RepairStage::ConceptMapping => "concept_mapping",
            RepairStage::ConstraintInjection => "constraint_injection",
            RepairStage::ScopeReduction => "scope_reduction",
            RepairStage::GoalReframe => "goal_reframe",
        }
    }
}

impl std::fmt::Display for RepairStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Append-only repair log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairAction {
    pub stage: RepairStage,
    pub description: String,
    pub before_text: String,
    pub after_text: String,
    pub semantic_drift: UnitInterval,
    /// 1-based repair pass that produced this action.
    pub iteration: usize,
}

impl RepairAction {
    pub fn new(
        stage: RepairStage,
        description: impl Into<String>,
        before_text: impl Into<String>,
        after_text: impl Into<String>,
        semantic_drift: f64,
        iteration: usize,
    ) -> Self {
        Self {
            stage,
            description: description.into(),
            before_text: before_text.into(),
            after_text: after_text.into(),
            semantic_drift: UnitInterval::new(semantic_drift),
            iteration,
        }
    }
}

/// Result of one successful repair pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RepairOutcome {
    pub text: String,
    pub actions: Vec<RepairAction>,
}

impl RepairOutcome {
    /// Sum of drift over this pass, clamped to `[0, 1]`.
    pub fn total_drift(&self) -> UnitInterval {
        UnitInterval::new(self.actions.iter().map(|a| a.semantic_drift.value()).sum())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RepairEngine;

impl RepairEngine {
    pub fn new() -> Self {
        Self
    }

    /// Single repair pass, logged as iteration 1.
    pub fn repair(
        &self,
        candidate: &Candidate,
        violations: &[Violation],
        context: Option<&DetectionContext>,
    ) -> Option<RepairOutcome> {
        self.repair_pass(candidate, violations, context, 1)
    }

    /// Repair pass whose actions are stamped with `iteration`.
    ///
    /// Returns `None` when no violation is repairable or no stage changed the text.
    pub fn repair_pass(
        &self,
        candidate: &Candidate,
        violations: &[Violation],
        _context: Option<&DetectionContext>,
        iteration: usize,
    ) -> Option<RepairOutcome> {
        let codes: Vec<ViolationCode> = violations
            .iter()
            .filter(|v| v.repairable)
            .map(|v| v.code)
            .collect();
        if codes.is_empty() {
            return None;
        }

        let mut text = candidate.text.clone();
        let mut actions = concept_map::apply(&mut text, iteration);
        actions.extend(constraints::inject(&mut text, &codes, iteration));

        if actions.is_empty() {
            actions.extend(scope::reduce(&mut text, iteration));
        }

        if actions.is_empty() {
            tracing::debug!(
                candidate = %candidate.id,
                iteration,
                stage = %RepairStage::GoalReframe,
                "no rewrite rules for stage; repair pass produced no change"
            );
            return None;
        }

        Some(RepairOutcome { text, actions })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::aggregate_evidence_to_violations;
    use crate::detection::Evidence;

    fn violations(code: ViolationCode) -> Vec<Violation> {
        aggregate_evidence_to_violations(&[Evidence::new(code, "m", 0.6, 0.7, "t")])
    }

    #[test]
    fn none_when_nothing_repairable() {
        let engine = RepairEngine::new();
        let candidate = Candidate::new("c", "We will dominate.");
        assert!(engine
            .repair(&candidate, &violations(ViolationCode::W1), None)
            .is_none());
    }

    #[test]
    fn maps_then_injects() {
        let engine = RepairEngine::new();
        let candidate = Candidate::new("c", "Our design uses lock-in to keep users from leaving.");
        let outcome = engine
            .repair(&candidate, &violations(ViolationCode::W3), None)
            .unwrap();

        let stages: Vec<_> = outcome.actions.iter().map(|a| a.stage).collect();
        assert_eq!(
            stages,
            vec![RepairStage::ConceptMapping, RepairStage::ConstraintInjection]
        );
        assert!(outcome.text.contains("provide flexible commitment to"));
        assert!(outcome.text.contains("data portability"));
        // Input untouched
        assert!(candidate.text.contains("lock-in"));
    }

    #[test]
    fn actions_chain_before_and_after() {
        let engine = RepairEngine::new();
        let candidate = Candidate::new("c", "Hidden fees apply and it cannot be undone.");
        let mut found = violations(ViolationCode::W2);
        found.extend(violations(ViolationCode::W4));
        let outcome = engine.repair(&candidate, &found, None).unwrap();

        assert_eq!(outcome.actions[0].before_text, candidate.text);
        for pair in outcome.actions.windows(2) {
            assert_eq!(pair[0].after_text, pair[1].before_text);
        }
        assert_eq!(outcome.actions.last().unwrap().after_text, outcome.text);
    }

    #[test]
    fn falls_back_to_scope_reduction() {
        let engine = RepairEngine::new();
        let text = "We will permanently track users forever. \
                    [with reversible steps and human review before any lasting change]";
        let candidate = Candidate::new("c", text);
        let outcome = engine
            .repair_pass(&candidate, &violations(ViolationCode::W4), None, 2)
            .unwrap();
        assert_eq!(outcome.actions.len(), 1);
        assert_eq!(outcome.actions[0].stage, RepairStage::ScopeReduction);
        assert_eq!(outcome.actions[0].iteration, 2);
    }

    #[test]
    fn none_when_no_stage_changes_text() {
        let engine = RepairEngine::new();
        let candidate = Candidate::new(
            "c",
            "Plain words. [with informed consent and transparency]",
        );
        assert!(engine
            .repair(&candidate, &violations(ViolationCode::W2), None)
            .is_none());
    }
}
