//! Policy gate: detection plus a bounded repair loop.
//!
//! The gate moves each candidate through
//! `Evaluating → Repairing* → Decided` and always terminates with one of
//! four decisions:
//!
//! - **allow**: nothing repairable reaches `tau_repair` and no hard
//!   violation reaches `tau_repair`. Weaker violations are reported, not blocking.
//! - **allow_with_repair**: the repair loop brought every violation below
//!   `tau_repair` within `max_repairs` passes.
//! - **reject**: a hard violation (`W0`/`W1`) reaches `tau_reject`, before
//!   or after repair, or the repair budget ran out.
//! - **escalate**: a hard violation sits in `[tau_repair, tau_reject)`. It
//!   cannot be repaired and is not clearly rejectable, so a human decides.

use crate::aggregation::{aggregate_evidence_to_violations, Violation};
use crate::config::GateConfig;
use crate::core::{Candidate, UnitInterval};
use crate::detection::{create_default_registry, DetectionContext, DetectorRegistry};
use crate::errors::Result;
use crate::repair::{RepairAction, RepairEngine};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateDecision {
    Allow,
    AllowWithRepair,
    Reject,
    Escalate,
}

impl GateDecision {
    /// Whether the candidate may continue to scoring.
    pub fn passes(self) -> bool {
        matches!(self, GateDecision::Allow | GateDecision::AllowWithRepair)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GateDecision::Allow => "allow",
            GateDecision::AllowWithRepair => "allow_with_repair",
            GateDecision::Reject => "reject",
            GateDecision::Escalate => "escalate",
        }
    }
}

impl std::fmt::Display for GateDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Immutable outcome of one `Gate::check`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateResult {
    pub decision: GateDecision,
    /// Violations of the final evaluation pass.
    pub violations: Vec<Violation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repaired_text: Option<String>,
    #[serde(default)]
    pub repair_log: Vec<RepairAction>,
    pub explanation: String,
    /// Repair passes executed.
    #[serde(default)]
    pub iterations: usize,
}

impl GateResult {
    /// Accumulated semantic drift over the repair log.
    pub fn total_drift(&self) -> UnitInterval {
        UnitInterval::new(self.repair_log.iter().map(|a| a.semantic_drift.value()).sum())
    }
}

enum GateState {
    Evaluating,
    Repairing {
        iteration: usize,
        text: String,
        violations: Vec<Violation>,
        log: Vec<RepairAction>,
    },
    Decided(GateResult),
}

/// Where a violation set falls relative to the gate thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Assessment {
    HardReject,
    HardEscalate,
    NeedsRepair,
    Clear,
}

#[derive(Debug)]
pub struct Gate {
    config: GateConfig,
    registry: Arc<DetectorRegistry>,
    engine: RepairEngine,
}

impl Gate {
    /// Build a gate, validating thresholds up front.
    pub fn new(config: GateConfig, registry: DetectorRegistry) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            registry: Arc::new(registry),
            engine: RepairEngine::new(),
        })
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn registry(&self) -> &DetectorRegistry {
        &self.registry
    }

    /// Detect and aggregate violations for one candidate version.
    pub fn evaluate(
        &self,
        candidate: &Candidate,
        context: Option<&DetectionContext>,
    ) -> Vec<Violation> {
        aggregate_evidence_to_violations(&self.registry.detect_all(candidate, context))
    }

    pub fn check(&self, candidate: &Candidate, context: Option<&DetectionContext>) -> GateResult {
        let span = tracing::debug_span!("gate_check", candidate = %candidate.id);
        let _enter = span.enter();

        let mut state = GateState::Evaluating;
        loop {
            state = match state {
                GateState::Evaluating => self.on_evaluating(candidate, context),
                GateState::Repairing {
                    iteration,
                    text,
                    violations,
                    log,
                } => self.on_repairing(candidate, context, iteration, text, violations, log),
                GateState::Decided(result) => {
                    tracing::info!(
                        candidate = %candidate.id,
                        decision = %result.decision,
                        iterations = result.iterations,
                        "{}",
                        result.explanation
                    );
                    return result;
                }
            };
        }
    }

    /// Check each candidate independently, in parallel. Output keeps input order.
    pub fn check_batch(
        &self,
        candidates: Vec<Candidate>,
        context: Option<&DetectionContext>,
    ) -> Vec<(Candidate, GateResult)> {
        candidates
            .into_par_iter()
            .map(|candidate| {
                let result = self.check(&candidate, context);
                (candidate, result)
            })
            .collect()
    }

    fn on_evaluating(
        &self,
        candidate: &Candidate,
        context: Option<&DetectionContext>,
    ) -> GateState {
        let violations = self.evaluate(candidate, context);

        match self.assess(&violations) {
            Assessment::HardReject => GateState::Decided(self.decide(
                GateDecision::Reject,
                format!(
                    "hard violation {} at or above tau_reject {:.2}; repair not attempted",
                    describe_worst(&violations, true),
                    self.config.tau_reject
                ),
                violations,
                Vec::new(),
                None,
                0,
            )),
            Assessment::HardEscalate => GateState::Decided(self.decide(
                GateDecision::Escalate,
                format!(
                    "hard violation {} is between tau_repair {:.2} and tau_reject {:.2}; \
                     cannot be repaired, human review required",
                    describe_worst(&violations, true),
                    self.config.tau_repair,
                    self.config.tau_reject
                ),
                violations,
                Vec::new(),
                None,
                0,
            )),
            Assessment::Clear => {
                let explanation = if violations.is_empty() {
                    "no violations detected".to_string()
                } else {
                    format!(
                        "{} violation(s) below tau_repair {:.2} tolerated",
                        violations.len(),
                        self.config.tau_repair
                    )
                };
                GateState::Decided(self.decide(
                    GateDecision::Allow,
                    explanation,
                    violations,
                    Vec::new(),
                    None,
                    0,
                ))
            }
            Assessment::NeedsRepair => GateState::Repairing {
                iteration: 1,
                text: candidate.text.clone(),
                violations,
                log: Vec::new(),
            },
        }
    }

    fn on_repairing(
        &self,
        candidate: &Candidate,
        context: Option<&DetectionContext>,
        iteration: usize,
        text: String,
        violations: Vec<Violation>,
        mut log: Vec<RepairAction>,
    ) -> GateState {
        let completed = iteration - 1;
        if iteration > self.config.max_repairs {
            return GateState::Decided(self.decide(
                GateDecision::Reject,
                format!(
                    "repair budget exhausted after {} iteration(s); {} still at or above tau_repair {:.2}",
                    completed,
                    describe_worst(&violations, false),
                    self.config.tau_repair
                ),
                violations,
                log,
                None,
                completed,
            ));
        }

        let current = candidate.with_text(text);
        let Some(outcome) = self
            .engine
            .repair_pass(&current, &violations, context, iteration)
        else {
            return GateState::Decided(self.decide(
                GateDecision::Reject,
                format!(
                    "no repair stage applied after {} iteration(s); {} still at or above tau_repair {:.2}",
                    completed,
                    describe_worst(&violations, false),
                    self.config.tau_repair
                ),
                violations,
                log,
                None,
                completed,
            ));
        };

        tracing::debug!(
            candidate = %candidate.id,
            iteration,
            actions = outcome.actions.len(),
            drift = outcome.total_drift().value(),
            "repair pass applied"
        );
        log.extend(outcome.actions);

        let repaired = candidate.with_text(outcome.text);
        let violations = self.evaluate(&repaired, context);

        match self.assess(&violations) {
            Assessment::HardReject => GateState::Decided(self.decide(
                GateDecision::Reject,
                format!(
                    "repair iteration {} introduced hard violation {} at or above tau_reject {:.2}",
                    iteration,
                    describe_worst(&violations, true),
                    self.config.tau_reject
                ),
                violations,
                log,
                None,
                iteration,
            )),
            Assessment::HardEscalate => GateState::Decided(self.decide(
                GateDecision::Escalate,
                format!(
                    "after repair iteration {} hard violation {} remains between thresholds; \
                     human review required",
                    iteration,
                    describe_worst(&violations, true)
                ),
                violations,
                log,
                None,
                iteration,
            )),
            Assessment::Clear => GateState::Decided(self.decide(
                GateDecision::AllowWithRepair,
                format!(
                    "all violations below tau_repair {:.2} after {} repair iteration(s)",
                    self.config.tau_repair, iteration
                ),
                violations,
                log,
                Some(repaired.text),
                iteration,
            )),
            Assessment::NeedsRepair => GateState::Repairing {
                iteration: iteration + 1,
                text: repaired.text,
                violations,
                log,
            },
        }
    }

    fn assess(&self, violations: &[Violation]) -> Assessment {
        let max_hard = max_impact(violations.iter().filter(|v| v.is_hard()));
        let max_soft = max_impact(violations.iter().filter(|v| v.repairable));

        if max_hard >= self.config.tau_reject {
            Assessment::HardReject
        } else if max_hard >= self.config.tau_repair {
            Assessment::HardEscalate
        } else if max_soft >= self.config.tau_repair {
            Assessment::NeedsRepair
        } else {
            Assessment::Clear
        }
    }

    fn decide(
        &self,
        decision: GateDecision,
        explanation: String,
        violations: Vec<Violation>,
        repair_log: Vec<RepairAction>,
        repaired_text: Option<String>,
        iterations: usize,
    ) -> GateResult {
        GateResult {
            decision,
            violations,
            repaired_text,
            repair_log,
            explanation,
            iterations,
        }
    }
}

impl Default for Gate {
    fn default() -> Self {
        Self {
            config: GateConfig::default(),
            registry: Arc::new(create_default_registry()),
            engine: RepairEngine::new(),
        }
    }
}

fn max_impact<'a>(violations: impl Iterator<Item = &'a Violation>) -> f64 {
    violations.map(Violation::impact_score).fold(0.0, f64::max)
}

/// "W1 (impact 0.98)" for the highest-impact violation of the requested class.
fn describe_worst(violations: &[Violation], hard: bool) -> String {
    violations
        .iter()
        .filter(|v| v.is_hard() == hard)
        .max_by(|a, b| a.impact_score().total_cmp(&b.impact_score()))
        .map(|v| format!("{} (impact {:.2})", v.code, v.impact_score()))
        .unwrap_or_else(|| "none".to_string())
}
