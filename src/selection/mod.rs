//! Selection pipeline: gate filter → score → floor filter → Pareto front → MCDA.
//!
//! Every candidate that drops out is recorded in
//! [`SelectionResult::rejected`] with a reason and detail, so a result can be
//! audited without re-running the pipeline.

pub mod mcda;
pub mod pareto;

pub use mcda::McdaMethod;
pub use pareto::{dominates, pareto_front};

use crate::config::{ContextProfile, PolicyGateConfig, SelectionConfig};
use crate::core::{Axis, Candidate};
use crate::detection::{create_default_registry, DetectionContext};
use crate::errors::Result;
use crate::gate::{Gate, GateDecision};
use crate::metrics::{CandidateMetrics, MetricsEvaluator};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// How the winner was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionMethod {
    /// Front had one member; no weighting needed
    ParetoDominant,
    RobustWeight,
    Topsis,
}

impl From<McdaMethod> for SelectionMethod {
    fn from(method: McdaMethod) -> Self {
        match method {
            McdaMethod::RobustWeight => SelectionMethod::RobustWeight,
            McdaMethod::Topsis => SelectionMethod::Topsis,
        }
    }
}

impl SelectionMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            SelectionMethod::ParetoDominant => "pareto-dominant",
            SelectionMethod::RobustWeight => "robust-weight",
            SelectionMethod::Topsis => "topsis",
        }
    }
}

impl std::fmt::Display for SelectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    DuplicateId,
    GateReject,
    GateEscalate,
    FloorViolation,
}

impl RejectionReason {
    pub fn as_str(self) -> &'static str {
        match self {
            RejectionReason::DuplicateId => "duplicate_id",
            RejectionReason::GateReject => "gate_reject",
            RejectionReason::GateEscalate => "gate_escalate",
            RejectionReason::FloorViolation => "floor_violation",
        }
    }
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedCandidate {
    pub id: String,
    pub reason: RejectionReason,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub id: String,
    /// `p_best` for robust weighting, closeness for TOPSIS, 1.0 when dominant
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionResult {
    pub selected_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_text: Option<String>,
    pub pareto_set_ids: Vec<String>,
    pub mcda_method: Option<SelectionMethod>,
    pub weights_profile: String,
    pub weight_ranges: BTreeMap<Axis, (f64, f64)>,
    pub p_best: Option<f64>,
    pub explanation: String,
    pub rejected: Vec<RejectedCandidate>,
    /// Top-k front members, best first
    pub ranking: Vec<RankedCandidate>,
    /// Metrics of every candidate that passed the gate
    pub metrics: BTreeMap<String, CandidateMetrics>,
}

impl SelectionResult {
    fn empty(profile: &ContextProfile, explanation: impl Into<String>) -> Self {
        Self {
            selected_id: None,
            selected_text: None,
            pareto_set_ids: Vec::new(),
            mcda_method: None,
            weights_profile: profile.name.clone(),
            weight_ranges: profile.weight_ranges(),
            p_best: None,
            explanation: explanation.into(),
            rejected: Vec::new(),
            ranking: Vec::new(),
            metrics: BTreeMap::new(),
        }
    }

    /// A winner was chosen without deferring to a human.
    pub fn is_decided(&self) -> bool {
        self.selected_id.is_some()
    }
}

/// Gate, scorers and ranking settings composed into one pipeline.
#[derive(Debug)]
pub struct Selector {
    config: SelectionConfig,
    gate: Gate,
    evaluator: MetricsEvaluator,
}

impl Selector {
    /// Validates `config` and `profile` before anything runs.
    pub fn new(config: SelectionConfig, gate: Gate, profile: ContextProfile) -> Result<Self> {
        config.validate()?;
        profile.validate()?;
        Ok(Self {
            config,
            gate,
            evaluator: MetricsEvaluator::new(profile),
        })
    }

    /// Default detectors and scorers, thresholds and profile from `config`.
    pub fn from_config(config: &PolicyGateConfig) -> Result<Self> {
        let gate = Gate::new(config.gate.clone(), create_default_registry())?;
        let profile = config.active_profile()?;
        Self::new(config.selection.clone(), gate, profile)
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    pub fn gate(&self) -> &Gate {
        &self.gate
    }

    pub fn profile(&self) -> &ContextProfile {
        self.evaluator.profile()
    }

    pub fn select(
        &self,
        candidates: Vec<Candidate>,
        context: Option<&DetectionContext>,
        top_k: usize,
    ) -> SelectionResult {
        let span = tracing::info_span!(
            "select",
            candidates = candidates.len(),
            profile = %self.profile().name
        );
        let _enter = span.enter();

        if candidates.is_empty() {
            return SelectionResult::empty(self.profile(), "no candidates supplied");
        }

        let mut rejected = Vec::new();
        let candidates = dedup_ids(candidates, &mut rejected);
        let survivors = self.gate_filter(candidates, context, &mut rejected);

        let scored: Vec<(Candidate, CandidateMetrics)> = survivors
            .into_par_iter()
            .map(|mut candidate| {
                candidate.scores = self.evaluator.score_candidate(&candidate, context);
                let metrics = self.evaluator.evaluate(&candidate.scores);
                (candidate, metrics)
            })
            .collect();

        let metrics: BTreeMap<String, CandidateMetrics> = scored
            .iter()
            .map(|(c, m)| (c.id.clone(), m.clone()))
            .collect();

        let eligible = floor_filter(scored, &mut rejected);

        let mut result = if eligible.is_empty() {
            SelectionResult::empty(
                self.profile(),
                "all candidates were filtered out by the gate or axis floors",
            )
        } else {
            self.rank(&eligible, top_k)
        };
        result.rejected = rejected;
        result.metrics = metrics;

        tracing::info!(
            selected = result.selected_id.as_deref().unwrap_or("none"),
            method = result.mcda_method.map_or("none", SelectionMethod::as_str),
            p_best = result.p_best,
            rejected = result.rejected.len(),
            "{}",
            result.explanation
        );
        result
    }

    fn gate_filter(
        &self,
        candidates: Vec<Candidate>,
        context: Option<&DetectionContext>,
        rejected: &mut Vec<RejectedCandidate>,
    ) -> Vec<Candidate> {
        let mut survivors = Vec::new();
        for (candidate, result) in self.gate.check_batch(candidates, context) {
            let reason = match result.decision {
                GateDecision::Reject => Some(RejectionReason::GateReject),
                GateDecision::Escalate => Some(RejectionReason::GateEscalate),
                GateDecision::Allow | GateDecision::AllowWithRepair => None,
            };
            if let Some(reason) = reason {
                rejected.push(RejectedCandidate {
                    id: candidate.id,
                    reason,
                    detail: result.explanation,
                });
                continue;
            }

            let mut next = match &result.repaired_text {
                Some(text) => candidate.with_text(text.clone()),
                None => candidate,
            };
            next.gate_result = Some(result);
            survivors.push(next);
        }
        survivors
    }

    fn rank(&self, eligible: &[(Candidate, CandidateMetrics)], top_k: usize) -> SelectionResult {
        let profile = self.profile();
        let values: Vec<[f64; 5]> = eligible.iter().map(|(_, m)| m.values()).collect();
        let front: Vec<usize> = pareto_front(&values);
        let pareto_set_ids: Vec<String> =
            front.iter().map(|&i| eligible[i].0.id.clone()).collect();

        let mut result = SelectionResult::empty(profile, String::new());
        result.pareto_set_ids = pareto_set_ids;

        if let [only] = front[..] {
            let (candidate, _) = &eligible[only];
            result.selected_id = Some(candidate.id.clone());
            result.selected_text = Some(candidate.text.clone());
            result.mcda_method = Some(SelectionMethod::ParetoDominant);
            result.p_best = Some(1.0);
            result.ranking = vec![RankedCandidate {
                id: candidate.id.clone(),
                score: 1.0,
            }];
            result.explanation = format!(
                "{} is the only Pareto-optimal candidate out of {}",
                candidate.id,
                eligible.len()
            );
            return result;
        }

        let deltas: Vec<[f64; 5]> = front.iter().map(|&i| eligible[i].1.deltas()).collect();
        let scores = match self.config.method {
            McdaMethod::RobustWeight => {
                let ranges = Axis::ALL.map(|a| profile.axis(a).weight_range);
                mcda::robust_weight(&deltas, &ranges, self.config.n_samples, self.config.seed)
            }
            McdaMethod::Topsis => {
                let front_values: Vec<[f64; 5]> = front.iter().map(|&i| values[i]).collect();
                mcda::topsis(&front_values, &deltas, &profile.midpoint_weights())
            }
        };

        let mut order: Vec<usize> = (0..front.len()).collect();
        // Stable: equal scores keep front order
        order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

        let (top, top_score) = (order[0], scores[order[0]]);
        let (top_candidate, _) = &eligible[front[top]];

        result.mcda_method = Some(self.config.method.into());
        result.p_best = Some(top_score);
        result.ranking = order
            .iter()
            .take(top_k.max(1))
            .map(|&i| RankedCandidate {
                id: eligible[front[i]].0.id.clone(),
                score: scores[i],
            })
            .collect();

        if top_score < self.config.p_best_threshold {
            result.explanation = format!(
                "top candidate {} scored {:.3} by {}, below p_best_threshold {:.2}; \
                 escalate to human review",
                top_candidate.id, top_score, self.config.method, self.config.p_best_threshold
            );
        } else {
            result.selected_id = Some(top_candidate.id.clone());
            result.selected_text = Some(top_candidate.text.clone());
            result.explanation = format!(
                "{} selected from a Pareto front of {} by {} with score {:.3}",
                top_candidate.id,
                front.len(),
                self.config.method,
                top_score
            );
        }
        result
    }
}

/// Keep the first candidate per id; metrics and ranking are keyed by id.
fn dedup_ids(candidates: Vec<Candidate>, rejected: &mut Vec<RejectedCandidate>) -> Vec<Candidate> {
    let mut seen = BTreeSet::new();
    candidates
        .into_iter()
        .filter(|candidate| {
            if seen.insert(candidate.id.clone()) {
                return true;
            }
            tracing::warn!(candidate = %candidate.id, "duplicate candidate id dropped");
            rejected.push(RejectedCandidate {
                id: candidate.id.clone(),
                reason: RejectionReason::DuplicateId,
                detail: "id already used by an earlier candidate".to_string(),
            });
            false
        })
        .collect()
}

/// Drop candidates with any axis below its floor, logging each shortfall.
fn floor_filter(
    scored: Vec<(Candidate, CandidateMetrics)>,
    rejected: &mut Vec<RejectedCandidate>,
) -> Vec<(Candidate, CandidateMetrics)> {
    scored
        .into_iter()
        .filter(|(candidate, metrics)| {
            if !metrics.has_min_violation {
                return true;
            }
            let detail = metrics
                .floor_breaches()
                .iter()
                .map(|(axis, gap)| format!("{axis} {gap:.2} below floor"))
                .collect::<Vec<_>>()
                .join("; ");
            tracing::debug!(candidate = %candidate.id, %detail, "floor violation");
            rejected.push(RejectedCandidate {
                id: candidate.id.clone(),
                reason: RejectionReason::FloorViolation,
                detail,
            });
            false
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProfileName;

    fn selector() -> Selector {
        Selector::new(
            SelectionConfig::default(),
            Gate::default(),
            ProfileName::Default.to_profile(),
        )
        .unwrap()
    }

    #[test]
    fn empty_set_is_a_result() {
        let result = selector().select(Vec::new(), None, 1);
        assert!(result.selected_id.is_none());
        assert_eq!(result.explanation, "no candidates supplied");
        assert_eq!(result.weights_profile, "default");
    }

    #[test]
    fn gate_rejects_are_recorded() {
        let result = selector().select(
            vec![Candidate::new(
                "bad",
                "We will dominate the market and eliminate all competitors permanently.",
            )],
            None,
            1,
        );
        assert!(result.selected_id.is_none());
        assert_eq!(result.rejected.len(), 1);
        assert_eq!(result.rejected[0].reason, RejectionReason::GateReject);
        assert!(result.metrics.is_empty());
    }

    #[test]
    fn duplicate_ids_keep_the_first_candidate() {
        let result = selector().select(
            vec![
                Candidate::new("dup", "Share the evacuation checklist with every household."),
                Candidate::new("dup", "We will dominate the market and eliminate all competitors."),
                Candidate::new("other", "Share the shelter map with volunteers."),
            ],
            None,
            3,
        );

        let duplicates: Vec<_> = result
            .rejected
            .iter()
            .filter(|r| r.reason == RejectionReason::DuplicateId)
            .collect();
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].id, "dup");
        // The dropped second "dup" never reaches the gate
        assert!(result
            .rejected
            .iter()
            .all(|r| r.reason != RejectionReason::GateReject));
        assert!(result.metrics.contains_key("dup"));
    }

    #[test]
    fn invalid_config_fails_at_construction() {
        let config = SelectionConfig {
            p_best_threshold: 1.5,
            ..Default::default()
        };
        assert!(Selector::new(config, Gate::default(), ContextProfile::default()).is_err());
    }

    #[test]
    fn method_names_are_kebab_case() {
        let json = serde_json::to_string(&SelectionMethod::ParetoDominant).unwrap();
        assert_eq!(json, "\"pareto-dominant\"");
        assert_eq!(SelectionMethod::from(McdaMethod::Topsis).as_str(), "topsis");
    }
}
