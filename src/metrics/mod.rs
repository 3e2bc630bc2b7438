//! Gap and floor metrics of axis scores against a context profile.
//!
//! Only `has_min_violation` gates anything downstream; the distances are
//! reporting and ranking aids.

use crate::config::ContextProfile;
use crate::core::{Axis, Candidate};
use crate::detection::DetectionContext;
use crate::scoring::{default_scorers, score_all, AxisScore, AxisScorer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Shortfall below target: `max(0, target − value)`.
pub fn delta_plus(value: f64, target: f64) -> f64 {
    (target - value).max(0.0)
}

/// Breach amount below the floor: `max(0, e_min − value)`.
pub fn min_violation(value: f64, e_min: f64) -> f64 {
    (e_min - value).max(0.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisMetrics {
    pub value: f64,
    pub delta_plus: f64,
    pub min_violation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateMetrics {
    pub axes: BTreeMap<Axis, AxisMetrics>,
    pub has_min_violation: bool,
    /// `sqrt(Σ w_i · delta_plus_i²)`
    pub d2: f64,
    /// `max(w_i · delta_plus_i)`
    pub d_inf: f64,
}

impl CandidateMetrics {
    /// Axis values in [`Axis::ALL`] order.
    pub fn values(&self) -> [f64; 5] {
        Axis::ALL.map(|a| self.axes.get(&a).map_or(0.0, |m| m.value))
    }

    pub fn deltas(&self) -> [f64; 5] {
        Axis::ALL.map(|a| self.axes.get(&a).map_or(0.0, |m| m.delta_plus))
    }

    /// Axes below their floor, with the shortfall.
    pub fn floor_breaches(&self) -> Vec<(Axis, f64)> {
        self.axes
            .iter()
            .filter(|(_, m)| m.min_violation > 0.0)
            .map(|(&axis, m)| (axis, m.min_violation))
            .collect()
    }
}

pub struct MetricsEvaluator {
    profile: ContextProfile,
    scorers: Vec<Box<dyn AxisScorer>>,
}

impl MetricsEvaluator {
    pub fn new(profile: ContextProfile) -> Self {
        Self::with_scorers(profile, default_scorers())
    }

    pub fn with_scorers(profile: ContextProfile, scorers: Vec<Box<dyn AxisScorer>>) -> Self {
        Self { profile, scorers }
    }

    pub fn profile(&self) -> &ContextProfile {
        &self.profile
    }

    pub fn score_candidate(
        &self,
        candidate: &Candidate,
        context: Option<&DetectionContext>,
    ) -> BTreeMap<Axis, AxisScore> {
        score_all(&self.scorers, candidate, context)
    }

    /// Missing axes are treated as scoring 0.
    pub fn evaluate(&self, scores: &BTreeMap<Axis, AxisScore>) -> CandidateMetrics {
        let weights = self.profile.midpoint_weights();
        let mut axes = BTreeMap::new();
        let mut sum_sq = 0.0;
        let mut d_inf: f64 = 0.0;

        for axis in Axis::ALL {
            let target = self.profile.axis(axis);
            let value = scores.get(&axis).map_or(0.0, |s| s.value.value());
            let gap = delta_plus(value, target.e_target);
            let w = weights[axis.index()];

            sum_sq += w * gap * gap;
            d_inf = d_inf.max(w * gap);
            axes.insert(
                axis,
                AxisMetrics {
                    value,
                    delta_plus: gap,
                    min_violation: min_violation(value, target.e_min),
                },
            );
        }

        let has_min_violation = axes.values().any(|m| m.min_violation > 0.0);
        CandidateMetrics {
            axes,
            has_min_violation,
            d2: sum_sq.sqrt(),
            d_inf,
        }
    }
}

impl std::fmt::Debug for MetricsEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsEvaluator")
            .field("profile", &self.profile.name)
            .field("scorers", &self.scorers.len())
            .finish()
    }
}
