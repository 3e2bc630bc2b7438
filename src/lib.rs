//! Pre-publication policy gate.
//!
//! Candidate texts pass through lexical evidence detectors, a probabilistic
//! violation aggregator and a bounded repair loop ([`gate::Gate`]). Survivors
//! are scored on five axes and ranked with Pareto filtering plus
//! multi-criteria analysis that is robust to uncertain axis weights
//! ([`selection::Selector`]).

pub mod aggregation;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod detection;
pub mod errors;
pub mod gate;
pub mod io;
pub mod metrics;
pub mod observability;
pub mod repair;
pub mod scoring;
pub mod selection;

pub use crate::aggregation::{aggregate_evidence_to_violations, Violation};
pub use crate::config::{
    load_config, AxisProfile, ContextProfile, GateConfig, PolicyGateConfig, ProfileName,
    SelectionConfig,
};
pub use crate::core::{Axis, Candidate, UnitInterval, ViolationCode};
pub use crate::detection::{
    create_default_registry, DetectionContext, Detector, DetectorRegistry, Evidence,
};
pub use crate::errors::{Error, Result};
pub use crate::gate::{Gate, GateDecision, GateResult};
pub use crate::metrics::{CandidateMetrics, MetricsEvaluator};
pub use crate::repair::{RepairAction, RepairEngine, RepairStage};
pub use crate::scoring::{AxisScore, AxisScorer};
pub use crate::selection::{McdaMethod, SelectionResult, Selector};
