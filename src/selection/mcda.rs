//! Multi-criteria ranking of a Pareto front.

use crate::config::profiles::normalize_weights;
use crate::errors::Error;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Draws per parallel work unit; each unit gets its own derived seed.
const SAMPLES_PER_CHUNK: usize = 256;

const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum McdaMethod {
    /// Win frequency under weights sampled from each axis range
    #[default]
    RobustWeight,
    /// Closeness to the ideal point under midpoint weights
    Topsis,
}

impl McdaMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            McdaMethod::RobustWeight => "robust-weight",
            McdaMethod::Topsis => "topsis",
        }
    }
}

impl std::fmt::Display for McdaMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for McdaMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "robust-weight" | "robust_weight" | "robust" => Ok(McdaMethod::RobustWeight),
            "topsis" => Ok(McdaMethod::Topsis),
            other => Err(Error::Configuration(format!(
                "unknown MCDA method '{other}' (expected robust-weight or topsis)"
            ))),
        }
    }
}

/// Utility of one candidate under one weight vector: `Σ w_i · (1 − delta_plus_i)`.
pub fn weighted_utility(weights: &[f64; 5], deltas: &[f64; 5]) -> f64 {
    weights
        .iter()
        .zip(deltas)
        .map(|(w, d)| w * (1.0 - d))
        .sum()
}

/// Index of the highest utility; ties keep the earliest.
fn winner(weights: &[f64; 5], deltas: &[[f64; 5]]) -> usize {
    let mut best = 0;
    let mut best_utility = f64::NEG_INFINITY;
    for (i, d) in deltas.iter().enumerate() {
        let utility = weighted_utility(weights, d);
        if utility > best_utility {
            best = i;
            best_utility = utility;
        }
    }
    best
}

fn sample_weights(rng: &mut SmallRng, ranges: &[(f64, f64); 5]) -> [f64; 5] {
    normalize_weights(ranges.map(|(low, high)| rng.random_range(low..=high)))
}

/// Monte Carlo win frequencies, one per front member, summing to 1.
///
/// Draws run in fixed-size chunks on the rayon pool; chunk `c` seeds its
/// own `SmallRng` from `seed` and `c`, so the tally does not depend on
/// thread scheduling.
pub fn robust_weight(
    deltas: &[[f64; 5]],
    ranges: &[(f64, f64); 5],
    n_samples: usize,
    seed: u64,
) -> Vec<f64> {
    if deltas.is_empty() || n_samples == 0 {
        return vec![0.0; deltas.len()];
    }

    let chunks = n_samples.div_ceil(SAMPLES_PER_CHUNK);
    let wins = (0..chunks)
        .into_par_iter()
        .map(|chunk| {
            let draws = SAMPLES_PER_CHUNK.min(n_samples - chunk * SAMPLES_PER_CHUNK);
            let mut rng = SmallRng::seed_from_u64(seed ^ (chunk as u64).wrapping_mul(SEED_STRIDE));
            let mut tally = vec![0usize; deltas.len()];
            for _ in 0..draws {
                let weights = sample_weights(&mut rng, ranges);
                tally[winner(&weights, deltas)] += 1;
            }
            tally
        })
        .reduce(
            || vec![0usize; deltas.len()],
            |mut acc, tally| {
                for (a, t) in acc.iter_mut().zip(tally) {
                    *a += t;
                }
                acc
            },
        );

    tracing::debug!(n_samples, chunks, ?wins, "robust weight sampling finished");
    wins.into_iter()
        .map(|w| w as f64 / n_samples as f64)
        .collect()
}

/// TOPSIS closeness, one per front member.
///
/// Distance to the ideal counts only the shortfall below `e_target`
/// (`delta_plus`); distance to the anti-ideal is the distance to 0.
pub fn topsis(values: &[[f64; 5]], deltas: &[[f64; 5]], weights: &[f64; 5]) -> Vec<f64> {
    values
        .iter()
        .zip(deltas)
        .map(|(v, d)| {
            let d_plus = weighted_norm(weights, d);
            let d_minus = weighted_norm(weights, v);
            let total = d_plus + d_minus;
            if total > 0.0 {
                d_minus / total
            } else {
                0.0
            }
        })
        .collect()
}

fn weighted_norm(weights: &[f64; 5], xs: &[f64; 5]) -> f64 {
    weights
        .iter()
        .zip(xs)
        .map(|(w, x)| w * x * x)
        .sum::<f64>()
        .sqrt()
}
