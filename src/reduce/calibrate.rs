use crate::oracle::{evaluate, Learner, Thresholding};
use crate::DataSet;
use const_default::ConstDefault;
use itertools::Itertools;
use log::{debug, warn};
use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// Settings of the vote threshold calibration.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HyperParam {
    /// Weight of the error in the fitness; the memory ratio gets `1 - alpha`.
    pub alpha: f32,
    /// Fraction of the dataset sampled as held-out test rows.
    pub held_out_ratio: f32,
    /// Trial sets smaller than this are not evaluated.
    pub min_train_size: usize,
}

impl ConstDefault for HyperParam {
    const DEFAULT: Self = Self {
        alpha: 0.95,
        held_out_ratio: 0.1,
        min_train_size: 10,
    };
}

impl Default for HyperParam {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl HyperParam {
    pub fn validate(&self) -> Result<(), String> {
        if !(0. ..=1.).contains(&self.alpha) {
            Err(format!("alpha must be in [0, 1], got {}", self.alpha))
        } else if !(self.held_out_ratio > 0. && self.held_out_ratio <= 1.) {
            Err(format!(
                "held_out_ratio must be in (0, 1], got {}",
                self.held_out_ratio
            ))
        } else {
            Ok(())
        }
    }
}

/// One evaluated candidate threshold.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FitnessPoint {
    pub threshold: u32,
    /// Hamming loss of the oracle trained on the trial set.
    pub error: f32,
    /// Size of the trial set relative to the whole dataset.
    pub memory: f32,
    pub fitness: f32,
}

/// Rows whose vote count is strictly below the threshold.
pub(crate) fn rows_below(votes: &[u32], threshold: u32) -> Vec<usize> {
    (0..votes.len()).filter(|&i| votes[i] < threshold).collect()
}

/// Sample the held-out rows with a seeded shuffle.
fn sample_held_out(n: usize, ratio: f32, seed: u64) -> Vec<usize> {
    let size = ((ratio * n as f32).round() as usize).max(1).min(n);
    let mut rows = (0..n).collect_vec();
    rows.shuffle(&mut StdRng::seed_from_u64(seed));
    rows.truncate(size);
    rows
}

/// Choose the vote threshold in `1..=n_views + 1` with the lowest fitness.
///
/// Returns the chosen threshold and every evaluated point in scan order. When no threshold can
/// be evaluated, every instance is kept.
pub(crate) fn calibrate(
    data: &DataSet,
    votes: &[u32],
    n_views: u32,
    learner: &dyn Learner,
    hyper_param: &HyperParam,
    seed: u64,
) -> (u32, Vec<FitnessPoint>) {
    assert_eq!(data.len(), votes.len());
    let n = data.len();
    let held_out = sample_held_out(n, hyper_param.held_out_ratio, seed);
    let keep_all = n_views + 1;

    let mut points = Vec::<FitnessPoint>::new();
    let mut best: Option<FitnessPoint> = None;
    for threshold in 1..=keep_all {
        let trial = rows_below(votes, threshold);
        let is_full = trial.len() == n;
        if trial.len() < hyper_param.min_train_size {
            debug!(
                "Skipping threshold {}: only {} instances left",
                threshold,
                trial.len()
            );
            if is_full {
                break;
            }
            continue;
        }

        let error = match evaluate(learner, data, &trial, &held_out, Thresholding::PCut1) {
            Ok(evaluation) => evaluation.hamming_loss,
            Err(err) => {
                warn!(
                    "Failed to evaluate dataset {:?} with {}: {}",
                    data.name(),
                    learner.describe(),
                    err
                );
                if is_full {
                    break;
                }
                continue;
            }
        };
        let memory = trial.len() as f32 / n as f32;
        let point = FitnessPoint {
            threshold,
            error,
            memory,
            fitness: hyper_param.alpha * error + (1. - hyper_param.alpha) * memory,
        };
        debug!("Threshold candidate {:?}", point);
        points.push(point);
        if best.map_or(true, |best| point.fitness < best.fitness) {
            best = Some(point);
        }

        if is_full {
            break;
        }
    }

    match best {
        Some(point) => (point.threshold, points),
        None => {
            warn!(
                "No vote threshold could be evaluated on dataset {:?}; keeping every instance",
                data.name()
            );
            (keep_all, points)
        }
    }
}
