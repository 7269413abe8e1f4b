//! Multi-label edited nearest neighbor guided by label imbalance (MLeNN).
//!
//! Instances carrying a minority label are never touched. Every other instance is removed when
//! most of its nearest neighbors, measured over features and labels together, disagree with its
//! labelset.
use crate::error::{Error, Result};
use crate::metric::label_disagreement_ratio;
use crate::neighbors::{LinearSearch, Space};
use crate::reduce::Reduction;
use crate::DataSet;
use const_default::ConstDefault;
use log::{debug, info};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HyperParam {
    pub k: usize,
    /// A neighbor disagrees when its label disagreement ratio exceeds this value.
    pub hamming_threshold: f32,
}

impl ConstDefault for HyperParam {
    const DEFAULT: Self = Self {
        k: 3,
        hamming_threshold: 0.75,
    };
}

impl Default for HyperParam {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Imbalance ratio of every label: the count of the most frequent label over its own count.
///
/// Labels that never occur get a ratio of 1.
pub fn imbalance_ratios(data: &DataSet) -> Vec<f32> {
    let counts = data.label_counts();
    let max_count = counts.iter().cloned().max().unwrap_or(0);
    counts
        .iter()
        .map(|&count| {
            if count == 0 {
                1.
            } else {
                max_count as f32 / count as f32
            }
        })
        .collect()
}

/// Labels whose imbalance ratio is above the mean.
///
/// The mean sums the ratios of the labels that occur and divides by the total number of labels.
pub fn minority_labels(data: &DataSet) -> Vec<bool> {
    let ratios = imbalance_ratios(data);
    let counts = data.label_counts();
    let mean_ratio = ratios
        .iter()
        .zip(counts.iter())
        .filter(|&(_, &count)| count > 0)
        .map(|(&ratio, _)| ratio)
        .sum::<f32>()
        / data.n_labels() as f32;
    debug!("Imbalance ratios {:?}, mean {:.4}", ratios, mean_ratio);
    ratios.iter().map(|&ratio| ratio > mean_ratio).collect()
}

impl HyperParam {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.k == 0 {
            Err("number of neighbors must be positive".to_owned())
        } else if !(0. ..=1.).contains(&self.hamming_threshold) {
            Err(format!(
                "hamming_threshold must be in [0, 1], got {}",
                self.hamming_threshold
            ))
        } else {
            Ok(())
        }
    }

    pub fn reduce(&self, data: &DataSet) -> Result<Reduction> {
        self.validate().map_err(Error::InvalidHyperParam)?;
        if data.is_empty() {
            return Err(Error::EmptyDataSet {
                name: data.name().to_owned(),
            });
        }

        info!(
            "Editing dataset {:?} ({} instances) with MLeNN, k = {}",
            data.name(),
            data.len(),
            self.k
        );
        let start_t = time::precise_time_s();

        let minority_labels = minority_labels(data);
        let min_disagreements = self.k / 2 + 1;
        let mut pool = (0..data.len()).collect::<Vec<_>>();
        let mut search = LinearSearch::new(data, pool.clone(), Space::FeaturesAndLabels);
        let mut n_candidates = 0;

        for i in 0..data.len() {
            let labels = data.labels(i);
            let is_minority = labels
                .iter()
                .zip(minority_labels.iter())
                .any(|(&active, &minor)| active && minor);
            if is_minority {
                continue;
            }
            n_candidates += 1;

            let n_disagreements = search
                .k_nearest(i, self.k, false)
                .into_iter()
                .filter(|&j| {
                    label_disagreement_ratio(labels, data.labels(j))
                        .map_or(false, |ratio| ratio > self.hamming_threshold)
                })
                .count();
            if n_disagreements > min_disagreements {
                pool.retain(|&j| j != i);
                search = LinearSearch::new(data, pool.clone(), Space::FeaturesAndLabels);
            }
        }

        let reduction = Reduction::new(data, pool, start_t);
        info!(
            "MLeNN kept {} of {} instances ({} candidates); it took {:.2}s",
            reduction.kept.len(),
            data.len(),
            n_candidates,
            reduction.elapsed_secs
        );
        Ok(reduction)
    }
}
