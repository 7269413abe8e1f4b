use super::{Learner, Predictor};
use crate::error::{Error, Result};
use crate::neighbors::{LinearSearch, Space};
use crate::DataSet;
use const_default::ConstDefault;
use serde::{Deserialize, Serialize};

/// Distance-weighted k-nearest-neighbor multi-label learner.
///
/// The confidence of a label is the weighted fraction of the k nearest training rows that carry
/// it, each neighbor weighing `1 / (1 + d)`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightedKnn {
    pub k: usize,
}

impl ConstDefault for WeightedKnn {
    const DEFAULT: Self = Self { k: 10 };
}

impl Default for WeightedKnn {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Learner for WeightedKnn {
    fn train<'a>(&self, data: &'a DataSet, rows: &[usize]) -> Result<Box<dyn Predictor + 'a>> {
        if self.k == 0 {
            return Err(Error::Oracle {
                learner: self.describe(),
                message: "number of neighbors must be positive".to_owned(),
            });
        }
        if rows.is_empty() {
            return Err(Error::Oracle {
                learner: self.describe(),
                message: "no training rows".to_owned(),
            });
        }

        Ok(Box::new(WeightedKnnPredictor {
            search: LinearSearch::new(data, rows.to_vec(), Space::Features),
            n_labels: data.n_labels(),
            k: self.k,
        }))
    }

    fn describe(&self) -> String {
        format!("WeightedKnn(k={})", self.k)
    }
}

struct WeightedKnnPredictor<'a> {
    search: LinearSearch<'a>,
    n_labels: usize,
    k: usize,
}

impl<'a> Predictor for WeightedKnnPredictor<'a> {
    fn predict_distribution(&self, row: usize) -> Vec<f32> {
        let data = self.search.data();
        let mut confidences = vec![0.; self.n_labels];
        let mut total_weight = 0.;
        for (neighbor, d) in self.search.k_nearest_with_distances(row, self.k, false) {
            let weight = 1. / (1. + d);
            total_weight += weight;
            for (confidence, &active) in confidences.iter_mut().zip(data.labels(neighbor)) {
                if active {
                    *confidence += weight;
                }
            }
        }

        if total_weight > 0. {
            for confidence in &mut confidences {
                *confidence /= total_weight;
            }
        }
        confidences
    }
}
