//! Iterative multi-label edited nearest neighbor (MLENN).
//!
//! Every round, each instance is predicted by the oracle trained on its nearest neighbors. The
//! instances with the highest Hamming loss are removed, until the mean loss falls below a fixed
//! fraction of the first round's mean or the losses no longer discriminate.
use crate::error::{Error, Result};
use crate::metric::label_hamming;
use crate::neighbors::{LinearSearch, Space};
use crate::oracle::{
    apply_threshold, check_distribution, resolve_threshold, Learner, Thresholding, WeightedKnn,
};
use crate::reduce::Reduction;
use crate::DataSet;
use const_default::ConstDefault;
use itertools::Itertools;
use log::{debug, info};
use ordered_float::NotNan;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HyperParam {
    /// The oracle is trained on the `k + 1` nearest neighbors of each instance.
    pub k: usize,
    /// Editing stops once the mean loss drops below this fraction of the first round's mean.
    pub stop_ratio: f32,
}

impl ConstDefault for HyperParam {
    const DEFAULT: Self = Self {
        k: 10,
        stop_ratio: 0.15,
    };
}

impl Default for HyperParam {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl HyperParam {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.k == 0 {
            Err("number of neighbors must be positive".to_owned())
        } else if !(self.stop_ratio >= 0.) {
            Err(format!(
                "stop_ratio must be non-negative, got {}",
                self.stop_ratio
            ))
        } else {
            Ok(())
        }
    }

    pub fn reduce(&self, data: &DataSet) -> Result<Reduction> {
        self.reduce_with(data, &WeightedKnn::DEFAULT)
    }

    pub fn reduce_with(&self, data: &DataSet, learner: &dyn Learner) -> Result<Reduction> {
        self.validate().map_err(Error::InvalidHyperParam)?;
        if data.is_empty() {
            return Err(Error::EmptyDataSet {
                name: data.name().to_owned(),
            });
        }

        info!(
            "Editing dataset {:?} ({} instances) with MLENN, k = {}",
            data.name(),
            data.len(),
            self.k
        );
        let start_t = time::precise_time_s();

        let mut pool = data.dedup_rows();
        debug!("Removed {} duplicate instances", data.len() - pool.len());

        let mut stop_threshold = None;
        let mut n_rounds = 0;
        loop {
            n_rounds += 1;
            let losses = self.hamming_losses(data, &pool, learner)?;
            let mean_loss = losses.iter().sum::<f32>() / losses.len() as f32;
            let stop_threshold = *stop_threshold.get_or_insert(mean_loss * self.stop_ratio);
            debug!(
                "Round {}: {} instances, mean Hamming loss {:.4} (stop below {:.4})",
                n_rounds,
                pool.len(),
                mean_loss,
                stop_threshold
            );
            if mean_loss < stop_threshold {
                break;
            }

            let mut distinct_losses = losses
                .iter()
                .map(|&loss| NotNan::new(loss).expect("Loss should not be NaN"))
                .collect_vec();
            distinct_losses.sort_unstable_by(|a, b| b.cmp(a));
            distinct_losses.dedup();
            if distinct_losses.len() == 1 {
                break;
            }

            let max_loss = distinct_losses[0].into_inner();
            pool = pool
                .into_iter()
                .zip_eq(losses)
                .filter(|&(_, loss)| loss < max_loss)
                .map(|(row, _)| row)
                .collect();

            if pool.len() <= 1 || distinct_losses.len() <= 2 {
                break;
            }
        }

        let reduction = Reduction::new(data, pool, start_t);
        info!(
            "MLENN kept {} of {} instances after {} rounds; it took {:.2}s",
            reduction.kept.len(),
            data.len(),
            n_rounds,
            reduction.elapsed_secs
        );
        Ok(reduction)
    }

    /// Hamming loss of every pool row when predicted from its own neighborhood.
    ///
    /// The prediction threshold is calibrated with PCut1 over all pool rows at once.
    fn hamming_losses(
        &self,
        data: &DataSet,
        pool: &[usize],
        learner: &dyn Learner,
    ) -> Result<Vec<f32>> {
        let search = LinearSearch::new(data, pool.to_vec(), Space::Features);
        let distributions = pool
            .par_iter()
            .map(|&row| -> Result<Vec<f32>> {
                let neighbors = search.k_nearest(row, self.k + 1, true);
                if neighbors.is_empty() {
                    return Ok(vec![0.; data.n_labels()]);
                }
                let predictor = learner.train(data, &neighbors)?;
                check_distribution(learner, data, row, predictor.predict_distribution(row))
            })
            .collect::<Result<Vec<_>>>()?;

        let threshold = resolve_threshold(Thresholding::PCut1, data, pool, &distributions);
        let n_labels = data.n_labels() as f32;
        Ok(pool
            .iter()
            .zip_eq(distributions.iter())
            .map(|(&row, confidences)| {
                let predicted = apply_threshold(confidences, threshold);
                label_hamming(data.labels(row), &predicted) as f32 / n_labels
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clusters_with_noise() -> DataSet {
        let mut rows = Vec::new();
        for i in 0..8 {
            rows.push((vec![i as f32 * 0.1], vec![true, false]));
            rows.push((vec![10. + i as f32 * 0.1], vec![false, true]));
        }
        // Mislabelled instances inside the opposite cluster
        rows.push((vec![0.35], vec![false, true]));
        rows.push((vec![10.35], vec![true, false]));
        DataSet::from_rows(rows).unwrap()
    }

    #[test]
    fn test_reduce_removes_mislabelled_instances() {
        let dataset = clusters_with_noise();
        let hyper_param = HyperParam {
            k: 3,
            ..HyperParam::DEFAULT
        };
        let reduction = hyper_param.reduce(&dataset).unwrap();
        assert_eq!((0..16).collect_vec(), reduction.kept);
    }

    #[test]
    fn test_reduce_removes_duplicates_first() {
        let mut rows = Vec::new();
        for i in 0..7 {
            rows.push((vec![i as f32, 0.], vec![i % 2 == 0, true]));
        }
        for i in 0..3 {
            rows.push((vec![i as f32, 0.], vec![i % 2 == 0, true]));
        }
        let dataset = DataSet::from_rows(rows).unwrap();
        assert_eq!((0..7).collect_vec(), dataset.dedup_rows());

        let reduction = HyperParam::DEFAULT.reduce(&dataset).unwrap();
        assert!(reduction.kept.iter().all(|&i| i < 7));
    }

    #[test]
    fn test_reduce_on_clean_data_keeps_everything() {
        let mut rows = Vec::new();
        for i in 0..6 {
            rows.push((vec![i as f32 * 0.1], vec![true]));
            rows.push((vec![10. + i as f32 * 0.1], vec![false]));
        }
        let dataset = DataSet::from_rows(rows).unwrap();
        let reduction = HyperParam {
            k: 2,
            ..HyperParam::DEFAULT
        }
        .reduce(&dataset)
        .unwrap();
        assert_eq!(12, reduction.kept.len());
    }

    struct ShortLearner;

    struct ShortPredictor;

    impl Learner for ShortLearner {
        fn train<'a>(
            &self,
            _: &'a DataSet,
            _: &[usize],
        ) -> Result<Box<dyn crate::oracle::Predictor + 'a>> {
            Ok(Box::new(ShortPredictor))
        }

        fn describe(&self) -> String {
            "ShortLearner".to_owned()
        }
    }

    impl crate::oracle::Predictor for ShortPredictor {
        fn predict_distribution(&self, _: usize) -> Vec<f32> {
            vec![0.5]
        }
    }

    #[test]
    fn test_reduce_with_bad_predictions_fails() {
        let dataset = clusters_with_noise();
        match HyperParam::DEFAULT.reduce_with(&dataset, &ShortLearner) {
            Err(Error::Oracle { learner, .. }) => assert_eq!("ShortLearner", learner),
            other => panic!("Unexpected result {:?}", other.map(|r| r.kept)),
        }
    }

    #[test]
    fn test_validate() {
        assert!(HyperParam::DEFAULT.validate().is_ok());
        assert!(HyperParam {
            k: 0,
            ..HyperParam::DEFAULT
        }
        .validate()
        .is_err());
    }
}
