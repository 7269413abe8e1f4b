//! Multi-label instance selection by decomposition.
//!
//! A [`HyperParam`] picks a decomposition and a selector. Label powerset runs the selector once
//! and keeps what it keeps. The voting decompositions run it once per label group, count
//! removal votes per row and keep the rows whose vote count stays below a calibrated threshold.
pub mod calibrate;
mod decompose;

pub use self::calibrate::FitnessPoint;

use crate::error::{Error, Result};
use crate::oracle::{Learner, WeightedKnn};
use crate::selection::Selector;
use crate::DataSet;
use const_default::ConstDefault;
use log::info;
use serde::{Deserialize, Serialize};

/// How a multi-label dataset is presented to a single-label selector.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decomposition {
    /// One binary view per label; removal votes are calibrated.
    BinaryRelevance,
    /// One multiclass view over whole labelsets; removals are final.
    LabelPowerset,
    /// `m` random partitions of the labels into groups of `k`, one labelset view per group;
    /// removal votes are calibrated.
    RandomLabelsets { k: usize, m: usize },
}

impl ConstDefault for Decomposition {
    const DEFAULT: Self = Decomposition::BinaryRelevance;
}

impl Default for Decomposition {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Settings of a decomposition-based reduction.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HyperParam {
    pub decomposition: Decomposition,
    pub selector: Selector,
    pub calibration: calibrate::HyperParam,
    /// Seeds the held-out sample and the label shuffles.
    pub seed: u64,
    /// Draw a progress bar over the views of voting decompositions.
    pub show_progress: bool,
}

impl ConstDefault for HyperParam {
    const DEFAULT: Self = Self {
        decomposition: Decomposition::DEFAULT,
        selector: Selector::DEFAULT,
        calibration: calibrate::HyperParam::DEFAULT,
        seed: 1,
        show_progress: true,
    };
}

impl Default for HyperParam {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl HyperParam {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if let Decomposition::RandomLabelsets { k, m } = self.decomposition {
            if k == 0 || m == 0 {
                return Err(format!(
                    "labelset size and number of partitions must be positive, got k = {}, m = {}",
                    k, m
                ));
            }
        }
        self.selector.validate()?;
        self.calibration.validate()
    }

    /// Reduce a dataset, calibrating vote thresholds with the default learner.
    pub fn reduce(&self, data: &DataSet) -> Result<Reduction> {
        self.reduce_with(data, &WeightedKnn::DEFAULT)
    }

    /// Reduce a dataset, calibrating vote thresholds with the given learner.
    pub fn reduce_with(&self, data: &DataSet, learner: &dyn Learner) -> Result<Reduction> {
        self.validate().map_err(Error::InvalidHyperParam)?;
        if data.is_empty() {
            return Err(Error::EmptyDataSet {
                name: data.name().to_owned(),
            });
        }

        info!(
            "Reducing dataset {:?} ({} instances, {} labels) with {} over {:?}",
            data.name(),
            data.len(),
            data.n_labels(),
            self.selector.name(),
            self.decomposition
        );
        let start_t = time::precise_time_s();

        let reduction = match self.decomposition {
            Decomposition::LabelPowerset => {
                let flags = decompose::flag_label_powerset(data, &self.selector);
                let kept = (0..data.len()).filter(|&i| !flags[i]).collect::<Vec<_>>();
                Reduction::new(data, kept, start_t)
            }
            Decomposition::BinaryRelevance | Decomposition::RandomLabelsets { .. } => {
                let groups =
                    decompose::label_groups(self.decomposition, data.n_labels(), self.seed);
                let votes =
                    decompose::collect_votes(data, &self.selector, &groups, self.show_progress);
                let (threshold, fitness) = calibrate::calibrate(
                    data,
                    &votes,
                    groups.len() as u32,
                    learner,
                    &self.calibration,
                    self.seed,
                );
                let kept = calibrate::rows_below(&votes, threshold);
                let mut reduction = Reduction::new(data, kept, start_t);
                reduction.votes = Some(votes);
                reduction.threshold = Some(threshold);
                reduction.fitness = fitness;
                reduction
            }
        };

        info!(
            "Kept {} of {} instances; it took {:.2}s",
            reduction.kept.len(),
            data.len(),
            reduction.elapsed_secs
        );
        Ok(reduction)
    }
}

/// Outcome of a reduction call.
#[derive(Clone, Debug)]
pub struct Reduction {
    /// The kept rows, in their original order.
    pub dataset: DataSet,
    /// Original indices of the kept rows, ascending.
    pub kept: Vec<usize>,
    /// Removal votes per original row, for voting decompositions.
    pub votes: Option<Vec<u32>>,
    /// Chosen vote threshold; a row is kept iff its votes are strictly below it.
    pub threshold: Option<u32>,
    /// Every evaluated threshold candidate, in scan order.
    pub fitness: Vec<FitnessPoint>,
    pub n_original: usize,
    pub elapsed_secs: f64,
}

impl Reduction {
    pub(crate) fn new(data: &DataSet, kept: Vec<usize>, start_t: f64) -> Self {
        assert!(kept.len() <= data.len());
        Self {
            dataset: data.select(&kept),
            kept,
            votes: None,
            threshold: None,
            fitness: Vec::new(),
            n_original: data.len(),
            elapsed_secs: time::precise_time_s() - start_t,
        }
    }

    /// Fraction of the original rows that were removed.
    pub fn compression(&self) -> f32 {
        if self.n_original == 0 {
            0.
        } else {
            1. - self.kept.len() as f32 / self.n_original as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GraphOrder;

    fn labelled_line() -> DataSet {
        DataSet::from_rows(
            (0..30)
                .map(|i| {
                    let x = i as f32;
                    (vec![x], vec![i < 15, i % 2 == 0, i >= 10])
                })
                .collect(),
        )
        .unwrap()
        .with_name("line")
    }

    #[test]
    fn test_reduce_label_powerset() {
        let dataset = DataSet::from_rows(vec![
            (vec![0.], vec![true, false]),
            (vec![1.], vec![true, false]),
            (vec![2.], vec![true, false]),
            (vec![3.], vec![true, false]),
            (vec![4.], vec![false, true]),
            (vec![20.], vec![false, true]),
            (vec![21.], vec![false, true]),
        ])
        .unwrap();
        let hyper_param = HyperParam {
            decomposition: Decomposition::LabelPowerset,
            selector: Selector::RelativeNeighborhoodGraph {
                order: GraphOrder::First,
            },
            show_progress: false,
            ..HyperParam::DEFAULT
        };
        let reduction = hyper_param.reduce(&dataset).unwrap();
        assert_eq!(vec![0, 1, 2, 3, 5, 6], reduction.kept);
        assert_eq!(6, reduction.dataset.len());
        assert_eq!(&[false, true], reduction.dataset.labels(4));
        assert!(reduction.votes.is_none());
        assert!(reduction.threshold.is_none());
        assert_approx_eq!(1. / 7., reduction.compression());
    }

    #[test]
    fn test_reduce_with_votes() {
        let dataset = labelled_line();
        for decomposition in &[
            Decomposition::BinaryRelevance,
            Decomposition::RandomLabelsets { k: 2, m: 2 },
        ] {
            let hyper_param = HyperParam {
                decomposition: *decomposition,
                show_progress: false,
                ..HyperParam::DEFAULT
            };
            let reduction = hyper_param.reduce(&dataset).unwrap();
            let votes = reduction.votes.as_ref().unwrap();
            let threshold = reduction.threshold.unwrap();
            assert_eq!(30, votes.len());
            assert!(threshold >= 1);
            for (i, &v) in votes.iter().enumerate() {
                assert_eq!(v < threshold, reduction.kept.contains(&i));
            }
            assert!(!reduction.kept.is_empty());
            assert!(reduction
                .fitness
                .iter()
                .any(|point| point.threshold == threshold));

            // Identical settings reproduce the same result
            let again = hyper_param.reduce(&dataset).unwrap();
            assert_eq!(reduction.votes, again.votes);
            assert_eq!(reduction.kept, again.kept);
        }
    }

    #[test]
    fn test_reduce_errors() {
        let empty = DataSet::from_rows(vec![]).unwrap().with_name("empty");
        assert_eq!(
            Err(Error::EmptyDataSet {
                name: "empty".to_owned()
            }),
            HyperParam::DEFAULT.reduce(&empty).map(|r| r.kept)
        );

        let hyper_param = HyperParam {
            decomposition: Decomposition::RandomLabelsets { k: 0, m: 1 },
            ..HyperParam::DEFAULT
        };
        assert!(match hyper_param.reduce(&labelled_line()) {
            Err(Error::InvalidHyperParam(_)) => true,
            _ => false,
        });
    }
}
