//! Classifier evaluation oracle.
//!
//! Calibration and the iterative editors only need a multi-label learner that can be trained on
//! a subset of rows and asked for per-label confidences. Any type implementing [`Learner`] can
//! be plugged in; [`WeightedKnn`] is the default.
mod knn;

pub use self::knn::WeightedKnn;

use crate::error::{Error, Result};
use crate::metric::label_hamming;
use crate::DataSet;
use itertools::Itertools;
use ordered_float::NotNan;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// A multi-label learner.
pub trait Learner: Sync {
    /// Train on the given rows of a dataset.
    fn train<'a>(&self, data: &'a DataSet, rows: &[usize]) -> Result<Box<dyn Predictor + 'a>>;

    /// Short description used in diagnostics.
    fn describe(&self) -> String;
}

/// A trained learner.
pub trait Predictor: Sync {
    /// Per-label confidences for a row of the dataset the predictor was trained on.
    fn predict_distribution(&self, row: usize) -> Vec<f32>;
}

/// How confidences are turned into 0/1 label predictions.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Thresholding {
    /// A label is predicted iff its confidence is at least the given value.
    Fixed(f32),
    /// One threshold for all labels, chosen so the predicted label cardinality matches the
    /// training set's.
    PCut1,
}

/// Measures of one evaluation run; lower Hamming loss is better.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub hamming_loss: f32,
    pub exact_match: f32,
    pub predicted_cardinality: f32,
}

/// Train a learner on `train` and measure how well it predicts the labels of `test`.
pub fn evaluate(
    learner: &dyn Learner,
    data: &DataSet,
    train: &[usize],
    test: &[usize],
    thresholding: Thresholding,
) -> Result<Evaluation> {
    if test.is_empty() {
        return Err(Error::Oracle {
            learner: learner.describe(),
            message: "test set is empty".to_owned(),
        });
    }

    let predictor = learner.train(data, train)?;
    let distributions = test
        .par_iter()
        .map(|&row| check_distribution(learner, data, row, predictor.predict_distribution(row)))
        .collect::<Result<Vec<_>>>()?;
    let threshold = resolve_threshold(thresholding, data, train, &distributions);

    let predictions = distributions
        .iter()
        .map(|confidences| apply_threshold(confidences, threshold))
        .collect_vec();
    Ok(score(data, test, &predictions))
}

/// Reject predictions that do not hold one finite confidence per label.
pub(crate) fn check_distribution(
    learner: &dyn Learner,
    data: &DataSet,
    row: usize,
    confidences: Vec<f32>,
) -> Result<Vec<f32>> {
    let message = if confidences.len() != data.n_labels() {
        format!(
            "row {} got {} confidences for {} labels",
            row,
            confidences.len(),
            data.n_labels()
        )
    } else if let Some(c) = confidences.iter().find(|c| !c.is_finite()) {
        format!("row {} got non-finite confidence {}", row, c)
    } else {
        return Ok(confidences);
    };
    Err(Error::Oracle {
        learner: learner.describe(),
        message,
    })
}

/// Turn a thresholding strategy into a concrete threshold for the given distributions.
pub(crate) fn resolve_threshold(
    thresholding: Thresholding,
    data: &DataSet,
    train: &[usize],
    distributions: &[Vec<f32>],
) -> f32 {
    match thresholding {
        Thresholding::Fixed(t) => t,
        Thresholding::PCut1 => {
            let cardinality = if train.is_empty() {
                0.
            } else {
                train
                    .iter()
                    .map(|&i| data.labels(i).iter().filter(|&&l| l).count())
                    .sum::<usize>() as f32
                    / train.len() as f32
            };
            pcut1(distributions, cardinality)
        }
    }
}

pub(crate) fn apply_threshold(confidences: &[f32], threshold: f32) -> Vec<bool> {
    confidences.iter().map(|&c| c >= threshold).collect()
}

/// Pick the threshold that makes the average number of predicted labels per row as close as
/// possible to `cardinality`.
pub(crate) fn pcut1(distributions: &[Vec<f32>], cardinality: f32) -> f32 {
    let mut confidences = distributions
        .iter()
        .flatten()
        .map(|&c| NotNan::new(c).expect("Confidence should not be NaN"))
        .collect_vec();
    if confidences.is_empty() {
        return 0.5;
    }
    confidences.sort_unstable_by(|a, b| b.cmp(a));

    let n_positive = (cardinality * distributions.len() as f32).round() as usize;
    if n_positive == 0 {
        confidences[0].into_inner() + 1e-5
    } else if n_positive >= confidences.len() {
        0.
    } else {
        let midpoint =
            (confidences[n_positive - 1].into_inner() + confidences[n_positive].into_inner()) / 2.;
        midpoint.max(1e-5)
    }
}

fn score(data: &DataSet, test: &[usize], predictions: &[Vec<bool>]) -> Evaluation {
    assert_eq!(test.len(), predictions.len());
    let n_labels = data.n_labels().max(1) as f32;
    let n_rows = test.len() as f32;

    let (mut hamming_loss, mut exact_match, mut predicted_cardinality) = (0., 0., 0.);
    for (&row, predicted) in test.iter().zip(predictions.iter()) {
        let n_wrong = label_hamming(data.labels(row), predicted);
        hamming_loss += n_wrong as f32 / n_labels;
        if n_wrong == 0 {
            exact_match += 1.;
        }
        predicted_cardinality += predicted.iter().filter(|&&l| l).count() as f32;
    }

    Evaluation {
        hamming_loss: hamming_loss / n_rows,
        exact_match: exact_match / n_rows,
        predicted_cardinality: predicted_cardinality / n_rows,
    }
}
