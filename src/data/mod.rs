use crate::error::{Error, Result};
use crate::metric::{label_hamming, squared_feature_distance};
use crate::neighbors::Space;
use crate::{DenseMat, DenseVecView, LabelVec};
use hashbrown::HashSet;
use itertools::Itertools;
use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

mod view;
pub use self::view::View;

/// How a feature column is compared by the distance function.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureKind {
    Numeric,
    /// Values are category codes; distinct codes are at distance 1.
    Nominal,
}

/// A multi-label dataset held in memory.
///
/// Each row is one instance: a feature vector plus a binary label vector of length
/// `n_labels`. The positional row index identifies an instance throughout a reduction pass.
#[derive(Clone, Debug)]
pub struct DataSet {
    pub(crate) name: String,
    pub(crate) feature_kinds: Vec<FeatureKind>,
    pub(crate) features: DenseMat,
    pub(crate) label_sets: Vec<LabelVec>,
    pub(crate) n_labels: usize,
}

impl DataSet {
    /// Create a dataset with all-numeric features.
    pub fn new(features: DenseMat, label_sets: Vec<LabelVec>) -> Result<Self> {
        let n_labels = label_sets.first().map_or(0, Vec::len);
        if label_sets.len() != features.nrows() {
            return Err(Error::DimensionMismatch {
                row: label_sets.len().min(features.nrows()),
                what: "rows of labels",
                expected: features.nrows(),
                actual: label_sets.len(),
            });
        }
        if let Some((row, labels)) = label_sets
            .iter()
            .enumerate()
            .find(|(_, labels)| labels.len() != n_labels)
        {
            return Err(Error::DimensionMismatch {
                row,
                what: "labels",
                expected: n_labels,
                actual: labels.len(),
            });
        }
        if !label_sets.is_empty() && n_labels == 0 {
            return Err(Error::InvalidLabelCount {
                n_labels,
                n_attributes: features.ncols(),
            });
        }
        if let Some(((row, column), &value)) =
            features.indexed_iter().find(|(_, v)| !v.is_finite())
        {
            return Err(Error::InvalidFeatureValue { row, column, value });
        }

        Ok(Self {
            name: String::new(),
            feature_kinds: vec![FeatureKind::Numeric; features.ncols()],
            features,
            label_sets,
            n_labels,
        })
    }

    /// Create a dataset from a list of (features, labels) rows.
    pub fn from_rows(rows: Vec<(Vec<f32>, LabelVec)>) -> Result<Self> {
        let n_features = rows.first().map_or(0, |(f, _)| f.len());
        if let Some((row, (features, _))) = rows
            .iter()
            .enumerate()
            .find(|(_, (f, _))| f.len() != n_features)
        {
            return Err(Error::DimensionMismatch {
                row,
                what: "features",
                expected: n_features,
                actual: features.len(),
            });
        }

        let mut matrix = Array2::<f32>::zeros((rows.len(), n_features));
        let mut label_sets = Vec::with_capacity(rows.len());
        for (i, (features, labels)) in rows.into_iter().enumerate() {
            for (j, v) in features.into_iter().enumerate() {
                matrix[[i, j]] = v;
            }
            label_sets.push(labels);
        }
        Self::new(matrix, label_sets)
    }

    /// Create a dataset from a matrix whose leading `n_labels` columns hold the labels.
    ///
    /// Label columns must contain only 0 and 1; `feature_kinds` describes the remaining
    /// columns.
    pub fn from_attribute_matrix(
        matrix: DenseMat,
        n_labels: usize,
        feature_kinds: Vec<FeatureKind>,
    ) -> Result<Self> {
        let n_attributes = matrix.ncols();
        if n_labels == 0 || n_labels >= n_attributes {
            return Err(Error::InvalidLabelCount {
                n_labels,
                n_attributes,
            });
        }

        let mut label_sets = Vec::with_capacity(matrix.nrows());
        for (row, values) in matrix.outer_iter().enumerate() {
            let mut labels = LabelVec::with_capacity(n_labels);
            for (label, &value) in values.iter().take(n_labels).enumerate() {
                labels.push(if value == 1. {
                    true
                } else if value == 0. {
                    false
                } else {
                    return Err(Error::InvalidLabelValue { row, label, value });
                });
            }
            label_sets.push(labels);
        }

        let features = matrix.slice(ndarray::s![.., n_labels..]).to_owned();
        Self::new(features, label_sets)?.with_feature_kinds(feature_kinds)
    }

    /// Set the kind of every feature column.
    pub fn with_feature_kinds(mut self, feature_kinds: Vec<FeatureKind>) -> Result<Self> {
        if feature_kinds.len() != self.n_features() {
            return Err(Error::DimensionMismatch {
                row: 0,
                what: "feature kinds",
                expected: self.n_features(),
                actual: feature_kinds.len(),
            });
        }
        self.feature_kinds = feature_kinds;
        Ok(self)
    }

    /// Set the name used to identify the dataset in diagnostics.
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_owned();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.label_sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.label_sets.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    pub fn n_labels(&self) -> usize {
        self.n_labels
    }

    pub fn feature_kinds(&self) -> &[FeatureKind] {
        &self.feature_kinds
    }

    pub fn features(&self, row: usize) -> DenseVecView {
        self.features.row(row)
    }

    pub fn labels(&self, row: usize) -> &[bool] {
        &self.label_sets[row]
    }

    pub fn label_sets(&self) -> &[LabelVec] {
        &self.label_sets
    }

    /// Mean number of active labels per instance.
    pub fn label_cardinality(&self) -> f32 {
        if self.is_empty() {
            return 0.;
        }
        let n_active: usize = self
            .label_sets
            .iter()
            .map(|labels| labels.iter().filter(|&&l| l).count())
            .sum();
        n_active as f32 / self.len() as f32
    }

    /// Number of instances carrying each label.
    pub fn label_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.n_labels];
        for labels in &self.label_sets {
            for (count, &active) in counts.iter_mut().zip(labels.iter()) {
                *count += active as usize;
            }
        }
        counts
    }

    /// Euclidean distance between two rows in the given space.
    pub fn distance(&self, a: usize, b: usize, space: Space) -> f32 {
        let mut sum = squared_feature_distance(
            self.features.row(a),
            self.features.row(b),
            &self.feature_kinds,
        );
        if space == Space::FeaturesAndLabels {
            sum += label_hamming(&self.label_sets[a], &self.label_sets[b]) as f32;
        }
        sum.sqrt()
    }

    /// Copy the given rows, in the given order, into a new dataset.
    pub fn select(&self, rows: &[usize]) -> Self {
        Self {
            name: self.name.clone(),
            feature_kinds: self.feature_kinds.clone(),
            features: self.features.select(Axis(0), rows),
            label_sets: rows.iter().map(|&i| self.label_sets[i].clone()).collect(),
            n_labels: self.n_labels,
        }
    }

    /// Rows left after dropping every row identical to an earlier one.
    ///
    /// Two rows are identical when all of their feature values and labels agree.
    pub fn dedup_rows(&self) -> Vec<usize> {
        let mut seen = HashSet::<(Vec<u32>, &[bool])>::with_capacity(self.len());
        (0..self.len())
            .filter(|&i| {
                // Adding 0 folds -0.0 into 0.0 so both produce the same bits
                let key = self
                    .features
                    .row(i)
                    .iter()
                    .map(|&v| (v + 0.).to_bits())
                    .collect_vec();
                seen.insert((key, &self.label_sets[i][..]))
            })
            .collect()
    }

    /// Rescale numeric feature columns to the [0, 1] range.
    ///
    /// Constant columns become 0. Nominal columns and labels are left unchanged.
    pub fn normalize_features(&mut self) {
        if self.is_empty() {
            return;
        }
        for (mut column, kind) in self
            .features
            .axis_iter_mut(Axis(1))
            .zip(self.feature_kinds.iter())
        {
            if *kind != FeatureKind::Numeric {
                continue;
            }
            let (min, max) = column
                .iter()
                .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                    (lo.min(v), hi.max(v))
                });
            if max > min {
                column.mapv_inplace(|v| (v - min) / (max - min));
            } else {
                column.fill(0.);
            }
        }
    }
}
