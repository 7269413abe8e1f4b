use super::DataSet;
use crate::local_set::EnemyCriterion;
use crate::metric::label_hamming_fraction;
use crate::neighbors::Space;
use crate::LabelVec;
use hashbrown::HashMap;
use itertools::Itertools;

/// A single-label view of a multi-label dataset.
///
/// Features are shared with the underlying dataset; each row is assigned one class. A class
/// stands for a vector of labels (a single label for binary relevance, a labelset for label
/// powerset) which is what the label-Hamming enemy test compares.
pub struct View<'a> {
    data: &'a DataSet,
    classes: Vec<usize>,
    class_label_sets: Vec<LabelVec>,
}

impl<'a> View<'a> {
    /// View with the given label as the sole binary class.
    pub fn binary_relevance(data: &'a DataSet, label: usize) -> Self {
        assert!(label < data.n_labels());
        let classes = data
            .label_sets
            .iter()
            .map(|labels| labels[label] as usize)
            .collect_vec();
        Self {
            data,
            classes,
            class_label_sets: vec![vec![false], vec![true]],
        }
    }

    /// View whose class identifies the full labelset of each row.
    pub fn label_powerset(data: &'a DataSet) -> Self {
        Self::label_subset(data, &(0..data.n_labels()).collect_vec())
    }

    /// View whose class identifies the labelset of each row restricted to the given labels.
    ///
    /// Class ids are assigned in order of first appearance.
    pub fn label_subset(data: &'a DataSet, labels: &[usize]) -> Self {
        assert!(labels.iter().all(|&l| l < data.n_labels()));
        let mut labelset_to_class = HashMap::<LabelVec, usize>::new();
        let mut class_label_sets = Vec::<LabelVec>::new();
        let classes = data
            .label_sets
            .iter()
            .map(|row_labels| {
                let labelset = labels.iter().map(|&l| row_labels[l]).collect_vec();
                *labelset_to_class.entry(labelset).or_insert_with_key(|labelset| {
                    class_label_sets.push(labelset.clone());
                    class_label_sets.len() - 1
                })
            })
            .collect_vec();
        Self {
            data,
            classes,
            class_label_sets,
        }
    }

    pub fn data(&self) -> &'a DataSet {
        self.data
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn n_classes(&self) -> usize {
        self.class_label_sets.len()
    }

    pub fn class(&self, row: usize) -> usize {
        self.classes[row]
    }

    pub fn classes(&self) -> &[usize] {
        &self.classes
    }

    /// The labels that a class stands for.
    pub fn class_label_set(&self, class: usize) -> &[bool] {
        &self.class_label_sets[class]
    }

    /// Feature-space distance between two rows.
    pub fn distance(&self, a: usize, b: usize) -> f32 {
        self.data.distance(a, b, Space::Features)
    }

    /// Whether two rows count as enemies of each other.
    pub fn is_enemy(&self, a: usize, b: usize, criterion: EnemyCriterion) -> bool {
        let (class_a, class_b) = (self.classes[a], self.classes[b]);
        match criterion {
            EnemyCriterion::DifferentClass => class_a != class_b,
            EnemyCriterion::LabelHamming(threshold) => {
                class_a != class_b
                    && label_hamming_fraction(
                        &self.class_label_sets[class_a],
                        &self.class_label_sets[class_b],
                    ) > threshold
            }
        }
    }
}
