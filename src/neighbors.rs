//! Linear nearest-neighbor search over an explicit pool of dataset rows.
//!
//! The search holds a snapshot of the pool. Algorithms that add rows to or remove rows from
//! their working pool must build a new search afterwards, so that every query sees the current
//! pool.
use crate::DataSet;
use itertools::Itertools;
use ordered_float::NotNan;
use serde::{Deserialize, Serialize};

/// The vector space in which distances are measured.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Space {
    /// Feature values only.
    Features,
    /// Feature values followed by the 0/1 label values.
    FeaturesAndLabels,
}

pub struct LinearSearch<'a> {
    data: &'a DataSet,
    pool: Vec<usize>,
    space: Space,
}

impl<'a> LinearSearch<'a> {
    pub fn new(data: &'a DataSet, pool: Vec<usize>, space: Space) -> Self {
        assert!(pool.iter().all(|&i| i < data.len()));
        Self { data, pool, space }
    }

    pub fn data(&self) -> &'a DataSet {
        self.data
    }

    pub fn pool(&self) -> &[usize] {
        &self.pool
    }

    pub fn distance(&self, a: usize, b: usize) -> f32 {
        self.data.distance(a, b, self.space)
    }

    /// Find the pool row closest to the target row, other than the target itself.
    ///
    /// Ties go to the row that comes first in the pool.
    pub fn nearest(&self, target: usize) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for &i in &self.pool {
            if i == target {
                continue;
            }
            let d = self.distance(target, i);
            if best.map_or(true, |(_, best_d)| d < best_d) {
                best = Some((i, d));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Find the k pool rows closest to the target row, in ascending order of distance.
    ///
    /// The target itself is never returned; with `skip_identical`, neither is any row at
    /// distance 0 from it. Ties keep pool order.
    pub fn k_nearest(&self, target: usize, k: usize, skip_identical: bool) -> Vec<usize> {
        self.k_nearest_with_distances(target, k, skip_identical)
            .into_iter()
            .map(|(i, _)| i)
            .collect()
    }

    /// Same as `k_nearest`, but also returns the distance to each neighbor.
    pub fn k_nearest_with_distances(
        &self,
        target: usize,
        k: usize,
        skip_identical: bool,
    ) -> Vec<(usize, f32)> {
        let mut candidates = self
            .pool
            .iter()
            .filter(|&&i| i != target)
            .map(|&i| (i, self.distance(target, i)))
            .filter(|&(_, d)| !(skip_identical && d == 0.))
            .collect_vec();
        // Stable sort, so equally distant rows stay in pool order
        candidates.sort_by_key(|&(_, d)| NotNan::new(d).expect("Distance should not be NaN"));
        candidates.truncate(k);
        candidates
    }
}
