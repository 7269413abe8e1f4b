//! Local sets and nearest enemies.
//!
//! The local set of an instance is the set of instances strictly closer to it than its nearest
//! enemy. An instance without any enemy has every other instance in its local set.
use crate::data::View;
use itertools::Itertools;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Decides whether two instances of a view are enemies.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EnemyCriterion {
    /// Any two instances of different classes.
    DifferentClass,
    /// Instances whose label vectors differ on more than the given fraction of labels.
    LabelHamming(f32),
}

/// Local sets of a group of view rows.
///
/// All indices, both the ones used for lookup and the ones returned, are positions within the
/// row list the local sets were built from.
#[derive(Clone, Debug)]
pub struct LocalSets {
    members: Vec<Vec<usize>>,
    nearest_enemies: Vec<Option<usize>>,
}

impl LocalSets {
    /// Compute local sets and nearest enemies among the given rows of a view.
    ///
    /// Distances are computed for every ordered pair of rows; the nearest enemy of a row is the
    /// first enemy at the minimum distance in row order.
    pub fn build(view: &View, rows: &[usize], criterion: EnemyCriterion) -> Self {
        let (members, nearest_enemies): (Vec<_>, Vec<_>) = rows
            .par_iter()
            .map(|&row| {
                let distances = rows.iter().map(|&other| view.distance(row, other)).collect_vec();

                let mut nearest_enemy: Option<(usize, f32)> = None;
                for (j, (&other, &d)) in rows.iter().zip(distances.iter()).enumerate() {
                    if other != row
                        && view.is_enemy(row, other, criterion)
                        && nearest_enemy.map_or(true, |(_, best_d)| d < best_d)
                    {
                        nearest_enemy = Some((j, d));
                    }
                }

                let enemy_distance = nearest_enemy.map_or(f32::INFINITY, |(_, d)| d);
                let local_set = rows
                    .iter()
                    .zip(distances.iter())
                    .enumerate()
                    .filter(|&(_, (&other, &d))| other != row && d < enemy_distance)
                    .map(|(j, _)| j)
                    .collect_vec();

                (local_set, nearest_enemy.map(|(j, _)| j))
            })
            .unzip();

        Self {
            members,
            nearest_enemies,
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn local_set(&self, i: usize) -> &[usize] {
        &self.members[i]
    }

    pub fn nearest_enemy(&self, i: usize) -> Option<usize> {
        self.nearest_enemies[i]
    }

    /// For each instance, the number of local sets that contain it.
    pub fn usefulness(&self) -> Vec<usize> {
        let mut counts = vec![0; self.len()];
        for &j in self.members.iter().flatten() {
            counts[j] += 1;
        }
        counts
    }

    /// For each instance, the number of instances that have it as nearest enemy.
    pub fn harmfulness(&self) -> Vec<usize> {
        let mut counts = vec![0; self.len()];
        for &j in self.nearest_enemies.iter().flatten() {
            counts[j] += 1;
        }
        counts
    }
}
