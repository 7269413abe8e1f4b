//! Single-label instance selection algorithms.
//!
//! Every algorithm reads a [`View`] and flags the rows it would remove; it never changes the
//! underlying dataset. Decompositions turn those flags into votes or final decisions.
mod condense;
mod edit;
mod graph;
mod local_set;

use crate::data::View;
use const_default::ConstDefault;
use serde::{Deserialize, Serialize};

pub use self::condense::condense;
pub use self::edit::edit;
pub use self::graph::relative_neighborhood_edit;
pub use self::local_set::{local_set_ordered_prune, local_set_prune, local_set_stat_prune};

/// Which neighbors the relative neighborhood graph editor looks at.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GraphOrder {
    /// Direct graph neighbors only.
    First,
    /// Direct neighbors, extended with the neighbors of same-class neighbors.
    Second,
}

impl ConstDefault for GraphOrder {
    const DEFAULT: Self = GraphOrder::First;
}

impl Default for GraphOrder {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// An instance selection algorithm and its settings.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Selector {
    /// Condensed nearest neighbor (CNN).
    Condense,
    /// Edited nearest neighbor (ENN) with k neighbors.
    Edit { k: usize },
    /// Local-set based smoother (LSSm); enemies must differ on more than `threshold` of their
    /// labels.
    LocalSetPrune { threshold: f32 },
    /// Local-set border selection (LSBo): LSSm followed by a greedy cover of the survivors.
    LocalSetOrderedPrune {
        threshold: f32,
        ordering_threshold: f32,
    },
    /// Local-set based smoother using plain class equality for enemies (LSS).
    LocalSetStat,
    /// Relative neighborhood graph editing (RNGE).
    RelativeNeighborhoodGraph {
        #[serde(default)]
        order: GraphOrder,
    },
}

impl ConstDefault for Selector {
    const DEFAULT: Self = Selector::Edit { k: 3 };
}

impl Default for Selector {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Selector {
    /// Run the algorithm on a view; the i-th flag is set if row i should be removed.
    pub fn flag_removals(&self, view: &View) -> Vec<bool> {
        let flags = match *self {
            Selector::Condense => condense(view),
            Selector::Edit { k } => edit(view, k),
            Selector::LocalSetPrune { threshold } => local_set_prune(view, threshold),
            Selector::LocalSetOrderedPrune {
                threshold,
                ordering_threshold,
            } => local_set_ordered_prune(view, threshold, ordering_threshold),
            Selector::LocalSetStat => local_set_stat_prune(view),
            Selector::RelativeNeighborhoodGraph { order } => relative_neighborhood_edit(view, order),
        };
        assert_eq!(view.len(), flags.len());
        flags
    }

    pub fn name(&self) -> &'static str {
        match self {
            Selector::Condense => "CNN",
            Selector::Edit { .. } => "ENN",
            Selector::LocalSetPrune { .. } => "LSSm",
            Selector::LocalSetOrderedPrune { .. } => "LSBo",
            Selector::LocalSetStat => "LSS",
            Selector::RelativeNeighborhoodGraph { .. } => "RNGE",
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let check_threshold = |name: &str, t: f32| {
            if (0. ..=1.).contains(&t) {
                Ok(())
            } else {
                Err(format!("{} must be in [0, 1], got {}", name, t))
            }
        };
        match *self {
            Selector::Edit { k } if k == 0 => {
                Err("number of neighbors for editing must be positive".to_owned())
            }
            Selector::LocalSetPrune { threshold } => check_threshold("threshold", threshold),
            Selector::LocalSetOrderedPrune {
                threshold,
                ordering_threshold,
            } => {
                check_threshold("threshold", threshold)?;
                check_threshold("ordering_threshold", ordering_threshold)
            }
            _ => Ok(()),
        }
    }
}

/// Predict a class by majority vote among the given neighbor classes.
///
/// Counts are scanned in ascending class order and the first strict maximum wins; without any
/// neighbor there is no prediction.
pub(crate) fn majority_class<I>(n_classes: usize, neighbor_classes: I) -> Option<usize>
where
    I: IntoIterator<Item = usize>,
{
    let mut counts = vec![0usize; n_classes];
    for class in neighbor_classes {
        counts[class] += 1;
    }

    let mut prediction = None;
    let mut max_count = 0;
    for (class, &count) in counts.iter().enumerate() {
        if count > max_count {
            prediction = Some(class);
            max_count = count;
        }
    }
    prediction
}

/// Whether majority vote among the given neighbor rows disagrees with the target's class.
///
/// A target without neighbors is always misclassified.
pub(crate) fn is_misclassified<I>(view: &View, target: usize, neighbors: I) -> bool
where
    I: IntoIterator<Item = usize>,
{
    let prediction = majority_class(
        view.n_classes(),
        neighbors.into_iter().map(|row| view.class(row)),
    );
    prediction != Some(view.class(target))
}
