use super::Decomposition;
use crate::data::View;
use crate::selection::Selector;
use crate::util::ViewProgress;
use crate::DataSet;
use itertools::Itertools;
use log::{debug, warn};
use rand::prelude::*;

/// The label groups whose views get a vote.
///
/// Binary relevance uses every label on its own; random labelsets cut `m` seeded shuffles of the
/// labels into disjoint groups of at most `k` labels.
pub(crate) fn label_groups(
    decomposition: Decomposition,
    n_labels: usize,
    seed: u64,
) -> Vec<Vec<usize>> {
    match decomposition {
        Decomposition::BinaryRelevance => (0..n_labels).map(|label| vec![label]).collect(),
        Decomposition::RandomLabelsets { k, m } => {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut groups = Vec::with_capacity(m * ((n_labels + k - 1) / k));
            for _ in 0..m {
                let mut labels = (0..n_labels).collect_vec();
                labels.shuffle(&mut rng);
                groups.extend(labels.chunks(k).map(<[usize]>::to_vec));
            }
            groups
        }
        Decomposition::LabelPowerset => vec![(0..n_labels).collect()],
    }
}

/// Run the selector on one view per label group and count, for each row, how many views flag
/// it.
pub(crate) fn collect_votes(
    data: &DataSet,
    selector: &Selector,
    groups: &[Vec<usize>],
    show_progress: bool,
) -> Vec<u32> {
    let mut votes = vec![0u32; data.len()];
    let mut progress = ViewProgress::new(selector.name(), groups.len(), show_progress);
    for group in groups {
        let view = if group.len() == 1 {
            View::binary_relevance(data, group[0])
        } else {
            View::label_subset(data, group)
        };
        let flags = selector.flag_removals(&view);
        let mut n_flagged = 0;
        for (vote, flagged) in votes.iter_mut().zip_eq(flags) {
            if flagged {
                *vote += 1;
                n_flagged += 1;
            }
        }
        debug!(
            "{} flagged {} of {} instances on labels {:?}",
            selector.name(),
            n_flagged,
            data.len(),
            group
        );
        progress.tick();
    }
    progress.finish();
    votes
}

/// Run the selector once on the label powerset view; the flags are final.
///
/// If every row would be removed, the first one is kept.
pub(crate) fn flag_label_powerset(data: &DataSet, selector: &Selector) -> Vec<bool> {
    let view = View::label_powerset(data);
    debug!(
        "Label powerset view of {:?} has {} labelsets",
        data.name(),
        view.n_classes()
    );
    let mut flags = selector.flag_removals(&view);
    if !flags.is_empty() && flags.iter().all(|&f| f) {
        warn!(
            "{} removed every instance of dataset {:?}; keeping the first one",
            selector.name(),
            data.name()
        );
        flags[0] = false;
    }
    flags
}
