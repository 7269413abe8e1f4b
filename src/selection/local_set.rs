use crate::data::View;
use crate::local_set::{EnemyCriterion, LocalSets};
use bit_set::BitSet;
use itertools::Itertools;
use log::{debug, warn};

/// Local-set based smoother with a label-Hamming enemy test (LSSm).
pub fn local_set_prune(view: &View, threshold: f32) -> Vec<bool> {
    let rows = (0..view.len()).collect_vec();
    flag_harmful(&LocalSets::build(
        view,
        &rows,
        EnemyCriterion::LabelHamming(threshold),
    ))
}

/// Local-set based smoother with plain class inequality as enemy test (LSS).
pub fn local_set_stat_prune(view: &View) -> Vec<bool> {
    let rows = (0..view.len()).collect_vec();
    flag_harmful(&LocalSets::build(view, &rows, EnemyCriterion::DifferentClass))
}

/// Flag every instance that is the nearest enemy of more instances than local sets it belongs
/// to.
fn flag_harmful(local_sets: &LocalSets) -> Vec<bool> {
    local_sets
        .usefulness()
        .into_iter()
        .zip_eq(local_sets.harmfulness())
        .map(|(u, h)| u < h)
        .collect()
}

/// Local-set border selection (LSBo).
///
/// Smooths the view with LSSm first, then visits the survivors from the largest local set to
/// the smallest and keeps an instance only if its local set is disjoint from the local sets of
/// all instances kept so far.
pub fn local_set_ordered_prune(view: &View, threshold: f32, ordering_threshold: f32) -> Vec<bool> {
    let n = view.len();
    let smoothed = local_set_prune(view, threshold);
    let survivors = (0..n).filter(|&i| !smoothed[i]).collect_vec();
    debug!(
        "LSBo: {} of {} instances survived smoothing",
        survivors.len(),
        n
    );

    let mut flags = vec![true; n];
    if survivors.is_empty() {
        if n > 0 {
            warn!("LSBo smoothing removed every instance; keeping the first one");
            flags[0] = false;
        }
        return flags;
    }

    let local_sets = LocalSets::build(
        view,
        &survivors,
        EnemyCriterion::LabelHamming(ordering_threshold),
    );
    // Stable sort keeps row order among equally large local sets
    let mut order = (0..survivors.len()).collect_vec();
    order.sort_by_key(|&i| std::cmp::Reverse(local_sets.local_set(i).len()));

    let mut covered = BitSet::with_capacity(survivors.len());
    let mut n_kept = 0;
    for i in order {
        let local_set = local_sets.local_set(i);
        if local_set.iter().all(|&j| !covered.contains(j)) {
            flags[survivors[i]] = false;
            covered.extend(local_set.iter().cloned());
            n_kept += 1;
        }
    }

    if n_kept == 0 {
        warn!("LSBo kept no instance; keeping the first smoothed one");
        flags[survivors[0]] = false;
    }
    flags
}
