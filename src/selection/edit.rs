use super::is_misclassified;
use crate::data::View;
use crate::neighbors::{LinearSearch, Space};
use log::debug;

/// Edited nearest neighbor.
///
/// Rows are visited from last to first; a row is flagged if the majority class among its `k`
/// nearest neighbors disagrees with its own. Flagged rows leave the neighbor pool right away, so
/// rows visited later never see them.
pub fn edit(view: &View, k: usize) -> Vec<bool> {
    let n = view.len();
    let mut flags = vec![false; n];
    let mut pool = (0..n).collect::<Vec<_>>();
    let mut search = LinearSearch::new(view.data(), pool.clone(), Space::Features);

    for i in (0..n).rev() {
        let neighbors = search.k_nearest(i, k, false);
        if is_misclassified(view, i, neighbors) {
            flags[i] = true;
            pool.retain(|&j| j != i);
            search = LinearSearch::new(view.data(), pool.clone(), Space::Features);
        }
    }
    debug!("ENN flagged {} of {} instances", n - pool.len(), n);

    flags
}
