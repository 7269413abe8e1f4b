use crate::data::View;
use crate::neighbors::{LinearSearch, Space};
use log::debug;

/// Condensed nearest neighbor.
///
/// Starts from the first instance of every class and keeps adding instances that the current
/// selection misclassifies with 1-NN, restarting the scan after each addition. Instances that
/// were never selected are flagged.
pub fn condense(view: &View) -> Vec<bool> {
    let n = view.len();
    let mut selected = vec![false; n];
    let mut reduced = Vec::<usize>::with_capacity(n / 10 + view.n_classes());

    let mut class_seen = vec![false; view.n_classes()];
    for i in 0..n {
        let class = view.class(i);
        if !class_seen[class] {
            class_seen[class] = true;
            selected[i] = true;
            reduced.push(i);
        }
    }

    let mut search = LinearSearch::new(view.data(), reduced.clone(), Space::Features);
    let mut n_restarts = 0;
    let mut i = 0;
    while i < n {
        if !selected[i] {
            let nearest = search
                .nearest(i)
                .expect("The selection always holds at least one instance");
            if view.class(nearest) != view.class(i) {
                selected[i] = true;
                reduced.push(i);
                search = LinearSearch::new(view.data(), reduced.clone(), Space::Features);
                n_restarts += 1;
                i = 0;
                continue;
            }
        }
        i += 1;
    }
    debug!(
        "CNN selected {} of {} instances after {} restarts",
        reduced.len(),
        n,
        n_restarts
    );

    selected.into_iter().map(|s| !s).collect()
}
