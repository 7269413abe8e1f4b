use super::{is_misclassified, GraphOrder};
use crate::data::View;
use crate::neighbors::{LinearSearch, Space};
use rayon::prelude::*;

/// Undirected graph linking every row to its nearest neighbor.
struct NeighborGraph {
    adjacency: Vec<Vec<usize>>,
}

impl NeighborGraph {
    fn build(view: &View) -> Self {
        let n = view.len();
        let search = LinearSearch::new(view.data(), (0..n).collect(), Space::Features);
        let nearest = (0..n)
            .into_par_iter()
            .map(|i| search.nearest(i))
            .collect::<Vec<_>>();

        let mut adjacency = vec![Vec::new(); n];
        for (i, nearest) in nearest.into_iter().enumerate() {
            if let Some(j) = nearest {
                if !adjacency[i].contains(&j) {
                    adjacency[i].push(j);
                    adjacency[j].push(i);
                }
            }
        }
        Self { adjacency }
    }

    fn neighbors(&self, i: usize) -> &[usize] {
        &self.adjacency[i]
    }
}

/// Relative neighborhood graph editing (RNGE).
///
/// A row is flagged when majority vote among its graph neighbors disagrees with its class. In
/// second-order mode, a flagged row gets a second vote in which the graph neighbors of every
/// same-class neighbor join as well, so second order only ever keeps more rows than first order.
pub fn relative_neighborhood_edit(view: &View, order: GraphOrder) -> Vec<bool> {
    let graph = NeighborGraph::build(view);
    (0..view.len())
        .into_par_iter()
        .map(|i| {
            let direct = graph.neighbors(i);
            if !is_misclassified(view, i, direct.iter().cloned()) {
                return false;
            }
            match order {
                GraphOrder::First => true,
                GraphOrder::Second => {
                    // Neighbors of j include i itself, which then votes for its own class
                    let mut extended = direct.to_vec();
                    for &j in direct.iter().filter(|&&j| view.class(j) == view.class(i)) {
                        extended.extend_from_slice(graph.neighbors(j));
                    }
                    is_misclassified(view, i, extended)
                }
            }
        })
        .collect()
}
