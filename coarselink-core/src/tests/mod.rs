mod test_graph;
mod test_sampler;

use crate::graph::WeightedGraph;

/// Initialize logging for tests
pub fn init() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

/// Unit-weight path 0-1-2-...-(n-1).
pub fn path_graph(n: usize) -> WeightedGraph {
    let edges: Vec<(usize, usize, f64)> = (0..n - 1).map(|i| (i, i + 1, 1.0)).collect();
    WeightedGraph::from_edges(n, &edges).unwrap()
}

/// Small two-community graph: two triangles bridged by one edge.
pub fn two_triangles() -> WeightedGraph {
    WeightedGraph::from_edges(
        6,
        &[
            (0, 1, 1.0),
            (1, 2, 1.0),
            (0, 2, 1.0),
            (3, 4, 1.0),
            (4, 5, 1.0),
            (3, 5, 1.0),
            (2, 3, 0.5),
        ],
    )
    .unwrap()
}
