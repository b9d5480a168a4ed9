use approx::assert_relative_eq;

use crate::error::CoreError;
use crate::graph::{Pair, WeightedGraph};
use crate::tests::{init, two_triangles};

#[test]
fn pair_normalises_endpoints() {
    assert_eq!(Pair::new(5, 2), Pair::new(2, 5));
    assert_eq!(Pair::new(2, 5).source(), 2);
    assert_eq!(Pair::new(2, 5).target(), 5);
    assert!(Pair::new(3, 3).is_loop());
}

#[test]
fn new_graph_has_identity_successors_at_level_zero() {
    let g = WeightedGraph::new(4);
    assert_eq!(g.level(), 0);
    assert_eq!(g.successors(), &[0, 1, 2, 3]);
    assert_eq!(g.ecount(), 0);
}

#[test]
fn add_and_remove_edges_keep_adjacency_in_sync() {
    init();
    let mut g = WeightedGraph::new(3);
    g.add_edge(0, 1, 2.0).unwrap();
    g.add_edge(1, 2, 3.0).unwrap();
    assert_eq!(g.ecount(), 2);
    assert_eq!(g.degree(1), 2);
    assert_eq!(g.weight(1, 0), Some(2.0));

    let removed = g.remove_edge(0, 1).unwrap();
    assert_relative_eq!(removed, 2.0);
    assert_eq!(g.degree(1), 1);
    assert!(!g.has_edge(0, 1));
}

#[test]
fn self_loops_and_duplicates_are_rejected() {
    let mut g = WeightedGraph::new(3);
    assert_eq!(g.add_edge(1, 1, 1.0), Err(CoreError::SelfLoop { vertex: 1 }));
    g.add_edge(0, 1, 1.0).unwrap();
    assert_eq!(
        g.add_edge(1, 0, 2.0),
        Err(CoreError::DuplicateEdge { a: 0, b: 1 })
    );
    assert_eq!(
        g.remove_edge(0, 2),
        Err(CoreError::MissingEdge { a: 0, b: 2 })
    );
}

#[test]
fn out_of_range_vertices_are_rejected() {
    let mut g = WeightedGraph::new(2);
    assert_eq!(
        g.add_edge(0, 2, 1.0),
        Err(CoreError::VertexOutOfRange {
            vertex: 2,
            vcount: 2
        })
    );
}

#[test]
fn total_weight_sums_all_edges() {
    let g = two_triangles();
    assert_relative_eq!(g.total_weight(), 6.5);
}

#[test]
fn adjacency_sets_match_neighbor_rows() {
    let g = two_triangles();
    let sets = g.adjacency_sets();
    for v in 0..g.vcount() {
        assert_eq!(sets[v].len(), g.degree(v));
        for &n in g.neighbors(v) {
            assert!(sets[v].contains(&n));
        }
    }
}

#[test]
fn induced_subgraph_keeps_exactly_internal_edges() {
    let g = two_triangles();
    // First triangle plus the bridge endpoint 3: the bridge (2,3) is
    // internal, the second triangle's edges are not.
    let sub = g.induced_subgraph(&[0, 1, 2, 3]).unwrap();
    assert_eq!(sub.vcount(), 4);
    assert_eq!(sub.ecount(), 4);
    assert_eq!(sub.weight(2, 3), Some(0.5));
    assert_eq!(sub.level(), 0);
}

#[test]
fn sorted_edges_are_deterministic() {
    let g = two_triangles();
    let a = g.sorted_edges();
    let b = g.sorted_edges();
    assert_eq!(a.len(), 7);
    assert_eq!(
        a.iter().map(|(p, _)| *p).collect::<Vec<_>>(),
        b.iter().map(|(p, _)| *p).collect::<Vec<_>>()
    );
    assert!(a.windows(2).all(|w| w[0].0 < w[1].0));
}
