use std::collections::HashSet;

use approx::assert_relative_eq;

use crate::error::CoreError;
use crate::graph::Pair;
use crate::sampler::Sampler;
use crate::tests::{init, path_graph, two_triangles};

#[test]
fn sample_takes_floor_of_proportion() {
    let g = two_triangles(); // 7 edges
    let mut sampler = Sampler::new(1);
    assert_eq!(sampler.sample(&g, 0.20).len(), 1);
    assert_eq!(sampler.sample(&g, 0.5).len(), 3);
    assert_eq!(sampler.sample(&g, 1.0).len(), 7);
    assert_eq!(sampler.sample(&g, 0.0).len(), 0);
}

#[test]
fn sample_keeps_current_weights() {
    let g = two_triangles();
    let mut sampler = Sampler::new(2);
    let probe = sampler.sample(&g, 1.0);
    for (pair, weight) in probe.iter() {
        assert_relative_eq!(g.weight(pair.source(), pair.target()).unwrap(), weight);
    }
}

#[test]
fn delete_then_reinsert_is_identity() {
    init();
    let mut g = two_triangles();
    let before: Vec<(Pair, f64)> = g.sorted_edges();

    let mut sampler = Sampler::new(3);
    let probe = sampler.sample(&g, 0.4);
    Sampler::delete(&mut g, &probe).unwrap();

    // While deleted, probe pairs are disjoint from the edge set.
    assert_eq!(g.ecount(), before.len() - probe.len());
    for (pair, _) in probe.iter() {
        assert!(!g.has_edge(pair.source(), pair.target()));
    }

    Sampler::reinsert(&mut g, &probe).unwrap();
    assert_eq!(g.sorted_edges(), before, "weights and count must be bit-identical");
}

#[test]
fn delete_of_absent_probe_edge_fails() {
    let mut g = path_graph(4);
    let mut sampler = Sampler::new(4);
    let probe = sampler.sample(&g, 0.5);
    Sampler::delete(&mut g, &probe).unwrap();
    // Deleting again references absent edges.
    assert!(matches!(
        Sampler::delete(&mut g, &probe),
        Err(CoreError::MissingEdge { .. })
    ));
}

#[test]
fn reinsert_over_present_edge_fails() {
    let mut g = path_graph(4);
    let mut sampler = Sampler::new(5);
    let probe = sampler.sample(&g, 0.5);
    // Nothing was deleted, so reinsertion collides.
    assert!(matches!(
        Sampler::reinsert(&mut g, &probe),
        Err(CoreError::DuplicateEdge { .. })
    ));
}

#[test]
fn fold_slices_are_disjoint_and_drop_the_remainder() {
    let g = two_triangles(); // 7 edges, k = 3 -> folds of 2, 1 edge unassigned
    let mut sampler = Sampler::new(6);
    let shuffled = sampler.shuffled_edges(&g);
    assert_eq!(shuffled.len(), 7);

    let mut seen: HashSet<Pair> = HashSet::new();
    for fold in 0..3 {
        let probe = Sampler::fold_slice(&g, &shuffled, fold, 3);
        assert_eq!(probe.len(), 2);
        for (pair, _) in probe.iter() {
            assert!(seen.insert(pair), "fold slices must not overlap");
        }
    }
    assert_eq!(seen.len(), 6);
}

#[test]
fn shuffled_edges_are_deterministic_per_seed() {
    let g = two_triangles();
    let a = Sampler::new(9).shuffled_edges(&g);
    let b = Sampler::new(9).shuffled_edges(&g);
    assert_eq!(a, b);
}
