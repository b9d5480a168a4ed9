//! Vertex matching strategies for graph coarsening.
//!
//! A matching is a dense array indexed by vertex id: `matching[i] == i`
//! means `i` is unmatched, otherwise `matching[i] == j` and
//! `matching[j] == i` (a symmetric involution over matched pairs). Every
//! strategy produces a valid matching in O(V + E) and is deterministic
//! for a fixed seed.
//!
//! # Strategies
//!
//! - **Random**: edges visited in seeded random order; an edge pairs its
//!   endpoints when both are still free. Maximal, not maximum.
//! - **Most-/Least-SimilarEdge**: one greedy pass over vertices in id
//!   order, scoring unmatched neighbors with the similarity scorer. A
//!   later, strictly better candidate replaces the tentative partner of
//!   the *same* scan; the replaced partner must be restored to unmatched
//!   before the new pair is committed.
//! - **Heavy-/LightEdge**: vertices visited in seeded random order, each
//!   paired with the free neighbor of maximum (resp. minimum) incident
//!   edge weight; equal weights never replace the current best.

use std::fmt;

use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::graph::{VertexId, WeightedGraph};
use crate::similarity::SimilarityScorer;

/// `matching[i] == i` means unmatched; otherwise a symmetric pairing.
pub type Matching = Vec<VertexId>;

/// Verify the symmetric-involution invariant. A malformed matching must
/// never reach the coarsener.
pub fn validate(matching: &Matching) -> Result<(), CoreError> {
    for (vertex, &partner) in matching.iter().enumerate() {
        if partner >= matching.len() || matching[partner] != vertex {
            return Err(CoreError::MalformedMatching { vertex, partner });
        }
    }
    Ok(())
}

/// Matching strategy selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchingMethod {
    /// RM: random maximal matching over the edge list.
    #[default]
    Random,
    /// MSEM: greedily pair each vertex with its most similar free neighbor.
    MostSimilarEdge,
    /// LSEM: greedily pair each vertex with its least similar free neighbor.
    LeastSimilarEdge,
    /// HEM: pair each vertex with its heaviest incident free neighbor.
    HeavyEdge,
    /// LEM: pair each vertex with its lightest incident free neighbor.
    LightEdge,
}

impl fmt::Display for MatchingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchingMethod::Random => write!(f, "random_matching"),
            MatchingMethod::MostSimilarEdge => write!(f, "most_similar_edge_matching"),
            MatchingMethod::LeastSimilarEdge => write!(f, "least_similar_edge_matching"),
            MatchingMethod::HeavyEdge => write!(f, "heavy_edge_matching"),
            MatchingMethod::LightEdge => write!(f, "light_edge_matching"),
        }
    }
}

/// Runs one matching strategy with its own seeded RNG. Single-use per
/// coarsening step; the produced array is consumed by the coarsener.
pub struct MatchingEngine {
    method: MatchingMethod,
    rng: StdRng,
}

impl MatchingEngine {
    pub fn new(method: MatchingMethod, seed: u64) -> Self {
        Self {
            method,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn method(&self) -> MatchingMethod {
        self.method
    }

    /// Produce a matching for `graph`. The scorer is only consulted by the
    /// similarity-driven strategies.
    pub fn run(&mut self, graph: &WeightedGraph, scorer: &mut SimilarityScorer) -> Matching {
        let matching = match self.method {
            MatchingMethod::Random => self.random_matching(graph),
            MatchingMethod::MostSimilarEdge => self.similar_edge_matching(graph, scorer, true),
            MatchingMethod::LeastSimilarEdge => self.similar_edge_matching(graph, scorer, false),
            MatchingMethod::HeavyEdge => self.weight_edge_matching(graph, true),
            MatchingMethod::LightEdge => self.weight_edge_matching(graph, false),
        };
        let matched = matching.iter().enumerate().filter(|&(i, &p)| i != p).count();
        debug!(
            "{} on level {}: {} of {} vertices matched",
            self.method,
            graph.level(),
            matched,
            graph.vcount()
        );
        matching
    }

    fn random_matching(&mut self, graph: &WeightedGraph) -> Matching {
        let mut matching: Matching = (0..graph.vcount()).collect();
        let mut edges: Vec<_> = graph.sorted_edges();
        edges.shuffle(&mut self.rng);
        for (pair, _) in edges {
            let (a, b) = (pair.source(), pair.target());
            if matching[a] == a && matching[b] == b {
                matching[a] = b;
                matching[b] = a;
            }
        }
        matching
    }

    /// Shared MSEM/LSEM pass; `prefer_max` flips the comparison.
    fn similar_edge_matching(
        &mut self,
        graph: &WeightedGraph,
        scorer: &mut SimilarityScorer,
        prefer_max: bool,
    ) -> Matching {
        let adjacency = graph.adjacency_sets();
        let mut matching: Matching = (0..graph.vcount()).collect();
        for i in 0..graph.vcount() {
            if matching[i] != i {
                continue;
            }
            let mut best = if prefer_max { -1.0 } else { f64::INFINITY };
            for &j in graph.neighbors(i) {
                if matching[j] != j {
                    continue;
                }
                let sim = scorer.score(graph, &adjacency, i, j);
                let better = if prefer_max { sim > best } else { sim < best };
                if better {
                    best = sim;
                    // The previous tentative partner (if any) goes back to
                    // the free pool before the new pair is committed.
                    let previous = matching[i];
                    matching[previous] = previous;
                    matching[i] = j;
                    matching[j] = i;
                }
            }
        }
        matching
    }

    /// Shared HEM/LEM pass; `prefer_max` flips the comparison.
    fn weight_edge_matching(&mut self, graph: &WeightedGraph, prefer_max: bool) -> Matching {
        let mut matching: Matching = (0..graph.vcount()).collect();
        let mut order: Vec<VertexId> = (0..graph.vcount()).collect();
        order.shuffle(&mut self.rng);
        for vertex in order {
            if matching[vertex] != vertex {
                continue;
            }
            let mut best = if prefer_max { 0.0 } else { f64::INFINITY };
            let mut best_neighbor = None;
            for &neighbor in graph.neighbors(vertex) {
                if matching[neighbor] != neighbor {
                    continue;
                }
                // Neighbors always carry a weight.
                let value = graph.weight(vertex, neighbor).unwrap_or(0.0);
                let better = if prefer_max { value > best } else { value < best };
                if better {
                    best = value;
                    best_neighbor = Some(neighbor);
                }
            }
            if let Some(neighbor) = best_neighbor {
                matching[neighbor] = vertex;
                matching[vertex] = neighbor;
            }
        }
        matching
    }
}
