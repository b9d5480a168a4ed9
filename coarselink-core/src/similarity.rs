//! Vertex-pair similarity indices for link prediction and matching.
//!
//! All indices score a pair `(i, j)` from the graph plus a set of
//! immutable per-vertex neighbor sets computed once up front
//! ([`WeightedGraph::adjacency_sets`]). Local indices (common neighbors,
//! Jaccard, Salton, Adamic-Adar, preferential attachment) are pure; the
//! iterative low-memory Katz index keeps a per-source row cache with an
//! explicit invalidation key, so repeated scoring of `(i, *)` pairs in id
//! order amortises the row computation exactly once.
//!
//! The scorer satisfies the pipeline contract
//! `score(graph, adjacency_sets, i, j) -> f64`; callers always invoke it
//! in a consistent `i < j` fashion and no symmetry is enforced here.

use std::collections::HashSet;
use std::fmt;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::graph::{VertexId, WeightedGraph};

/// Neighbor sets indexed by vertex id, frozen for one scoring session.
pub type AdjacencySets = Vec<HashSet<VertexId>>;

/// Similarity index selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum SimilarityIndex {
    /// Number of shared neighbors.
    #[default]
    CommonNeighbors,
    /// Shared neighbors over the neighborhood union.
    Jaccard,
    /// Shared neighbors over the geometric mean of the degrees.
    Salton,
    /// Shared neighbors discounted by the log of their degree.
    AdamicAdar,
    /// Degree product.
    PreferentialAttachment,
    /// Iterative truncated Katz over walks up to `length`, damped by
    /// `beta` per hop.
    Katz { length: usize, beta: f64 },
}

impl fmt::Display for SimilarityIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimilarityIndex::CommonNeighbors => write!(f, "common_neighbors"),
            SimilarityIndex::Jaccard => write!(f, "jaccard"),
            SimilarityIndex::Salton => write!(f, "salton"),
            SimilarityIndex::AdamicAdar => write!(f, "adamic_adar"),
            SimilarityIndex::PreferentialAttachment => write!(f, "preferential_attachment"),
            SimilarityIndex::Katz { length, beta } => write!(f, "katz_l{length}_b{beta}"),
        }
    }
}

/// Katz row cache: similarities of one source vertex against every other
/// vertex, valid only for the `(length, beta, source)` key it was built
/// with. Held by the scorer so the caller controls its lifetime.
#[derive(Clone, Debug)]
struct KatzCache {
    length: usize,
    beta: f64,
    source: VertexId,
    scores: Vec<f64>,
}

/// Pluggable similarity scorer with explicit cache state.
#[derive(Clone, Debug, Default)]
pub struct SimilarityScorer {
    index: SimilarityIndex,
    katz: Option<KatzCache>,
}

impl SimilarityScorer {
    pub fn new(index: SimilarityIndex) -> Self {
        Self { index, katz: None }
    }

    pub fn index(&self) -> SimilarityIndex {
        self.index
    }

    /// Score the unordered pair `(i, j)`.
    pub fn score(
        &mut self,
        graph: &WeightedGraph,
        adjacency: &AdjacencySets,
        i: VertexId,
        j: VertexId,
    ) -> f64 {
        match self.index {
            SimilarityIndex::CommonNeighbors => common_neighbors(adjacency, i, j),
            SimilarityIndex::Jaccard => jaccard(adjacency, i, j),
            SimilarityIndex::Salton => salton(graph, adjacency, i, j),
            SimilarityIndex::AdamicAdar => adamic_adar(graph, adjacency, i, j),
            SimilarityIndex::PreferentialAttachment => {
                (graph.degree(i) * graph.degree(j)) as f64
            }
            SimilarityIndex::Katz { length, beta } => self.katz_row(graph, adjacency, i, length, beta)[j],
        }
    }

    /// Build (or reuse) the Katz similarity row for `source`. The cache is
    /// invalidated whenever the `(length, beta, source)` key changes.
    fn katz_row(
        &mut self,
        graph: &WeightedGraph,
        adjacency: &AdjacencySets,
        source: VertexId,
        length: usize,
        beta: f64,
    ) -> &[f64] {
        let stale = !matches!(
            &self.katz,
            Some(cache)
                if cache.source == source && cache.length == length && cache.beta == beta
        );
        if stale {
            trace!("recomputing katz row for vertex {source} (l={length}, beta={beta})");
            self.katz = Some(KatzCache {
                length,
                beta,
                source,
                scores: katz_scores(graph, adjacency, source, length, beta),
            });
        }
        // Populated just above when stale.
        &self.katz.as_ref().unwrap().scores
    }
}

fn intersection_size(adjacency: &AdjacencySets, i: VertexId, j: VertexId) -> usize {
    adjacency[i].intersection(&adjacency[j]).count()
}

fn common_neighbors(adjacency: &AdjacencySets, i: VertexId, j: VertexId) -> f64 {
    intersection_size(adjacency, i, j) as f64
}

fn jaccard(adjacency: &AdjacencySets, i: VertexId, j: VertexId) -> f64 {
    let isect = intersection_size(adjacency, i, j);
    let union = adjacency[i].len() + adjacency[j].len() - isect;
    if union == 0 {
        0.0
    } else {
        isect as f64 / union as f64
    }
}

fn salton(graph: &WeightedGraph, adjacency: &AdjacencySets, i: VertexId, j: VertexId) -> f64 {
    let product = (graph.degree(i) * graph.degree(j)) as f64;
    if product == 0.0 {
        return 0.0;
    }
    intersection_size(adjacency, i, j) as f64 / product.sqrt()
}

fn adamic_adar(graph: &WeightedGraph, adjacency: &AdjacencySets, i: VertexId, j: VertexId) -> f64 {
    let mut score = 0.0;
    for &shared in adjacency[i].intersection(&adjacency[j]) {
        let degree = graph.degree(shared);
        // Degree 0 cannot occur for a shared neighbor; degree 1 would
        // divide by ln(1) = 0, so both are skipped.
        if degree > 1 {
            score += 1.0 / (degree as f64).ln();
        }
    }
    score
}

/// Truncated Katz similarities of `source` against every vertex:
/// `sum_{h=1..length} beta^h * paths_h(source, k)`, computed by repeated
/// sparse adjacency products over the neighbor sets. O(length * E).
fn katz_scores(
    graph: &WeightedGraph,
    adjacency: &AdjacencySets,
    source: VertexId,
    length: usize,
    beta: f64,
) -> Vec<f64> {
    let n = graph.vcount();
    // Hop-1 reachability of the source.
    let mut frontier: Vec<f64> = (0..n)
        .map(|k| if adjacency[source].contains(&k) { 1.0 } else { 0.0 })
        .collect();
    let mut scores: Vec<f64> = frontier.iter().map(|&v| beta * v).collect();

    let mut constant = beta;
    for _hop in 2..=length {
        constant *= beta;
        let mut product = vec![0.0f64; n];
        for (k, slot) in product.iter_mut().enumerate() {
            for &neighbor in &adjacency[k] {
                if frontier[neighbor] != 0.0 {
                    *slot += 1.0;
                }
            }
            scores[k] += constant * *slot;
        }
        frontier = product;
    }
    scores
}
