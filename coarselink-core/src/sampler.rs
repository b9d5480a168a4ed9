//! Probe-edge sampling: hold edges out of the graph as ground truth.
//!
//! A probe set is a map from unordered vertex pair to the weight the edge
//! carried when it was sampled. While deleted, probe pairs are disjoint
//! from the graph's edge set; reinsertion restores the exact original
//! weights, making `reinsert . delete` the identity on the graph. Folds
//! rely on that inverse law to stay independent.

use std::collections::HashMap;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::CoreError;
use crate::graph::{Pair, WeightedGraph};

/// Held-out edges with their original weights.
#[derive(Clone, Debug, Default)]
pub struct ProbeSet {
    edges: HashMap<Pair, f64>,
}

impl ProbeSet {
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn contains(&self, pair: &Pair) -> bool {
        self.edges.contains_key(pair)
    }

    pub fn weight(&self, pair: &Pair) -> Option<f64> {
        self.edges.get(pair).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pair, f64)> + '_ {
        self.edges.iter().map(|(&pair, &w)| (pair, w))
    }
}

impl FromIterator<(Pair, f64)> for ProbeSet {
    fn from_iter<I: IntoIterator<Item = (Pair, f64)>>(iter: I) -> Self {
        Self {
            edges: iter.into_iter().collect(),
        }
    }
}

/// Creates probe sets and moves them in and out of the graph.
pub struct Sampler {
    rng: StdRng,
}

impl Sampler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniformly sample `floor(proportion * |E|)` edges without
    /// replacement, keeping their current weights.
    pub fn sample(&mut self, graph: &WeightedGraph, proportion: f64) -> ProbeSet {
        let count = (graph.ecount() as f64 * proportion) as usize;
        let mut edges = graph.sorted_edges();
        edges.shuffle(&mut self.rng);
        let sampled: HashMap<Pair, f64> = edges.into_iter().take(count).collect();
        info!(
            "sampled {} of {} edges as probe set (proportion {:.2})",
            sampled.len(),
            graph.ecount(),
            proportion
        );
        ProbeSet { edges: sampled }
    }

    /// Edge list in seeded random order, for deterministic k-fold
    /// partitioning across fold iterations.
    pub fn shuffled_edges(&mut self, graph: &WeightedGraph) -> Vec<Pair> {
        let mut pairs: Vec<Pair> = graph.sorted_edges().into_iter().map(|(p, _)| p).collect();
        pairs.shuffle(&mut self.rng);
        pairs
    }

    /// Probe set for fold `fold` of `k`: the contiguous slice of size
    /// `|E| / k` (integer division; remainder edges belong to no fold).
    pub fn fold_slice(
        graph: &WeightedGraph,
        shuffled: &[Pair],
        fold: usize,
        k: usize,
    ) -> ProbeSet {
        let fold_size = graph.ecount() / k;
        let from = fold * fold_size;
        let to = from + fold_size;
        let edges: HashMap<Pair, f64> = shuffled[from..to]
            .iter()
            .filter_map(|&pair| graph.weight(pair.source(), pair.target()).map(|w| (pair, w)))
            .collect();
        debug!("fold {fold}/{k}: {} probe edges", edges.len());
        ProbeSet { edges }
    }

    /// Remove every probe edge from the graph. A probe pair that is no
    /// longer present is a graph-integrity failure for the fold.
    pub fn delete(graph: &mut WeightedGraph, probe: &ProbeSet) -> Result<(), CoreError> {
        for (pair, _) in probe.iter() {
            graph.remove_edge(pair.source(), pair.target())?;
        }
        debug!(
            "deleted {} probe edges, {} edges remain",
            probe.len(),
            graph.ecount()
        );
        Ok(())
    }

    /// Exact inverse of [`Sampler::delete`]: restore every probe edge with
    /// its original weight. A pair already present is a graph-integrity
    /// failure.
    pub fn reinsert(graph: &mut WeightedGraph, probe: &ProbeSet) -> Result<(), CoreError> {
        for (pair, weight) in probe.iter() {
            graph.add_edge(pair.source(), pair.target(), weight)?;
        }
        debug!(
            "reinserted {} probe edges, {} edges total",
            probe.len(),
            graph.ecount()
        );
        Ok(())
    }
}
