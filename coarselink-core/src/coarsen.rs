//! Graph contraction: collapse matched vertex pairs into supervertices.
//!
//! Each coarsening step consumes a graph and a (validated) matching and
//! produces a brand-new graph one level up, with its own weight map and a
//! freshly composed successor array; the input graph is never mutated.
//!
//! Coarse-id assignment walks vertices in ascending order: `i` receives a
//! fresh sequential id when `i <= matching[i]` (unmatched, or the lower
//! member of its pair), and its partner's id otherwise. Because the lower
//! member of every pair resolves first, both members always agree on
//! their supervertex.
//!
//! Edge construction maps every edge through the contraction, drops edges
//! whose endpoints collapse into the same supervertex, and sums the
//! weights of parallel edges under the canonical pair key. Total retained
//! weight therefore equals the original total minus exactly the
//! self-loop-inducing edges.

use std::collections::{BTreeMap, HashMap};

use log::info;

use crate::error::CoreError;
use crate::graph::{Pair, VertexId, WeightedGraph};
use crate::matching::{self, Matching};

/// Contract `graph` along `matching`, producing the next-level graph.
/// O(V + E). Fails on a malformed matching without touching anything.
pub fn coarsen(graph: &WeightedGraph, matching: &Matching) -> Result<WeightedGraph, CoreError> {
    matching::validate(matching)?;

    // Coarse-id assignment, ascending so pair minima resolve first.
    let mut coarse_ids = vec![0 as VertexId; graph.vcount()];
    let mut next_id: VertexId = 0;
    for i in 0..graph.vcount() {
        if i <= matching[i] {
            coarse_ids[i] = next_id;
            next_id += 1;
        } else {
            coarse_ids[i] = coarse_ids[matching[i]];
        }
    }

    // Map edges through the contraction, merging parallel edges and
    // dropping collapsed ones.
    let mut weights: HashMap<Pair, f64> = HashMap::with_capacity(graph.ecount());
    let mut dropped = 0usize;
    for (pair, weight) in graph.edges() {
        let source = coarse_ids[pair.source()];
        let target = coarse_ids[pair.target()];
        if source == target {
            dropped += 1;
            continue;
        }
        *weights.entry(Pair::new(source, target)).or_insert(0.0) += weight;
    }

    // Compose the provenance: original vertex -> old supervertex -> new.
    let successors: Vec<VertexId> = graph
        .successors()
        .iter()
        .map(|&old| coarse_ids[old])
        .collect();

    let coarsened = WeightedGraph::from_parts(next_id, weights, graph.level() + 1, successors);
    info!(
        "coarsened level {} -> {}: {} -> {} vertices, {} -> {} edges ({} collapsed)",
        graph.level(),
        coarsened.level(),
        graph.vcount(),
        coarsened.vcount(),
        graph.ecount(),
        coarsened.ecount(),
        dropped
    );
    Ok(coarsened)
}

/// One induced subgraph of the original graph per supervertex of the
/// coarsened graph, ordered by supervertex id. Each subgraph contains the
/// original vertices the supervertex represents and exactly the original
/// edges between them.
pub fn create_subgraphs(
    original: &WeightedGraph,
    coarsened: &WeightedGraph,
) -> Result<Vec<WeightedGraph>, CoreError> {
    let mut groups: BTreeMap<VertexId, Vec<VertexId>> = BTreeMap::new();
    for (vertex, &supervertex) in coarsened.successors().iter().enumerate() {
        groups.entry(supervertex).or_default().push(vertex);
    }
    groups
        .values()
        .map(|members| original.induced_subgraph(members))
        .collect()
}
