//! Similarity-driven link prediction and the back-projection seam.
//!
//! [`predict_to_store`] is the level-0 producer: it scores every
//! non-adjacent vertex pair of a graph and streams the records straight
//! to the ranking store, never materialising the O(V^2) ranking.
//!
//! Above level 0, predictions are made on the coarse graph and mapped
//! back onto original vertex pairs by a [`BackProjection`] policy. The
//! pipeline only requires that the output conforms to the record format
//! with `source < target`; the concrete expansion policy is a pluggable
//! collaborator. [`GroupExpansion`] is one such policy, expanding each
//! coarse pair's score onto every original non-edge pair the two
//! supervertices represent.

use std::collections::BTreeMap;

use log::{debug, info};

use coarselink_core::{SimilarityScorer, VertexId, WeightedGraph};

use crate::error::PipelineError;
use crate::record::RankingRecord;
use crate::store::RankingWriter;

/// Score every non-adjacent pair `v < u` of `graph` and append the
/// records to `writer`. O(V^2) score calls, O(1) memory beyond the
/// adjacency sets.
pub fn predict_to_store(
    graph: &WeightedGraph,
    scorer: &mut SimilarityScorer,
    writer: &mut RankingWriter,
) -> Result<usize, PipelineError> {
    let adjacency = graph.adjacency_sets();
    let mut written = 0usize;
    for v in 0..graph.vcount() {
        for u in (v + 1)..graph.vcount() {
            if graph.has_edge(v, u) {
                continue;
            }
            let score = scorer.score(graph, &adjacency, v, u);
            writer.append(&RankingRecord::new(v, u, score))?;
            written += 1;
        }
    }
    info!(
        "predicted {written} candidate edges on level {} ({} vertices)",
        graph.level(),
        graph.vcount()
    );
    Ok(written)
}

/// In-memory coarse-level ranking handed to a back-projection policy.
pub type CoarseRanking = Vec<(VertexId, VertexId, f64)>;

/// Maps coarse-level prediction scores onto original-graph vertex pairs.
///
/// Implementations must write records over *original* vertex ids with
/// `source < target` and must not emit pairs that are edges of the
/// original graph's current edge set.
pub trait BackProjection {
    fn project(
        &self,
        original: &WeightedGraph,
        coarsened: &WeightedGraph,
        coarse_ranking: &CoarseRanking,
        writer: &mut RankingWriter,
    ) -> Result<usize, PipelineError>;
}

/// Expand each coarse pair onto the original vertex pairs it represents.
///
/// For a coarse prediction `(cu, cv, s)`, every original pair `(u, v)`
/// with `successors[u] == cu`, `successors[v] == cv` and no current edge
/// receives score `s`; with `weighted` set, `s` is divided by the number
/// of expanded pairs so a supervertex's mass is not multiplied by its
/// size.
#[derive(Clone, Copy, Debug, Default)]
pub struct GroupExpansion {
    pub weighted: bool,
}

impl GroupExpansion {
    pub fn new(weighted: bool) -> Self {
        Self { weighted }
    }
}

impl BackProjection for GroupExpansion {
    fn project(
        &self,
        original: &WeightedGraph,
        coarsened: &WeightedGraph,
        coarse_ranking: &CoarseRanking,
        writer: &mut RankingWriter,
    ) -> Result<usize, PipelineError> {
        // Supervertex -> represented original vertices, in id order.
        let mut groups: BTreeMap<VertexId, Vec<VertexId>> = BTreeMap::new();
        for (vertex, &supervertex) in coarsened.successors().iter().enumerate() {
            groups.entry(supervertex).or_default().push(vertex);
        }

        let mut written = 0usize;
        for &(cu, cv, score) in coarse_ranking {
            let (Some(us), Some(vs)) = (groups.get(&cu), groups.get(&cv)) else {
                continue;
            };
            let mut expanded: Vec<(VertexId, VertexId)> = Vec::new();
            for &u in us {
                for &v in vs {
                    if u != v && !original.has_edge(u, v) {
                        expanded.push((u, v));
                    }
                }
            }
            if expanded.is_empty() {
                continue;
            }
            let each = if self.weighted {
                score / expanded.len() as f64
            } else {
                score
            };
            for (u, v) in expanded {
                writer.append(&RankingRecord::new(u, v, each))?;
                written += 1;
            }
        }
        debug!(
            "back-projected {} coarse predictions into {written} original pairs",
            coarse_ranking.len()
        );
        Ok(written)
    }
}

/// Score every non-adjacent coarse pair in memory, feeding a
/// back-projection policy. The coarse graph is small by construction, so
/// this ranking fits in memory even when the projected one does not.
pub fn predict_coarse(
    coarsened: &WeightedGraph,
    scorer: &mut SimilarityScorer,
) -> CoarseRanking {
    let adjacency = coarsened.adjacency_sets();
    let mut ranking = CoarseRanking::new();
    for v in 0..coarsened.vcount() {
        for u in (v + 1)..coarsened.vcount() {
            if coarsened.has_edge(v, u) {
                continue;
            }
            ranking.push((v, u, scorer.score(coarsened, &adjacency, v, u)));
        }
    }
    ranking
}
