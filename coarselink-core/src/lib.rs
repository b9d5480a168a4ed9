//! # coarselink-core
//!
//! Algorithmic core of the coarselink evaluation system: a weighted
//! undirected graph with cross-level vertex provenance, a matching engine
//! with five pairing strategies, a coarsener that contracts matched pairs
//! into supervertices, pluggable vertex-similarity indices, and a probe
//! sampler that holds edges out of the graph as evaluation ground truth.
//!
//! # Pipeline position
//!
//! 1. **Sampler** removes a probe set from the level-0 graph.
//! 2. **Matching + Coarsener** build each level of the hierarchy while
//!    composing the successor mapping back to original vertex ids.
//! 3. **Similarity** scores candidate vertex pairs at any level.
//!
//! Ranking storage, metric extraction and the fold/level driver live in
//! `coarselink-pipeline`.
//!
//! # Design notes
//!
//! - Graphs, matchings and probe sets are addressed by dense integer ids
//!   and owned by exactly one step at a time; nothing here is shared
//!   across threads.
//! - Every level graph is immutable after construction. Only the level-0
//!   graph is ever mutated, and only through probe delete/reinsert.
//! - All randomized strategies take an explicit seed and are deterministic
//!   for a fixed seed.

pub mod coarsen;
pub mod error;
pub mod graph;
pub mod matching;
pub mod sampler;
pub mod similarity;

#[cfg(test)]
mod tests;

pub use coarsen::{coarsen, create_subgraphs};
pub use error::CoreError;
pub use graph::{Pair, VertexId, WeightedGraph};
pub use matching::{Matching, MatchingEngine, MatchingMethod};
pub use sampler::{ProbeSet, Sampler};
pub use similarity::{SimilarityIndex, SimilarityScorer};
