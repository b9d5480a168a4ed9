//! Weighted undirected graph with multilevel provenance bookkeeping.
//!
//! The graph stores adjacency rows (one `Vec<VertexId>` per vertex) next to
//! an unordered-pair weight map, so neighbor scans are cheap and edge
//! lookups are O(1). Two fields travel with every graph across its whole
//! lifetime:
//!
//! - `level`: 0 for the original graph, incremented once per coarsening.
//! - `successors`: indexed by *original-graph* vertex id, giving the id of
//!   the supervertex in *this* graph the original vertex currently maps
//!   to. Its length equals the original vertex count at every level.
//!
//! Self-loops are rejected at insertion; parallel edges cannot exist
//! because the weight map is keyed by the canonical unordered pair.

use std::collections::{HashMap, HashSet};

use log::debug;
use rayon::prelude::*;

use crate::error::CoreError;

/// Dense vertex identifier in `[0, vcount)`.
pub type VertexId = usize;

/// Canonical unordered vertex pair. The constructor normalises the
/// endpoints so `(a, b)` and `(b, a)` hash and compare identically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pair {
    source: VertexId,
    target: VertexId,
}

impl Pair {
    pub fn new(a: VertexId, b: VertexId) -> Self {
        if a <= b {
            Self {
                source: a,
                target: b,
            }
        } else {
            Self {
                source: b,
                target: a,
            }
        }
    }

    /// Lower endpoint.
    pub fn source(&self) -> VertexId {
        self.source
    }

    /// Higher endpoint.
    pub fn target(&self) -> VertexId {
        self.target
    }

    pub fn is_loop(&self) -> bool {
        self.source == self.target
    }
}

/// Undirected graph with positive edge weights and multilevel provenance.
#[derive(Clone, Debug)]
pub struct WeightedGraph {
    vcount: usize,
    adjacency: Vec<Vec<VertexId>>,
    weights: HashMap<Pair, f64>,
    level: usize,
    successors: Vec<VertexId>,
}

impl WeightedGraph {
    /// Empty level-0 graph on `vcount` vertices with identity successors.
    pub fn new(vcount: usize) -> Self {
        Self {
            vcount,
            adjacency: vec![Vec::new(); vcount],
            weights: HashMap::new(),
            level: 0,
            successors: (0..vcount).collect(),
        }
    }

    /// Build a level-0 graph from an edge list with weights.
    pub fn from_edges(vcount: usize, edges: &[(VertexId, VertexId, f64)]) -> Result<Self, CoreError> {
        let mut graph = Self::new(vcount);
        for &(u, v, w) in edges {
            graph.add_edge(u, v, w)?;
        }
        debug!(
            "built graph: {} vertices, {} edges, total weight {:.4}",
            graph.vcount,
            graph.ecount(),
            graph.total_weight()
        );
        Ok(graph)
    }

    /// Construct a coarser-level graph directly from its parts. Used by the
    /// coarsener, which has already normalised pairs and summed weights.
    pub(crate) fn from_parts(
        vcount: usize,
        weights: HashMap<Pair, f64>,
        level: usize,
        successors: Vec<VertexId>,
    ) -> Self {
        let mut adjacency = vec![Vec::new(); vcount];
        for pair in weights.keys() {
            adjacency[pair.source()].push(pair.target());
            adjacency[pair.target()].push(pair.source());
        }
        // Deterministic neighbor order regardless of map iteration.
        for row in &mut adjacency {
            row.sort_unstable();
        }
        Self {
            vcount,
            adjacency,
            weights,
            level,
            successors,
        }
    }

    pub fn vcount(&self) -> usize {
        self.vcount
    }

    pub fn ecount(&self) -> usize {
        self.weights.len()
    }

    /// Hierarchy level: 0 for the original graph.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Per-original-vertex supervertex ids at this level.
    pub fn successors(&self) -> &[VertexId] {
        &self.successors
    }

    pub fn neighbors(&self, vertex: VertexId) -> &[VertexId] {
        &self.adjacency[vertex]
    }

    pub fn degree(&self, vertex: VertexId) -> usize {
        self.adjacency[vertex].len()
    }

    pub fn has_edge(&self, a: VertexId, b: VertexId) -> bool {
        self.weights.contains_key(&Pair::new(a, b))
    }

    pub fn weight(&self, a: VertexId, b: VertexId) -> Option<f64> {
        self.weights.get(&Pair::new(a, b)).copied()
    }

    /// Iterate over `(pair, weight)` in unspecified order.
    pub fn edges(&self) -> impl Iterator<Item = (Pair, f64)> + '_ {
        self.weights.iter().map(|(&pair, &w)| (pair, w))
    }

    /// Edges in ascending `(source, target)` order; use wherever iteration
    /// order must be reproducible.
    pub fn sorted_edges(&self) -> Vec<(Pair, f64)> {
        let mut edges: Vec<(Pair, f64)> = self.edges().collect();
        edges.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        edges
    }

    pub fn total_weight(&self) -> f64 {
        self.weights.values().sum()
    }

    fn check_vertex(&self, vertex: VertexId) -> Result<(), CoreError> {
        if vertex >= self.vcount {
            return Err(CoreError::VertexOutOfRange {
                vertex,
                vcount: self.vcount,
            });
        }
        Ok(())
    }

    /// Insert an edge. Self-loops and duplicates are integrity errors.
    pub fn add_edge(&mut self, a: VertexId, b: VertexId, weight: f64) -> Result<(), CoreError> {
        self.check_vertex(a)?;
        self.check_vertex(b)?;
        if a == b {
            return Err(CoreError::SelfLoop { vertex: a });
        }
        let pair = Pair::new(a, b);
        if self.weights.contains_key(&pair) {
            return Err(CoreError::DuplicateEdge {
                a: pair.source(),
                b: pair.target(),
            });
        }
        self.weights.insert(pair, weight);
        self.adjacency[a].push(b);
        self.adjacency[b].push(a);
        Ok(())
    }

    /// Remove an edge, returning its weight. Absence is an integrity error.
    pub fn remove_edge(&mut self, a: VertexId, b: VertexId) -> Result<f64, CoreError> {
        let pair = Pair::new(a, b);
        let weight = self
            .weights
            .remove(&pair)
            .ok_or(CoreError::MissingEdge {
                a: pair.source(),
                b: pair.target(),
            })?;
        self.adjacency[a].retain(|&n| n != b);
        self.adjacency[b].retain(|&n| n != a);
        Ok(weight)
    }

    /// Immutable neighbor sets for similarity scoring, computed once up
    /// front so greedy passes never observe a half-updated adjacency.
    pub fn adjacency_sets(&self) -> Vec<HashSet<VertexId>> {
        self.adjacency
            .par_iter()
            .map(|row| row.iter().copied().collect())
            .collect()
    }

    /// Induced subgraph on `vertices`, re-indexed to local ids in the
    /// order given. Contains exactly the edges between the listed
    /// vertices that are present in this graph.
    pub fn induced_subgraph(&self, vertices: &[VertexId]) -> Result<WeightedGraph, CoreError> {
        let mut local: HashMap<VertexId, VertexId> = HashMap::with_capacity(vertices.len());
        for (idx, &v) in vertices.iter().enumerate() {
            self.check_vertex(v)?;
            local.insert(v, idx);
        }
        let mut subgraph = WeightedGraph::new(vertices.len());
        for (&v, &lv) in &local {
            for &n in self.neighbors(v) {
                if let Some(&ln) = local.get(&n) {
                    if lv < ln {
                        let w = self.weight(v, n).unwrap_or(0.0);
                        subgraph.add_edge(lv, ln, w)?;
                    }
                }
            }
        }
        Ok(subgraph)
    }
}
