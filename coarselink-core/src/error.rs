use thiserror::Error;

use crate::graph::VertexId;

/// Errors raised by the graph model, matching validation and coarsening.
///
/// All of these are invariant violations: they abort the enclosing fold
/// rather than being retried or recovered.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// The matching array is not a symmetric involution:
    /// `matching[partner] != vertex` for a matched `vertex`.
    #[error("malformed matching: vertex {vertex} points to {partner}, which does not point back")]
    MalformedMatching { vertex: VertexId, partner: VertexId },

    /// A self-loop was supplied where the graph forbids one.
    #[error("self-loop on vertex {vertex} is not allowed")]
    SelfLoop { vertex: VertexId },

    /// An edge insertion collided with an edge already present.
    #[error("edge ({a}, {b}) already present")]
    DuplicateEdge { a: VertexId, b: VertexId },

    /// An edge deletion or lookup referenced an absent edge.
    #[error("edge ({a}, {b}) not present")]
    MissingEdge { a: VertexId, b: VertexId },

    /// A vertex id outside `[0, vcount)`.
    #[error("vertex {vertex} out of range for graph with {vcount} vertices")]
    VertexOutOfRange { vertex: VertexId, vcount: usize },
}
