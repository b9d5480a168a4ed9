//! Ranking record and its on-disk text codec.
//!
//! One record per line, `source target score` separated by single spaces,
//! newline-terminated, no header. `source < target` always holds: the
//! pair is an unordered original-graph vertex pair in canonical order.

use std::fmt;

use coarselink_core::{Pair, VertexId};

use crate::error::PipelineError;

/// One scored vertex-pair prediction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RankingRecord {
    pub source: VertexId,
    pub target: VertexId,
    pub score: f64,
}

impl RankingRecord {
    /// Build a record from an unordered pair, normalising the endpoint
    /// order.
    pub fn new(a: VertexId, b: VertexId, score: f64) -> Self {
        let pair = Pair::new(a, b);
        Self {
            source: pair.source(),
            target: pair.target(),
            score,
        }
    }

    pub fn pair(&self) -> Pair {
        Pair::new(self.source, self.target)
    }

    /// Parse one text line; `line` is the 1-based position used in error
    /// reports.
    pub fn parse_line(content: &str, line: usize) -> Result<Self, PipelineError> {
        let malformed = || PipelineError::MalformedRecord {
            line,
            content: content.to_string(),
        };
        let mut fields = content.split(' ');
        let source: VertexId = fields
            .next()
            .and_then(|f| f.parse().ok())
            .ok_or_else(malformed)?;
        let target: VertexId = fields
            .next()
            .and_then(|f| f.parse().ok())
            .ok_or_else(malformed)?;
        let score: f64 = fields
            .next()
            .and_then(|f| f.trim_end().parse().ok())
            .ok_or_else(malformed)?;
        if fields.next().is_some() {
            return Err(malformed());
        }
        if source >= target {
            return Err(PipelineError::UnorderedRecord {
                src: source,
                tgt: target,
            });
        }
        Ok(Self {
            source,
            target,
            score,
        })
    }
}

impl fmt::Display for RankingRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.source, self.target, self.score)
    }
}
