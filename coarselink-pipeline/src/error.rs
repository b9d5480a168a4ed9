use thiserror::Error;

use coarselink_core::CoreError;

/// Errors raised by the ranking store, the metric calculators and the
/// evaluation driver.
///
/// I/O failures abort the current (fold, level) unit after spill cleanup;
/// core invariant violations abort the enclosing fold. Degenerate metric
/// input (empty probe set, zero depth) is *not* an error; the
/// calculators return `f64::NAN` for it.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Failure to open, read or write a ranking stream or spill file.
    #[error("ranking store I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// A line that does not parse as `source target score`.
    #[error("malformed ranking record at line {line}: {content:?}")]
    MalformedRecord { line: usize, content: String },

    /// A record violating the `source < target` ordering contract.
    #[error("ranking record with source {src} >= target {tgt}")]
    UnorderedRecord { src: usize, tgt: usize },

    /// Invariant violation bubbled up from the algorithmic core.
    #[error(transparent)]
    Core(#[from] CoreError),
}
