//! # coarselink-pipeline
//!
//! Out-of-core evaluation pipeline for multilevel link prediction:
//!
//! 1. **Ranking store**: append-only `(source, target, score)` record
//!    stream on disk, with external descending sort (for Precision@L) and
//!    external shuffle (for unbiased AUC sampling), both built on a
//!    generic k-way merge over spill files.
//! 2. **Metric calculator**: Precision@L and rank-based AUC computed by
//!    streaming through the reordered store, never materialising the
//!    ranking in memory.
//! 3. **Predictor**: all-pairs similarity prediction at any hierarchy
//!    level, plus the back-projection seam that maps coarse-level
//!    predictions onto original-graph vertex pairs.
//! 4. **Evaluation driver**: the fold/level loop: sample a probe set,
//!    coarsen level by level, rank, reorder, score, report CSV rows.
//!
//! Each (fold, level) unit runs sequentially and owns its store
//! exclusively; spill files are scoped to a temporary directory and
//! removed on every exit path.

pub mod error;
pub mod evaluate;
pub mod merge;
pub mod metrics;
pub mod predictor;
pub mod record;
pub mod report;
pub mod store;

#[cfg(test)]
mod tests;

pub use error::PipelineError;
pub use evaluate::{Evaluation, EvaluationConfig, LevelOutcome};
pub use merge::{kway_merge, MergePolicy, RecordSource};
pub use metrics::{auc, precision_at};
pub use predictor::{
    predict_coarse, predict_to_store, BackProjection, CoarseRanking, GroupExpansion,
};
pub use record::RankingRecord;
pub use store::{RankingReader, RankingStore, RankingWriter};
