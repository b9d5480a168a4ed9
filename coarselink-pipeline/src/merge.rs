//! Generic k-way merge over typed record readers.
//!
//! Implemented once, parameterised by a [`MergePolicy`]:
//!
//! - `ScoreDescending` keeps the spill chunks' internal descending order
//!   and always emits the highest-scoring head, producing one globally
//!   descending stream (external sort).
//! - `RandomInterleave` deliberately restores *no* cross-chunk ordering:
//!   each step drains one record from a uniformly random non-exhausted
//!   source, so the merged stream's adjacency is randomized at both
//!   intra- and inter-chunk granularity (external shuffle).
//!
//! The number of sources equals the number of spill chunks, which is
//! small; head selection is a linear scan.

use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::Rng;

use crate::error::PipelineError;
use crate::record::RankingRecord;

/// A pull-based reader of ranking records, exhausted when it yields
/// `None`.
pub trait RecordSource {
    fn next_record(&mut self) -> Result<Option<RankingRecord>, PipelineError>;
}

/// Head-selection strategy for the merge loop.
pub enum MergePolicy {
    /// Order-preserving: emit the maximum-score head (ties keep the
    /// lowest source index, so equal scores stay chunk-stable).
    ScoreDescending,
    /// Interleave-only: emit a head chosen uniformly at random among the
    /// non-exhausted sources.
    RandomInterleave(StdRng),
}

impl MergePolicy {
    fn pick(&mut self, heads: &[Option<RankingRecord>]) -> Option<usize> {
        match self {
            MergePolicy::ScoreDescending => heads
                .iter()
                .enumerate()
                .filter_map(|(idx, head)| head.map(|r| (idx, OrderedFloat(r.score))))
                .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0))),
            MergePolicy::RandomInterleave(rng) => {
                let live: Vec<usize> = heads
                    .iter()
                    .enumerate()
                    .filter_map(|(idx, head)| head.map(|_| idx))
                    .collect();
                if live.is_empty() {
                    return None;
                }
                let idx = live[rng.random_range(0..live.len())];
                Some((idx, OrderedFloat(0.0)))
            }
        }
        .map(|(idx, _)| idx)
    }
}

/// Merge all sources into `sink`, one record at a time. Returns the
/// number of records emitted.
pub fn kway_merge<S, F>(
    mut sources: Vec<S>,
    policy: &mut MergePolicy,
    mut sink: F,
) -> Result<usize, PipelineError>
where
    S: RecordSource,
    F: FnMut(&RankingRecord) -> Result<(), PipelineError>,
{
    let mut heads: Vec<Option<RankingRecord>> = Vec::with_capacity(sources.len());
    for source in &mut sources {
        heads.push(source.next_record()?);
    }

    let mut emitted = 0usize;
    while let Some(idx) = policy.pick(&heads) {
        // pick only returns indices whose head is present.
        let record = heads[idx].take().unwrap();
        sink(&record)?;
        emitted += 1;
        heads[idx] = sources[idx].next_record()?;
    }
    Ok(emitted)
}
