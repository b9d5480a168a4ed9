use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::PipelineError;
use crate::merge::{kway_merge, MergePolicy, RecordSource};
use crate::record::RankingRecord;

/// In-memory source for exercising the merge without files.
struct VecSource(std::vec::IntoIter<RankingRecord>);

impl VecSource {
    fn new(records: Vec<(usize, usize, f64)>) -> Self {
        Self(
            records
                .into_iter()
                .map(|(s, t, score)| RankingRecord::new(s, t, score))
                .collect::<Vec<_>>()
                .into_iter(),
        )
    }
}

impl RecordSource for VecSource {
    fn next_record(&mut self) -> Result<Option<RankingRecord>, PipelineError> {
        Ok(self.0.next())
    }
}

fn collect_merge(sources: Vec<VecSource>, policy: &mut MergePolicy) -> Vec<RankingRecord> {
    let mut out = Vec::new();
    kway_merge(sources, policy, |r| {
        out.push(*r);
        Ok(())
    })
    .unwrap();
    out
}

#[test]
fn descending_merge_produces_global_order() {
    let a = VecSource::new(vec![(0, 1, 0.9), (0, 2, 0.5), (0, 3, 0.1)]);
    let b = VecSource::new(vec![(1, 2, 0.8), (1, 3, 0.4)]);
    let c = VecSource::new(vec![(2, 3, 0.7), (2, 4, 0.6), (2, 5, 0.2)]);

    let merged = collect_merge(vec![a, b, c], &mut MergePolicy::ScoreDescending);
    assert_eq!(merged.len(), 8);
    assert!(merged.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn descending_merge_breaks_ties_toward_earlier_sources() {
    let a = VecSource::new(vec![(0, 1, 0.5)]);
    let b = VecSource::new(vec![(2, 3, 0.5)]);
    let merged = collect_merge(vec![a, b], &mut MergePolicy::ScoreDescending);
    assert_eq!(merged[0].pair(), RankingRecord::new(0, 1, 0.5).pair());
    assert_eq!(merged[1].pair(), RankingRecord::new(2, 3, 0.5).pair());
}

#[test]
fn merge_of_empty_sources_emits_nothing() {
    let merged = collect_merge(
        vec![VecSource::new(vec![]), VecSource::new(vec![])],
        &mut MergePolicy::ScoreDescending,
    );
    assert!(merged.is_empty());
    let merged = collect_merge(vec![], &mut MergePolicy::ScoreDescending);
    assert!(merged.is_empty());
}

#[test]
fn random_interleave_emits_every_record_exactly_once() {
    let a = VecSource::new(vec![(0, 1, 0.1), (0, 2, 0.2)]);
    let b = VecSource::new(vec![(1, 2, 0.3), (1, 3, 0.4), (1, 4, 0.5)]);
    let mut policy = MergePolicy::RandomInterleave(StdRng::seed_from_u64(5));
    let merged = collect_merge(vec![a, b], &mut policy);

    assert_eq!(merged.len(), 5);
    let mut pairs: Vec<_> = merged.iter().map(|r| (r.source, r.target)).collect();
    pairs.sort_unstable();
    assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 2), (1, 3), (1, 4)]);
}

#[test]
fn random_interleave_preserves_per_source_order_only() {
    // Whatever the interleaving, records of one source keep their
    // relative order (each source is drained front to back).
    let a = VecSource::new(vec![(0, 1, 1.0), (0, 2, 2.0), (0, 3, 3.0)]);
    let b = VecSource::new(vec![(1, 2, 4.0), (1, 3, 5.0)]);
    let mut policy = MergePolicy::RandomInterleave(StdRng::seed_from_u64(9));
    let merged = collect_merge(vec![a, b], &mut policy);

    let from_a: Vec<f64> = merged
        .iter()
        .filter(|r| r.source == 0)
        .map(|r| r.score)
        .collect();
    assert_eq!(from_a, vec![1.0, 2.0, 3.0]);
}
