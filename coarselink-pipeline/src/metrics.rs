//! Order-based accuracy metrics computed from a streamed ranking.
//!
//! Both calculators read the ranking store record by record and never
//! hold more than the AUC buckets (at most `n` scores each) in memory.
//! Degenerate input (an empty probe set or a zero depth) yields the
//! documented `f64::NAN` sentinel instead of a division by zero.

use log::debug;

use coarselink_core::ProbeSet;

use crate::error::PipelineError;
use crate::store::RankingReader;

/// Precision@L over a *descending-sorted* ranking stream: the fraction of
/// the first `min(l, |probe|)` records whose pair is a probe edge.
///
/// Rewinds the reader first, so repeated calls with different depths on
/// the same reader are idempotent.
pub fn precision_at(
    reader: &mut RankingReader,
    probe: &ProbeSet,
    l: usize,
) -> Result<f64, PipelineError> {
    reader.rewind()?;
    let depth = l.min(probe.len());
    if depth == 0 {
        return Ok(f64::NAN);
    }
    let mut hits = 0usize;
    for _ in 0..depth {
        match reader.next_record()? {
            Some(record) => {
                if probe.contains(&record.pair()) {
                    hits += 1;
                }
            }
            None => break,
        }
    }
    debug!("precision@{l}: {hits}/{depth} hits");
    Ok(hits as f64 / depth as f64)
}

/// Rank-based AUC estimate over a *shuffled* ranking stream.
///
/// Streams forward classifying each record as probe edge or non-probe
/// prediction until `min(n, |probe|)` of each are collected (excess
/// records are skipped, not buffered), then compares the buckets
/// pairwise: `(greater + 0.5 * ties) / pairs`. The input must already be
/// randomized; pairing sequential reads from a sorted stream would bias
/// the estimate.
///
/// If the stream ends before both buckets fill, the pairs actually
/// collected are compared and the divisor shrinks accordingly; zero pairs
/// yields NAN.
pub fn auc(
    reader: &mut RankingReader,
    probe: &ProbeSet,
    n: usize,
) -> Result<f64, PipelineError> {
    reader.rewind()?;
    let cap = n.min(probe.len());
    if cap == 0 {
        return Ok(f64::NAN);
    }

    let mut probe_scores: Vec<f64> = Vec::with_capacity(cap);
    let mut other_scores: Vec<f64> = Vec::with_capacity(cap);
    while probe_scores.len() < cap || other_scores.len() < cap {
        match reader.next_record()? {
            Some(record) => {
                if probe.contains(&record.pair()) {
                    if probe_scores.len() < cap {
                        probe_scores.push(record.score);
                    }
                } else if other_scores.len() < cap {
                    other_scores.push(record.score);
                }
            }
            None => break,
        }
    }

    let pairs = probe_scores.len().min(other_scores.len());
    if pairs == 0 {
        return Ok(f64::NAN);
    }
    let mut greater = 0usize;
    let mut ties = 0usize;
    for (probe_score, other_score) in probe_scores.iter().zip(other_scores.iter()) {
        if probe_score > other_score {
            greater += 1;
        } else if probe_score == other_score {
            ties += 1;
        }
    }
    debug!("auc over {pairs} pair(s): {greater} greater, {ties} tied");
    Ok((greater as f64 + 0.5 * ties as f64) / pairs as f64)
}
