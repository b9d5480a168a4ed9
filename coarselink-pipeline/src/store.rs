//! External ranking store: an append-only record stream on disk with
//! out-of-core reordering.
//!
//! The store is sized to exceed main memory, so both reorderings are
//! chunked: read the stream in fixed-size chunks, transform each chunk in
//! memory (stable descending sort, or a Fisher-Yates shuffle), spill each
//! transformed chunk to its own file, then k-way merge the spills back
//! into the backing file. Spill files live in a [`tempfile::TempDir`]
//! next to the backing file, whose `Drop` removes them on every exit
//! path, including errors raised mid-reorder.
//!
//! Writers and readers buffer at the OS/BufWriter level only; no record
//! is held beyond the chunk being transformed.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Seek, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::error::PipelineError;
use crate::merge::{kway_merge, MergePolicy, RecordSource};
use crate::record::RankingRecord;

/// Streaming writer; one record per `append`, flushed on `finish`.
pub struct RankingWriter {
    inner: BufWriter<File>,
}

impl RankingWriter {
    pub fn append(&mut self, record: &RankingRecord) -> Result<(), PipelineError> {
        writeln!(self.inner, "{record}")?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<(), PipelineError> {
        self.inner.flush()?;
        Ok(())
    }
}

/// Streaming reader over a record file, one record per call.
pub struct RankingReader {
    inner: BufReader<File>,
    line: usize,
    buffer: String,
}

impl RankingReader {
    fn open(path: &Path) -> Result<Self, PipelineError> {
        Ok(Self {
            inner: BufReader::new(File::open(path)?),
            line: 0,
            buffer: String::new(),
        })
    }

    /// Re-seek to the start of the stream.
    pub fn rewind(&mut self) -> Result<(), PipelineError> {
        self.inner.rewind()?;
        self.line = 0;
        Ok(())
    }

    pub fn next_record(&mut self) -> Result<Option<RankingRecord>, PipelineError> {
        self.buffer.clear();
        if self.inner.read_line(&mut self.buffer)? == 0 {
            return Ok(None);
        }
        self.line += 1;
        RankingRecord::parse_line(&self.buffer, self.line).map(Some)
    }
}

impl RecordSource for RankingReader {
    fn next_record(&mut self) -> Result<Option<RankingRecord>, PipelineError> {
        RankingReader::next_record(self)
    }
}

/// Handle to one on-disk ranking stream, created per (fold, level) unit
/// and destroyed once metrics are extracted.
pub struct RankingStore {
    path: PathBuf,
}

impl RankingStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a fresh writer, truncating any previous content.
    pub fn writer(&self) -> Result<RankingWriter, PipelineError> {
        Ok(RankingWriter {
            inner: BufWriter::new(File::create(&self.path)?),
        })
    }

    pub fn reader(&self) -> Result<RankingReader, PipelineError> {
        RankingReader::open(&self.path)
    }

    /// Delete the backing file.
    pub fn remove(&self) -> Result<(), PipelineError> {
        std::fs::remove_file(&self.path)?;
        Ok(())
    }

    /// External sort, descending by score. Each chunk is stably sorted in
    /// memory, so the order-preserving merge yields one globally
    /// descending stream. O(N log N).
    pub fn sort(&self, chunk_records: usize) -> Result<(), PipelineError> {
        info!("external sort of {:?} (chunk = {chunk_records} records)", self.path);
        self.reorder(
            chunk_records,
            &mut |chunk: &mut Vec<RankingRecord>| {
                chunk.par_sort_by(|a, b| OrderedFloat(b.score).cmp(&OrderedFloat(a.score)));
            },
            MergePolicy::ScoreDescending,
        )
    }

    /// External shuffle: every chunk is permuted uniformly in memory and
    /// the merge interleaves chunks at random, so no cross-chunk order
    /// survives. O(N) excluding the merge pass.
    pub fn shuffle(&self, chunk_records: usize, seed: u64) -> Result<(), PipelineError> {
        info!("external shuffle of {:?} (chunk = {chunk_records} records, seed {seed})", self.path);
        let mut chunk_rng = StdRng::seed_from_u64(seed);
        let merge_rng = StdRng::from_rng(&mut chunk_rng);
        self.reorder(
            chunk_records,
            &mut |chunk: &mut Vec<RankingRecord>| {
                chunk.shuffle(&mut chunk_rng);
            },
            MergePolicy::RandomInterleave(merge_rng),
        )
    }

    /// Shared chunk/spill/merge machinery for sort and shuffle. The spill
    /// directory is dropped (and its files removed) on every exit path.
    fn reorder(
        &self,
        chunk_records: usize,
        transform: &mut dyn FnMut(&mut Vec<RankingRecord>),
        mut policy: MergePolicy,
    ) -> Result<(), PipelineError> {
        assert!(chunk_records > 0, "chunk size must be positive");
        // Spills sit next to the backing file, on the same filesystem.
        let parent = self.path.parent().unwrap_or_else(|| Path::new("."));
        let spill_dir = tempfile::tempdir_in(parent)?;

        // Chunk phase: read, transform, spill.
        let mut spill_paths: Vec<PathBuf> = Vec::new();
        {
            let mut reader = self.reader()?;
            let mut chunk: Vec<RankingRecord> = Vec::with_capacity(chunk_records);
            loop {
                let record = reader.next_record()?;
                if let Some(record) = record {
                    chunk.push(record);
                }
                let flush_full = chunk.len() == chunk_records;
                let at_end = record.is_none();
                if (flush_full || at_end) && !chunk.is_empty() {
                    transform(&mut chunk);
                    let spill_path = spill_dir.path().join(format!("{:06}", spill_paths.len()));
                    let mut spill = BufWriter::new(File::create(&spill_path)?);
                    for r in &chunk {
                        writeln!(spill, "{r}")?;
                    }
                    spill.flush()?;
                    spill_paths.push(spill_path);
                    chunk.clear();
                }
                if at_end {
                    break;
                }
            }
        }
        debug!("spilled {} chunk file(s)", spill_paths.len());

        // Merge phase: k-way merge the spills back into the backing file.
        let sources = spill_paths
            .iter()
            .map(|p| RankingReader::open(p))
            .collect::<Result<Vec<_>, _>>()?;
        let mut writer = self.writer()?;
        let emitted = kway_merge(sources, &mut policy, |record| writer.append(record))?;
        writer.finish()?;
        debug!("merged {emitted} records back into {:?}", self.path);
        Ok(())
    }
}
