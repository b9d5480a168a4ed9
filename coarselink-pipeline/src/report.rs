//! Aggregate metric output: per-level CSV files collecting one row per
//! fold.
//!
//! Layout under the evaluation work directory:
//!
//! ```text
//! workdir/level{L}/pr.csv    header = depths, one precision row per fold
//! workdir/level{L}/auc.csv   header = depths, one AUC row per fold
//! workdir/level{L}/time.csv  one elapsed-seconds row per fold
//! ```

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::PipelineError;

/// Open CSV writers for one hierarchy level.
pub struct LevelReport {
    precision: BufWriter<File>,
    auc: BufWriter<File>,
    time: BufWriter<File>,
}

impl LevelReport {
    /// Create `workdir/level{level}/` and its three files, writing the
    /// depth header (comma-joined) once into the metric files.
    pub fn create(workdir: &Path, level: usize, depths: &[usize]) -> Result<Self, PipelineError> {
        let dir = workdir.join(format!("level{level}"));
        fs::create_dir_all(&dir)?;
        let header = depths
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let mut precision = BufWriter::new(File::create(dir.join("pr.csv"))?);
        let mut auc = BufWriter::new(File::create(dir.join("auc.csv"))?);
        writeln!(precision, "{header}")?;
        writeln!(auc, "{header}")?;
        let time = BufWriter::new(File::create(dir.join("time.csv"))?);
        Ok(Self {
            precision,
            auc,
            time,
        })
    }

    /// Append one fold's results.
    pub fn append_fold(
        &mut self,
        precision: &[f64],
        auc: &[f64],
        elapsed_secs: f64,
    ) -> Result<(), PipelineError> {
        writeln!(self.precision, "{}", join_values(precision))?;
        writeln!(self.auc, "{}", join_values(auc))?;
        writeln!(self.time, "{elapsed_secs}")?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<(), PipelineError> {
        self.precision.flush()?;
        self.auc.flush()?;
        self.time.flush()?;
        Ok(())
    }
}

fn join_values(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
