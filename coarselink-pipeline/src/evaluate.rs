//! Fold/level evaluation driver.
//!
//! For each fold: sample a probe set, delete it from the level-0 graph,
//! then walk the coarsening hierarchy level by level. At every level the
//! candidate edges are scored into the ranking store, the store is
//! externally sorted for Precision@L and externally shuffled for AUC, and
//! one CSV row per fold lands in that level's report. The probe set is
//! reinserted at the end of the fold, restoring the graph bit-identically
//! so folds stay independent.
//!
//! Everything runs sequentially per (fold, level) unit; the store and the
//! level graphs are exclusively owned by the step producing them.

use std::path::{Path, PathBuf};
use std::time::Instant;

use log::info;
use serde::{Deserialize, Serialize};

use coarselink_core::{
    coarsen, MatchingEngine, MatchingMethod, ProbeSet, Sampler, SimilarityIndex, SimilarityScorer,
    WeightedGraph,
};

use crate::error::PipelineError;
use crate::metrics::{auc, precision_at};
use crate::predictor::{predict_coarse, predict_to_store, BackProjection, GroupExpansion};
use crate::report::LevelReport;
use crate::store::RankingStore;

/// Parameters of one evaluation run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Number of folds (probe samples) to evaluate.
    pub folds: usize,
    /// Number of coarsening levels above the original graph.
    pub levels: usize,
    /// Matching strategy used to build each level.
    pub matching: MatchingMethod,
    /// Similarity index used for both matching and prediction.
    pub similarity: SimilarityIndex,
    /// Fraction of edges held out per fold.
    pub probe_proportion: f64,
    /// Ranking depths L evaluated per metric.
    pub depths: Vec<usize>,
    /// Records per in-memory chunk during external sort/shuffle.
    pub chunk_records: usize,
    /// Master seed; sampler, matcher and shuffle seeds derive from it.
    pub seed: u64,
    /// Divide back-projected scores by the expansion group size.
    pub weighted_projection: bool,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            folds: 10,
            levels: 0,
            matching: MatchingMethod::Random,
            similarity: SimilarityIndex::CommonNeighbors,
            probe_proportion: 0.20,
            depths: vec![100, 200, 500, 1000, 2500, 5000, 10000],
            chunk_records: 1 << 20,
            seed: 0,
            weighted_projection: false,
        }
    }
}

/// Per-fold, per-level metric rows produced by [`Evaluation::run`].
#[derive(Clone, Debug)]
pub struct LevelOutcome {
    pub level: usize,
    pub fold: usize,
    pub precision: Vec<f64>,
    pub auc: Vec<f64>,
    pub elapsed_secs: f64,
}

/// Evaluation runner; owns the config and the work directory.
pub struct Evaluation {
    config: EvaluationConfig,
    workdir: PathBuf,
}

impl Evaluation {
    pub fn new(config: EvaluationConfig, workdir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            workdir: workdir.into(),
        }
    }

    /// Run the full fold/level grid on `graph` (a level-0 graph with the
    /// probe edges still present). Returns every (fold, level) outcome in
    /// execution order; CSV reports land under the work directory.
    pub fn run(&self, graph: &WeightedGraph) -> Result<Vec<LevelOutcome>, PipelineError> {
        let cfg = &self.config;
        info!(
            "evaluating {} fold(s) x {} level(s): matching={}, similarity={}, probe={:.2}",
            cfg.folds, cfg.levels + 1, cfg.matching, cfg.similarity, cfg.probe_proportion
        );

        let mut reports: Vec<LevelReport> = (0..=cfg.levels)
            .map(|level| LevelReport::create(&self.workdir, level, &cfg.depths))
            .collect::<Result<_, _>>()?;

        let mut working = graph.clone();
        let mut sampler = Sampler::new(cfg.seed);
        let mut outcomes = Vec::with_capacity(cfg.folds * (cfg.levels + 1));

        for fold in 0..cfg.folds {
            info!("fold {}/{}", fold + 1, cfg.folds);
            let probe = sampler.sample(&working, cfg.probe_proportion);
            Sampler::delete(&mut working, &probe)?;

            let fold_result = self.run_fold(&working, &probe, fold, &mut reports, &mut outcomes);

            // The graph must be restored even when the fold fails, so
            // reinsertion happens before the error propagates.
            Sampler::reinsert(&mut working, &probe)?;
            fold_result?;
        }

        for report in reports {
            report.finish()?;
        }
        Ok(outcomes)
    }

    fn run_fold(
        &self,
        working: &WeightedGraph,
        probe: &ProbeSet,
        fold: usize,
        reports: &mut [LevelReport],
        outcomes: &mut Vec<LevelOutcome>,
    ) -> Result<(), PipelineError> {
        let cfg = &self.config;
        // Seeds diverge per fold so fold iterations stay independent.
        let fold_seed = cfg.seed.wrapping_add(fold as u64);
        let mut engine = MatchingEngine::new(cfg.matching, fold_seed);
        let projection = GroupExpansion::new(cfg.weighted_projection);

        let mut level_graph = working.clone();
        for level in 0..=cfg.levels {
            let started = Instant::now();
            let store = RankingStore::new(self.ranking_path(fold, level));

            if level == 0 {
                let mut scorer = SimilarityScorer::new(cfg.similarity);
                let mut writer = store.writer()?;
                predict_to_store(&level_graph, &mut scorer, &mut writer)?;
                writer.finish()?;
            } else {
                // Matching always scores with common neighbors, as the
                // prediction index is free to differ from the one guiding
                // contraction.
                let mut match_scorer = SimilarityScorer::new(SimilarityIndex::CommonNeighbors);
                let matching = engine.run(&level_graph, &mut match_scorer);
                level_graph = coarsen(&level_graph, &matching)?;

                let mut scorer = SimilarityScorer::new(cfg.similarity);
                let coarse_ranking = predict_coarse(&level_graph, &mut scorer);
                let mut writer = store.writer()?;
                projection.project(working, &level_graph, &coarse_ranking, &mut writer)?;
                writer.finish()?;
            }
            let elapsed_secs = started.elapsed().as_secs_f64();

            let outcome = self.score_store(&store, probe, fold, level, elapsed_secs)?;
            store.remove()?;

            reports[level].append_fold(&outcome.precision, &outcome.auc, outcome.elapsed_secs)?;
            outcomes.push(outcome);
        }
        Ok(())
    }

    /// Sort for Precision@L, shuffle for AUC, stream both metric families.
    fn score_store(
        &self,
        store: &RankingStore,
        probe: &ProbeSet,
        fold: usize,
        level: usize,
        elapsed_secs: f64,
    ) -> Result<LevelOutcome, PipelineError> {
        let cfg = &self.config;

        store.sort(cfg.chunk_records)?;
        let mut reader = store.reader()?;
        let precision = cfg
            .depths
            .iter()
            .map(|&l| precision_at(&mut reader, probe, l))
            .collect::<Result<Vec<_>, _>>()?;

        let shuffle_seed = cfg
            .seed
            .wrapping_add((fold as u64) << 16)
            .wrapping_add(level as u64);
        store.shuffle(cfg.chunk_records, shuffle_seed)?;
        let mut reader = store.reader()?;
        let auc_values = cfg
            .depths
            .iter()
            .map(|&n| auc(&mut reader, probe, n))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(LevelOutcome {
            level,
            fold,
            precision,
            auc: auc_values,
            elapsed_secs,
        })
    }

    fn ranking_path(&self, fold: usize, level: usize) -> PathBuf {
        self.workdir
            .join(format!("ranking_f{fold}_l{level}.txt"))
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }
}
