//! The [`TargetEngine`] facade.

use std::collections::BTreeMap;

use hwo_model::{
    CanonicalField, CanonicalRecord, CellValue, ScoredRecord, TargetId, ValidationError,
};
use hwo_rank::{Ranker, RankingResult};
use hwo_reconcile::{MappingError, ReconcileEngine, ReconciliationResult};
use hwo_score::{ScoreBatch, ScoringEngine};
use hwo_sequence::{
    OptimizerInputError, SearchBudget, SequenceOptimizer, SequenceResult, TimeWindow,
    TransitionCost,
};

use crate::config::EngineConfig;
use crate::error::ConfigError;

/// One entry point for every stage, built from a validated [`EngineConfig`].
///
/// Every method is pure; a single engine can serve concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct TargetEngine {
    pub(crate) reconciler: ReconcileEngine,
    pub(crate) scorer: ScoringEngine,
    pub(crate) optimizer: SequenceOptimizer,
    pub(crate) ranker: Ranker,
}

impl TargetEngine {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let EngineConfig {
            reconcile,
            catalog,
            scoring,
            sequence,
            ranking,
        } = config;
        Ok(Self {
            reconciler: ReconcileEngine::new(catalog, reconcile),
            scorer: ScoringEngine::new(scoring),
            optimizer: SequenceOptimizer::new(sequence)?,
            ranker: Ranker::new(ranking)?,
        })
    }

    pub fn reconciler(&self) -> &ReconcileEngine {
        &self.reconciler
    }

    pub fn scorer(&self) -> &ScoringEngine {
        &self.scorer
    }

    pub fn optimizer(&self) -> &SequenceOptimizer {
        &self.optimizer
    }

    pub fn ranker(&self) -> &Ranker {
        &self.ranker
    }

    pub fn reconcile(
        &self,
        headers: &[String],
        samples: &[Vec<CellValue>],
    ) -> ReconciliationResult {
        self.reconciler.reconcile(headers, samples)
    }

    pub fn reconcile_with_override(
        &self,
        headers: &[String],
        samples: &[Vec<CellValue>],
        overrides: &BTreeMap<CanonicalField, String>,
    ) -> Result<ReconciliationResult, MappingError> {
        self.reconciler
            .reconcile_with_override(headers, samples, overrides)
    }

    pub fn score(&self, record: &CanonicalRecord) -> Result<ScoredRecord, ValidationError> {
        self.scorer.score(record)
    }

    /// Scores on the rayon pool; output order follows input order.
    pub fn score_batch(&self, records: &[CanonicalRecord]) -> ScoreBatch {
        self.scorer.score_batch_parallel(records)
    }

    pub fn optimize_sequence<C>(
        &self,
        records: &[ScoredRecord],
        cost: &C,
        windows: &BTreeMap<TargetId, TimeWindow>,
        budget: &SearchBudget,
    ) -> Result<SequenceResult, OptimizerInputError>
    where
        C: TransitionCost + ?Sized,
    {
        self.optimizer.optimize(records, cost, windows, budget)
    }

    /// Sequences with the configured slew model and search budget.
    pub fn optimize_slew(
        &self,
        records: &[ScoredRecord],
        windows: &BTreeMap<TargetId, TimeWindow>,
    ) -> Result<SequenceResult, OptimizerInputError> {
        self.optimizer.optimize_slew(records, windows)
    }

    pub fn rank(
        &self,
        records: &[ScoredRecord],
        sequence: Option<&SequenceResult>,
    ) -> RankingResult {
        self.ranker.rank(records, sequence)
    }
}
