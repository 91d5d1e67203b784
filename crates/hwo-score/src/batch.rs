//! Batch scoring with per-record error collection.

use hwo_model::{CanonicalRecord, ScoredRecord, ValidationError};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, info_span, warn};

use crate::engine::ScoringEngine;

/// Scored records in input order, plus one error per rejected record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreBatch {
    pub scored: Vec<ScoredRecord>,
    pub errors: Vec<ValidationError>,
}

impl ScoreBatch {
    fn collect(results: Vec<Result<ScoredRecord, ValidationError>>) -> Self {
        let mut batch = ScoreBatch::default();
        for result in results {
            match result {
                Ok(scored) => batch.scored.push(scored),
                Err(err) => {
                    warn!(error = %err, "record rejected");
                    batch.errors.push(err);
                }
            }
        }
        info!(
            scored = batch.scored.len(),
            rejected = batch.errors.len(),
            "scored batch"
        );
        batch
    }
}

impl ScoringEngine {
    /// Scores records sequentially. A failing record does not stop the batch.
    pub fn score_batch(&self, records: &[CanonicalRecord]) -> ScoreBatch {
        let _span = info_span!("score_batch", records = records.len()).entered();
        let results = records.iter().map(|record| self.score(record)).collect();
        ScoreBatch::collect(results)
    }

    /// Scores records on the rayon pool. Output is identical to
    /// [`Self::score_batch`], in input order.
    pub fn score_batch_parallel(&self, records: &[CanonicalRecord]) -> ScoreBatch {
        let _span = info_span!("score_batch_parallel", records = records.len()).entered();
        let results = records.par_iter().map(|record| self.score(record)).collect();
        ScoreBatch::collect(results)
    }
}
