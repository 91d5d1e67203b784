//! Table-level processing: rows in, scored and ranked targets out.

use std::collections::BTreeMap;

use hwo_model::{CanonicalField, RawRow, ScoredRecord, TargetId, ValidationError};
use hwo_rank::RankingResult;
use hwo_reconcile::{MappingError, ReconciliationResult, build_records, column_samples};
use hwo_sequence::{OptimizerInputError, SequenceResult, TimeWindow};
use serde::Serialize;
use tracing::{info, info_span};

use crate::engine::TargetEngine;

/// Counts for one processed table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProcessingSummary {
    pub total_rows: usize,
    /// Rows that became canonical records.
    pub converted: usize,
    pub scored: usize,
    /// Rows rejected during conversion or scoring.
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedTable {
    pub reconciliation: ReconciliationResult,
    pub scored: Vec<ScoredRecord>,
    /// One entry per rejected row, conversion errors first.
    pub errors: Vec<ValidationError>,
    pub summary: ProcessingSummary,
}

/// Ranking of a scored set, optionally informed by a sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetPlan {
    pub sequence: Option<SequenceResult>,
    pub ranking: RankingResult,
}

impl TargetEngine {
    /// Reconciles, converts and scores a whole table.
    ///
    /// Fails only when the headers cannot be mapped; row-level problems are
    /// collected in [`ProcessedTable::errors`].
    pub fn process_table(
        &self,
        headers: &[String],
        rows: &[RawRow],
        overrides: &BTreeMap<CanonicalField, String>,
    ) -> Result<ProcessedTable, MappingError> {
        let span = info_span!("process_table", rows = rows.len(), columns = headers.len());
        let _guard = span.enter();

        let samples = column_samples(rows, headers.len(), self.reconciler.config().sample_size);
        let reconciliation = if overrides.is_empty() {
            self.reconcile(headers, &samples)
        } else {
            self.reconcile_with_override(headers, &samples, overrides)?
        };
        let mapping = reconciliation.column_mapping()?;

        let converted = build_records(&mapping, rows);
        let scoring = self.score_batch(&converted.records);

        let summary = ProcessingSummary {
            total_rows: rows.len(),
            converted: converted.records.len(),
            scored: scoring.scored.len(),
            failed: converted.errors.len() + scoring.errors.len(),
        };
        info!(
            total_rows = summary.total_rows,
            converted = summary.converted,
            scored = summary.scored,
            failed = summary.failed,
            mapping_quality = reconciliation.mapping_quality,
            "processed table"
        );

        let mut errors = converted.errors;
        errors.extend(scoring.errors);
        Ok(ProcessedTable {
            reconciliation,
            scored: scoring.scored,
            errors,
            summary,
        })
    }

    /// Ranks `scored`. With `sequence_top`, the best `n` targets of a first
    /// ranking are sequenced with the slew model, and everything is ranked
    /// again with sequence position in play.
    pub fn plan(
        &self,
        scored: &[ScoredRecord],
        sequence_top: Option<usize>,
        windows: &BTreeMap<TargetId, TimeWindow>,
    ) -> Result<TargetPlan, OptimizerInputError> {
        let initial = self.rank(scored, None);
        let Some(limit) = sequence_top else {
            return Ok(TargetPlan {
                sequence: None,
                ranking: initial,
            });
        };

        let selected: Vec<ScoredRecord> = initial
            .top(limit)
            .iter()
            .filter_map(|entry| scored.iter().find(|record| record.id() == &entry.id))
            .cloned()
            .collect();
        let candidate_windows: BTreeMap<TargetId, TimeWindow> = windows
            .iter()
            .filter(|(id, _)| selected.iter().any(|record| record.id() == *id))
            .map(|(id, window)| (id.clone(), *window))
            .collect();
        let sequence = self.optimize_slew(&selected, &candidate_windows)?;
        let ranking = self.rank(scored, Some(&sequence));
        Ok(TargetPlan {
            sequence: Some(sequence),
            ranking,
        })
    }
}
