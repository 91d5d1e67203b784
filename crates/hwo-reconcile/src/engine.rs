//! Reconciliation engine.
//!
//! Scores every (field, column) pair, then assigns columns greedily by
//! descending score so each field claims at most one column and each column
//! feeds at most one field.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use hwo_model::{CanonicalField, CellValue, RawRow};
use tracing::{debug, info, warn};

use crate::catalog::{FieldCatalog, FieldSpec};
use crate::error::MappingError;
use crate::score::{ColumnScore, ColumnScorer};
use crate::types::{
    ColumnCandidate, FieldMapping, MappingSource, ReconcileConfig, ReconciliationResult,
    ReconciliationStatus,
};
use crate::utils::{HeaderForm, header_key};

#[derive(Debug, Clone, Default)]
pub struct ReconcileEngine {
    catalog: FieldCatalog,
    config: ReconcileConfig,
}

impl ReconcileEngine {
    pub fn new(catalog: FieldCatalog, config: ReconcileConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Maps input headers onto canonical fields.
    ///
    /// `samples[i]` holds sample cells for `headers[i]`; missing or short
    /// samples are allowed and reduce scoring to header similarity.
    pub fn reconcile(&self, headers: &[String], samples: &[Vec<CellValue>]) -> ReconciliationResult {
        self.assign(headers, samples, &BTreeMap::new())
    }

    /// Like [`Self::reconcile`], but pins the given fields to named columns.
    ///
    /// Overridden fields get confidence 1.0 and their columns are removed
    /// from automatic assignment.
    pub fn reconcile_with_override(
        &self,
        headers: &[String],
        samples: &[Vec<CellValue>],
        overrides: &BTreeMap<CanonicalField, String>,
    ) -> Result<ReconciliationResult, MappingError> {
        let eligible = eligible_columns(headers);
        let mut pinned: BTreeMap<CanonicalField, usize> = BTreeMap::new();
        let mut owners: BTreeMap<usize, CanonicalField> = BTreeMap::new();
        for (field, column) in overrides {
            if self.catalog.get(*field).is_none() {
                warn!(field = %field, column = %column, "override names a field outside the catalog");
                continue;
            }
            let key = header_key(column);
            let index = eligible
                .iter()
                .copied()
                .find(|&index| header_key(&headers[index]) == key)
                .ok_or_else(|| MappingError::OverrideColumnNotFound {
                    field: *field,
                    column: column.clone(),
                })?;
            if let Some(first) = owners.insert(index, *field) {
                return Err(MappingError::DuplicateOverrideColumn {
                    column: headers[index].clone(),
                    first,
                    second: *field,
                });
            }
            pinned.insert(*field, index);
        }
        Ok(self.assign(headers, samples, &pinned))
    }

    /// Reconciles rows directly, sampling the first non-empty cells per column.
    pub fn reconcile_rows(&self, headers: &[String], rows: &[RawRow]) -> ReconciliationResult {
        let samples = column_samples(rows, headers.len(), self.config.sample_size);
        self.reconcile(headers, &samples)
    }

    /// Scores one column against one field, with an explanation.
    pub fn score_column(
        &self,
        field: CanonicalField,
        header: &str,
        sample: &[CellValue],
    ) -> Option<ColumnScore> {
        let spec = self.catalog.get(field)?;
        Some(self.scorer().score(spec, header, sample))
    }

    fn scorer(&self) -> ColumnScorer<'_> {
        ColumnScorer::new(
            &self.catalog,
            self.config.header_weight,
            self.config.value_weight,
        )
    }

    fn assign(
        &self,
        headers: &[String],
        samples: &[Vec<CellValue>],
        pinned: &BTreeMap<CanonicalField, usize>,
    ) -> ReconciliationResult {
        let eligible = eligible_columns(headers);
        if eligible.is_empty() {
            info!(columns = headers.len(), "no usable input columns");
            return self.empty_result(headers);
        }

        let pinned_columns: BTreeSet<usize> = pinned.values().copied().collect();
        let free_columns: Vec<usize> = eligible
            .iter()
            .copied()
            .filter(|index| !pinned_columns.contains(index))
            .collect();
        let trimmed: Vec<Vec<CellValue>> = (0..headers.len())
            .map(|index| sample_for(samples, index, self.config.sample_size))
            .collect();

        // Score all free (field, column) pairs.
        let scorer = self.scorer();
        let mut scores: Vec<(usize, usize, ColumnScore)> = Vec::new();
        for (field_pos, spec) in self.catalog.fields.iter().enumerate() {
            if pinned.contains_key(&spec.field) {
                continue;
            }
            for &column in &free_columns {
                let score = scorer.score(spec, &headers[column], &trimmed[column]);
                scores.push((field_pos, column, score));
            }
        }

        let mut candidates: Vec<&(usize, usize, ColumnScore)> = scores
            .iter()
            .filter(|(_, _, score)| score.score >= self.config.match_threshold)
            .collect();
        candidates.sort_by(|a, b| {
            b.2.score
                .total_cmp(&a.2.score)
                .then(a.0.cmp(&b.0))
                .then(a.1.cmp(&b.1))
        });

        // Greedy one-to-one assignment.
        let mut assigned_columns = pinned_columns;
        let mut assigned_fields: BTreeMap<usize, (usize, &ColumnScore)> = BTreeMap::new();
        for (field_pos, column, score) in candidates {
            if assigned_columns.contains(column) || assigned_fields.contains_key(field_pos) {
                continue;
            }
            assigned_columns.insert(*column);
            assigned_fields.insert(*field_pos, (*column, score));
            debug!(
                field = %self.catalog.fields[*field_pos].field,
                column = %headers[*column],
                confidence = score.score,
                detail = %score.explain(),
                "mapped column"
            );
        }

        let mut required = Vec::new();
        let mut optional = Vec::new();
        for (field_pos, spec) in self.catalog.fields.iter().enumerate() {
            let mapping = if let Some(&column) = pinned.get(&spec.field) {
                override_mapping(spec, headers, column)
            } else if let Some((column, score)) = assigned_fields.get(&field_pos) {
                FieldMapping {
                    field: spec.field,
                    column: Some(headers[*column].clone()),
                    column_index: Some(*column),
                    confidence: score.score,
                    unit_factor: score.unit_factor,
                    source: MappingSource::Detected,
                    alternatives: Vec::new(),
                }
            } else {
                let alternatives = self.alternatives(field_pos, &scores, &assigned_columns, headers);
                if spec.required {
                    debug!(field = %spec.field, ?alternatives, "required field unmapped");
                }
                FieldMapping {
                    field: spec.field,
                    column: None,
                    column_index: None,
                    confidence: 0.0,
                    unit_factor: 1.0,
                    source: MappingSource::Detected,
                    alternatives,
                }
            };
            if spec.required {
                required.push(mapping);
            } else {
                optional.push(mapping);
            }
        }

        let unmapped_columns: Vec<String> = (0..headers.len())
            .filter(|index| !assigned_columns.contains(index))
            .map(|index| headers[index].clone())
            .collect();

        let missing: Vec<CanonicalField> = required
            .iter()
            .filter(|mapping| !mapping.is_mapped())
            .map(|mapping| mapping.field)
            .collect();
        let (status, mapping_quality) = if missing.is_empty() {
            let quality = if required.is_empty() {
                1.0
            } else {
                required.iter().map(|mapping| mapping.confidence).sum::<f64>()
                    / required.len() as f64
            };
            (ReconciliationStatus::Ready, quality)
        } else {
            (
                ReconciliationStatus::MissingRequired { fields: missing },
                0.0,
            )
        };

        info!(
            status = status.as_str(),
            mapped = assigned_columns.len(),
            unmapped = unmapped_columns.len(),
            mapping_quality,
            "reconciled headers"
        );

        ReconciliationResult {
            status,
            required,
            optional,
            unmapped_columns,
            mapping_quality,
        }
    }

    /// Top unassigned columns for an unmapped field.
    fn alternatives(
        &self,
        field_pos: usize,
        scores: &[(usize, usize, ColumnScore)],
        assigned_columns: &BTreeSet<usize>,
        headers: &[String],
    ) -> Vec<ColumnCandidate> {
        let mut ranked: Vec<(usize, f64)> = scores
            .iter()
            .filter(|(pos, column, score)| {
                *pos == field_pos && !assigned_columns.contains(column) && score.score > 0.0
            })
            .map(|(_, column, score)| (*column, score.score))
            .collect();
        ranked.sort_by(|a, b| match b.1.total_cmp(&a.1) {
            Ordering::Equal => a.0.cmp(&b.0),
            other => other,
        });
        ranked
            .into_iter()
            .take(self.config.max_alternatives)
            .map(|(column, confidence)| ColumnCandidate {
                column: headers[column].clone(),
                confidence,
            })
            .collect()
    }

    fn empty_result(&self, headers: &[String]) -> ReconciliationResult {
        let unmapped = |spec: &FieldSpec| FieldMapping {
            field: spec.field,
            column: None,
            column_index: None,
            confidence: 0.0,
            unit_factor: 1.0,
            source: MappingSource::Detected,
            alternatives: Vec::new(),
        };
        ReconciliationResult {
            status: ReconciliationStatus::NoColumns,
            required: self
                .catalog
                .fields
                .iter()
                .filter(|spec| spec.required)
                .map(unmapped)
                .collect(),
            optional: self
                .catalog
                .fields
                .iter()
                .filter(|spec| !spec.required)
                .map(unmapped)
                .collect(),
            unmapped_columns: headers.to_vec(),
            mapping_quality: 0.0,
        }
    }
}

fn override_mapping(spec: &FieldSpec, headers: &[String], column: usize) -> FieldMapping {
    let unit_factor = HeaderForm::parse(&headers[column])
        .unit
        .and_then(|unit| spec.unit_factor(&unit))
        .unwrap_or(1.0);
    FieldMapping {
        field: spec.field,
        column: Some(headers[column].clone()),
        column_index: Some(column),
        confidence: 1.0,
        unit_factor,
        source: MappingSource::Override,
        alternatives: Vec::new(),
    }
}

/// Indices of headers that may be mapped: non-blank, and the first of any
/// case-insensitive duplicates.
fn eligible_columns(headers: &[String]) -> Vec<usize> {
    let mut seen = BTreeSet::new();
    let mut eligible = Vec::new();
    for (index, header) in headers.iter().enumerate() {
        let key = header_key(header);
        if key.is_empty() {
            continue;
        }
        if seen.insert(key) {
            eligible.push(index);
        } else {
            warn!(column = %header, index, "duplicate header left unmapped");
        }
    }
    eligible
}

fn sample_for(samples: &[Vec<CellValue>], index: usize, limit: usize) -> Vec<CellValue> {
    samples
        .get(index)
        .into_iter()
        .flatten()
        .filter(|cell| !cell.is_empty())
        .take(limit)
        .cloned()
        .collect()
}

/// Collects up to `limit` non-empty cells per column, by position.
pub fn column_samples(rows: &[RawRow], width: usize, limit: usize) -> Vec<Vec<CellValue>> {
    let mut samples = vec![Vec::new(); width];
    for row in rows {
        if samples.iter().all(|sample| sample.len() >= limit) {
            break;
        }
        for (index, sample) in samples.iter_mut().enumerate() {
            if sample.len() >= limit {
                continue;
            }
            if let Some(cell) = row.get(index).filter(|cell| !cell.is_empty()) {
                sample.push(cell.clone());
            }
        }
    }
    samples
}
