use std::collections::BTreeMap;

use hwo_model::CanonicalField;
use serde::{Deserialize, Serialize};

use crate::error::MappingError;

/// Tunables for reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Weight of header similarity in the combined score.
    pub header_weight: f64,
    /// Weight of value plausibility in the combined score.
    pub value_weight: f64,
    /// Minimum combined score for a column to be mapped.
    pub match_threshold: f64,
    /// Alternatives suggested for a field that found no match.
    pub max_alternatives: usize,
    /// Non-empty cells per column sampled for plausibility checks.
    pub sample_size: usize,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            header_weight: 0.7,
            value_weight: 0.3,
            match_threshold: 0.7,
            max_alternatives: 3,
            sample_size: 5,
        }
    }
}

/// How a mapping was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingSource {
    Detected,
    Override,
}

/// A candidate column for a field that was not mapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnCandidate {
    pub column: String,
    pub confidence: f64,
}

/// The outcome for one canonical field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub field: CanonicalField,
    /// Matched input header, `None` when nothing cleared the threshold.
    pub column: Option<String>,
    /// Position of the matched header in the input.
    pub column_index: Option<usize>,
    /// Confidence in [0, 1]; 0 when unmapped.
    pub confidence: f64,
    /// Multiplier into the canonical unit, from the header's unit annotation.
    pub unit_factor: f64,
    pub source: MappingSource,
    /// Best remaining columns when unmapped, most likely first.
    pub alternatives: Vec<ColumnCandidate>,
}

impl FieldMapping {
    pub fn is_mapped(&self) -> bool {
        self.column.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReconciliationStatus {
    /// Every required field is mapped.
    Ready,
    /// At least one required field is unmapped.
    MissingRequired { fields: Vec<CanonicalField> },
    /// The input had no columns.
    NoColumns,
}

impl ReconciliationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ready => "valid",
            Self::MissingRequired { .. } => "missing_required_fields",
            Self::NoColumns => "no_columns",
        }
    }
}

/// Result of reconciling one set of headers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    pub status: ReconciliationStatus,
    /// One entry per required field, in catalog order.
    pub required: Vec<FieldMapping>,
    /// One entry per optional field, in catalog order.
    pub optional: Vec<FieldMapping>,
    /// Input headers no field claimed, in input order.
    pub unmapped_columns: Vec<String>,
    /// Mean confidence of required mappings; 0 when any is missing.
    pub mapping_quality: f64,
}

impl ReconciliationResult {
    pub fn can_proceed(&self) -> bool {
        matches!(self.status, ReconciliationStatus::Ready)
    }

    pub fn mappings(&self) -> impl Iterator<Item = &FieldMapping> {
        self.required.iter().chain(self.optional.iter())
    }

    pub fn mapping(&self, field: CanonicalField) -> Option<&FieldMapping> {
        self.mappings().find(|mapping| mapping.field == field)
    }

    /// Header mapped to a field, if any.
    pub fn column_for(&self, field: CanonicalField) -> Option<&str> {
        self.mapping(field)?.column.as_deref()
    }

    pub fn missing_required(&self) -> Vec<CanonicalField> {
        self.required
            .iter()
            .filter(|mapping| !mapping.is_mapped())
            .map(|mapping| mapping.field)
            .collect()
    }

    pub fn missing_optional(&self) -> Vec<CanonicalField> {
        self.optional
            .iter()
            .filter(|mapping| !mapping.is_mapped())
            .map(|mapping| mapping.field)
            .collect()
    }

    /// The mapping in the shape record conversion needs.
    ///
    /// Fails when the reconciliation cannot proceed.
    pub fn column_mapping(&self) -> Result<ColumnMapping, MappingError> {
        match &self.status {
            ReconciliationStatus::Ready => {}
            ReconciliationStatus::NoColumns => return Err(MappingError::NoColumns),
            ReconciliationStatus::MissingRequired { fields } => {
                let suggestions = self
                    .required
                    .iter()
                    .filter(|mapping| fields.contains(&mapping.field))
                    .map(|mapping| {
                        let columns = mapping
                            .alternatives
                            .iter()
                            .map(|candidate| candidate.column.clone())
                            .collect();
                        (mapping.field, columns)
                    })
                    .collect();
                return Err(MappingError::MissingRequired {
                    fields: fields.clone(),
                    suggestions,
                });
            }
        }
        let columns = self
            .mappings()
            .filter_map(|mapping| {
                let index = mapping.column_index?;
                let header = mapping.column.clone()?;
                Some((
                    mapping.field,
                    MappedColumn {
                        index,
                        header,
                        unit_factor: mapping.unit_factor,
                    },
                ))
            })
            .collect();
        Ok(ColumnMapping { columns })
    }
}

/// Where a canonical field's values live in the input rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappedColumn {
    pub index: usize,
    pub header: String,
    pub unit_factor: f64,
}

/// Field to column assignments for a reconciled input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub columns: BTreeMap<CanonicalField, MappedColumn>,
}

impl ColumnMapping {
    pub fn get(&self, field: CanonicalField) -> Option<&MappedColumn> {
        self.columns.get(&field)
    }
}
