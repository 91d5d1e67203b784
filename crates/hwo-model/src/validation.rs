//! Per-record validation errors.

use serde::{Deserialize, Serialize};

use crate::{CanonicalField, TargetId};

/// What was wrong with a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationErrorKind {
    #[error("is not a number")]
    NotNumeric,
    #[error("is not a whole number")]
    NotInteger,
    #[error("is not finite")]
    NotFinite,
    #[error("must be greater than zero")]
    NotPositive,
    #[error("must lie in [{min}, {max})")]
    OutOfRange { min: f64, max: f64 },
    #[error("is not a recognized category")]
    UnknownCategory,
    #[error("is missing")]
    MissingIdentifier,
    #[error("duplicates an earlier record")]
    DuplicateIdentifier,
}

/// A record rejected because one of its values fails a type or domain check.
///
/// Only the offending record is rejected; batch operations keep going.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("{}: {field} {kind} (value: '{value}')", subject_label(.record_id, .row))]
pub struct ValidationError {
    /// Identifier of the record, when the row had one.
    pub record_id: Option<TargetId>,
    /// Zero-based input row, when the record came from a table.
    pub row: Option<usize>,
    pub field: CanonicalField,
    /// Offending value as supplied.
    pub value: String,
    pub kind: ValidationErrorKind,
}

impl ValidationError {
    pub fn new(
        record_id: Option<TargetId>,
        field: CanonicalField,
        value: impl Into<String>,
        kind: ValidationErrorKind,
    ) -> Self {
        Self {
            record_id,
            row: None,
            field,
            value: value.into(),
            kind,
        }
    }

    pub fn at_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    /// Label used in messages: the identifier, or the row number.
    pub fn subject(&self) -> String {
        subject_label(&self.record_id, &self.row)
    }
}

fn subject_label(record_id: &Option<TargetId>, row: &Option<usize>) -> String {
    match (record_id, row) {
        (Some(id), _) => id.to_string(),
        (None, Some(row)) => format!("row {}", row + 1),
        (None, None) => "<unidentified record>".to_string(),
    }
}
