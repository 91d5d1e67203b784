//! Conversion of mapped rows into canonical records.
//!
//! Only type conversion happens here: numbers must parse, categories must be
//! recognized, identifiers must be present and unique. Physical domain checks
//! belong to scoring.

use std::collections::BTreeSet;

use hwo_model::{
    CanonicalField, CanonicalRecord, CellValue, DataQuality, DetectionMethod, ModelError, RawRow,
    TargetId, ValidationError, ValidationErrorKind,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::types::ColumnMapping;

/// Records that converted cleanly, plus one error per rejected row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecordBatch {
    pub records: Vec<CanonicalRecord>,
    pub errors: Vec<ValidationError>,
}

/// Builds canonical records from rows using a column mapping.
///
/// A row that fails conversion is rejected with a [`ValidationError`]; the
/// remaining rows are still converted.
pub fn build_records(mapping: &ColumnMapping, rows: &[RawRow]) -> RecordBatch {
    let mut batch = RecordBatch::default();
    let mut seen = BTreeSet::new();
    for (row_index, row) in rows.iter().enumerate() {
        match convert_row(mapping, row) {
            Ok(record) => {
                if !seen.insert(record.id.clone()) {
                    let err = ValidationError::new(
                        Some(record.id.clone()),
                        CanonicalField::Identifier,
                        record.id.as_str(),
                        ValidationErrorKind::DuplicateIdentifier,
                    )
                    .at_row(row_index);
                    warn!(row = row_index, id = %record.id, "duplicate identifier rejected");
                    batch.errors.push(err);
                    continue;
                }
                batch.records.push(record);
            }
            Err(err) => {
                let err = err.at_row(row_index);
                warn!(row = row_index, error = %err, "row rejected");
                batch.errors.push(err);
            }
        }
    }
    debug!(
        converted = batch.records.len(),
        rejected = batch.errors.len(),
        "converted rows"
    );
    batch
}

fn convert_row(mapping: &ColumnMapping, row: &RawRow) -> Result<CanonicalRecord, ValidationError> {
    let cell = |field: CanonicalField| {
        mapping
            .get(field)
            .and_then(|column| row.get(column.index).map(|cell| (cell, column.unit_factor)))
    };

    let id_text = cell(CanonicalField::Identifier).and_then(|(value, _)| value.as_text());
    let id = id_text
        .as_deref()
        .and_then(|text| TargetId::new(text).ok())
        .ok_or_else(|| {
            ValidationError::new(
                None,
                CanonicalField::Identifier,
                id_text.clone().unwrap_or_default(),
                ValidationErrorKind::MissingIdentifier,
            )
        })?;
    let mut record = CanonicalRecord::new(id);

    for field in CanonicalField::ALL {
        let Some((value, unit_factor)) = cell(field) else {
            continue;
        };
        match field {
            CanonicalField::Identifier => {}
            CanonicalField::DataQuality => {
                if let Some(text) = value.as_text() {
                    let quality = text.parse::<DataQuality>().map_err(|_| {
                        reject(&record, field, value, ValidationErrorKind::UnknownCategory)
                    })?;
                    record.data_quality = Some(quality);
                }
            }
            CanonicalField::DetectionMethod => {
                record.detection_method =
                    value.as_text().map(|text| DetectionMethod::parse_lenient(&text));
            }
            CanonicalField::SpectralType => {
                record.spectral_type = value.as_text();
            }
            CanonicalField::DiscoveryYear => {
                let year = value.as_integer().map_err(|err| {
                    reject(&record, field, value, conversion_kind(&err))
                })?;
                let year = year
                    .map(i32::try_from)
                    .transpose()
                    .map_err(|_| reject(&record, field, value, ValidationErrorKind::NotInteger))?;
                record.discovery_year = year;
            }
            numeric => {
                let number = value
                    .as_number()
                    .map_err(|err| reject(&record, numeric, value, conversion_kind(&err)))?;
                record.set_numeric(numeric, number.map(|n| n * unit_factor));
            }
        }
    }
    Ok(record)
}

fn reject(
    record: &CanonicalRecord,
    field: CanonicalField,
    value: &CellValue,
    kind: ValidationErrorKind,
) -> ValidationError {
    ValidationError::new(Some(record.id.clone()), field, value.to_string(), kind)
}

fn conversion_kind(err: &ModelError) -> ValidationErrorKind {
    match err {
        ModelError::NotInteger(_) => ValidationErrorKind::NotInteger,
        _ => ValidationErrorKind::NotNumeric,
    }
}
