//! Schema reconciliation for exoplanet target tables.
//!
//! Maps arbitrary input headers onto the canonical field catalog using header
//! similarity and sample-value plausibility, then converts mapped rows into
//! [`hwo_model::CanonicalRecord`]s.

#![deny(unsafe_code)]

pub mod catalog;
mod engine;
pub mod error;
pub mod records;
pub mod score;
mod types;
pub mod utils;

pub use catalog::{FieldCatalog, FieldSpec, UnitSpec, ValueKind};
pub use engine::{ReconcileEngine, column_samples};
pub use error::{CatalogError, MappingError};
pub use records::{RecordBatch, build_records};
pub use score::{ColumnScore, ScoreComponent};
pub use types::{
    ColumnCandidate, ColumnMapping, FieldMapping, MappedColumn, MappingSource, ReconcileConfig,
    ReconciliationResult, ReconciliationStatus,
};
