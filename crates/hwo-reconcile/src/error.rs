//! Error types for reconciliation.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use hwo_model::CanonicalField;
use serde::Serialize;

/// Errors from turning a reconciliation into a usable column mapping.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MappingError {
    /// The input has no columns at all.
    NoColumns,
    /// Required fields found no column above the match threshold.
    MissingRequired {
        fields: Vec<CanonicalField>,
        /// Best candidate column names per missing field, most likely first.
        suggestions: BTreeMap<CanonicalField, Vec<String>>,
    },
    /// An override names a column that is not in the input.
    OverrideColumnNotFound {
        field: CanonicalField,
        column: String,
    },
    /// Two overrides point at the same column.
    DuplicateOverrideColumn {
        column: String,
        first: CanonicalField,
        second: CanonicalField,
    },
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoColumns => write!(f, "Input has no columns"),
            Self::MissingRequired {
                fields,
                suggestions,
            } => {
                let names: Vec<&str> = fields.iter().map(CanonicalField::as_str).collect();
                write!(f, "Missing required fields: {}", names.join(", "))?;
                for field in fields {
                    if let Some(candidates) = suggestions.get(field).filter(|c| !c.is_empty()) {
                        write!(f, "; {field} could be {}", candidates.join(" / "))?;
                    }
                }
                Ok(())
            }
            Self::OverrideColumnNotFound { field, column } => {
                write!(f, "Override for {field} names unknown column '{column}'")
            }
            Self::DuplicateOverrideColumn {
                column,
                first,
                second,
            } => write!(
                f,
                "Column '{column}' is overridden for both {first} and {second}"
            ),
        }
    }
}

impl std::error::Error for MappingError {}

/// Errors from loading or validating a field catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("catalog lists {0} more than once")]
    DuplicateField(CanonicalField),
    #[error("catalog entry for {0} has no aliases")]
    EmptyAliases(CanonicalField),
    #[error("catalog entry for {0} has an empty or inverted value range")]
    InvalidValueKind(CanonicalField),
    #[error("catalog entry for {0} has a non-positive unit factor")]
    InvalidUnitFactor(CanonicalField),
    #[error("catalog must contain a required identifier field")]
    MissingIdentifier,
}
