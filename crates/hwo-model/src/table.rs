#![deny(unsafe_code)]

use crate::ModelError;

/// Tokens treated as an empty cell regardless of case.
const MISSING_TOKENS: &[&str] = &["", "na", "n/a", "nan", "null", "none", "-", "--"];

/// An untyped cell value as supplied by the caller.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

impl CellValue {
    /// Builds a cell from raw text, mapping blank and placeholder tokens to `Empty`.
    pub fn from_text(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if is_missing_token(&raw) {
            Self::Empty
        } else {
            Self::Text(raw)
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(text) => is_missing_token(text),
            Self::Number(value) => value.is_nan(),
        }
    }

    /// Returns the cell as text, `None` when empty.
    pub fn as_text(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        match self {
            Self::Text(text) => Some(text.trim().to_string()),
            Self::Number(value) => Some(value.to_string()),
            Self::Empty => None,
        }
    }

    /// Parses the cell as a number.
    ///
    /// Empty cells are `Ok(None)`; text that does not parse is an error.
    pub fn as_number(&self) -> Result<Option<f64>, ModelError> {
        if self.is_empty() {
            return Ok(None);
        }
        match self {
            Self::Number(value) => Ok(Some(*value)),
            Self::Text(text) => text
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| ModelError::NotNumeric(text.clone())),
            Self::Empty => Ok(None),
        }
    }

    /// Parses the cell as a whole number; accepts `2019.0` but not `2019.5`.
    pub fn as_integer(&self) -> Result<Option<i64>, ModelError> {
        let Some(value) = self.as_number()? else {
            return Ok(None);
        };
        if value.fract() != 0.0 || !value.is_finite() {
            return Err(ModelError::NotInteger(self.to_string()));
        }
        Ok(Some(value as i64))
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(value) => write!(f, "{value}"),
            Self::Empty => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::from_text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

fn is_missing_token(raw: &str) -> bool {
    let trimmed = raw.trim();
    MISSING_TOKENS
        .iter()
        .any(|token| trimmed.eq_ignore_ascii_case(token))
}

/// One input row: column names in input order paired with their cells.
///
/// Duplicate column names are allowed; lookups by position are exact, lookups
/// by name return the first case-insensitive match.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RawRow {
    cells: Vec<(String, CellValue)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pairs headers with values by position. Missing trailing values become `Empty`.
    pub fn from_values(headers: &[String], values: Vec<CellValue>) -> Self {
        let mut values = values.into_iter();
        let cells = headers
            .iter()
            .map(|header| (header.clone(), values.next().unwrap_or(CellValue::Empty)))
            .collect();
        Self { cells }
    }

    pub fn push(&mut self, column: impl Into<String>, value: CellValue) {
        self.cells.push((column.into(), value));
    }

    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index).map(|(_, value)| value)
    }

    pub fn get_by_name(&self, column: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(name, _)| name.trim().eq_ignore_ascii_case(column.trim()))
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
