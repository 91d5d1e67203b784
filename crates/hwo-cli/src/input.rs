//! CSV input and argument parsing.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use csv::ReaderBuilder;
use hwo_core::model::{CanonicalField, CellValue, RawRow, TargetId};
use hwo_core::sequence::TimeWindow;

#[derive(Debug, Clone, Default)]
pub struct InputTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

fn normalize_header(raw: &str) -> String {
    raw.trim()
        .trim_matches('\u{feff}')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Reads a CSV table. The first non-blank line is the header; `#` lines are
/// comments, as in archive exports.
pub fn read_table(path: &Path) -> Result<InputTable> {
    let file = std::fs::File::open(path).with_context(|| format!("open {}", path.display()))?;
    read_table_from(file).with_context(|| format!("read csv: {}", path.display()))
}

pub fn read_table_from<R: Read>(reader: R) -> Result<InputTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut lines = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("record {}", index + 1))?;
        let cells: Vec<String> = record.iter().map(normalize_cell).collect();
        if cells.iter().all(String::is_empty) {
            continue;
        }
        lines.push(cells);
    }
    let mut lines = lines.into_iter();
    let Some(header_line) = lines.next() else {
        return Ok(InputTable::default());
    };
    let headers: Vec<String> = header_line.iter().map(|h| normalize_header(h)).collect();
    let rows = lines
        .map(|cells| {
            let values = cells.into_iter().map(CellValue::from_text).collect();
            RawRow::from_values(&headers, values)
        })
        .collect();
    Ok(InputTable { headers, rows })
}

/// Parses `FIELD=COLUMN` for `--map`.
pub fn parse_override(raw: &str) -> std::result::Result<(CanonicalField, String), String> {
    let (field, column) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=COLUMN, got '{raw}'"))?;
    let field: CanonicalField = field
        .trim()
        .parse()
        .map_err(|err| format!("{err}"))?;
    let column = column.trim().trim_matches('"').to_string();
    if column.is_empty() {
        return Err(format!("no column given for {field}"));
    }
    Ok((field, column))
}

/// Collects `--map` pairs, rejecting a field given twice.
pub fn override_map(
    pairs: &[(CanonicalField, String)],
) -> Result<BTreeMap<CanonicalField, String>> {
    let mut map = BTreeMap::new();
    for (field, column) in pairs {
        if let Some(previous) = map.insert(*field, column.clone()) {
            bail!("{field} is mapped twice ('{previous}' and '{column}')");
        }
    }
    Ok(map)
}

/// Reads observation windows from a CSV with `id,earliest,latest` columns.
pub fn read_windows(path: &Path) -> Result<BTreeMap<TargetId, TimeWindow>> {
    let file = std::fs::File::open(path).with_context(|| format!("open {}", path.display()))?;
    read_windows_from(file).with_context(|| format!("read windows: {}", path.display()))
}

pub fn read_windows_from<R: Read>(reader: R) -> Result<BTreeMap<TargetId, TimeWindow>> {
    let mut reader = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);
    let headers = reader.headers().context("window header")?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .with_context(|| format!("missing '{name}' column"))
    };
    let (id_col, earliest_col, latest_col) = (column("id")?, column("earliest")?, column("latest")?);

    let mut windows = BTreeMap::new();
    for (index, record) in reader.records().enumerate() {
        let line = index + 2;
        let record = record.with_context(|| format!("line {line}"))?;
        let field = |col: usize| record.get(col).unwrap_or_default();
        let id = TargetId::new(field(id_col)).with_context(|| format!("line {line}"))?;
        let earliest: usize = field(earliest_col)
            .parse()
            .with_context(|| format!("line {line}: earliest"))?;
        let latest: usize = field(latest_col)
            .parse()
            .with_context(|| format!("line {line}: latest"))?;
        if windows
            .insert(id.clone(), TimeWindow::new(earliest, latest))
            .is_some()
        {
            bail!("line {line}: window for {id} given twice");
        }
    }
    Ok(windows)
}
