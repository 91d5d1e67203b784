//! Column-to-field scoring.
//!
//! A column's score for a field blends two signals:
//! - header similarity against the field's aliases, adjusted by any bracketed
//!   unit in the header
//! - value plausibility, the share of sampled cells that fit the field's
//!   expected range or vocabulary
//!
//! Without sample values the score is header similarity alone.

use rapidfuzz::distance::levenshtein;

use hwo_model::{CellValue, SpectralClass};

use crate::catalog::{FieldCatalog, FieldSpec, ValueKind};
use crate::utils::{HeaderForm, compact, normalize_text};

const SUBSTRING_BASE: f64 = 0.6;
const SUBSTRING_SPAN: f64 = 0.3;
const TOKEN_BASE: f64 = 0.5;
const TOKEN_SPAN: f64 = 0.4;
/// Edit-distance similarity is scaled so it never outranks a structural match.
const EDIT_SCALE: f64 = 0.75;
const UNIT_MATCH_GAIN: f64 = 0.5;
const UNIT_CONFLICT_FACTOR: f64 = 0.5;
/// Purely numeric text is a weak but possible identifier.
const NUMERIC_IDENTIFIER_PLAUSIBILITY: f64 = 0.25;

/// Score for a single column-field pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnScore {
    /// Final confidence in [0, 1].
    pub score: f64,
    /// Header-only similarity in [0, 1].
    pub header: f64,
    /// Share of plausible sample values, `None` without samples.
    pub plausibility: Option<f64>,
    /// Multiplier converting the column's unit into the canonical unit.
    pub unit_factor: f64,
    /// Breakdown of score components for explainability.
    pub explanation: Vec<ScoreComponent>,
}

impl ColumnScore {
    /// Human-readable explanation of the score.
    pub fn explain(&self) -> String {
        self.explanation
            .iter()
            .map(|c| format!("{}: {:.0}%", c.name, c.value * 100.0))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// A component contributing to the final score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreComponent {
    pub name: &'static str,
    pub value: f64,
    pub description: String,
}

/// Scores columns against catalog fields.
#[derive(Debug, Clone)]
pub struct ColumnScorer<'a> {
    catalog: &'a FieldCatalog,
    header_weight: f64,
    value_weight: f64,
}

impl<'a> ColumnScorer<'a> {
    /// Weights are normalized so they sum to one.
    pub fn new(catalog: &'a FieldCatalog, header_weight: f64, value_weight: f64) -> Self {
        let total = header_weight + value_weight;
        let (header_weight, value_weight) = if total > 0.0 {
            (header_weight / total, value_weight / total)
        } else {
            (1.0, 0.0)
        };
        Self {
            catalog,
            header_weight,
            value_weight,
        }
    }

    pub fn score(&self, spec: &FieldSpec, header: &str, sample: &[CellValue]) -> ColumnScore {
        let form = HeaderForm::parse(header);
        let mut explanation = Vec::new();

        let (alias_score, alias) = best_alias(&form, spec);
        explanation.push(ScoreComponent {
            name: "Header similarity",
            value: alias_score,
            description: format!("'{header}' vs alias '{alias}'"),
        });

        let mut header_score = alias_score;
        let mut unit_factor = 1.0;
        if let Some(unit) = form.unit.as_deref() {
            if let Some(factor) = spec.unit_factor(unit) {
                unit_factor = factor;
                let gain = (1.0 - header_score) * UNIT_MATCH_GAIN;
                header_score += gain;
                explanation.push(ScoreComponent {
                    name: "Unit match",
                    value: gain,
                    description: format!("unit '{unit}' belongs to {}", spec.field),
                });
            } else if self.catalog.is_known_unit(unit) {
                let loss = header_score * (1.0 - UNIT_CONFLICT_FACTOR);
                header_score -= loss;
                explanation.push(ScoreComponent {
                    name: "Unit conflict",
                    value: -loss,
                    description: format!("unit '{unit}' belongs to another field"),
                });
            }
        }

        let plausibility = value_plausibility(&spec.value, sample, unit_factor);
        let score = match plausibility {
            Some(plausible) => {
                explanation.push(ScoreComponent {
                    name: "Value plausibility",
                    value: plausible,
                    description: format!("{} sampled values", non_empty(sample).count()),
                });
                self.header_weight * header_score + self.value_weight * plausible
            }
            None => header_score,
        };

        ColumnScore {
            score: score.clamp(0.0, 1.0),
            header: header_score.clamp(0.0, 1.0),
            plausibility,
            unit_factor,
            explanation,
        }
    }
}

/// Best similarity of a header against any alias of the field.
fn best_alias<'s>(form: &HeaderForm, spec: &'s FieldSpec) -> (f64, &'s str) {
    let mut best = (0.0, spec.field.as_str());
    for alias in &spec.aliases {
        let normalized = normalize_text(alias);
        let similarity = form
            .variants()
            .into_iter()
            .map(|variant| alias_similarity(variant, &normalized))
            .fold(0.0, f64::max);
        if similarity > best.0 {
            best = (similarity, alias.as_str());
        }
        if best.0 >= 1.0 {
            break;
        }
    }
    best
}

/// Similarity of two normalized names.
///
/// Exact matches ignoring separators score 1.0; token overlap and containment
/// score partial credit; anything else falls back to edit distance.
pub fn alias_similarity(header: &str, alias: &str) -> f64 {
    let header_compact = compact(header);
    let alias_compact = compact(alias);
    if header_compact.is_empty() || alias_compact.is_empty() {
        return 0.0;
    }
    if header_compact == alias_compact {
        return 1.0;
    }

    let mut best = EDIT_SCALE
        * levenshtein::normalized_similarity(header_compact.chars(), alias_compact.chars());

    let header_tokens: Vec<&str> = header.split_whitespace().collect();
    let alias_tokens: Vec<&str> = alias.split_whitespace().collect();
    let shared = header_tokens
        .iter()
        .filter(|token| alias_tokens.contains(token))
        .count();
    if shared > 0 {
        let union = header_tokens.len() + alias_tokens.len() - shared;
        let jaccard = shared as f64 / union as f64;
        best = best.max(TOKEN_BASE + TOKEN_SPAN * jaccard);
    }

    let (short, long) = if header_compact.len() <= alias_compact.len() {
        (&header_compact, &alias_compact)
    } else {
        (&alias_compact, &header_compact)
    };
    if short.len() >= 2 && long.contains(short.as_str()) {
        let ratio = short.len() as f64 / long.len() as f64;
        best = best.max(SUBSTRING_BASE + SUBSTRING_SPAN * ratio);
    }

    best.min(1.0)
}

fn non_empty(sample: &[CellValue]) -> impl Iterator<Item = &CellValue> {
    sample.iter().filter(|cell| !cell.is_empty())
}

/// Share of non-empty sample cells that fit the expected value shape.
///
/// `None` when the sample has no non-empty cells.
pub fn value_plausibility(kind: &ValueKind, sample: &[CellValue], unit_factor: f64) -> Option<f64> {
    let cells: Vec<&CellValue> = non_empty(sample).collect();
    if cells.is_empty() {
        return None;
    }
    let total: f64 = cells.iter().map(|cell| cell_plausibility(kind, cell, unit_factor)).sum();
    Some(total / cells.len() as f64)
}

fn cell_plausibility(kind: &ValueKind, cell: &CellValue, unit_factor: f64) -> f64 {
    let fits = match kind {
        ValueKind::Text => {
            return if cell.as_number().is_ok_and(|value| value.is_some()) {
                NUMERIC_IDENTIFIER_PLAUSIBILITY
            } else {
                1.0
            };
        }
        ValueKind::Number { min, max } => cell
            .as_number()
            .ok()
            .flatten()
            .map(|value| value * unit_factor)
            .is_some_and(|value| (*min..=*max).contains(&value)),
        ValueKind::Integer { min, max } => cell
            .as_integer()
            .ok()
            .flatten()
            .is_some_and(|value| (*min..=*max).contains(&value)),
        ValueKind::Category { vocabulary } => cell.as_text().is_some_and(|text| {
            let lower = text.to_lowercase();
            vocabulary.iter().any(|term| lower.contains(term.as_str()))
        }),
        ValueKind::SpectralType => cell.as_text().is_some_and(|text| {
            cell.as_number().is_err() && SpectralClass::from_spectral_type(&text).is_some()
        }),
    };
    if fits { 1.0 } else { 0.0 }
}
