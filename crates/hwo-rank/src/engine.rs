//! Composite ranking.
//!
//! Each record's composite is a weighted sum of components on a 0-100 scale.
//! Weights are normalized over the components in play, so the composite stays
//! within [0, 100] whether or not a sequence is supplied.

use std::cmp::Ordering;

use hwo_model::{HabitabilityClass, PriorityTier, ScoredRecord, TargetId};
use hwo_sequence::SequenceResult;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span};

use crate::config::RankingConfig;
use crate::error::RankingConfigError;

/// Composites are stored at this resolution so equal inputs tie exactly.
const COMPOSITE_SCALE: f64 = 1e6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankComponent {
    Characterizability,
    Confidence,
    TierPoints,
    SequencePosition,
}

impl RankComponent {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankComponent::Characterizability => "characterizability",
            RankComponent::Confidence => "confidence",
            RankComponent::TierPoints => "tier_points",
            RankComponent::SequencePosition => "sequence_position",
        }
    }
}

impl std::fmt::Display for RankComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How one component contributed to a composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentContribution {
    pub component: RankComponent,
    /// Component value on a 0-100 scale.
    pub raw: f64,
    /// Weight after normalization over the components in play.
    pub weight: f64,
    /// `raw × weight`.
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTarget {
    /// 1-based.
    pub rank: usize,
    pub id: TargetId,
    pub composite: f64,
    pub characterizability_score: f64,
    pub habitability_score: f64,
    pub confidence: f64,
    pub tier: PriorityTier,
    pub habitability_class: HabitabilityClass,
    /// Zero-based position in the supplied sequence, if the target was sequenced.
    pub sequence_position: Option<usize>,
    pub components: Vec<ComponentContribution>,
}

impl RankedTarget {
    pub fn component(&self, component: RankComponent) -> Option<&ComponentContribution> {
        self.components.iter().find(|c| c.component == component)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingResult {
    pub entries: Vec<RankedTarget>,
    /// Whether sequence position took part in the composite.
    pub used_sequence: bool,
}

impl RankingResult {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &TargetId) -> Option<&RankedTarget> {
        self.entries.iter().find(|entry| &entry.id == id)
    }

    pub fn top(&self, n: usize) -> &[RankedTarget] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn ids(&self) -> Vec<&TargetId> {
        self.entries.iter().map(|entry| &entry.id).collect()
    }
}

/// Fuses scores, tier and optional sequence position into one ranking.
#[derive(Debug, Clone, Default)]
pub struct Ranker {
    config: RankingConfig,
}

impl Ranker {
    pub fn new(config: RankingConfig) -> Result<Self, RankingConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Ranks `records` by composite descending, then habitability descending,
    /// then identifier ascending.
    ///
    /// With a sequence, earlier positions earn more: position `p` of `n`
    /// scores `100 × (n − p) / n`; targets absent from the sequence score 0.
    pub fn rank(
        &self,
        records: &[ScoredRecord],
        sequence: Option<&SequenceResult>,
    ) -> RankingResult {
        let _span = info_span!(
            "rank",
            records = records.len(),
            with_sequence = sequence.is_some()
        )
        .entered();

        let weights = self.normalized_weights(sequence.is_some());
        let mut entries: Vec<RankedTarget> = records
            .iter()
            .map(|record| self.evaluate(record, &weights, sequence))
            .collect();
        entries.sort_by(compare_entries);
        for (index, entry) in entries.iter_mut().enumerate() {
            entry.rank = index + 1;
        }

        if let Some(first) = entries.first() {
            info!(
                ranked = entries.len(),
                top = %first.id,
                top_composite = first.composite,
                "ranking complete"
            );
        }
        RankingResult {
            entries,
            used_sequence: sequence.is_some(),
        }
    }

    fn normalized_weights(&self, with_sequence: bool) -> Vec<(RankComponent, f64)> {
        let w = &self.config.weights;
        let mut weights = vec![
            (RankComponent::Characterizability, w.characterizability),
            (RankComponent::Confidence, w.confidence),
            (RankComponent::TierPoints, w.tier),
        ];
        if with_sequence {
            weights.push((RankComponent::SequencePosition, w.sequence));
        }
        let total: f64 = weights.iter().map(|(_, weight)| weight).sum();
        weights
            .into_iter()
            .map(|(component, weight)| (component, weight / total))
            .collect()
    }

    fn evaluate(
        &self,
        record: &ScoredRecord,
        weights: &[(RankComponent, f64)],
        sequence: Option<&SequenceResult>,
    ) -> RankedTarget {
        let sequence_position = sequence.and_then(|s| s.position(record.id()));
        let components: Vec<ComponentContribution> = weights
            .iter()
            .map(|&(component, weight)| {
                let raw = match component {
                    RankComponent::Characterizability => record.characterizability_score,
                    RankComponent::Confidence => record.confidence,
                    RankComponent::TierPoints => self.config.tier_points.points(record.tier),
                    RankComponent::SequencePosition => match (sequence, sequence_position) {
                        (Some(s), Some(position)) => {
                            let n = s.len() as f64;
                            100.0 * (n - position as f64) / n
                        }
                        _ => 0.0,
                    },
                };
                ComponentContribution {
                    component,
                    raw,
                    weight,
                    contribution: raw * weight,
                }
            })
            .collect();
        let sum: f64 = components.iter().map(|c| c.contribution).sum();
        let composite = (sum * COMPOSITE_SCALE).round() / COMPOSITE_SCALE;
        debug!(id = %record.id(), composite, "ranked record");

        RankedTarget {
            rank: 0,
            id: record.id().clone(),
            composite,
            characterizability_score: record.characterizability_score,
            habitability_score: record.habitability_score,
            confidence: record.confidence,
            tier: record.tier,
            habitability_class: record.habitability_class,
            sequence_position,
            components,
        }
    }
}

fn compare_entries(a: &RankedTarget, b: &RankedTarget) -> Ordering {
    b.composite
        .total_cmp(&a.composite)
        .then_with(|| b.habitability_score.total_cmp(&a.habitability_score))
        .then_with(|| a.id.cmp(&b.id))
}

/// Ranks with the default weights.
pub fn rank(records: &[ScoredRecord], sequence: Option<&SequenceResult>) -> RankingResult {
    Ranker::default().rank(records, sequence)
}
