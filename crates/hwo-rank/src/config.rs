use hwo_model::PriorityTier;
use serde::{Deserialize, Serialize};

use crate::error::RankingConfigError;

/// Raw component weights. They are normalized over the components in play,
/// so the sequence weight only matters when a sequence is supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingWeights {
    pub characterizability: f64,
    pub confidence: f64,
    pub tier: f64,
    pub sequence: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            characterizability: 0.40,
            confidence: 0.35,
            tier: 0.20,
            sequence: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierPoints {
    pub high: f64,
    pub medium: f64,
    pub low: f64,
}

impl Default for TierPoints {
    fn default() -> Self {
        Self {
            high: 25.0,
            medium: 15.0,
            low: 5.0,
        }
    }
}

impl TierPoints {
    pub fn points(&self, tier: PriorityTier) -> f64 {
        match tier {
            PriorityTier::High => self.high,
            PriorityTier::Medium => self.medium,
            PriorityTier::Low => self.low,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub weights: RankingWeights,
    pub tier_points: TierPoints,
}

impl RankingConfig {
    pub fn validate(&self) -> Result<(), RankingConfigError> {
        let w = &self.weights;
        for (name, value) in [
            ("characterizability", w.characterizability),
            ("confidence", w.confidence),
            ("tier", w.tier),
            ("sequence", w.sequence),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(RankingConfigError::InvalidWeight { name, value });
            }
        }
        if w.characterizability + w.confidence + w.tier <= 0.0 {
            return Err(RankingConfigError::ZeroWeights);
        }
        let p = &self.tier_points;
        for (tier, value) in [("High", p.high), ("Medium", p.medium), ("Low", p.low)] {
            if !(0.0..=100.0).contains(&value) {
                return Err(RankingConfigError::InvalidTierPoints { tier, value });
            }
        }
        Ok(())
    }
}
