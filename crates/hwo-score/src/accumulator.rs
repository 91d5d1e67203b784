//! Weighted averaging over the factors that are actually present.

use hwo_model::{FactorScore, ScoreFactor};

/// Accumulates `(weighted_sum, weight_sum)` so absent factors drop out and the
/// remaining weights renormalize.
#[derive(Debug, Clone, Default)]
pub struct WeightedAccumulator {
    weighted_sum: f64,
    weight_sum: f64,
    factors: Vec<FactorScore>,
}

impl WeightedAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a factor if it has a value. Zero-weight factors are recorded but
    /// do not move the mean.
    pub fn add(&mut self, factor: ScoreFactor, value: Option<f64>, weight: f64) {
        let Some(value) = value else {
            return;
        };
        let value = value.clamp(0.0, 1.0);
        self.weighted_sum += weight * value;
        self.weight_sum += weight;
        self.factors.push(FactorScore {
            factor,
            value,
            weight,
        });
    }

    /// Weighted mean in [0, 1]; `None` when nothing with weight contributed.
    pub fn mean(&self) -> Option<f64> {
        (self.weight_sum > 0.0).then(|| (self.weighted_sum / self.weight_sum).clamp(0.0, 1.0))
    }

    /// Weighted mean scaled to [0, 100] and rounded to a whole number.
    pub fn score(&self) -> Option<f64> {
        self.mean().map(|mean| (mean * 100.0).round())
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    pub fn into_factors(self) -> Vec<FactorScore> {
        self.factors
    }
}
