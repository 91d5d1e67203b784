//! Transition costs between targets.

use hwo_model::ScoredRecord;
use serde::{Deserialize, Serialize};

use crate::error::OptimizerInputError;

/// Cost of observing `to` right after `from`.
///
/// Implemented for any `Fn(&ScoredRecord, &ScoredRecord) -> f64`.
pub trait TransitionCost {
    fn cost(&self, from: &ScoredRecord, to: &ScoredRecord) -> f64;
}

impl<F> TransitionCost for F
where
    F: Fn(&ScoredRecord, &ScoredRecord) -> f64,
{
    fn cost(&self, from: &ScoredRecord, to: &ScoredRecord) -> f64 {
        self(from, to)
    }
}

/// Slew time model: fixed overhead plus a rate per degree of angular
/// separation. Pairs where either target lacks coordinates cost a fixed
/// penalty instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlewCostModel {
    /// Settling and acquisition time per target, in minutes.
    pub overhead: f64,
    /// Minutes per degree slewed.
    pub slew_per_degree: f64,
    /// Cost used when a position is unknown.
    pub missing_position_penalty: f64,
}

impl Default for SlewCostModel {
    fn default() -> Self {
        Self {
            overhead: 10.0,
            slew_per_degree: 0.5,
            missing_position_penalty: 100.0,
        }
    }
}

impl SlewCostModel {
    pub fn with_overhead(mut self, overhead: f64) -> Self {
        self.overhead = overhead;
        self
    }

    pub fn with_slew_per_degree(mut self, rate: f64) -> Self {
        self.slew_per_degree = rate;
        self
    }

    pub fn with_missing_position_penalty(mut self, penalty: f64) -> Self {
        self.missing_position_penalty = penalty;
        self
    }
}

impl TransitionCost for SlewCostModel {
    fn cost(&self, from: &ScoredRecord, to: &ScoredRecord) -> f64 {
        let a = &from.record;
        let b = &to.record;
        match (a.ra_deg, a.dec_deg, b.ra_deg, b.dec_deg) {
            (Some(ra1), Some(dec1), Some(ra2), Some(dec2)) => {
                self.overhead + self.slew_per_degree * angular_separation_deg(ra1, dec1, ra2, dec2)
            }
            _ => self.missing_position_penalty,
        }
    }
}

/// Great-circle separation in degrees (haversine).
pub fn angular_separation_deg(ra1: f64, dec1: f64, ra2: f64, dec2: f64) -> f64 {
    let (ra1, dec1, ra2, dec2) = (
        ra1.to_radians(),
        dec1.to_radians(),
        ra2.to_radians(),
        dec2.to_radians(),
    );
    let h = ((dec2 - dec1) / 2.0).sin().powi(2)
        + dec1.cos() * dec2.cos() * ((ra2 - ra1) / 2.0).sin().powi(2);
    (2.0 * h.sqrt().min(1.0).asin()).to_degrees()
}

/// Dense, validated cost matrix indexed by candidate position.
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    size: usize,
    values: Vec<f64>,
}

impl CostMatrix {
    /// Evaluates every ordered pair once. The diagonal is zero.
    pub fn build<C>(records: &[&ScoredRecord], cost: &C) -> Result<Self, OptimizerInputError>
    where
        C: TransitionCost + ?Sized,
    {
        let size = records.len();
        let mut values = vec![0.0; size * size];
        for (i, from) in records.iter().enumerate() {
            for (j, to) in records.iter().enumerate() {
                if i == j {
                    continue;
                }
                let value = cost.cost(from, to);
                if !value.is_finite() || value < 0.0 {
                    return Err(OptimizerInputError::InvalidCost {
                        from: from.id().clone(),
                        to: to.id().clone(),
                        value,
                    });
                }
                values[i * size + j] = value;
            }
        }
        Ok(Self { size, values })
    }

    /// Builds a matrix from square row-major values without validation.
    pub fn from_rows(rows: &[Vec<f64>]) -> Self {
        let size = rows.len();
        let values = rows.iter().flat_map(|row| row.iter().copied()).collect();
        Self { size, values }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.values[from * self.size + to]
    }

    /// Total cost of visiting `order` front to back.
    pub fn path_cost(&self, order: &[usize]) -> f64 {
        order.windows(2).map(|pair| self.get(pair[0], pair[1])).sum()
    }
}
