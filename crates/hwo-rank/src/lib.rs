//! Priority ranking of scored targets.

#![deny(unsafe_code)]

pub mod config;
mod engine;
pub mod error;

pub use config::{RankingConfig, RankingWeights, TierPoints};
pub use engine::{
    ComponentContribution, RankComponent, RankedTarget, Ranker, RankingResult, rank,
};
pub use error::RankingConfigError;
