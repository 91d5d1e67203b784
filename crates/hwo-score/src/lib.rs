//! Target scoring: characterizability, habitability, confidence and tier.

#![deny(unsafe_code)]

pub mod accumulator;
mod batch;
pub mod config;
mod engine;
pub mod error;
pub mod factors;
pub mod indices;
pub mod observability;

pub use accumulator::WeightedAccumulator;
pub use batch::ScoreBatch;
pub use config::{ObservabilityConfig, ScoringConfig};
pub use engine::ScoringEngine;
pub use error::ScoringConfigError;
