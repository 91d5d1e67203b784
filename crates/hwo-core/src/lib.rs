//! Exoplanet target prioritization.
//!
//! [`TargetEngine`] ties the stages together: headers are reconciled onto the
//! canonical field catalog, rows become canonical records, records are scored,
//! and scored targets are sequenced and ranked.

#![deny(unsafe_code)]

pub mod config;
mod engine;
pub mod error;
mod pipeline;

pub use config::EngineConfig;
pub use engine::TargetEngine;
pub use error::ConfigError;
pub use pipeline::{ProcessedTable, ProcessingSummary, TargetPlan};

pub use hwo_model as model;
pub use hwo_rank as rank;
pub use hwo_reconcile as reconcile;
pub use hwo_score as score;
pub use hwo_sequence as sequence;
