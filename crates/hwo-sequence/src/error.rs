use hwo_model::TargetId;
use serde::Serialize;

/// Input problems that make a sequence request unanswerable.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OptimizerInputError {
    #[error("transition cost from {from} to {to} is {value}; costs must be finite and non-negative")]
    InvalidCost {
        from: TargetId,
        to: TargetId,
        value: f64,
    },
    #[error("time window for {id} is malformed: earliest slot {earliest} is after latest slot {latest}")]
    InvalidWindow {
        id: TargetId,
        earliest: usize,
        latest: usize,
    },
    #[error("candidate {0} appears more than once")]
    DuplicateIdentifier(TargetId),
    #[error("exact search is limited to {max} candidates, got {requested}")]
    ExactLimitTooLarge { requested: usize, max: usize },
}
