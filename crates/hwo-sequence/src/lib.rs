//! Observation sequencing for scored targets.
//!
//! Candidates are ordered to minimize the summed transition cost between
//! consecutive observations, then assigned to slots honouring optional time
//! windows. Small sets are solved exactly; larger ones use greedy construction
//! refined by 2-opt.

pub mod cost;
pub mod engine;
pub mod error;
pub mod strategy;
pub mod window;

pub use cost::{CostMatrix, SlewCostModel, TransitionCost, angular_separation_deg};
pub use engine::{
    ExcludedTarget, SequenceConfig, SequenceOptimizer, SequenceResult, SequenceStep,
    optimize_sequence, priority_order,
};
pub use error::OptimizerInputError;
pub use strategy::{
    COST_EPSILON, ExactStrategy, GreedyTwoOpt, MAX_EXACT_LIMIT, SearchBudget, SequenceStrategy,
    StrategyKind, StrategyOutcome,
};
pub use window::{ExclusionReason, TimeWindow};
