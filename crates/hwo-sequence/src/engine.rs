use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use hwo_model::{ScoredRecord, TargetId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};

use crate::cost::{CostMatrix, SlewCostModel, TransitionCost};
use crate::error::OptimizerInputError;
use crate::strategy::{
    ExactStrategy, GreedyTwoOpt, MAX_EXACT_LIMIT, SearchBudget, SequenceStrategy, StrategyKind,
};
use crate::window::{ExclusionReason, TimeWindow, assign_slots};

/// Optimizer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    /// Candidate sets up to this size are solved exactly.
    pub exact_limit: usize,
    /// 2-opt improvement moves before stopping.
    pub max_iterations: usize,
    /// Optional wall-clock budget for 2-opt, in milliseconds.
    pub time_limit_ms: Option<u64>,
    /// Number of slots; defaults to enough for every candidate and window.
    pub horizon: Option<usize>,
    pub slew: SlewCostModel,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            exact_limit: 15,
            max_iterations: SearchBudget::default().max_iterations,
            time_limit_ms: None,
            horizon: None,
            slew: SlewCostModel::default(),
        }
    }
}

impl SequenceConfig {
    pub fn validate(&self) -> Result<(), OptimizerInputError> {
        if self.exact_limit > MAX_EXACT_LIMIT {
            return Err(OptimizerInputError::ExactLimitTooLarge {
                requested: self.exact_limit,
                max: MAX_EXACT_LIMIT,
            });
        }
        Ok(())
    }

    pub fn budget(&self) -> SearchBudget {
        SearchBudget {
            max_iterations: self.max_iterations,
            time_limit: self.time_limit_ms.map(Duration::from_millis),
        }
    }

    pub fn with_exact_limit(mut self, limit: usize) -> Self {
        self.exact_limit = limit;
        self
    }

    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = Some(horizon);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceStep {
    pub id: TargetId,
    pub slot: usize,
    /// Transition cost from the previous step; zero for the first.
    pub cost_from_previous: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcludedTarget {
    pub id: TargetId,
    #[serde(flatten)]
    pub reason: ExclusionReason,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceResult {
    pub steps: Vec<SequenceStep>,
    pub total_cost: f64,
    pub excluded: Vec<ExcludedTarget>,
    /// `None` when there was nothing to order.
    pub strategy: Option<StrategyKind>,
    pub iterations: usize,
    pub converged: bool,
}

impl SequenceResult {
    pub fn empty() -> Self {
        Self {
            steps: Vec::new(),
            total_cost: 0.0,
            excluded: Vec::new(),
            strategy: None,
            iterations: 0,
            converged: true,
        }
    }

    pub fn order(&self) -> Vec<&TargetId> {
        self.steps.iter().map(|step| &step.id).collect()
    }

    /// Zero-based position of `id` in the visiting order.
    pub fn position(&self, id: &TargetId) -> Option<usize> {
        self.steps.iter().position(|step| &step.id == id)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Higher tier first, then higher characterizability, then higher
/// habitability, then identifier.
pub fn priority_order(a: &ScoredRecord, b: &ScoredRecord) -> Ordering {
    b.tier
        .cmp(&a.tier)
        .then_with(|| b.characterizability_score.total_cmp(&a.characterizability_score))
        .then_with(|| b.habitability_score.total_cmp(&a.habitability_score))
        .then_with(|| a.id().cmp(b.id()))
}

#[derive(Debug, Clone, Default)]
pub struct SequenceOptimizer {
    config: SequenceConfig,
}

impl SequenceOptimizer {
    pub fn new(config: SequenceConfig) -> Result<Self, OptimizerInputError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SequenceConfig {
        &self.config
    }

    /// Picks exact search for small sets and greedy 2-opt otherwise.
    pub fn strategy_for(&self, candidates: usize) -> &'static dyn SequenceStrategy {
        if candidates <= self.config.exact_limit {
            &ExactStrategy
        } else {
            &GreedyTwoOpt
        }
    }

    /// Orders `records` with the strategy matching their count.
    pub fn optimize<C>(
        &self,
        records: &[ScoredRecord],
        cost: &C,
        windows: &BTreeMap<TargetId, TimeWindow>,
        budget: &SearchBudget,
    ) -> Result<SequenceResult, OptimizerInputError>
    where
        C: TransitionCost + ?Sized,
    {
        self.optimize_with(self.strategy_for(records.len()), records, cost, windows, budget)
    }

    /// Orders `records` with the default slew cost model.
    pub fn optimize_slew(
        &self,
        records: &[ScoredRecord],
        windows: &BTreeMap<TargetId, TimeWindow>,
    ) -> Result<SequenceResult, OptimizerInputError> {
        self.optimize(records, &self.config.slew, windows, &self.config.budget())
    }

    /// Orders `records` with an explicit strategy.
    pub fn optimize_with<C>(
        &self,
        strategy: &dyn SequenceStrategy,
        records: &[ScoredRecord],
        cost: &C,
        windows: &BTreeMap<TargetId, TimeWindow>,
        budget: &SearchBudget,
    ) -> Result<SequenceResult, OptimizerInputError>
    where
        C: TransitionCost + ?Sized,
    {
        let span = info_span!(
            "optimize_sequence",
            candidates = records.len(),
            strategy = %strategy.kind()
        );
        let _guard = span.enter();

        let mut ids = BTreeSet::new();
        for record in records {
            if !ids.insert(record.id()) {
                return Err(OptimizerInputError::DuplicateIdentifier(record.id().clone()));
            }
        }
        for (id, window) in windows {
            if !window.is_valid() {
                return Err(OptimizerInputError::InvalidWindow {
                    id: id.clone(),
                    earliest: window.earliest,
                    latest: window.latest,
                });
            }
            if !ids.contains(id) {
                warn!(id = %id, "time window for unknown candidate ignored");
            }
        }
        if records.is_empty() {
            debug!("no candidates to sequence");
            return Ok(SequenceResult::empty());
        }
        if strategy.kind() == StrategyKind::Exact && records.len() > MAX_EXACT_LIMIT {
            return Err(OptimizerInputError::ExactLimitTooLarge {
                requested: records.len(),
                max: MAX_EXACT_LIMIT,
            });
        }

        let mut ranked: Vec<&ScoredRecord> = records.iter().collect();
        ranked.sort_by(|a, b| priority_order(a, b));

        let costs = CostMatrix::build(&ranked, cost)?;
        let outcome = strategy.solve(&costs, budget);

        let candidate_windows: Vec<Option<TimeWindow>> = ranked
            .iter()
            .map(|record| windows.get(record.id()).copied())
            .collect();
        let horizon = self.config.horizon.unwrap_or_else(|| {
            candidate_windows
                .iter()
                .flatten()
                .map(|window| window.latest + 1)
                .fold(ranked.len(), usize::max)
        });
        let plan = assign_slots(&outcome.order, &candidate_windows, horizon);

        let mut steps = Vec::with_capacity(plan.placed.len());
        let mut total_cost = 0.0;
        let mut previous: Option<usize> = None;
        for (candidate, slot) in plan.placed {
            let step_cost = previous.map_or(0.0, |p| costs.get(p, candidate));
            total_cost += step_cost;
            steps.push(SequenceStep {
                id: ranked[candidate].id().clone(),
                slot,
                cost_from_previous: step_cost,
            });
            previous = Some(candidate);
        }
        let excluded: Vec<ExcludedTarget> = plan
            .excluded
            .into_iter()
            .map(|(candidate, reason)| {
                warn!(id = %ranked[candidate].id(), %reason, "target excluded from sequence");
                ExcludedTarget {
                    id: ranked[candidate].id().clone(),
                    reason,
                }
            })
            .collect();

        info!(
            sequenced = steps.len(),
            excluded = excluded.len(),
            total_cost,
            iterations = outcome.iterations,
            converged = outcome.converged,
            "sequence complete"
        );
        Ok(SequenceResult {
            steps,
            total_cost,
            excluded,
            strategy: Some(strategy.kind()),
            iterations: outcome.iterations,
            converged: outcome.converged,
        })
    }
}

/// Orders `records` with default optimizer settings.
pub fn optimize_sequence<C>(
    records: &[ScoredRecord],
    cost: &C,
    windows: &BTreeMap<TargetId, TimeWindow>,
    budget: &SearchBudget,
) -> Result<SequenceResult, OptimizerInputError>
where
    C: TransitionCost + ?Sized,
{
    SequenceOptimizer::default().optimize(records, cost, windows, budget)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_exact_limit_is_rejected() {
        let err =
            SequenceOptimizer::new(SequenceConfig::default().with_exact_limit(25)).unwrap_err();
        assert_eq!(
            err,
            OptimizerInputError::ExactLimitTooLarge {
                requested: 25,
                max: MAX_EXACT_LIMIT
            }
        );
    }

    #[test]
    fn strategy_follows_candidate_count() {
        let optimizer = SequenceOptimizer::default();
        assert_eq!(optimizer.strategy_for(15).kind(), StrategyKind::Exact);
        assert_eq!(optimizer.strategy_for(16).kind(), StrategyKind::GreedyTwoOpt);
    }

    #[test]
    fn budget_carries_time_limit() {
        let config = SequenceConfig {
            time_limit_ms: Some(250),
            ..SequenceConfig::default()
        };
        assert_eq!(config.budget().time_limit, Some(Duration::from_millis(250)));
        assert_eq!(SequenceConfig::default().budget().time_limit, None);
    }
}
