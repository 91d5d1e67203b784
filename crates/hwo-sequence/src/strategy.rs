//! Ordering strategies over a validated cost matrix.
//!
//! Candidates are indexed in priority order: index 0 is the highest-priority
//! target. Every strategy resolves cost ties (within [`COST_EPSILON`]) in
//! favor of the lower index.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cost::CostMatrix;

/// Costs closer than this are treated as equal.
pub const COST_EPSILON: f64 = 1e-9;

/// Largest candidate count exact search accepts.
pub const MAX_EXACT_LIMIT: usize = 18;

/// Limits for iterative improvement.
///
/// There is no implicit time limit; without `time_limit` the search runs to
/// convergence or `max_iterations`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchBudget {
    pub max_iterations: usize,
    pub time_limit: Option<Duration>,
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
            time_limit: None,
        }
    }
}

impl SearchBudget {
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Held-Karp dynamic programming over subsets.
    Exact,
    /// Greedy nearest neighbour followed by 2-opt.
    GreedyTwoOpt,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Exact => "exact",
            StrategyKind::GreedyTwoOpt => "greedy_two_opt",
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyOutcome {
    /// Candidate indices in visiting order.
    pub order: Vec<usize>,
    /// Improvement moves applied; exact search reports zero.
    pub iterations: usize,
    /// False when the budget stopped the search early.
    pub converged: bool,
}

/// A way of ordering candidates to minimize total transition cost.
pub trait SequenceStrategy {
    fn kind(&self) -> StrategyKind;

    fn solve(&self, costs: &CostMatrix, budget: &SearchBudget) -> StrategyOutcome;
}

/// Exact open-path search (Held-Karp), `O(2^n · n²)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactStrategy;

impl SequenceStrategy for ExactStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Exact
    }

    fn solve(&self, costs: &CostMatrix, _budget: &SearchBudget) -> StrategyOutcome {
        let n = costs.len();
        if n == 0 {
            return StrategyOutcome {
                order: Vec::new(),
                iterations: 0,
                converged: true,
            };
        }

        // best[mask * n + j]: cheapest path that starts at j and visits
        // exactly the candidates in mask.
        let states = 1usize << n;
        let mut best = vec![f64::INFINITY; states * n];
        let mut next = vec![usize::MAX; states * n];
        for j in 0..n {
            best[(1 << j) * n + j] = 0.0;
        }
        for mask in 1..states {
            if mask.count_ones() < 2 {
                continue;
            }
            for j in (0..n).filter(|j| mask & (1 << j) != 0) {
                let rest = mask & !(1 << j);
                let mut value = f64::INFINITY;
                let mut choice = usize::MAX;
                for k in (0..n).filter(|k| rest & (1 << k) != 0) {
                    let candidate = costs.get(j, k) + best[rest * n + k];
                    if candidate < value - COST_EPSILON {
                        value = candidate;
                        choice = k;
                    }
                }
                best[mask * n + j] = value;
                next[mask * n + j] = choice;
            }
        }

        let full = states - 1;
        let mut start = 0;
        for j in 1..n {
            if best[full * n + j] < best[full * n + start] - COST_EPSILON {
                start = j;
            }
        }

        let mut order = Vec::with_capacity(n);
        let mut mask = full;
        let mut current = start;
        loop {
            order.push(current);
            let following = next[mask * n + current];
            mask &= !(1 << current);
            if mask == 0 {
                break;
            }
            current = following;
        }
        debug!(candidates = n, cost = best[full * n + start], "exact sequence");
        StrategyOutcome {
            order,
            iterations: 0,
            converged: true,
        }
    }
}

/// Greedy nearest-unvisited construction seeded by the highest-priority
/// candidate, improved with best-improvement 2-opt.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyTwoOpt;

impl GreedyTwoOpt {
    /// Nearest-unvisited tour starting from index 0.
    pub fn construct(costs: &CostMatrix) -> Vec<usize> {
        let n = costs.len();
        if n == 0 {
            return Vec::new();
        }
        let mut visited = vec![false; n];
        let mut order = Vec::with_capacity(n);
        let mut current = 0;
        visited[0] = true;
        order.push(0);
        while order.len() < n {
            let mut best: Option<(usize, f64)> = None;
            for candidate in (0..n).filter(|&k| !visited[k]) {
                let cost = costs.get(current, candidate);
                if best.is_none_or(|(_, best_cost)| cost < best_cost - COST_EPSILON) {
                    best = Some((candidate, cost));
                }
            }
            let Some((chosen, _)) = best else {
                break;
            };
            visited[chosen] = true;
            order.push(chosen);
            current = chosen;
        }
        order
    }

    /// Applies improving segment reversals until none is left or the budget
    /// runs out. Returns `(moves, converged)`.
    pub fn improve(
        costs: &CostMatrix,
        order: &mut [usize],
        budget: &SearchBudget,
    ) -> (usize, bool) {
        let n = order.len();
        if n < 2 {
            return (0, true);
        }
        let started = Instant::now();
        let mut moves = 0;
        loop {
            if moves >= budget.max_iterations {
                return (moves, false);
            }
            if budget
                .time_limit
                .is_some_and(|limit| started.elapsed() >= limit)
            {
                return (moves, false);
            }

            // Prefix sums of forward and reversed edge costs make each
            // candidate reversal O(1) even for asymmetric costs.
            let mut forward = vec![0.0; n];
            let mut reverse = vec![0.0; n];
            for s in 1..n {
                forward[s] = forward[s - 1] + costs.get(order[s - 1], order[s]);
                reverse[s] = reverse[s - 1] + costs.get(order[s], order[s - 1]);
            }

            let mut best_move: Option<(usize, usize, f64)> = None;
            for i in 0..n - 1 {
                for j in i + 1..n {
                    let mut before = forward[j] - forward[i];
                    let mut after = reverse[j] - reverse[i];
                    if i > 0 {
                        before += costs.get(order[i - 1], order[i]);
                        after += costs.get(order[i - 1], order[j]);
                    }
                    if j + 1 < n {
                        before += costs.get(order[j], order[j + 1]);
                        after += costs.get(order[i], order[j + 1]);
                    }
                    let delta = after - before;
                    if delta < -COST_EPSILON
                        && best_move.is_none_or(|(_, _, best)| delta < best - COST_EPSILON)
                    {
                        best_move = Some((i, j, delta));
                    }
                }
            }

            let Some((i, j, _)) = best_move else {
                return (moves, true);
            };
            order[i..=j].reverse();
            moves += 1;
        }
    }
}

impl SequenceStrategy for GreedyTwoOpt {
    fn kind(&self) -> StrategyKind {
        StrategyKind::GreedyTwoOpt
    }

    fn solve(&self, costs: &CostMatrix, budget: &SearchBudget) -> StrategyOutcome {
        let mut order = Self::construct(costs);
        let greedy_cost = costs.path_cost(&order);
        let (iterations, converged) = Self::improve(costs, &mut order, budget);
        debug!(
            candidates = costs.len(),
            greedy_cost,
            improved_cost = costs.path_cost(&order),
            iterations,
            converged,
            "greedy two-opt sequence"
        );
        StrategyOutcome {
            order,
            iterations,
            converged,
        }
    }
}
