//! Observation windows and slot assignment.

use serde::{Deserialize, Serialize};

/// Inclusive range of slots in which a target may be observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub earliest: usize,
    pub latest: usize,
}

impl TimeWindow {
    pub fn new(earliest: usize, latest: usize) -> Self {
        Self { earliest, latest }
    }

    pub fn is_valid(&self) -> bool {
        self.earliest <= self.latest
    }

    pub fn contains(&self, slot: usize) -> bool {
        (self.earliest..=self.latest).contains(&slot)
    }
}

/// Why a candidate was left out of the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ExclusionReason {
    /// Every slot up to `latest` went to other targets.
    WindowClosed { latest: usize },
    /// No slot inside the horizon was available.
    OutsideHorizon { horizon: usize },
}

impl std::fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExclusionReason::WindowClosed { latest } => {
                write!(f, "window closed after slot {latest}")
            }
            ExclusionReason::OutsideHorizon { horizon } => {
                write!(f, "no free slot before horizon {horizon}")
            }
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct SlotPlan {
    /// `(candidate, slot)` in slot order.
    pub placed: Vec<(usize, usize)>,
    pub excluded: Vec<(usize, ExclusionReason)>,
}

/// Walks slots `0..horizon`, placing at each slot the earliest queued
/// candidate (in `order`) whose window contains it. Slots with no eligible
/// candidate stay idle.
pub(crate) fn assign_slots(
    order: &[usize],
    windows: &[Option<TimeWindow>],
    horizon: usize,
) -> SlotPlan {
    let mut plan = SlotPlan::default();
    let mut queue: Vec<usize> = Vec::with_capacity(order.len());
    for &candidate in order {
        match windows[candidate] {
            Some(window) if window.earliest >= horizon => plan
                .excluded
                .push((candidate, ExclusionReason::OutsideHorizon { horizon })),
            _ => queue.push(candidate),
        }
    }

    for slot in 0..horizon {
        if queue.is_empty() {
            break;
        }
        let excluded = &mut plan.excluded;
        queue.retain(|&candidate| match windows[candidate] {
            Some(window) if window.latest < slot => {
                excluded.push((
                    candidate,
                    ExclusionReason::WindowClosed {
                        latest: window.latest,
                    },
                ));
                false
            }
            _ => true,
        });
        let eligible = queue
            .iter()
            .position(|&candidate| windows[candidate].is_none_or(|w| w.contains(slot)));
        if let Some(position) = eligible {
            plan.placed.push((queue.remove(position), slot));
        }
    }

    for candidate in queue {
        let reason = match windows[candidate] {
            Some(window) if window.latest < horizon => ExclusionReason::WindowClosed {
                latest: window.latest,
            },
            _ => ExclusionReason::OutsideHorizon { horizon },
        };
        plan.excluded.push((candidate, reason));
    }
    plan
}
