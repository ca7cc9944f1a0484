//! Coverage ledger: the only mutator of solution state.
//!
//! The ledger owns the live solution, the per-phase `best` snapshot, the
//! solve-wide `star` snapshot and the conf-change tracker. Every mutator keeps
//! coverage counts, contributions and the aggregates exact, so phases never
//! recompute anything from scratch.

use bmcp_core::{ElementId, Instance, ItemId};
use thiserror::Error;

use crate::conf_change::ConfChangeTracker;
use crate::state::SolutionState;

/// A cache that disagrees with a recomputation from the selection vector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerInconsistency {
    #[error("element {element} has coverage {actual}, expected {expected}")]
    Coverage {
        element: ElementId,
        actual: u32,
        expected: u32,
    },

    #[error("item {item} has contribution {actual}, expected {expected}")]
    Contribution {
        item: ItemId,
        actual: i64,
        expected: i64,
    },

    #[error("weight sum is {actual}, expected {expected}")]
    WeightSum { actual: i64, expected: i64 },

    #[error("profit sum is {actual}, expected {expected}")]
    ProfitSum { actual: i64, expected: i64 },

    #[error("size is {actual}, expected {expected}")]
    Size { actual: usize, expected: usize },
}

/// Live solution, snapshots and conf-change bookkeeping for one instance.
#[derive(Debug, Clone)]
pub struct CoverageLedger<'a> {
    instance: &'a Instance,
    current: SolutionState,
    best: SolutionState,
    star: SolutionState,
    tracker: ConfChangeTracker,
}

impl<'a> CoverageLedger<'a> {
    /// Creates a ledger with every state empty.
    pub fn new(instance: &'a Instance) -> Self {
        let empty = SolutionState::empty(instance);
        Self {
            instance,
            current: empty.clone(),
            best: empty.clone(),
            star: empty,
            tracker: ConfChangeTracker::new(instance.item_count(), instance.element_count()),
        }
    }

    pub fn instance(&self) -> &'a Instance {
        self.instance
    }

    pub fn current(&self) -> &SolutionState {
        &self.current
    }

    pub fn best(&self) -> &SolutionState {
        &self.best
    }

    pub fn star(&self) -> &SolutionState {
        &self.star
    }

    pub fn tracker(&self) -> &ConfChangeTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut ConfChangeTracker {
        &mut self.tracker
    }

    /// Returns true if the live solution fits the capacity.
    pub fn is_feasible(&self) -> bool {
        self.current.is_feasible(self.instance.capacity())
    }

    /// Selects an item.
    pub fn add_item(&mut self, item: ItemId) {
        self.toggle_in(item, None);
    }

    /// Deselects an item.
    pub fn remove_item(&mut self, item: ItemId) {
        self.toggle_out(item, None);
    }

    /// Selects an item and updates the conf-change counters at `iteration`.
    pub fn add_item_with_conf_change(&mut self, item: ItemId, iteration: i64) {
        self.toggle_in(item, Some(iteration));
    }

    /// Deselects an item and updates the conf-change counters at `iteration`.
    pub fn remove_item_with_conf_change(&mut self, item: ItemId, iteration: i64) {
        self.toggle_out(item, Some(iteration));
    }

    pub fn snapshot_to_best(&mut self) {
        self.best.copy_from(&self.current);
    }

    pub fn snapshot_to_star(&mut self) {
        self.star.copy_from(&self.current);
    }

    pub fn restore_from_best(&mut self) {
        self.current.copy_from(&self.best);
    }

    /// Snapshots to best if the live solution is feasible and strictly more
    /// profitable. Returns true on a snapshot.
    pub fn update_best(&mut self) -> bool {
        if self.is_feasible() && self.current.profit_sum > self.best.profit_sum {
            self.snapshot_to_best();
            true
        } else {
            false
        }
    }

    /// Snapshots to star if the live solution is feasible and strictly more
    /// profitable. Returns true on a snapshot.
    pub fn update_star(&mut self) -> bool {
        if self.is_feasible() && self.current.profit_sum > self.star.profit_sum {
            self.snapshot_to_star();
            true
        } else {
            false
        }
    }

    /// Closes the coverage interval of every element still covered after a
    /// phase run of `phase_length` iterations.
    pub fn close_satisfied_intervals(&mut self, phase_length: i64) {
        self.tracker
            .close_satisfied_intervals(&self.current, phase_length);
    }

    /// Rebuilds the conf-change counters from the live coverage.
    pub fn rebuild_conf_change(&mut self) {
        self.tracker.rebuild_from(self.instance, &self.current);
    }

    /// Clears the live solution back to the all-unselected state.
    pub fn reset_current(&mut self) {
        self.current = SolutionState::empty(self.instance);
    }

    /// Checks the live solution against a full recomputation.
    ///
    /// # Errors
    ///
    /// Returns the first cache that disagrees.
    pub fn audit(&self) -> Result<(), LedgerInconsistency> {
        self.current.audit(self.instance)
    }

    fn toggle_in(&mut self, item: ItemId, stamp: Option<i64>) {
        let instance = self.instance;
        let state = &mut self.current;
        let tracker = &mut self.tracker;
        debug_assert!(!state.selected[item], "item {item} is already selected");

        if let Some(iteration) = stamp {
            tracker.mark_added(item, state.contribution[item], iteration);
        }

        state.selected[item] = true;
        state.size += 1;
        state.weight_sum += instance.weight(item);

        for &element in instance.item_neighbors(item) {
            let profit = instance.profit(element);
            state.coverage[element] += 1;
            match state.coverage[element] {
                1 => {
                    state.profit_sum += profit;
                    if let Some(iteration) = stamp {
                        tracker.select_time[element] = iteration;
                    }
                    for &other in instance.element_neighbors(element) {
                        if state.selected[other] {
                            continue;
                        }
                        state.contribution[other] -= profit;
                        if stamp.is_some() {
                            tracker.out_of_solution[other] -= profit;
                        }
                    }
                }
                2 => {
                    let previous = instance
                        .element_neighbors(element)
                        .iter()
                        .copied()
                        .find(|&other| other != item && state.selected[other]);
                    if let Some(other) = previous {
                        state.contribution[other] -= profit;
                        if stamp.is_some() {
                            tracker.in_solution[other] -= profit;
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn toggle_out(&mut self, item: ItemId, stamp: Option<i64>) {
        let instance = self.instance;
        let state = &mut self.current;
        let tracker = &mut self.tracker;
        debug_assert!(state.selected[item], "item {item} is not selected");

        if let Some(iteration) = stamp {
            tracker.mark_removed(item, state.contribution[item], iteration);
        }

        state.selected[item] = false;
        state.size -= 1;
        state.weight_sum -= instance.weight(item);

        for &element in instance.item_neighbors(item) {
            let profit = instance.profit(element);
            state.coverage[element] -= 1;
            match state.coverage[element] {
                0 => {
                    state.profit_sum -= profit;
                    if let Some(iteration) = stamp {
                        tracker.satisfied_time[element] =
                            iteration - tracker.select_time[element];
                    }
                    for &other in instance.element_neighbors(element) {
                        if other == item {
                            continue;
                        }
                        state.contribution[other] += profit;
                        if stamp.is_some() {
                            tracker.out_of_solution[other] -= profit;
                        }
                    }
                }
                1 => {
                    let remaining = instance
                        .element_neighbors(element)
                        .iter()
                        .copied()
                        .find(|&other| state.selected[other]);
                    if let Some(other) = remaining {
                        state.contribution[other] += profit;
                        if stamp.is_some() {
                            tracker.in_solution[other] -= profit;
                        }
                    }
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;
