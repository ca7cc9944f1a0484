//! Configuration-change bookkeeping.
//!
//! Each item carries a counter for the side it currently sits on. The
//! counter starts at the item's contribution when it was last toggled (its
//! origin) and decreases as neighbouring moves erode that contribution.
//! While the counter stays above `lambda` times its origin and the toggle is
//! recent, the item's configuration is considered unchanged and it is
//! protected from being toggled back.

use bmcp_core::{ElementId, Instance, ItemId};

use crate::state::SolutionState;

/// Which side of the selection an item is checked on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// A selected item that might be removed.
    InSolution,
    /// An unselected item that might be added.
    OutOfSolution,
}

/// Per-item conf-change counters and per-element timestamps.
#[derive(Debug, Clone)]
pub struct ConfChangeTracker {
    pub(crate) out_of_solution: Vec<i64>,
    pub(crate) in_solution: Vec<i64>,
    origin_out: Vec<i64>,
    origin_in: Vec<i64>,
    last_toggle: Vec<i64>,
    pub(crate) select_time: Vec<i64>,
    pub(crate) satisfied_time: Vec<i64>,
}

impl ConfChangeTracker {
    /// Creates a tracker at the neutral baseline.
    pub fn new(item_count: usize, element_count: usize) -> Self {
        Self {
            out_of_solution: vec![0; item_count],
            in_solution: vec![0; item_count],
            origin_out: vec![1; item_count],
            origin_in: vec![1; item_count],
            last_toggle: vec![0; item_count],
            select_time: vec![0; element_count],
            satisfied_time: vec![0; element_count],
        }
    }

    /// Counters 0, origins 1, every stamp 0.
    pub fn reset_neutral(&mut self) {
        self.out_of_solution.fill(0);
        self.in_solution.fill(0);
        self.origin_out.fill(1);
        self.origin_in.fill(1);
        self.last_toggle.fill(0);
        self.select_time.fill(0);
        self.satisfied_time.fill(0);
    }

    pub(crate) fn mark_added(&mut self, item: ItemId, contribution: i64, iteration: i64) {
        self.in_solution[item] = contribution;
        self.origin_in[item] = contribution;
        self.last_toggle[item] = iteration;
    }

    pub(crate) fn mark_removed(&mut self, item: ItemId, contribution: i64, iteration: i64) {
        self.out_of_solution[item] = contribution;
        self.origin_out[item] = contribution;
        self.last_toggle[item] = iteration;
    }

    /// Returns true while the counter for `side` has not eroded below
    /// `lambda` times its origin.
    ///
    /// The in-solution check is strict and the out-of-solution check is not,
    /// so a fresh unselected item with a zero baseline still counts as
    /// unchanged.
    pub fn is_unchanged(&self, item: ItemId, side: Side, lambda: f64) -> bool {
        match side {
            Side::InSolution => {
                self.in_solution[item] as f64 > self.origin_in[item] as f64 * lambda
            }
            Side::OutOfSolution => {
                self.out_of_solution[item] as f64 >= self.origin_out[item] as f64 * lambda
            }
        }
    }

    /// Iterations elapsed since the item was last toggled.
    ///
    /// Stamps from an earlier phase run are compared as-is, so they may look
    /// recent or even lie in the future.
    #[inline]
    pub fn iterations_since_toggle(&self, item: ItemId, iteration: i64) -> i64 {
        iteration - self.last_toggle[item]
    }

    #[inline]
    pub fn counter(&self, item: ItemId, side: Side) -> i64 {
        match side {
            Side::InSolution => self.in_solution[item],
            Side::OutOfSolution => self.out_of_solution[item],
        }
    }

    #[inline]
    pub fn origin(&self, item: ItemId, side: Side) -> i64 {
        match side {
            Side::InSolution => self.origin_in[item],
            Side::OutOfSolution => self.origin_out[item],
        }
    }

    #[inline]
    pub fn last_toggle(&self, item: ItemId) -> i64 {
        self.last_toggle[item]
    }

    /// Iteration at which the element last became covered.
    #[inline]
    pub fn select_time(&self, element: ElementId) -> i64 {
        self.select_time[element]
    }

    /// How long the element stayed covered the last time it was.
    #[inline]
    pub fn satisfied_time(&self, element: ElementId) -> i64 {
        self.satisfied_time[element]
    }

    pub(crate) fn reset_select_times(&mut self) {
        self.select_time.fill(0);
    }

    /// Closes the coverage interval of every element still covered at the
    /// end of a phase run of `phase_length` iterations.
    pub(crate) fn close_satisfied_intervals(&mut self, state: &SolutionState, phase_length: i64) {
        for (element, &count) in state.coverage.iter().enumerate() {
            if count > 0 {
                self.satisfied_time[element] = phase_length - self.select_time[element];
            }
        }
    }

    /// Rebuilds counters and origins from the current coverage.
    ///
    /// Selected items count adjacent elements covered exactly once,
    /// unselected items count adjacent uncovered elements.
    pub(crate) fn rebuild_from(&mut self, instance: &Instance, state: &SolutionState) {
        for item in instance.items() {
            let wanted = if state.selected[item] { 1 } else { 0 };
            let count = instance
                .item_neighbors(item)
                .iter()
                .filter(|&&e| state.coverage[e] == wanted)
                .count() as i64;
            if state.selected[item] {
                self.in_solution[item] = count;
                self.origin_in[item] = count;
            } else {
                self.out_of_solution[item] = count;
                self.origin_out[item] = count;
            }
        }
    }
}
