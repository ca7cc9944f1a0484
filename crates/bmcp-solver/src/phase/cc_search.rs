//! Configuration-checking search.
//!
//! Each iteration first restores feasibility by dropping the sparsest
//! unprotected selected item, then adds the densest of a random sample of
//! fitting, unprotected candidates. When no candidate fits the search is in
//! a local optimum and the bandit picks an item to force in anyway, which
//! makes the next iteration drop something.

use rand::seq::SliceRandom;
use tracing::{debug, trace};

use bmcp_config::CcSearchConfig;
use bmcp_core::ItemId;

use super::{denser_than, sparser_than, speed, Phase};
use crate::bandit::overshoot_reward;
use crate::conf_change::Side;
use crate::in_solution::InSolutionSet;
use crate::scope::SolverScope;
use crate::statistics::PhaseStats;

const PHASE_INDEX: usize = 1;

/// Add/drop local search guarded by configuration checking.
#[derive(Debug)]
pub struct ConfigurationCheckingPhase {
    config: CcSearchConfig,
    in_solution: InSolutionSet,
    candidates: Vec<ItemId>,
}

impl ConfigurationCheckingPhase {
    pub fn new(config: CcSearchConfig) -> Self {
        Self {
            config,
            in_solution: InSolutionSet::new(),
            candidates: Vec::new(),
        }
    }

    pub fn config(&self) -> &CcSearchConfig {
        &self.config
    }

    /// Drops the sparsest selected item that is not protected.
    fn restore_feasibility(
        &mut self,
        solver_scope: &mut SolverScope<'_>,
        iteration: i64,
        stats: &mut PhaseStats,
    ) {
        let instance = solver_scope.instance();
        let mut pick: Option<(usize, ItemId)> = None;
        for index in 0..self.in_solution.len() {
            let item = self.in_solution.get(index);
            if is_protected(solver_scope, &self.config, item, Side::InSolution, iteration) {
                continue;
            }
            let state = solver_scope.ledger().current();
            match pick {
                Some((_, incumbent)) if !sparser_than(instance, state, item, incumbent) => {}
                _ => pick = Some((index, item)),
            }
        }

        if let Some((index, item)) = pick {
            self.in_solution.swap_remove(index);
            solver_scope
                .ledger_mut()
                .remove_item_with_conf_change(item, iteration);
            stats.record_removal();
            trace!(event = "step", step = iteration, item = item, action = "drop");
        }
    }

    /// Adds the densest of a random sample of candidates, or falls back to
    /// the bandit when there are none.
    fn improve(&mut self, solver_scope: &mut SolverScope<'_>, iteration: i64, stats: &mut PhaseStats) {
        let instance = solver_scope.instance();
        let capacity = instance.capacity();

        self.candidates.clear();
        for item in instance.items() {
            let state = solver_scope.ledger().current();
            if state.is_selected(item)
                || state.weight_sum() + instance.weight(item) > capacity
                || state.contribution(item) == 0
            {
                continue;
            }
            if is_protected(solver_scope, &self.config, item, Side::OutOfSolution, iteration) {
                continue;
            }
            self.candidates.push(item);
        }

        let chosen = if self.candidates.is_empty() {
            self.pick_by_bandit(solver_scope, iteration)
        } else {
            let sample_size = self.config.sample_size;
            let sample: &[ItemId] = if self.candidates.len() <= sample_size {
                &self.candidates
            } else {
                self.candidates
                    .partial_shuffle(solver_scope.rng(), sample_size)
                    .0
            };
            let state = solver_scope.ledger().current();
            let mut best: Option<ItemId> = None;
            for &item in sample.iter() {
                match best {
                    Some(incumbent) if !denser_than(instance, state, item, incumbent) => {}
                    _ => best = Some(item),
                }
            }
            best
        };

        if let Some(item) = chosen {
            self.in_solution.insert(item);
            solver_scope
                .ledger_mut()
                .add_item_with_conf_change(item, iteration);
            stats.record_addition();
            trace!(event = "step", step = iteration, item = item, action = "add");
        }
    }

    /// Highest-UCB unselected, unprotected item, with its bandit statistics
    /// updated by the overshoot reward its addition earns.
    fn pick_by_bandit(&self, solver_scope: &mut SolverScope<'_>, iteration: i64) -> Option<ItemId> {
        let instance = solver_scope.instance();
        let mut best: Option<(ItemId, f64)> = None;
        for item in instance.items() {
            if solver_scope.ledger().current().is_selected(item) {
                continue;
            }
            if is_protected(solver_scope, &self.config, item, Side::OutOfSolution, iteration) {
                continue;
            }
            let score = solver_scope.bandit().ucb(item);
            match best {
                Some((_, incumbent)) if score <= incumbent => {}
                _ => best = Some((item, score)),
            }
        }

        let (item, _) = best?;
        let state = solver_scope.ledger().current();
        let reward = overshoot_reward(
            state.contribution(item),
            state.weight_sum(),
            instance.weight(item),
            instance.capacity(),
        );
        solver_scope.bandit_mut().record(item, reward);
        Some(item)
    }
}

/// An item is protected while its counter for `side` has not eroded and it
/// was toggled less than a jittered gap ago.
///
/// The jitter is only drawn when the counter check passes.
fn is_protected(
    solver_scope: &mut SolverScope<'_>,
    config: &CcSearchConfig,
    item: ItemId,
    side: Side,
    iteration: i64,
) -> bool {
    let tracker = solver_scope.ledger().tracker();
    if !tracker.is_unchanged(item, side, config.lambda) {
        return false;
    }
    let since = tracker.iterations_since_toggle(item, iteration);
    since < solver_scope.jitter(config.timestamp_gap)
}

impl Phase for ConfigurationCheckingPhase {
    fn solve(&mut self, solver_scope: &mut SolverScope<'_>) {
        let mut stats = PhaseStats::new(PHASE_INDEX, self.phase_type_name());
        let capacity = solver_scope.instance().capacity();
        let iteration_limit = self.config.iteration_limit as i64;

        debug!(
            event = "phase_start",
            phase = "CC Search",
            phase_index = PHASE_INDEX,
        );

        let ledger = solver_scope.ledger_mut();
        ledger.snapshot_to_best();
        self.in_solution.rebuild_from(ledger.current());
        ledger.tracker_mut().reset_select_times();

        for iteration in 0..iteration_limit {
            if solver_scope.ledger().current().weight_sum() > capacity {
                self.restore_feasibility(solver_scope, iteration, &mut stats);
            }
            stats.record_best(solver_scope.ledger_mut().update_best());

            if solver_scope.ledger().is_feasible() {
                self.improve(solver_scope, iteration, &mut stats);
            }
            stats.record_best(solver_scope.ledger_mut().update_best());
            stats.record_step();
        }

        let ledger = solver_scope.ledger_mut();
        ledger.close_satisfied_intervals(iteration_limit);
        let best_profit = ledger.best().profit_sum();

        let duration = stats.elapsed();
        debug!(
            event = "phase_end",
            phase = "CC Search",
            phase_index = PHASE_INDEX,
            duration_ms = duration.as_millis() as u64,
            steps = stats.step_count,
            speed = speed(stats.toggles(), duration),
            score = best_profit,
        );
        solver_scope.record_phase(stats);
    }

    fn phase_type_name(&self) -> &'static str {
        "CcSearch"
    }
}
