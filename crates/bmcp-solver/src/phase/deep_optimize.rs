//! Tabu deep optimization.
//!
//! Pins the best item of each long-uncovered element (the block list), then
//! alternates a greedy fill with an eviction of the sparsest unpinned item,
//! keeping recently toggled items tabu.

use tracing::{debug, trace};

use bmcp_config::DeepOptimizeConfig;
use bmcp_core::{ElementId, ItemId};

use super::{denser_than, sparser_than, speed, Phase};
use crate::in_solution::InSolutionSet;
use crate::scope::SolverScope;
use crate::statistics::PhaseStats;

const PHASE_INDEX: usize = 2;

/// Tabu fill/evict search around a block of pinned items.
#[derive(Debug)]
pub struct TabuDeepOptimizePhase {
    config: DeepOptimizeConfig,
    in_solution: InSolutionSet,
    /// Iteration of the last toggle, 0 after a reset.
    tabu: Vec<i64>,
    blocked: Vec<bool>,
    element_order: Vec<ElementId>,
}

impl TabuDeepOptimizePhase {
    pub fn new(config: DeepOptimizeConfig) -> Self {
        Self {
            config,
            in_solution: InSolutionSet::new(),
            tabu: Vec::new(),
            blocked: Vec::new(),
            element_order: Vec::new(),
        }
    }

    pub fn config(&self) -> &DeepOptimizeConfig {
        &self.config
    }

    /// Pins the densest item of each of the `block_list_size` elements that
    /// became covered earliest, skipping elements already covered and items
    /// that would overflow the block's own weight budget.
    fn build_block(&mut self, solver_scope: &mut SolverScope<'_>, stats: &mut PhaseStats) {
        let instance = solver_scope.instance();
        self.blocked.clear();
        self.blocked.resize(instance.item_count(), false);

        let tracker = solver_scope.ledger().tracker();
        self.element_order.clear();
        self.element_order.extend(instance.elements());
        self.element_order.sort_by_key(|&e| tracker.select_time(e));

        let mut block_weight = 0;
        for &element in self.element_order.iter().take(self.config.block_list_size) {
            let state = solver_scope.ledger().current();
            if state.coverage(element) > 0 {
                continue;
            }
            let mut best: Option<ItemId> = None;
            for &item in instance.element_neighbors(element) {
                match best {
                    Some(incumbent) if !denser_than(instance, state, item, incumbent) => {}
                    _ => best = Some(item),
                }
            }
            let Some(item) = best else {
                continue;
            };
            if block_weight + instance.weight(item) > instance.capacity() {
                continue;
            }
            solver_scope.ledger_mut().add_item(item);
            self.in_solution.insert(item);
            self.blocked[item] = true;
            block_weight += instance.weight(item);
            stats.record_addition();
            trace!(event = "step", element = element, item = item, action = "block");
        }
    }

    fn is_tabu(&self, solver_scope: &mut SolverScope<'_>, item: ItemId, iteration: i64) -> bool {
        iteration - self.tabu[item] < solver_scope.jitter(self.config.tabu_length)
    }

    /// Adds an aspirant (fits and beats the phase best) if there is one,
    /// otherwise the densest unselected non-tabu item.
    fn fill(&mut self, solver_scope: &mut SolverScope<'_>, iteration: i64, stats: &mut PhaseStats) {
        let instance = solver_scope.instance();
        let capacity = instance.capacity();
        let best_profit = solver_scope.ledger().best().profit_sum();

        let mut aspirant: Option<ItemId> = None;
        let mut regular: Option<ItemId> = None;
        for item in instance.items() {
            let state = solver_scope.ledger().current();
            if state.is_selected(item) {
                continue;
            }
            if state.profit_sum() + state.contribution(item) > best_profit
                && state.weight_sum() + instance.weight(item) <= capacity
            {
                match aspirant {
                    Some(incumbent) if !denser_than(instance, state, item, incumbent) => {}
                    _ => aspirant = Some(item),
                }
                continue;
            }
            if self.is_tabu(solver_scope, item, iteration) {
                continue;
            }
            let state = solver_scope.ledger().current();
            match regular {
                Some(incumbent) if !denser_than(instance, state, item, incumbent) => {}
                _ => regular = Some(item),
            }
        }

        if let Some(item) = aspirant.or(regular) {
            solver_scope.ledger_mut().add_item(item);
            self.in_solution.insert(item);
            self.tabu[item] = iteration;
            stats.record_addition();
            trace!(
                event = "step",
                step = iteration,
                item = item,
                action = "add",
                aspiration = aspirant.is_some(),
            );
        }
    }

    /// Removes the sparsest selected item that is neither pinned nor tabu.
    fn evict(&mut self, solver_scope: &mut SolverScope<'_>, iteration: i64, stats: &mut PhaseStats) {
        let instance = solver_scope.instance();
        let mut pick: Option<(usize, ItemId)> = None;
        for index in 0..self.in_solution.len() {
            let item = self.in_solution.get(index);
            if self.blocked[item] || self.is_tabu(solver_scope, item, iteration) {
                continue;
            }
            let state = solver_scope.ledger().current();
            match pick {
                Some((_, incumbent)) if !sparser_than(instance, state, item, incumbent) => {}
                _ => pick = Some((index, item)),
            }
        }

        if let Some((index, item)) = pick {
            solver_scope.ledger_mut().remove_item(item);
            self.in_solution.swap_remove(index);
            self.tabu[item] = iteration;
            stats.record_removal();
            trace!(event = "step", step = iteration, item = item, action = "evict");
        }
    }
}

impl Phase for TabuDeepOptimizePhase {
    fn solve(&mut self, solver_scope: &mut SolverScope<'_>) {
        let mut stats = PhaseStats::new(PHASE_INDEX, self.phase_type_name());
        let instance = solver_scope.instance();
        let capacity = instance.capacity();
        let iteration_limit = self.config.iteration_limit as i64;

        debug!(
            event = "phase_start",
            phase = "Deep Optimize",
            phase_index = PHASE_INDEX,
        );

        let ledger = solver_scope.ledger_mut();
        ledger.snapshot_to_best();
        self.in_solution.rebuild_from(ledger.current());

        self.build_block(solver_scope, &mut stats);

        // tenure counts from iteration 0 for every item
        self.tabu.clear();
        self.tabu.resize(instance.item_count(), 0);

        for iteration in 0..iteration_limit {
            if solver_scope.ledger().current().weight_sum() < capacity {
                self.fill(solver_scope, iteration, &mut stats);
            }
            stats.record_best(solver_scope.ledger_mut().update_best());

            if solver_scope.ledger().current().weight_sum() >= capacity {
                self.evict(solver_scope, iteration, &mut stats);
            }
            stats.record_best(solver_scope.ledger_mut().update_best());
            stats.record_step();
        }

        let ledger = solver_scope.ledger_mut();
        ledger.rebuild_conf_change();
        let best_profit = ledger.best().profit_sum();

        let duration = stats.elapsed();
        debug!(
            event = "phase_end",
            phase = "Deep Optimize",
            phase_index = PHASE_INDEX,
            duration_ms = duration.as_millis() as u64,
            steps = stats.step_count,
            speed = speed(stats.toggles(), duration),
            score = best_profit,
        );
        solver_scope.record_phase(stats);
    }

    fn phase_type_name(&self) -> &'static str {
        "DeepOptimize"
    }
}
