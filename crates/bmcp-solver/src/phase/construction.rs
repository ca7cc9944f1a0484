//! Greedy density construction.

use tracing::{info, trace};

use bmcp_core::ItemId;

use super::{denser_than, speed, Phase};
use crate::in_solution::InSolutionSet;
use crate::scope::SolverScope;
use crate::statistics::PhaseStats;

const PHASE_INDEX: usize = 0;

/// Builds the initial solution from the all-unselected state.
///
/// Repeatedly adds the densest item that still fits and covers something
/// new, then drops every selected item whose contribution fell to zero.
/// Afterwards the conf-change tracker and the bandit are reset against the
/// constructed solution.
#[derive(Debug, Default)]
pub struct GreedyConstructionPhase {
    in_solution: InSolutionSet,
}

impl GreedyConstructionPhase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Densest unselected item that fits and has nonzero contribution.
    /// Ties keep the lower index.
    fn select(solver_scope: &SolverScope<'_>) -> Option<ItemId> {
        let instance = solver_scope.instance();
        let state = solver_scope.ledger().current();
        let room = instance.capacity() - state.weight_sum();

        let mut best: Option<ItemId> = None;
        for item in instance.items() {
            if state.is_selected(item)
                || instance.weight(item) > room
                || state.contribution(item) == 0
            {
                continue;
            }
            match best {
                Some(incumbent) if !denser_than(instance, state, item, incumbent) => {}
                _ => best = Some(item),
            }
        }
        best
    }
}

impl Phase for GreedyConstructionPhase {
    fn solve(&mut self, solver_scope: &mut SolverScope<'_>) {
        let mut stats = PhaseStats::new(PHASE_INDEX, self.phase_type_name());
        let instance = solver_scope.instance();

        info!(
            event = "phase_start",
            phase = "Greedy Construction",
            phase_index = PHASE_INDEX,
        );

        solver_scope.ledger_mut().reset_current();
        self.in_solution.clear();

        loop {
            let state = solver_scope.ledger().current();
            if state.weight_sum() > instance.capacity() || state.size() >= instance.item_count() {
                break;
            }
            let Some(item) = Self::select(solver_scope) else {
                break;
            };

            solver_scope.ledger_mut().add_item(item);
            self.in_solution.insert(item);
            stats.record_addition();
            stats.record_step();
            trace!(
                event = "step",
                step = stats.step_count,
                item = item,
                score = solver_scope.ledger().current().profit_sum(),
            );

            let mut index = 0;
            while index < self.in_solution.len() {
                let candidate = self.in_solution.get(index);
                if solver_scope.ledger().current().contribution(candidate) == 0 {
                    self.in_solution.swap_remove(index);
                    solver_scope.ledger_mut().remove_item(candidate);
                    stats.record_removal();
                } else {
                    index += 1;
                }
            }
        }

        solver_scope.ledger_mut().tracker_mut().reset_neutral();
        solver_scope.reset_bandit();
        let state = solver_scope.ledger().current();
        let (profit, weight, size) = (state.profit_sum(), state.weight_sum(), state.size());
        solver_scope.statistics_mut().construction_profit = profit;

        let duration = stats.elapsed();
        info!(
            event = "phase_end",
            phase = "Greedy Construction",
            phase_index = PHASE_INDEX,
            duration_ms = duration.as_millis() as u64,
            steps = stats.step_count,
            speed = speed(stats.toggles(), duration),
            score = profit,
            weight = weight,
            size = size,
        );
        solver_scope.record_phase(stats);
    }

    fn phase_type_name(&self) -> &'static str {
        "GreedyConstruction"
    }
}
