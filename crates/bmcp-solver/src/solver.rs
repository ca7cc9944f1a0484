//! Solve driver.

use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info};

use bmcp_config::SolverConfig;
use bmcp_core::{Instance, SolutionSummary};

use crate::event::{PhaseLifecycleListener, ProgressRecord, SolverEventListener, SolverEventSupport};
use crate::phase::{
    ConfigurationCheckingPhase, GreedyConstructionPhase, Phase, TabuDeepOptimizePhase,
};
use crate::scope::SolverScope;
use crate::statistics::SolverStatistics;
use crate::termination::{
    ExternalTermination, IterationCountTermination, OrTermination, Termination, TimeTermination,
};

/// Termination built from a [`SolverConfig`]: the time limit, the optional
/// iteration cap and the early-termination flag.
pub type ConfiguredTermination = OrTermination<(
    TimeTermination,
    Option<IterationCountTermination>,
    ExternalTermination,
)>;

/// Outcome of a solve.
#[derive(Debug, Clone)]
pub struct SolveResult {
    /// The best feasible solution seen during the whole solve.
    pub star: SolutionSummary,
    pub statistics: SolverStatistics,
    /// True if solving stopped because of [`SolverHandle::terminate_early`].
    pub terminated_early: bool,
}

impl SolveResult {
    pub fn profit(&self) -> i64 {
        self.star.profit
    }
}

/// Cloneable handle for stopping a running solve from another thread.
#[derive(Debug, Clone)]
pub struct SolverHandle {
    terminate_early_flag: Arc<AtomicBool>,
    solving: Arc<AtomicBool>,
}

impl SolverHandle {
    /// Requests early termination.
    ///
    /// Returns true if a solve was running. The solver stops at its next
    /// termination check, after the current phase pair.
    pub fn terminate_early(&self) -> bool {
        if self.solving.load(Ordering::SeqCst) {
            self.terminate_early_flag.store(true, Ordering::SeqCst);
            true
        } else {
            false
        }
    }

    pub fn is_solving(&self) -> bool {
        self.solving.load(Ordering::SeqCst)
    }
}

/// Runs the construction phase once, then alternates CC search and deep
/// optimize until the termination fires, tracking the star solution.
///
/// # Example
///
/// ```
/// use bmcp_config::SolverConfig;
/// use bmcp_core::InstanceBuilder;
/// use bmcp_solver::Solver;
///
/// let mut builder = InstanceBuilder::new(5);
/// let a = builder.add_item(2);
/// let b = builder.add_item(3);
/// let e = builder.add_element(7);
/// builder.cover(a, e).cover(b, e);
/// let instance = builder.build().unwrap();
///
/// let config = SolverConfig::new()
///     .with_random_seed(1)
///     .with_time_limit_secs(5)
///     .with_iteration_count_limit(2);
/// let result = Solver::new(config).solve(&instance);
/// assert_eq!(result.profit(), 7);
/// ```
pub struct Solver<T = ConfiguredTermination> {
    config: SolverConfig,
    termination: T,
    events: SolverEventSupport,
    terminate_early_flag: Arc<AtomicBool>,
    solving: Arc<AtomicBool>,
}

impl<T: Debug> Debug for Solver<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Solver")
            .field("config", &self.config)
            .field("termination", &self.termination)
            .field("events", &self.events)
            .finish()
    }
}

impl Solver<ConfiguredTermination> {
    pub fn new(config: SolverConfig) -> Self {
        let terminate_early_flag = Arc::new(AtomicBool::new(false));
        let termination = OrTermination((
            TimeTermination::new(config.time_limit()),
            config
                .termination
                .iteration_count_limit
                .map(IterationCountTermination::new),
            ExternalTermination::new(terminate_early_flag.clone()),
        ));
        Self {
            config,
            termination,
            events: SolverEventSupport::new(),
            terminate_early_flag,
            solving: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl<T: Termination> Solver<T> {
    /// Replaces the configured termination.
    ///
    /// Early termination through [`SolverHandle`] keeps working.
    pub fn with_termination<U: Termination>(
        self,
        termination: U,
    ) -> Solver<OrTermination<(U, ExternalTermination)>> {
        let external = ExternalTermination::new(self.terminate_early_flag.clone());
        Solver {
            config: self.config,
            termination: OrTermination((termination, external)),
            events: self.events,
            terminate_early_flag: self.terminate_early_flag,
            solving: self.solving,
        }
    }

    pub fn add_solver_listener(&mut self, listener: Arc<dyn SolverEventListener>) {
        self.events.add_solver_listener(listener);
    }

    pub fn add_phase_listener(&mut self, listener: Arc<dyn PhaseLifecycleListener>) {
        self.events.add_phase_listener(listener);
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn handle(&self) -> SolverHandle {
        SolverHandle {
            terminate_early_flag: self.terminate_early_flag.clone(),
            solving: self.solving.clone(),
        }
    }

    /// Solves an instance with a scope seeded from the configuration.
    pub fn solve(&mut self, instance: &Instance) -> SolveResult {
        let mut solver_scope = SolverScope::from_config(instance, &self.config);
        self.solve_with_scope(&mut solver_scope)
    }

    /// Solves with a caller-provided scope.
    pub fn solve_with_scope(&mut self, solver_scope: &mut SolverScope<'_>) -> SolveResult {
        self.solving.store(true, Ordering::SeqCst);
        self.terminate_early_flag.store(false, Ordering::SeqCst);

        let result = self.run(solver_scope);

        self.solving.store(false, Ordering::SeqCst);
        result
    }

    fn run(&mut self, solver_scope: &mut SolverScope<'_>) -> SolveResult {
        let instance = solver_scope.instance();
        info!(
            event = "solve_start",
            item_count = instance.item_count(),
            element_count = instance.element_count(),
            edge_count = instance.edge_count(),
            capacity = instance.capacity(),
            time_limit_ms = self.config.time_limit().as_millis() as u64,
        );
        self.events.fire_solving_started(instance);
        solver_scope.start_solving();

        let mut construction = GreedyConstructionPhase::new();
        let mut cc_search = ConfigurationCheckingPhase::new(self.config.cc_search.clone());
        let mut deep_optimize = TabuDeepOptimizePhase::new(self.config.deep_optimize.clone());

        self.run_phase(&mut construction, 0, solver_scope);
        while !self.termination.is_terminated(solver_scope) {
            self.update_star(solver_scope);
            let iteration = solver_scope.increment_iteration();
            debug!(
                event = "iteration",
                iteration = iteration,
                score = solver_scope.ledger().star().profit_sum(),
            );

            self.run_phase(&mut cc_search, 1, solver_scope);
            solver_scope.ledger_mut().restore_from_best();
            self.update_star(solver_scope);

            self.run_phase(&mut deep_optimize, 2, solver_scope);
            solver_scope.ledger_mut().restore_from_best();
        }
        // the last deep optimize run is otherwise never compared
        self.update_star(solver_scope);

        if self.config.environment_mode.is_asserted() {
            assert_ledger(solver_scope, "solve end");
        }

        let terminated_early = self.terminate_early_flag.load(Ordering::SeqCst);
        let mut statistics = std::mem::take(solver_scope.statistics_mut());
        statistics.total_duration = solver_scope.elapsed().unwrap_or_default();
        statistics.total_iterations = solver_scope.total_iterations();
        let star = solver_scope.ledger().star().to_summary();

        info!(
            event = "solve_end",
            score = star.profit,
            weight = star.weight,
            size = star.size(),
            iterations = statistics.total_iterations,
            duration_ms = statistics.total_duration.as_millis() as u64,
            terminated_early = terminated_early,
        );
        self.events.fire_solving_ended(&star, terminated_early);

        SolveResult {
            star,
            statistics,
            terminated_early,
        }
    }

    fn run_phase<P: Phase>(
        &self,
        phase: &mut P,
        phase_index: usize,
        solver_scope: &mut SolverScope<'_>,
    ) {
        let phase_type = phase.phase_type_name();
        self.events.fire_phase_started(phase_index, phase_type);
        phase.solve(solver_scope);
        self.events.fire_phase_ended(phase_index, phase_type);

        if self.config.environment_mode.is_full_assert() {
            assert_ledger(solver_scope, phase_type);
        }
    }

    /// Snapshots the live solution to star on a strict improvement and
    /// reports it.
    fn update_star(&self, solver_scope: &mut SolverScope<'_>) {
        if !solver_scope.ledger_mut().update_star() {
            return;
        }
        let elapsed = solver_scope.elapsed().unwrap_or_default();
        let record = ProgressRecord::new(
            elapsed.as_secs_f64(),
            solver_scope.total_iterations(),
            solver_scope.ledger().star().profit_sum(),
        );
        info!(
            event = "progress",
            elapsed_ms = elapsed.as_millis() as u64,
            iteration = record.iteration,
            score = record.profit,
            weight = solver_scope.ledger().star().weight_sum(),
        );
        solver_scope.statistics_mut().record_progress(record);
        self.events
            .fire_best_solution_changed(&record, solver_scope.ledger().star());
    }
}

fn assert_ledger(solver_scope: &SolverScope<'_>, checkpoint: &str) {
    if let Err(err) = solver_scope.ledger().audit() {
        panic!("ledger audit failed after {checkpoint}: {err}");
    }
}

#[cfg(test)]
#[path = "solver_tests.rs"]
mod tests;
