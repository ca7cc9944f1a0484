//! Tests for the solve driver.

use std::sync::Arc;

use bmcp_config::{EnvironmentMode, SolverConfig};
use bmcp_core::SolutionSummary;
use bmcp_test::fixtures::{
    random_instance, single_item_instance, three_item_instance, zero_capacity_instance,
};

use super::*;
use crate::event::{CountingEventListener, ProgressCollector};
use crate::termination::IterationCountTermination;

fn capped(iterations: u64) -> SolverConfig {
    SolverConfig::new()
        .with_random_seed(42)
        .with_time_limit_secs(60)
        .with_iteration_count_limit(iterations)
}

#[test]
fn test_three_items_reach_optimum() {
    let instance = three_item_instance();
    let result = Solver::new(capped(3)).solve(&instance);

    assert_eq!(result.profit(), 10);
    assert!(result.star.weight <= instance.capacity());
    assert_eq!(instance.evaluate(&result.star.items).unwrap(), result.star);
    assert_eq!(result.statistics.total_iterations, 3);
    assert!(!result.terminated_early);
}

#[test]
fn test_zero_capacity_returns_empty_star() {
    let instance = zero_capacity_instance();
    let result = Solver::new(capped(2)).solve(&instance);
    assert_eq!(result.star, SolutionSummary::default());
    assert!(result.statistics.progress.is_empty());
}

#[test]
fn test_single_item_needs_no_search() {
    let instance = single_item_instance();
    let config = SolverConfig::new()
        .with_random_seed(1)
        .with_time_limit_millis(0);
    let result = Solver::new(config).solve(&instance);

    assert_eq!(result.star.items, vec![0]);
    assert_eq!(result.profit(), 12);
    assert_eq!(result.star.weight, instance.capacity());
    assert_eq!(result.statistics.total_iterations, 0);
    assert_eq!(result.statistics.construction_profit, 12);
}

#[test]
fn test_star_improves_monotonically() {
    let instance = random_instance(99, 80, 120, 0.06);
    let collector = Arc::new(ProgressCollector::new());
    let mut solver = Solver::new(capped(4));
    solver.add_solver_listener(collector.clone());

    let result = solver.solve(&instance);
    let records = collector.records();

    assert!(!records.is_empty());
    for pair in records.windows(2) {
        assert!(pair[0].profit < pair[1].profit);
        assert!(pair[0].elapsed_secs <= pair[1].elapsed_secs);
        assert!(pair[0].iteration <= pair[1].iteration);
    }
    assert_eq!(records.last().map(|r| r.profit), Some(result.profit()));
    assert_eq!(result.statistics.final_profit(), Some(result.profit()));
    assert!(result.profit() >= result.statistics.construction_profit);

    let summary = instance.evaluate(&result.star.items).unwrap();
    assert_eq!(summary, result.star);
    assert!(summary.is_feasible(&instance));
}

#[test]
fn test_seeded_solves_are_reproducible() {
    let instance = random_instance(5, 50, 70, 0.1);
    let first = Solver::new(capped(3)).solve(&instance);
    let second = Solver::new(capped(3)).solve(&instance);
    assert_eq!(first.star, second.star);
}

#[test]
fn test_full_assert_audits_every_phase() {
    let instance = random_instance(8, 30, 40, 0.15);
    let config = capped(2).with_environment_mode(EnvironmentMode::FullAssert);
    let counter = Arc::new(CountingEventListener::new());
    let mut solver = Solver::new(config);
    solver.add_phase_listener(counter.clone());
    solver.add_solver_listener(counter.clone());

    let result = solver.solve(&instance);
    assert!(result.star.is_feasible(&instance));
    // construction plus two phases per iteration
    assert_eq!(counter.phase_started_count(), 5);
    assert_eq!(counter.phase_ended_count(), 5);
    assert_eq!(counter.solving_started_count(), 1);
    assert_eq!(counter.solving_ended_count(), 1);

    let cc = result.statistics.phase("CcSearch").unwrap();
    assert_eq!(cc.runs, 2);
    assert_eq!(result.statistics.phase("DeepOptimize").unwrap().runs, 2);
}

#[derive(Debug)]
struct StopOnFirstImprovement(SolverHandle);

impl SolverEventListener for StopOnFirstImprovement {
    fn on_best_solution_changed(&self, _record: &ProgressRecord, _star: &crate::SolutionState) {
        self.0.terminate_early();
    }
}

#[test]
fn test_terminate_early_through_handle() {
    let instance = three_item_instance();
    let config = SolverConfig::new()
        .with_random_seed(0)
        .with_time_limit_secs(3600);
    let mut solver = Solver::new(config);
    let handle = solver.handle();
    assert!(!handle.is_solving());
    assert!(!handle.terminate_early());

    solver.add_solver_listener(Arc::new(StopOnFirstImprovement(handle.clone())));
    let result = solver.solve(&instance);

    assert!(result.terminated_early);
    assert_eq!(result.statistics.total_iterations, 1);
    assert_eq!(result.profit(), 10);
    assert!(!handle.is_solving());
}

#[test]
fn test_custom_termination() {
    let instance = three_item_instance();
    let mut solver = Solver::new(SolverConfig::new().with_random_seed(3))
        .with_termination(IterationCountTermination::new(2));
    let result = solver.solve(&instance);
    assert_eq!(result.statistics.total_iterations, 2);
    assert_eq!(result.profit(), 10);
}
