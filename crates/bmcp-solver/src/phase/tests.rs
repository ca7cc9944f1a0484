//! Tests for the solver phases.

use bmcp_config::{CcSearchConfig, DeepOptimizeConfig};
use bmcp_core::{Instance, InstanceBuilder};
use bmcp_test::fixtures::{
    random_instance, single_item_instance, three_item_instance, zero_capacity_instance,
};

use super::*;
use crate::conf_change::Side;
use crate::scope::SolverScope;

fn constructed(instance: &Instance) -> SolverScope<'_> {
    let mut scope = SolverScope::with_seed(instance, 17);
    GreedyConstructionPhase::new().solve(&mut scope);
    scope
}

#[test]
fn test_is_denser_cross_multiplies() {
    assert!(is_denser(10, 3, 5, 2));
    assert!(!is_denser(5, 2, 10, 4));
    // equal densities are not strictly denser
    assert!(!is_denser(4, 2, 2, 1));
    // zero weight counts as infinitely dense
    assert!(is_denser(1, 0, 100, 1));
    assert!(is_denser(i64::MAX, 1, i64::MAX, 2));
}

#[test]
fn test_construction_three_items() {
    let instance = three_item_instance();
    let scope = constructed(&instance);
    let state = scope.ledger().current();

    assert_eq!(state.selected_items().collect::<Vec<_>>(), vec![1]);
    assert_eq!(state.profit_sum(), 10);
    assert_eq!(state.weight_sum(), 3);
    assert_eq!(scope.statistics().construction_profit, 10);
    assert!(scope.ledger().audit().is_ok());
}

#[test]
fn test_construction_zero_capacity() {
    let instance = zero_capacity_instance();
    let scope = constructed(&instance);
    let state = scope.ledger().current();
    assert_eq!(state.size(), 0);
    assert_eq!(state.profit_sum(), 0);
    assert_eq!(state.weight_sum(), 0);
}

#[test]
fn test_construction_single_item_fills_capacity() {
    let instance = single_item_instance();
    let scope = constructed(&instance);
    let state = scope.ledger().current();
    assert!(state.is_selected(0));
    assert_eq!(state.profit_sum(), 12);
    assert_eq!(state.weight_sum(), instance.capacity());
}

#[test]
fn test_construction_drops_redundant_items() {
    let mut builder = InstanceBuilder::new(10);
    let a = builder.add_item(1);
    let b = builder.add_item(4);
    let e0 = builder.add_element(4);
    let e1 = builder.add_element(12);
    builder.cover(a, e0).cover(b, e0).cover(b, e1);
    let instance = builder.build().unwrap();

    let scope = constructed(&instance);
    let state = scope.ledger().current();
    // a wins the initial tie on index, then b makes it redundant
    assert_eq!(state.selected_items().collect::<Vec<_>>(), vec![b]);
    assert_eq!(state.profit_sum(), 16);
    let totals = scope.statistics().phase("GreedyConstruction").unwrap();
    assert_eq!(totals.additions, 2);
    assert_eq!(totals.removals, 1);
}

#[test]
fn test_construction_resets_tracker_and_bandit() {
    let instance = three_item_instance();
    let mut scope = SolverScope::with_seed(&instance, 3);
    scope.ledger_mut().add_item_with_conf_change(2, 9);
    scope.bandit_mut().record(0, 50.0);

    GreedyConstructionPhase::new().solve(&mut scope);

    let tracker = scope.ledger().tracker();
    for item in instance.items() {
        assert_eq!(tracker.counter(item, Side::InSolution), 0);
        assert_eq!(tracker.origin(item, Side::InSolution), 1);
        assert_eq!(tracker.counter(item, Side::OutOfSolution), 0);
        assert_eq!(tracker.origin(item, Side::OutOfSolution), 1);
        assert_eq!(tracker.last_toggle(item), 0);
    }
    assert_eq!(scope.bandit().select_times(1), 1);
    assert_eq!(scope.bandit().select_times(0), 0);
    assert_eq!(scope.bandit().reward_sum(1), 10.0);
}

#[test]
fn test_cc_search_keeps_best_feasible() {
    let instance = random_instance(21, 60, 90, 0.08);
    let mut scope = constructed(&instance);
    let start = scope.ledger().current().profit_sum();

    let mut phase = ConfigurationCheckingPhase::new(CcSearchConfig {
        iteration_limit: 300,
        ..CcSearchConfig::default()
    });
    phase.solve(&mut scope);

    let ledger = scope.ledger();
    assert!(ledger.best().is_feasible(instance.capacity()));
    assert!(ledger.best().profit_sum() >= start);
    assert!(ledger.audit().is_ok());
    assert!(ledger.best().audit(&instance).is_ok());
    assert_eq!(scope.statistics().phase("CcSearch").unwrap().steps, 300);

    scope.ledger_mut().restore_from_best();
    assert!(scope.ledger().is_feasible());
}

#[test]
fn test_cc_search_three_items_reaches_optimum() {
    let instance = three_item_instance();
    let mut scope = constructed(&instance);
    let mut phase = ConfigurationCheckingPhase::new(CcSearchConfig {
        iteration_limit: 50,
        ..CcSearchConfig::default()
    });
    phase.solve(&mut scope);
    assert_eq!(scope.ledger().best().profit_sum(), 10);
    assert!(scope.ledger().best().weight_sum() <= 5);
}

#[test]
fn test_deep_optimize_keeps_best_feasible_and_rebuilds_counters() {
    let instance = random_instance(33, 50, 80, 0.1);
    let mut scope = constructed(&instance);
    ConfigurationCheckingPhase::new(CcSearchConfig {
        iteration_limit: 100,
        ..CcSearchConfig::default()
    })
    .solve(&mut scope);
    scope.ledger_mut().restore_from_best();
    let start = scope.ledger().current().profit_sum();

    let mut phase = TabuDeepOptimizePhase::new(DeepOptimizeConfig {
        iteration_limit: 200,
        block_list_size: 5,
        ..DeepOptimizeConfig::default()
    });
    phase.solve(&mut scope);

    let ledger = scope.ledger();
    assert!(ledger.best().is_feasible(instance.capacity()));
    assert!(ledger.best().profit_sum() >= start);
    assert!(ledger.audit().is_ok());

    let state = ledger.current();
    for item in instance.items() {
        let side = if state.is_selected(item) {
            Side::InSolution
        } else {
            Side::OutOfSolution
        };
        let wanted = if state.is_selected(item) { 1 } else { 0 };
        let expected = instance
            .item_neighbors(item)
            .iter()
            .filter(|&&e| state.coverage(e) == wanted)
            .count() as i64;
        assert_eq!(ledger.tracker().counter(item, side), expected, "item {item}");
        assert_eq!(ledger.tracker().origin(item, side), expected, "item {item}");
    }
}

#[test]
fn test_deep_optimize_zero_capacity_is_a_no_op() {
    let instance = zero_capacity_instance();
    let mut scope = constructed(&instance);
    TabuDeepOptimizePhase::new(DeepOptimizeConfig::default()).solve(&mut scope);
    scope.ledger_mut().restore_from_best();
    assert_eq!(scope.ledger().current().size(), 0);
    assert_eq!(scope.ledger().best().profit_sum(), 0);
}

fn deep(iteration_limit: u64, tabu_length: u64, block_list_size: usize) -> TabuDeepOptimizePhase {
    TabuDeepOptimizePhase::new(DeepOptimizeConfig {
        iteration_limit,
        tabu_length,
        block_list_size,
    })
}

#[test]
fn test_deep_optimize_tenure_starts_at_iteration_zero() {
    let instance = single_item_instance();
    let mut scope = constructed(&instance);

    deep(1, 10, 10).solve(&mut scope);

    // the full knapsack would be evicted if item 0 were not tabu yet
    let state = scope.ledger().current();
    assert!(state.is_selected(0));
    assert_eq!(state.size(), 1);
    assert_eq!(scope.statistics().phase("DeepOptimize").unwrap().removals, 0);
}

#[test]
fn test_deep_optimize_never_evicts_pinned_items() {
    let mut builder = InstanceBuilder::new(4);
    let a = builder.add_item(4);
    let b = builder.add_item(4);
    let e0 = builder.add_element(1);
    let e1 = builder.add_element(10);
    builder.cover(a, e0).cover(b, e1);
    let instance = builder.build().unwrap();

    let mut scope = constructed(&instance);
    assert_eq!(scope.ledger().current().selected_items().collect::<Vec<_>>(), vec![b]);

    // e0 is uncovered, so a is pinned and the overweight knapsack must drop b
    deep(5, 0, 10).solve(&mut scope);

    let state = scope.ledger().current();
    assert!(state.is_selected(a));
    assert!(!state.is_selected(b));
    assert_eq!(scope.ledger().best().profit_sum(), 10);
    let totals = scope.statistics().phase("DeepOptimize").unwrap();
    assert_eq!(totals.additions, 1);
    assert_eq!(totals.removals, 1);
}

fn redundant_pair() -> Instance {
    let mut builder = InstanceBuilder::new(10);
    let a = builder.add_item(5);
    let b = builder.add_item(5);
    let e0 = builder.add_element(10);
    builder.cover(a, e0).cover(b, e0);
    builder.build().unwrap()
}

#[test]
fn test_deep_optimize_skips_tabu_items_when_filling() {
    let instance = redundant_pair();

    let mut scope = constructed(&instance);
    assert_eq!(scope.ledger().current().selected_items().collect::<Vec<_>>(), vec![0]);
    deep(1, 10, 0).solve(&mut scope);
    let totals = scope.statistics().phase("DeepOptimize").unwrap();
    assert_eq!(totals.additions, 0);
    assert!(!scope.ledger().current().is_selected(1));

    // without tenure the regular fill takes item 1
    let mut scope = constructed(&instance);
    deep(1, 0, 0).solve(&mut scope);
    let totals = scope.statistics().phase("DeepOptimize").unwrap();
    assert_eq!(totals.additions, 1);
}

#[test]
fn test_deep_optimize_aspiration_overrides_tabu() {
    let mut builder = InstanceBuilder::new(5);
    let a = builder.add_item(2);
    let spare = builder.add_item(2);
    let e0 = builder.add_element(5);
    builder.cover(a, e0);
    let instance = builder.build().unwrap();

    // empty start: a beats the phase best while every item is still tabu
    let mut scope = SolverScope::with_seed(&instance, 5);
    deep(1, 100, 0).solve(&mut scope);

    let state = scope.ledger().current();
    assert!(state.is_selected(a));
    assert!(!state.is_selected(spare));
    assert_eq!(scope.ledger().best().profit_sum(), 5);
}
