//! Tests for termination conditions.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bmcp_test::fixtures::three_item_instance;

use super::*;
use crate::scope::SolverScope;

#[test]
fn test_time_termination() {
    let instance = three_item_instance();
    let mut scope = SolverScope::with_seed(&instance, 0);
    let term = TimeTermination::new(Duration::ZERO);

    // clock not started
    assert!(!term.is_terminated(&scope));
    scope.start_solving();
    assert!(term.is_terminated(&scope));
    assert!(!TimeTermination::seconds(3600).is_terminated(&scope));
}

#[test]
fn test_iteration_count_termination() {
    let instance = three_item_instance();
    let mut scope = SolverScope::with_seed(&instance, 0);
    let term = IterationCountTermination::new(2);

    assert!(!term.is_terminated(&scope));
    scope.increment_iteration();
    assert!(!term.is_terminated(&scope));
    scope.increment_iteration();
    assert!(term.is_terminated(&scope));
}

#[test]
fn test_external_termination() {
    let instance = three_item_instance();
    let scope = SolverScope::with_seed(&instance, 0);
    let flag = Arc::new(AtomicBool::new(false));
    let term = ExternalTermination::new(flag.clone());

    assert!(!term.is_terminated(&scope));
    flag.store(true, Ordering::SeqCst);
    assert!(term.is_terminated(&scope));
}

#[test]
fn test_or_termination_and_option() {
    let instance = three_item_instance();
    let mut scope = SolverScope::with_seed(&instance, 0);
    scope.start_solving();

    let none: Option<IterationCountTermination> = None;
    assert!(!none.is_terminated(&scope));

    let term = OrTermination((TimeTermination::seconds(3600), none));
    assert!(!term.is_terminated(&scope));

    let term = OrTermination::new((
        TimeTermination::seconds(3600),
        Some(IterationCountTermination::new(1)),
    ));
    assert!(!term.is_terminated(&scope));
    scope.increment_iteration();
    assert!(term.is_terminated(&scope));
}
