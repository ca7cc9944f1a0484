//! Event system for solver monitoring.
//!
//! Listeners registered on a [`SolverEventSupport`] are called synchronously,
//! in registration order, on the solving thread.
//!
//! # Event Types
//!
//! - **Solver Events**: star improved, solving started/ended
//! - **Phase Events**: phase started, phase ended
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use bmcp_solver::event::{ProgressCollector, SolverEventSupport};
//!
//! let collector = Arc::new(ProgressCollector::new());
//! let mut support = SolverEventSupport::new();
//! support.add_solver_listener(collector.clone());
//! assert_eq!(support.solver_listener_count(), 1);
//! assert!(collector.records().is_empty());
//! ```

use std::fmt::{self, Debug, Display};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use bmcp_core::{Instance, SolutionSummary};

use crate::state::SolutionState;

/// One star improvement: seconds since the start, the outer iteration and
/// the new star profit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressRecord {
    pub elapsed_secs: f64,
    pub iteration: u64,
    pub profit: i64,
}

impl ProgressRecord {
    pub fn new(elapsed_secs: f64, iteration: u64, profit: i64) -> Self {
        Self {
            elapsed_secs,
            iteration,
            profit,
        }
    }
}

impl Display for ProgressRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.6} {} {}",
            self.elapsed_secs, self.iteration, self.profit
        )
    }
}

/// Listener for solver-level events.
pub trait SolverEventListener: Send + Sync + Debug {
    /// Called whenever the star solution strictly improves.
    ///
    /// # Arguments
    ///
    /// * `record` - Elapsed time, outer iteration and new star profit
    /// * `star` - The new star snapshot
    fn on_best_solution_changed(&self, record: &ProgressRecord, star: &SolutionState);

    /// Called when solving starts.
    fn on_solving_started(&self, _instance: &Instance) {}

    /// Called when solving ends.
    fn on_solving_ended(&self, _star: &SolutionSummary, _is_terminated_early: bool) {}
}

/// Listener for phase lifecycle events.
pub trait PhaseLifecycleListener: Send + Sync + Debug {
    /// Called when a phase run starts.
    ///
    /// # Arguments
    ///
    /// * `phase_index` - 0 for construction, 1 for CC search, 2 for deep optimize
    /// * `phase_type` - The type name of the phase
    fn on_phase_started(&self, phase_index: usize, phase_type: &str);

    /// Called when a phase run ends.
    fn on_phase_ended(&self, phase_index: usize, phase_type: &str);
}

/// Central event broadcaster.
#[derive(Default)]
pub struct SolverEventSupport {
    solver_listeners: Vec<Arc<dyn SolverEventListener>>,
    phase_listeners: Vec<Arc<dyn PhaseLifecycleListener>>,
}

impl SolverEventSupport {
    pub fn new() -> Self {
        Self::default()
    }

    // === Listener Registration ===

    pub fn add_solver_listener(&mut self, listener: Arc<dyn SolverEventListener>) {
        self.solver_listeners.push(listener);
    }

    pub fn add_phase_listener(&mut self, listener: Arc<dyn PhaseLifecycleListener>) {
        self.phase_listeners.push(listener);
    }

    pub fn clear_listeners(&mut self) {
        self.solver_listeners.clear();
        self.phase_listeners.clear();
    }

    // === Event Firing ===

    pub fn fire_best_solution_changed(&self, record: &ProgressRecord, star: &SolutionState) {
        for listener in &self.solver_listeners {
            listener.on_best_solution_changed(record, star);
        }
    }

    pub fn fire_solving_started(&self, instance: &Instance) {
        for listener in &self.solver_listeners {
            listener.on_solving_started(instance);
        }
    }

    pub fn fire_solving_ended(&self, star: &SolutionSummary, is_terminated_early: bool) {
        for listener in &self.solver_listeners {
            listener.on_solving_ended(star, is_terminated_early);
        }
    }

    pub fn fire_phase_started(&self, phase_index: usize, phase_type: &str) {
        for listener in &self.phase_listeners {
            listener.on_phase_started(phase_index, phase_type);
        }
    }

    pub fn fire_phase_ended(&self, phase_index: usize, phase_type: &str) {
        for listener in &self.phase_listeners {
            listener.on_phase_ended(phase_index, phase_type);
        }
    }

    // === Query Methods ===

    pub fn solver_listener_count(&self) -> usize {
        self.solver_listeners.len()
    }

    pub fn phase_listener_count(&self) -> usize {
        self.phase_listeners.len()
    }

    pub fn has_listeners(&self) -> bool {
        !self.solver_listeners.is_empty() || !self.phase_listeners.is_empty()
    }
}

impl Debug for SolverEventSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolverEventSupport")
            .field("solver_listeners", &self.solver_listeners.len())
            .field("phase_listeners", &self.phase_listeners.len())
            .finish()
    }
}

/// Keeps every progress record it receives.
#[derive(Debug, Default)]
pub struct ProgressCollector {
    records: Mutex<Vec<ProgressRecord>>,
}

impl ProgressCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies out the records received so far.
    pub fn records(&self) -> Vec<ProgressRecord> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl SolverEventListener for ProgressCollector {
    fn on_best_solution_changed(&self, record: &ProgressRecord, _star: &SolutionState) {
        match self.records.lock() {
            Ok(mut records) => records.push(*record),
            Err(poisoned) => poisoned.into_inner().push(*record),
        }
    }
}

/// A counting listener that tracks event occurrences.
///
/// Useful for testing.
#[derive(Debug, Default)]
pub struct CountingEventListener {
    best_solution_count: AtomicUsize,
    solving_started_count: AtomicUsize,
    solving_ended_count: AtomicUsize,
    phase_started_count: AtomicUsize,
    phase_ended_count: AtomicUsize,
}

impl CountingEventListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn best_solution_count(&self) -> usize {
        self.best_solution_count.load(Ordering::SeqCst)
    }

    pub fn solving_started_count(&self) -> usize {
        self.solving_started_count.load(Ordering::SeqCst)
    }

    pub fn solving_ended_count(&self) -> usize {
        self.solving_ended_count.load(Ordering::SeqCst)
    }

    pub fn phase_started_count(&self) -> usize {
        self.phase_started_count.load(Ordering::SeqCst)
    }

    pub fn phase_ended_count(&self) -> usize {
        self.phase_ended_count.load(Ordering::SeqCst)
    }
}

impl SolverEventListener for CountingEventListener {
    fn on_best_solution_changed(&self, _record: &ProgressRecord, _star: &SolutionState) {
        self.best_solution_count.fetch_add(1, Ordering::SeqCst);
    }

    fn on_solving_started(&self, _instance: &Instance) {
        self.solving_started_count.fetch_add(1, Ordering::SeqCst);
    }

    fn on_solving_ended(&self, _star: &SolutionSummary, _is_terminated_early: bool) {
        self.solving_ended_count.fetch_add(1, Ordering::SeqCst);
    }
}

impl PhaseLifecycleListener for CountingEventListener {
    fn on_phase_started(&self, _phase_index: usize, _phase_type: &str) {
        self.phase_started_count.fetch_add(1, Ordering::SeqCst);
    }

    fn on_phase_ended(&self, _phase_index: usize, _phase_type: &str) {
        self.phase_ended_count.fetch_add(1, Ordering::SeqCst);
    }
}
