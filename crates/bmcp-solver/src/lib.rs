//! BMCP Solver Engine
//!
//! This crate provides the metaheuristic for the Budgeted Maximum Coverage
//! Problem:
//! - [`CoverageLedger`]: incremental coverage and contribution bookkeeping
//! - Phases: greedy construction, configuration-checking search and tabu
//!   deep optimization
//! - [`Solver`]: the time-bounded driver tracking the star solution
//! - Termination conditions
//! - Event system for monitoring

pub mod bandit;
pub mod conf_change;
pub mod event;
pub mod in_solution;
pub mod ledger;
pub mod phase;
pub mod scope;
pub mod solver;
pub mod state;
pub mod statistics;
pub mod termination;

pub use bandit::Bandit;
pub use conf_change::{ConfChangeTracker, Side};
pub use event::{
    CountingEventListener, PhaseLifecycleListener, ProgressCollector, ProgressRecord,
    SolverEventListener, SolverEventSupport,
};
pub use in_solution::InSolutionSet;
pub use ledger::{CoverageLedger, LedgerInconsistency};
pub use phase::{
    ConfigurationCheckingPhase, GreedyConstructionPhase, Phase, TabuDeepOptimizePhase,
};
pub use scope::SolverScope;
pub use solver::{ConfiguredTermination, SolveResult, Solver, SolverHandle};
pub use state::SolutionState;
pub use statistics::{PhaseStats, PhaseTotals, SolverStatistics};
pub use termination::{
    ExternalTermination, IterationCountTermination, OrTermination, Termination, TimeTermination,
};
