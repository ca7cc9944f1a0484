//! Solver phases
//!
//! - GreedyConstructionPhase: builds the initial solution
//! - ConfigurationCheckingPhase: conf-change guarded add/drop search
//! - TabuDeepOptimizePhase: tabu fill/evict search around a pinned block

pub mod cc_search;
pub mod construction;
pub mod deep_optimize;

use std::fmt::Debug;
use std::time::Duration;

use bmcp_core::{Instance, ItemId};

use crate::scope::SolverScope;
use crate::state::SolutionState;

pub use cc_search::ConfigurationCheckingPhase;
pub use construction::GreedyConstructionPhase;
pub use deep_optimize::TabuDeepOptimizePhase;

/// A phase of the solving process.
///
/// Phases change the live solution only through the ledger in the solver
/// scope.
pub trait Phase: Send + Debug {
    /// Executes one run of this phase.
    fn solve(&mut self, solver_scope: &mut SolverScope<'_>);

    /// Returns the name of this phase type.
    fn phase_type_name(&self) -> &'static str;
}

/// Density comparison `ca / wa > cb / wb`, cross-multiplied.
#[inline]
pub(crate) fn is_denser(ca: i64, wa: i64, cb: i64, wb: i64) -> bool {
    i128::from(ca) * i128::from(wb) > i128::from(cb) * i128::from(wa)
}

/// Returns true if `item` is strictly denser than `incumbent` in `state`.
#[inline]
pub(crate) fn denser_than(
    instance: &Instance,
    state: &SolutionState,
    item: ItemId,
    incumbent: ItemId,
) -> bool {
    is_denser(
        state.contribution(item),
        instance.weight(item),
        state.contribution(incumbent),
        instance.weight(incumbent),
    )
}

/// Returns true if `item` is strictly sparser than `incumbent` in `state`.
#[inline]
pub(crate) fn sparser_than(
    instance: &Instance,
    state: &SolutionState,
    item: ItemId,
    incumbent: ItemId,
) -> bool {
    denser_than(instance, state, incumbent, item)
}

fn speed(toggles: u64, duration: Duration) -> u64 {
    let secs = duration.as_secs_f64();
    if secs > 0.0 {
        (toggles as f64 / secs) as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests;
