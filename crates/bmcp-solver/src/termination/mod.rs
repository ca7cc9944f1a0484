//! Termination conditions for the solve loop.
//!
//! Checked once per outer iteration, before the next CC search and deep
//! optimize pair starts.

mod composite;
mod external;
mod iteration_count;
mod time;

use std::fmt::Debug;

use crate::scope::SolverScope;

pub use composite::OrTermination;
pub use external::ExternalTermination;
pub use iteration_count::IterationCountTermination;
pub use time::TimeTermination;

/// Trait for determining when to stop solving.
pub trait Termination: Send + Debug {
    /// Returns true if solving should terminate.
    fn is_terminated(&self, solver_scope: &SolverScope<'_>) -> bool;
}

/// An absent termination never fires.
impl<T: Termination> Termination for Option<T> {
    fn is_terminated(&self, solver_scope: &SolverScope<'_>) -> bool {
        self.as_ref()
            .is_some_and(|t| t.is_terminated(solver_scope))
    }
}

#[cfg(test)]
mod tests;
