//! Outer-iteration-count termination.

use super::Termination;
use crate::scope::SolverScope;

/// Terminates after a number of outer solver iterations.
///
/// Each iteration is one CC search run followed by one deep optimize run.
#[derive(Debug, Clone)]
pub struct IterationCountTermination {
    limit: u64,
}

impl IterationCountTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl Termination for IterationCountTermination {
    fn is_terminated(&self, solver_scope: &SolverScope<'_>) -> bool {
        solver_scope.total_iterations() >= self.limit
    }
}
