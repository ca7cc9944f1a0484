//! OR composition of terminations.
//!
//! Uses macro-generated tuple implementations, no boxing.

use super::Termination;
use crate::scope::SolverScope;

/// Terminates when ANY child terminates.
///
/// # Examples
///
/// ```
/// use bmcp_solver::termination::{IterationCountTermination, OrTermination, TimeTermination};
///
/// // 30 seconds or 1000 outer iterations, whichever comes first
/// let termination = OrTermination((
///     TimeTermination::seconds(30),
///     IterationCountTermination::new(1000),
/// ));
/// ```
#[derive(Debug, Clone)]
pub struct OrTermination<T>(pub T);

impl<T> OrTermination<T> {
    pub fn new(terminations: T) -> Self {
        Self(terminations)
    }
}

macro_rules! impl_or_termination {
    ($($idx:tt: $T:ident),+) => {
        impl<$($T),+> Termination for OrTermination<($($T,)+)>
        where
            $($T: Termination,)+
        {
            fn is_terminated(&self, solver_scope: &SolverScope<'_>) -> bool {
                $((self.0).$idx.is_terminated(solver_scope))||+
            }
        }
    };
}

impl_or_termination!(0: T0);
impl_or_termination!(0: T0, 1: T1);
impl_or_termination!(0: T0, 1: T1, 2: T2);
impl_or_termination!(0: T0, 1: T1, 2: T2, 3: T3);
