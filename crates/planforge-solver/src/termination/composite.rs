//! Composite termination conditions (AND/OR).
//!
//! Tuples of terminations get macro-generated implementations; a
//! `Vec<Box<dyn Termination>>` covers lists built from configuration.

use planforge_core::domain::PlanningSolution;
use planforge_scoring::ScoreDirector;

use super::Termination;
use crate::scope::{PhaseScope, SolverScope};

/// Terminates when ANY child terminates.
///
/// The time gradient is the highest child gradient.
///
/// # Examples
///
/// ```
/// use planforge_solver::termination::{OrTermination, StepCountTermination, TimeTermination};
/// use std::time::Duration;
///
/// // Terminate after 30 seconds OR 1000 steps
/// let termination = OrTermination((
///     TimeTermination::new(Duration::from_secs(30)),
///     StepCountTermination::new(1000),
/// ));
/// ```
#[derive(Debug)]
pub struct OrTermination<T>(pub T);

impl<T> OrTermination<T> {
    pub fn new(terminations: T) -> Self {
        Self(terminations)
    }
}

/// Terminates when ALL children terminate.
///
/// The time gradient is the lowest child gradient.
///
/// # Examples
///
/// ```
/// use planforge_solver::termination::{
///     AndTermination, BestScoreFeasibleTermination, StepCountTermination,
/// };
/// use planforge_test::task::TaskSolution;
///
/// // Terminate only when the score is feasible AND 100 steps passed
/// let termination = AndTermination((
///     BestScoreFeasibleTermination::<TaskSolution>::new(),
///     StepCountTermination::new(100),
/// ));
/// ```
#[derive(Debug)]
pub struct AndTermination<T>(pub T);

impl<T> AndTermination<T> {
    pub fn new(terminations: T) -> Self {
        Self(terminations)
    }
}

macro_rules! impl_composite_termination {
    ($($idx:tt: $T:ident),+) => {
        impl<S, D, $($T),+> Termination<S, D> for OrTermination<($($T,)+)>
        where
            S: PlanningSolution,
            D: ScoreDirector<S>,
            $($T: Termination<S, D>,)+
        {
            fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
                false $(|| (self.0).$idx.is_solver_terminated(solver_scope))+
            }

            fn is_phase_terminated(&self, phase_scope: &PhaseScope<'_, S, D>) -> bool {
                false $(|| (self.0).$idx.is_phase_terminated(phase_scope))+
            }

            fn calculate_solver_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64 {
                0.0_f64 $(.max((self.0).$idx.calculate_solver_time_gradient(solver_scope)))+
            }

            fn calculate_phase_time_gradient(&self, phase_scope: &PhaseScope<'_, S, D>) -> f64 {
                0.0_f64 $(.max((self.0).$idx.calculate_phase_time_gradient(phase_scope)))+
            }
        }

        impl<S, D, $($T),+> Termination<S, D> for AndTermination<($($T,)+)>
        where
            S: PlanningSolution,
            D: ScoreDirector<S>,
            $($T: Termination<S, D>,)+
        {
            fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
                true $(&& (self.0).$idx.is_solver_terminated(solver_scope))+
            }

            fn is_phase_terminated(&self, phase_scope: &PhaseScope<'_, S, D>) -> bool {
                true $(&& (self.0).$idx.is_phase_terminated(phase_scope))+
            }

            fn calculate_solver_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64 {
                1.0_f64 $(.min((self.0).$idx.calculate_solver_time_gradient(solver_scope)))+
            }

            fn calculate_phase_time_gradient(&self, phase_scope: &PhaseScope<'_, S, D>) -> f64 {
                1.0_f64 $(.min((self.0).$idx.calculate_phase_time_gradient(phase_scope)))+
            }
        }
    };
}

impl_composite_termination!(0: T0);
impl_composite_termination!(0: T0, 1: T1);
impl_composite_termination!(0: T0, 1: T1, 2: T2);
impl_composite_termination!(0: T0, 1: T1, 2: T2, 3: T3);
impl_composite_termination!(0: T0, 1: T1, 2: T2, 3: T3, 4: T4);
impl_composite_termination!(0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5);
impl_composite_termination!(0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5, 6: T6);
impl_composite_termination!(0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5, 6: T6, 7: T7);

impl<S, D> Termination<S, D> for OrTermination<Vec<Box<dyn Termination<S, D>>>>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
{
    fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        self.0.iter().any(|t| t.is_solver_terminated(solver_scope))
    }

    fn is_phase_terminated(&self, phase_scope: &PhaseScope<'_, S, D>) -> bool {
        self.0.iter().any(|t| t.is_phase_terminated(phase_scope))
    }

    fn calculate_solver_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64 {
        self.0
            .iter()
            .map(|t| t.calculate_solver_time_gradient(solver_scope))
            .fold(0.0, f64::max)
    }

    fn calculate_phase_time_gradient(&self, phase_scope: &PhaseScope<'_, S, D>) -> f64 {
        self.0
            .iter()
            .map(|t| t.calculate_phase_time_gradient(phase_scope))
            .fold(0.0, f64::max)
    }
}

impl<S, D> Termination<S, D> for AndTermination<Vec<Box<dyn Termination<S, D>>>>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
{
    fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        !self.0.is_empty() && self.0.iter().all(|t| t.is_solver_terminated(solver_scope))
    }

    fn is_phase_terminated(&self, phase_scope: &PhaseScope<'_, S, D>) -> bool {
        !self.0.is_empty() && self.0.iter().all(|t| t.is_phase_terminated(phase_scope))
    }

    fn calculate_solver_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        self.0
            .iter()
            .map(|t| t.calculate_solver_time_gradient(solver_scope))
            .fold(1.0, f64::min)
    }

    fn calculate_phase_time_gradient(&self, phase_scope: &PhaseScope<'_, S, D>) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        self.0
            .iter()
            .map(|t| t.calculate_phase_time_gradient(phase_scope))
            .fold(1.0, f64::min)
    }
}
