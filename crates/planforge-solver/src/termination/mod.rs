//! Termination conditions for the solver and its phases.
//!
//! A termination answers two questions at two levels: is the solver (or
//! the phase) done, and how far along is it. The second answer, the time
//! gradient, runs from 0.0 to 1.0 and drives acceptors such as simulated
//! annealing.

mod best_score;
mod composite;
mod step_count;
mod time;
mod unimproved;

use std::fmt::Debug;

use planforge_core::domain::PlanningSolution;
use planforge_scoring::ScoreDirector;

use crate::scope::{PhaseScope, SolverScope};

pub use best_score::{BestScoreFeasibleTermination, BestScoreTermination};
pub use composite::{AndTermination, OrTermination};
pub use step_count::StepCountTermination;
pub use time::TimeTermination;
pub use unimproved::UnimprovedStepCountTermination;

/// Trait for determining when to stop solving.
///
/// Solver level methods look at totals over every phase, phase level
/// methods only at the running phase.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `D` - The score director type
pub trait Termination<S: PlanningSolution, D: ScoreDirector<S>>: Send + Debug {
    /// Returns true if the whole solver should stop.
    fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool;

    /// Returns true if the running phase should stop.
    fn is_phase_terminated(&self, phase_scope: &PhaseScope<'_, S, D>) -> bool;

    /// Solver progress between 0.0 and 1.0.
    fn calculate_solver_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64;

    /// Phase progress between 0.0 and 1.0.
    fn calculate_phase_time_gradient(&self, phase_scope: &PhaseScope<'_, S, D>) -> f64;
}

impl<S, D> Termination<S, D> for Box<dyn Termination<S, D>>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
{
    fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        (**self).is_solver_terminated(solver_scope)
    }

    fn is_phase_terminated(&self, phase_scope: &PhaseScope<'_, S, D>) -> bool {
        (**self).is_phase_terminated(phase_scope)
    }

    fn calculate_solver_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64 {
        (**self).calculate_solver_time_gradient(solver_scope)
    }

    fn calculate_phase_time_gradient(&self, phase_scope: &PhaseScope<'_, S, D>) -> f64 {
        (**self).calculate_phase_time_gradient(phase_scope)
    }
}

/// Never terminates. Used when nothing is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTermination;

impl<S, D> Termination<S, D> for NoTermination
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
{
    fn is_solver_terminated(&self, _solver_scope: &SolverScope<S, D>) -> bool {
        false
    }

    fn is_phase_terminated(&self, _phase_scope: &PhaseScope<'_, S, D>) -> bool {
        false
    }

    fn calculate_solver_time_gradient(&self, _solver_scope: &SolverScope<S, D>) -> f64 {
        0.0
    }

    fn calculate_phase_time_gradient(&self, _phase_scope: &PhaseScope<'_, S, D>) -> f64 {
        0.0
    }
}

#[cfg(test)]
mod tests;
