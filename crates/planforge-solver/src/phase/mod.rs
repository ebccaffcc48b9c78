//! Solver phases.
//!
//! A phase improves the working solution of a [`SolverScope`] until its own
//! termination, or the solver's, says stop. Local search is the only phase
//! type; the solver runs its phases in order.

pub mod localsearch;

use std::fmt::Debug;

use planforge_core::domain::PlanningSolution;
use planforge_core::error::Result;
use planforge_scoring::ScoreDirector;

use crate::scope::SolverScope;
use crate::termination::Termination;

/// A phase of the solving process.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `D` - The score director type
pub trait Phase<S: PlanningSolution, D: ScoreDirector<S>>: Send + Debug {
    /// Called once per solve, before the first phase starts.
    fn solving_started(&mut self, _solver_scope: &mut SolverScope<S, D>) -> Result<()> {
        Ok(())
    }

    /// Runs the phase.
    ///
    /// `solver_termination` is checked together with the phase's own
    /// termination before every step. The best solution in `solver_scope`
    /// is updated whenever a step improves it.
    fn solve(
        &mut self,
        solver_scope: &mut SolverScope<S, D>,
        phase_index: usize,
        solver_termination: &dyn Termination<S, D>,
    ) -> Result<()>;

    fn solving_ended(&mut self) {}

    /// Returns the name of this phase type.
    fn phase_type_name(&self) -> &'static str;
}

impl<S: PlanningSolution, D: ScoreDirector<S>> Phase<S, D> for Box<dyn Phase<S, D>> {
    fn solving_started(&mut self, solver_scope: &mut SolverScope<S, D>) -> Result<()> {
        (**self).solving_started(solver_scope)
    }

    fn solve(
        &mut self,
        solver_scope: &mut SolverScope<S, D>,
        phase_index: usize,
        solver_termination: &dyn Termination<S, D>,
    ) -> Result<()> {
        (**self).solve(solver_scope, phase_index, solver_termination)
    }

    fn solving_ended(&mut self) {
        (**self).solving_ended()
    }

    fn phase_type_name(&self) -> &'static str {
        (**self).phase_type_name()
    }
}
