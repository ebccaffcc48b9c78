//! Termination on lack of improvement.

use planforge_core::domain::PlanningSolution;
use planforge_scoring::ScoreDirector;

use super::Termination;
use crate::scope::{PhaseScope, SolverScope};

/// Terminates if the best score did not improve for a number of steps.
///
/// Useful to stop a search that plateaued. The time gradient is the share
/// of the limit already spent without improvement, so it falls back to 0.0
/// whenever the best score improves.
///
/// # Example
///
/// ```
/// use planforge_solver::termination::UnimprovedStepCountTermination;
///
/// // Terminate after 100 steps without improvement
/// let term = UnimprovedStepCountTermination::new(100);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct UnimprovedStepCountTermination {
    limit: u64,
}

impl UnimprovedStepCountTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }

    fn gradient(&self, unimproved_step_count: u64) -> f64 {
        if self.limit == 0 {
            return 1.0;
        }
        (unimproved_step_count as f64 / self.limit as f64).min(1.0)
    }
}

impl<S, D> Termination<S, D> for UnimprovedStepCountTermination
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
{
    fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        solver_scope.unimproved_step_count() >= self.limit
    }

    fn is_phase_terminated(&self, phase_scope: &PhaseScope<'_, S, D>) -> bool {
        phase_scope.unimproved_step_count() >= self.limit
    }

    fn calculate_solver_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64 {
        self.gradient(solver_scope.unimproved_step_count())
    }

    fn calculate_phase_time_gradient(&self, phase_scope: &PhaseScope<'_, S, D>) -> f64 {
        self.gradient(phase_scope.unimproved_step_count())
    }
}
