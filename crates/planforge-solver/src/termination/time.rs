//! Time-based termination.

use std::time::Duration;

use planforge_core::domain::PlanningSolution;
use planforge_scoring::ScoreDirector;

use super::Termination;
use crate::scope::{PhaseScope, SolverScope};

/// Terminates once the spent time reaches a limit.
///
/// # Example
///
/// ```
/// use planforge_solver::termination::TimeTermination;
/// use std::time::Duration;
///
/// let term = TimeTermination::new(Duration::from_secs(30));
/// assert_eq!(term.limit(), Duration::from_secs(30));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TimeTermination {
    limit: Duration,
}

impl TimeTermination {
    pub fn new(limit: Duration) -> Self {
        Self { limit }
    }

    pub fn millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn seconds(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    fn gradient(&self, elapsed: Duration) -> f64 {
        if self.limit.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.limit.as_secs_f64()).min(1.0)
    }
}

impl<S: PlanningSolution, D: ScoreDirector<S>> Termination<S, D> for TimeTermination {
    fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        solver_scope.elapsed() >= self.limit
    }

    fn is_phase_terminated(&self, phase_scope: &PhaseScope<'_, S, D>) -> bool {
        phase_scope.elapsed() >= self.limit
    }

    fn calculate_solver_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64 {
        self.gradient(solver_scope.elapsed())
    }

    fn calculate_phase_time_gradient(&self, phase_scope: &PhaseScope<'_, S, D>) -> f64 {
        self.gradient(phase_scope.elapsed())
    }
}
