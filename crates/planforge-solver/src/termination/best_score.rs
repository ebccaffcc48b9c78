//! Score-based termination conditions.

use std::fmt::{self, Debug};
use std::marker::PhantomData;

use planforge_core::domain::PlanningSolution;
use planforge_core::score::Score;
use planforge_scoring::ScoreDirector;

use super::Termination;
use crate::scope::{PhaseScope, SolverScope};

/// Share of the remaining gradient that each level but the last one takes.
const LEVEL_GRADIENT_WEIGHT: f64 = 0.75;

/// Progress of `score` from `start` towards `end`, level by level.
///
/// Every level but the last takes [`LEVEL_GRADIENT_WEIGHT`] of what the
/// higher levels left, the last level takes the rest. A level at its end
/// value counts in full, a level above it completes the gradient. A level
/// below its start value stops the walk, since a worse higher level makes
/// lower level progress meaningless.
pub(crate) fn score_time_gradient(start: &[f64], end: &[f64], score: &[f64]) -> f64 {
    let mut gradient = 0.0;
    let mut remaining = 1.0;
    let levels = start.len().min(end.len()).min(score.len());
    for i in 0..levels {
        let weight = if i + 1 < levels {
            remaining * LEVEL_GRADIENT_WEIGHT
        } else {
            remaining
        };
        if score[i] > end[i] {
            gradient += remaining;
            break;
        }
        remaining -= weight;
        if score[i] == end[i] {
            gradient += weight;
        } else if score[i] < start[i] {
            break;
        } else if score[i] > start[i] {
            gradient += weight * (score[i] - start[i]) / (end[i] - start[i]);
        }
    }
    gradient.min(1.0)
}

/// Terminates when the best score reaches or exceeds a limit.
///
/// # Example
///
/// ```
/// use planforge_solver::termination::BestScoreTermination;
/// use planforge_core::score::HardSoftScore;
///
/// let term = BestScoreTermination::new(HardSoftScore::of(0, -100));
/// assert_eq!(term.limit(), &HardSoftScore::of(0, -100));
/// ```
#[derive(Debug, Clone)]
pub struct BestScoreTermination<Sc: Score> {
    limit: Sc,
}

impl<Sc: Score> BestScoreTermination<Sc> {
    pub fn new(limit: Sc) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> &Sc {
        &self.limit
    }

    fn is_reached(&self, best_score: &Sc) -> bool {
        best_score.is_solution_initialized() && *best_score >= self.limit
    }

    /// Progress from `start` towards the limit.
    pub fn time_gradient(&self, start: &Sc, best_score: &Sc) -> f64 {
        if !best_score.is_solution_initialized() {
            return 0.0;
        }
        score_time_gradient(
            &start.to_level_doubles(),
            &self.limit.to_level_doubles(),
            &best_score.to_level_doubles(),
        )
    }
}

impl<S, Sc, D> Termination<S, D> for BestScoreTermination<Sc>
where
    S: PlanningSolution<Score = Sc>,
    Sc: Score,
    D: ScoreDirector<S>,
{
    fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        solver_scope
            .best_score()
            .is_some_and(|score| self.is_reached(score))
    }

    fn is_phase_terminated(&self, phase_scope: &PhaseScope<'_, S, D>) -> bool {
        self.is_reached(&phase_scope.best_score())
    }

    fn calculate_solver_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64 {
        match (solver_scope.starting_score(), solver_scope.best_score()) {
            (Some(start), Some(best)) => self.time_gradient(start, best),
            _ => 0.0,
        }
    }

    fn calculate_phase_time_gradient(&self, phase_scope: &PhaseScope<'_, S, D>) -> f64 {
        self.time_gradient(phase_scope.starting_score(), &phase_scope.best_score())
    }
}

/// Terminates when the best score becomes feasible.
///
/// The time gradient measures progress of the hard levels towards zero.
pub struct BestScoreFeasibleTermination<S> {
    _phantom: PhantomData<fn() -> S>,
}

impl<S> Debug for BestScoreFeasibleTermination<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BestScoreFeasibleTermination").finish()
    }
}

impl<S> Clone for BestScoreFeasibleTermination<S> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<S> Default for BestScoreFeasibleTermination<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> BestScoreFeasibleTermination<S> {
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<S: PlanningSolution> BestScoreFeasibleTermination<S> {
    fn is_reached(best_score: &S::Score) -> bool {
        best_score.is_solution_initialized() && best_score.is_feasible()
    }

    /// Progress of the hard levels from `start` towards feasibility.
    pub fn time_gradient(start: &S::Score, best_score: &S::Score) -> f64 {
        if Self::is_reached(best_score) {
            return 1.0;
        }
        if !best_score.is_solution_initialized() {
            return 0.0;
        }
        let hard_levels = S::Score::hard_levels_count();
        let start = start.to_level_doubles();
        let best = best_score.to_level_doubles();
        score_time_gradient(
            &start[..hard_levels.min(start.len())],
            &vec![0.0; hard_levels],
            &best[..hard_levels.min(best.len())],
        )
    }
}

impl<S, D> Termination<S, D> for BestScoreFeasibleTermination<S>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
{
    fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        solver_scope.best_score().is_some_and(Self::is_reached)
    }

    fn is_phase_terminated(&self, phase_scope: &PhaseScope<'_, S, D>) -> bool {
        Self::is_reached(&phase_scope.best_score())
    }

    fn calculate_solver_time_gradient(&self, solver_scope: &SolverScope<S, D>) -> f64 {
        match (solver_scope.starting_score(), solver_scope.best_score()) {
            (Some(start), Some(best)) => Self::time_gradient(start, best),
            _ => 0.0,
        }
    }

    fn calculate_phase_time_gradient(&self, phase_scope: &PhaseScope<'_, S, D>) -> f64 {
        Self::time_gradient(phase_scope.starting_score(), &phase_scope.best_score())
    }
}
