//! Phase-level scope.

use std::time::{Duration, Instant};

use planforge_core::domain::PlanningSolution;
use planforge_scoring::ScoreDirector;

use super::SolverScope;

/// Scope for a single phase of solving.
///
/// # Type Parameters
/// * `'a` - Lifetime of the solver scope reference
/// * `S` - The planning solution type
/// * `D` - The score director type
pub struct PhaseScope<'a, S: PlanningSolution, D: ScoreDirector<S>> {
    solver_scope: &'a mut SolverScope<S, D>,
    phase_index: usize,
    start_time: Instant,
    starting_score: S::Score,
    starting_calculation_count: u64,
    step_count: u64,
    last_completed_step_score: S::Score,
    /// Phase step index of the last best solution improvement.
    best_solution_step_index: Option<u64>,
}

impl<'a, S: PlanningSolution, D: ScoreDirector<S>> PhaseScope<'a, S, D> {
    /// Creates a phase scope starting from the current working score.
    pub fn new(solver_scope: &'a mut SolverScope<S, D>, phase_index: usize) -> Self {
        let starting_score = solver_scope.calculate_score();
        let starting_calculation_count = solver_scope.calculation_count();
        Self {
            solver_scope,
            phase_index,
            start_time: Instant::now(),
            starting_score,
            starting_calculation_count,
            step_count: 0,
            last_completed_step_score: starting_score,
            best_solution_step_index: None,
        }
    }

    pub fn phase_index(&self) -> usize {
        self.phase_index
    }

    pub fn starting_score(&self) -> &S::Score {
        &self.starting_score
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Number of completed steps in this phase, which is also the index of
    /// the next step.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// The score after the last completed step, or the starting score.
    pub fn last_completed_step_score(&self) -> &S::Score {
        &self.last_completed_step_score
    }

    pub fn best_solution_step_index(&self) -> Option<u64> {
        self.best_solution_step_index
    }

    /// Steps of this phase since the best solution last improved.
    pub fn unimproved_step_count(&self) -> u64 {
        self.step_count
            .saturating_sub(self.best_solution_step_index.map_or(0, |index| index + 1))
    }

    /// Score calculations done since this phase started.
    pub fn calculation_count(&self) -> u64 {
        self.solver_scope
            .calculation_count()
            .saturating_sub(self.starting_calculation_count)
    }

    pub fn solver_scope(&self) -> &SolverScope<S, D> {
        self.solver_scope
    }

    pub fn solver_scope_mut(&mut self) -> &mut SolverScope<S, D> {
        self.solver_scope
    }

    pub fn score_director(&self) -> &D {
        self.solver_scope.score_director()
    }

    pub fn score_director_mut(&mut self) -> &mut D {
        self.solver_scope.score_director_mut()
    }

    pub fn calculate_score(&mut self) -> S::Score {
        self.solver_scope.calculate_score()
    }

    /// The solver's best score, falling back to this phase's starting score.
    pub fn best_score(&self) -> S::Score {
        self.solver_scope
            .best_score()
            .copied()
            .unwrap_or(self.starting_score)
    }

    /// Updates the best solution, remembering the step that improved it.
    pub(crate) fn update_best_solution(&mut self, step_index: u64) -> bool {
        let improved = self.solver_scope.update_best_solution();
        if improved {
            self.best_solution_step_index = Some(step_index);
        }
        improved
    }

    pub(crate) fn complete_step(&mut self, step_score: S::Score) {
        self.step_count += 1;
        self.last_completed_step_score = step_score;
        self.solver_scope.increment_step_count();
    }
}
