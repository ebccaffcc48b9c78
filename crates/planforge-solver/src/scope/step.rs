//! Step-level scope.

use planforge_core::domain::PlanningSolution;
use planforge_scoring::ScoreDirector;

use super::PhaseScope;

/// Scope for a single step within a phase.
pub struct StepScope<'a, 'b, S: PlanningSolution, D: ScoreDirector<S>> {
    phase_scope: &'a mut PhaseScope<'b, S, D>,
    step_index: u64,
    time_gradient: f64,
    step_score: Option<S::Score>,
    step_string: Option<String>,
    selected_move_count: u64,
    accepted_move_count: u64,
    best_score_improved: bool,
}

impl<'a, 'b, S: PlanningSolution, D: ScoreDirector<S>> StepScope<'a, 'b, S, D> {
    /// Creates the scope of the phase's next step.
    pub fn new(phase_scope: &'a mut PhaseScope<'b, S, D>) -> Self {
        let step_index = phase_scope.step_count();
        Self {
            phase_scope,
            step_index,
            time_gradient: 0.0,
            step_score: None,
            step_string: None,
            selected_move_count: 0,
            accepted_move_count: 0,
            best_score_improved: false,
        }
    }

    pub fn with_time_gradient(mut self, time_gradient: f64) -> Self {
        self.time_gradient = time_gradient;
        self
    }

    pub fn step_index(&self) -> u64 {
        self.step_index
    }

    pub fn time_gradient(&self) -> f64 {
        self.time_gradient
    }

    pub fn step_score(&self) -> Option<&S::Score> {
        self.step_score.as_ref()
    }

    pub fn set_step_score(&mut self, score: S::Score) {
        self.step_score = Some(score);
    }

    /// Display string of the winning move.
    pub fn step_string(&self) -> Option<&str> {
        self.step_string.as_deref()
    }

    pub fn set_step_string(&mut self, step: String) {
        self.step_string = Some(step);
    }

    pub fn selected_move_count(&self) -> u64 {
        self.selected_move_count
    }

    pub fn accepted_move_count(&self) -> u64 {
        self.accepted_move_count
    }

    pub fn set_move_counts(&mut self, selected: u64, accepted: u64) {
        self.selected_move_count = selected;
        self.accepted_move_count = accepted;
    }

    pub fn is_best_score_improved(&self) -> bool {
        self.best_score_improved
    }

    pub fn phase_scope(&self) -> &PhaseScope<'b, S, D> {
        self.phase_scope
    }

    pub fn phase_scope_mut(&mut self) -> &mut PhaseScope<'b, S, D> {
        self.phase_scope
    }

    pub fn score_director(&self) -> &D {
        self.phase_scope.score_director()
    }

    pub fn score_director_mut(&mut self) -> &mut D {
        self.phase_scope.score_director_mut()
    }

    pub fn calculate_score(&mut self) -> S::Score {
        self.phase_scope.calculate_score()
    }

    /// Updates the best solution from the working solution.
    pub fn update_best_solution(&mut self) -> bool {
        self.best_score_improved = self.phase_scope.update_best_solution(self.step_index);
        self.best_score_improved
    }

    /// Marks this step as complete and advances the step counters.
    ///
    /// A step without a score leaves the last completed step score as is.
    pub fn complete(&mut self) {
        let step_score = self
            .step_score
            .unwrap_or(*self.phase_scope.last_completed_step_score());
        self.phase_scope.complete_step(step_score);
    }
}
