// Score director trait definition.

use std::fmt::Display;

use planforge_core::domain::{PlanningSolution, SolutionDescriptor};
use planforge_core::error::{PlanForgeError, Result};

// The kind of thread a child score director is created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildThreadType {
    // A partition solver thread, which owns its own part of the problem.
    PartThread,
    // A move thread, which only evaluates moves against its own clone.
    MoveThread,
}

// The score director owns the working solution and calculates its score.
//
// The local search engine never computes scores itself. It brackets every
// variable write with before/after notifications, asks for the score, and
// compares the scores this trait returns.
//
// Entities are addressed by `(descriptor_index, entity_index)`. Indices are
// only meaningful inside one working solution; across clones the stable key
// is the planning id returned by `planning_id`.
pub trait ScoreDirector<S: PlanningSolution>: Send + 'static {
    fn working_solution(&self) -> &S;

    // Marks the score dirty.
    fn working_solution_mut(&mut self) -> &mut S;

    // Replaces the working solution and rebuilds all derived state.
    fn set_working_solution(&mut self, solution: S) -> Result<()>;

    fn solution_descriptor(&self) -> &SolutionDescriptor;

    // Calculates the score of the working solution, reusing cached
    // bookkeeping where possible, and stores it on the solution.
    fn calculate_score(&mut self) -> S::Score;

    // Scores an arbitrary solution of this problem without touching the
    // working solution or the calculation count.
    fn calculate_score_of(&self, solution: &S) -> S::Score;

    // Recalculates the working score ignoring every incremental cache.
    fn calculate_score_from_scratch(&self) -> S::Score {
        self.calculate_score_of(self.working_solution())
    }

    fn clone_working_solution(&self) -> S {
        self.working_solution().clone()
    }

    fn before_variable_changed(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &str,
    );

    fn after_variable_changed(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &str,
    );

    fn before_entity_added(&mut self, descriptor_index: usize, entity_index: usize) {
        self.before_variable_changed(descriptor_index, entity_index, "");
    }

    // Directors keyed by planning id rebuild their lookup index here.
    fn after_entity_added(&mut self, descriptor_index: usize, entity_index: usize) {
        self.after_variable_changed(descriptor_index, entity_index, "");
    }

    fn before_entity_removed(&mut self, descriptor_index: usize, entity_index: usize) {
        self.before_variable_changed(descriptor_index, entity_index, "");
    }

    fn after_entity_removed(&mut self, descriptor_index: usize, entity_index: usize) {
        self.after_variable_changed(descriptor_index, entity_index, "");
    }

    // Propagates all pending shadow variable updates. Must run before any
    // shadow variable is read and before the next score calculation.
    fn trigger_variable_listeners(&mut self);

    fn entity_count(&self, descriptor_index: usize) -> usize;

    // The stable identity key of an entity in the working solution.
    fn planning_id(&self, descriptor_index: usize, entity_index: usize) -> Result<i64>;

    // The entity index holding `planning_id` in this working solution.
    fn look_up_working_entity(&self, descriptor_index: usize, planning_id: i64) -> Result<usize>;

    fn calculation_count(&self) -> u64;

    fn increment_calculation_count(&mut self);

    fn reset_calculation_count(&mut self);

    // Creates an independent director over a clone of the working solution.
    fn create_child_thread(&self, child_thread_type: ChildThreadType) -> Self
    where
        Self: Sized;

    // Fails when `predicted_score` differs from a from-scratch calculation.
    fn assert_predicted_score_from_scratch(
        &self,
        predicted_score: S::Score,
        completed_action: &dyn Display,
    ) -> Result<()> {
        let uncorrupted_score = self.calculate_score_from_scratch();
        if predicted_score != uncorrupted_score {
            return Err(PlanForgeError::ScoreCorruption(format!(
                "the predicted score ({predicted_score}) is not the uncorrupted score \
                 ({uncorrupted_score}) after completed action ({completed_action}); \
                 score corruption ({})",
                predicted_score - uncorrupted_score
            )));
        }
        Ok(())
    }

    // Fails when the working score differs from `expected_working_score`.
    fn assert_expected_working_score(
        &mut self,
        expected_working_score: S::Score,
        completed_action: &dyn Display,
    ) -> Result<()> {
        let working_score = self.calculate_score();
        if expected_working_score != working_score {
            return Err(PlanForgeError::ScoreCorruption(format!(
                "the expected working score ({expected_working_score}) is not the working score \
                 ({working_score}) after completed action ({completed_action}); \
                 score corruption ({})",
                expected_working_score - working_score
            )));
        }
        Ok(())
    }

    // Fails when a shadow variable is stale. Directors without shadow
    // variables have nothing to check.
    fn assert_shadow_variables_are_not_stale(
        &self,
        _expected_working_score: S::Score,
        _completed_action: &dyn Display,
    ) -> Result<()> {
        Ok(())
    }
}

