//! Simple score director with full recalculation.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use planforge_core::domain::{LookUpIndex, PlanningSolution, SolutionDescriptor};
use planforge_core::error::Result;
use planforge_core::score::Score;
use tracing::{debug, warn};

use super::traits::{ChildThreadType, ScoreDirector};
use crate::api::analysis::{ConstraintMatch, ConstraintMatchTotal, Indictment};

type ConstraintMatchCalculator<S> =
    Arc<dyn Fn(&S) -> Vec<ConstraintMatch<<S as PlanningSolution>::Score>> + Send + Sync>;

/// A score director that recalculates the full score each time.
///
/// The calculator is a concrete generic type parameter, so every clone handed
/// to a move thread carries its own copy of it. The init score is always set
/// by the director from [`PlanningSolution::uninitialized_variable_count`].
pub struct SimpleScoreDirector<S: PlanningSolution, C> {
    working_solution: S,
    solution_descriptor: SolutionDescriptor,
    score_calculator: C,
    constraint_match_calculator: Option<ConstraintMatchCalculator<S>>,
    constraint_matches: Vec<ConstraintMatch<S::Score>>,
    look_up_index: LookUpIndex,
    score_dirty: bool,
    cached_score: Option<S::Score>,
    calculation_count: u64,
}

impl<S, C> SimpleScoreDirector<S, C>
where
    S: PlanningSolution,
    C: Fn(&S) -> S::Score + Send + Sync,
{
    /// Creates a director, indexing the planning ids of `solution`.
    pub fn new(
        solution: S,
        solution_descriptor: SolutionDescriptor,
        score_calculator: C,
    ) -> Result<Self> {
        let look_up_index = LookUpIndex::build(&solution_descriptor, &solution as &dyn Any)?;
        Ok(SimpleScoreDirector {
            working_solution: solution,
            solution_descriptor,
            score_calculator,
            constraint_match_calculator: None,
            constraint_matches: Vec::new(),
            look_up_index,
            score_dirty: true,
            cached_score: None,
            calculation_count: 0,
        })
    }

    /// Enables constraint match tracking.
    ///
    /// The match calculator runs on every recalculation, so the matches
    /// always describe the last calculated score.
    pub fn with_constraint_matches<F>(mut self, constraint_match_calculator: F) -> Self
    where
        F: Fn(&S) -> Vec<ConstraintMatch<S::Score>> + Send + Sync + 'static,
    {
        self.constraint_match_calculator = Some(Arc::new(constraint_match_calculator));
        self.score_dirty = true;
        self
    }

    pub fn is_constraint_match_enabled(&self) -> bool {
        self.constraint_match_calculator.is_some()
    }

    /// Matches of the last calculation, empty when tracking is disabled.
    pub fn constraint_matches(&mut self) -> &[ConstraintMatch<S::Score>] {
        self.refresh_score();
        &self.constraint_matches
    }

    pub fn constraint_match_totals(&mut self) -> Vec<ConstraintMatchTotal<S::Score>> {
        self.refresh_score();
        ConstraintMatchTotal::aggregate(&self.constraint_matches)
    }

    pub fn indictments(&mut self) -> Vec<Indictment<S::Score>> {
        self.refresh_score();
        Indictment::aggregate(&self.constraint_matches)
    }

    fn refresh_score(&mut self) -> S::Score {
        if !self.score_dirty {
            if let Some(score) = self.cached_score {
                return score;
            }
        }

        let score = self.score_with_init(&self.working_solution);
        if let Some(calculator) = &self.constraint_match_calculator {
            self.constraint_matches = calculator(&self.working_solution);
        }
        self.working_solution.set_score(Some(score));
        self.cached_score = Some(score);
        self.score_dirty = false;
        self.calculation_count += 1;
        score
    }

    fn mark_dirty(&mut self) {
        self.score_dirty = true;
    }

    fn score_with_init(&self, solution: &S) -> S::Score {
        let init_score = -(solution.uninitialized_variable_count() as i32);
        (self.score_calculator)(solution).with_init_score(init_score)
    }

    fn rebuild_look_up_index(&mut self) {
        match LookUpIndex::build(&self.solution_descriptor, &self.working_solution as &dyn Any) {
            Ok(index) => self.look_up_index = index,
            Err(e) => warn!(event = "look_up_index_stale", error = %e),
        }
    }
}

impl<S, C> ScoreDirector<S> for SimpleScoreDirector<S, C>
where
    S: PlanningSolution,
    C: Fn(&S) -> S::Score + Send + Sync + Clone + 'static,
{
    fn working_solution(&self) -> &S {
        &self.working_solution
    }

    fn working_solution_mut(&mut self) -> &mut S {
        self.mark_dirty();
        &mut self.working_solution
    }

    fn set_working_solution(&mut self, solution: S) -> Result<()> {
        self.look_up_index = LookUpIndex::build(&self.solution_descriptor, &solution as &dyn Any)?;
        self.working_solution = solution;
        self.cached_score = None;
        self.mark_dirty();
        Ok(())
    }

    fn solution_descriptor(&self) -> &SolutionDescriptor {
        &self.solution_descriptor
    }

    fn calculate_score(&mut self) -> S::Score {
        self.refresh_score()
    }

    fn calculate_score_of(&self, solution: &S) -> S::Score {
        self.score_with_init(solution)
    }

    fn before_variable_changed(
        &mut self,
        _descriptor_index: usize,
        _entity_index: usize,
        _variable_name: &str,
    ) {
        self.mark_dirty();
    }

    fn after_variable_changed(
        &mut self,
        _descriptor_index: usize,
        _entity_index: usize,
        _variable_name: &str,
    ) {
    }

    fn after_entity_added(&mut self, _descriptor_index: usize, _entity_index: usize) {
        self.mark_dirty();
        self.rebuild_look_up_index();
    }

    fn after_entity_removed(&mut self, _descriptor_index: usize, _entity_index: usize) {
        self.mark_dirty();
        self.rebuild_look_up_index();
    }

    fn trigger_variable_listeners(&mut self) {}

    fn entity_count(&self, descriptor_index: usize) -> usize {
        self.solution_descriptor
            .entity_descriptor(descriptor_index)
            .map(|d| d.entity_count(&self.working_solution as &dyn Any))
            .unwrap_or(0)
    }

    fn planning_id(&self, descriptor_index: usize, entity_index: usize) -> Result<i64> {
        self.look_up_index.planning_id(descriptor_index, entity_index)
    }

    fn look_up_working_entity(&self, descriptor_index: usize, planning_id: i64) -> Result<usize> {
        self.look_up_index.look_up(descriptor_index, planning_id)
    }

    fn calculation_count(&self) -> u64 {
        self.calculation_count
    }

    fn increment_calculation_count(&mut self) {
        self.calculation_count += 1;
    }

    fn reset_calculation_count(&mut self) {
        self.calculation_count = 0;
    }

    fn create_child_thread(&self, child_thread_type: ChildThreadType) -> Self {
        debug!(event = "child_score_director", ?child_thread_type);
        SimpleScoreDirector {
            working_solution: self.working_solution.clone(),
            solution_descriptor: self.solution_descriptor.clone(),
            score_calculator: self.score_calculator.clone(),
            constraint_match_calculator: self.constraint_match_calculator.clone(),
            constraint_matches: Vec::new(),
            look_up_index: self.look_up_index.clone(),
            score_dirty: true,
            cached_score: None,
            calculation_count: 0,
        }
    }
}

impl<S: PlanningSolution, C> fmt::Debug for SimpleScoreDirector<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleScoreDirector")
            .field("solution", &self.solution_descriptor.type_name)
            .field("cached_score", &self.cached_score)
            .field("calculation_count", &self.calculation_count)
            .finish()
    }
}
