// Shadow-aware score director for solutions with shadow variables.
//
// Provides [`ShadowVariableSupport`] and [`ShadowAwareScoreDirector`], which
// routes variable change notifications through the shadow variable graph.

use std::fmt::Display;
use std::marker::PhantomData;

use planforge_core::domain::{
    PlanningSolution, ShadowVariableGraph, SolutionDescriptor, VariableSource,
};
use planforge_core::error::{PlanForgeError, Result};

use super::{ChildThreadType, ScoreDirector};

// Trait for solutions that maintain shadow variables.
//
// # Example
//
// ```
// use planforge_core::domain::{PlanningSolution, VariableSource};
// use planforge_core::score::SimpleScore;
// use planforge_scoring::director::ShadowVariableSupport;
//
// #[derive(Clone)]
// struct Plan {
//     task_worker: Vec<usize>,
//     task_duration: Vec<i64>,
//     worker_load: Vec<i64>,
//     score: Option<SimpleScore>,
// }
//
// impl PlanningSolution for Plan {
//     type Score = SimpleScore;
//     fn score(&self) -> Option<Self::Score> { self.score }
//     fn set_score(&mut self, score: Option<Self::Score>) { self.score = score; }
// }
//
// impl ShadowVariableSupport for Plan {
//     fn before_source_changed(&mut self, _source: VariableSource, _d: usize, task: usize) {
//         self.worker_load[self.task_worker[task]] -= self.task_duration[task];
//     }
//
//     fn update_shadow(&mut self, _shadow: VariableSource, _source: VariableSource, _d: usize, task: usize) {
//         self.worker_load[self.task_worker[task]] += self.task_duration[task];
//     }
//
//     fn update_all_shadows(&mut self) {
//         self.worker_load.iter_mut().for_each(|l| *l = 0);
//         for (task, &worker) in self.task_worker.iter().enumerate() {
//             self.worker_load[worker] += self.task_duration[task];
//         }
//     }
// }
// ```
pub trait ShadowVariableSupport: PlanningSolution {
    // Called while `source` of the entity still holds its old value, for
    // shadows that retract the entity's old contribution.
    fn before_source_changed(
        &mut self,
        _source: VariableSource,
        _descriptor_index: usize,
        _entity_index: usize,
    ) {
    }

    // Recomputes `shadow` after `source` of the entity changed.
    //
    // Called once per affected shadow, in dependency order. For a shadow
    // derived from another shadow, `source` is still the genuine variable
    // that started the propagation.
    fn update_shadow(
        &mut self,
        shadow: VariableSource,
        source: VariableSource,
        descriptor_index: usize,
        entity_index: usize,
    );

    // Recomputes every shadow variable from the genuine variables.
    fn update_all_shadows(&mut self);
}

// A score director that keeps shadow variables consistent.
//
// After-notifications are queued; `trigger_variable_listeners` (or the next
// score calculation) replays them through the shadow variable graph before
// the inner director sees the solution.
pub struct ShadowAwareScoreDirector<S, D>
where
    S: ShadowVariableSupport,
    D: ScoreDirector<S>,
{
    inner: D,
    graph: ShadowVariableGraph,
    pending: Vec<(usize, usize, VariableSource)>,
    _phantom: PhantomData<fn() -> S>,
}

impl<S, D> ShadowAwareScoreDirector<S, D>
where
    S: ShadowVariableSupport,
    D: ScoreDirector<S>,
{
    // Builds the shadow graph from the inner descriptor and initializes all
    // shadows. Fails on a cyclic or dangling shadow declaration.
    pub fn new(mut inner: D) -> Result<Self> {
        let graph = ShadowVariableGraph::build(inner.solution_descriptor())?;
        inner.working_solution_mut().update_all_shadows();
        Ok(Self {
            inner,
            graph,
            pending: Vec::new(),
            _phantom: PhantomData,
        })
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut D {
        &mut self.inner
    }

    pub fn into_inner(self) -> D {
        self.inner
    }

    pub fn graph(&self) -> &ShadowVariableGraph {
        &self.graph
    }

    // The source variable behind a notification, if any shadow depends on it.
    fn shadow_source(&self, descriptor_index: usize, variable_name: &str) -> Option<VariableSource> {
        let entity = self
            .inner
            .solution_descriptor()
            .entity_descriptor(descriptor_index)?;
        let variable = entity.find_variable(variable_name)?;
        let source = VariableSource::new(entity.type_name, variable.name);
        (!self
            .graph
            .affected_by(source.entity_type, source.variable_name)
            .is_empty())
        .then_some(source)
    }

    fn flush_pending(&mut self) {
        for (descriptor_index, entity_index, source) in std::mem::take(&mut self.pending) {
            let affected = self
                .graph
                .affected_by(source.entity_type, source.variable_name);
            let solution = self.inner.working_solution_mut();
            for shadow in affected {
                solution.update_shadow(shadow, source, descriptor_index, entity_index);
            }
        }
    }
}

impl<S, D> ScoreDirector<S> for ShadowAwareScoreDirector<S, D>
where
    S: ShadowVariableSupport,
    D: ScoreDirector<S>,
{
    fn working_solution(&self) -> &S {
        self.inner.working_solution()
    }

    fn working_solution_mut(&mut self) -> &mut S {
        self.inner.working_solution_mut()
    }

    fn set_working_solution(&mut self, mut solution: S) -> Result<()> {
        solution.update_all_shadows();
        self.pending.clear();
        self.inner.set_working_solution(solution)
    }

    fn solution_descriptor(&self) -> &SolutionDescriptor {
        self.inner.solution_descriptor()
    }

    fn calculate_score(&mut self) -> S::Score {
        if !self.pending.is_empty() {
            self.trigger_variable_listeners();
        }
        self.inner.calculate_score()
    }

    fn calculate_score_of(&self, solution: &S) -> S::Score {
        self.inner.calculate_score_of(solution)
    }

    fn calculate_score_from_scratch(&self) -> S::Score {
        let mut solution = self.inner.clone_working_solution();
        solution.update_all_shadows();
        self.inner.calculate_score_of(&solution)
    }

    fn before_variable_changed(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &str,
    ) {
        if let Some(source) = self.shadow_source(descriptor_index, variable_name) {
            self.inner
                .working_solution_mut()
                .before_source_changed(source, descriptor_index, entity_index);
        }
        self.inner
            .before_variable_changed(descriptor_index, entity_index, variable_name);
    }

    fn after_variable_changed(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &str,
    ) {
        self.inner
            .after_variable_changed(descriptor_index, entity_index, variable_name);
        if let Some(source) = self.shadow_source(descriptor_index, variable_name) {
            self.pending.push((descriptor_index, entity_index, source));
        }
    }

    fn after_entity_added(&mut self, descriptor_index: usize, entity_index: usize) {
        self.inner.working_solution_mut().update_all_shadows();
        self.inner.after_entity_added(descriptor_index, entity_index);
    }

    fn after_entity_removed(&mut self, descriptor_index: usize, entity_index: usize) {
        self.inner.working_solution_mut().update_all_shadows();
        self.inner.after_entity_removed(descriptor_index, entity_index);
    }

    fn trigger_variable_listeners(&mut self) {
        self.flush_pending();
        self.inner.trigger_variable_listeners();
    }

    fn entity_count(&self, descriptor_index: usize) -> usize {
        self.inner.entity_count(descriptor_index)
    }

    fn planning_id(&self, descriptor_index: usize, entity_index: usize) -> Result<i64> {
        self.inner.planning_id(descriptor_index, entity_index)
    }

    fn look_up_working_entity(&self, descriptor_index: usize, planning_id: i64) -> Result<usize> {
        self.inner.look_up_working_entity(descriptor_index, planning_id)
    }

    fn calculation_count(&self) -> u64 {
        self.inner.calculation_count()
    }

    fn increment_calculation_count(&mut self) {
        self.inner.increment_calculation_count();
    }

    fn reset_calculation_count(&mut self) {
        self.inner.reset_calculation_count();
    }

    // Pending notifications are not carried over: trigger before cloning.
    fn create_child_thread(&self, child_thread_type: ChildThreadType) -> Self {
        Self {
            inner: self.inner.create_child_thread(child_thread_type),
            graph: self.graph.clone(),
            pending: Vec::new(),
            _phantom: PhantomData,
        }
    }

    fn assert_shadow_variables_are_not_stale(
        &self,
        expected_working_score: S::Score,
        completed_action: &dyn Display,
    ) -> Result<()> {
        let working_score = self.inner.calculate_score_of(self.inner.working_solution());
        let fresh_score = self.calculate_score_from_scratch();
        if working_score != fresh_score {
            return Err(PlanForgeError::ScoreCorruption(format!(
                "shadow variables are stale after completed action ({completed_action}): \
                 the score with the current shadow values ({working_score}) is not the score \
                 with recomputed shadow values ({fresh_score}); expected working score \
                 ({expected_working_score})"
            )));
        }
        Ok(())
    }
}

impl<S, D> std::fmt::Debug for ShadowAwareScoreDirector<S, D>
where
    S: ShadowVariableSupport,
    D: ScoreDirector<S> + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShadowAwareScoreDirector")
            .field("inner", &self.inner)
            .field("shadows", &self.graph.update_order().len())
            .field("pending", &self.pending.len())
            .finish()
    }
}
