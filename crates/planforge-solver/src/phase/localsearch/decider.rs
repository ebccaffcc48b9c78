//! Move evaluation and step decision.
//!
//! The decider runs the inner loop of a step: it takes the moves of the
//! selector, scores each one with a do/undo pair, asks the acceptor and
//! hands the result to the forager. The multithreaded variant leaves the
//! scoring to the move threads and forages their results in move index
//! order, so both variants feed the forager the same sequence.

use std::fmt::{self, Debug};
use std::marker::PhantomData;

use planforge_config::EnvironmentMode;
use planforge_core::domain::PlanningSolution;
use planforge_core::error::{PlanForgeError, Result};
use planforge_scoring::ScoreDirector;
use tracing::trace;

use crate::heuristic::r#move::Move;
use crate::heuristic::selector::MoveSelector;
use crate::scope::{MoveScope, PhaseScope, StepScope};
use crate::termination::Termination;
use crate::thread::MoveThreadPool;

use super::acceptor::{AcceptanceContext, Acceptor};
use super::forager::LocalSearchForager;

/// Runtime checks of the assertive environment modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepAssertions {
    /// Recalculate every move score from scratch.
    pub move_score_from_scratch: bool,
    /// After undoing a move the working score must be the last step score.
    pub expected_undo_move_score: bool,
    /// Recalculate the step score from scratch after applying the winner.
    pub step_score_from_scratch: bool,
    /// After applying the winner the working score must be its move score.
    pub expected_step_score: bool,
    pub shadow_variables_after_step: bool,
}

impl StepAssertions {
    pub fn for_mode(mode: EnvironmentMode) -> Self {
        Self {
            move_score_from_scratch: mode.is_non_intrusive_full_asserted(),
            expected_undo_move_score: mode.is_intrusive_fast_asserted(),
            step_score_from_scratch: mode.is_non_intrusive_full_asserted(),
            expected_step_score: mode.is_asserted(),
            shadow_variables_after_step: mode.is_intrusive_fast_asserted(),
        }
    }
}

/// Applies `mv`, scores it and undoes it. Leaves the working solution as
/// it found it.
pub(crate) fn score_move<S, D, M>(
    score_director: &mut D,
    mv: &M,
    last_step_score: S::Score,
    assertions: StepAssertions,
) -> Result<S::Score>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
{
    let undo_move = mv.create_undo_move(score_director);
    mv.do_move(score_director);
    let score = score_director.calculate_score();
    if assertions.move_score_from_scratch {
        score_director.assert_predicted_score_from_scratch(score, mv)?;
    }
    undo_move.do_move(score_director);
    if assertions.expected_undo_move_score {
        score_director
            .assert_expected_working_score(last_step_score, &format_args!("undo of ({mv})"))?;
    }
    Ok(score)
}

/// Applies the step winner for good.
pub(crate) fn apply_step<S, D, M>(
    score_director: &mut D,
    step: &M,
    step_score: S::Score,
    assertions: StepAssertions,
) -> Result<()>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
{
    step.do_move(score_director);
    if assertions.expected_step_score {
        score_director.assert_expected_working_score(step_score, step)?;
    }
    if assertions.step_score_from_scratch {
        score_director.assert_predicted_score_from_scratch(step_score, step)?;
    }
    if assertions.shadow_variables_after_step {
        score_director.assert_shadow_variables_are_not_stale(step_score, step)?;
    }
    Ok(())
}

/// Phase loop termination: the terminate early flag, the solver's
/// termination and the phase's own termination, if any.
pub(crate) struct PhaseTermination<'t, S: PlanningSolution, D: ScoreDirector<S>> {
    pub(crate) solver: &'t dyn Termination<S, D>,
    pub(crate) phase: Option<&'t dyn Termination<S, D>>,
}

impl<'t, S: PlanningSolution, D: ScoreDirector<S>> PhaseTermination<'t, S, D> {
    pub(crate) fn is_terminated(&self, phase_scope: &PhaseScope<'_, S, D>) -> bool {
        let solver_scope = phase_scope.solver_scope();
        solver_scope.is_terminate_early()
            || self.solver.is_solver_terminated(solver_scope)
            || self
                .phase
                .is_some_and(|termination| termination.is_phase_terminated(phase_scope))
    }

    pub(crate) fn time_gradient(&self, phase_scope: &PhaseScope<'_, S, D>) -> f64 {
        let solver_gradient = self
            .solver
            .calculate_solver_time_gradient(phase_scope.solver_scope());
        let phase_gradient = self
            .phase
            .map_or(0.0, |termination| termination.calculate_phase_time_gradient(phase_scope));
        solver_gradient.max(phase_gradient)
    }
}

/// What every evaluated move of a step is compared against.
#[derive(Debug, Clone, Copy)]
struct StepContext<Sc> {
    step_index: u64,
    time_gradient: f64,
    last_step_score: Sc,
    best_score: Sc,
}

/// Chooses the winning move of each step.
pub struct LocalSearchDecider<S, D, M, MS, A>
where
    S: PlanningSolution,
{
    move_selector: MS,
    acceptor: A,
    forager: LocalSearchForager<M, S::Score>,
    assertions: StepAssertions,
    _phantom: PhantomData<fn() -> D>,
}

impl<S, D, M, MS, A> Debug for LocalSearchDecider<S, D, M, MS, A>
where
    S: PlanningSolution,
    MS: Debug,
    A: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalSearchDecider")
            .field("move_selector", &self.move_selector)
            .field("acceptor", &self.acceptor)
            .field("forager", &self.forager)
            .field("assertions", &self.assertions)
            .finish()
    }
}

impl<S, D, M, MS, A> LocalSearchDecider<S, D, M, MS, A>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
    MS: MoveSelector<S, D, M>,
    A: Acceptor<S>,
{
    pub fn new(move_selector: MS, acceptor: A, forager: LocalSearchForager<M, S::Score>) -> Self {
        Self {
            move_selector,
            acceptor,
            forager,
            assertions: StepAssertions::default(),
            _phantom: PhantomData,
        }
    }

    pub fn with_assertions(mut self, assertions: StepAssertions) -> Self {
        self.assertions = assertions;
        self
    }

    pub fn assertions(&self) -> StepAssertions {
        self.assertions
    }

    pub fn move_selector(&self) -> &MS {
        &self.move_selector
    }

    pub fn acceptor(&self) -> &A {
        &self.acceptor
    }

    pub fn forager(&self) -> &LocalSearchForager<M, S::Score> {
        &self.forager
    }

    pub(crate) fn solving_started(&mut self, score_director: &D, seed: u64) -> Result<()> {
        self.move_selector.solving_started(score_director, seed)
    }

    pub(crate) fn phase_started(&mut self, phase_scope: &mut PhaseScope<'_, S, D>) -> Result<()> {
        if self.move_selector.is_never_ending() && !self.forager.supports_never_ending_move_selector() {
            return Err(PlanForgeError::Config(
                "a never ending move selector needs a forager with an acceptedCountLimit or a pickEarlyType"
                    .to_string(),
            ));
        }
        let seed = phase_scope.solver_scope_mut().next_seed();
        let score_director = phase_scope.score_director();
        let entity_count = score_director
            .solution_descriptor()
            .entity_count(score_director.working_solution());
        self.move_selector.phase_started(score_director, seed)?;
        self.acceptor
            .phase_started(phase_scope.starting_score(), entity_count);
        self.forager.phase_started();
        Ok(())
    }

    pub(crate) fn step_started(&mut self, step_scope: &mut StepScope<'_, '_, S, D>) -> Result<()> {
        let seed = step_scope.phase_scope_mut().solver_scope_mut().next_seed();
        self.move_selector
            .step_started(step_scope.score_director(), seed)?;
        self.acceptor
            .step_started(step_scope.step_index(), step_scope.time_gradient());
        let phase_scope = step_scope.phase_scope();
        self.forager.step_started(
            *phase_scope.last_completed_step_score(),
            phase_scope.best_score(),
        );
        Ok(())
    }

    /// Notifies the acceptor of the applied winner.
    pub(crate) fn step_ended(
        &mut self,
        step_scope: &StepScope<'_, '_, S, D>,
        step: &MoveScope<M, S::Score>,
    ) {
        let phase_scope = step_scope.phase_scope();
        let context = AcceptanceContext {
            move_score: step.score,
            last_step_score: *phase_scope.last_completed_step_score(),
            best_score: phase_scope.best_score(),
            step_index: step_scope.step_index(),
            time_gradient: step_scope.time_gradient(),
            descriptor_index: step.mv.descriptor_index(),
            entity_indices: step.mv.entity_indices(),
        };
        self.acceptor.step_ended(&context);
        self.move_selector.step_ended();
        self.forager.step_ended();
    }

    /// Ends a step that found no move.
    pub(crate) fn step_abandoned(&mut self) {
        self.move_selector.step_ended();
        self.forager.step_ended();
    }

    pub(crate) fn phase_ended(&mut self) {
        self.move_selector.phase_ended();
        self.acceptor.phase_ended();
        self.forager.phase_ended();
    }

    fn step_context(step_scope: &StepScope<'_, '_, S, D>) -> StepContext<S::Score> {
        let phase_scope = step_scope.phase_scope();
        StepContext {
            step_index: step_scope.step_index(),
            time_gradient: step_scope.time_gradient(),
            last_step_score: *phase_scope.last_completed_step_score(),
            best_score: phase_scope.best_score(),
        }
    }

    /// Evaluates the moves of one step on the solver thread and picks the
    /// winner, which is left unapplied.
    pub(crate) fn decide_next_step(
        &mut self,
        step_scope: &mut StepScope<'_, '_, S, D>,
        termination: &PhaseTermination<'_, S, D>,
    ) -> Result<Option<MoveScope<M, S::Score>>> {
        let context = Self::step_context(step_scope);
        let assertions = self.assertions;
        let moves = self.move_selector.iter_moves(step_scope.score_director());
        for (move_index, mv) in (0u64..).zip(moves) {
            let score = if mv.is_doable(step_scope.score_director()) {
                Some(score_move(
                    step_scope.score_director_mut(),
                    &mv,
                    context.last_step_score,
                    assertions,
                )?)
            } else {
                None
            };
            forage(
                &mut self.acceptor,
                &mut self.forager,
                step_scope,
                &context,
                move_index,
                mv,
                score,
            );
            if self.forager.is_quit_early() {
                break;
            }
            step_scope.phase_scope().solver_scope().check_yielding();
            if termination.is_terminated(step_scope.phase_scope()) {
                break;
            }
        }
        Ok(self.pick_move(step_scope))
    }

    /// Evaluates the moves of one step on the move threads.
    ///
    /// Keeps up to the pool's buffer size of moves in flight and forages
    /// results strictly in move index order. Moves still in flight when the
    /// forager quits early are discarded.
    pub(crate) fn decide_next_step_multi_threaded(
        &mut self,
        step_scope: &mut StepScope<'_, '_, S, D>,
        termination: &PhaseTermination<'_, S, D>,
        pool: &mut MoveThreadPool<'_, S, D, M>,
    ) -> Result<Option<MoveScope<M, S::Score>>> {
        let context = Self::step_context(step_scope);
        pool.start_next_step(context.step_index)?;
        let buffer_size = pool.selected_move_buffer_size() as u64;
        let mut moves = self.move_selector.iter_moves(step_scope.score_director());
        let mut selected_count = 0u64;
        let mut foraged_count = 0u64;
        let mut exhausted = false;
        loop {
            while !exhausted && selected_count - foraged_count < buffer_size {
                match moves.next() {
                    Some(mv) => {
                        pool.evaluate(context.step_index, selected_count, mv)?;
                        selected_count += 1;
                    }
                    None => exhausted = true,
                }
            }
            if foraged_count == selected_count {
                break;
            }
            let result = pool.take()?;
            let mv = result.mv.rebase(step_scope.score_director())?;
            forage(
                &mut self.acceptor,
                &mut self.forager,
                step_scope,
                &context,
                result.move_index,
                mv,
                result.score,
            );
            foraged_count += 1;
            if self.forager.is_quit_early() {
                break;
            }
            step_scope.phase_scope().solver_scope().check_yielding();
            if termination.is_terminated(step_scope.phase_scope()) {
                break;
            }
        }
        drop(moves);
        pool.discard_step(context.step_index);
        Ok(self.pick_move(step_scope))
    }

    fn pick_move(
        &mut self,
        step_scope: &mut StepScope<'_, '_, S, D>,
    ) -> Option<MoveScope<M, S::Score>> {
        step_scope.set_move_counts(
            self.forager.selected_move_count(),
            self.forager.accepted_move_count(),
        );
        let rng = step_scope.phase_scope_mut().solver_scope_mut().working_random();
        self.forager.pick_move(rng)
    }
}

/// Hands one evaluated move to the acceptor and the forager. A move
/// without a score was not doable.
fn forage<S, D, M, A>(
    acceptor: &mut A,
    forager: &mut LocalSearchForager<M, S::Score>,
    step_scope: &mut StepScope<'_, '_, S, D>,
    context: &StepContext<S::Score>,
    move_index: u64,
    mv: M,
    score: Option<S::Score>,
) where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
    A: Acceptor<S>,
{
    let Some(score) = score else {
        trace!(
            event = "move_not_doable",
            step = context.step_index,
            move_index,
            mv = %mv,
        );
        forager.add_undoable_move();
        return;
    };
    let rng = step_scope.phase_scope_mut().solver_scope_mut().working_random();
    let accepted = {
        let acceptance = AcceptanceContext {
            move_score: score,
            last_step_score: context.last_step_score,
            best_score: context.best_score,
            step_index: context.step_index,
            time_gradient: context.time_gradient,
            descriptor_index: mv.descriptor_index(),
            entity_indices: mv.entity_indices(),
        };
        acceptor.is_accepted(&acceptance, rng)
    };
    trace!(
        event = "move_evaluated",
        step = context.step_index,
        move_index,
        score = %score,
        accepted,
        mv = %mv,
    );
    forager.add_move(MoveScope::new(move_index, mv, score, accepted), rng);
}
