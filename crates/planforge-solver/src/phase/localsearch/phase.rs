//! Local search phase implementation.

use std::fmt::{self, Debug};

use planforge_core::domain::PlanningSolution;
use planforge_core::error::Result;
use planforge_scoring::ScoreDirector;
use tracing::{debug, info, warn};

use crate::event::StepEndedEvent;
use crate::heuristic::r#move::Move;
use crate::heuristic::selector::MoveSelector;
use crate::phase::localsearch::{Acceptor, LocalSearchDecider};
use crate::phase::Phase;
use crate::scope::{PhaseScope, SolverScope, StepScope};
use crate::termination::Termination;
use crate::thread::{MoveThreadConfig, MoveThreadPool};

use super::decider::{apply_step, PhaseTermination};

/// Local search phase that improves an existing solution.
///
/// Each step:
/// 1. Checks the terminations
/// 2. Lets the decider score the moves of the selector and pick a winner
/// 3. Applies the winner and updates the best solution
///
/// A step without any evaluated move ends the phase.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `D` - The score director type
/// * `M` - The move type
/// * `MS` - The move selector type
/// * `A` - The acceptor type
pub struct LocalSearchPhase<S, D, M, MS, A>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
{
    decider: LocalSearchDecider<S, D, M, MS, A>,
    termination: Option<Box<dyn Termination<S, D>>>,
    move_thread_config: Option<MoveThreadConfig>,
}

impl<S, D, M, MS, A> LocalSearchPhase<S, D, M, MS, A>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
    MS: MoveSelector<S, D, M>,
    A: Acceptor<S>,
{
    /// Creates a single-threaded phase without a termination of its own.
    pub fn new(decider: LocalSearchDecider<S, D, M, MS, A>) -> Self {
        Self {
            decider,
            termination: None,
            move_thread_config: None,
        }
    }

    pub fn with_termination(mut self, termination: Box<dyn Termination<S, D>>) -> Self {
        self.termination = Some(termination);
        self
    }

    /// Evaluates moves on move threads.
    pub fn with_move_threads(mut self, config: MoveThreadConfig) -> Self {
        self.move_thread_config = Some(config);
        self
    }

    pub fn decider(&self) -> &LocalSearchDecider<S, D, M, MS, A> {
        &self.decider
    }

    pub fn move_thread_config(&self) -> Option<MoveThreadConfig> {
        self.move_thread_config
    }
}

impl<S, D, M, MS, A> Debug for LocalSearchPhase<S, D, M, MS, A>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    MS: Debug,
    A: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalSearchPhase")
            .field("decider", &self.decider)
            .field("termination", &self.termination)
            .field("move_thread_config", &self.move_thread_config)
            .finish()
    }
}

impl<S, D, M, MS, A> Phase<S, D> for LocalSearchPhase<S, D, M, MS, A>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
    MS: MoveSelector<S, D, M>,
    A: Acceptor<S>,
{
    fn solving_started(&mut self, solver_scope: &mut SolverScope<S, D>) -> Result<()> {
        let seed = solver_scope.next_seed();
        self.decider
            .solving_started(solver_scope.score_director(), seed)
    }

    fn solve(
        &mut self,
        solver_scope: &mut SolverScope<S, D>,
        phase_index: usize,
        solver_termination: &dyn Termination<S, D>,
    ) -> Result<()> {
        let mut phase_scope = PhaseScope::new(solver_scope, phase_index);
        info!(
            event = "phase_start",
            phase = "LocalSearch",
            phase_index,
            move_threads = self.move_thread_config.map_or(0, |config| config.move_thread_count),
        );
        phase_scope
            .solver_scope()
            .event_support()
            .fire_phase_started(phase_index);

        let decider = &mut self.decider;
        let termination = PhaseTermination {
            solver: solver_termination,
            phase: self.termination.as_deref(),
        };
        decider.phase_started(&mut phase_scope)?;
        let outcome = match self.move_thread_config {
            None => run_steps(decider, &mut phase_scope, &termination, None),
            Some(config) => std::thread::scope(|scope| {
                let mut pool = MoveThreadPool::start(
                    scope,
                    phase_scope.score_director(),
                    config,
                    decider.assertions(),
                );
                match run_steps(&mut *decider, &mut phase_scope, &termination, Some(&mut pool)) {
                    Ok(()) => {
                        let calculation_count = pool.destroy()?;
                        phase_scope
                            .solver_scope_mut()
                            .add_move_thread_calculation_count(calculation_count);
                        Ok(())
                    }
                    Err(error) => {
                        pool.cancel();
                        Err(error)
                    }
                }
            }),
        };
        decider.phase_ended();
        outcome?;

        let best_score = phase_scope.best_score();
        let duration = phase_scope.elapsed();
        let calculation_count = phase_scope.calculation_count();
        let speed = calculation_count.saturating_mul(1000) / (duration.as_millis().max(1) as u64);
        info!(
            event = "phase_end",
            phase = "LocalSearch",
            phase_index,
            duration_ms = duration.as_millis() as u64,
            steps = phase_scope.step_count(),
            speed,
            score = %best_score,
        );
        phase_scope
            .solver_scope()
            .event_support()
            .fire_phase_ended(phase_index, &best_score);
        Ok(())
    }

    fn phase_type_name(&self) -> &'static str {
        "LocalSearch"
    }
}

fn run_steps<S, D, M, MS, A>(
    decider: &mut LocalSearchDecider<S, D, M, MS, A>,
    phase_scope: &mut PhaseScope<'_, S, D>,
    termination: &PhaseTermination<'_, S, D>,
    mut pool: Option<&mut MoveThreadPool<'_, S, D, M>>,
) -> Result<()>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
    MS: MoveSelector<S, D, M>,
    A: Acceptor<S>,
{
    let assertions = decider.assertions();
    loop {
        phase_scope.solver_scope().check_yielding();
        if termination.is_terminated(phase_scope) {
            break;
        }
        let time_gradient = termination.time_gradient(phase_scope);
        let mut step_scope = StepScope::new(phase_scope).with_time_gradient(time_gradient);
        let step_index = step_scope.step_index();
        decider.step_started(&mut step_scope)?;

        let winner = match pool.as_deref_mut() {
            Some(pool) => decider.decide_next_step_multi_threaded(&mut step_scope, termination, pool)?,
            None => decider.decide_next_step(&mut step_scope, termination)?,
        };
        let Some(winner) = winner else {
            warn!(
                event = "step_without_move",
                step = step_index,
                selected = step_scope.selected_move_count(),
            );
            decider.step_abandoned();
            break;
        };

        apply_step(
            step_scope.score_director_mut(),
            &winner.mv,
            winner.score,
            assertions,
        )?;
        step_scope.set_step_score(winner.score);
        step_scope.set_step_string(winner.mv.to_string());
        step_scope.update_best_solution();
        decider.step_ended(&step_scope, &winner);
        if let Some(pool) = pool.as_deref_mut() {
            pool.set_pending_step(step_index + 1, winner.mv.clone(), winner.score);
        }

        let phase = step_scope.phase_scope();
        let best_score = phase.best_score();
        let solver_scope = phase.solver_scope();
        if solver_scope.event_support().has_listeners() {
            solver_scope.event_support().fire_step_ended(&StepEndedEvent {
                phase_index: phase.phase_index(),
                step_index,
                step_score: winner.score,
                best_score,
                step: winner.mv.to_string(),
                selected_move_count: step_scope.selected_move_count(),
                accepted_move_count: step_scope.accepted_move_count(),
                time_spent: solver_scope.elapsed(),
            });
        }
        debug!(
            event = "step_end",
            step = step_index,
            selected = step_scope.selected_move_count(),
            accepted = step_scope.accepted_move_count(),
            score = %winner.score,
            best_score = %best_score,
            improved = step_scope.is_best_score_improved(),
            mv = %winner.mv,
        );
        step_scope.complete();
    }
    Ok(())
}
