//! The loop run by every move thread.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam::channel::{select, Receiver};
use planforge_core::domain::PlanningSolution;
use planforge_core::error::{PlanForgeError, Result};
use planforge_core::score::Score;
use planforge_scoring::ScoreDirector;
use tracing::trace;

use crate::heuristic::r#move::Move;
use crate::phase::localsearch::{apply_step, score_move, StepAssertions};

use super::barrier::MoveThreadBarrier;
use super::operation::MoveThreadOperation;
use super::queue::MoveResultSender;

/// Why a move thread stopped.
enum Exit {
    Destroyed,
    Cancelled,
}

pub(crate) struct MoveThreadRunner<S: PlanningSolution, D, M> {
    pub(crate) move_thread_index: usize,
    pub(crate) operations: Receiver<MoveThreadOperation<S, D, M>>,
    pub(crate) cancel: Receiver<()>,
    pub(crate) results: MoveResultSender<M, S::Score>,
    pub(crate) barrier: Arc<MoveThreadBarrier>,
    /// Evaluations of steps below this index are skipped.
    pub(crate) evaluated_step_floor: Arc<AtomicU64>,
    pub(crate) assertions: StepAssertions,
}

struct WorkerState<S: PlanningSolution, D> {
    score_director: Option<D>,
    step_index: u64,
    last_step_score: S::Score,
}

impl<S, D, M> MoveThreadRunner<S, D, M>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
{
    /// Runs until destroyed, cancelled or failed. Returns the score
    /// calculation count of the child score director.
    ///
    /// A failure, panics included, goes to the result queue and breaks the
    /// barrier so no sibling stays blocked on it.
    pub(crate) fn run(self) -> u64 {
        let mut state = WorkerState {
            score_director: None,
            step_index: 0,
            last_step_score: S::Score::zero(),
        };
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.process(&mut state)));
        let failure = match outcome {
            Ok(Ok(Exit::Destroyed)) => None,
            Ok(Ok(Exit::Cancelled)) => {
                trace!(event = "move_thread_cancelled", move_thread_index = self.move_thread_index);
                None
            }
            Ok(Err(error)) => Some(error),
            Err(payload) => Some(PlanForgeError::MoveThread {
                move_thread_index: self.move_thread_index,
                message: panic_message(payload.as_ref()),
            }),
        };
        if let Some(error) = failure {
            trace!(
                event = "move_thread_failed",
                move_thread_index = self.move_thread_index,
                error = %error,
            );
            self.results.add_exception(self.move_thread_index, error);
            self.barrier.break_barrier();
        }
        state
            .score_director
            .as_ref()
            .map_or(0, |score_director| score_director.calculation_count())
    }

    fn process(&self, state: &mut WorkerState<S, D>) -> Result<Exit> {
        loop {
            let operation = select! {
                recv(self.cancel) -> _ => return Ok(Exit::Cancelled),
                recv(self.operations) -> operation => match operation {
                    Ok(operation) => operation,
                    Err(_) => return Ok(Exit::Cancelled),
                },
            };
            match operation {
                MoveThreadOperation::Setup(mut score_director) => {
                    state.last_step_score = score_director.calculate_score();
                    state.score_director = Some(score_director);
                    trace!(
                        event = "move_thread_setup",
                        move_thread_index = self.move_thread_index,
                        score = %state.last_step_score,
                    );
                    if self.barrier.wait().is_err() {
                        return Ok(Exit::Cancelled);
                    }
                }
                MoveThreadOperation::ApplyStep {
                    step_index,
                    step,
                    score,
                } => {
                    if step_index != state.step_index + 1 {
                        return Err(PlanForgeError::InvalidState(format!(
                            "move thread ({}) at step index ({}) received step index ({})",
                            self.move_thread_index, state.step_index, step_index
                        )));
                    }
                    let score_director = self.score_director(state)?;
                    let step = step.rebase(score_director)?;
                    apply_step(score_director, &step, score, self.assertions)?;
                    state.step_index = step_index;
                    state.last_step_score = score;
                    trace!(
                        event = "move_thread_step",
                        move_thread_index = self.move_thread_index,
                        step = step_index,
                        score = %score,
                    );
                    if self.barrier.wait().is_err() {
                        return Ok(Exit::Cancelled);
                    }
                }
                MoveThreadOperation::MoveEvaluation {
                    step_index,
                    move_index,
                    mv,
                } => {
                    if step_index < self.evaluated_step_floor.load(Ordering::Acquire) {
                        continue;
                    }
                    if step_index != state.step_index {
                        return Err(PlanForgeError::InvalidState(format!(
                            "move thread ({}) at step index ({}) received move index ({}) \
                             of step index ({})",
                            self.move_thread_index, state.step_index, move_index, step_index
                        )));
                    }
                    let last_step_score = state.last_step_score;
                    let score_director = self.score_director(state)?;
                    let mv = mv.rebase(score_director)?;
                    let sent = if mv.is_doable(score_director) {
                        let score =
                            score_move(score_director, &mv, last_step_score, self.assertions)?;
                        trace!(
                            event = "move_thread_evaluation",
                            move_thread_index = self.move_thread_index,
                            step = step_index,
                            move_index,
                            score = %score,
                        );
                        self.results
                            .add_move(self.move_thread_index, step_index, move_index, mv, score)
                    } else {
                        self.results.add_undoable_move(
                            self.move_thread_index,
                            step_index,
                            move_index,
                            mv,
                        )
                    };
                    if !sent {
                        return Ok(Exit::Cancelled);
                    }
                }
                MoveThreadOperation::Destroy => return Ok(Exit::Destroyed),
            }
        }
    }

    fn score_director<'s>(&self, state: &'s mut WorkerState<S, D>) -> Result<&'s mut D> {
        state.score_director.as_mut().ok_or_else(|| {
            PlanForgeError::InvalidState(format!(
                "move thread ({}) received an operation before its setup",
                self.move_thread_index
            ))
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "move thread panicked".to_string()
    }
}
