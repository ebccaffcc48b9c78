//! Move thread pool.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{Scope, ScopedJoinHandle};

use crossbeam::channel::{self, Sender};
use planforge_core::domain::PlanningSolution;
use planforge_core::error::{PlanForgeError, Result};
use planforge_scoring::{ChildThreadType, ScoreDirector};
use tracing::{debug, trace};

use crate::heuristic::r#move::Move;
use crate::phase::localsearch::StepAssertions;

use super::barrier::MoveThreadBarrier;
use super::operation::MoveThreadOperation;
use super::queue::{MoveResult, OrderByMoveIndexQueue};
use super::runner::MoveThreadRunner;

/// Resolved move thread settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveThreadConfig {
    pub move_thread_count: usize,
    /// Moves in flight per step, across all move threads.
    pub selected_move_buffer_size: usize,
}

impl MoveThreadConfig {
    /// `buffer_size` moves in flight per move thread.
    pub fn new(move_thread_count: usize, buffer_size: usize) -> Self {
        Self {
            move_thread_count,
            selected_move_buffer_size: move_thread_count * buffer_size,
        }
    }
}

/// The move threads of one phase, spawned in a [`std::thread::scope`].
///
/// Operation channels hold the whole selected move buffer plus a setup or
/// step operation and a destroy operation, so the solver thread never
/// blocks on sending. Dropping the cancel sender interrupts every worker
/// waiting for work.
pub struct MoveThreadPool<'scope, S: PlanningSolution, D, M> {
    config: MoveThreadConfig,
    operations: Vec<Sender<MoveThreadOperation<S, D, M>>>,
    cancel: Option<Sender<()>>,
    queue: OrderByMoveIndexQueue<M, S::Score>,
    barrier: Arc<MoveThreadBarrier>,
    evaluated_step_floor: Arc<AtomicU64>,
    handles: Vec<ScopedJoinHandle<'scope, u64>>,
    next_move_thread: usize,
    pending_step: Option<(u64, M, S::Score)>,
}

impl<'scope, S, D, M> MoveThreadPool<'scope, S, D, M>
where
    S: PlanningSolution,
    D: ScoreDirector<S> + 'scope,
    M: Move<S>,
{
    /// Spawns the move threads and sends each one a child of
    /// `score_director`.
    pub fn start<'env>(
        scope: &'scope Scope<'scope, 'env>,
        score_director: &D,
        config: MoveThreadConfig,
        assertions: StepAssertions,
    ) -> Self {
        let thread_count = config.move_thread_count.max(1);
        let buffer_size = config.selected_move_buffer_size.max(1);
        let (results, queue) = OrderByMoveIndexQueue::bounded(2 * buffer_size + thread_count);
        let (cancel_sender, cancel_receiver) = channel::bounded::<()>(0);
        let barrier = Arc::new(MoveThreadBarrier::new(thread_count));
        let evaluated_step_floor = Arc::new(AtomicU64::new(0));

        let mut operations = Vec::with_capacity(thread_count);
        let mut handles = Vec::with_capacity(thread_count);
        for move_thread_index in 0..thread_count {
            let (sender, receiver) = channel::bounded(buffer_size + 2);
            let runner = MoveThreadRunner {
                move_thread_index,
                operations: receiver,
                cancel: cancel_receiver.clone(),
                results: results.clone(),
                barrier: Arc::clone(&barrier),
                evaluated_step_floor: Arc::clone(&evaluated_step_floor),
                assertions,
            };
            handles.push(scope.spawn(move || runner.run()));
            let child = score_director.create_child_thread(ChildThreadType::MoveThread);
            // The channel is empty, so this only fails if the worker is gone,
            // which the first `take` reports.
            let _ = sender.send(MoveThreadOperation::Setup(child));
            operations.push(sender);
        }
        debug!(
            event = "move_threads_started",
            move_thread_count = thread_count,
            selected_move_buffer_size = buffer_size,
        );

        Self {
            config: MoveThreadConfig {
                move_thread_count: thread_count,
                selected_move_buffer_size: buffer_size,
            },
            operations,
            cancel: Some(cancel_sender),
            queue,
            barrier,
            evaluated_step_floor,
            handles,
            next_move_thread: 0,
            pending_step: None,
        }
    }

    pub fn move_thread_count(&self) -> usize {
        self.config.move_thread_count
    }

    pub fn selected_move_buffer_size(&self) -> usize {
        self.config.selected_move_buffer_size
    }

    /// Remembers the winner of step `step_index - 1`, broadcast when step
    /// `step_index` starts.
    pub fn set_pending_step(&mut self, step_index: u64, step: M, score: S::Score) {
        self.pending_step = Some((step_index, step, score));
    }

    /// Broadcasts the pending step and prepares the queue for `step_index`.
    pub fn start_next_step(&mut self, step_index: u64) -> Result<()> {
        if let Some((pending_index, step, score)) = self.pending_step.take() {
            if pending_index != step_index {
                return Err(PlanForgeError::InvalidState(format!(
                    "the pending step index ({pending_index}) is not the next step index \
                     ({step_index})"
                )));
            }
            for move_thread_index in 0..self.operations.len() {
                self.send(
                    move_thread_index,
                    MoveThreadOperation::ApplyStep {
                        step_index,
                        step: step.clone(),
                        score,
                    },
                )?;
            }
        }
        self.queue.start_next_step(step_index)
    }

    /// Sends `mv` to the next move thread in round-robin order.
    pub fn evaluate(&mut self, step_index: u64, move_index: u64, mv: M) -> Result<()> {
        let move_thread_index = self.next_move_thread;
        self.next_move_thread = (self.next_move_thread + 1) % self.operations.len();
        self.send(
            move_thread_index,
            MoveThreadOperation::MoveEvaluation {
                step_index,
                move_index,
                mv,
            },
        )
    }

    /// The next result of the current step, in move index order.
    pub fn take(&mut self) -> Result<MoveResult<M, S::Score>> {
        self.queue.take()
    }

    /// Lets the move threads skip the evaluations of `step_index` they
    /// did not start yet.
    pub fn discard_step(&self, step_index: u64) {
        self.evaluated_step_floor
            .store(step_index + 1, Ordering::Release);
    }

    fn send(&mut self, move_thread_index: usize, operation: MoveThreadOperation<S, D, M>) -> Result<()> {
        if self.operations[move_thread_index].send(operation).is_ok() {
            return Ok(());
        }
        // The worker stopped: report its failure if it left one.
        Err(self
            .queue
            .try_take_exception()
            .unwrap_or_else(|| PlanForgeError::MoveThread {
                move_thread_index,
                message: "the move thread stopped unexpectedly".to_string(),
            }))
    }

    /// Stops the move threads and returns the sum of their score
    /// calculation counts.
    pub fn destroy(mut self) -> Result<u64> {
        for sender in &self.operations {
            let _ = sender.send(MoveThreadOperation::Destroy);
        }
        self.operations.clear();
        let mut calculation_count = 0;
        let mut panicked = None;
        for (move_thread_index, handle) in self.handles.drain(..).enumerate() {
            match handle.join() {
                Ok(count) => calculation_count += count,
                Err(_) => panicked = Some(move_thread_index),
            }
        }
        if let Some(move_thread_index) = panicked {
            return Err(PlanForgeError::MoveThread {
                move_thread_index,
                message: "the move thread panicked outside its operation loop".to_string(),
            });
        }
        if let Some(error) = self.queue.try_take_exception() {
            return Err(error);
        }
        trace!(event = "move_threads_destroyed", calculation_count);
        Ok(calculation_count)
    }

    /// Interrupts the move threads and waits for them, discarding their
    /// work. Used when the phase fails.
    pub fn cancel(mut self) {
        let handles: Vec<_> = self.handles.drain(..).collect();
        drop(self);
        for handle in handles {
            let _ = handle.join();
        }
    }
}

impl<S: PlanningSolution, D, M> Drop for MoveThreadPool<'_, S, D, M> {
    fn drop(&mut self) {
        // A worker may be waiting on the barrier for a sibling that takes
        // the cancel branch instead of its last operation.
        self.cancel.take();
        self.barrier.break_barrier();
    }
}
