//! Result queue that restores move index order.

use std::collections::BTreeMap;

use crossbeam::channel::{self, Receiver, Sender, TryRecvError};
use planforge_core::error::{PlanForgeError, Result};

/// The outcome of one move evaluation on a move thread.
#[derive(Debug, Clone)]
pub struct MoveResult<M, Sc> {
    pub move_thread_index: usize,
    pub step_index: u64,
    pub move_index: u64,
    /// The move, rebased onto the move thread's working solution.
    pub mv: M,
    /// `None` if the move was not doable.
    pub score: Option<Sc>,
}

impl<M, Sc> MoveResult<M, Sc> {
    pub fn is_doable(&self) -> bool {
        self.score.is_some()
    }
}

enum QueueItem<M, Sc> {
    Move(MoveResult<M, Sc>),
    Exception {
        move_thread_index: usize,
        error: PlanForgeError,
    },
}

/// The move thread side of an [`OrderByMoveIndexQueue`].
///
/// Every method returns false once the queue is gone, which tells the
/// move thread to stop.
pub struct MoveResultSender<M, Sc> {
    sender: Sender<QueueItem<M, Sc>>,
}

impl<M, Sc> Clone for MoveResultSender<M, Sc> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<M, Sc> MoveResultSender<M, Sc> {
    pub fn add_move(
        &self,
        move_thread_index: usize,
        step_index: u64,
        move_index: u64,
        mv: M,
        score: Sc,
    ) -> bool {
        self.send(QueueItem::Move(MoveResult {
            move_thread_index,
            step_index,
            move_index,
            mv,
            score: Some(score),
        }))
    }

    pub fn add_undoable_move(
        &self,
        move_thread_index: usize,
        step_index: u64,
        move_index: u64,
        mv: M,
    ) -> bool {
        self.send(QueueItem::Move(MoveResult {
            move_thread_index,
            step_index,
            move_index,
            mv,
            score: None,
        }))
    }

    /// Forwards a move thread failure to the solver thread.
    pub fn add_exception(&self, move_thread_index: usize, error: PlanForgeError) -> bool {
        self.send(QueueItem::Exception {
            move_thread_index,
            error,
        })
    }

    fn send(&self, item: QueueItem<M, Sc>) -> bool {
        self.sender.send(item).is_ok()
    }
}

/// Hands move results to the solver thread strictly in move index order,
/// however the move threads interleave.
///
/// Results of earlier steps, which arrive after the forager quit early,
/// are dropped. A move thread failure is returned by the next
/// [`take`](Self::take) or [`start_next_step`](Self::start_next_step).
///
/// # Examples
///
/// ```
/// use planforge_solver::thread::OrderByMoveIndexQueue;
///
/// let (sender, mut queue) = OrderByMoveIndexQueue::<&str, i64>::bounded(8);
/// queue.start_next_step(0).unwrap();
/// sender.add_move(1, 0, 1, "second", -2);
/// sender.add_move(0, 0, 0, "first", -1);
///
/// assert_eq!(queue.take().unwrap().mv, "first");
/// assert_eq!(queue.take().unwrap().mv, "second");
/// ```
pub struct OrderByMoveIndexQueue<M, Sc> {
    receiver: Receiver<QueueItem<M, Sc>>,
    step_index: Option<u64>,
    next_move_index: u64,
    backlog: BTreeMap<u64, MoveResult<M, Sc>>,
}

impl<M, Sc> OrderByMoveIndexQueue<M, Sc> {
    /// Creates a queue holding up to `capacity` unconsumed results.
    pub fn bounded(capacity: usize) -> (MoveResultSender<M, Sc>, Self) {
        let (sender, receiver) = channel::bounded(capacity);
        let queue = Self {
            receiver,
            step_index: None,
            next_move_index: 0,
            backlog: BTreeMap::new(),
        };
        (MoveResultSender { sender }, queue)
    }

    /// Switches to `step_index`, dropping every buffered result.
    ///
    /// Fails with a move thread failure that arrived meanwhile.
    pub fn start_next_step(&mut self, step_index: u64) -> Result<()> {
        self.step_index = Some(step_index);
        self.next_move_index = 0;
        self.backlog.clear();
        loop {
            match self.receiver.try_recv() {
                Ok(QueueItem::Move(_)) => {}
                Ok(QueueItem::Exception {
                    move_thread_index,
                    error,
                }) => return Err(Self::reraise(move_thread_index, error)),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return Ok(()),
            }
        }
    }

    /// Blocks until the result with the next move index of the current
    /// step arrives.
    pub fn take(&mut self) -> Result<MoveResult<M, Sc>> {
        let Some(step_index) = self.step_index else {
            return Err(PlanForgeError::InvalidState(
                "take() called before start_next_step()".to_string(),
            ));
        };
        loop {
            if let Some(result) = self.backlog.remove(&self.next_move_index) {
                self.next_move_index += 1;
                return Ok(result);
            }
            match self.receiver.recv() {
                Ok(QueueItem::Move(result)) => {
                    if result.step_index == step_index && result.move_index >= self.next_move_index
                    {
                        self.backlog.insert(result.move_index, result);
                    }
                }
                Ok(QueueItem::Exception {
                    move_thread_index,
                    error,
                }) => return Err(Self::reraise(move_thread_index, error)),
                Err(_) => {
                    return Err(PlanForgeError::Internal(
                        "every move thread stopped while results were pending".to_string(),
                    ))
                }
            }
        }
    }

    /// Returns a move thread failure that already arrived, without
    /// blocking. Results received meanwhile stay queued.
    pub fn try_take_exception(&mut self) -> Option<PlanForgeError> {
        loop {
            match self.receiver.try_recv() {
                Ok(QueueItem::Move(result)) => {
                    if Some(result.step_index) == self.step_index
                        && result.move_index >= self.next_move_index
                    {
                        self.backlog.insert(result.move_index, result);
                    }
                }
                Ok(QueueItem::Exception {
                    move_thread_index,
                    error,
                }) => return Some(Self::reraise(move_thread_index, error)),
                Err(_) => return None,
            }
        }
    }

    /// Results received but not yet taken.
    pub fn backlog_len(&self) -> usize {
        self.backlog.len()
    }

    fn reraise(move_thread_index: usize, error: PlanForgeError) -> PlanForgeError {
        tracing::debug!(
            event = "move_thread_exception",
            move_thread_index,
            error = %error,
        );
        error
    }
}
