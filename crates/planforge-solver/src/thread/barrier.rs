//! Breakable cyclic barrier for the move threads.

use std::sync::{Condvar, Mutex, PoisonError};

use thiserror::Error;

/// Returned by [`MoveThreadBarrier::wait`] once the barrier is broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("the move thread barrier is broken")]
pub struct BrokenBarrierError;

#[derive(Debug)]
struct BarrierState {
    waiting: usize,
    generation: u64,
    broken: bool,
}

/// A cyclic barrier that can be broken.
///
/// `std::sync::Barrier` cannot release its waiters early, so a move thread
/// that fails while its siblings wait would hang them forever. Breaking
/// wakes every waiter with an error, now and for any later `wait`.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
/// use planforge_solver::thread::MoveThreadBarrier;
///
/// let barrier = Arc::new(MoveThreadBarrier::new(2));
/// let other = Arc::clone(&barrier);
/// let handle = thread::spawn(move || other.wait());
/// assert!(barrier.wait().is_ok());
/// assert!(handle.join().unwrap().is_ok());
/// ```
#[derive(Debug)]
pub struct MoveThreadBarrier {
    parties: usize,
    state: Mutex<BarrierState>,
    released: Condvar,
}

impl MoveThreadBarrier {
    pub fn new(parties: usize) -> Self {
        Self {
            parties,
            state: Mutex::new(BarrierState {
                waiting: 0,
                generation: 0,
                broken: false,
            }),
            released: Condvar::new(),
        }
    }

    pub fn parties(&self) -> usize {
        self.parties
    }

    /// Blocks until all parties arrived, then resets for the next round.
    pub fn wait(&self) -> Result<(), BrokenBarrierError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.broken {
            return Err(BrokenBarrierError);
        }
        state.waiting += 1;
        if state.waiting >= self.parties {
            state.waiting = 0;
            state.generation += 1;
            self.released.notify_all();
            return Ok(());
        }
        let generation = state.generation;
        while state.generation == generation && !state.broken {
            state = self
                .released
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        if state.generation == generation {
            return Err(BrokenBarrierError);
        }
        Ok(())
    }

    /// Releases every waiter with an error. Permanent.
    pub fn break_barrier(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.broken = true;
        self.released.notify_all();
    }

    pub fn is_broken(&self) -> bool {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .broken
    }
}
