//! Cooperative CPU throttling between solvers.

use std::sync::{Condvar, Mutex, PoisonError};

/// A counting semaphore shared by solvers that take turns on the CPU.
///
/// A solver holds one permit while it solves. Once per step it calls
/// [`YieldThrottle::check_yielding`], which hands the permit back and waits
/// for a permit again, so solvers beyond the permit count get to run.
#[derive(Debug)]
pub struct YieldThrottle {
    permits: Mutex<usize>,
    available: Condvar,
}

impl YieldThrottle {
    pub fn new(permits: usize) -> Self {
        Self {
            permits: Mutex::new(permits),
            available: Condvar::new(),
        }
    }

    /// Blocks until a permit is available and takes it.
    pub fn acquire(&self) {
        let mut permits = self.permits.lock().unwrap_or_else(PoisonError::into_inner);
        while *permits == 0 {
            permits = self
                .available
                .wait(permits)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *permits -= 1;
    }

    pub fn release(&self) {
        let mut permits = self.permits.lock().unwrap_or_else(PoisonError::into_inner);
        *permits += 1;
        self.available.notify_one();
    }

    /// Returns the caller's permit and takes one again.
    pub fn check_yielding(&self) {
        self.release();
        self.acquire();
    }

    pub fn available_permits(&self) -> usize {
        *self.permits.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
