//! Event system for solver monitoring.
//!
//! Listeners registered on a [`SolverEventSupport`] are notified
//! synchronously, in registration order, on the solver thread.
//!
//! # Usage
//!
//! ```
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//! use planforge_core::score::SimpleScore;
//! use planforge_solver::event::{SolverEventListener, SolverEventSupport};
//! use planforge_test::nqueens::NQueensSolution;
//!
//! #[derive(Debug, Default)]
//! struct CountingListener(AtomicUsize);
//!
//! impl SolverEventListener<NQueensSolution> for CountingListener {
//!     fn on_best_solution_changed(&self, _solution: &NQueensSolution, _score: &SimpleScore) {
//!         self.0.fetch_add(1, Ordering::Relaxed);
//!     }
//! }
//!
//! let listener = Arc::new(CountingListener::default());
//! let mut support = SolverEventSupport::<NQueensSolution>::new();
//! support.add_listener(listener.clone());
//! support.fire_best_solution_changed(&NQueensSolution::with_rows(&[1, 3, 0, 2]), &SimpleScore::of(0));
//! assert_eq!(listener.0.load(Ordering::Relaxed), 1);
//! ```

use std::fmt::{self, Debug};
use std::sync::Arc;
use std::time::Duration;

use planforge_core::domain::PlanningSolution;

/// Summary of a completed local search step.
#[derive(Debug, Clone)]
pub struct StepEndedEvent<Sc> {
    pub phase_index: usize,
    pub step_index: u64,
    pub step_score: Sc,
    pub best_score: Sc,
    /// Display string of the winning move.
    pub step: String,
    pub selected_move_count: u64,
    pub accepted_move_count: u64,
    pub time_spent: Duration,
}

/// Listener for solver events.
///
/// Only `on_best_solution_changed` is required; the lifecycle callbacks
/// default to doing nothing.
pub trait SolverEventListener<S: PlanningSolution>: Send + Sync + Debug {
    /// Called when a new best solution is found.
    fn on_best_solution_changed(&self, solution: &S, score: &S::Score);

    fn on_solving_started(&self, _solution: &S) {}

    fn on_solving_ended(&self, _solution: &S, _is_terminated_early: bool) {}

    fn on_phase_started(&self, _phase_index: usize) {}

    fn on_phase_ended(&self, _phase_index: usize, _best_score: &S::Score) {}

    fn on_step_ended(&self, _event: &StepEndedEvent<S::Score>) {}
}

/// Broadcasts solver events to the registered listeners.
pub struct SolverEventSupport<S: PlanningSolution> {
    listeners: Vec<Arc<dyn SolverEventListener<S>>>,
}

impl<S: PlanningSolution> Default for SolverEventSupport<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: PlanningSolution> Debug for SolverEventSupport<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolverEventSupport")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<S: PlanningSolution> SolverEventSupport<S> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn add_listener(&mut self, listener: Arc<dyn SolverEventListener<S>>) {
        self.listeners.push(listener);
    }

    pub fn has_listeners(&self) -> bool {
        !self.listeners.is_empty()
    }

    pub fn fire_best_solution_changed(&self, solution: &S, score: &S::Score) {
        for listener in &self.listeners {
            listener.on_best_solution_changed(solution, score);
        }
    }

    pub fn fire_solving_started(&self, solution: &S) {
        for listener in &self.listeners {
            listener.on_solving_started(solution);
        }
    }

    pub fn fire_solving_ended(&self, solution: &S, is_terminated_early: bool) {
        for listener in &self.listeners {
            listener.on_solving_ended(solution, is_terminated_early);
        }
    }

    pub fn fire_phase_started(&self, phase_index: usize) {
        for listener in &self.listeners {
            listener.on_phase_started(phase_index);
        }
    }

    pub fn fire_phase_ended(&self, phase_index: usize, best_score: &S::Score) {
        for listener in &self.listeners {
            listener.on_phase_ended(phase_index, best_score);
        }
    }

    pub fn fire_step_ended(&self, event: &StepEndedEvent<S::Score>) {
        for listener in &self.listeners {
            listener.on_step_ended(event);
        }
    }
}
