//! Publication of the best solution to other threads.

use std::fmt::{self, Debug};
use std::sync::Arc;
use std::time::Duration;

use planforge_core::domain::PlanningSolution;
use tokio::sync::watch;

/// A best solution together with its score and when it was found.
#[derive(Debug)]
pub struct BestSolution<S: PlanningSolution> {
    pub solution: Arc<S>,
    pub score: S::Score,
    /// Time since solving started.
    pub time_spent: Duration,
}

impl<S: PlanningSolution> Clone for BestSolution<S> {
    fn clone(&self) -> Self {
        Self {
            solution: Arc::clone(&self.solution),
            score: self.score,
            time_spent: self.time_spent,
        }
    }
}

/// Holds the latest best solution, readable from any thread.
///
/// Backed by a `watch` channel: the solver thread replaces the value, and
/// readers either poll [`BestSolutionHolder::get`] or wait on a receiver.
/// No async runtime is needed to publish or to read.
pub struct BestSolutionHolder<S: PlanningSolution> {
    sender: watch::Sender<Option<BestSolution<S>>>,
}

impl<S: PlanningSolution> Debug for BestSolutionHolder<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BestSolutionHolder")
            .field("best_score", &self.best_score())
            .finish()
    }
}

impl<S: PlanningSolution> Default for BestSolutionHolder<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: PlanningSolution> BestSolutionHolder<S> {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self { sender }
    }

    pub(crate) fn publish(&self, best: BestSolution<S>) {
        self.sender.send_replace(Some(best));
    }

    /// Returns the latest best solution, if any.
    pub fn get(&self) -> Option<BestSolution<S>> {
        self.sender.borrow().clone()
    }

    pub fn best_score(&self) -> Option<S::Score> {
        self.sender.borrow().as_ref().map(|best| best.score)
    }

    /// Subscribes to best solution changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<BestSolution<S>>> {
        self.sender.subscribe()
    }
}
