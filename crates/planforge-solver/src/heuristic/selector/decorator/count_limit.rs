//! Selected count limit move selector decorator.
//!
//! Limits the number of moves yielded from an inner selector per step.

use std::fmt::{self, Debug};
use std::marker::PhantomData;

use planforge_core::domain::PlanningSolution;
use planforge_core::error::Result;
use planforge_scoring::ScoreDirector;

use crate::heuristic::r#move::Move;
use crate::heuristic::selector::MoveSelector;

/// Yields at most `limit` moves of the inner selector per step.
///
/// Wrapping a never-ending selector makes it finite.
pub struct SelectedCountLimitMoveSelector<S, D, M, Inner> {
    inner: Inner,
    limit: usize,
    _phantom: PhantomData<fn() -> (S, D, M)>,
}

impl<S, D, M, Inner> SelectedCountLimitMoveSelector<S, D, M, Inner> {
    pub fn new(inner: Inner, limit: usize) -> Self {
        Self {
            inner,
            limit,
            _phantom: PhantomData,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl<S, D, M, Inner: Debug> Debug for SelectedCountLimitMoveSelector<S, D, M, Inner> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedCountLimitMoveSelector")
            .field("inner", &self.inner)
            .field("limit", &self.limit)
            .finish()
    }
}

impl<S, D, M, Inner> MoveSelector<S, D, M> for SelectedCountLimitMoveSelector<S, D, M, Inner>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
    Inner: MoveSelector<S, D, M>,
{
    fn iter_moves<'a>(&'a mut self, score_director: &D) -> Box<dyn Iterator<Item = M> + 'a> {
        let limit = self.limit;
        Box::new(self.inner.iter_moves(score_director).take(limit))
    }

    fn size(&self, score_director: &D) -> usize {
        self.inner.size(score_director).min(self.limit)
    }

    fn is_never_ending(&self) -> bool {
        false
    }

    fn snapshot_revision(&self) -> u64 {
        self.inner.snapshot_revision()
    }

    fn solving_started(&mut self, score_director: &D, seed: u64) -> Result<()> {
        self.inner.solving_started(score_director, seed)
    }

    fn phase_started(&mut self, score_director: &D, seed: u64) -> Result<()> {
        self.inner.phase_started(score_director, seed)
    }

    fn step_started(&mut self, score_director: &D, seed: u64) -> Result<()> {
        self.inner.step_started(score_director, seed)
    }

    fn step_ended(&mut self) {
        self.inner.step_ended();
    }

    fn phase_ended(&mut self) {
        self.inner.phase_ended();
    }
}
