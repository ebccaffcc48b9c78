//! Filtering move selector decorator.
//!
//! Filters moves from an inner selector based on a predicate function.

use std::fmt::{self, Debug};
use std::marker::PhantomData;

use planforge_core::domain::PlanningSolution;
use planforge_core::error::Result;
use planforge_scoring::ScoreDirector;
use tracing::trace;

use crate::heuristic::r#move::Move;
use crate::heuristic::selector::MoveSelector;

/// A move predicate, evaluated against the solution as it was when the step
/// started.
pub type MoveFilter<S, M> = fn(&S, &M) -> bool;

/// Never-ending selectors give up after this many consecutive rejections per
/// distinct move.
const BAIL_OUT_MULTIPLIER: usize = 10;

/// Filters moves from an inner selector using a predicate function.
///
/// Only moves for which the predicate returns `true` are yielded. The
/// predicate sees a snapshot of the working solution taken at step start,
/// because moves are applied and undone while the iterator is alive.
///
/// Over a never-ending inner selector the iterator ends once
/// `10 × size` consecutive moves were rejected.
pub struct FilteringMoveSelector<S, D, M, Inner> {
    inner: Inner,
    filter: MoveFilter<S, M>,
    snapshot: Option<S>,
    _phantom: PhantomData<fn() -> D>,
}

impl<S, D, M, Inner> FilteringMoveSelector<S, D, M, Inner> {
    pub fn new(inner: Inner, filter: MoveFilter<S, M>) -> Self {
        Self {
            inner,
            filter,
            snapshot: None,
            _phantom: PhantomData,
        }
    }
}

impl<S, D, M, Inner: Debug> Debug for FilteringMoveSelector<S, D, M, Inner> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilteringMoveSelector")
            .field("inner", &self.inner)
            .finish()
    }
}

impl<S, D, M, Inner> MoveSelector<S, D, M> for FilteringMoveSelector<S, D, M, Inner>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
    Inner: MoveSelector<S, D, M>,
{
    fn iter_moves<'a>(&'a mut self, score_director: &D) -> Box<dyn Iterator<Item = M> + 'a> {
        let filter = self.filter;
        let bail_out_size = self
            .inner
            .is_never_ending()
            .then(|| self.inner.size(score_director).max(1) * BAIL_OUT_MULTIPLIER);
        let solution: &S = self
            .snapshot
            .get_or_insert_with(|| score_director.working_solution().clone());
        let mut moves = self.inner.iter_moves(score_director);

        Box::new(std::iter::from_fn(move || {
            let mut rejected = 0;
            loop {
                let candidate = moves.next()?;
                if filter(solution, &candidate) {
                    return Some(candidate);
                }
                rejected += 1;
                if bail_out_size.is_some_and(|limit| rejected >= limit) {
                    trace!(
                        event = "filter_bail_out",
                        rejected,
                        "Filtering selector rejected every sampled move"
                    );
                    return None;
                }
            }
        }))
    }

    fn size(&self, score_director: &D) -> usize {
        self.inner.size(score_director)
    }

    fn is_never_ending(&self) -> bool {
        self.inner.is_never_ending()
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
        self.snapshot = Some(score_director.working_solution().clone());
        self.inner.step_started(score_director, seed)
    }

    fn step_ended(&mut self) {
        self.snapshot = None;
        self.inner.step_ended();
    }

    fn phase_ended(&mut self) {
        self.inner.phase_ended();
    }
}
