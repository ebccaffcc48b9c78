//! Sorting move selector decorator.
//!
//! Sorts moves from an inner selector using a comparator function.

use std::cmp::Ordering;
use std::fmt::{self, Debug};
use std::marker::PhantomData;

use planforge_config::SorterOrder;
use planforge_core::domain::PlanningSolution;
use planforge_core::error::Result;
use planforge_scoring::ScoreDirector;

use crate::heuristic::r#move::Move;
use crate::heuristic::selector::MoveSelector;

/// Compares two moves against the working solution.
pub type MoveComparator<S, M> = Box<dyn Fn(&S, &M, &M) -> Ordering + Send>;

/// Sorts moves from an inner selector using a comparator.
///
/// Collects all moves of the step from the finite inner selector and yields
/// them in sorted order. Equal moves keep their inner order.
pub struct SortingMoveSelector<S, D, M, Inner> {
    inner: Inner,
    comparator: MoveComparator<S, M>,
    _phantom: PhantomData<fn() -> D>,
}

impl<S, D, M, Inner> SortingMoveSelector<S, D, M, Inner>
where
    S: PlanningSolution,
    M: Move<S>,
{
    pub fn new(inner: Inner, comparator: MoveComparator<S, M>) -> Self {
        Self {
            inner,
            comparator,
            _phantom: PhantomData,
        }
    }

    /// Sorts by the difficulty of the first entity a move changes.
    pub fn by_entity_difficulty(
        inner: Inner,
        difficulty: fn(&S, usize) -> i64,
        order: SorterOrder,
    ) -> Self {
        let key = move |solution: &S, mv: &M| -> Option<i64> {
            mv.entity_indices()
                .first()
                .map(|&entity_index| difficulty(solution, entity_index))
        };
        let comparator: MoveComparator<S, M> = Box::new(move |solution: &S, a: &M, b: &M| {
            let ordering = key(solution, a).cmp(&key(solution, b));
            match order {
                SorterOrder::Ascending => ordering,
                SorterOrder::Descending => ordering.reverse(),
            }
        });
        Self::new(inner, comparator)
    }
}

impl<S, D, M, Inner: Debug> Debug for SortingMoveSelector<S, D, M, Inner> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortingMoveSelector")
            .field("inner", &self.inner)
            .finish()
    }
}

impl<S, D, M, Inner> MoveSelector<S, D, M> for SortingMoveSelector<S, D, M, Inner>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
    Inner: MoveSelector<S, D, M>,
{
    fn iter_moves<'a>(&'a mut self, score_director: &D) -> Box<dyn Iterator<Item = M> + 'a> {
        let solution = score_director.working_solution();
        let comparator = &self.comparator;
        let mut moves: Vec<M> = self.inner.iter_moves(score_director).collect();
        moves.sort_by(|a, b| comparator(solution, a, b));
        Box::new(moves.into_iter())
    }

    fn size(&self, score_director: &D) -> usize {
        self.inner.size(score_director)
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
