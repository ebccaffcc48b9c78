//! Shuffling move selector decorator.
//!
//! Shuffles moves from an inner selector using Fisher-Yates.

use std::fmt::{self, Debug};
use std::marker::PhantomData;

use planforge_core::domain::PlanningSolution;
use planforge_core::error::Result;
use planforge_scoring::ScoreDirector;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::heuristic::r#move::Move;
use crate::heuristic::selector::MoveSelector;

use super::split_seed;

/// Yields all moves of a finite inner selector in a random permutation.
///
/// The permutation is drawn from a generator reseeded at every lifecycle
/// event, so it is reproducible for a given solver seed.
pub struct ShufflingMoveSelector<S, D, M, Inner> {
    inner: Inner,
    rng: StdRng,
    _phantom: PhantomData<fn() -> (S, D, M)>,
}

impl<S, D, M, Inner> ShufflingMoveSelector<S, D, M, Inner> {
    pub fn new(inner: Inner) -> Self {
        Self {
            inner,
            rng: StdRng::seed_from_u64(0),
            _phantom: PhantomData,
        }
    }
}

impl<S, D, M, Inner: Debug> Debug for ShufflingMoveSelector<S, D, M, Inner> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShufflingMoveSelector")
            .field("inner", &self.inner)
            .finish()
    }
}

impl<S, D, M, Inner> MoveSelector<S, D, M> for ShufflingMoveSelector<S, D, M, Inner>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
    Inner: MoveSelector<S, D, M>,
{
    fn iter_moves<'a>(&'a mut self, score_director: &D) -> Box<dyn Iterator<Item = M> + 'a> {
        let mut moves: Vec<M> = self.inner.iter_moves(score_director).collect();
        moves.shuffle(&mut self.rng);
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
        let (own, child) = split_seed(seed);
        self.rng = StdRng::seed_from_u64(own);
        self.inner.solving_started(score_director, child)
    }

    fn phase_started(&mut self, score_director: &D, seed: u64) -> Result<()> {
        let (own, child) = split_seed(seed);
        self.rng = StdRng::seed_from_u64(own);
        self.inner.phase_started(score_director, child)
    }

    fn step_started(&mut self, score_director: &D, seed: u64) -> Result<()> {
        let (own, child) = split_seed(seed);
        self.rng = StdRng::seed_from_u64(own);
        self.inner.step_started(score_director, child)
    }

    fn step_ended(&mut self) {
        self.inner.step_ended();
    }

    fn phase_ended(&mut self) {
        self.inner.phase_ended();
    }
}
