//! Probabilistic move selector decorator.
//!
//! Samples moves from a finite inner selector proportionally to a weight.

use std::fmt::{self, Debug};
use std::marker::PhantomData;

use planforge_core::domain::PlanningSolution;
use planforge_core::error::Result;
use planforge_scoring::ScoreDirector;
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::warn;

use crate::heuristic::r#move::Move;
use crate::heuristic::selector::MoveSelector;

use super::split_seed;

/// Selection weight of a move against the working solution.
pub type MoveWeight<S, M> = Box<dyn Fn(&S, &M) -> f64 + Send>;

/// Samples moves proportionally to their weight, without end.
///
/// The weights are computed once per step against the working solution as
/// it was when `iter_moves` was called. A move of weight 0 is never
/// selected; if every weight is 0 (or invalid) the step yields no moves.
pub struct ProbabilisticMoveSelector<S, D, M, Inner> {
    inner: Inner,
    weight: MoveWeight<S, M>,
    rng: StdRng,
    _phantom: PhantomData<fn() -> D>,
}

impl<S, D, M, Inner> ProbabilisticMoveSelector<S, D, M, Inner>
where
    S: PlanningSolution,
    M: Move<S>,
{
    pub fn new(inner: Inner, weight: MoveWeight<S, M>) -> Self {
        Self {
            inner,
            weight,
            rng: StdRng::seed_from_u64(0),
            _phantom: PhantomData,
        }
    }

    /// Weighs each move by the weight of the first entity it changes.
    pub fn by_entity_weight(inner: Inner, entity_weight: fn(&S, usize) -> f64) -> Self {
        let weight: MoveWeight<S, M> = Box::new(move |solution: &S, mv: &M| {
            mv.entity_indices()
                .first()
                .map_or(0.0, |&entity_index| entity_weight(solution, entity_index))
        });
        Self::new(inner, weight)
    }
}

impl<S, D, M, Inner: Debug> Debug for ProbabilisticMoveSelector<S, D, M, Inner> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProbabilisticMoveSelector")
            .field("inner", &self.inner)
            .finish()
    }
}

impl<S, D, M, Inner> MoveSelector<S, D, M> for ProbabilisticMoveSelector<S, D, M, Inner>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
    Inner: MoveSelector<S, D, M>,
{
    fn iter_moves<'a>(&'a mut self, score_director: &D) -> Box<dyn Iterator<Item = M> + 'a> {
        let solution = score_director.working_solution();
        let moves: Vec<M> = self.inner.iter_moves(score_director).collect();
        let weights = moves.iter().map(|mv| (self.weight)(solution, mv));
        let distribution = match WeightedIndex::new(weights) {
            Ok(distribution) => distribution,
            Err(err) => {
                if !moves.is_empty() {
                    warn!(
                        event = "probabilistic_selector_empty",
                        moves = moves.len(),
                        error = %err,
                        "No move has a positive selection weight"
                    );
                }
                return Box::new(std::iter::empty());
            }
        };
        let rng = &mut self.rng;
        Box::new(std::iter::from_fn(move || {
            Some(moves[distribution.sample(rng)].clone())
        }))
    }

    fn size(&self, score_director: &D) -> usize {
        self.inner.size(score_director)
    }

    fn is_never_ending(&self) -> bool {
        true
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
