//! Caching move selector decorator.
//!
//! Collects the moves of an inner selector once and replays them until the
//! cache type allows a rebuild.

use std::fmt::{self, Debug};
use std::marker::PhantomData;

use planforge_config::SelectionCacheType;
use planforge_core::domain::PlanningSolution;
use planforge_core::error::{PlanForgeError, Result};
use planforge_scoring::ScoreDirector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::heuristic::r#move::Move;
use crate::heuristic::selector::{must_rebuild, CacheEvent, MoveSelector};

use super::split_seed;

/// Caches the moves of a finite inner selector.
///
/// The cache is keyed on the inner selector's size and snapshot revision, so
/// entities or values that change at the same size still count as a change.
/// A `Step` cache is rebuilt at a step start when that key changed. A `Phase`
/// cache is rebuilt at every phase start and a `Solver` cache only when
/// solving starts; if their key changes while locked, the next lifecycle
/// event fails instead of replaying stale moves.
///
/// In random order the cached moves are sampled uniformly without end.
pub struct CachingMoveSelector<S, D, M, Inner> {
    inner: Inner,
    cache_type: SelectionCacheType,
    random: bool,
    cache: Vec<M>,
    /// Inner size and snapshot revision of the last rebuild.
    built: Option<(usize, u64)>,
    rng: StdRng,
    _phantom: PhantomData<fn() -> (S, D)>,
}

impl<S, D, M, Inner> CachingMoveSelector<S, D, M, Inner>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
    Inner: MoveSelector<S, D, M>,
{
    /// Wraps `inner`, which must not be never-ending.
    pub fn new(inner: Inner, cache_type: SelectionCacheType) -> Result<Self> {
        if inner.is_never_ending() {
            return Err(PlanForgeError::Config(format!(
                "a {cache_type:?} cached move selector cannot wrap a never-ending selector ({inner:?})"
            )));
        }
        Ok(Self {
            inner,
            cache_type,
            random: false,
            cache: Vec::new(),
            built: None,
            rng: StdRng::seed_from_u64(0),
            _phantom: PhantomData,
        })
    }

    pub fn with_random_order(mut self, random: bool) -> Self {
        self.random = random;
        self
    }

    pub fn cache_type(&self) -> SelectionCacheType {
        self.cache_type
    }

    /// Returns the cached moves.
    pub fn cached_moves(&self) -> &[M] {
        &self.cache
    }

    fn refresh(&mut self, score_director: &D, event: CacheEvent) -> Result<()> {
        let key = (self.inner.size(score_director), self.inner.snapshot_revision());
        let changed = self.built != Some(key);
        if must_rebuild(self.cache_type, event, self.built.is_some(), changed, "move selector")? {
            self.cache = self.inner.iter_moves(score_director).collect();
            self.built = Some(key);
        }
        Ok(())
    }
}

impl<S, D, M, Inner: Debug> Debug for CachingMoveSelector<S, D, M, Inner> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachingMoveSelector")
            .field("inner", &self.inner)
            .field("cache_type", &self.cache_type)
            .field("random", &self.random)
            .field("cached", &self.cache.len())
            .finish()
    }
}

impl<S, D, M, Inner> MoveSelector<S, D, M> for CachingMoveSelector<S, D, M, Inner>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
    Inner: MoveSelector<S, D, M>,
{
    fn iter_moves<'a>(&'a mut self, _score_director: &D) -> Box<dyn Iterator<Item = M> + 'a> {
        if self.random {
            if self.cache.is_empty() {
                return Box::new(std::iter::empty());
            }
            let cache = &self.cache;
            let rng = &mut self.rng;
            Box::new(std::iter::from_fn(move || {
                Some(cache[rng.random_range(0..cache.len())].clone())
            }))
        } else {
            Box::new(self.cache.iter().cloned())
        }
    }

    fn size(&self, score_director: &D) -> usize {
        match self.built {
            Some(_) => self.cache.len(),
            None => self.inner.size(score_director),
        }
    }

    fn is_never_ending(&self) -> bool {
        self.random
    }

    fn snapshot_revision(&self) -> u64 {
        self.inner.snapshot_revision()
    }

    fn solving_started(&mut self, score_director: &D, seed: u64) -> Result<()> {
        let (own, child) = split_seed(seed);
        self.rng = StdRng::seed_from_u64(own);
        self.built = None;
        self.inner.solving_started(score_director, child)?;
        self.refresh(score_director, CacheEvent::SolvingStarted)
    }

    fn phase_started(&mut self, score_director: &D, seed: u64) -> Result<()> {
        let (own, child) = split_seed(seed);
        self.rng = StdRng::seed_from_u64(own);
        self.inner.phase_started(score_director, child)?;
        self.refresh(score_director, CacheEvent::PhaseStarted)
    }

    fn step_started(&mut self, score_director: &D, seed: u64) -> Result<()> {
        let (own, child) = split_seed(seed);
        self.rng = StdRng::seed_from_u64(own);
        self.inner.step_started(score_director, child)?;
        self.refresh(score_director, CacheEvent::StepStarted)
    }

    fn step_ended(&mut self) {
        self.inner.step_ended();
    }

    fn phase_ended(&mut self) {
        self.inner.phase_ended();
    }
}
