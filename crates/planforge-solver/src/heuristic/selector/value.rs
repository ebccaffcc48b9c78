//! Value selectors for the values a planning variable may take.

use std::fmt::{self, Debug};

use planforge_config::SelectionCacheType;
use planforge_core::domain::PlanningSolution;
use planforge_core::error::Result;
use planforge_scoring::ScoreDirector;

use super::{must_rebuild, CacheEvent};

/// Snapshots the value range of one planning variable.
pub struct ValueSelector<S, V> {
    value_range: fn(&S) -> Vec<V>,
    cache_type: SelectionCacheType,
    snapshot: Vec<V>,
    built: bool,
    revision: u64,
}

impl<S, V> Debug for ValueSelector<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueSelector")
            .field("cache_type", &self.cache_type)
            .field("values", &self.snapshot.len())
            .finish()
    }
}

impl<S: PlanningSolution, V> ValueSelector<S, V> {
    pub fn new(value_range: fn(&S) -> Vec<V>) -> Self {
        Self {
            value_range,
            cache_type: SelectionCacheType::JustInTime,
            snapshot: Vec::new(),
            built: false,
            revision: 0,
        }
    }

    pub fn with_cache_type(mut self, cache_type: SelectionCacheType) -> Self {
        self.cache_type = cache_type;
        self
    }

    pub fn values(&self) -> &[V] {
        &self.snapshot
    }

    /// Bumped every time a rebuild yields a different value range.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize {
        (self.value_range)(score_director.working_solution()).len()
    }
}

impl<S: PlanningSolution, V: PartialEq> ValueSelector<S, V> {
    pub fn solving_started<D: ScoreDirector<S>>(&mut self, score_director: &D) -> Result<()> {
        self.refresh(score_director, CacheEvent::SolvingStarted)
    }

    pub fn phase_started<D: ScoreDirector<S>>(&mut self, score_director: &D) -> Result<()> {
        self.refresh(score_director, CacheEvent::PhaseStarted)
    }

    pub fn step_started<D: ScoreDirector<S>>(&mut self, score_director: &D) -> Result<()> {
        self.refresh(score_director, CacheEvent::StepStarted)
    }

    fn refresh<D: ScoreDirector<S>>(&mut self, score_director: &D, event: CacheEvent) -> Result<()> {
        let values = (self.value_range)(score_director.working_solution());
        let changed = values != self.snapshot;
        if must_rebuild(self.cache_type, event, self.built, changed, "value range")? {
            if changed {
                self.revision += 1;
            }
            self.snapshot = values;
            self.built = true;
        }
        Ok(())
    }
}
