//! Entity selectors for iterating over planning entities

use std::any::Any;
use std::fmt::{self, Debug};

use planforge_config::SelectionCacheType;
use planforge_core::domain::PlanningSolution;
use planforge_core::error::Result;
use planforge_scoring::ScoreDirector;

use super::{must_rebuild, CacheEvent};

/// A reference to an entity within a solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityReference {
    pub descriptor_index: usize,
    /// Index of the entity within its collection.
    pub entity_index: usize,
    /// Stable identity of the entity across solution clones.
    pub planning_id: i64,
}

/// Snapshots the movable entities of one entity type.
///
/// Pinned entities and entities rejected by the filter are left out.
pub struct EntitySelector<S> {
    descriptor_index: usize,
    entity_count: fn(&S) -> usize,
    filter: Option<fn(&S, usize) -> bool>,
    cache_type: SelectionCacheType,
    snapshot: Vec<EntityReference>,
    built: bool,
    revision: u64,
}

impl<S> Debug for EntitySelector<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntitySelector")
            .field("descriptor_index", &self.descriptor_index)
            .field("cache_type", &self.cache_type)
            .field("selected", &self.snapshot.len())
            .finish()
    }
}

impl<S: PlanningSolution> EntitySelector<S> {
    pub fn new(descriptor_index: usize, entity_count: fn(&S) -> usize) -> Self {
        Self {
            descriptor_index,
            entity_count,
            filter: None,
            cache_type: SelectionCacheType::JustInTime,
            snapshot: Vec::new(),
            built: false,
            revision: 0,
        }
    }

    pub fn with_filter(mut self, filter: Option<fn(&S, usize) -> bool>) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_cache_type(mut self, cache_type: SelectionCacheType) -> Self {
        self.cache_type = cache_type;
        self
    }

    pub fn descriptor_index(&self) -> usize {
        self.descriptor_index
    }

    /// The entities of the last snapshot.
    pub fn entities(&self) -> &[EntityReference] {
        &self.snapshot
    }

    /// Bumped every time a rebuild yields different entities.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The number of entities in the working solution, selectable or not.
    pub fn size<D: ScoreDirector<S>>(&self, score_director: &D) -> usize {
        (self.entity_count)(score_director.working_solution())
    }

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
        let solution = score_director.working_solution();
        let count = (self.entity_count)(solution);
        let descriptor = score_director
            .solution_descriptor()
            .entity_descriptor(self.descriptor_index);
        let mut selected = Vec::with_capacity(count);
        for entity_index in 0..count {
            let pinned = descriptor
                .is_some_and(|d| d.is_pinned(solution as &dyn Any, entity_index));
            let filtered = self.filter.is_some_and(|f| !f(solution, entity_index));
            if pinned || filtered {
                continue;
            }
            selected.push(EntityReference {
                descriptor_index: self.descriptor_index,
                entity_index,
                planning_id: score_director.planning_id(self.descriptor_index, entity_index)?,
            });
        }

        let changed = selected != self.snapshot;
        if must_rebuild(self.cache_type, event, self.built, changed, "entity list")? {
            if changed {
                self.revision += 1;
            }
            self.snapshot = selected;
            self.built = true;
        }
        Ok(())
    }
}
