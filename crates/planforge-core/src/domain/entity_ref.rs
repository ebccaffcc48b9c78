//! Type-erased access to the entity collections of a solution.

use std::any::{Any, TypeId};
use std::fmt::Debug;

use super::traits::PlanningEntity;

/// Extracts the entities of one collection from a planning solution.
///
/// Descriptors hold extractors so that domain-agnostic code (lookup
/// indexes, shadow variable bookkeeping, entity selectors) can count and
/// identify entities without knowing the concrete solution type.
pub trait EntityExtractor: Send + Sync + Debug {
    /// Returns the number of entities in the collection.
    fn count(&self, solution: &dyn Any) -> Option<usize>;

    /// Gets a reference to an entity by index.
    fn get<'a>(&self, solution: &'a dyn Any, index: usize) -> Option<&'a dyn Any>;

    /// Returns whether the entity at `index` is pinned.
    fn is_pinned(&self, solution: &dyn Any, index: usize) -> bool;

    /// Returns the planning ids of all entities, in collection order.
    ///
    /// `None` when the entity type declares no planning id.
    fn planning_ids(&self, solution: &dyn Any) -> Option<Vec<i64>>;

    fn clone_box(&self) -> Box<dyn EntityExtractor>;

    fn entity_type_id(&self) -> TypeId;
}

impl Clone for Box<dyn EntityExtractor> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// An entity extractor for a `Vec<E>` field of solution `S`.
pub struct TypedEntityExtractor<S, E> {
    collection_field: &'static str,
    get_collection: fn(&S) -> &Vec<E>,
    planning_id: Option<fn(&E) -> i64>,
}

impl<S, E> TypedEntityExtractor<S, E>
where
    S: 'static,
    E: PlanningEntity,
{
    pub fn new(collection_field: &'static str, get_collection: fn(&S) -> &Vec<E>) -> Self {
        Self {
            collection_field,
            get_collection,
            planning_id: None,
        }
    }

    /// Uses `E`'s [`PlanningId`](super::PlanningId) as identity key.
    pub fn with_planning_id(mut self) -> Self
    where
        E: super::PlanningId,
    {
        self.planning_id = Some(<E as super::PlanningId>::planning_id);
        self
    }
}

impl<S, E> Clone for TypedEntityExtractor<S, E> {
    fn clone(&self) -> Self {
        Self {
            collection_field: self.collection_field,
            get_collection: self.get_collection,
            planning_id: self.planning_id,
        }
    }
}

impl<S, E> EntityExtractor for TypedEntityExtractor<S, E>
where
    S: Send + Sync + 'static,
    E: PlanningEntity,
{
    fn count(&self, solution: &dyn Any) -> Option<usize> {
        let solution = solution.downcast_ref::<S>()?;
        Some((self.get_collection)(solution).len())
    }

    fn get<'a>(&self, solution: &'a dyn Any, index: usize) -> Option<&'a dyn Any> {
        let solution = solution.downcast_ref::<S>()?;
        (self.get_collection)(solution)
            .get(index)
            .map(|e| e as &dyn Any)
    }

    fn is_pinned(&self, solution: &dyn Any, index: usize) -> bool {
        solution
            .downcast_ref::<S>()
            .and_then(|s| (self.get_collection)(s).get(index))
            .is_some_and(PlanningEntity::is_pinned)
    }

    fn planning_ids(&self, solution: &dyn Any) -> Option<Vec<i64>> {
        let planning_id = self.planning_id?;
        let solution = solution.downcast_ref::<S>()?;
        Some(
            (self.get_collection)(solution)
                .iter()
                .map(planning_id)
                .collect(),
        )
    }

    fn clone_box(&self) -> Box<dyn EntityExtractor> {
        Box::new(self.clone())
    }

    fn entity_type_id(&self) -> TypeId {
        TypeId::of::<E>()
    }
}

impl<S, E> Debug for TypedEntityExtractor<S, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedEntityExtractor")
            .field("collection_field", &self.collection_field)
            .field("has_planning_id", &self.planning_id.is_some())
            .finish()
    }
}
