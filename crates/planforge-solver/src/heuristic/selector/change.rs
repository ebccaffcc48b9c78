//! Change move selector.

use std::fmt::{self, Debug};

use planforge_config::SelectionCacheType;
use planforge_core::domain::PlanningSolution;
use planforge_core::error::Result;
use planforge_scoring::ScoreDirector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::heuristic::binding::PlanningVariableBinding;
use crate::heuristic::r#move::{ChangeMove, Move};

use super::entity::{EntityReference, EntitySelector};
use super::value::ValueSelector;
use super::MoveSelector;

/// Generates a `ChangeMove` for every (entity, value) pair.
///
/// In original order the moves are enumerated entity-major. In random
/// order an entity and a value are sampled uniformly for every move,
/// without end.
///
/// The selector yields any move type that a `ChangeMove` converts into,
/// such as `EitherMove`.
pub struct ChangeMoveSelector<S, V> {
    binding: PlanningVariableBinding<S, V>,
    entity_selector: EntitySelector<S>,
    value_selector: ValueSelector<S, V>,
    random: bool,
    rng: StdRng,
}

impl<S, V> Debug for ChangeMoveSelector<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeMoveSelector")
            .field("variable_name", &self.binding.variable_name)
            .field("entity_selector", &self.entity_selector)
            .field("value_selector", &self.value_selector)
            .field("random", &self.random)
            .finish()
    }
}

impl<S: PlanningSolution, V> ChangeMoveSelector<S, V> {
    /// Creates a selector in original order.
    pub fn new(binding: PlanningVariableBinding<S, V>) -> Self {
        Self {
            binding,
            entity_selector: EntitySelector::new(binding.descriptor_index, binding.entity_count)
                .with_filter(binding.entity_filter),
            value_selector: ValueSelector::new(binding.value_range),
            random: false,
            rng: StdRng::seed_from_u64(0),
        }
    }

    pub fn with_random_order(mut self, random: bool) -> Self {
        self.random = random;
        self
    }

    pub fn with_cache_type(mut self, cache_type: SelectionCacheType) -> Self {
        self.entity_selector = self.entity_selector.with_cache_type(cache_type);
        self.value_selector = self.value_selector.with_cache_type(cache_type);
        self
    }
}

pub(crate) fn change_move<S, V: Clone>(
    binding: &PlanningVariableBinding<S, V>,
    entity: &EntityReference,
    value: &V,
) -> ChangeMove<S, V> {
    ChangeMove::new(
        entity.entity_index,
        entity.planning_id,
        Some(value.clone()),
        binding.getter,
        binding.setter,
        binding.variable_name,
        binding.descriptor_index,
    )
}

impl<S, D, V, M> MoveSelector<S, D, M> for ChangeMoveSelector<S, V>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
    M: Move<S> + From<ChangeMove<S, V>>,
{
    fn iter_moves<'a>(&'a mut self, _score_director: &D) -> Box<dyn Iterator<Item = M> + 'a> {
        let binding = self.binding;
        let entities = self.entity_selector.entities();
        let values = self.value_selector.values();
        if entities.is_empty() || values.is_empty() {
            return Box::new(std::iter::empty());
        }

        if self.random {
            let rng = &mut self.rng;
            Box::new(std::iter::from_fn(move || {
                let entity = &entities[rng.random_range(0..entities.len())];
                let value = &values[rng.random_range(0..values.len())];
                Some(M::from(change_move(&binding, entity, value)))
            }))
        } else {
            Box::new(entities.iter().flat_map(move |entity| {
                values
                    .iter()
                    .map(move |value| M::from(change_move(&binding, entity, value)))
            }))
        }
    }

    fn size(&self, score_director: &D) -> usize {
        self.entity_selector.size(score_director) * self.value_selector.size(score_director)
    }

    fn is_never_ending(&self) -> bool {
        self.random
    }

    fn snapshot_revision(&self) -> u64 {
        self.entity_selector.revision() + self.value_selector.revision()
    }

    fn solving_started(&mut self, score_director: &D, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        self.entity_selector.solving_started(score_director)?;
        self.value_selector.solving_started(score_director)
    }

    fn phase_started(&mut self, score_director: &D, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        self.entity_selector.phase_started(score_director)?;
        self.value_selector.phase_started(score_director)
    }

    fn step_started(&mut self, score_director: &D, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        self.entity_selector.step_started(score_director)?;
        self.value_selector.step_started(score_director)
    }
}
