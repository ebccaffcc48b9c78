//! Swap move selector.

use std::fmt::{self, Debug};

use planforge_config::SelectionCacheType;
use planforge_core::domain::PlanningSolution;
use planforge_core::error::Result;
use planforge_scoring::ScoreDirector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::heuristic::binding::PlanningVariableBinding;
use crate::heuristic::r#move::{Move, SwapMove};

use super::entity::{EntityReference, EntitySelector};
use super::MoveSelector;

/// Generates a `SwapMove` for every pair of entities of one type.
///
/// Original order yields each unordered pair once. Random order samples
/// both entities independently, so a random swap may pick the same entity
/// twice; such a move is not doable and gets skipped.
pub struct SwapMoveSelector<S, V> {
    binding: PlanningVariableBinding<S, V>,
    entity_selector: EntitySelector<S>,
    random: bool,
    rng: StdRng,
}

impl<S, V> Debug for SwapMoveSelector<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwapMoveSelector")
            .field("variable_name", &self.binding.variable_name)
            .field("entity_selector", &self.entity_selector)
            .field("random", &self.random)
            .finish()
    }
}

impl<S: PlanningSolution, V> SwapMoveSelector<S, V> {
    pub fn new(binding: PlanningVariableBinding<S, V>) -> Self {
        Self {
            binding,
            entity_selector: EntitySelector::new(binding.descriptor_index, binding.entity_count)
                .with_filter(binding.entity_filter),
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
        self
    }
}

fn swap_move<S, V>(
    binding: &PlanningVariableBinding<S, V>,
    left: &EntityReference,
    right: &EntityReference,
) -> SwapMove<S, V> {
    SwapMove::new(
        (left.entity_index, left.planning_id),
        (right.entity_index, right.planning_id),
        binding.getter,
        binding.setter,
        binding.variable_name,
        binding.descriptor_index,
    )
}

impl<S, D, V, M> MoveSelector<S, D, M> for SwapMoveSelector<S, V>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
    M: Move<S> + From<SwapMove<S, V>>,
{
    fn iter_moves<'a>(&'a mut self, _score_director: &D) -> Box<dyn Iterator<Item = M> + 'a> {
        let binding = self.binding;
        let entities = self.entity_selector.entities();
        if entities.len() < 2 {
            return Box::new(std::iter::empty());
        }

        if self.random {
            let rng = &mut self.rng;
            Box::new(std::iter::from_fn(move || {
                let left = &entities[rng.random_range(0..entities.len())];
                let right = &entities[rng.random_range(0..entities.len())];
                Some(M::from(swap_move(&binding, left, right)))
            }))
        } else {
            Box::new(entities.iter().enumerate().flat_map(move |(i, left)| {
                entities[i + 1..]
                    .iter()
                    .map(move |right| M::from(swap_move(&binding, left, right)))
            }))
        }
    }

    fn size(&self, score_director: &D) -> usize {
        let n = self.entity_selector.size(score_director);
        n * n.saturating_sub(1) / 2
    }

    fn is_never_ending(&self) -> bool {
        self.random
    }

    fn snapshot_revision(&self) -> u64 {
        self.entity_selector.revision()
    }

    fn solving_started(&mut self, score_director: &D, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        self.entity_selector.solving_started(score_director)
    }

    fn phase_started(&mut self, score_director: &D, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        self.entity_selector.phase_started(score_director)
    }

    fn step_started(&mut self, score_director: &D, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        self.entity_selector.step_started(score_director)
    }
}
