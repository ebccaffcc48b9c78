//! Nearby selection for distance-based change moves.
//!
//! Nearby selection improves move quality by preferring values that are
//! close to the entity being changed. The distance is user defined, for
//! example the travel time between a visit and a candidate vehicle depot.

use std::cmp::Ordering;
use std::fmt::{self, Debug};

use planforge_core::domain::PlanningSolution;
use planforge_core::error::Result;
use planforge_scoring::ScoreDirector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::heuristic::binding::PlanningVariableBinding;
use crate::heuristic::r#move::{ChangeMove, Move};

use super::change::change_move;
use super::entity::EntitySelector;
use super::nearby_distribution::NearbyDistribution;
use super::value::ValueSelector;
use super::MoveSelector;

/// Measures the distance from an entity (by index) to a candidate value.
///
/// Distances may be asymmetrical and must not depend on planning variables.
pub type NearbyDistanceMeter<S, V> = fn(&S, usize, &V) -> f64;

/// Generates change moves whose value is near the changed entity.
///
/// For every selectable entity the value range is sorted by distance once
/// per phase. In random order the origin entity is sampled uniformly and
/// the value is drawn from the nearest-first list through a
/// [`NearbyDistribution`]. In original order every entity is paired with
/// every value, nearest first.
pub struct NearbyChangeMoveSelector<S, V> {
    binding: PlanningVariableBinding<S, V>,
    meter: NearbyDistanceMeter<S, V>,
    entity_selector: EntitySelector<S>,
    value_selector: ValueSelector<S, V>,
    distribution: Option<NearbyDistribution>,
    /// Value positions sorted by distance, per entity index.
    nearest_values: Vec<Vec<usize>>,
    matrix_size: Option<(usize, usize)>,
    rng: StdRng,
}

impl<S, V> Debug for NearbyChangeMoveSelector<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NearbyChangeMoveSelector")
            .field("variable_name", &self.binding.variable_name)
            .field("distribution", &self.distribution)
            .field("matrix_size", &self.matrix_size)
            .finish()
    }
}

impl<S: PlanningSolution, V> NearbyChangeMoveSelector<S, V> {
    /// Creates a nearby selector. Without a distribution the moves are
    /// enumerated in original order.
    pub fn new(
        binding: PlanningVariableBinding<S, V>,
        meter: NearbyDistanceMeter<S, V>,
        distribution: Option<NearbyDistribution>,
    ) -> Self {
        Self {
            binding,
            meter,
            entity_selector: EntitySelector::new(binding.descriptor_index, binding.entity_count)
                .with_filter(binding.entity_filter),
            value_selector: ValueSelector::new(binding.value_range),
            distribution,
            nearest_values: Vec::new(),
            matrix_size: None,
            rng: StdRng::seed_from_u64(0),
        }
    }

    fn refresh_matrix(&mut self, solution: &S) {
        let values = self.value_selector.values();
        let size = ((self.binding.entity_count)(solution), values.len());
        if self.matrix_size == Some(size) {
            return;
        }
        let meter = self.meter;
        self.nearest_values = (0..size.0)
            .map(|entity_index| {
                let distances: Vec<f64> = values
                    .iter()
                    .map(|value| meter(solution, entity_index, value))
                    .collect();
                let mut order: Vec<usize> = (0..values.len()).collect();
                order.sort_by(|&a, &b| {
                    distances[a]
                        .partial_cmp(&distances[b])
                        .unwrap_or(Ordering::Equal)
                });
                order
            })
            .collect();
        self.matrix_size = Some(size);
    }
}

impl<S, D, V, M> MoveSelector<S, D, M> for NearbyChangeMoveSelector<S, V>
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
        let nearest_values = &self.nearest_values;
        if entities.is_empty() || values.is_empty() {
            return Box::new(std::iter::empty());
        }

        match &self.distribution {
            Some(distribution) => {
                let rng = &mut self.rng;
                Box::new(std::iter::from_fn(move || {
                    let entity = &entities[rng.random_range(0..entities.len())];
                    let nearest = &nearest_values[entity.entity_index];
                    let position = nearest[distribution.next_index(rng, nearest.len())];
                    Some(M::from(change_move(&binding, entity, &values[position])))
                }))
            }
            None => Box::new(entities.iter().flat_map(move |entity| {
                nearest_values[entity.entity_index]
                    .iter()
                    .map(move |&position| M::from(change_move(&binding, entity, &values[position])))
            })),
        }
    }

    fn size(&self, score_director: &D) -> usize {
        self.entity_selector.size(score_director) * self.value_selector.size(score_director)
    }

    fn is_never_ending(&self) -> bool {
        self.distribution.is_some()
    }

    fn snapshot_revision(&self) -> u64 {
        self.entity_selector.revision() + self.value_selector.revision()
    }

    fn phase_started(&mut self, score_director: &D, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        self.entity_selector.phase_started(score_director)?;
        self.value_selector.phase_started(score_director)?;
        self.matrix_size = None;
        self.refresh_matrix(score_director.working_solution());
        Ok(())
    }

    fn step_started(&mut self, score_director: &D, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        self.entity_selector.step_started(score_director)?;
        self.value_selector.step_started(score_director)?;
        self.refresh_matrix(score_director.working_solution());
        Ok(())
    }
}
