//! Typed access to one genuine planning variable.

use std::fmt::{self, Debug};

/// Everything a move selector needs to read and write one planning variable.
///
/// All accessors are plain function pointers, so a binding is `Copy` and is
/// handed out by value to every selector built from it.
///
/// # Example
///
/// ```
/// use planforge_solver::heuristic::PlanningVariableBinding;
/// use planforge_test::nqueens::{
///     get_queen_row, queen_count, row_values, set_queen_row, NQueensSolution,
/// };
///
/// let binding = PlanningVariableBinding::<NQueensSolution, i64>::new(
///     0,
///     "row",
///     get_queen_row,
///     set_queen_row,
///     row_values,
///     queen_count,
/// );
/// assert_eq!(binding.variable_name, "row");
/// assert!(binding.nearby_distance.is_none());
/// ```
pub struct PlanningVariableBinding<S, V> {
    pub descriptor_index: usize,
    pub variable_name: &'static str,
    pub getter: fn(&S, usize) -> Option<V>,
    pub setter: fn(&mut S, usize, Option<V>),
    /// The values the variable may take.
    pub value_range: fn(&S) -> Vec<V>,
    pub entity_count: fn(&S) -> usize,
    /// Distance from an entity to a value, for nearby selection.
    ///
    /// Must not depend on planning variables: it is evaluated once per phase.
    pub nearby_distance: Option<fn(&S, usize, &V) -> f64>,
    /// Sort key of an entity, for sorted selection.
    pub entity_difficulty: Option<fn(&S, usize) -> i64>,
    /// Entities for which this returns false are never moved.
    pub entity_filter: Option<fn(&S, usize) -> bool>,
    /// Selection weight of an entity, for probabilistic selection.
    pub entity_weight: Option<fn(&S, usize) -> f64>,
}

impl<S, V> Clone for PlanningVariableBinding<S, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, V> Copy for PlanningVariableBinding<S, V> {}

impl<S, V> Debug for PlanningVariableBinding<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlanningVariableBinding")
            .field("descriptor_index", &self.descriptor_index)
            .field("variable_name", &self.variable_name)
            .field("nearby", &self.nearby_distance.is_some())
            .field("sorted", &self.entity_difficulty.is_some())
            .field("filtered", &self.entity_filter.is_some())
            .finish()
    }
}

impl<S, V> PlanningVariableBinding<S, V> {
    pub fn new(
        descriptor_index: usize,
        variable_name: &'static str,
        getter: fn(&S, usize) -> Option<V>,
        setter: fn(&mut S, usize, Option<V>),
        value_range: fn(&S) -> Vec<V>,
        entity_count: fn(&S) -> usize,
    ) -> Self {
        Self {
            descriptor_index,
            variable_name,
            getter,
            setter,
            value_range,
            entity_count,
            nearby_distance: None,
            entity_difficulty: None,
            entity_filter: None,
            entity_weight: None,
        }
    }

    pub fn with_nearby_distance(mut self, meter: fn(&S, usize, &V) -> f64) -> Self {
        self.nearby_distance = Some(meter);
        self
    }

    pub fn with_entity_difficulty(mut self, difficulty: fn(&S, usize) -> i64) -> Self {
        self.entity_difficulty = Some(difficulty);
        self
    }

    pub fn with_entity_filter(mut self, filter: fn(&S, usize) -> bool) -> Self {
        self.entity_filter = Some(filter);
        self
    }

    pub fn with_entity_weight(mut self, weight: fn(&S, usize) -> f64) -> Self {
        self.entity_weight = Some(weight);
        self
    }
}
