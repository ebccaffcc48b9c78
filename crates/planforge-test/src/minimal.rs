//! Minimal test solution fixtures.
//!
//! One `Slot` entity whose `value` should reach a target. Useful for
//! termination conditions and components that need exactly one entity.
//!
//! # Example
//!
//! ```
//! use planforge_test::minimal::create_minimal_director;
//! use planforge_scoring::ScoreDirector;
//!
//! let mut director = create_minimal_director(Some(3), 5);
//! assert_eq!(director.calculate_score().score(), -2);
//! ```

use std::any::TypeId;

use planforge_core::domain::{
    EntityDescriptor, PlanningEntity, PlanningSolution, SolutionDescriptor, TypedEntityExtractor,
    VariableDescriptor,
};
use planforge_core::score::SimpleScore;
use planforge_scoring::SimpleScoreDirector;

#[derive(Clone, Debug, PartialEq)]
pub struct Slot {
    pub value: Option<i64>,
}

impl PlanningEntity for Slot {}

/// A solution with a single slot and a target value.
#[derive(Clone, Debug, PartialEq)]
pub struct MinimalSolution {
    pub slots: Vec<Slot>,
    pub target: i64,
    pub score: Option<SimpleScore>,
}

impl MinimalSolution {
    pub fn new(value: Option<i64>, target: i64) -> Self {
        Self {
            slots: vec![Slot { value }],
            target,
            score: None,
        }
    }
}

impl PlanningSolution for MinimalSolution {
    type Score = SimpleScore;

    fn score(&self) -> Option<Self::Score> {
        self.score
    }

    fn set_score(&mut self, score: Option<Self::Score>) {
        self.score = score;
    }

    fn uninitialized_variable_count(&self) -> usize {
        self.slots.iter().filter(|s| s.value.is_none()).count()
    }
}

pub fn get_slots(s: &MinimalSolution) -> &Vec<Slot> {
    &s.slots
}

pub fn slot_count(s: &MinimalSolution) -> usize {
    s.slots.len()
}

pub fn get_slot_value(s: &MinimalSolution, idx: usize) -> Option<i64> {
    s.slots.get(idx).and_then(|slot| slot.value)
}

pub fn set_slot_value(s: &mut MinimalSolution, idx: usize, v: Option<i64>) {
    if let Some(slot) = s.slots.get_mut(idx) {
        slot.value = v;
    }
}

/// Values `0..=10`.
pub fn slot_values(_: &MinimalSolution) -> Vec<i64> {
    (0..=10).collect()
}

/// Minus the distance between the slot value and the target.
pub fn calculate_distance(solution: &MinimalSolution) -> SimpleScore {
    let distance: i64 = solution
        .slots
        .iter()
        .filter_map(|s| s.value)
        .map(|v| (v - solution.target).abs())
        .sum();
    SimpleScore::of(-distance)
}

pub fn create_minimal_descriptor() -> SolutionDescriptor {
    SolutionDescriptor::new("MinimalSolution", TypeId::of::<MinimalSolution>()).with_entity(
        EntityDescriptor::new("Slot", TypeId::of::<Slot>(), "slots")
            .with_extractor(Box::new(TypedEntityExtractor::new("slots", get_slots)))
            .with_variable(VariableDescriptor::genuine("value")),
    )
}

pub type MinimalCalculator = fn(&MinimalSolution) -> SimpleScore;

pub type MinimalDirector = SimpleScoreDirector<MinimalSolution, MinimalCalculator>;

/// # Panics
///
/// Never in practice: slots carry no planning ids to collide.
pub fn create_minimal_director(value: Option<i64>, target: i64) -> MinimalDirector {
    SimpleScoreDirector::new(
        MinimalSolution::new(value, target),
        create_minimal_descriptor(),
        calculate_distance as MinimalCalculator,
    )
    .expect("positional ids never collide")
}
