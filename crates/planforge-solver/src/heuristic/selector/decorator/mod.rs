//! Move selector decorators for caching, filtering, ordering and limiting moves.
//!
//! Decorators wrap an inner [`MoveSelector`](super::MoveSelector) and change
//! which moves it yields, or in which order, without changing the move type.
//!
//! - [`CachingMoveSelector`] - keeps the moves of a step, phase or solve
//! - [`FilteringMoveSelector`] - drops moves rejected by a predicate
//! - [`ProbabilisticMoveSelector`] - samples moves proportionally to a weight
//! - [`SelectedCountLimitMoveSelector`] - limits the moves yielded per step
//! - [`ShufflingMoveSelector`] - yields the moves in a random permutation
//! - [`SortingMoveSelector`] - yields the moves sorted by a comparator
//! - [`UnionMoveSelector`] - combines several selectors

mod caching;
mod count_limit;
mod filtering;
mod probability;
mod shuffling;
mod sorting;
mod union;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub use caching::CachingMoveSelector;
pub use count_limit::SelectedCountLimitMoveSelector;
pub use filtering::{FilteringMoveSelector, MoveFilter};
pub use probability::{MoveWeight, ProbabilisticMoveSelector};
pub use shuffling::ShufflingMoveSelector;
pub use sorting::{MoveComparator, SortingMoveSelector};
pub use union::UnionMoveSelector;

/// Splits a lifecycle seed into one for the decorator and one for its child.
fn split_seed(seed: u64) -> (u64, u64) {
    let mut seeder = StdRng::seed_from_u64(seed);
    (seeder.random(), seeder.random())
}
