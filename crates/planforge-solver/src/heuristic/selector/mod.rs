//! Selectors for entities, values, and moves.
//!
//! Selectors enumerate the elements that the solver considers when
//! exploring the solution space. Entity and value selectors keep snapshots
//! of the working solution, rebuilt according to their cache type. Move
//! selectors combine those snapshots into moves, in original order or as a
//! never-ending random sample.

pub mod decorator;
mod change;
mod entity;
mod nearby;
mod nearby_distribution;
mod swap;
mod value;

#[cfg(test)]
mod tests;

use std::fmt::Debug;

use planforge_config::SelectionCacheType;
use planforge_core::domain::PlanningSolution;
use planforge_core::error::{PlanForgeError, Result};
use planforge_scoring::ScoreDirector;

use crate::heuristic::r#move::Move;

pub use change::ChangeMoveSelector;
pub use entity::{EntityReference, EntitySelector};
pub use nearby::{NearbyChangeMoveSelector, NearbyDistanceMeter};
pub use nearby_distribution::NearbyDistribution;
pub use swap::SwapMoveSelector;
pub use value::ValueSelector;

/// Produces the candidate moves of each step.
///
/// The iterator returned by `iter_moves` owns a snapshot taken at the
/// last lifecycle event and only borrows the selector, so the caller may
/// apply and undo moves on the score director while iterating.
///
/// Selectors own a private random generator, reseeded from the solver's
/// working random at every lifecycle event. The moves of a step therefore
/// do not depend on how many moves earlier steps consumed.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `D` - The score director type
/// * `M` - The move type
pub trait MoveSelector<S, D, M>: Send + Debug
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
{
    /// Returns the moves of the current step.
    fn iter_moves<'a>(&'a mut self, score_director: &D) -> Box<dyn Iterator<Item = M> + 'a>;

    /// Returns the number of distinct moves in the neighborhood.
    fn size(&self, score_director: &D) -> usize;

    /// Returns true if `iter_moves` never ends on its own.
    fn is_never_ending(&self) -> bool;

    /// Changes whenever the entities or values the moves are drawn from
    /// change, even at the same size.
    fn snapshot_revision(&self) -> u64 {
        0
    }

    fn solving_started(&mut self, _score_director: &D, _seed: u64) -> Result<()> {
        Ok(())
    }

    fn phase_started(&mut self, _score_director: &D, _seed: u64) -> Result<()> {
        Ok(())
    }

    fn step_started(&mut self, _score_director: &D, _seed: u64) -> Result<()> {
        Ok(())
    }

    fn step_ended(&mut self) {}

    fn phase_ended(&mut self) {}
}

impl<S, D, M> MoveSelector<S, D, M> for Box<dyn MoveSelector<S, D, M>>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
{
    fn iter_moves<'a>(&'a mut self, score_director: &D) -> Box<dyn Iterator<Item = M> + 'a> {
        (**self).iter_moves(score_director)
    }

    fn size(&self, score_director: &D) -> usize {
        (**self).size(score_director)
    }

    fn is_never_ending(&self) -> bool {
        (**self).is_never_ending()
    }

    fn snapshot_revision(&self) -> u64 {
        (**self).snapshot_revision()
    }

    fn solving_started(&mut self, score_director: &D, seed: u64) -> Result<()> {
        (**self).solving_started(score_director, seed)
    }

    fn phase_started(&mut self, score_director: &D, seed: u64) -> Result<()> {
        (**self).phase_started(score_director, seed)
    }

    fn step_started(&mut self, score_director: &D, seed: u64) -> Result<()> {
        (**self).step_started(score_director, seed)
    }

    fn step_ended(&mut self) {
        (**self).step_ended()
    }

    fn phase_ended(&mut self) {
        (**self).phase_ended()
    }
}

/// The lifecycle events at which a cached snapshot may be rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CacheEvent {
    SolvingStarted,
    PhaseStarted,
    StepStarted,
}

/// Decides whether a snapshot must be rebuilt at `event`. `changed` tells
/// whether the working solution no longer matches the last snapshot.
///
/// A locked phase or solver cache that changed is stale, which is an error
/// rather than a silent rebuild.
pub(crate) fn must_rebuild(
    cache_type: SelectionCacheType,
    event: CacheEvent,
    built: bool,
    changed: bool,
    what: &str,
) -> Result<bool> {
    if !built {
        return Ok(true);
    }
    match (cache_type, event) {
        (SelectionCacheType::JustInTime, _) => Ok(true),
        (SelectionCacheType::Step, _) => Ok(changed),
        (SelectionCacheType::Phase, CacheEvent::PhaseStarted) => Ok(true),
        (SelectionCacheType::Solver, CacheEvent::SolvingStarted) => Ok(true),
        (cache_type, event) if changed => Err(PlanForgeError::InvalidState(format!(
            "the {what} changed after its {cache_type:?} cache was locked ({event:?})"
        ))),
        _ => Ok(false),
    }
}
