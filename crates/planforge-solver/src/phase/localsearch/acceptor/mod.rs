//! Acceptors for local search move acceptance.
//!
//! Acceptors decide whether an evaluated move may become the step's winner,
//! comparing its score with the last step score, the best score, or a score
//! history of their own.

mod entity_tabu;
mod hill_climbing;
mod late_acceptance;
mod simulated_annealing;

use std::fmt::Debug;

use planforge_core::domain::PlanningSolution;
use rand::rngs::StdRng;

pub use entity_tabu::EntityTabuAcceptor;
pub use hill_climbing::HillClimbingAcceptor;
pub use late_acceptance::LateAcceptanceAcceptor;
pub use simulated_annealing::SimulatedAnnealingAcceptor;

/// What an acceptor knows about a move, or about the step winner in
/// [`Acceptor::step_ended`].
#[derive(Debug, Clone, Copy)]
pub struct AcceptanceContext<'a, Sc> {
    pub move_score: Sc,
    pub last_step_score: Sc,
    pub best_score: Sc,
    pub step_index: u64,
    /// Progress towards termination, from 0.0 to 1.0.
    pub time_gradient: f64,
    pub descriptor_index: usize,
    /// The entities the move changes.
    pub entity_indices: &'a [usize],
}

/// Trait for accepting or rejecting moves in local search.
///
/// Acceptors implement different strategies for escaping local optima,
/// such as hill climbing, simulated annealing, or tabu search. They are
/// consulted on the solver thread in move index order, so a random draw
/// in `is_accepted` is reproducible.
pub trait Acceptor<S: PlanningSolution>: Send + Debug {
    /// Called when a phase starts.
    fn phase_started(&mut self, _initial_score: &S::Score, _entity_count: usize) {}

    /// Called when a step starts.
    fn step_started(&mut self, _step_index: u64, _time_gradient: f64) {}

    /// Returns true if the move described by `context` is accepted.
    fn is_accepted(&mut self, context: &AcceptanceContext<'_, S::Score>, rng: &mut StdRng)
        -> bool;

    /// Called with the step winner once it is applied.
    fn step_ended(&mut self, _context: &AcceptanceContext<'_, S::Score>) {}

    /// Called when a phase ends.
    fn phase_ended(&mut self) {}
}

impl<S: PlanningSolution> Acceptor<S> for Box<dyn Acceptor<S>> {
    fn phase_started(&mut self, initial_score: &S::Score, entity_count: usize) {
        (**self).phase_started(initial_score, entity_count)
    }

    fn step_started(&mut self, step_index: u64, time_gradient: f64) {
        (**self).step_started(step_index, time_gradient)
    }

    fn is_accepted(
        &mut self,
        context: &AcceptanceContext<'_, S::Score>,
        rng: &mut StdRng,
    ) -> bool {
        (**self).is_accepted(context, rng)
    }

    fn step_ended(&mut self, context: &AcceptanceContext<'_, S::Score>) {
        (**self).step_ended(context)
    }

    fn phase_ended(&mut self) {
        (**self).phase_ended()
    }
}

#[cfg(test)]
mod tests;
