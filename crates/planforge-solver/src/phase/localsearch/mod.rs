//! Local search phase
//!
//! Improves an existing solution step by step. Every step the move
//! selector proposes moves, each move is scored with a do/undo pair, the
//! acceptor decides which scores are acceptable and the forager picks the
//! winner, which is then applied for good.
//!
//! Move evaluation runs on the solver thread or, with a
//! [`MoveThreadConfig`](crate::thread::MoveThreadConfig), on move threads
//! whose results are foraged in move index order.

pub mod acceptor;
mod decider;
mod forager;
mod phase;
mod podium;

#[cfg(test)]
mod tests;

pub use acceptor::{
    AcceptanceContext, Acceptor, EntityTabuAcceptor, HillClimbingAcceptor, LateAcceptanceAcceptor,
    SimulatedAnnealingAcceptor,
};
pub use decider::{LocalSearchDecider, StepAssertions};
pub use forager::LocalSearchForager;
pub use phase::LocalSearchPhase;
pub use podium::{FinalistPodium, HighestScoreFinalistPodium, StrategicOscillationByLevelFinalistPodium};

pub(crate) use decider::{apply_step, score_move};
