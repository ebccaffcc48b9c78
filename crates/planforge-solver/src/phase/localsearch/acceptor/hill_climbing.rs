//! Hill climbing acceptor.

use std::fmt::Debug;

use planforge_core::domain::PlanningSolution;
use rand::rngs::StdRng;

use super::{AcceptanceContext, Acceptor};

/// Hill climbing acceptor - accepts moves that do not worsen the score.
///
/// Moves with a score equal to the last step score are accepted, so the
/// search can walk across plateaus. It still gets stuck in local optima.
///
/// # Example
///
/// ```
/// use planforge_solver::phase::localsearch::HillClimbingAcceptor;
///
/// let acceptor = HillClimbingAcceptor::new();
/// ```
#[derive(Debug, Clone, Default)]
pub struct HillClimbingAcceptor;

impl HillClimbingAcceptor {
    pub fn new() -> Self {
        Self
    }
}

impl<S: PlanningSolution> Acceptor<S> for HillClimbingAcceptor {
    fn is_accepted(&mut self, context: &AcceptanceContext<'_, S::Score>, _rng: &mut StdRng) -> bool {
        context.move_score >= context.last_step_score
    }
}
