//! Late acceptance acceptor.

use std::fmt::{self, Debug};

use planforge_core::domain::PlanningSolution;
use rand::rngs::StdRng;

use super::{AcceptanceContext, Acceptor};

/// Late acceptance acceptor - accepts moves that improve on a historical score.
///
/// Keeps the step scores of the last `late_acceptance_size` steps in a
/// circular buffer. A move is accepted if it is at least as good as the
/// step score of `late_acceptance_size` steps ago, or as the last step score.
///
/// # Example
///
/// ```
/// use planforge_solver::phase::localsearch::LateAcceptanceAcceptor;
/// use planforge_test::nqueens::NQueensSolution;
///
/// let acceptor = LateAcceptanceAcceptor::<NQueensSolution>::new(400);
/// assert_eq!(acceptor.late_acceptance_size(), 400);
/// ```
pub struct LateAcceptanceAcceptor<S: PlanningSolution> {
    late_acceptance_size: usize,
    previous_scores: Vec<S::Score>,
    late_score_index: usize,
}

impl<S: PlanningSolution> Debug for LateAcceptanceAcceptor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LateAcceptanceAcceptor")
            .field("late_acceptance_size", &self.late_acceptance_size)
            .field("late_score_index", &self.late_score_index)
            .finish()
    }
}

impl<S: PlanningSolution> LateAcceptanceAcceptor<S> {
    /// Creates an acceptor remembering `late_acceptance_size` step scores.
    ///
    /// A size of 0 is treated as 1.
    pub fn new(late_acceptance_size: usize) -> Self {
        Self {
            late_acceptance_size: late_acceptance_size.max(1),
            previous_scores: Vec::new(),
            late_score_index: 0,
        }
    }

    pub fn late_acceptance_size(&self) -> usize {
        self.late_acceptance_size
    }
}

impl<S: PlanningSolution> Acceptor<S> for LateAcceptanceAcceptor<S> {
    fn phase_started(&mut self, initial_score: &S::Score, _entity_count: usize) {
        self.previous_scores = vec![*initial_score; self.late_acceptance_size];
        self.late_score_index = 0;
    }

    fn is_accepted(&mut self, context: &AcceptanceContext<'_, S::Score>, _rng: &mut StdRng) -> bool {
        let accepted_late = self
            .previous_scores
            .get(self.late_score_index)
            .map_or(true, |late_score| context.move_score >= *late_score);
        accepted_late || context.move_score >= context.last_step_score
    }

    fn step_ended(&mut self, context: &AcceptanceContext<'_, S::Score>) {
        if let Some(slot) = self.previous_scores.get_mut(self.late_score_index) {
            *slot = context.move_score;
        }
        self.late_score_index = (self.late_score_index + 1) % self.late_acceptance_size;
    }

    fn phase_ended(&mut self) {
        self.previous_scores.clear();
        self.late_score_index = 0;
    }
}
