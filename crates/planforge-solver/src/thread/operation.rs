//! Operations sent from the solver thread to the move threads.

use std::fmt::{self, Debug};

use planforge_core::domain::PlanningSolution;

/// One unit of work for a move thread.
///
/// Every move thread receives its own `Setup` and `ApplyStep`; each
/// `MoveEvaluation` goes to exactly one move thread.
pub enum MoveThreadOperation<S: PlanningSolution, D, M> {
    /// Hands the move thread its child score director.
    Setup(D),
    /// Applies the winner of the previous step; `step_index` is the index
    /// of the step that starts once it is applied.
    ApplyStep {
        step_index: u64,
        step: M,
        score: S::Score,
    },
    /// Scores one move of the current step.
    MoveEvaluation {
        step_index: u64,
        move_index: u64,
        mv: M,
    },
    /// Stops the move thread.
    Destroy,
}

impl<S, D, M> Debug for MoveThreadOperation<S, D, M>
where
    S: PlanningSolution,
    M: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Setup(_) => f.write_str("Setup"),
            Self::ApplyStep {
                step_index,
                step,
                score,
            } => f
                .debug_struct("ApplyStep")
                .field("step_index", step_index)
                .field("step", step)
                .field("score", score)
                .finish(),
            Self::MoveEvaluation {
                step_index,
                move_index,
                mv,
            } => f
                .debug_struct("MoveEvaluation")
                .field("step_index", step_index)
                .field("move_index", move_index)
                .field("mv", mv)
                .finish(),
            Self::Destroy => f.write_str("Destroy"),
        }
    }
}
