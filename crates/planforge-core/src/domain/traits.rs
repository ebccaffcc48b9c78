//! Core domain traits

use crate::score::Score;

/// A planning solution: the problem facts, the planning entities and the score.
///
/// # Example
///
/// ```
/// use planforge_core::{PlanningSolution, score::SimpleScore};
///
/// #[derive(Clone)]
/// struct NQueens {
///     rows: Vec<Option<usize>>,
///     score: Option<SimpleScore>,
/// }
///
/// impl PlanningSolution for NQueens {
///     type Score = SimpleScore;
///
///     fn score(&self) -> Option<Self::Score> {
///         self.score
///     }
///
///     fn set_score(&mut self, score: Option<Self::Score>) {
///         self.score = score;
///     }
/// }
/// ```
///
/// # Thread Safety
///
/// Planning solutions must be `Send + Sync`: move threads each own a clone.
pub trait PlanningSolution: Clone + Send + Sync + 'static {
    /// The score type used to evaluate this solution.
    type Score: Score;

    /// Returns the current score of this solution, if calculated.
    fn score(&self) -> Option<Self::Score>;

    /// Sets the score of this solution.
    fn set_score(&mut self, score: Option<Self::Score>);

    /// Returns the number of unassigned genuine variables, used as the init score.
    fn uninitialized_variable_count(&self) -> usize {
        0
    }
}

/// A planning entity: something whose genuine variables the solver changes.
///
/// Pinned entities are never selected by entity selectors.
pub trait PlanningEntity: Clone + Send + Sync + 'static {
    fn is_pinned(&self) -> bool {
        false
    }
}

/// A stable identity key that survives cloning.
///
/// Rebasing a move from one solution clone onto another looks entities up
/// by this id.
pub trait PlanningId {
    fn planning_id(&self) -> i64;
}
