//! Move trait definition.

use std::fmt::{Debug, Display};

use planforge_core::domain::PlanningSolution;
use planforge_core::error::Result;
use planforge_scoring::ScoreDirector;

/// A reversible change to one or more planning variables.
///
/// Moves are small command values: they name entities by index inside one
/// working solution and carry the values they assign. A move never holds a
/// reference into a solution, so the same move can be evaluated against a
/// move thread's clone after [`Move::rebase`].
///
/// The `Display` output is the move description used in score corruption
/// reports.
pub trait Move<S: PlanningSolution>: Clone + Send + Sync + Debug + Display + 'static {
    /// Returns true if this move changes the working solution.
    ///
    /// Cheap and side-effect free. A move that is not doable is never applied.
    fn is_doable<D: ScoreDirector<S>>(&self, score_director: &D) -> bool;

    /// Applies this move, bracketing every variable write with
    /// `before_variable_changed`/`after_variable_changed`, and triggers the
    /// variable listeners once all writes are done.
    fn do_move<D: ScoreDirector<S>>(&self, score_director: &mut D);

    /// Creates the move that reverses this one from the current state.
    ///
    /// Must be called before [`Move::do_move`].
    fn create_undo_move<D: ScoreDirector<S>>(&self, score_director: &D) -> Self;

    /// Returns the equivalent move in `destination`'s working solution.
    ///
    /// Entities are looked up by planning id.
    fn rebase<D: ScoreDirector<S>>(&self, destination: &D) -> Result<Self>;

    /// Returns the descriptor index of the entity type this move affects.
    fn descriptor_index(&self) -> usize;

    /// Returns the entity indices involved in this move.
    fn entity_indices(&self) -> &[usize];

    /// Returns the variable name this move affects.
    fn variable_name(&self) -> &str;
}
