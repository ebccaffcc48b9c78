//! SwapMove - exchanges the values of two entities.

use std::fmt::{self, Debug, Display};

use planforge_core::domain::PlanningSolution;
use planforge_core::error::Result;
use planforge_scoring::ScoreDirector;

use super::Move;

/// A move that swaps one variable's values between two entities of the
/// same type.
///
/// A swap is its own undo move.
pub struct SwapMove<S, V> {
    indices: [usize; 2],
    ids: [i64; 2],
    getter: fn(&S, usize) -> Option<V>,
    setter: fn(&mut S, usize, Option<V>),
    variable_name: &'static str,
    descriptor_index: usize,
}

impl<S, V> Clone for SwapMove<S, V> {
    fn clone(&self) -> Self {
        Self {
            indices: self.indices,
            ids: self.ids,
            getter: self.getter,
            setter: self.setter,
            variable_name: self.variable_name,
            descriptor_index: self.descriptor_index,
        }
    }
}

impl<S, V> Debug for SwapMove<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwapMove")
            .field("left_index", &self.indices[0])
            .field("right_index", &self.indices[1])
            .field("descriptor_index", &self.descriptor_index)
            .field("variable_name", &self.variable_name)
            .finish()
    }
}

impl<S, V> Display for SwapMove<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{} <-> {}#{}",
            self.variable_name, self.ids[0], self.variable_name, self.ids[1]
        )
    }
}

impl<S, V> SwapMove<S, V> {
    /// Creates a swap between two entities, given as `(index, planning_id)`.
    pub fn new(
        left: (usize, i64),
        right: (usize, i64),
        getter: fn(&S, usize) -> Option<V>,
        setter: fn(&mut S, usize, Option<V>),
        variable_name: &'static str,
        descriptor_index: usize,
    ) -> Self {
        Self {
            indices: [left.0, right.0],
            ids: [left.1, right.1],
            getter,
            setter,
            variable_name,
            descriptor_index,
        }
    }

    pub fn left_entity_index(&self) -> usize {
        self.indices[0]
    }

    pub fn right_entity_index(&self) -> usize {
        self.indices[1]
    }
}

impl<S, V> Move<S> for SwapMove<S, V>
where
    S: PlanningSolution,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
{
    fn is_doable<D: ScoreDirector<S>>(&self, score_director: &D) -> bool {
        let [left, right] = self.indices;
        if left == right {
            return false;
        }
        let solution = score_director.working_solution();
        (self.getter)(solution, left) != (self.getter)(solution, right)
    }

    fn do_move<D: ScoreDirector<S>>(&self, score_director: &mut D) {
        let [left, right] = self.indices;
        let left_value = (self.getter)(score_director.working_solution(), left);
        let right_value = (self.getter)(score_director.working_solution(), right);

        score_director.before_variable_changed(self.descriptor_index, left, self.variable_name);
        score_director.before_variable_changed(self.descriptor_index, right, self.variable_name);
        (self.setter)(score_director.working_solution_mut(), left, right_value);
        (self.setter)(score_director.working_solution_mut(), right, left_value);
        score_director.after_variable_changed(self.descriptor_index, left, self.variable_name);
        score_director.after_variable_changed(self.descriptor_index, right, self.variable_name);
        score_director.trigger_variable_listeners();
    }

    fn create_undo_move<D: ScoreDirector<S>>(&self, _score_director: &D) -> Self {
        self.clone()
    }

    fn rebase<D: ScoreDirector<S>>(&self, destination: &D) -> Result<Self> {
        let left = destination.look_up_working_entity(self.descriptor_index, self.ids[0])?;
        let right = destination.look_up_working_entity(self.descriptor_index, self.ids[1])?;
        Ok(Self {
            indices: [left, right],
            ..self.clone()
        })
    }

    fn descriptor_index(&self) -> usize {
        self.descriptor_index
    }

    fn entity_indices(&self) -> &[usize] {
        &self.indices
    }

    fn variable_name(&self) -> &str {
        self.variable_name
    }
}
