//! ChangeMove - assigns a value to a planning variable.
//!
//! The most fundamental move type: it takes a value and assigns it to one
//! entity's planning variable. The variable is reached through typed
//! function pointers, so no solution type erasure is involved.

use std::fmt::{self, Debug, Display};

use planforge_core::domain::PlanningSolution;
use planforge_core::error::Result;
use planforge_scoring::ScoreDirector;

use super::Move;

/// A move that assigns a value to an entity's variable.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `V` - The variable value type
pub struct ChangeMove<S, V> {
    entity_index: usize,
    entity_id: i64,
    to_value: Option<V>,
    getter: fn(&S, usize) -> Option<V>,
    setter: fn(&mut S, usize, Option<V>),
    variable_name: &'static str,
    descriptor_index: usize,
}

impl<S, V: Clone> Clone for ChangeMove<S, V> {
    fn clone(&self) -> Self {
        Self {
            entity_index: self.entity_index,
            entity_id: self.entity_id,
            to_value: self.to_value.clone(),
            getter: self.getter,
            setter: self.setter,
            variable_name: self.variable_name,
            descriptor_index: self.descriptor_index,
        }
    }
}

impl<S, V: Debug> Debug for ChangeMove<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeMove")
            .field("entity_index", &self.entity_index)
            .field("entity_id", &self.entity_id)
            .field("descriptor_index", &self.descriptor_index)
            .field("variable_name", &self.variable_name)
            .field("to_value", &self.to_value)
            .finish()
    }
}

impl<S, V: Debug> Display for ChangeMove<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{} {{-> {:?}}}",
            self.variable_name, self.entity_id, self.to_value
        )
    }
}

impl<S, V> ChangeMove<S, V> {
    /// Creates a new change move.
    ///
    /// # Arguments
    /// * `entity_index` - Index of the entity in its collection
    /// * `entity_id` - Planning id of that entity, used for rebasing
    /// * `to_value` - The value to assign (None to unassign)
    /// * `getter` - Reads the current value from the solution
    /// * `setter` - Writes a value into the solution
    /// * `variable_name` - Name of the variable
    /// * `descriptor_index` - Index of the entity descriptor
    pub fn new(
        entity_index: usize,
        entity_id: i64,
        to_value: Option<V>,
        getter: fn(&S, usize) -> Option<V>,
        setter: fn(&mut S, usize, Option<V>),
        variable_name: &'static str,
        descriptor_index: usize,
    ) -> Self {
        Self {
            entity_index,
            entity_id,
            to_value,
            getter,
            setter,
            variable_name,
            descriptor_index,
        }
    }

    pub fn entity_index(&self) -> usize {
        self.entity_index
    }

    pub fn entity_id(&self) -> i64 {
        self.entity_id
    }

    pub fn to_value(&self) -> Option<&V> {
        self.to_value.as_ref()
    }
}

impl<S, V> Move<S> for ChangeMove<S, V>
where
    S: PlanningSolution,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
{
    fn is_doable<D: ScoreDirector<S>>(&self, score_director: &D) -> bool {
        let current = (self.getter)(score_director.working_solution(), self.entity_index);
        current != self.to_value
    }

    fn do_move<D: ScoreDirector<S>>(&self, score_director: &mut D) {
        score_director.before_variable_changed(
            self.descriptor_index,
            self.entity_index,
            self.variable_name,
        );
        (self.setter)(
            score_director.working_solution_mut(),
            self.entity_index,
            self.to_value.clone(),
        );
        score_director.after_variable_changed(
            self.descriptor_index,
            self.entity_index,
            self.variable_name,
        );
        score_director.trigger_variable_listeners();
    }

    fn create_undo_move<D: ScoreDirector<S>>(&self, score_director: &D) -> Self {
        let old_value = (self.getter)(score_director.working_solution(), self.entity_index);
        Self {
            to_value: old_value,
            ..self.clone()
        }
    }

    fn rebase<D: ScoreDirector<S>>(&self, destination: &D) -> Result<Self> {
        let entity_index =
            destination.look_up_working_entity(self.descriptor_index, self.entity_id)?;
        Ok(Self {
            entity_index,
            ..self.clone()
        })
    }

    fn descriptor_index(&self) -> usize {
        self.descriptor_index
    }

    fn entity_indices(&self) -> &[usize] {
        std::slice::from_ref(&self.entity_index)
    }

    fn variable_name(&self) -> &str {
        self.variable_name
    }
}
