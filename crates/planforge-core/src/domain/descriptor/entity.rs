//! Entity descriptor.

use std::any::{Any, TypeId};
use std::fmt;

use super::VariableDescriptor;
use crate::domain::entity_ref::EntityExtractor;

/// Describes a planning entity type at runtime.
pub struct EntityDescriptor {
    /// Name of the entity type.
    pub type_name: &'static str,
    pub type_id: TypeId,
    /// Field name of the entity collection in the solution.
    pub solution_field: &'static str,
    pub variable_descriptors: Vec<VariableDescriptor>,
    /// Extractor for counting and reading entities from a solution.
    pub extractor: Option<Box<dyn EntityExtractor>>,
}

impl EntityDescriptor {
    pub fn new(type_name: &'static str, type_id: TypeId, solution_field: &'static str) -> Self {
        EntityDescriptor {
            type_name,
            type_id,
            solution_field,
            variable_descriptors: Vec::new(),
            extractor: None,
        }
    }

    pub fn with_extractor(mut self, extractor: Box<dyn EntityExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub fn with_variable(mut self, descriptor: VariableDescriptor) -> Self {
        self.variable_descriptors.push(descriptor);
        self
    }

    pub fn find_variable(&self, name: &str) -> Option<&VariableDescriptor> {
        self.variable_descriptors.iter().find(|v| v.name == name)
    }

    pub fn genuine_variables(&self) -> impl Iterator<Item = &VariableDescriptor> {
        self.variable_descriptors.iter().filter(|v| v.is_genuine())
    }

    pub fn shadow_variables(&self) -> impl Iterator<Item = &VariableDescriptor> {
        self.variable_descriptors.iter().filter(|v| v.is_shadow())
    }

    /// Number of entities of this type in `solution`, 0 without an extractor.
    pub fn entity_count(&self, solution: &dyn Any) -> usize {
        self.extractor
            .as_ref()
            .and_then(|e| e.count(solution))
            .unwrap_or(0)
    }

    pub fn is_pinned(&self, solution: &dyn Any, index: usize) -> bool {
        self.extractor
            .as_ref()
            .is_some_and(|e| e.is_pinned(solution, index))
    }

    /// Planning ids of all entities, if the extractor supplies them.
    pub fn planning_ids(&self, solution: &dyn Any) -> Option<Vec<i64>> {
        self.extractor.as_ref()?.planning_ids(solution)
    }
}

impl Clone for EntityDescriptor {
    fn clone(&self) -> Self {
        Self {
            type_name: self.type_name,
            type_id: self.type_id,
            solution_field: self.solution_field,
            variable_descriptors: self.variable_descriptors.clone(),
            extractor: self.extractor.clone(),
        }
    }
}

impl fmt::Debug for EntityDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityDescriptor")
            .field("type_name", &self.type_name)
            .field("solution_field", &self.solution_field)
            .field("variables", &self.variable_descriptors.len())
            .finish()
    }
}
