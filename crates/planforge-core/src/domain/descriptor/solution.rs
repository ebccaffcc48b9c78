//! Solution descriptor.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use super::{EntityDescriptor, VariableDescriptor};

/// Describes a planning solution at runtime.
///
/// Entity descriptors are addressed by their position ("descriptor index"),
/// which moves and lookup indexes use as a compact key.
#[derive(Clone)]
pub struct SolutionDescriptor {
    pub type_name: &'static str,
    pub type_id: TypeId,
    pub entity_descriptors: Vec<EntityDescriptor>,
    entity_type_index: HashMap<TypeId, usize>,
}

impl SolutionDescriptor {
    pub fn new(type_name: &'static str, type_id: TypeId) -> Self {
        SolutionDescriptor {
            type_name,
            type_id,
            entity_descriptors: Vec::new(),
            entity_type_index: HashMap::new(),
        }
    }

    /// Adds an entity descriptor and indexes it by TypeId.
    pub fn with_entity(mut self, descriptor: EntityDescriptor) -> Self {
        let index = self.entity_descriptors.len();
        self.entity_type_index.insert(descriptor.type_id, index);
        self.entity_descriptors.push(descriptor);
        self
    }

    pub fn entity_descriptor(&self, descriptor_index: usize) -> Option<&EntityDescriptor> {
        self.entity_descriptors.get(descriptor_index)
    }

    pub fn find_entity_descriptor(&self, type_name: &str) -> Option<(usize, &EntityDescriptor)> {
        self.entity_descriptors
            .iter()
            .enumerate()
            .find(|(_, d)| d.type_name == type_name)
    }

    pub fn descriptor_index_of(&self, type_id: TypeId) -> Option<usize> {
        self.entity_type_index.get(&type_id).copied()
    }

    pub fn find_variable(&self, entity_type: &str, variable_name: &str) -> Option<&VariableDescriptor> {
        self.find_entity_descriptor(entity_type)
            .and_then(|(_, d)| d.find_variable(variable_name))
    }

    pub fn entity_descriptor_count(&self) -> usize {
        self.entity_descriptors.len()
    }

    /// Total number of entities across all descriptors.
    pub fn entity_count(&self, solution: &dyn Any) -> usize {
        self.entity_descriptors
            .iter()
            .map(|d| d.entity_count(solution))
            .sum()
    }

    /// Number of genuine variables across all entities.
    pub fn genuine_variable_count(&self, solution: &dyn Any) -> usize {
        self.entity_descriptors
            .iter()
            .map(|d| d.entity_count(solution) * d.genuine_variables().count())
            .sum()
    }

    pub fn has_shadow_variables(&self) -> bool {
        self.entity_descriptors
            .iter()
            .any(|d| d.shadow_variables().next().is_some())
    }
}

impl fmt::Debug for SolutionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolutionDescriptor")
            .field("type_name", &self.type_name)
            .field("entities", &self.entity_descriptors)
            .finish()
    }
}
