//! Variable descriptor.

use crate::domain::variable::{ShadowVariableKind, VariableSource, VariableType};

/// Describes a planning variable at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDescriptor {
    /// Name of the variable (field name).
    pub name: &'static str,
    pub variable_type: VariableType,
    /// Whether the variable can be unassigned.
    pub allows_unassigned: bool,
    /// For shadow variables: the variables it is computed from.
    pub sources: Vec<VariableSource>,
}

impl VariableDescriptor {
    pub fn genuine(name: &'static str) -> Self {
        VariableDescriptor {
            name,
            variable_type: VariableType::Genuine,
            allows_unassigned: false,
            sources: Vec::new(),
        }
    }

    pub fn shadow(name: &'static str, kind: ShadowVariableKind) -> Self {
        VariableDescriptor {
            name,
            variable_type: VariableType::Shadow(kind),
            allows_unassigned: true,
            sources: Vec::new(),
        }
    }

    /// Declares that this shadow variable is recomputed when
    /// `entity_type.variable_name` changes.
    pub fn with_source(mut self, entity_type: &'static str, variable_name: &'static str) -> Self {
        self.sources
            .push(VariableSource::new(entity_type, variable_name));
        self
    }

    pub fn with_allows_unassigned(mut self, allows_unassigned: bool) -> Self {
        self.allows_unassigned = allows_unassigned;
        self
    }

    pub fn is_genuine(&self) -> bool {
        self.variable_type.is_genuine()
    }

    pub fn is_shadow(&self) -> bool {
        self.variable_type.is_shadow()
    }
}
