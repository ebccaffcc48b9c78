//! Variable type definitions

/// The type of a planning variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableType {
    /// A genuine planning variable that the solver assigns.
    Genuine,
    /// A shadow variable recomputed from its source variables.
    Shadow(ShadowVariableKind),
}

/// The kind of shadow variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShadowVariableKind {
    /// Custom shadow variable with a user-defined update function.
    Custom,
    /// Inverse of another variable (bidirectional relationship).
    InverseRelation,
    /// Anchor of a chain.
    Anchor,
    /// Updated together with another shadow variable.
    Piggyback,
}

impl VariableType {
    pub fn is_genuine(&self) -> bool {
        matches!(self, VariableType::Genuine)
    }

    pub fn is_shadow(&self) -> bool {
        matches!(self, VariableType::Shadow(_))
    }

    /// Returns the shadow kind, if this is a shadow variable.
    pub fn shadow_kind(&self) -> Option<ShadowVariableKind> {
        match self {
            VariableType::Shadow(kind) => Some(*kind),
            VariableType::Genuine => None,
        }
    }
}

/// A `(entity type, variable)` pair a shadow variable depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableSource {
    pub entity_type: &'static str,
    pub variable_name: &'static str,
}

impl VariableSource {
    pub const fn new(entity_type: &'static str, variable_name: &'static str) -> Self {
        Self {
            entity_type,
            variable_name,
        }
    }
}

impl std::fmt::Display for VariableSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.entity_type, self.variable_name)
    }
}
