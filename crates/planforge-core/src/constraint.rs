//! Constraint identification.
//!
//! Constraint matches, totals and indictments refer to constraints through
//! a `ConstraintRef`, whose id is `"package/name"` (or just `"name"`).

use std::fmt;

/// Reference to a constraint for identification.
///
/// # Example
///
/// ```
/// use planforge_core::ConstraintRef;
///
/// let cr = ConstraintRef::new("nqueens", "Row conflict");
/// assert_eq!(cr.constraint_id(), "nqueens/Row conflict");
///
/// let parsed = ConstraintRef::parse_id("nqueens/Row conflict");
/// assert_eq!(parsed, cr);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintRef {
    /// Package/module containing the constraint.
    pub package: String,
    /// Name of the constraint.
    pub name: String,
}

impl ConstraintRef {
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
        }
    }

    /// Returns the constraint id, `package/name`, or `name` when the package is empty.
    pub fn constraint_id(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.package, self.name)
        }
    }

    /// Splits a constraint id at its last `/`.
    pub fn parse_id(constraint_id: &str) -> Self {
        match constraint_id.rsplit_once('/') {
            Some((package, name)) => Self::new(package, name),
            None => Self::new("", constraint_id),
        }
    }
}

impl fmt::Display for ConstraintRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.constraint_id())
    }
}

/// Whether a constraint match lowers or raises the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImpactType {
    /// Penalize (subtract from score).
    Penalty,
    /// Reward (add to score).
    Reward,
}

impl ImpactType {
    /// Returns -1 for a penalty and 1 for a reward.
    pub fn sign(self) -> i64 {
        match self {
            ImpactType::Penalty => -1,
            ImpactType::Reward => 1,
        }
    }
}
