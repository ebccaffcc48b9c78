//! Constraint match bookkeeping.
//!
//! A [`ConstraintMatch`] records one constraint firing: which constraint,
//! which justification objects and with what score impact. Matches are
//! aggregated per constraint into [`ConstraintMatchTotal`]s and per
//! justification object into [`Indictment`]s. Both are rebuilt whenever the
//! score is calculated from scratch with match tracking enabled.

use std::any::Any;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use planforge_core::score::Score;
use planforge_core::{ConstraintRef, ImpactType};

/// Reference to an object that justifies a constraint match.
///
/// Type-erased so that matches over different entity and fact types can live
/// in one collection. Identity is the type name plus the display string.
#[derive(Clone)]
pub struct EntityRef {
    pub type_name: String,
    pub display: String,
    entity: Arc<dyn Any + Send + Sync>,
}

impl EntityRef {
    pub fn new<T: Clone + Debug + Send + Sync + 'static>(entity: &T) -> Self {
        Self {
            type_name: std::any::type_name::<T>().to_string(),
            display: format!("{:?}", entity),
            entity: Arc::new(entity.clone()),
        }
    }

    pub fn with_display<T: Clone + Send + Sync + 'static>(entity: &T, display: impl Into<String>) -> Self {
        Self {
            type_name: std::any::type_name::<T>().to_string(),
            display: display.into(),
            entity: Arc::new(entity.clone()),
        }
    }

    /// Attempts to downcast to the concrete type.
    pub fn as_entity<T: 'static>(&self) -> Option<&T> {
        self.entity.downcast_ref::<T>()
    }

    /// Returns the type name without its module path.
    pub fn short_type_name(&self) -> &str {
        self.type_name
            .rsplit("::")
            .next()
            .unwrap_or(&self.type_name)
    }
}

impl Debug for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityRef")
            .field("type", &self.short_type_name())
            .field("display", &self.display)
            .finish()
    }
}

impl PartialEq for EntityRef {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name && self.display == other.display
    }
}

impl Eq for EntityRef {}

impl Hash for EntityRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_name.hash(state);
        self.display.hash(state);
    }
}

/// One firing of a constraint.
#[derive(Debug, Clone)]
pub struct ConstraintMatch<Sc: Score> {
    pub constraint_ref: ConstraintRef,
    pub justifications: Vec<EntityRef>,
    /// Signed score impact of this match.
    pub score: Sc,
}

impl<Sc: Score> ConstraintMatch<Sc> {
    /// Creates a match whose score is `weight` negated for a penalty.
    pub fn new(
        constraint_ref: ConstraintRef,
        impact_type: ImpactType,
        weight: Sc,
        justifications: Vec<EntityRef>,
    ) -> Self {
        let score = match impact_type {
            ImpactType::Penalty => -weight,
            ImpactType::Reward => weight,
        };
        Self {
            constraint_ref,
            justifications,
            score,
        }
    }

    pub fn constraint_id(&self) -> String {
        self.constraint_ref.constraint_id()
    }
}

/// All matches of one constraint and their summed score.
#[derive(Debug, Clone)]
pub struct ConstraintMatchTotal<Sc: Score> {
    pub constraint_ref: ConstraintRef,
    pub constraint_matches: Vec<ConstraintMatch<Sc>>,
    pub score: Sc,
}

impl<Sc: Score> ConstraintMatchTotal<Sc> {
    pub fn new(constraint_ref: ConstraintRef) -> Self {
        Self {
            constraint_ref,
            constraint_matches: Vec::new(),
            score: Sc::zero(),
        }
    }

    pub fn add_match(&mut self, constraint_match: ConstraintMatch<Sc>) {
        self.score = self.score + constraint_match.score;
        self.constraint_matches.push(constraint_match);
    }

    pub fn match_count(&self) -> usize {
        self.constraint_matches.len()
    }

    /// Groups matches per constraint, ordered by constraint id.
    pub fn aggregate(matches: &[ConstraintMatch<Sc>]) -> Vec<Self> {
        let mut totals: HashMap<ConstraintRef, Self> = HashMap::new();
        for m in matches {
            totals
                .entry(m.constraint_ref.clone())
                .or_insert_with(|| Self::new(m.constraint_ref.clone()))
                .add_match(m.clone());
        }
        let mut totals: Vec<_> = totals.into_values().collect();
        totals.sort_by(|a, b| a.constraint_ref.cmp(&b.constraint_ref));
        totals
    }
}

/// How a single justification object impacts the score.
#[derive(Debug, Clone)]
pub struct Indictment<Sc: Score> {
    pub justification: EntityRef,
    pub score: Sc,
    pub constraint_matches: Vec<ConstraintMatch<Sc>>,
}

impl<Sc: Score> Indictment<Sc> {
    pub fn new(justification: EntityRef) -> Self {
        Self {
            justification,
            score: Sc::zero(),
            constraint_matches: Vec::new(),
        }
    }

    pub fn add_match(&mut self, constraint_match: ConstraintMatch<Sc>) {
        self.score = self.score + constraint_match.score;
        self.constraint_matches.push(constraint_match);
    }

    pub fn match_count(&self) -> usize {
        self.constraint_matches.len()
    }

    /// The distinct constraints this object is involved in.
    pub fn constraint_refs(&self) -> Vec<&ConstraintRef> {
        let mut refs: Vec<_> = self
            .constraint_matches
            .iter()
            .map(|m| &m.constraint_ref)
            .collect();
        refs.sort();
        refs.dedup();
        refs
    }

    /// Groups matches per justification, worst score first.
    ///
    /// A match listing the same object twice counts once for that object.
    pub fn aggregate(matches: &[ConstraintMatch<Sc>]) -> Vec<Self> {
        let mut indictments: HashMap<EntityRef, Self> = HashMap::new();
        for m in matches {
            let mut seen: Vec<&EntityRef> = Vec::with_capacity(m.justifications.len());
            for justification in &m.justifications {
                if seen.contains(&justification) {
                    continue;
                }
                seen.push(justification);
                indictments
                    .entry(justification.clone())
                    .or_insert_with(|| Self::new(justification.clone()))
                    .add_match(m.clone());
            }
        }
        let mut indictments: Vec<_> = indictments.into_values().collect();
        indictments.sort_by(|a, b| {
            a.score
                .cmp(&b.score)
                .then_with(|| a.justification.display.cmp(&b.justification.display))
        });
        indictments
    }
}
