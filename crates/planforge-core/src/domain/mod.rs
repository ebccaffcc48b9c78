//! Domain model traits and runtime metadata for planning problems
//!
//! - `PlanningSolution`: the container for the complete problem and solution
//! - `PlanningEntity`: things that can be planned
//! - `PlanningId`: stable identity across solution clones
//! - descriptors, the shadow variable graph and the planning-id index

mod descriptor;
mod entity_ref;
mod lookup;
mod shadow;
mod traits;
mod variable;

pub use descriptor::{EntityDescriptor, SolutionDescriptor, VariableDescriptor};
pub use entity_ref::{EntityExtractor, TypedEntityExtractor};
pub use lookup::LookUpIndex;
pub use shadow::ShadowVariableGraph;
pub use traits::{PlanningEntity, PlanningId, PlanningSolution};
pub use variable::{ShadowVariableKind, VariableSource, VariableType};
