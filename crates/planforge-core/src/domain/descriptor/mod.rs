//! Runtime metadata about solutions, entities and variables.

mod entity;
mod solution;
mod var_descriptor;


pub use entity::EntityDescriptor;
pub use solution::SolutionDescriptor;
pub use var_descriptor::VariableDescriptor;
