//! Heuristic components for solving
//!
//! This module contains:
//! - Bindings: Typed access to a genuine planning variable
//! - Moves: Operations that modify planning variables
//! - Selectors: Components that enumerate entities, values, and moves

pub mod binding;
pub mod r#move;
pub mod selector;

pub use binding::PlanningVariableBinding;

// Re-export move types
pub use r#move::{ChangeMove, EitherMove, Move, SwapMove};

// Re-export selector types
pub use selector::{
    ChangeMoveSelector, EntityReference, EntitySelector, MoveSelector, NearbyChangeMoveSelector,
    NearbyDistanceMeter, NearbyDistribution, SwapMoveSelector, ValueSelector,
};
