//! Score director implementations.
//!
//! The score director owns the working solution and calculates its score.
//!
//! # Score Director Types
//!
//! - [`SimpleScoreDirector`] - Full recalculation through a calculator closure
//! - [`ShadowAwareScoreDirector`] - Shadow variable propagation wrapper

mod simple;
mod traits;

pub mod shadow_aware;

#[cfg(test)]
mod tests;

pub use shadow_aware::{ShadowAwareScoreDirector, ShadowVariableSupport};
pub use simple::SimpleScoreDirector;
pub use traits::{ChildThreadType, ScoreDirector};
