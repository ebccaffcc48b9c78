//! Score director contract and score bookkeeping for PlanForge.
//!
//! This crate provides:
//! - The [`ScoreDirector`] contract the local search engine scores through
//! - [`SimpleScoreDirector`], recalculating the score from scratch
//! - [`ShadowAwareScoreDirector`], propagating shadow variable updates
//! - Constraint matches aggregated into totals and indictments

pub mod api;
pub mod director;

pub use api::analysis::{ConstraintMatch, ConstraintMatchTotal, EntityRef, Indictment};
pub use director::{
    ChildThreadType, ScoreDirector, ShadowAwareScoreDirector, ShadowVariableSupport,
    SimpleScoreDirector,
};
