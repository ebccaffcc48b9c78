//! PlanForge Core - Core types and traits for local search solving
//!
//! This crate provides the fundamental abstractions for PlanForge:
//! - Score types for representing solution quality
//! - Domain traits for defining planning problems
//! - Descriptor types, the shadow variable graph and the planning-id index
//! - The shared error type

pub mod constraint;
pub mod domain;
pub mod error;
pub mod score;

pub use constraint::{ConstraintRef, ImpactType};
pub use domain::{PlanningEntity, PlanningId, PlanningSolution};
pub use error::{PlanForgeError, Result};
pub use score::{
    BendableScore, HardMediumSoftScore, HardSoftDecimalScore, HardSoftScore, ParseableScore, Score,
    ScoreLevel, ScoreParseError, SimpleScore,
};
