//! Shared test fixtures for PlanForge crates.
//!
//! This crate provides data types, score calculators and director
//! factories for testing.
//!
//! - [`nqueens`] - N-Queens with planning ids and a row variable
//! - [`task`] - Task-to-worker assignment with a `load` shadow variable
//! - [`minimal`] - A solution with a single entity
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! planforge-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```
//! use planforge_test::nqueens::{create_nqueens_director, NQueensSolution};
//! use planforge_scoring::ScoreDirector;
//!
//! let mut director = create_nqueens_director(&[1, 3, 0, 2]);
//! assert_eq!(director.calculate_score().score(), 0);
//! ```

pub mod minimal;
pub mod nqueens;
pub mod task;

pub use minimal::{MinimalSolution, Slot};
pub use nqueens::{NQueensSolution, Queen};
pub use task::{Task, TaskSolution, Worker};
