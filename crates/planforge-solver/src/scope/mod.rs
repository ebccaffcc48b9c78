//! Scope hierarchy for solver execution.
//!
//! Scopes maintain state at different levels of the solving process:
//! - [`SolverScope`]: Top-level, holds working solution and best solution
//! - [`PhaseScope`]: Per-phase state
//! - [`StepScope`]: Per-step state within a phase
//! - [`MoveScope`]: One evaluated candidate move
//!
//! Each scope borrows its parent mutably and lives only as long as the loop
//! iteration that created it. Move threads never see these scopes; they get
//! their own clones through explicit operations.

mod best;
mod move_scope;
mod phase;
mod solver;
mod step;
mod throttle;

pub use best::{BestSolution, BestSolutionHolder};
pub use move_scope::MoveScope;
pub use phase::PhaseScope;
pub use solver::SolverScope;
pub use step::StepScope;
pub use throttle::YieldThrottle;
