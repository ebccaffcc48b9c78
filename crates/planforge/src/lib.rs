//! PlanForge - a local search planning engine in Rust
//!
//! Bind a planning variable, describe the search in `solver.toml` and call
//! [`run_solver`].
//!
//! # Example
//!
//! ```rust
//! use planforge::prelude::*;
//!
//! // Score types are re-exported
//! let score = HardSoftScore::of(0, -100);
//! assert_eq!(score.hard(), 0);
//! assert_eq!(score.soft(), -100);
//! assert!(HardSoftScore::parse("0hard/-100soft").unwrap() == score);
//! ```

#[cfg(feature = "console")]
pub mod console;

mod solver;

pub use solver::{run_solver, run_solver_with_config};

// Score types
pub use planforge_core::score::{
    BendableScore, HardMediumSoftScore, HardSoftDecimalScore, HardSoftScore, ParseableScore, Score,
    SimpleScore,
};

pub use planforge_core::domain::{PlanningEntity, PlanningId, PlanningSolution};
pub use planforge_core::{PlanForgeError, Result};

pub use planforge_scoring::{ScoreDirector, ShadowAwareScoreDirector, SimpleScoreDirector};

pub use planforge_config::{
    AcceptorConfig, EnvironmentMode, ForagerConfig, LocalSearchConfig, LocalSearchType,
    MoveSelectorConfig, MoveThreadCount, PhaseConfig, SolverConfig, TerminationConfig,
};

pub use planforge_solver::{
    PlanningVariableBinding, Solver, SolverBuilder, SolverEventListener, SolverHandle,
    StepEndedEvent,
};

/// The solver engine, for wiring phases by hand.
pub mod engine {
    pub use planforge_solver::*;
}

pub mod prelude {
    pub use super::{
        run_solver, run_solver_with_config, PlanningVariableBinding, SolverBuilder, SolverConfig,
    };
    pub use super::{
        BendableScore, HardMediumSoftScore, HardSoftDecimalScore, HardSoftScore, ParseableScore,
        Score, SimpleScore,
    };
    pub use super::{PlanningEntity, PlanningId, PlanningSolution, ScoreDirector};
}
