//! PlanForge local search engine
//!
//! This crate provides the solver implementation including:
//! - Solver and its cross-thread handle
//! - Local search phase with pluggable acceptors and foragers
//! - Move system and move selectors with caching, ordering and nearby selection
//! - Termination conditions
//! - Multithreaded move evaluation with a deterministic step order
//! - Event system for monitoring
//! - Configuration wiring (builder module)

pub mod builder;
pub mod event;
pub mod heuristic;
pub mod phase;
pub mod scope;
pub mod solver;
pub mod termination;
pub mod thread;

pub use builder::{
    build_local_search_phase, ConfiguredLocalSearchPhase, ConfiguredMove, ConfiguredMoveSelector,
    PhaseBuildContext, SolverBuilder,
};
pub use event::{SolverEventListener, SolverEventSupport, StepEndedEvent};
pub use heuristic::{
    ChangeMove, ChangeMoveSelector, EitherMove, Move, MoveSelector, NearbyChangeMoveSelector,
    NearbyDistanceMeter, PlanningVariableBinding, SwapMove, SwapMoveSelector,
};
pub use phase::{
    localsearch::{
        Acceptor, EntityTabuAcceptor, FinalistPodium, HighestScoreFinalistPodium,
        HillClimbingAcceptor, LateAcceptanceAcceptor, LocalSearchDecider, LocalSearchForager,
        LocalSearchPhase, SimulatedAnnealingAcceptor, StrategicOscillationByLevelFinalistPodium,
    },
    Phase,
};
pub use scope::{BestSolutionHolder, PhaseScope, SolverScope, StepScope, YieldThrottle};
pub use solver::{Solver, SolverHandle};
pub use termination::{
    AndTermination, BestScoreFeasibleTermination, BestScoreTermination, NoTermination,
    OrTermination, StepCountTermination, Termination, TimeTermination,
    UnimprovedStepCountTermination,
};
pub use thread::MoveThreadConfig;
