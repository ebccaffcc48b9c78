//! Error types for PlanForge

use thiserror::Error;

/// Main error type for PlanForge operations
#[derive(Debug, Error)]
pub enum PlanForgeError {
    /// Invalid solver or selector configuration, detected while building.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error in domain model definition or planning id lookup
    #[error("Domain model error: {0}")]
    DomainModel(String),

    /// Error during score calculation
    #[error("Score calculation error: {0}")]
    ScoreCalculation(String),

    /// Incremental and from-scratch scores disagree.
    ///
    /// Only raised by the assertive environment modes.
    #[error("Score corruption: {0}")]
    ScoreCorruption(String),

    /// Solver was cancelled before completion
    #[error("Solver was cancelled")]
    Cancelled,

    /// Invalid operation for current solver state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A move thread failed; the failure is re-raised on the solver thread.
    #[error("Move thread ({move_thread_index}) failed: {message}")]
    MoveThread {
        move_thread_index: usize,
        message: String,
    },

    /// Internal error (should not occur in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PlanForgeError {
    /// Returns true for errors caused by configuration rather than runtime state.
    pub fn is_config(&self) -> bool {
        matches!(self, PlanForgeError::Config(_))
    }
}

/// Result type alias for PlanForge operations
pub type Result<T> = std::result::Result<T, PlanForgeError>;
