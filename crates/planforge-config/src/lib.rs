//! Configuration system for PlanForge.
//!
//! Load solver configuration from TOML or YAML to control the environment
//! mode, move threads, termination and local search phases without code
//! changes.
//!
//! # Examples
//!
//! ```
//! use planforge_config::{EnvironmentMode, PhaseConfig, SolverConfig};
//! use std::time::Duration;
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     environment_mode = "full_assert"
//!     move_thread_count = { count = 2 }
//!
//!     [termination]
//!     seconds_spent_limit = 30
//!
//!     [[phases]]
//!     type = "local_search"
//!     local_search_type = "tabu_search"
//!     [phases.move_selector]
//!     type = "change_move_selector"
//!     selection_order = "random"
//! "#).unwrap();
//!
//! assert_eq!(config.environment_mode, EnvironmentMode::FullAssert);
//! assert_eq!(config.time_limit(), Some(Duration::from_secs(30)));
//! assert!(matches!(config.phases[0], PhaseConfig::LocalSearch(_)));
//! ```
//!
//! Use the defaults when the file is missing:
//!
//! ```
//! use planforge_config::SolverConfig;
//!
//! let config = SolverConfig::load("solver.toml").unwrap_or_default();
//! ```

mod local_search;
mod selector;


use std::path::Path;
use std::time::Duration;

use planforge_core::PlanForgeError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use local_search::{
    AcceptorConfig, FinalistPodiumType, ForagerConfig, LocalSearchConfig, LocalSearchType,
    PickEarlyType,
};
pub use selector::{
    ChangeMoveSelectorConfig, MoveSelectorConfig, NearbyDistributionKind,
    NearbySelectionConfig, ResolvedNearbyDistribution, SelectionCacheType, SelectionConfig,
    SelectionOrder, SorterOrder, SwapMoveSelectorConfig, UnionMoveSelectorConfig,
};

/// Default number of selected moves buffered per move thread.
pub const DEFAULT_MOVE_THREAD_BUFFER_SIZE: usize = 10;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<ConfigError> for PlanForgeError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Invalid(message) => PlanForgeError::Config(message),
            other => PlanForgeError::Config(other.to_string()),
        }
    }
}

/// Main solver configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SolverConfig {
    /// Environment mode affecting reproducibility and assertions.
    #[serde(default)]
    pub environment_mode: EnvironmentMode,

    /// Random seed, `0` when unset in a reproducible mode.
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// Number of threads for parallel move evaluation.
    #[serde(default)]
    pub move_thread_count: MoveThreadCount,

    /// Selected moves buffered per move thread.
    #[serde(default)]
    pub move_thread_buffer_size: Option<usize>,

    #[serde(default)]
    pub termination: Option<TerminationConfig>,

    #[serde(default)]
    pub phases: Vec<PhaseConfig>,
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file, by extension: `.yaml`/`.yml` is
    /// YAML, anything else TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn with_environment_mode(mut self, environment_mode: EnvironmentMode) -> Self {
        self.environment_mode = environment_mode;
        self
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    pub fn with_move_thread_count(mut self, move_thread_count: MoveThreadCount) -> Self {
        self.move_thread_count = move_thread_count;
        self
    }

    pub fn with_move_thread_buffer_size(mut self, size: usize) -> Self {
        self.move_thread_buffer_size = Some(size);
        self
    }

    pub fn with_termination(mut self, termination: TerminationConfig) -> Self {
        self.termination = Some(termination);
        self
    }

    /// Sets the termination time limit.
    pub fn with_termination_seconds(mut self, seconds: u64) -> Self {
        self.termination = Some(TerminationConfig {
            seconds_spent_limit: Some(seconds),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    pub fn with_phase(mut self, phase: PhaseConfig) -> Self {
        self.phases.push(phase);
        self
    }

    /// Returns the termination time limit, if configured.
    pub fn time_limit(&self) -> Option<Duration> {
        self.termination.as_ref().and_then(|t| t.time_limit())
    }

    /// The random seed the solver uses, `None` meaning OS entropy.
    pub fn resolved_random_seed(&self) -> Option<u64> {
        match self.environment_mode {
            EnvironmentMode::NonReproducible => self.random_seed,
            _ => Some(self.random_seed.unwrap_or(0)),
        }
    }

    /// Resolves the move thread count against `available_processors`.
    pub fn resolved_move_thread_count(
        &self,
        available_processors: usize,
    ) -> Result<Option<usize>, ConfigError> {
        self.move_thread_count.resolve(available_processors)
    }

    pub fn resolved_move_thread_buffer_size(&self) -> Result<usize, ConfigError> {
        match self.move_thread_buffer_size {
            Some(0) => Err(ConfigError::Invalid(
                "the move_thread_buffer_size (0) must be at least 1".to_string(),
            )),
            Some(size) => Ok(size),
            None => Ok(DEFAULT_MOVE_THREAD_BUFFER_SIZE),
        }
    }
}

/// Environment mode affecting solver behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentMode {
    /// Reproducible, without any assertion.
    Production,

    /// Deterministic: the same seed gives the same result.
    #[default]
    Reproducible,

    /// Intrusive, cheap assertions.
    FastAssert,

    /// Intrusive and non-intrusive full recalculation assertions.
    FullAssert,

    /// Full recalculation assertions that never touch the working score.
    NonIntrusiveFullAssert,

    /// Seeded from OS entropy.
    NonReproducible,
}

impl EnvironmentMode {
    pub fn is_reproducible(&self) -> bool {
        !matches!(self, EnvironmentMode::NonReproducible)
    }

    pub fn is_asserted(&self) -> bool {
        matches!(
            self,
            EnvironmentMode::FastAssert
                | EnvironmentMode::FullAssert
                | EnvironmentMode::NonIntrusiveFullAssert
        )
    }

    pub fn is_non_intrusive_full_asserted(&self) -> bool {
        matches!(
            self,
            EnvironmentMode::FullAssert | EnvironmentMode::NonIntrusiveFullAssert
        )
    }

    pub fn is_intrusive_fast_asserted(&self) -> bool {
        matches!(self, EnvironmentMode::FastAssert | EnvironmentMode::FullAssert)
    }
}

/// Move thread count configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveThreadCount {
    /// Single-threaded solving.
    #[default]
    None,

    /// Available processors minus two, at most four.
    Auto,

    /// Specific number of threads.
    Count(usize),
}

impl MoveThreadCount {
    /// Leaves one processor for the OS and one for the solver thread.
    const AUTO_RESERVED_PROCESSORS: usize = 2;
    const AUTO_MAXIMUM: usize = 4;

    /// The number of move threads, `None` for single-threaded solving.
    pub fn resolve(&self, available_processors: usize) -> Result<Option<usize>, ConfigError> {
        match *self {
            MoveThreadCount::None => Ok(None),
            MoveThreadCount::Auto => {
                let count = available_processors
                    .saturating_sub(Self::AUTO_RESERVED_PROCESSORS)
                    .min(Self::AUTO_MAXIMUM);
                Ok((count > 1).then_some(count))
            }
            MoveThreadCount::Count(0) => Err(ConfigError::Invalid(
                "the move_thread_count (0) resulted in a resolved move thread count that is lower than 1"
                    .to_string(),
            )),
            MoveThreadCount::Count(count) => Ok(Some(count)),
        }
    }
}

/// Termination configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TerminationConfig {
    pub seconds_spent_limit: Option<u64>,

    pub minutes_spent_limit: Option<u64>,

    pub step_count_limit: Option<u64>,

    /// Maximum steps since the last best score improvement.
    pub unimproved_step_count_limit: Option<u64>,

    /// Target best score (as string, e.g., "0hard/-100soft").
    pub best_score_limit: Option<String>,

    /// Terminate as soon as the best solution is feasible.
    pub best_score_feasible: Option<bool>,
}

impl TerminationConfig {
    /// Returns the time limit as a Duration, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        let seconds =
            self.seconds_spent_limit.unwrap_or(0) + self.minutes_spent_limit.unwrap_or(0) * 60;
        if seconds > 0 {
            Some(Duration::from_secs(seconds))
        } else {
            None
        }
    }

    pub fn with_step_count_limit(mut self, limit: u64) -> Self {
        self.step_count_limit = Some(limit);
        self
    }

    pub fn with_unimproved_step_count_limit(mut self, limit: u64) -> Self {
        self.unimproved_step_count_limit = Some(limit);
        self
    }

    pub fn with_best_score_limit(mut self, limit: impl Into<String>) -> Self {
        self.best_score_limit = Some(limit.into());
        self
    }

    /// True when no limit at all is configured.
    pub fn is_empty(&self) -> bool {
        self.time_limit().is_none()
            && self.step_count_limit.is_none()
            && self.unimproved_step_count_limit.is_none()
            && self.best_score_limit.is_none()
            && !self.best_score_feasible.unwrap_or(false)
    }
}

/// Phase configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PhaseConfig {
    LocalSearch(LocalSearchConfig),
}
