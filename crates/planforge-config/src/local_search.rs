//! Local search phase configuration.

use serde::{Deserialize, Serialize};

use crate::selector::MoveSelectorConfig;
use crate::{ConfigError, TerminationConfig};

/// Local search configuration.
///
/// Either pick a `local_search_type` preset or configure the acceptor and
/// forager explicitly; combining a preset with an explicit acceptor or
/// forager is rejected. With neither, late acceptance is used.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct LocalSearchConfig {
    pub local_search_type: Option<LocalSearchType>,

    pub acceptor: Option<AcceptorConfig>,

    pub forager: Option<ForagerConfig>,

    /// Defaults to a union of change and swap moves.
    pub move_selector: Option<MoveSelectorConfig>,

    /// Phase termination configuration.
    pub termination: Option<TerminationConfig>,
}

impl LocalSearchConfig {
    pub fn with_local_search_type(mut self, local_search_type: LocalSearchType) -> Self {
        self.local_search_type = Some(local_search_type);
        self
    }

    pub fn with_acceptor(mut self, acceptor: AcceptorConfig) -> Self {
        self.acceptor = Some(acceptor);
        self
    }

    pub fn with_forager(mut self, forager: ForagerConfig) -> Self {
        self.forager = Some(forager);
        self
    }

    pub fn with_move_selector(mut self, move_selector: MoveSelectorConfig) -> Self {
        self.move_selector = Some(move_selector);
        self
    }

    pub fn with_termination(mut self, termination: TerminationConfig) -> Self {
        self.termination = Some(termination);
        self
    }

    /// The explicit acceptor, or the preset of the local search type.
    pub fn resolve_acceptor(&self) -> Result<AcceptorConfig, ConfigError> {
        if let Some(acceptor) = &self.acceptor {
            if let Some(local_search_type) = self.local_search_type {
                return Err(ConfigError::Invalid(format!(
                    "the local_search_type ({local_search_type:?}) must not be configured \
                     if the acceptor ({acceptor:?}) is explicitly configured"
                )));
            }
            return Ok(acceptor.clone());
        }
        Ok(match self.local_search_type.unwrap_or_default() {
            LocalSearchType::HillClimbing | LocalSearchType::VariableNeighborhoodDescent => {
                AcceptorConfig::HillClimbing
            }
            LocalSearchType::TabuSearch => AcceptorConfig::EntityTabu {
                entity_tabu_size: None,
                entity_tabu_ratio: None,
            },
            LocalSearchType::SimulatedAnnealing => AcceptorConfig::SimulatedAnnealing {
                starting_temperature: None,
            },
            LocalSearchType::LateAcceptance => AcceptorConfig::LateAcceptance {
                late_acceptance_size: None,
            },
        })
    }

    /// The explicit forager, or the preset of the local search type.
    pub fn resolve_forager(&self) -> Result<ForagerConfig, ConfigError> {
        if let Some(forager) = &self.forager {
            if let Some(local_search_type) = self.local_search_type {
                return Err(ConfigError::Invalid(format!(
                    "the local_search_type ({local_search_type:?}) must not be configured \
                     if the forager ({forager:?}) is explicitly configured"
                )));
            }
            return Ok(forager.clone());
        }
        let forager = ForagerConfig::default();
        Ok(match self.local_search_type.unwrap_or_default() {
            LocalSearchType::HillClimbing
            | LocalSearchType::SimulatedAnnealing
            | LocalSearchType::LateAcceptance => forager.with_accepted_count_limit(1),
            // Slow stepping
            LocalSearchType::TabuSearch => forager.with_accepted_count_limit(1000),
            LocalSearchType::VariableNeighborhoodDescent => {
                forager.with_pick_early_type(PickEarlyType::FirstLastStepScoreImproving)
            }
        })
    }
}

/// Local search presets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocalSearchType {
    HillClimbing,
    TabuSearch,
    SimulatedAnnealing,
    #[default]
    LateAcceptance,
    VariableNeighborhoodDescent,
}

/// Acceptor configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AcceptorConfig {
    /// Only accept moves that do not worsen the last step score.
    HillClimbing,

    /// Entity tabu search. Without size or ratio, the ratio is 0.1.
    EntityTabu {
        entity_tabu_size: Option<usize>,
        entity_tabu_ratio: Option<f64>,
    },

    /// Simulated annealing; the starting temperature is a score string.
    SimulatedAnnealing { starting_temperature: Option<String> },

    /// Late acceptance, 400 steps long by default.
    LateAcceptance { late_acceptance_size: Option<usize> },
}

impl AcceptorConfig {
    pub const DEFAULT_ENTITY_TABU_RATIO: f64 = 0.1;
    pub const DEFAULT_LATE_ACCEPTANCE_SIZE: usize = 400;
}

/// Forager configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ForagerConfig {
    /// Accepted moves evaluated per step before picking, unlimited if unset.
    pub accepted_count_limit: Option<usize>,

    pub pick_early_type: Option<PickEarlyType>,

    /// For `first_random_accepted_with_probability`.
    pub pick_early_probability: Option<f64>,

    pub finalist_podium_type: Option<FinalistPodiumType>,

    /// Break ties between equal finalists randomly (default true).
    pub break_tie_randomly: Option<bool>,
}

impl ForagerConfig {
    pub fn with_accepted_count_limit(mut self, limit: usize) -> Self {
        self.accepted_count_limit = Some(limit);
        self
    }

    pub fn with_pick_early_type(mut self, pick_early_type: PickEarlyType) -> Self {
        self.pick_early_type = Some(pick_early_type);
        self
    }

    pub fn with_finalist_podium_type(mut self, finalist_podium_type: FinalistPodiumType) -> Self {
        self.finalist_podium_type = Some(finalist_podium_type);
        self
    }

    pub fn with_break_tie_randomly(mut self, break_tie_randomly: bool) -> Self {
        self.break_tie_randomly = Some(break_tie_randomly);
        self
    }

    /// Whether this forager ever stops a step on its own, which a
    /// never-ending move selector requires.
    pub fn supports_never_ending_move_selector(&self) -> bool {
        self.accepted_count_limit.is_some()
            || self.pick_early_type.unwrap_or_default() != PickEarlyType::Never
    }

    /// Validates the pick early probability.
    pub fn resolved_pick_early_probability(&self) -> Result<Option<f64>, ConfigError> {
        match (self.pick_early_type.unwrap_or_default(), self.pick_early_probability) {
            (PickEarlyType::FirstRandomAcceptedWithProbability, Some(p))
                if (0.0..=1.0).contains(&p) =>
            {
                Ok(Some(p))
            }
            (PickEarlyType::FirstRandomAcceptedWithProbability, p) => Err(ConfigError::Invalid(
                format!(
                    "the pick_early_type (first_random_accepted_with_probability) requires a \
                     pick_early_probability ({p:?}) between 0.0 and 1.0"
                ),
            )),
            (pick_early_type, Some(p)) => Err(ConfigError::Invalid(format!(
                "the pick_early_probability ({p}) is only supported with \
                 first_random_accepted_with_probability, not {pick_early_type:?}"
            ))),
            (_, None) => Ok(None),
        }
    }
}

/// When a forager may stop evaluating moves before the step's limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PickEarlyType {
    #[default]
    Never,

    /// Pick the first accepted move that beats the best score.
    FirstBestScoreImproving,

    /// Pick the first accepted move that beats the last step score.
    FirstLastStepScoreImproving,

    /// Pick each accepted move with a fixed probability.
    FirstRandomAcceptedWithProbability,
}

/// How finalists are compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalistPodiumType {
    #[default]
    HighestScore,

    /// Alias of `strategic_oscillation_by_level`.
    StrategicOscillation,

    /// Reference is the last step score.
    StrategicOscillationByLevel,

    /// Reference is the best score.
    StrategicOscillationByLevelOnBestScore,
}
