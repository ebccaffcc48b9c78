//! Move selector configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Move selector configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MoveSelectorConfig {
    ChangeMoveSelector(ChangeMoveSelectorConfig),

    SwapMoveSelector(SwapMoveSelectorConfig),

    UnionMoveSelector(UnionMoveSelectorConfig),
}

impl MoveSelectorConfig {
    /// Change plus swap moves, each in random order.
    pub fn default_union() -> Self {
        MoveSelectorConfig::UnionMoveSelector(UnionMoveSelectorConfig {
            selectors: vec![
                MoveSelectorConfig::ChangeMoveSelector(ChangeMoveSelectorConfig::default()),
                MoveSelectorConfig::SwapMoveSelector(SwapMoveSelectorConfig::default()),
            ],
            ..UnionMoveSelectorConfig::default()
        })
    }
}

/// Change move selector configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ChangeMoveSelectorConfig {
    /// Restricts the selector to one bound planning variable.
    pub variable_name: Option<String>,

    #[serde(flatten)]
    pub selection: SelectionConfig,

    /// Nearby selection of the new value.
    pub nearby: Option<NearbySelectionConfig>,
}

/// Swap move selector configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SwapMoveSelectorConfig {
    pub variable_name: Option<String>,

    #[serde(flatten)]
    pub selection: SelectionConfig,
}

/// Union move selector configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UnionMoveSelectorConfig {
    pub selectors: Vec<MoveSelectorConfig>,

    /// One weight per child, used in random order.
    pub selector_probability_weights: Option<Vec<f64>>,

    pub selection_order: Option<SelectionOrder>,
}

impl UnionMoveSelectorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.selectors.is_empty() {
            return Err(ConfigError::Invalid(
                "the union_move_selector has no child selectors".to_string(),
            ));
        }
        if let Some(weights) = &self.selector_probability_weights {
            if weights.len() != self.selectors.len() {
                return Err(ConfigError::Invalid(format!(
                    "the union_move_selector has {} selector_probability_weights for {} selectors",
                    weights.len(),
                    self.selectors.len()
                )));
            }
            if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "the union_move_selector has a negative or non-finite weight in {weights:?}"
                )));
            }
        }
        Ok(())
    }
}

/// Settings shared by the leaf move selectors.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SelectionConfig {
    pub cache_type: Option<SelectionCacheType>,

    pub selection_order: Option<SelectionOrder>,

    /// Maximum moves selected per step.
    pub selected_count_limit: Option<usize>,

    /// Sort direction for `sorted` order.
    pub sorter_order: Option<SorterOrder>,
}

impl SelectionConfig {
    pub fn resolved_cache_type(&self) -> SelectionCacheType {
        self.cache_type.unwrap_or_default()
    }

    /// The selection order, `inherited` replacing `inherit` or a missing order.
    pub fn resolved_selection_order(&self, inherited: SelectionOrder) -> SelectionOrder {
        self.selection_order.unwrap_or_default().resolve(inherited)
    }

    /// Checks the order/cache combination.
    pub fn validate(&self, resolved_order: SelectionOrder) -> Result<(), ConfigError> {
        let cache_type = self.resolved_cache_type();
        match resolved_order {
            SelectionOrder::Shuffled | SelectionOrder::Sorted | SelectionOrder::Probabilistic
                if !cache_type.is_cached() =>
            {
                Err(ConfigError::Invalid(format!(
                    "the selection_order ({resolved_order:?}) requires a cached cache_type, \
                     not {cache_type:?}"
                )))
            }
            SelectionOrder::Sorted => Ok(()),
            _ if self.sorter_order.is_some() => Err(ConfigError::Invalid(format!(
                "the sorter_order ({:?}) is only supported with selection_order sorted, \
                 not {resolved_order:?}",
                self.sorter_order
            ))),
            _ => Ok(()),
        }
    }
}

/// When a selector rebuilds its candidate list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionCacheType {
    /// Generated lazily while iterating.
    #[default]
    JustInTime,
    Step,
    Phase,
    Solver,
}

impl SelectionCacheType {
    pub fn is_cached(&self) -> bool {
        !matches!(self, SelectionCacheType::JustInTime)
    }
}

/// Order in which a selector produces its candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionOrder {
    /// Use the order of the enclosing selector.
    #[default]
    Inherit,
    Original,
    Random,
    Sorted,
    Shuffled,
    Probabilistic,
}

impl SelectionOrder {
    pub fn resolve(self, inherited: SelectionOrder) -> SelectionOrder {
        match self {
            SelectionOrder::Inherit => inherited,
            other => other,
        }
    }

    /// Random and probabilistic selection never end on their own.
    pub fn is_random(&self) -> bool {
        matches!(self, SelectionOrder::Random | SelectionOrder::Probabilistic)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SorterOrder {
    #[default]
    Ascending,
    Descending,
}

/// The nearby distribution kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NearbyDistributionKind {
    Block,
    Linear,
    Parabolic,
    Beta,
}

impl std::fmt::Display for NearbyDistributionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            NearbyDistributionKind::Block => "blockDistribution",
            NearbyDistributionKind::Linear => "linearDistribution",
            NearbyDistributionKind::Parabolic => "parabolicDistribution",
            NearbyDistributionKind::Beta => "betaDistribution",
        })
    }
}

/// A nearby distribution with all defaults applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolvedNearbyDistribution {
    Block {
        size_minimum: usize,
        size_maximum: usize,
        size_ratio: f64,
        uniform_distribution_probability: f64,
    },
    Linear {
        size_maximum: usize,
    },
    Parabolic {
        size_maximum: usize,
    },
    Beta {
        alpha: f64,
        beta: f64,
    },
}

/// Nearby selection: values closer to the selected entity are more likely.
///
/// The parameters of at most one distribution kind may be set.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct NearbySelectionConfig {
    /// Explicit kind; parameters of another kind conflict with it.
    pub distribution_type: Option<NearbyDistributionKind>,

    pub block_distribution_size_minimum: Option<usize>,
    pub block_distribution_size_maximum: Option<usize>,
    pub block_distribution_size_ratio: Option<f64>,
    pub block_distribution_uniform_distribution_probability: Option<f64>,

    pub linear_distribution_size_maximum: Option<usize>,

    pub parabolic_distribution_size_maximum: Option<usize>,

    pub beta_distribution_alpha: Option<f64>,
    pub beta_distribution_beta: Option<f64>,
}

impl NearbySelectionConfig {
    const DEFAULT_BETA_ALPHA: f64 = 1.0;
    const DEFAULT_BETA_BETA: f64 = 5.0;

    /// Kinds whose parameters (or explicit type) are set, in declaration order.
    fn configured_kinds(&self) -> Vec<NearbyDistributionKind> {
        let mut kinds = Vec::new();
        let block = self.block_distribution_size_minimum.is_some()
            || self.block_distribution_size_maximum.is_some()
            || self.block_distribution_size_ratio.is_some()
            || self.block_distribution_uniform_distribution_probability.is_some();
        if block || self.distribution_type == Some(NearbyDistributionKind::Block) {
            kinds.push(NearbyDistributionKind::Block);
        }
        if self.linear_distribution_size_maximum.is_some()
            || self.distribution_type == Some(NearbyDistributionKind::Linear)
        {
            kinds.push(NearbyDistributionKind::Linear);
        }
        if self.parabolic_distribution_size_maximum.is_some()
            || self.distribution_type == Some(NearbyDistributionKind::Parabolic)
        {
            kinds.push(NearbyDistributionKind::Parabolic);
        }
        if self.beta_distribution_alpha.is_some()
            || self.beta_distribution_beta.is_some()
            || self.distribution_type == Some(NearbyDistributionKind::Beta)
        {
            kinds.push(NearbyDistributionKind::Beta);
        }
        kinds
    }

    /// Checks the order and cache type the nearby selector resolves to.
    pub fn validate(
        &self,
        resolved_cache_type: SelectionCacheType,
        resolved_order: SelectionOrder,
    ) -> Result<(), ConfigError> {
        if !matches!(resolved_order, SelectionOrder::Original | SelectionOrder::Random) {
            return Err(ConfigError::Invalid(format!(
                "the nearby selection ({self:?}) has a resolved selection_order \
                 ({resolved_order:?}) that is not Original or Random"
            )));
        }
        if resolved_cache_type.is_cached() {
            return Err(ConfigError::Invalid(format!(
                "the nearby selection ({self:?}) has a resolved cache_type \
                 ({resolved_cache_type:?}) that is cached"
            )));
        }
        Ok(())
    }

    /// Resolves the distribution for `resolved_order`.
    ///
    /// Original order walks values nearest first and has no distribution;
    /// configuring one there is an error. Random order defaults to beta(1, 5).
    pub fn resolve_distribution(
        &self,
        resolved_order: SelectionOrder,
    ) -> Result<Option<ResolvedNearbyDistribution>, ConfigError> {
        let kinds = self.configured_kinds();
        if let [first, second, ..] = kinds.as_slice() {
            return Err(ConfigError::Invalid(format!(
                "the nearby selection has both {first} and {second} parameters"
            )));
        }
        if resolved_order != SelectionOrder::Random {
            if let Some(kind) = kinds.first() {
                return Err(ConfigError::Invalid(format!(
                    "the nearby selection has {kind} parameters with a non-random \
                     selection_order ({resolved_order:?})"
                )));
            }
            return Ok(None);
        }

        let distribution = match kinds.first() {
            Some(NearbyDistributionKind::Block) => {
                let probability = self
                    .block_distribution_uniform_distribution_probability
                    .unwrap_or(0.0);
                if !(0.0..=1.0).contains(&probability) {
                    return Err(ConfigError::Invalid(format!(
                        "the block_distribution_uniform_distribution_probability ({probability}) \
                         must be between 0.0 and 1.0"
                    )));
                }
                let size_minimum = self.block_distribution_size_minimum.unwrap_or(0);
                let size_maximum = self.block_distribution_size_maximum.unwrap_or(usize::MAX);
                if size_maximum < size_minimum {
                    return Err(ConfigError::Invalid(format!(
                        "the block_distribution_size_maximum ({size_maximum}) is lower than \
                         the block_distribution_size_minimum ({size_minimum})"
                    )));
                }
                ResolvedNearbyDistribution::Block {
                    size_minimum,
                    size_maximum,
                    size_ratio: self.block_distribution_size_ratio.unwrap_or(1.0),
                    uniform_distribution_probability: probability,
                }
            }
            Some(NearbyDistributionKind::Linear) => ResolvedNearbyDistribution::Linear {
                size_maximum: self.linear_distribution_size_maximum.unwrap_or(usize::MAX),
            },
            Some(NearbyDistributionKind::Parabolic) => ResolvedNearbyDistribution::Parabolic {
                size_maximum: self.parabolic_distribution_size_maximum.unwrap_or(usize::MAX),
            },
            Some(NearbyDistributionKind::Beta) | None => {
                let alpha = self.beta_distribution_alpha.unwrap_or(Self::DEFAULT_BETA_ALPHA);
                let beta = self.beta_distribution_beta.unwrap_or(Self::DEFAULT_BETA_BETA);
                if alpha <= 0.0 || beta <= 0.0 {
                    return Err(ConfigError::Invalid(format!(
                        "the beta distribution parameters (alpha {alpha}, beta {beta}) \
                         must be positive"
                    )));
                }
                ResolvedNearbyDistribution::Beta { alpha, beta }
            }
        };
        Ok(Some(distribution))
    }
}
