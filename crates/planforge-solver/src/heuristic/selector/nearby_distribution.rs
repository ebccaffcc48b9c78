//! Probability distributions over nearby candidates.
//!
//! Candidates are sorted by distance from the origin, nearest first. A
//! distribution maps a random draw to an index into that list, favouring
//! the nearest candidates.

use planforge_config::ResolvedNearbyDistribution;
use planforge_core::error::{PlanForgeError, Result};
use rand::Rng;
use rand_distr::{Beta, Distribution};

/// A distribution over the indices of a nearest-first candidate list.
///
/// # Example
///
/// ```
/// use planforge_solver::heuristic::selector::NearbyDistribution;
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let distribution = NearbyDistribution::Linear { size_maximum: 3 };
/// let mut rng = StdRng::seed_from_u64(7);
/// for _ in 0..100 {
///     assert!(distribution.next_index(&mut rng, 10) < 3);
/// }
/// ```
#[derive(Debug, Clone)]
pub enum NearbyDistribution {
    /// Probability decreases linearly with the index.
    Linear { size_maximum: usize },
    /// Probability decreases quadratically with the index.
    Parabolic { size_maximum: usize },
    /// Uniform over the nearest block of candidates.
    Block {
        size_minimum: usize,
        size_maximum: usize,
        size_ratio: f64,
        uniform_distribution_probability: f64,
    },
    /// Beta distribution scaled over the whole list.
    Beta(Beta<f64>),
}

impl NearbyDistribution {
    /// Builds the distribution of a resolved nearby configuration.
    pub fn from_resolved(resolved: ResolvedNearbyDistribution) -> Result<Self> {
        Ok(match resolved {
            ResolvedNearbyDistribution::Linear { size_maximum } => Self::Linear { size_maximum },
            ResolvedNearbyDistribution::Parabolic { size_maximum } => {
                Self::Parabolic { size_maximum }
            }
            ResolvedNearbyDistribution::Block {
                size_minimum,
                size_maximum,
                size_ratio,
                uniform_distribution_probability,
            } => Self::Block {
                size_minimum,
                size_maximum,
                size_ratio,
                uniform_distribution_probability,
            },
            ResolvedNearbyDistribution::Beta { alpha, beta } => {
                let distribution = Beta::new(alpha, beta).map_err(|err| {
                    PlanForgeError::Config(format!(
                        "the beta distribution (alpha {alpha}, beta {beta}) is invalid: {err:?}"
                    ))
                })?;
                Self::Beta(distribution)
            }
        })
    }

    /// Picks an index in `0..nearby_size`.
    ///
    /// `nearby_size` must be at least 1.
    pub fn next_index<R: Rng>(&self, rng: &mut R, nearby_size: usize) -> usize {
        debug_assert!(nearby_size > 0);
        let index = match self {
            Self::Linear { size_maximum } => {
                let size = nearby_size.min(*size_maximum) as f64;
                let y: f64 = rng.random();
                (size * (1.0 - (1.0 - y).sqrt())) as usize
            }
            Self::Parabolic { size_maximum } => {
                let size = nearby_size.min(*size_maximum) as f64;
                let y: f64 = rng.random();
                (size * (1.0 - (1.0 - y).powf(1.0 / 3.0))) as usize
            }
            Self::Block {
                size_minimum,
                size_maximum,
                size_ratio,
                uniform_distribution_probability,
            } => {
                if *uniform_distribution_probability > 0.0
                    && rng.random::<f64>() < *uniform_distribution_probability
                {
                    return rng.random_range(0..nearby_size);
                }
                let mut size = if *size_ratio < 1.0 {
                    let size = (nearby_size as f64 * size_ratio) as usize;
                    if size < *size_minimum {
                        (*size_minimum).min(nearby_size)
                    } else {
                        size
                    }
                } else {
                    nearby_size
                };
                size = size.min(*size_maximum).max(1);
                rng.random_range(0..size)
            }
            Self::Beta(beta) => {
                let x = beta.sample(rng);
                (x * nearby_size as f64) as usize
            }
        };
        index.min(nearby_size - 1)
    }
}
