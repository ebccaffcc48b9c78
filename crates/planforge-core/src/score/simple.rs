//! SimpleScore - Single-level score implementation

use std::fmt;

use super::traits::{write_init_prefix, ParseableScore, Score, ScoreParseError};
use super::ScoreLevel;

/// A simple score with a single soft level.
///
/// Having no hard level, a `SimpleScore` is feasible as soon as the
/// solution is initialized.
///
/// # Examples
///
/// ```
/// use planforge_core::{SimpleScore, Score};
///
/// let score1 = SimpleScore::of(-5);
/// let score2 = SimpleScore::of(-3);
///
/// assert!(score2 > score1);
/// assert!(score1.is_feasible());
/// assert!(!SimpleScore::of_uninitialized(-1, 0).is_feasible());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimpleScore {
    init_score: i32,
    score: i64,
}

impl SimpleScore {
    /// The zero score.
    pub const ZERO: SimpleScore = SimpleScore {
        init_score: 0,
        score: 0,
    };

    /// A score of 1 (useful for incrementing).
    pub const ONE: SimpleScore = SimpleScore {
        init_score: 0,
        score: 1,
    };

    #[inline]
    pub const fn of(score: i64) -> Self {
        SimpleScore {
            init_score: 0,
            score,
        }
    }

    #[inline]
    pub const fn of_uninitialized(init_score: i32, score: i64) -> Self {
        SimpleScore { init_score, score }
    }

    /// Returns the score value.
    #[inline]
    pub const fn score(&self) -> i64 {
        self.score
    }
}

impl Score for SimpleScore {
    #[inline]
    fn is_feasible(&self) -> bool {
        self.init_score >= 0
    }

    #[inline]
    fn zero() -> Self {
        SimpleScore::ZERO
    }

    #[inline]
    fn levels_count() -> usize {
        1
    }

    #[inline]
    fn hard_levels_count() -> usize {
        0
    }

    fn to_level_numbers(&self) -> Vec<i64> {
        vec![self.score]
    }

    fn from_level_numbers(init_score: i32, levels: &[i64]) -> Self {
        assert_eq!(levels.len(), 1, "SimpleScore requires exactly 1 level");
        SimpleScore::of_uninitialized(init_score, levels[0])
    }

    impl_score_scale!(SimpleScore { score });

    fn level_label(index: usize) -> ScoreLevel {
        match index {
            0 => ScoreLevel::Soft,
            _ => panic!("SimpleScore has 1 level, got index {}", index),
        }
    }
}

impl_score_ops!(SimpleScore { score });

impl fmt::Debug for SimpleScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SimpleScore({}, {})", self.init_score, self.score)
    }
}

impl fmt::Display for SimpleScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_init_prefix(f, self.init_score)?;
        write!(f, "{}", self.score)
    }
}

impl ParseableScore for SimpleScore {
    fn parse(s: &str) -> Result<Self, ScoreParseError> {
        let (init_score, level) = super::traits::split_init_score(s)?;
        let level = level.trim();
        let score = level
            .parse::<i64>()
            .map_err(|e| ScoreParseError::new(format!("Invalid SimpleScore '{}': {}", s, e)))?;
        Ok(SimpleScore::of_uninitialized(init_score, score))
    }
}

impl From<i64> for SimpleScore {
    fn from(score: i64) -> Self {
        SimpleScore::of(score)
    }
}
