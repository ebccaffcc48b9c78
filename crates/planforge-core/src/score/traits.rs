//! Core Score trait definition

use std::cmp::Ordering;
use std::fmt::{self, Debug, Display};
use std::hash::Hash;
use std::ops::{Add, Neg, Sub};

use super::ScoreLevel;

/// Core trait for all score types in PlanForge.
///
/// A score is an immutable, totally ordered value made of an init score
/// followed by one or more levels in priority order. Comparison is
/// lexicographic: init score first, then level 0, level 1, and so on.
///
/// The init score is zero for a fully initialized solution and negative
/// (minus the number of uninitialized variables) otherwise.
///
/// # Score Levels
///
/// - Hard levels: must all be `>= 0` for the solution to be feasible
/// - Medium and soft levels: optimization objectives
pub trait Score:
    Copy
    + Debug
    + Display
    + Default
    + Send
    + Sync
    + PartialEq
    + Eq
    + PartialOrd
    + Ord
    + Hash
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
    + 'static
{
    /// Returns the init score, `0` when every planning variable is assigned.
    fn init_score(&self) -> i32;

    /// Returns a copy of this score with another init score.
    fn with_init_score(&self, init_score: i32) -> Self;

    /// Returns true when no planning variable is left uninitialized.
    fn is_solution_initialized(&self) -> bool {
        self.init_score() >= 0
    }

    /// Returns true if the solution is initialized and every hard level is `>= 0`.
    fn is_feasible(&self) -> bool;

    /// Returns the zero score (identity element for addition).
    fn zero() -> Self;

    /// Returns the number of score levels, excluding the init score.
    fn levels_count() -> usize;

    /// Returns how many of the leading levels are hard levels.
    fn hard_levels_count() -> usize;

    /// Returns the level values, highest priority first, excluding the init score.
    fn to_level_numbers(&self) -> Vec<i64>;

    /// Creates a score from an init score and level numbers.
    ///
    /// # Panics
    /// Panics if the number of levels doesn't match `levels_count()`.
    fn from_level_numbers(init_score: i32, levels: &[i64]) -> Self;

    /// Returns the levels as floating point numbers, highest priority first.
    ///
    /// Fixed-point score types unscale their levels.
    fn to_level_doubles(&self) -> Vec<f64> {
        self.to_level_numbers().into_iter().map(|n| n as f64).collect()
    }

    /// Multiplies every level (and the init score) by a scalar, rounding down.
    fn multiply(&self, multiplicand: f64) -> Self;

    /// Divides every level (and the init score) by a scalar, rounding down.
    fn divide(&self, divisor: f64) -> Self;

    /// Raises every level (and the init score) to a power, rounding down.
    fn power(&self, exponent: f64) -> Self;

    /// Returns the absolute value of this score.
    fn abs(&self) -> Self;

    /// Returns the semantic label for the score level at the given index.
    ///
    /// # Panics
    /// Panics if `index >= levels_count()`.
    fn level_label(index: usize) -> ScoreLevel;

    /// Compares two scores, returning the ordering.
    fn compare(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    /// Returns true if this score is better than the other score.
    fn is_better_than(&self, other: &Self) -> bool {
        self > other
    }

    /// Returns true if this score is worse than the other score.
    fn is_worse_than(&self, other: &Self) -> bool {
        self < other
    }

    /// Returns true if this score is equal to the other score.
    fn is_equal_to(&self, other: &Self) -> bool {
        self == other
    }
}

/// Marker trait for scores that can be parsed from a string.
pub trait ParseableScore: Score {
    /// Parses a score from a string representation.
    ///
    /// # Format
    /// - SimpleScore: `"42"` or `"-2init/42"`
    /// - HardSoftScore: `"0hard/-100soft"` or `"-1init/0hard/-100soft"`
    /// - HardMediumSoftScore: `"0hard/0medium/-100soft"`
    fn parse(s: &str) -> Result<Self, ScoreParseError>;

    /// Returns the string representation of this score.
    fn to_string_repr(&self) -> String {
        self.to_string()
    }
}

/// Error when parsing a score from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreParseError {
    pub message: String,
}

impl ScoreParseError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ScoreParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Score parse error: {}", self.message)
    }
}

impl std::error::Error for ScoreParseError {}

/// Splits an optional `"<n>init/"` prefix off a score string.
pub(crate) fn split_init_score(s: &str) -> Result<(i32, &str), ScoreParseError> {
    let s = s.trim();
    let Some((head, rest)) = s.split_once('/') else {
        return Ok((0, s));
    };
    match head.trim().strip_suffix("init") {
        Some(number) => {
            let init_score = number.parse::<i32>().map_err(|e| {
                ScoreParseError::new(format!("Invalid init score '{}': {}", number, e))
            })?;
            Ok((init_score, rest))
        }
        None => Ok((0, s)),
    }
}

/// Writes the `"<n>init/"` prefix for uninitialized scores.
pub(crate) fn write_init_prefix(f: &mut fmt::Formatter<'_>, init_score: i32) -> fmt::Result {
    if init_score != 0 {
        write!(f, "{}init/", init_score)?;
    }
    Ok(())
}

#[inline]
pub(crate) fn floor_i64(value: f64) -> i64 {
    value.floor() as i64
}

#[inline]
pub(crate) fn floor_i32(value: f64) -> i32 {
    value.floor() as i32
}
