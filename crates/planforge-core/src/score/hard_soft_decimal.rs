//! HardSoftDecimalScore - Two-level fixed-point score
//!
//! Levels are stored as `i64` scaled by 100000, giving 5 decimal places
//! without heap allocation.

use std::fmt;

use super::traits::{floor_i32, split_init_score, write_init_prefix};
use super::traits::{ParseableScore, Score, ScoreParseError};
use super::ScoreLevel;

/// Scale factor for 5 decimal places of precision.
const SCALE: i64 = 100_000;

/// A hard/soft score with 5 decimal places of precision.
///
/// Use [`of`](Self::of) for whole numbers or [`of_scaled`](Self::of_scaled)
/// for pre-scaled values.
///
/// # Examples
///
/// ```
/// use planforge_core::{HardSoftDecimalScore, Score};
///
/// let score = HardSoftDecimalScore::of(-1, -100);
/// assert_eq!(score.hard_scaled(), -100000);
///
/// // -30.5 hard
/// let partial = HardSoftDecimalScore::of_scaled(-3050000, 0);
/// assert!(!partial.is_feasible());
///
/// let score = HardSoftDecimalScore::of_scaled(-150000, -250000);
/// assert_eq!(format!("{}", score), "-1.5hard/-2.5soft");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HardSoftDecimalScore {
    init_score: i32,
    hard: i64,
    soft: i64,
}

impl HardSoftDecimalScore {
    pub const ZERO: HardSoftDecimalScore = HardSoftDecimalScore::of_scaled(0, 0);
    pub const ONE_HARD: HardSoftDecimalScore = HardSoftDecimalScore::of_scaled(SCALE, 0);
    pub const ONE_SOFT: HardSoftDecimalScore = HardSoftDecimalScore::of_scaled(0, SCALE);

    /// Creates a new score from whole numbers, multiplied by 100000.
    #[inline]
    pub const fn of(hard: i64, soft: i64) -> Self {
        HardSoftDecimalScore::of_scaled(hard * SCALE, soft * SCALE)
    }

    /// Creates a new score from pre-scaled values.
    #[inline]
    pub const fn of_scaled(hard: i64, soft: i64) -> Self {
        HardSoftDecimalScore {
            init_score: 0,
            hard,
            soft,
        }
    }

    #[inline]
    pub const fn of_uninitialized_scaled(init_score: i32, hard: i64, soft: i64) -> Self {
        HardSoftDecimalScore {
            init_score,
            hard,
            soft,
        }
    }

    #[inline]
    pub const fn hard_scaled(&self) -> i64 {
        self.hard
    }

    #[inline]
    pub const fn soft_scaled(&self) -> i64 {
        self.soft
    }

    pub fn hard(&self) -> f64 {
        self.hard as f64 / SCALE as f64
    }

    pub fn soft(&self) -> f64 {
        self.soft as f64 / SCALE as f64
    }

    fn map_levels(&self, init_score: i32, f: impl Fn(i64) -> i64) -> Self {
        HardSoftDecimalScore::of_uninitialized_scaled(init_score, f(self.hard), f(self.soft))
    }
}

impl Score for HardSoftDecimalScore {
    #[inline]
    fn init_score(&self) -> i32 {
        self.init_score
    }

    #[inline]
    fn with_init_score(&self, init_score: i32) -> Self {
        HardSoftDecimalScore {
            init_score,
            ..*self
        }
    }

    #[inline]
    fn is_feasible(&self) -> bool {
        self.init_score >= 0 && self.hard >= 0
    }

    #[inline]
    fn zero() -> Self {
        HardSoftDecimalScore::ZERO
    }

    #[inline]
    fn levels_count() -> usize {
        2
    }

    #[inline]
    fn hard_levels_count() -> usize {
        1
    }

    fn to_level_numbers(&self) -> Vec<i64> {
        vec![self.hard, self.soft]
    }

    fn from_level_numbers(init_score: i32, levels: &[i64]) -> Self {
        assert_eq!(
            levels.len(),
            2,
            "HardSoftDecimalScore requires exactly 2 levels"
        );
        HardSoftDecimalScore::of_uninitialized_scaled(init_score, levels[0], levels[1])
    }

    fn to_level_doubles(&self) -> Vec<f64> {
        vec![self.hard(), self.soft()]
    }

    fn multiply(&self, multiplicand: f64) -> Self {
        self.map_levels(floor_i32(self.init_score as f64 * multiplicand), |level| {
            (level as f64 * multiplicand).floor() as i64
        })
    }

    fn divide(&self, divisor: f64) -> Self {
        self.map_levels(floor_i32(self.init_score as f64 / divisor), |level| {
            (level as f64 / divisor).floor() as i64
        })
    }

    fn power(&self, exponent: f64) -> Self {
        // Exponentiate the unscaled value, then rescale.
        self.map_levels(
            floor_i32((self.init_score as f64).powf(exponent)),
            |level| {
                let value = (level as f64 / SCALE as f64).powf(exponent);
                (value * SCALE as f64).floor() as i64
            },
        )
    }

    fn abs(&self) -> Self {
        self.map_levels(self.init_score.abs(), i64::abs)
    }

    fn level_label(index: usize) -> ScoreLevel {
        match index {
            0 => ScoreLevel::Hard,
            1 => ScoreLevel::Soft,
            _ => panic!("HardSoftDecimalScore has 2 levels, got index {}", index),
        }
    }
}

impl_score_ops!(HardSoftDecimalScore { hard, soft });

fn format_scaled(scaled: i64) -> String {
    if scaled % SCALE == 0 {
        return (scaled / SCALE).to_string();
    }
    let sign = if scaled < 0 { "-" } else { "" };
    let magnitude = scaled.unsigned_abs();
    let whole = magnitude / SCALE as u64;
    let fraction = format!("{:05}", magnitude % SCALE as u64);
    format!("{}{}.{}", sign, whole, fraction.trim_end_matches('0'))
}

fn parse_scaled(part: &str, suffix: &str) -> Result<i64, ScoreParseError> {
    let number = part.trim().strip_suffix(suffix).ok_or_else(|| {
        ScoreParseError::new(format!("Score part '{}' must end with '{}'", part, suffix))
    })?;
    let value = number
        .parse::<f64>()
        .map_err(|e| ScoreParseError::new(format!("Invalid {} score '{}': {}", suffix, number, e)))?;
    Ok((value * SCALE as f64).round() as i64)
}

impl fmt::Debug for HardSoftDecimalScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HardSoftDecimalScore({}, {}, {})",
            self.init_score,
            format_scaled(self.hard),
            format_scaled(self.soft)
        )
    }
}

impl fmt::Display for HardSoftDecimalScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_init_prefix(f, self.init_score)?;
        write!(
            f,
            "{}hard/{}soft",
            format_scaled(self.hard),
            format_scaled(self.soft)
        )
    }
}

impl ParseableScore for HardSoftDecimalScore {
    fn parse(s: &str) -> Result<Self, ScoreParseError> {
        let (init_score, levels) = split_init_score(s)?;
        let Some((hard, soft)) = levels.split_once('/') else {
            return Err(ScoreParseError::new(format!(
                "Invalid HardSoftDecimalScore format '{}': expected 'Xhard/Ysoft'",
                s
            )));
        };
        Ok(HardSoftDecimalScore::of_uninitialized_scaled(
            init_score,
            parse_scaled(hard, "hard")?,
            parse_scaled(soft, "soft")?,
        ))
    }
}
