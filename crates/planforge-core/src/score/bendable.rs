//! BendableScore - multi-level score with a compile-time number of levels

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Neg, Sub};

use super::traits::{floor_i32, floor_i64, split_init_score, write_init_prefix};
use super::traits::{ParseableScore, Score, ScoreParseError};
use super::ScoreLevel;

/// A score with `H` hard levels and `S` soft levels.
///
/// The level counts are const generic parameters, so the score stays `Copy`
/// and allocation free.
///
/// # Examples
///
/// ```
/// use planforge_core::score::{BendableScore, Score};
///
/// let score: BendableScore<2, 3> = BendableScore::of([-1, -2], [-10, -20, -30]);
///
/// assert_eq!(BendableScore::<2, 3>::hard_levels_count(), 2);
/// assert_eq!(score.soft_score(2), -30);
/// assert!(!score.is_feasible());
/// assert_eq!(score.to_string(), "[-1/-2]hard/[-10/-20/-30]soft");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BendableScore<const H: usize, const S: usize> {
    init_score: i32,
    hard: [i64; H],
    soft: [i64; S],
}

impl<const H: usize, const S: usize> BendableScore<H, S> {
    pub const fn of(hard: [i64; H], soft: [i64; S]) -> Self {
        BendableScore {
            init_score: 0,
            hard,
            soft,
        }
    }

    pub const fn of_uninitialized(init_score: i32, hard: [i64; H], soft: [i64; S]) -> Self {
        BendableScore {
            init_score,
            hard,
            soft,
        }
    }

    /// Creates a score with a single non-zero hard level.
    pub fn of_hard(level: usize, value: i64) -> Self {
        let mut hard = [0; H];
        hard[level] = value;
        BendableScore::of(hard, [0; S])
    }

    /// Creates a score with a single non-zero soft level.
    pub fn of_soft(level: usize, value: i64) -> Self {
        let mut soft = [0; S];
        soft[level] = value;
        BendableScore::of([0; H], soft)
    }

    pub const fn soft_levels_count() -> usize {
        S
    }

    pub fn hard_score(&self, level: usize) -> i64 {
        self.hard[level]
    }

    pub fn soft_score(&self, level: usize) -> i64 {
        self.soft[level]
    }

    pub fn hard_scores(&self) -> &[i64; H] {
        &self.hard
    }

    pub fn soft_scores(&self) -> &[i64; S] {
        &self.soft
    }

    fn map(&self, init_score: i32, f: impl Fn(i64) -> i64) -> Self {
        BendableScore {
            init_score,
            hard: self.hard.map(&f),
            soft: self.soft.map(&f),
        }
    }

    fn zip(self, other: Self, init_score: i32, f: impl Fn(i64, i64) -> i64) -> Self {
        let mut result = self;
        result.init_score = init_score;
        for (level, value) in result.hard.iter_mut().zip(other.hard) {
            *level = f(*level, value);
        }
        for (level, value) in result.soft.iter_mut().zip(other.soft) {
            *level = f(*level, value);
        }
        result
    }
}

impl<const H: usize, const S: usize> Default for BendableScore<H, S> {
    fn default() -> Self {
        BendableScore::of([0; H], [0; S])
    }
}

impl<const H: usize, const S: usize> Score for BendableScore<H, S> {
    #[inline]
    fn init_score(&self) -> i32 {
        self.init_score
    }

    #[inline]
    fn with_init_score(&self, init_score: i32) -> Self {
        BendableScore {
            init_score,
            ..*self
        }
    }

    fn is_feasible(&self) -> bool {
        self.init_score >= 0 && self.hard.iter().all(|&level| level >= 0)
    }

    fn zero() -> Self {
        Self::default()
    }

    #[inline]
    fn levels_count() -> usize {
        H + S
    }

    #[inline]
    fn hard_levels_count() -> usize {
        H
    }

    fn to_level_numbers(&self) -> Vec<i64> {
        self.hard.iter().chain(self.soft.iter()).copied().collect()
    }

    fn from_level_numbers(init_score: i32, levels: &[i64]) -> Self {
        assert_eq!(
            levels.len(),
            H + S,
            "BendableScore<{}, {}> requires exactly {} levels",
            H,
            S,
            H + S
        );
        let mut score = BendableScore::<H, S>::default().with_init_score(init_score);
        score.hard.copy_from_slice(&levels[..H]);
        score.soft.copy_from_slice(&levels[H..]);
        score
    }

    fn multiply(&self, multiplicand: f64) -> Self {
        self.map(floor_i32(self.init_score as f64 * multiplicand), |level| {
            floor_i64(level as f64 * multiplicand)
        })
    }

    fn divide(&self, divisor: f64) -> Self {
        self.map(floor_i32(self.init_score as f64 / divisor), |level| {
            floor_i64(level as f64 / divisor)
        })
    }

    fn power(&self, exponent: f64) -> Self {
        self.map(floor_i32((self.init_score as f64).powf(exponent)), |level| {
            floor_i64((level as f64).powf(exponent))
        })
    }

    fn abs(&self) -> Self {
        self.map(self.init_score.abs(), i64::abs)
    }

    fn level_label(index: usize) -> ScoreLevel {
        if index < H {
            ScoreLevel::Hard
        } else if index < H + S {
            ScoreLevel::Soft
        } else {
            panic!("BendableScore has {} levels, got index {}", H + S, index)
        }
    }
}

impl<const H: usize, const S: usize> Ord for BendableScore<H, S> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.init_score
            .cmp(&other.init_score)
            .then_with(|| self.hard.cmp(&other.hard))
            .then_with(|| self.soft.cmp(&other.soft))
    }
}

impl<const H: usize, const S: usize> PartialOrd for BendableScore<H, S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<const H: usize, const S: usize> Add for BendableScore<H, S> {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.zip(other, self.init_score + other.init_score, |a, b| a + b)
    }
}

impl<const H: usize, const S: usize> Sub for BendableScore<H, S> {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self.zip(other, self.init_score - other.init_score, |a, b| a - b)
    }
}

impl<const H: usize, const S: usize> Neg for BendableScore<H, S> {
    type Output = Self;

    fn neg(self) -> Self {
        self.map(-self.init_score, |level| -level)
    }
}

fn join_levels(levels: &[i64]) -> String {
    levels
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join("/")
}

impl<const H: usize, const S: usize> fmt::Debug for BendableScore<H, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BendableScore({}, {:?}, {:?})",
            self.init_score, self.hard, self.soft
        )
    }
}

impl<const H: usize, const S: usize> fmt::Display for BendableScore<H, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_init_prefix(f, self.init_score)?;
        write!(
            f,
            "[{}]hard/[{}]soft",
            join_levels(&self.hard),
            join_levels(&self.soft)
        )
    }
}

fn parse_bracketed<const N: usize>(part: &str, suffix: &str) -> Result<[i64; N], ScoreParseError> {
    let inner = part
        .trim()
        .strip_suffix(suffix)
        .and_then(|p| p.strip_prefix('['))
        .and_then(|p| p.strip_suffix(']'))
        .ok_or_else(|| {
            ScoreParseError::new(format!("Score part '{}' must look like '[..]{}'", part, suffix))
        })?;
    let numbers: Vec<&str> = if inner.trim().is_empty() {
        Vec::new()
    } else {
        inner.split('/').collect()
    };
    if numbers.len() != N {
        return Err(ScoreParseError::new(format!(
            "Expected {} {} levels in '{}', found {}",
            N,
            suffix,
            part,
            numbers.len()
        )));
    }
    let mut levels = [0; N];
    for (level, number) in levels.iter_mut().zip(numbers) {
        *level = number
            .trim()
            .parse::<i64>()
            .map_err(|e| ScoreParseError::new(format!("Invalid level '{}': {}", number, e)))?;
    }
    Ok(levels)
}

impl<const H: usize, const S: usize> ParseableScore for BendableScore<H, S> {
    fn parse(s: &str) -> Result<Self, ScoreParseError> {
        let (init_score, levels) = split_init_score(s)?;
        let Some(split) = levels.find("]hard/") else {
            return Err(ScoreParseError::new(format!(
                "Invalid BendableScore format '{}': expected '[..]hard/[..]soft'",
                s
            )));
        };
        let (hard, soft) = levels.split_at(split + "]hard".len());
        Ok(BendableScore::of_uninitialized(
            init_score,
            parse_bracketed::<H>(hard, "hard")?,
            parse_bracketed::<S>(&soft[1..], "soft")?,
        ))
    }
}
