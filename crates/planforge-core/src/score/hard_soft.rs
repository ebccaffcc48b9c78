//! HardSoftScore - Two-level score with hard and soft constraints

use std::fmt;

use super::traits::Score;
use super::ScoreLevel;

/// A score with separate hard and soft constraint levels.
///
/// Hard constraints must be satisfied for a solution to be feasible.
/// Soft constraints are optimization objectives.
///
/// When comparing scores:
/// 1. Init scores are compared first
/// 2. Then hard scores
/// 3. Soft scores are only compared when everything else is equal
///
/// # Examples
///
/// ```
/// use planforge_core::HardSoftScore;
///
/// let score1 = HardSoftScore::of(-1, -100);  // 1 hard constraint broken
/// let score2 = HardSoftScore::of(0, -200);   // Feasible but poor soft score
///
/// // Feasible solutions are always better than infeasible ones
/// assert!(score2 > score1);
///
/// // An uninitialized solution loses against any initialized one
/// let partial = HardSoftScore::of_uninitialized(-1, 0, 0);
/// assert!(score1 > partial);
/// assert_eq!(partial.to_string(), "-1init/0hard/0soft");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HardSoftScore {
    init_score: i32,
    hard: i64,
    soft: i64,
}

impl HardSoftScore {
    /// The zero score.
    pub const ZERO: HardSoftScore = HardSoftScore::of(0, 0);

    /// One hard constraint penalty.
    pub const ONE_HARD: HardSoftScore = HardSoftScore::of(1, 0);

    /// One soft constraint penalty.
    pub const ONE_SOFT: HardSoftScore = HardSoftScore::of(0, 1);

    #[inline]
    pub const fn of(hard: i64, soft: i64) -> Self {
        HardSoftScore {
            init_score: 0,
            hard,
            soft,
        }
    }

    #[inline]
    pub const fn of_uninitialized(init_score: i32, hard: i64, soft: i64) -> Self {
        HardSoftScore {
            init_score,
            hard,
            soft,
        }
    }

    /// Creates a score with only a hard component.
    #[inline]
    pub const fn of_hard(hard: i64) -> Self {
        HardSoftScore::of(hard, 0)
    }

    /// Creates a score with only a soft component.
    #[inline]
    pub const fn of_soft(soft: i64) -> Self {
        HardSoftScore::of(0, soft)
    }

    #[inline]
    pub const fn hard(&self) -> i64 {
        self.hard
    }

    #[inline]
    pub const fn soft(&self) -> i64 {
        self.soft
    }
}

impl Score for HardSoftScore {
    #[inline]
    fn is_feasible(&self) -> bool {
        self.init_score >= 0 && self.hard >= 0
    }

    #[inline]
    fn zero() -> Self {
        HardSoftScore::ZERO
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
        assert_eq!(levels.len(), 2, "HardSoftScore requires exactly 2 levels");
        HardSoftScore::of_uninitialized(init_score, levels[0], levels[1])
    }

    impl_score_scale!(HardSoftScore { hard, soft });

    fn level_label(index: usize) -> ScoreLevel {
        match index {
            0 => ScoreLevel::Hard,
            1 => ScoreLevel::Soft,
            _ => panic!("HardSoftScore has 2 levels, got index {}", index),
        }
    }
}

impl_score_ops!(HardSoftScore { hard, soft });

impl fmt::Debug for HardSoftScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HardSoftScore({}, {}, {})",
            self.init_score, self.hard, self.soft
        )
    }
}

impl_score_parse!(HardSoftScore { hard => "hard", soft => "soft" });
