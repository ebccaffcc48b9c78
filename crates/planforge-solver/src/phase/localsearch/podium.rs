//! Finalist podiums.
//!
//! A podium keeps the finalists of a step: the evaluated moves still in
//! contention for winning it. Accepted moves always outrank unaccepted
//! ones; among moves of equal acceptance the podium's comparison decides.

use std::cmp::Ordering;
use std::fmt::Debug;

use planforge_core::score::Score;

use crate::scope::MoveScope;

/// Collects the finalists of a step.
pub trait FinalistPodium<M, Sc: Score>: Send + Debug {
    fn phase_started(&mut self) {}

    /// Resets the finalists. Both scores are those before the step.
    fn step_started(&mut self, last_step_score: Sc, best_score: Sc);

    fn add_move(&mut self, move_scope: MoveScope<M, Sc>);

    fn finalists(&self) -> &[MoveScope<M, Sc>];

    /// Drains the finalists.
    fn take_finalists(&mut self) -> Vec<MoveScope<M, Sc>>;

    fn step_ended(&mut self) {}

    fn phase_ended(&mut self) {}
}

/// Finalist bookkeeping shared by the podiums.
#[derive(Debug)]
struct Finalists<M, Sc> {
    list: Vec<MoveScope<M, Sc>>,
    score: Option<Sc>,
    accepted: bool,
}

impl<M, Sc: Score> Finalists<M, Sc> {
    fn new() -> Self {
        Self {
            list: Vec::new(),
            score: None,
            accepted: false,
        }
    }

    fn clear(&mut self) {
        self.list.clear();
        self.score = None;
        self.accepted = false;
    }

    /// Applies acceptance precedence, then `compare(move, finalist)`:
    /// greater replaces the finalists, equal joins them.
    fn add(&mut self, move_scope: MoveScope<M, Sc>, compare: impl FnOnce(&Sc, &Sc) -> Ordering) {
        if self.accepted && !move_scope.accepted {
            return;
        }
        if move_scope.accepted && !self.accepted {
            self.accepted = true;
            self.score = None;
        }
        let ordering = match &self.score {
            None => Ordering::Greater,
            Some(finalist_score) => compare(&move_scope.score, finalist_score),
        };
        match ordering {
            Ordering::Greater => {
                self.score = Some(move_scope.score);
                self.list.clear();
                self.list.push(move_scope);
            }
            Ordering::Equal => self.list.push(move_scope),
            Ordering::Less => {}
        }
    }
}

/// Keeps the moves with the highest score.
#[derive(Debug)]
pub struct HighestScoreFinalistPodium<M, Sc> {
    finalists: Finalists<M, Sc>,
}

impl<M, Sc: Score> HighestScoreFinalistPodium<M, Sc> {
    pub fn new() -> Self {
        Self {
            finalists: Finalists::new(),
        }
    }
}

impl<M, Sc: Score> Default for HighestScoreFinalistPodium<M, Sc> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M, Sc> FinalistPodium<M, Sc> for HighestScoreFinalistPodium<M, Sc>
where
    M: Send + Debug,
    Sc: Score,
{
    fn step_started(&mut self, _last_step_score: Sc, _best_score: Sc) {
        self.finalists.clear();
    }

    fn add_move(&mut self, move_scope: MoveScope<M, Sc>) {
        self.finalists.add(move_scope, |a, b| a.cmp(b));
    }

    fn finalists(&self) -> &[MoveScope<M, Sc>] {
        &self.finalists.list
    }

    fn take_finalists(&mut self) -> Vec<MoveScope<M, Sc>> {
        std::mem::take(&mut self.finalists.list)
    }

    fn step_ended(&mut self) {
        self.finalists.clear();
    }
}

/// Strategic oscillation: compares scores level by level relative to a
/// reference score.
///
/// At the highest level where exactly one of two scores beats the
/// reference, that score wins, even if it is lower overall. This lets the
/// search accept a worse hard score in exchange for a soft improvement.
///
/// # Examples
///
/// ```
/// use planforge_core::score::HardSoftScore;
/// use planforge_solver::phase::localsearch::{
///     FinalistPodium, StrategicOscillationByLevelFinalistPodium,
/// };
/// use planforge_solver::scope::MoveScope;
///
/// let mut podium = StrategicOscillationByLevelFinalistPodium::<&str, _>::new(false);
/// let reference = HardSoftScore::of(-200, -5000);
/// podium.step_started(reference, reference);
/// podium.add_move(MoveScope::new(0, "a", HardSoftScore::of(-150, -2000), true));
/// podium.add_move(MoveScope::new(1, "b", HardSoftScore::of(-100, -7000), true));
/// podium.add_move(MoveScope::new(2, "c", HardSoftScore::of(-200, -1000), true));
/// assert_eq!(podium.finalists()[0].mv, "b");
/// ```
#[derive(Debug)]
pub struct StrategicOscillationByLevelFinalistPodium<M, Sc> {
    reference_best_score: bool,
    reference_levels: Vec<i64>,
    finalists: Finalists<M, Sc>,
}

impl<M, Sc: Score> StrategicOscillationByLevelFinalistPodium<M, Sc> {
    /// `reference_best_score` selects the best score as reference instead of
    /// the last step score.
    pub fn new(reference_best_score: bool) -> Self {
        Self {
            reference_best_score,
            reference_levels: Vec::new(),
            finalists: Finalists::new(),
        }
    }

    pub fn is_reference_best_score(&self) -> bool {
        self.reference_best_score
    }
}

fn compare_by_level<Sc: Score>(
    reference_levels: &[i64],
    move_score: &Sc,
    finalist_score: &Sc,
) -> Ordering {
    if move_score.init_score() != finalist_score.init_score() {
        return move_score.cmp(finalist_score);
    }
    let move_levels = move_score.to_level_numbers();
    let finalist_levels = finalist_score.to_level_numbers();
    for ((reference, move_level), finalist_level) in
        reference_levels.iter().zip(&move_levels).zip(&finalist_levels)
    {
        let move_is_higher = move_level > reference;
        let finalist_is_higher = finalist_level > reference;
        match (move_is_higher, finalist_is_higher) {
            (true, true) => break,
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            (false, false) => {}
        }
    }
    move_score.cmp(finalist_score)
}

impl<M, Sc> FinalistPodium<M, Sc> for StrategicOscillationByLevelFinalistPodium<M, Sc>
where
    M: Send + Debug,
    Sc: Score,
{
    fn step_started(&mut self, last_step_score: Sc, best_score: Sc) {
        let reference = if self.reference_best_score {
            best_score
        } else {
            last_step_score
        };
        self.reference_levels = reference.to_level_numbers();
        self.finalists.clear();
    }

    fn add_move(&mut self, move_scope: MoveScope<M, Sc>) {
        let reference_levels = &self.reference_levels;
        self.finalists
            .add(move_scope, |a, b| compare_by_level(reference_levels, a, b));
    }

    fn finalists(&self) -> &[MoveScope<M, Sc>] {
        &self.finalists.list
    }

    fn take_finalists(&mut self) -> Vec<MoveScope<M, Sc>> {
        std::mem::take(&mut self.finalists.list)
    }

    fn step_ended(&mut self) {
        self.finalists.clear();
    }
}

impl<M, Sc> FinalistPodium<M, Sc> for Box<dyn FinalistPodium<M, Sc>>
where
    Sc: Score,
{
    fn phase_started(&mut self) {
        (**self).phase_started()
    }

    fn step_started(&mut self, last_step_score: Sc, best_score: Sc) {
        (**self).step_started(last_step_score, best_score)
    }

    fn add_move(&mut self, move_scope: MoveScope<M, Sc>) {
        (**self).add_move(move_scope)
    }

    fn finalists(&self) -> &[MoveScope<M, Sc>] {
        (**self).finalists()
    }

    fn take_finalists(&mut self) -> Vec<MoveScope<M, Sc>> {
        (**self).take_finalists()
    }

    fn step_ended(&mut self) {
        (**self).step_ended()
    }

    fn phase_ended(&mut self) {
        (**self).phase_ended()
    }
}
