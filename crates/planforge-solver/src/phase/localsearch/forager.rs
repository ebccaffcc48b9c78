//! Forager for local search move selection.
//!
//! The forager receives every evaluated move of a step, in move index
//! order, and picks the step's winner.

use std::fmt::{self, Debug};

use planforge_config::PickEarlyType;
use planforge_core::score::Score;
use rand::rngs::StdRng;
use rand::Rng;

use crate::scope::MoveScope;

use super::podium::{FinalistPodium, HighestScoreFinalistPodium};

/// Collects evaluated moves during a step and picks the winner.
///
/// Every evaluated move goes to the podium, accepted or not, so a step
/// without accepted moves still has a winner. The forager quits early once
/// it accepted `accepted_count_limit` moves or its pick early policy fired.
///
/// # Examples
///
/// ```
/// use planforge_config::PickEarlyType;
/// use planforge_core::score::SimpleScore;
/// use planforge_solver::phase::localsearch::LocalSearchForager;
/// use planforge_solver::scope::MoveScope;
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let mut forager = LocalSearchForager::<&str, SimpleScore>::highest_score()
///     .with_pick_early_type(PickEarlyType::FirstLastStepScoreImproving);
/// let mut rng = StdRng::seed_from_u64(0);
///
/// forager.step_started(SimpleScore::of(-10), SimpleScore::of(-5));
/// forager.add_move(MoveScope::new(0, "worse", SimpleScore::of(-12), true), &mut rng);
/// assert!(!forager.is_quit_early());
/// forager.add_move(MoveScope::new(1, "better", SimpleScore::of(-8), true), &mut rng);
/// assert!(forager.is_quit_early());
///
/// let winner = forager.pick_move(&mut rng).unwrap();
/// assert_eq!(winner.mv, "better");
/// ```
pub struct LocalSearchForager<M, Sc: Score> {
    podium: Box<dyn FinalistPodium<M, Sc>>,
    pick_early_type: PickEarlyType,
    pick_early_probability: f64,
    accepted_count_limit: Option<usize>,
    break_tie_randomly: bool,
    last_step_score: Option<Sc>,
    best_score: Option<Sc>,
    selected_move_count: u64,
    accepted_move_count: u64,
    early_picked: Option<MoveScope<M, Sc>>,
}

impl<M, Sc: Score> Debug for LocalSearchForager<M, Sc> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalSearchForager")
            .field("podium", &self.podium)
            .field("pick_early_type", &self.pick_early_type)
            .field("accepted_count_limit", &self.accepted_count_limit)
            .field("break_tie_randomly", &self.break_tie_randomly)
            .field("selected_move_count", &self.selected_move_count)
            .field("accepted_move_count", &self.accepted_move_count)
            .finish()
    }
}

impl<M, Sc> LocalSearchForager<M, Sc>
where
    M: Clone + Send + Debug + 'static,
    Sc: Score,
{
    /// Creates a forager over `podium` that never picks early, has no
    /// accepted count limit and breaks ties randomly.
    pub fn new(podium: Box<dyn FinalistPodium<M, Sc>>) -> Self {
        Self {
            podium,
            pick_early_type: PickEarlyType::Never,
            pick_early_probability: 0.0,
            accepted_count_limit: None,
            break_tie_randomly: true,
            last_step_score: None,
            best_score: None,
            selected_move_count: 0,
            accepted_move_count: 0,
            early_picked: None,
        }
    }

    /// Creates a forager over a [`HighestScoreFinalistPodium`].
    pub fn highest_score() -> Self {
        Self::new(Box::new(HighestScoreFinalistPodium::new()))
    }

    pub fn with_pick_early_type(mut self, pick_early_type: PickEarlyType) -> Self {
        self.pick_early_type = pick_early_type;
        self
    }

    /// Probability for `FirstRandomAcceptedWithProbability`.
    pub fn with_pick_early_probability(mut self, probability: f64) -> Self {
        self.pick_early_probability = probability;
        self
    }

    pub fn with_accepted_count_limit(mut self, limit: usize) -> Self {
        self.accepted_count_limit = Some(limit);
        self
    }

    pub fn with_break_tie_randomly(mut self, break_tie_randomly: bool) -> Self {
        self.break_tie_randomly = break_tie_randomly;
        self
    }

    /// Whether the forager ever ends a step on its own, which a
    /// never-ending move selector requires.
    pub fn supports_never_ending_move_selector(&self) -> bool {
        self.accepted_count_limit.is_some() || self.pick_early_type != PickEarlyType::Never
    }

    pub fn phase_started(&mut self) {
        self.podium.phase_started();
    }

    /// Resets the step state. Both scores are those before the step.
    pub fn step_started(&mut self, last_step_score: Sc, best_score: Sc) {
        self.last_step_score = Some(last_step_score);
        self.best_score = Some(best_score);
        self.selected_move_count = 0;
        self.accepted_move_count = 0;
        self.early_picked = None;
        self.podium.step_started(last_step_score, best_score);
    }

    /// Counts a move that was selected but not doable.
    pub fn add_undoable_move(&mut self) {
        self.selected_move_count += 1;
    }

    /// Adds an evaluated move.
    pub fn add_move(&mut self, move_scope: MoveScope<M, Sc>, rng: &mut StdRng) {
        self.selected_move_count += 1;
        if move_scope.accepted {
            self.accepted_move_count += 1;
            if self.early_picked.is_none() && self.is_pick_early(&move_scope, rng) {
                self.early_picked = Some(move_scope.clone());
            }
        }
        self.podium.add_move(move_scope);
    }

    fn is_pick_early(&self, move_scope: &MoveScope<M, Sc>, rng: &mut StdRng) -> bool {
        match self.pick_early_type {
            PickEarlyType::Never => false,
            PickEarlyType::FirstBestScoreImproving => self
                .best_score
                .map_or(true, |best| move_scope.score > best),
            PickEarlyType::FirstLastStepScoreImproving => self
                .last_step_score
                .map_or(true, |last| move_scope.score > last),
            PickEarlyType::FirstRandomAcceptedWithProbability => {
                rng.random::<f64>() < self.pick_early_probability
            }
        }
    }

    /// Returns true once no further moves need to be evaluated this step.
    pub fn is_quit_early(&self) -> bool {
        self.early_picked.is_some()
            || self
                .accepted_count_limit
                .is_some_and(|limit| self.accepted_move_count >= limit as u64)
    }

    /// Picks the step winner, draining the finalists.
    ///
    /// Returns `None` if no move was evaluated. Ties are broken with `rng`
    /// when tie breaking is random, otherwise the first finalist wins.
    pub fn pick_move(&mut self, rng: &mut StdRng) -> Option<MoveScope<M, Sc>> {
        if let Some(picked) = self.early_picked.take() {
            self.podium.take_finalists();
            return Some(picked);
        }
        let mut finalists = self.podium.take_finalists();
        match finalists.len() {
            0 => None,
            1 => finalists.pop(),
            _ if !self.break_tie_randomly => Some(finalists.swap_remove(0)),
            len => {
                let index = rng.random_range(0..len);
                Some(finalists.swap_remove(index))
            }
        }
    }

    /// Returns up to `n` finalists without changing any state.
    pub fn top_list(&self, n: usize) -> &[MoveScope<M, Sc>] {
        let finalists = self.podium.finalists();
        &finalists[..n.min(finalists.len())]
    }

    pub fn selected_move_count(&self) -> u64 {
        self.selected_move_count
    }

    pub fn accepted_move_count(&self) -> u64 {
        self.accepted_move_count
    }

    pub fn step_ended(&mut self) {
        self.early_picked = None;
        self.podium.step_ended();
    }

    pub fn phase_ended(&mut self) {
        self.podium.phase_ended();
    }
}
