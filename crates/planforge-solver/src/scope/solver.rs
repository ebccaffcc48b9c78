//! Solver-level scope.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use planforge_config::EnvironmentMode;
use planforge_core::domain::PlanningSolution;
use planforge_scoring::ScoreDirector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use crate::event::SolverEventSupport;

use super::best::{BestSolution, BestSolutionHolder};
use super::throttle::YieldThrottle;

/// Top-level scope for the entire solving process.
///
/// Owns the working score director. The best solution is an independent
/// clone, never aliased with the working solution, and is published through
/// a [`BestSolutionHolder`] for readers on other threads.
pub struct SolverScope<S: PlanningSolution, D: ScoreDirector<S>> {
    score_director: D,
    environment_mode: EnvironmentMode,
    working_random: StdRng,
    best_solution: Option<Arc<S>>,
    best_score: Option<S::Score>,
    best_solution_time_spent: Option<Duration>,
    best_solution_step_index: Option<u64>,
    starting_score: Option<S::Score>,
    best_solution_holder: Arc<BestSolutionHolder<S>>,
    event_support: SolverEventSupport<S>,
    start_time: Option<Instant>,
    end_time: Option<Instant>,
    total_step_count: u64,
    move_thread_calculation_count: u64,
    terminate_early_flag: Arc<AtomicBool>,
    yield_throttle: Option<Arc<YieldThrottle>>,
}

impl<S: PlanningSolution, D: ScoreDirector<S>> SolverScope<S, D> {
    /// Creates a reproducible scope seeded with 0.
    pub fn new(score_director: D) -> Self {
        Self::with_seed(score_director, Some(0))
    }

    /// Creates a scope whose working random is seeded with `seed`, or from
    /// OS entropy when `seed` is `None`.
    pub fn with_seed(score_director: D, seed: Option<u64>) -> Self {
        let working_random = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            score_director,
            environment_mode: EnvironmentMode::default(),
            working_random,
            best_solution: None,
            best_score: None,
            best_solution_time_spent: None,
            best_solution_step_index: None,
            starting_score: None,
            best_solution_holder: Arc::new(BestSolutionHolder::new()),
            event_support: SolverEventSupport::new(),
            start_time: None,
            end_time: None,
            total_step_count: 0,
            move_thread_calculation_count: 0,
            terminate_early_flag: Arc::new(AtomicBool::new(false)),
            yield_throttle: None,
        }
    }

    pub fn with_environment_mode(mut self, environment_mode: EnvironmentMode) -> Self {
        self.environment_mode = environment_mode;
        self
    }

    pub fn with_best_solution_holder(mut self, holder: Arc<BestSolutionHolder<S>>) -> Self {
        self.best_solution_holder = holder;
        self
    }

    pub fn with_event_support(mut self, event_support: SolverEventSupport<S>) -> Self {
        self.event_support = event_support;
        self
    }

    pub fn with_terminate_early_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.terminate_early_flag = flag;
        self
    }

    pub fn with_yield_throttle(mut self, throttle: Arc<YieldThrottle>) -> Self {
        self.yield_throttle = Some(throttle);
        self
    }

    /// Starts the clock, scores the working solution and records it as the
    /// first best solution.
    pub fn start_solving(&mut self) {
        self.start_time = Some(Instant::now());
        self.end_time = None;
        self.total_step_count = 0;
        self.move_thread_calculation_count = 0;
        self.best_solution_step_index = None;
        let score = self.score_director.calculate_score();
        self.starting_score = Some(score);
        self.set_best_solution(self.score_director.clone_working_solution(), score);
    }

    pub fn end_solving(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Time since `start_solving`, frozen once solving ended.
    pub fn elapsed(&self) -> Duration {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => end.duration_since(start),
            (Some(start), None) => start.elapsed(),
            _ => Duration::ZERO,
        }
    }

    pub fn environment_mode(&self) -> EnvironmentMode {
        self.environment_mode
    }

    pub fn score_director(&self) -> &D {
        &self.score_director
    }

    pub fn score_director_mut(&mut self) -> &mut D {
        &mut self.score_director
    }

    pub fn working_solution(&self) -> &S {
        self.score_director.working_solution()
    }

    pub fn calculate_score(&mut self) -> S::Score {
        self.score_director.calculate_score()
    }

    pub fn starting_score(&self) -> Option<&S::Score> {
        self.starting_score.as_ref()
    }

    pub fn best_solution(&self) -> Option<&S> {
        self.best_solution.as_deref()
    }

    pub fn best_score(&self) -> Option<&S::Score> {
        self.best_score.as_ref()
    }

    pub fn best_solution_time_spent(&self) -> Option<Duration> {
        self.best_solution_time_spent
    }

    /// The total step index at which the best solution was last improved.
    pub fn best_solution_step_index(&self) -> Option<u64> {
        self.best_solution_step_index
    }

    pub fn best_solution_holder(&self) -> &Arc<BestSolutionHolder<S>> {
        &self.best_solution_holder
    }

    pub fn event_support(&self) -> &SolverEventSupport<S> {
        &self.event_support
    }

    /// Stores a clone of the working solution as the new best solution if
    /// its score beats the best score. Returns true if it did.
    pub fn update_best_solution(&mut self) -> bool {
        let score = self.score_director.calculate_score();
        let improved = self.best_score.map_or(true, |best| score > best);
        if improved {
            trace!(
                event = "new_best_solution",
                score = %score,
                step = self.total_step_count,
            );
            self.best_solution_step_index = Some(self.total_step_count);
            self.set_best_solution(self.score_director.clone_working_solution(), score);
            if let Some(best) = self.best_solution.as_deref() {
                self.event_support.fire_best_solution_changed(best, &score);
            }
        }
        improved
    }

    /// Replaces the best solution unconditionally.
    pub fn set_best_solution(&mut self, mut solution: S, score: S::Score) {
        solution.set_score(Some(score));
        let solution = Arc::new(solution);
        let time_spent = self.elapsed();
        self.best_solution = Some(Arc::clone(&solution));
        self.best_score = Some(score);
        self.best_solution_time_spent = Some(time_spent);
        self.best_solution_holder.publish(BestSolution {
            solution,
            score,
            time_spent,
        });
    }

    pub fn working_random(&mut self) -> &mut StdRng {
        &mut self.working_random
    }

    /// Draws a seed for a component that owns its own random generator.
    pub fn next_seed(&mut self) -> u64 {
        self.working_random.random()
    }

    pub fn increment_step_count(&mut self) -> u64 {
        self.total_step_count += 1;
        self.total_step_count
    }

    pub fn total_step_count(&self) -> u64 {
        self.total_step_count
    }

    /// Steps since the best solution last improved.
    pub fn unimproved_step_count(&self) -> u64 {
        self.total_step_count
            .saturating_sub(self.best_solution_step_index.map_or(0, |index| index + 1))
    }

    /// Score calculations of the solver thread and of finished move threads.
    pub fn calculation_count(&self) -> u64 {
        self.score_director.calculation_count() + self.move_thread_calculation_count
    }

    pub fn add_move_thread_calculation_count(&mut self, count: u64) {
        self.move_thread_calculation_count += count;
    }

    /// Score calculations per second.
    pub fn score_calculation_speed(&self) -> u64 {
        let millis = self.elapsed().as_millis().max(1) as u64;
        self.calculation_count().saturating_mul(1000) / millis
    }

    /// Returns a handle that stops the solver when set.
    pub fn terminate_early_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.terminate_early_flag)
    }

    pub fn terminate_early(&self) {
        self.terminate_early_flag.store(true, Ordering::SeqCst);
    }

    pub fn is_terminate_early(&self) -> bool {
        self.terminate_early_flag.load(Ordering::SeqCst)
    }

    /// Gives other throttled solvers a turn on the CPU.
    pub fn check_yielding(&self) {
        if let Some(throttle) = &self.yield_throttle {
            throttle.check_yielding();
        }
    }

    pub fn yield_throttle(&self) -> Option<&Arc<YieldThrottle>> {
        self.yield_throttle.as_ref()
    }

    /// Consumes the scope, returning the best solution, or the working
    /// solution if solving never started.
    pub fn take_best_or_working_solution(self) -> S {
        match self.best_solution {
            Some(best) => Arc::try_unwrap(best).unwrap_or_else(|shared| (*shared).clone()),
            None => self.score_director.clone_working_solution(),
        }
    }
}
