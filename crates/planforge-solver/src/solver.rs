//! Solver implementation.

use std::fmt::{self, Debug};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use planforge_config::EnvironmentMode;
use planforge_core::domain::PlanningSolution;
use planforge_core::error::Result;
use planforge_scoring::ScoreDirector;
use tracing::info;

use crate::event::{SolverEventListener, SolverEventSupport};
use crate::phase::Phase;
use crate::scope::{BestSolutionHolder, SolverScope, YieldThrottle};
use crate::termination::{NoTermination, Termination};

/// The main solver that optimizes planning solutions.
///
/// Runs its phases in order on one working solution. Each phase stops at
/// its own termination; the solver termination and [`SolverHandle::terminate_early`]
/// stop the whole solve.
///
/// # Type Parameters
/// * `S` - Solution type
/// * `D` - Score director type
///
/// # Example
///
/// ```
/// use planforge_solver::heuristic::binding::PlanningVariableBinding;
/// use planforge_solver::heuristic::r#move::ChangeMove;
/// use planforge_solver::heuristic::selector::ChangeMoveSelector;
/// use planforge_solver::phase::localsearch::{
///     HillClimbingAcceptor, LocalSearchDecider, LocalSearchForager, LocalSearchPhase,
/// };
/// use planforge_solver::solver::Solver;
/// use planforge_solver::termination::StepCountTermination;
/// use planforge_test::nqueens::{
///     create_nqueens_director, get_queen_row, queen_count, row_values, set_queen_row,
///     NQueensDirector, NQueensSolution, QUEEN_DESCRIPTOR_INDEX,
/// };
///
/// let binding = PlanningVariableBinding::new(
///     QUEEN_DESCRIPTOR_INDEX,
///     "row",
///     get_queen_row,
///     set_queen_row,
///     row_values,
///     queen_count,
/// );
/// let phase = LocalSearchPhase::new(LocalSearchDecider::new(
///     ChangeMoveSelector::new(binding),
///     HillClimbingAcceptor::new(),
///     LocalSearchForager::<ChangeMove<NQueensSolution, i64>, _>::highest_score(),
/// ));
///
/// let mut solver: Solver<NQueensSolution, NQueensDirector> = Solver::new()
///     .with_phase(Box::new(phase))
///     .with_termination(Box::new(StepCountTermination::new(10)));
/// let solution = solver.solve(create_nqueens_director(&[0, 0, 0, 0])).unwrap();
/// assert!(solution.score.is_some());
/// ```
pub struct Solver<S: PlanningSolution, D: ScoreDirector<S>> {
    phases: Vec<Box<dyn Phase<S, D>>>,
    termination: Box<dyn Termination<S, D>>,
    environment_mode: EnvironmentMode,
    random_seed: Option<u64>,
    listeners: Vec<Arc<dyn SolverEventListener<S>>>,
    best_solution_holder: Arc<BestSolutionHolder<S>>,
    yield_throttle: Option<Arc<YieldThrottle>>,
    terminate_early_flag: Arc<AtomicBool>,
    solving: Arc<AtomicBool>,
}

impl<S: PlanningSolution, D: ScoreDirector<S>> Debug for Solver<S, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Solver")
            .field("phases", &self.phases)
            .field("termination", &self.termination)
            .field("environment_mode", &self.environment_mode)
            .field("random_seed", &self.random_seed)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<S: PlanningSolution, D: ScoreDirector<S>> Default for Solver<S, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: PlanningSolution, D: ScoreDirector<S>> Solver<S, D> {
    /// Creates a reproducible solver without phases or termination.
    pub fn new() -> Self {
        Self {
            phases: Vec::new(),
            termination: Box::new(NoTermination),
            environment_mode: EnvironmentMode::default(),
            random_seed: Some(0),
            listeners: Vec::new(),
            best_solution_holder: Arc::new(BestSolutionHolder::new()),
            yield_throttle: None,
            terminate_early_flag: Arc::new(AtomicBool::new(false)),
            solving: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_phase(mut self, phase: Box<dyn Phase<S, D>>) -> Self {
        self.phases.push(phase);
        self
    }

    pub fn with_termination(mut self, termination: Box<dyn Termination<S, D>>) -> Self {
        self.termination = termination;
        self
    }

    pub fn with_environment_mode(mut self, environment_mode: EnvironmentMode) -> Self {
        self.environment_mode = environment_mode;
        self
    }

    /// Seeds the working random; `None` draws the seed from OS entropy.
    pub fn with_random_seed(mut self, random_seed: Option<u64>) -> Self {
        self.random_seed = random_seed;
        self
    }

    pub fn with_event_listener(mut self, listener: Arc<dyn SolverEventListener<S>>) -> Self {
        self.listeners.push(listener);
        self
    }

    /// Shares CPU time with other solvers holding the same throttle.
    pub fn with_yield_throttle(mut self, throttle: Arc<YieldThrottle>) -> Self {
        self.yield_throttle = Some(throttle);
        self
    }

    pub fn add_event_listener(&mut self, listener: Arc<dyn SolverEventListener<S>>) {
        self.listeners.push(listener);
    }

    pub fn phase_count(&self) -> usize {
        self.phases.len()
    }

    pub fn environment_mode(&self) -> EnvironmentMode {
        self.environment_mode
    }

    /// The best solution so far, readable from other threads while solving.
    pub fn best_solution_holder(&self) -> Arc<BestSolutionHolder<S>> {
        Arc::clone(&self.best_solution_holder)
    }

    /// Returns a handle that other threads use to stop a running solve.
    pub fn handle(&self) -> SolverHandle {
        SolverHandle {
            terminate_early_flag: Arc::clone(&self.terminate_early_flag),
            solving: Arc::clone(&self.solving),
        }
    }

    pub fn is_solving(&self) -> bool {
        self.solving.load(Ordering::SeqCst)
    }

    /// Solves the working solution of `score_director` and returns the best
    /// solution found.
    pub fn solve(&mut self, score_director: D) -> Result<S> {
        self.terminate_early_flag.store(false, Ordering::SeqCst);
        self.solving.store(true, Ordering::SeqCst);

        let mut event_support = SolverEventSupport::new();
        for listener in &self.listeners {
            event_support.add_listener(Arc::clone(listener));
        }
        let mut solver_scope = SolverScope::with_seed(score_director, self.random_seed)
            .with_environment_mode(self.environment_mode)
            .with_best_solution_holder(Arc::clone(&self.best_solution_holder))
            .with_event_support(event_support)
            .with_terminate_early_flag(Arc::clone(&self.terminate_early_flag));
        if let Some(throttle) = &self.yield_throttle {
            solver_scope = solver_scope.with_yield_throttle(Arc::clone(throttle));
        }

        let outcome = self.run_phases(&mut solver_scope);
        self.solving.store(false, Ordering::SeqCst);
        outcome?;
        Ok(solver_scope.take_best_or_working_solution())
    }

    fn run_phases(&mut self, solver_scope: &mut SolverScope<S, D>) -> Result<()> {
        solver_scope.start_solving();
        let starting_score = solver_scope.calculate_score();
        info!(
            event = "solve_start",
            phases = self.phases.len(),
            environment_mode = ?self.environment_mode,
            random_seed = ?self.random_seed,
            score = %starting_score,
        );
        if let Some(best) = solver_scope.best_solution() {
            solver_scope.event_support().fire_solving_started(best);
        }

        for phase in &mut self.phases {
            phase.solving_started(solver_scope)?;
        }
        let termination = &*self.termination;
        for (phase_index, phase) in self.phases.iter_mut().enumerate() {
            if solver_scope.is_terminate_early() || termination.is_solver_terminated(solver_scope) {
                break;
            }
            phase.solve(solver_scope, phase_index, termination)?;
        }
        for phase in &mut self.phases {
            phase.solving_ended();
        }
        solver_scope.end_solving();

        let terminated_early = solver_scope.is_terminate_early();
        let best_score = solver_scope.best_score().copied().unwrap_or(starting_score);
        info!(
            event = "solve_end",
            duration_ms = solver_scope.elapsed().as_millis() as u64,
            steps = solver_scope.total_step_count(),
            calculations = solver_scope.calculation_count(),
            speed = solver_scope.score_calculation_speed(),
            terminated_early,
            score = %best_score,
        );
        if let Some(best) = solver_scope.best_solution() {
            solver_scope
                .event_support()
                .fire_solving_ended(best, terminated_early);
        }
        Ok(())
    }
}

/// Handle for stopping a solver from another thread.
#[derive(Debug, Clone)]
pub struct SolverHandle {
    terminate_early_flag: Arc<AtomicBool>,
    solving: Arc<AtomicBool>,
}

impl SolverHandle {
    /// Requests early termination of the solving process.
    ///
    /// Phases stop before their next step or move evaluation and the best
    /// solution so far is returned. Returns false if the solver is not
    /// solving, in which case nothing happens.
    pub fn terminate_early(&self) -> bool {
        if self.solving.load(Ordering::SeqCst) {
            self.terminate_early_flag.store(true, Ordering::SeqCst);
            true
        } else {
            false
        }
    }

    pub fn is_solving(&self) -> bool {
        self.solving.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests;
