//! Solver lifecycle tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use planforge_core::score::SimpleScore;
use planforge_test::nqueens::{
    calculate_conflicts, create_nqueens_director, get_queen_row, queen_count, row_values,
    set_queen_row, NQueensDirector, NQueensSolution, QUEEN_DESCRIPTOR_INDEX,
};

use super::*;
use crate::event::StepEndedEvent;
use crate::heuristic::binding::PlanningVariableBinding;
use crate::heuristic::r#move::ChangeMove;
use crate::heuristic::selector::ChangeMoveSelector;
use crate::phase::localsearch::{
    HillClimbingAcceptor, LocalSearchDecider, LocalSearchForager, LocalSearchPhase,
};
use crate::termination::StepCountTermination;

type QueenSolver = Solver<NQueensSolution, NQueensDirector>;

fn hill_climbing_phase(step_limit: Option<u64>) -> Box<dyn Phase<NQueensSolution, NQueensDirector>> {
    let binding = PlanningVariableBinding::new(
        QUEEN_DESCRIPTOR_INDEX,
        "row",
        get_queen_row,
        set_queen_row,
        row_values,
        queen_count,
    );
    let phase: LocalSearchPhase<NQueensSolution, NQueensDirector, _, _, _> =
        LocalSearchPhase::new(LocalSearchDecider::new(
        ChangeMoveSelector::new(binding),
        HillClimbingAcceptor::new(),
        LocalSearchForager::<ChangeMove<NQueensSolution, i64>, _>::highest_score(),
    ));
    match step_limit {
        Some(limit) => Box::new(phase.with_termination(Box::new(StepCountTermination::new(limit)))),
        None => Box::new(phase),
    }
}

#[derive(Debug, Default)]
struct LifecycleRecorder {
    events: Mutex<Vec<String>>,
    best_changes: AtomicUsize,
    steps: AtomicUsize,
}

impl SolverEventListener<NQueensSolution> for LifecycleRecorder {
    fn on_best_solution_changed(&self, solution: &NQueensSolution, score: &SimpleScore) {
        assert_eq!(calculate_conflicts(solution), *score);
        self.best_changes.fetch_add(1, Ordering::SeqCst);
    }

    fn on_solving_started(&self, _solution: &NQueensSolution) {
        self.events.lock().unwrap().push("solving_started".to_string());
    }

    fn on_solving_ended(&self, _solution: &NQueensSolution, is_terminated_early: bool) {
        self.events
            .lock()
            .unwrap()
            .push(format!("solving_ended({is_terminated_early})"));
    }

    fn on_phase_started(&self, phase_index: usize) {
        self.events.lock().unwrap().push(format!("phase_started({phase_index})"));
    }

    fn on_phase_ended(&self, phase_index: usize, _best_score: &SimpleScore) {
        self.events.lock().unwrap().push(format!("phase_ended({phase_index})"));
    }

    fn on_step_ended(&self, _event: &StepEndedEvent<SimpleScore>) {
        self.steps.fetch_add(1, Ordering::SeqCst);
    }
}

/// Stops the solver after its first step.
#[derive(Debug)]
struct StopAfterFirstStep {
    handle: SolverHandle,
}

impl SolverEventListener<NQueensSolution> for StopAfterFirstStep {
    fn on_best_solution_changed(&self, _solution: &NQueensSolution, _score: &SimpleScore) {}

    fn on_step_ended(&self, _event: &StepEndedEvent<SimpleScore>) {
        assert!(self.handle.terminate_early());
    }
}

#[test]
fn test_solve_runs_phases_in_order() {
    let recorder = Arc::new(LifecycleRecorder::default());
    let mut solver: QueenSolver = Solver::new()
        .with_phase(hill_climbing_phase(Some(2)))
        .with_phase(hill_climbing_phase(Some(3)))
        .with_event_listener(recorder.clone());

    let solution = solver.solve(create_nqueens_director(&[0, 0, 0, 0])).unwrap();

    assert_eq!(
        *recorder.events.lock().unwrap(),
        vec![
            "solving_started",
            "phase_started(0)",
            "phase_ended(0)",
            "phase_started(1)",
            "phase_ended(1)",
            "solving_ended(false)",
        ]
    );
    assert_eq!(recorder.steps.load(Ordering::SeqCst), 5);
    assert!(recorder.best_changes.load(Ordering::SeqCst) >= 1);
    assert_eq!(solution.score, Some(calculate_conflicts(&solution)));
    assert!(solution.score > Some(SimpleScore::of(-6)));
    assert!(!solver.is_solving());
}

#[test]
fn test_solver_termination_spans_phases() {
    let recorder = Arc::new(LifecycleRecorder::default());
    let mut solver: QueenSolver = Solver::new()
        .with_phase(hill_climbing_phase(Some(2)))
        .with_phase(hill_climbing_phase(None))
        .with_phase(hill_climbing_phase(None))
        .with_termination(Box::new(StepCountTermination::new(3)))
        .with_event_listener(recorder.clone());

    solver.solve(create_nqueens_director(&[0, 0, 0, 0])).unwrap();

    assert_eq!(recorder.steps.load(Ordering::SeqCst), 3);
    let events = recorder.events.lock().unwrap();
    assert!(events.contains(&"phase_ended(1)".to_string()));
    assert!(!events.contains(&"phase_started(2)".to_string()));
}

#[test]
fn test_terminate_early_stops_before_the_next_step() {
    let recorder = Arc::new(LifecycleRecorder::default());
    let mut solver: QueenSolver = Solver::new()
        .with_phase(hill_climbing_phase(None))
        .with_phase(hill_climbing_phase(None))
        .with_event_listener(recorder.clone());
    let stopper = Arc::new(StopAfterFirstStep {
        handle: solver.handle(),
    });
    solver.add_event_listener(stopper);

    let solution = solver.solve(create_nqueens_director(&[0, 0, 0, 0])).unwrap();

    assert_eq!(recorder.steps.load(Ordering::SeqCst), 1);
    let events = recorder.events.lock().unwrap();
    assert_eq!(events.last().map(String::as_str), Some("solving_ended(true)"));
    assert!(!events.contains(&"phase_started(1)".to_string()));
    assert!(solution.score.is_some());
}

#[test]
fn test_handle_ignores_requests_while_idle() {
    let solver: QueenSolver = Solver::new();
    let handle = solver.handle();

    assert!(!handle.is_solving());
    assert!(!handle.terminate_early());
}

#[test]
fn test_best_solution_holder_sees_the_final_best() {
    let mut solver: QueenSolver = Solver::new().with_phase(hill_climbing_phase(Some(4)));
    let holder = solver.best_solution_holder();
    assert!(holder.get().is_none());

    let solution = solver.solve(create_nqueens_director(&[0, 0, 0, 0])).unwrap();

    let best = holder.get().unwrap();
    assert_eq!(Some(best.score), solution.score);
    assert_eq!(best.solution.rows(), solution.rows());
}

#[test]
fn test_same_seed_gives_the_same_solution() {
    let solve = |seed| {
        let mut solver: QueenSolver = Solver::new()
            .with_random_seed(Some(seed))
            .with_phase(hill_climbing_phase(Some(6)));
        solver.solve(create_nqueens_director(&[0; 6])).unwrap().rows()
    };

    assert_eq!(solve(42), solve(42));
}
