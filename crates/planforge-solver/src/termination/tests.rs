//! Tests for termination conditions.

use std::time::Duration;

use planforge_core::score::{HardSoftScore, SimpleScore};
use planforge_scoring::ScoreDirector;
use planforge_test::nqueens::{
    create_nqueens_director, set_queen_row, NQueensDirector, NQueensSolution,
};
use planforge_test::task::TaskSolution;

use super::*;
use crate::scope::{PhaseScope, SolverScope, StepScope};

type NQueensTermination = Box<dyn Termination<NQueensSolution, NQueensDirector>>;

fn started_scope(rows: &[i64]) -> SolverScope<NQueensSolution, NQueensDirector> {
    let mut scope = SolverScope::new(create_nqueens_director(rows));
    scope.start_solving();
    scope
}

fn complete_steps(phase_scope: &mut PhaseScope<'_, NQueensSolution, NQueensDirector>, n: u64) {
    for _ in 0..n {
        StepScope::new(phase_scope).complete();
    }
}

fn assert_gradient(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected gradient {expected}, got {actual}"
    );
}

fn simple_gradient(start: i64, limit: i64, best: i64) -> f64 {
    BestScoreTermination::new(SimpleScore::of(limit))
        .time_gradient(&SimpleScore::of(start), &SimpleScore::of(best))
}

fn hard_soft_gradient(start: (i64, i64), limit: (i64, i64), best: (i64, i64)) -> f64 {
    BestScoreTermination::new(HardSoftScore::of(limit.0, limit.1)).time_gradient(
        &HardSoftScore::of(start.0, start.1),
        &HardSoftScore::of(best.0, best.1),
    )
}

#[test]
fn test_step_count_termination_at_both_levels() {
    let mut scope = started_scope(&[0, 1, 2, 3]);
    let term = StepCountTermination::new(3);
    {
        let mut phase_scope = PhaseScope::new(&mut scope, 0);
        complete_steps(&mut phase_scope, 2);
    }
    let mut phase_scope = PhaseScope::new(&mut scope, 1);
    complete_steps(&mut phase_scope, 1);

    assert!(Termination::<_, NQueensDirector>::is_solver_terminated(
        &term,
        phase_scope.solver_scope()
    ));
    assert!(!term.is_phase_terminated(&phase_scope));
    assert_gradient(term.calculate_phase_time_gradient(&phase_scope), 1.0 / 3.0);
    assert_gradient(
        Termination::<_, NQueensDirector>::calculate_solver_time_gradient(
            &term,
            phase_scope.solver_scope(),
        ),
        1.0,
    );
}

#[test]
fn test_unimproved_step_count_termination() {
    let mut scope = started_scope(&[0, 0, 0, 0]);
    let term = UnimprovedStepCountTermination::new(2);
    let mut phase_scope = PhaseScope::new(&mut scope, 0);

    complete_steps(&mut phase_scope, 1);
    assert!(!term.is_phase_terminated(&phase_scope));
    assert_gradient(term.calculate_phase_time_gradient(&phase_scope), 0.5);

    let mut step_scope = StepScope::new(&mut phase_scope);
    {
        let director = step_scope.score_director_mut();
        director.before_variable_changed(0, 0, "row");
        set_queen_row(director.working_solution_mut(), 0, Some(1));
        director.after_variable_changed(0, 0, "row");
    }
    let score = step_scope.calculate_score();
    step_scope.set_step_score(score);
    step_scope.update_best_solution();
    step_scope.complete();
    assert!(!term.is_phase_terminated(&phase_scope));
    assert_gradient(term.calculate_phase_time_gradient(&phase_scope), 0.0);

    complete_steps(&mut phase_scope, 1);
    assert_gradient(term.calculate_phase_time_gradient(&phase_scope), 0.5);
    complete_steps(&mut phase_scope, 1);
    assert!(term.is_phase_terminated(&phase_scope));
    assert_gradient(term.calculate_phase_time_gradient(&phase_scope), 1.0);
    assert_gradient(
        Termination::<_, NQueensDirector>::calculate_solver_time_gradient(
            &term,
            phase_scope.solver_scope(),
        ),
        1.0,
    );
}

#[test]
fn test_time_termination() {
    let scope = started_scope(&[0, 1]);
    let zero = TimeTermination::new(Duration::ZERO);
    let long = TimeTermination::seconds(3600);

    assert!(Termination::<_, NQueensDirector>::is_solver_terminated(&zero, &scope));
    assert!(!Termination::<_, NQueensDirector>::is_solver_terminated(&long, &scope));
    let gradient = Termination::<_, NQueensDirector>::calculate_solver_time_gradient(&long, &scope);
    assert!((0.0..0.01).contains(&gradient));
}

#[test]
fn test_best_score_termination_on_scope() {
    let mut scope = started_scope(&[0, 0, 0, 0]);
    let reached = BestScoreTermination::new(SimpleScore::of(-6));
    let unreached = BestScoreTermination::new(SimpleScore::of(0));

    assert!(Termination::<_, NQueensDirector>::is_solver_terminated(&reached, &scope));
    assert!(!Termination::<_, NQueensDirector>::is_solver_terminated(&unreached, &scope));

    let phase_scope = PhaseScope::new(&mut scope, 0);
    assert!(!unreached.is_phase_terminated(&phase_scope));
    assert_eq!(unreached.calculate_phase_time_gradient(&phase_scope), 0.0);
}

#[test]
fn test_best_score_termination_ignores_uninitialized_scores() {
    let term = BestScoreTermination::new(SimpleScore::of(-10));
    let best = SimpleScore::of_uninitialized(-1, 0);
    assert_eq!(term.time_gradient(&SimpleScore::of(-20), &best), 0.0);
}

#[test]
fn test_best_score_gradient_simple() {
    assert_gradient(simple_gradient(-1100, -1000, -1100), 0.0);
    assert_gradient(simple_gradient(-1100, -1000, -1040), 0.6);
    assert_gradient(simple_gradient(-1100, -1000, -1000), 1.0);
    assert_gradient(simple_gradient(-1100, -1000, -900), 1.0);
    assert_gradient(simple_gradient(0, 10, 6), 0.6);
    assert_gradient(simple_gradient(-10, 30, 0), 0.25);
    assert_gradient(simple_gradient(10, 40, 20), 1.0 / 3.0);
}

#[test]
fn test_best_score_gradient_hard_soft() {
    let start = (-20, -400);
    let limit = (-10, -300);
    assert_gradient(hard_soft_gradient(start, limit, (-20, -400)), 0.0);
    assert_gradient(hard_soft_gradient(start, limit, (-14, -340)), 0.6);
    assert_gradient(hard_soft_gradient(start, limit, (-10, -400)), 0.75);
    assert_gradient(hard_soft_gradient(start, limit, (-20, -300)), 0.25);
    assert_gradient(hard_soft_gradient(start, limit, (-10, -300)), 1.0);
    assert_gradient(hard_soft_gradient(start, limit, (-10, -900)), 0.75);
    assert_gradient(hard_soft_gradient(start, limit, (-90, -300)), 0.0);
}

#[test]
fn test_best_score_gradient_without_hard_delta() {
    let start = (-10, -400);
    let limit = (-10, -300);
    assert_gradient(hard_soft_gradient(start, limit, (-10, -340)), 0.75 + 0.6 * 0.25);
    assert_gradient(hard_soft_gradient(start, limit, (-20, -340)), 0.0);
    assert_gradient(hard_soft_gradient(start, limit, (0, -340)), 1.0);
}

#[test]
fn test_best_score_gradient_without_soft_delta() {
    let start = (-20, -300);
    let limit = (-10, -300);
    assert_gradient(hard_soft_gradient(start, limit, (-14, -300)), 0.6 * 0.75 + 0.25);
    assert_gradient(hard_soft_gradient(start, limit, (-14, -400)), 0.6 * 0.75);
    assert_gradient(hard_soft_gradient(start, limit, (-14, 0)), 0.6 * 0.75 + 0.25);
}

#[test]
fn test_best_score_feasible_gradient() {
    let start = HardSoftScore::of(-20, -400);
    let gradient = |best| BestScoreFeasibleTermination::<TaskSolution>::time_gradient(&start, &best);

    assert_gradient(gradient(HardSoftScore::of(-20, -100)), 0.0);
    assert_gradient(gradient(HardSoftScore::of(-5, -900)), 0.75);
    assert_gradient(gradient(HardSoftScore::of(0, -900)), 1.0);
}

#[test]
fn test_or_termination_takes_any_and_max_gradient() {
    let mut scope = started_scope(&[0, 1, 2, 3]);
    let mut phase_scope = PhaseScope::new(&mut scope, 0);
    complete_steps(&mut phase_scope, 2);

    let term = OrTermination((StepCountTermination::new(4), StepCountTermination::new(2)));
    assert!(term.is_phase_terminated(&phase_scope));
    assert_gradient(term.calculate_phase_time_gradient(&phase_scope), 1.0);

    let term = OrTermination((StepCountTermination::new(4), StepCountTermination::new(8)));
    assert!(!term.is_phase_terminated(&phase_scope));
    assert_gradient(term.calculate_phase_time_gradient(&phase_scope), 0.5);
}

#[test]
fn test_and_termination_takes_all_and_min_gradient() {
    let mut scope = started_scope(&[0, 1, 2, 3]);
    let mut phase_scope = PhaseScope::new(&mut scope, 0);
    complete_steps(&mut phase_scope, 2);

    let term = AndTermination((StepCountTermination::new(2), StepCountTermination::new(4)));
    assert!(!term.is_phase_terminated(&phase_scope));
    assert_gradient(term.calculate_phase_time_gradient(&phase_scope), 0.5);

    let term = AndTermination((StepCountTermination::new(1), StepCountTermination::new(2)));
    assert!(term.is_phase_terminated(&phase_scope));
}

#[test]
fn test_boxed_termination_lists() {
    let mut scope = started_scope(&[0, 1, 2, 3]);
    let mut phase_scope = PhaseScope::new(&mut scope, 0);
    complete_steps(&mut phase_scope, 3);

    let any: Vec<NQueensTermination> = vec![
        Box::new(TimeTermination::seconds(3600)),
        Box::new(StepCountTermination::new(3)),
    ];
    let any = OrTermination(any);
    assert!(any.is_phase_terminated(&phase_scope));
    assert!(any.is_solver_terminated(phase_scope.solver_scope()));

    let all: Vec<NQueensTermination> = vec![
        Box::new(TimeTermination::seconds(3600)),
        Box::new(StepCountTermination::new(3)),
    ];
    let all = AndTermination(all);
    assert!(!all.is_phase_terminated(&phase_scope));

    let empty = AndTermination(Vec::<NQueensTermination>::new());
    assert!(!empty.is_phase_terminated(&phase_scope));
}

#[test]
fn test_no_termination_never_terminates() {
    let scope = started_scope(&[0, 1]);
    assert!(!Termination::<_, NQueensDirector>::is_solver_terminated(&NoTermination, &scope));
}
