//! Tests for acceptors.

use super::*;
use planforge_core::score::{HardSoftScore, SimpleScore};
use planforge_test::nqueens::NQueensSolution;
use planforge_test::task::TaskSolution;
use rand::SeedableRng;

fn context<Sc: Copy>(
    move_score: Sc,
    last_step_score: Sc,
    best_score: Sc,
    step_index: u64,
    entity_indices: &[usize],
) -> AcceptanceContext<'_, Sc> {
    AcceptanceContext {
        move_score,
        last_step_score,
        best_score,
        step_index,
        time_gradient: 0.0,
        descriptor_index: 0,
        entity_indices,
    }
}

fn simple(move_score: i64, last_step_score: i64) -> AcceptanceContext<'static, SimpleScore> {
    context(
        SimpleScore::of(move_score),
        SimpleScore::of(last_step_score),
        SimpleScore::of(last_step_score),
        1,
        &[],
    )
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(0)
}

#[test]
fn hill_climbing_accepts_improving_and_equal_moves() {
    let mut acceptor: Box<dyn Acceptor<NQueensSolution>> = Box::new(HillClimbingAcceptor::new());
    let mut rng = rng();

    assert!(acceptor.is_accepted(&simple(-5, -10), &mut rng));
    assert!(acceptor.is_accepted(&simple(-5, -5), &mut rng));
    assert!(!acceptor.is_accepted(&simple(-10, -5), &mut rng));
}

#[test]
fn late_acceptance_compares_with_the_score_of_size_steps_ago() {
    let mut acceptor = LateAcceptanceAcceptor::<NQueensSolution>::new(2);
    let mut rng = rng();
    Acceptor::<NQueensSolution>::phase_started(&mut acceptor, &SimpleScore::of(-10), 4);

    // The history is [-10, -10]: a move worse than the last step is still
    // accepted when it matches the late score.
    assert!(acceptor.is_accepted(&simple(-10, -8), &mut rng));
    assert!(!acceptor.is_accepted(&simple(-11, -8), &mut rng));

    acceptor.step_ended(&simple(-8, -10));
    acceptor.step_ended(&simple(-6, -8));
    // The history is now [-8, -6] and the late score is -8.
    assert!(acceptor.is_accepted(&simple(-8, -6), &mut rng));
    assert!(!acceptor.is_accepted(&simple(-9, -6), &mut rng));
}

#[test]
fn simulated_annealing_always_accepts_improving_moves() {
    let mut acceptor =
        SimulatedAnnealingAcceptor::<NQueensSolution>::new(SimpleScore::of(10)).unwrap();
    let mut rng = rng();
    Acceptor::<NQueensSolution>::phase_started(&mut acceptor, &SimpleScore::of(-10), 4);
    Acceptor::<NQueensSolution>::step_started(&mut acceptor, 0, 0.0);

    assert!(acceptor.is_accepted(&simple(-5, -10), &mut rng));
    assert!(acceptor.is_accepted(&simple(-10, -10), &mut rng));
}

#[test]
fn simulated_annealing_cools_down_with_the_time_gradient() {
    let mut acceptor =
        SimulatedAnnealingAcceptor::<TaskSolution>::new(HardSoftScore::of(0, 100)).unwrap();
    Acceptor::<TaskSolution>::phase_started(&mut acceptor, &HardSoftScore::of(0, 0), 4);

    Acceptor::<TaskSolution>::step_started(&mut acceptor, 0, 0.25);
    assert_eq!(acceptor.temperatures()[1], 75.0);
    Acceptor::<TaskSolution>::step_started(&mut acceptor, 1, 1.0);
    assert!(acceptor.temperatures()[1] > 0.0);
    assert!(acceptor.temperatures()[1] < 1.0e-90);

    // At the end of the schedule a worsening move is practically never accepted.
    let mut rng = rng();
    let worse = context(
        HardSoftScore::of(0, -1),
        HardSoftScore::of(0, 0),
        HardSoftScore::of(0, 0),
        1,
        &[],
    );
    assert!((0..100).all(|_| !acceptor.is_accepted(&worse, &mut rng)));
}

#[test]
fn simulated_annealing_hot_start_accepts_some_worsening_moves() {
    let mut acceptor =
        SimulatedAnnealingAcceptor::<NQueensSolution>::new(SimpleScore::of(1_000)).unwrap();
    Acceptor::<NQueensSolution>::phase_started(&mut acceptor, &SimpleScore::of(-10), 4);
    Acceptor::<NQueensSolution>::step_started(&mut acceptor, 0, 0.0);
    let mut rng = rng();

    let accepted = (0..100)
        .filter(|_| acceptor.is_accepted(&simple(-11, -10), &mut rng))
        .count();
    assert!(accepted > 90);
}

#[test]
fn simulated_annealing_rejects_negative_temperature() {
    let result = SimulatedAnnealingAcceptor::<TaskSolution>::new(HardSoftScore::of(-1, 10));
    assert!(result.is_err());
}

#[test]
fn entity_tabu_rejects_recently_moved_entities() {
    let mut acceptor = EntityTabuAcceptor::new(2);
    let mut rng = rng();
    Acceptor::<NQueensSolution>::phase_started(&mut acceptor, &SimpleScore::of(-10), 8);

    let score = SimpleScore::of(-10);
    Acceptor::<NQueensSolution>::step_ended(&mut acceptor, &context(score, score, score, 0, &[3]));
    assert!(acceptor.is_entity_tabu(0, 3));

    let tabu_move = context(score, score, score, 1, &[3]);
    let free_move = context(score, score, score, 1, &[4]);
    assert!(!Acceptor::<NQueensSolution>::is_accepted(&mut acceptor, &tabu_move, &mut rng));
    assert!(Acceptor::<NQueensSolution>::is_accepted(&mut acceptor, &free_move, &mut rng));
}

#[test]
fn entity_tabu_aspiration_accepts_new_best() {
    let mut acceptor = EntityTabuAcceptor::new(5);
    let mut rng = rng();
    Acceptor::<NQueensSolution>::phase_started(&mut acceptor, &SimpleScore::of(-10), 8);
    let score = SimpleScore::of(-10);
    Acceptor::<NQueensSolution>::step_ended(&mut acceptor, &context(score, score, score, 0, &[1]));

    let better_than_best = context(SimpleScore::of(-2), score, score, 1, &[1]);
    assert!(Acceptor::<NQueensSolution>::is_accepted(
        &mut acceptor,
        &better_than_best,
        &mut rng
    ));
}

#[test]
fn entity_tabu_expires_after_tabu_size_steps() {
    let mut acceptor = EntityTabuAcceptor::new(2);
    let mut rng = rng();
    Acceptor::<NQueensSolution>::phase_started(&mut acceptor, &SimpleScore::of(-10), 8);
    let score = SimpleScore::of(-10);

    Acceptor::<NQueensSolution>::step_ended(&mut acceptor, &context(score, score, score, 0, &[0]));
    Acceptor::<NQueensSolution>::step_ended(&mut acceptor, &context(score, score, score, 1, &[1]));
    Acceptor::<NQueensSolution>::step_ended(&mut acceptor, &context(score, score, score, 2, &[2]));

    assert!(!acceptor.is_entity_tabu(0, 0));
    assert!(acceptor.is_entity_tabu(0, 1));
    let moved_at_step_one = context(score, score, score, 3, &[1]);
    assert!(!Acceptor::<NQueensSolution>::is_accepted(
        &mut acceptor,
        &moved_at_step_one,
        &mut rng
    ));
}

#[test]
fn entity_tabu_ratio_is_clamped_to_the_entity_count() {
    let mut acceptor = EntityTabuAcceptor::with_ratio(0.5);
    Acceptor::<NQueensSolution>::phase_started(&mut acceptor, &SimpleScore::of(0), 10);
    assert_eq!(acceptor.working_tabu_size(), 5);

    let mut acceptor = EntityTabuAcceptor::with_ratio(2.0);
    Acceptor::<NQueensSolution>::phase_started(&mut acceptor, &SimpleScore::of(0), 4);
    assert_eq!(acceptor.working_tabu_size(), 3);
}
