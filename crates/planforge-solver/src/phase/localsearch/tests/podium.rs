//! Finalist podium tests.

use planforge_core::score::{HardMediumSoftScore, HardSoftScore};

use crate::phase::localsearch::{
    FinalistPodium, HighestScoreFinalistPodium, StrategicOscillationByLevelFinalistPodium,
};
use crate::scope::MoveScope;

fn accepted(index: u64, hard: i64, soft: i64) -> MoveScope<u64, HardSoftScore> {
    MoveScope::new(index, index, HardSoftScore::of(hard, soft), true)
}

/// Feeds the moves and returns the single finalist's score.
fn winner<P: FinalistPodium<u64, HardSoftScore>>(
    podium: &mut P,
    moves: &[(i64, i64)],
) -> HardSoftScore {
    for (index, &(hard, soft)) in moves.iter().enumerate() {
        podium.add_move(accepted(index as u64, hard, soft));
    }
    assert_eq!(podium.finalists().len(), 1);
    podium.finalists()[0].score
}

const STEP_0: [(i64, i64); 4] = [(-150, -2000), (-100, -7000), (-100, -7100), (-200, -1000)];

const STEP_1: [(i64, i64); 6] = [
    (-100, -8000),
    (-100, -7000),
    (-150, -3000),
    (-120, -4000),
    (-150, -2000),
    (-200, -1000),
];

#[test]
fn test_highest_score_keeps_the_lexicographic_maximum() {
    let mut podium = HighestScoreFinalistPodium::new();
    let reference = HardSoftScore::of(-200, -5000);
    podium.step_started(reference, reference);

    assert_eq!(winner(&mut podium, &STEP_0), HardSoftScore::of(-100, -7000));
}

#[test]
fn test_highest_score_keeps_ties() {
    let mut podium = HighestScoreFinalistPodium::new();
    let reference = HardSoftScore::of(0, 0);
    podium.step_started(reference, reference);
    podium.add_move(accepted(0, 0, -2));
    podium.add_move(accepted(1, 0, -1));
    podium.add_move(accepted(2, 0, -1));
    podium.add_move(accepted(3, 0, -3));

    let indices: Vec<u64> = podium.finalists().iter().map(|m| m.move_index).collect();
    assert_eq!(indices, vec![1, 2]);
}

#[test]
fn test_first_accepted_move_discards_unaccepted_finalists() {
    let mut podium = HighestScoreFinalistPodium::new();
    let reference = HardSoftScore::of(0, 0);
    podium.step_started(reference, reference);
    podium.add_move(MoveScope::new(0, 0, HardSoftScore::of(0, -1), false));
    podium.add_move(MoveScope::new(1, 1, HardSoftScore::of(0, -9), true));
    podium.add_move(MoveScope::new(2, 2, HardSoftScore::of(0, 0), false));

    let finalists = podium.finalists();
    assert_eq!(finalists.len(), 1);
    assert_eq!(finalists[0].move_index, 1);
}

#[test]
fn test_strategic_oscillation_reference_last_step_score() {
    let mut podium = StrategicOscillationByLevelFinalistPodium::new(false);
    let best = HardSoftScore::of(-200, -5000);

    podium.step_started(best, best);
    let step_0 = winner(&mut podium, &STEP_0);
    assert_eq!(step_0, HardSoftScore::of(-100, -7000));
    podium.step_ended();

    podium.step_started(step_0, step_0);
    let step_1 = winner(&mut podium, &STEP_1);
    assert_eq!(step_1, HardSoftScore::of(-120, -4000));
    podium.step_ended();

    podium.step_started(step_1, step_0);
    let step_2 = winner(
        &mut podium,
        &[
            (-120, -4000),
            (-120, -5000),
            (-150, -3000),
            (-150, -1000),
            (-150, -2000),
            (-160, -500),
        ],
    );
    assert_eq!(step_2, HardSoftScore::of(-150, -1000));
}

#[test]
fn test_strategic_oscillation_reference_best_score() {
    let mut podium = StrategicOscillationByLevelFinalistPodium::new(true);
    assert!(podium.is_reference_best_score());
    let start = HardSoftScore::of(-200, -5000);

    podium.step_started(start, start);
    let step_0 = winner(&mut podium, &STEP_0);
    assert_eq!(step_0, HardSoftScore::of(-100, -7000));
    podium.step_ended();

    // step 0 improved the best score
    podium.step_started(step_0, step_0);
    let step_1 = winner(&mut podium, &STEP_1);
    assert_eq!(step_1, HardSoftScore::of(-120, -4000));
    podium.step_ended();

    // step 1 did not
    podium.step_started(step_1, step_0);
    let step_2 = winner(
        &mut podium,
        &[
            (-110, -8000),
            (-150, -3000),
            (-150, -1000),
            (-110, -6000),
            (-150, -2000),
            (-160, -500),
        ],
    );
    assert_eq!(step_2, HardSoftScore::of(-110, -6000));
}

#[test]
fn test_strategic_oscillation_three_levels() {
    let mut podium = StrategicOscillationByLevelFinalistPodium::new(false);
    let reference = HardMediumSoftScore::of(-200, -5000, -10);
    podium.step_started(reference, reference);

    for (index, (hard, medium, soft)) in [
        (-150, -2000, -10),
        (-100, -7000, -20),
        (-100, -7100, -5),
        (-200, -1000, -10),
    ]
    .into_iter()
    .enumerate()
    {
        let score = HardMediumSoftScore::of(hard, medium, soft);
        podium.add_move(MoveScope::new(index as u64, index, score, true));
    }

    let finalists = podium.finalists();
    assert_eq!(finalists.len(), 1);
    assert_eq!(finalists[0].score, HardMediumSoftScore::of(-100, -7000, -20));
}

#[test]
fn test_take_finalists_drains_the_podium() {
    let mut podium = HighestScoreFinalistPodium::new();
    let reference = HardSoftScore::of(0, 0);
    podium.step_started(reference, reference);
    podium.add_move(accepted(0, 0, -1));

    assert_eq!(podium.take_finalists().len(), 1);
    assert!(podium.finalists().is_empty());
}
