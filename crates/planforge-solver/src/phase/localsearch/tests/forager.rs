//! Forager tests.

use planforge_config::PickEarlyType;
use planforge_core::score::{HardSoftScore, SimpleScore};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::phase::localsearch::{LocalSearchForager, StrategicOscillationByLevelFinalistPodium};
use crate::scope::MoveScope;

type Forager = LocalSearchForager<char, SimpleScore>;

/// Last step score -100, best score -10.
fn started(forager: Forager) -> Forager {
    let mut forager = forager;
    forager.step_started(SimpleScore::of(-100), SimpleScore::of(-10));
    forager
}

/// Adds `moves` in order, asserting the forager does not quit before the
/// last one, and returns whether it quit after it.
fn feed(forager: &mut Forager, moves: &[(char, i64, bool)], rng: &mut StdRng) -> bool {
    for (index, &(name, score, accepted)) in moves.iter().enumerate() {
        assert!(!forager.is_quit_early(), "quit before move {name}");
        forager.add_move(
            MoveScope::new(index as u64, name, SimpleScore::of(score), accepted),
            rng,
        );
    }
    forager.is_quit_early()
}

#[test]
fn test_pick_max_score_accepted() {
    let mut rng = StdRng::seed_from_u64(0);
    let mut forager = started(Forager::highest_score());
    let quit = feed(
        &mut forager,
        &[('a', -20, true), ('b', -1, false), ('c', -20, false), ('d', -2, true), ('e', -300, true)],
        &mut rng,
    );

    assert!(!quit);
    assert_eq!(forager.pick_move(&mut rng).unwrap().mv, 'd');
    assert_eq!(forager.selected_move_count(), 5);
    assert_eq!(forager.accepted_move_count(), 3);
}

#[test]
fn test_pick_max_score_unaccepted() {
    let mut rng = StdRng::seed_from_u64(0);
    let mut forager = started(Forager::highest_score());
    feed(
        &mut forager,
        &[('a', -20, false), ('b', -1, false), ('c', -20, false), ('d', -2, false), ('e', -300, false)],
        &mut rng,
    );

    let picked = forager.pick_move(&mut rng).unwrap();
    assert_eq!(picked.mv, 'b');
    assert!(!picked.accepted);
}

#[test]
fn test_pick_first_best_score_improving() {
    let mut rng = StdRng::seed_from_u64(0);
    let mut forager = started(
        Forager::highest_score().with_pick_early_type(PickEarlyType::FirstBestScoreImproving),
    );
    let quit = feed(
        &mut forager,
        &[('a', -1, false), ('b', -20, true), ('c', -300, true), ('d', -1, true)],
        &mut rng,
    );

    assert!(quit);
    assert_eq!(forager.pick_move(&mut rng).unwrap().mv, 'd');
}

#[test]
fn test_pick_first_last_step_score_improving() {
    let mut rng = StdRng::seed_from_u64(0);
    let mut forager = started(
        Forager::highest_score().with_pick_early_type(PickEarlyType::FirstLastStepScoreImproving),
    );
    let quit = feed(
        &mut forager,
        &[('a', -1, false), ('b', -300, true), ('c', -4000, true), ('d', -20, true)],
        &mut rng,
    );

    assert!(quit);
    assert_eq!(forager.pick_move(&mut rng).unwrap().mv, 'd');
}

#[test]
fn test_pick_first_random_accepted_with_certainty() {
    let mut rng = StdRng::seed_from_u64(0);
    let mut forager = started(
        Forager::highest_score()
            .with_pick_early_type(PickEarlyType::FirstRandomAcceptedWithProbability)
            .with_pick_early_probability(1.0),
    );
    let quit = feed(&mut forager, &[('a', -1, false), ('b', -300, true)], &mut rng);

    assert!(quit);
    assert_eq!(forager.pick_move(&mut rng).unwrap().mv, 'b');
}

#[test]
fn test_pick_first_random_accepted_never_with_zero_probability() {
    let mut rng = StdRng::seed_from_u64(0);
    let mut forager = started(
        Forager::highest_score()
            .with_pick_early_type(PickEarlyType::FirstRandomAcceptedWithProbability)
            .with_pick_early_probability(0.0),
    );
    let quit = feed(&mut forager, &[('a', -300, true), ('b', -1, true)], &mut rng);

    assert!(!quit);
    assert_eq!(forager.pick_move(&mut rng).unwrap().mv, 'b');
}

#[test]
fn test_accepted_count_limit_breaks_tie_first() {
    let mut rng = StdRng::seed_from_u64(0);
    let mut forager = started(
        Forager::highest_score()
            .with_accepted_count_limit(4)
            .with_break_tie_randomly(false),
    );
    let quit = feed(
        &mut forager,
        &[('a', -20, false), ('b', -1, true), ('c', -1, true), ('d', -20, true), ('e', -1, true)],
        &mut rng,
    );

    assert!(quit);
    assert_eq!(forager.pick_move(&mut rng).unwrap().mv, 'b');
}

#[test]
fn test_accepted_count_limit_breaks_tie_randomly() {
    let moves = [('a', -20, false), ('b', -1, true), ('c', -1, true), ('d', -20, true), ('e', -1, true)];
    let pick = |seed: u64| {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut forager = started(Forager::highest_score().with_accepted_count_limit(4));
        assert!(feed(&mut forager, &moves, &mut rng));
        assert_eq!(forager.top_list(10).len(), 3);
        forager.pick_move(&mut rng).unwrap().mv
    };

    let picks: Vec<char> = (0..32).map(pick).collect();
    assert!(picks.iter().all(|m| ['b', 'c', 'e'].contains(m)));
    assert!(picks.iter().any(|&m| m != picks[0]));
    assert_eq!(pick(7), pick(7));
}

#[test]
fn test_pick_move_order_independent_once_sorted_by_move_index() {
    let scores = [-3, -1, -2, -1, -1, -5];
    let mut scopes: Vec<MoveScope<char, SimpleScore>> = scores
        .iter()
        .enumerate()
        .map(|(i, &s)| MoveScope::new(i as u64, (b'a' + i as u8) as char, SimpleScore::of(s), true))
        .collect();

    let run = |scopes: &[MoveScope<char, SimpleScore>]| {
        let mut sorted = scopes.to_vec();
        sorted.sort_by_key(|m| m.move_index);
        let mut rng = StdRng::seed_from_u64(11);
        let mut forager = started(Forager::highest_score());
        for scope in sorted {
            forager.add_move(scope, &mut rng);
        }
        forager.pick_move(&mut rng).unwrap().move_index
    };

    let expected = run(&scopes);
    scopes.reverse();
    assert_eq!(run(&scopes), expected);
    scopes.swap(0, 3);
    assert_eq!(run(&scopes), expected);
}

#[test]
fn test_top_list_does_not_mutate() {
    let mut rng = StdRng::seed_from_u64(0);
    let mut forager = started(Forager::highest_score());
    feed(&mut forager, &[('a', -1, true), ('b', -1, true), ('c', -1, true)], &mut rng);

    assert_eq!(forager.top_list(2).len(), 2);
    assert_eq!(forager.top_list(5).len(), 3);
    assert_eq!(forager.top_list(5).len(), 3);
    assert!(forager.pick_move(&mut rng).is_some());
}

#[test]
fn test_empty_step_picks_nothing() {
    let mut rng = StdRng::seed_from_u64(0);
    let mut forager = started(Forager::highest_score());
    forager.add_undoable_move();

    assert_eq!(forager.selected_move_count(), 1);
    assert!(forager.pick_move(&mut rng).is_none());
}

#[test]
fn test_step_started_resets_counts() {
    let mut rng = StdRng::seed_from_u64(0);
    let mut forager = started(Forager::highest_score().with_accepted_count_limit(1));
    forager.add_move(MoveScope::new(0, 'a', SimpleScore::of(-1), true), &mut rng);
    assert!(forager.is_quit_early());
    forager.pick_move(&mut rng);
    forager.step_ended();

    forager.step_started(SimpleScore::of(-1), SimpleScore::of(-1));
    assert!(!forager.is_quit_early());
    assert_eq!(forager.accepted_move_count(), 0);
}

#[test]
fn test_scenario_b_through_the_forager() {
    let mut rng = StdRng::seed_from_u64(0);
    let mut forager = LocalSearchForager::<usize, HardSoftScore>::new(Box::new(
        StrategicOscillationByLevelFinalistPodium::new(false),
    ));
    let reference = HardSoftScore::of(-200, -5000);
    forager.step_started(reference, reference);
    for (index, (hard, soft)) in [(-150, -2000), (-100, -7000), (-100, -7100), (-200, -1000)]
        .into_iter()
        .enumerate()
    {
        forager.add_move(
            MoveScope::new(index as u64, index, HardSoftScore::of(hard, soft), true),
            &mut rng,
        );
    }

    let winner = forager.pick_move(&mut rng).unwrap();
    assert_eq!(winner.score, HardSoftScore::of(-100, -7000));
    assert_eq!(winner.mv, 1);
}
