//! Tests for ChangeMoveSelector.

use super::*;

#[test]
fn original_order_is_entity_major() {
    let director = create_nqueens_director(&[0, 1, 2, 3]);
    let mut selector = ChangeMoveSelector::new(row_binding());

    let moves: Vec<QueenChange> = collect_moves(&mut selector, &director, 0);

    assert_eq!(moves.len(), 16);
    assert_eq!(
        MoveSelector::<NQueensSolution, NQueensDirector, QueenChange>::size(&selector, &director),
        16
    );
    assert!(!MoveSelector::<NQueensSolution, NQueensDirector, QueenChange>::is_never_ending(&selector));
    let first_queen: Vec<_> = moves[..4]
        .iter()
        .map(|m| (m.entity_index(), m.to_value().copied()))
        .collect();
    assert_eq!(
        first_queen,
        vec![(0, Some(0)), (0, Some(1)), (0, Some(2)), (0, Some(3))]
    );
    assert_eq!(moves[15].entity_index(), 3);
}

#[test]
fn random_order_is_reproducible_per_seed() {
    let director = create_nqueens_director(&[0, 1, 2, 3]);
    let mut selector = ChangeMoveSelector::new(row_binding()).with_random_order(true);
    assert!(MoveSelector::<NQueensSolution, NQueensDirector, QueenChange>::is_never_ending(&selector));

    let first: Vec<QueenChange> = sample_moves(&mut selector, &director, 42, 50);
    let second: Vec<QueenChange> = sample_moves(&mut selector, &director, 42, 50);

    assert_eq!(first.len(), 50);
    assert_eq!(describe(&first), describe(&second));
}

#[test]
fn entity_filter_skips_entities() {
    let director = create_nqueens_director(&[0, 1, 2, 3]);
    let binding = row_binding().with_entity_filter(|_, entity_index| entity_index % 2 == 0);
    let mut selector = ChangeMoveSelector::new(binding);

    let moves: Vec<QueenChange> = collect_moves(&mut selector, &director, 0);

    assert_eq!(moves.len(), 8);
    assert!(moves.iter().all(|m| m.entity_index() % 2 == 0));
}

#[test]
fn moves_carry_planning_ids() {
    let director = create_nqueens_director(&[0, 1, 2]);
    let mut selector = ChangeMoveSelector::new(row_binding());

    let moves: Vec<QueenChange> = collect_moves(&mut selector, &director, 0);

    assert!(moves.iter().all(|m| m.entity_id() == m.entity_index() as i64));
}

#[test]
fn empty_board_yields_no_moves() {
    let director = create_nqueens_director(&[]);
    let mut selector = ChangeMoveSelector::new(row_binding()).with_random_order(true);

    let moves: Vec<QueenChange> = sample_moves(&mut selector, &director, 1, 10);

    assert!(moves.is_empty());
}
