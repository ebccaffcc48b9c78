//! Tests for SwapMoveSelector.

use super::*;

#[test]
fn original_order_yields_each_pair_once() {
    let director = create_nqueens_director(&[0, 1, 2, 3]);
    let mut selector = SwapMoveSelector::new(row_binding());

    let moves: Vec<QueenSwap> = collect_moves(&mut selector, &director, 0);

    assert_eq!(moves.len(), 6);
    assert_eq!(MoveSelector::<NQueensSolution, NQueensDirector, QueenSwap>::size(&selector, &director), 6);
    assert!(moves
        .iter()
        .all(|m| m.left_entity_index() < m.right_entity_index()));
    assert_eq!(moves[0].to_string(), "row#0 <-> row#1");
    assert_eq!(moves[5].to_string(), "row#2 <-> row#3");
}

#[test]
fn random_order_never_ends() {
    let director = create_nqueens_director(&[0, 1, 2, 3]);
    let mut selector = SwapMoveSelector::new(row_binding()).with_random_order(true);

    let moves: Vec<QueenSwap> = sample_moves(&mut selector, &director, 9, 100);

    assert_eq!(moves.len(), 100);
    assert!(MoveSelector::<NQueensSolution, NQueensDirector, QueenSwap>::is_never_ending(&selector));
}

#[test]
fn single_entity_has_no_swaps() {
    let director = create_nqueens_director(&[0]);
    let mut selector = SwapMoveSelector::new(row_binding()).with_random_order(true);

    let moves: Vec<QueenSwap> = sample_moves(&mut selector, &director, 9, 10);

    assert!(moves.is_empty());
}

#[test]
fn swap_selector_feeds_either_moves() {
    let director = create_nqueens_director(&[0, 1, 2]);
    let mut selector = SwapMoveSelector::new(row_binding());

    let moves: Vec<QueenMove> = collect_moves(&mut selector, &director, 0);

    assert_eq!(moves.len(), 3);
    assert!(moves.iter().all(|m| matches!(m, EitherMove::Swap(_))));
}
