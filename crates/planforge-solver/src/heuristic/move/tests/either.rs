//! Tests for EitherMove.

use super::*;

type QueenMove = EitherMove<NQueensSolution, i64>;

#[test]
fn either_delegates_to_the_wrapped_move() {
    let mut director = create_nqueens_director(&[0, 1, 2, 3]);

    let change_move: QueenMove = change(&director, 2, 0).into();
    let swap_move: QueenMove = swap(&director, 0, 3).into();

    assert!(matches!(change_move, EitherMove::Change(_)));
    assert!(matches!(swap_move, EitherMove::Swap(_)));
    assert_eq!(change_move.entity_indices(), &[2]);
    assert_eq!(swap_move.entity_indices(), &[0, 3]);

    let undo = swap_move.create_undo_move(&director);
    swap_move.do_move(&mut director);
    assert_eq!(rows(&director), vec![Some(3), Some(1), Some(2), Some(0)]);
    undo.do_move(&mut director);
    assert_eq!(rows(&director), vec![Some(0), Some(1), Some(2), Some(3)]);
}

#[test]
fn change_undo_keeps_its_variant() {
    let director = create_nqueens_director(&[0, 1, 2, 3]);
    let m: QueenMove = change(&director, 1, 3).into();

    match m.create_undo_move(&director) {
        EitherMove::Change(undo) => assert_eq!(undo.to_value(), Some(&1)),
        EitherMove::Swap(_) => panic!("undo of a change move must be a change move"),
    }
}
