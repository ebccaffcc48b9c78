//! Tests for SwapMove.

use super::*;
use planforge_test::nqueens::create_director_for;

#[test]
fn swap_with_equal_values_is_not_doable() {
    let director = create_nqueens_director(&[0, 0, 2, 3]);

    assert!(!swap(&director, 0, 1).is_doable(&director));
    assert!(!swap(&director, 2, 2).is_doable(&director));
    assert!(swap(&director, 0, 2).is_doable(&director));
}

#[test]
fn swap_exchanges_values_and_is_its_own_undo() {
    let mut director = create_nqueens_director(&[0, 1, 2, 3]);
    let initial_score = director.calculate_score();

    let m = swap(&director, 0, 1);
    let undo = m.create_undo_move(&director);
    m.do_move(&mut director);

    assert_eq!(rows(&director), vec![Some(1), Some(0), Some(2), Some(3)]);
    assert_eq!(director.calculate_score(), SimpleScore::of(-2));

    undo.do_move(&mut director);
    assert_eq!(rows(&director), vec![Some(0), Some(1), Some(2), Some(3)]);
    assert_eq!(director.calculate_score(), initial_score);
}

#[test]
fn rebase_swaps_the_same_queens() {
    let director = create_nqueens_director(&[0, 1, 2, 3]);
    let mut reversed = create_director_for(director.working_solution().reversed());

    let rebased = swap(&director, 0, 1).rebase(&reversed).unwrap();
    assert_eq!(rebased.entity_indices(), &[3, 2]);

    rebased.do_move(&mut reversed);
    assert_eq!(rows(&reversed), vec![Some(3), Some(2), Some(0), Some(1)]);
}

#[test]
fn display_names_both_entities() {
    let director = create_nqueens_director(&[0, 1, 2, 3]);
    assert_eq!(swap(&director, 0, 2).to_string(), "row#0 <-> row#2");
}
