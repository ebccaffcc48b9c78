//! Tests for the move module.

use super::*;
use planforge_core::score::SimpleScore;
use planforge_scoring::ScoreDirector;
use planforge_test::nqueens::{
    create_nqueens_director, get_queen_row, set_queen_row, NQueensDirector, NQueensSolution,
    QUEEN_DESCRIPTOR_INDEX,
};

mod either;
mod swap;

fn change(director: &NQueensDirector, entity_index: usize, row: i64) -> ChangeMove<NQueensSolution, i64> {
    let entity_id = director
        .planning_id(QUEEN_DESCRIPTOR_INDEX, entity_index)
        .unwrap();
    ChangeMove::new(
        entity_index,
        entity_id,
        Some(row),
        get_queen_row,
        set_queen_row,
        "row",
        QUEEN_DESCRIPTOR_INDEX,
    )
}

fn swap(director: &NQueensDirector, left: usize, right: usize) -> SwapMove<NQueensSolution, i64> {
    let left_id = director.planning_id(QUEEN_DESCRIPTOR_INDEX, left).unwrap();
    let right_id = director.planning_id(QUEEN_DESCRIPTOR_INDEX, right).unwrap();
    SwapMove::new(
        (left, left_id),
        (right, right_id),
        get_queen_row,
        set_queen_row,
        "row",
        QUEEN_DESCRIPTOR_INDEX,
    )
}

fn rows(director: &NQueensDirector) -> Vec<Option<i64>> {
    director.working_solution().rows()
}
