//! Tests for the selector module.

use super::*;
use crate::heuristic::binding::PlanningVariableBinding;
use crate::heuristic::r#move::{ChangeMove, EitherMove, SwapMove};
use planforge_test::nqueens::{
    create_nqueens_director, get_queen_row, queen_count, row_distance, row_values,
    set_queen_row, NQueensDirector, NQueensSolution, QUEEN_DESCRIPTOR_INDEX,
};

mod change;
mod nearby;
mod swap;

type QueenChange = ChangeMove<NQueensSolution, i64>;
type QueenSwap = SwapMove<NQueensSolution, i64>;
type QueenMove = EitherMove<NQueensSolution, i64>;

fn row_binding() -> PlanningVariableBinding<NQueensSolution, i64> {
    PlanningVariableBinding::new(
        QUEEN_DESCRIPTOR_INDEX,
        "row",
        get_queen_row,
        set_queen_row,
        row_values,
        queen_count,
    )
    .with_nearby_distance(row_distance)
}

/// Starts a phase and a step, then collects every move of the step.
fn collect_moves<M, Sel>(selector: &mut Sel, director: &NQueensDirector, seed: u64) -> Vec<M>
where
    M: Move<NQueensSolution>,
    Sel: MoveSelector<NQueensSolution, NQueensDirector, M>,
{
    selector.phase_started(director, seed).unwrap();
    selector.step_started(director, seed).unwrap();
    selector.iter_moves(director).collect()
}

/// Starts a phase and a step, then takes the first `count` moves.
fn sample_moves<M, Sel>(
    selector: &mut Sel,
    director: &NQueensDirector,
    seed: u64,
    count: usize,
) -> Vec<M>
where
    M: Move<NQueensSolution>,
    Sel: MoveSelector<NQueensSolution, NQueensDirector, M>,
{
    selector.phase_started(director, seed).unwrap();
    selector.step_started(director, seed).unwrap();
    selector.iter_moves(director).take(count).collect()
}

fn describe<M: Move<NQueensSolution>>(moves: &[M]) -> Vec<String> {
    moves.iter().map(|m| m.to_string()).collect()
}
