//! Tests for multithreaded move evaluation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use planforge_config::EnvironmentMode;
use planforge_core::error::PlanForgeError;
use planforge_core::score::SimpleScore;
use planforge_scoring::ScoreDirector;
use planforge_test::nqueens::{
    create_nqueens_director, get_queen_row, queen_count, set_queen_row, NQueensDirector, NQueensSolution,
    QUEEN_DESCRIPTOR_INDEX,
};

use super::*;
use crate::heuristic::r#move::{ChangeMove, Move};
use crate::phase::localsearch::{apply_step, score_move, StepAssertions};

type QueenMove = ChangeMove<NQueensSolution, i64>;

fn change(director: &NQueensDirector, entity_index: usize, row: i64) -> QueenMove {
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

fn all_moves(director: &NQueensDirector) -> Vec<QueenMove> {
    let n = queen_count(director.working_solution());
    let mut moves = Vec::new();
    for entity_index in 0..n {
        for row in 0..n as i64 {
            moves.push(change(director, entity_index, row));
        }
    }
    moves
}

fn expected_scores(director: &mut NQueensDirector, moves: &[QueenMove]) -> Vec<Option<SimpleScore>> {
    let last_step_score = director.calculate_score();
    moves
        .iter()
        .map(|mv| {
            mv.is_doable(&*director).then(|| {
                score_move(director, mv, last_step_score, StepAssertions::default()).unwrap()
            })
        })
        .collect()
}

#[test]
fn test_barrier_releases_all_parties_each_generation() {
    let barrier = Arc::new(MoveThreadBarrier::new(3));
    let passed = Arc::new(AtomicUsize::new(0));
    let handles: Vec<_> = (0..2)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            let passed = Arc::clone(&passed);
            thread::spawn(move || {
                for _ in 0..2 {
                    barrier.wait().unwrap();
                    passed.fetch_add(1, Ordering::SeqCst);
                }
            })
        })
        .collect();

    barrier.wait().unwrap();
    barrier.wait().unwrap();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(passed.load(Ordering::SeqCst), 4);
    assert!(!barrier.is_broken());
}

#[test]
fn test_breaking_the_barrier_wakes_waiters() {
    let barrier = Arc::new(MoveThreadBarrier::new(2));
    let waiter = {
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || barrier.wait())
    };

    thread::sleep(Duration::from_millis(20));
    barrier.break_barrier();

    assert_eq!(waiter.join().unwrap(), Err(BrokenBarrierError));
    assert!(barrier.is_broken());
    assert_eq!(barrier.wait(), Err(BrokenBarrierError));
}

#[test]
fn test_queue_restores_move_index_order_across_threads() {
    let (sender, mut queue) = OrderByMoveIndexQueue::<u64, i64>::bounded(64);
    queue.start_next_step(0).unwrap();

    let handles: Vec<_> = (0..4u64)
        .map(|thread_index| {
            let sender = sender.clone();
            thread::spawn(move || {
                for move_index in (0..8u64).rev().map(|round| thread_index + 4 * round) {
                    sender.add_move(thread_index as usize, 0, move_index, move_index, -(move_index as i64));
                }
            })
        })
        .collect();

    let taken: Vec<u64> = (0..32).map(|_| queue.take().unwrap().mv).collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(taken, (0..32).collect::<Vec<_>>());
}

#[test]
fn test_queue_drops_results_of_other_steps() {
    let (sender, mut queue) = OrderByMoveIndexQueue::<&str, i64>::bounded(8);
    queue.start_next_step(0).unwrap();
    sender.add_move(0, 0, 0, "step 0", -1);
    assert_eq!(queue.take().unwrap().mv, "step 0");

    // A late result of step 0 is still in flight when step 1 starts.
    sender.add_move(1, 0, 1, "late", -1);
    queue.start_next_step(1).unwrap();
    sender.add_move(1, 0, 2, "later", -1);
    sender.add_undoable_move(0, 1, 0, "step 1");

    let result = queue.take().unwrap();
    assert_eq!(result.mv, "step 1");
    assert_eq!(result.step_index, 1);
    assert!(!result.is_doable());
    assert_eq!(queue.backlog_len(), 0);
}

#[test]
fn test_queue_reraises_move_thread_exceptions() {
    let (sender, mut queue) = OrderByMoveIndexQueue::<&str, i64>::bounded(8);
    assert!(queue.take().is_err());

    queue.start_next_step(0).unwrap();
    sender.add_move(0, 0, 1, "waiting", -1);
    assert!(queue.try_take_exception().is_none());
    assert_eq!(queue.backlog_len(), 1);

    sender.add_exception(
        1,
        PlanForgeError::ScoreCalculation("boom".to_string()),
    );
    let error = queue.take().unwrap_err();
    assert!(error.to_string().contains("boom"));
}

#[test]
fn test_move_thread_config_scales_buffer_by_thread_count() {
    let config = MoveThreadConfig::new(3, 10);
    assert_eq!(config.move_thread_count, 3);
    assert_eq!(config.selected_move_buffer_size, 30);
}

#[test]
fn test_pool_scores_match_single_threaded_scores() {
    let mut director = create_nqueens_director(&[0, 1, 2, 3]);
    let moves = all_moves(&director);
    let expected = expected_scores(&mut director, &moves);

    let calculation_count = thread::scope(|scope| {
        let mut pool = MoveThreadPool::start(
            scope,
            &director,
            MoveThreadConfig::new(3, 2),
            StepAssertions::default(),
        );
        assert_eq!(pool.move_thread_count(), 3);
        pool.start_next_step(0).unwrap();

        let mut scores = Vec::new();
        let mut selected = 0u64;
        let mut pending = moves.iter().cloned();
        while scores.len() < moves.len() {
            while (selected as usize) < moves.len()
                && selected - (scores.len() as u64) < pool.selected_move_buffer_size() as u64
            {
                pool.evaluate(0, selected, pending.next().unwrap()).unwrap();
                selected += 1;
            }
            let result = pool.take().unwrap();
            assert_eq!(result.move_index, scores.len() as u64);
            scores.push(result.score);
        }
        assert_eq!(scores, expected);
        pool.destroy().unwrap()
    });

    // At most one setup calculation per thread, plus one per doable move.
    let doable = expected.iter().filter(|score| score.is_some()).count() as u64;
    assert!(calculation_count >= doable);
    assert!(calculation_count <= 3 + doable);
}

#[test]
fn test_pool_applies_steps_before_evaluating_the_next_one() {
    let mut director = create_nqueens_director(&[0, 0, 0, 0]);
    let step = change(&director, 1, 2);

    let results = thread::scope(|scope| {
        let mut pool = MoveThreadPool::start(
            scope,
            &director,
            MoveThreadConfig::new(2, 4),
            StepAssertions::for_mode(EnvironmentMode::FullAssert),
        );
        pool.start_next_step(0).unwrap();
        pool.evaluate(0, 0, step.clone()).unwrap();
        let step_score = pool.take().unwrap().score.unwrap();
        pool.discard_step(0);

        pool.set_pending_step(1, step.clone(), step_score);
        pool.start_next_step(1).unwrap();
        let moves = all_moves(&director);
        for (move_index, mv) in moves.iter().take(8).cloned().enumerate() {
            pool.evaluate(1, move_index as u64, mv).unwrap();
        }
        let results: Vec<_> = (0..8).map(|_| pool.take().unwrap().score).collect();
        pool.destroy().unwrap();
        results
    });

    let step_score = {
        let last = director.calculate_score();
        score_move(&mut director, &step, last, StepAssertions::default()).unwrap()
    };
    apply_step(&mut director, &step, step_score, StepAssertions::default()).unwrap();
    let moves = all_moves(&director);
    let expected = expected_scores(&mut director, &moves[..8]);
    assert_eq!(results, expected);
}

#[test]
fn test_pool_rejects_out_of_order_pending_step() {
    let director = create_nqueens_director(&[0, 1, 2, 3]);
    let step = change(&director, 0, 1);

    thread::scope(|scope| {
        let mut pool = MoveThreadPool::start(
            scope,
            &director,
            MoveThreadConfig::new(1, 1),
            StepAssertions::default(),
        );
        pool.start_next_step(0).unwrap();
        pool.set_pending_step(2, step, SimpleScore::of(-3));
        assert!(pool.start_next_step(1).is_err());
        pool.cancel();
    });
}

#[test]
fn test_pool_propagates_move_thread_failures() {
    let director = create_nqueens_director(&[0, 1, 2, 3]);
    let missing = ChangeMove::new(
        0,
        99,
        Some(1),
        get_queen_row,
        set_queen_row,
        "row",
        QUEEN_DESCRIPTOR_INDEX,
    );

    thread::scope(|scope| {
        let mut pool = MoveThreadPool::start(
            scope,
            &director,
            MoveThreadConfig::new(2, 2),
            StepAssertions::default(),
        );
        pool.start_next_step(0).unwrap();
        pool.evaluate(0, 0, missing).unwrap();
        assert!(pool.take().is_err());
        pool.cancel();
    });
}
