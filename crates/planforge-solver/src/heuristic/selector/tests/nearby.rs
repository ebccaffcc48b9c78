//! Tests for nearby selection.

use super::*;
use planforge_config::ResolvedNearbyDistribution;
use planforge_core::error::PlanForgeError;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn original_order_lists_nearest_values_first() {
    let director = create_nqueens_director(&[0, 1, 2, 3]);
    let mut selector = NearbyChangeMoveSelector::new(row_binding(), row_distance, None);

    let moves: Vec<QueenChange> = collect_moves(&mut selector, &director, 0);

    assert_eq!(moves.len(), 16);
    let rows_for = |entity_index: usize| -> Vec<i64> {
        moves
            .iter()
            .filter(|m| m.entity_index() == entity_index)
            .filter_map(|m| m.to_value().copied())
            .collect()
    };
    assert_eq!(rows_for(0), vec![0, 1, 2, 3]);
    assert_eq!(rows_for(2), vec![2, 1, 3, 0]);
    assert_eq!(rows_for(3), vec![3, 2, 1, 0]);
}

#[test]
fn linear_distribution_of_one_always_picks_the_nearest() {
    let director = create_nqueens_director(&[0, 1, 2, 3]);
    let distribution = NearbyDistribution::Linear { size_maximum: 1 };
    let mut selector =
        NearbyChangeMoveSelector::new(row_binding(), row_distance, Some(distribution));

    let moves: Vec<QueenChange> = sample_moves(&mut selector, &director, 5, 40);

    assert_eq!(moves.len(), 40);
    assert!(moves
        .iter()
        .all(|m| m.to_value().copied() == Some(m.entity_index() as i64)));
}

#[test]
fn block_distribution_stays_within_the_block() {
    let director = create_nqueens_director(&[0, 1, 2, 3, 4, 5, 6, 7]);
    let distribution = NearbyDistribution::Block {
        size_minimum: 1,
        size_maximum: 2,
        size_ratio: 1.0,
        uniform_distribution_probability: 0.0,
    };
    let mut selector =
        NearbyChangeMoveSelector::new(row_binding(), row_distance, Some(distribution));

    let moves: Vec<QueenChange> = sample_moves(&mut selector, &director, 11, 100);

    for m in &moves {
        let row = m.to_value().copied().unwrap();
        assert!((row - m.entity_index() as i64).abs() <= 1, "{m} is not nearby");
    }
}

#[test]
fn distributions_return_indices_in_range() {
    let mut rng = StdRng::seed_from_u64(3);
    let distributions = [
        NearbyDistribution::Linear { size_maximum: 100 },
        NearbyDistribution::Parabolic { size_maximum: 5 },
        NearbyDistribution::from_resolved(ResolvedNearbyDistribution::Beta {
            alpha: 1.0,
            beta: 5.0,
        })
        .unwrap(),
        NearbyDistribution::Block {
            size_minimum: 1,
            size_maximum: 10,
            size_ratio: 0.5,
            uniform_distribution_probability: 0.5,
        },
    ];
    for distribution in &distributions {
        for _ in 0..200 {
            assert!(distribution.next_index(&mut rng, 7) < 7);
        }
    }
}

#[test]
fn parabolic_distribution_prefers_nearest() {
    let mut rng = StdRng::seed_from_u64(17);
    let distribution = NearbyDistribution::Parabolic { size_maximum: 10 };
    let mut counts = [0usize; 10];
    for _ in 0..2000 {
        counts[distribution.next_index(&mut rng, 10)] += 1;
    }
    assert!(counts[0] > counts[9]);
}

#[test]
fn invalid_beta_distribution_is_a_config_error() {
    let err = NearbyDistribution::from_resolved(ResolvedNearbyDistribution::Beta {
        alpha: 0.0,
        beta: 1.0,
    })
    .unwrap_err();
    assert!(matches!(err, PlanForgeError::Config(_)));
}
