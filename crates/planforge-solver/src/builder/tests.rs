//! Configuration wiring tests.

use std::sync::{Arc, Mutex};

use planforge_config::{
    AcceptorConfig, ChangeMoveSelectorConfig, ForagerConfig, LocalSearchConfig, LocalSearchType,
    MoveThreadCount, NearbySelectionConfig, PhaseConfig, PickEarlyType, SelectionCacheType,
    SelectionConfig, SelectionOrder, SolverConfig, TerminationConfig, UnionMoveSelectorConfig,
};
use planforge_core::score::SimpleScore;
use planforge_core::PlanForgeError;
use planforge_test::nqueens::{
    create_nqueens_director, get_queen_row, queen_count, row_distance, row_values, set_queen_row,
    NQueensDirector, NQueensSolution, QUEEN_DESCRIPTOR_INDEX,
};

use super::*;
use crate::event::StepEndedEvent;
use crate::heuristic::r#move::ChangeMove;

type QueenBuilder = SolverBuilder<NQueensSolution, NQueensDirector, i64>;

fn row_binding() -> PlanningVariableBinding<NQueensSolution, i64> {
    PlanningVariableBinding::new(
        QUEEN_DESCRIPTOR_INDEX,
        "row",
        get_queen_row,
        set_queen_row,
        row_values,
        queen_count,
    )
}

fn config_message<T>(result: Result<T>) -> String {
    match result {
        Err(PlanForgeError::Config(message)) => message,
        Err(other) => panic!("expected a config error, got {other:?}"),
        Ok(_) => panic!("expected a config error"),
    }
}

fn change_selector(selection: SelectionConfig) -> MoveSelectorConfig {
    MoveSelectorConfig::ChangeMoveSelector(ChangeMoveSelectorConfig {
        selection,
        ..ChangeMoveSelectorConfig::default()
    })
}

fn build_selector(
    config: &MoveSelectorConfig,
    binding: PlanningVariableBinding<NQueensSolution, i64>,
) -> Result<ConfiguredMoveSelector<NQueensSolution, NQueensDirector, i64>> {
    build_move_selector::<NQueensSolution, NQueensDirector, i64>(
        config,
        &[binding],
        SelectionOrder::Random,
    )
}

#[test]
fn test_acceptor_presets_build() {
    for local_search_type in [
        LocalSearchType::HillClimbing,
        LocalSearchType::TabuSearch,
        LocalSearchType::LateAcceptance,
        LocalSearchType::VariableNeighborhoodDescent,
    ] {
        let config = LocalSearchConfig::default().with_local_search_type(local_search_type);
        let acceptor = config.resolve_acceptor().unwrap();
        assert!(build_acceptor::<NQueensSolution>(&acceptor).is_ok());
    }
}

#[test]
fn test_entity_tabu_size_and_ratio_conflict() {
    let message = config_message(build_acceptor::<NQueensSolution>(&AcceptorConfig::EntityTabu {
        entity_tabu_size: Some(3),
        entity_tabu_ratio: Some(0.2),
    }));
    assert!(message.contains("entity_tabu_size"));
    assert!(message.contains("entity_tabu_ratio"));

    assert!(build_acceptor::<NQueensSolution>(&AcceptorConfig::EntityTabu {
        entity_tabu_size: None,
        entity_tabu_ratio: Some(1.5),
    })
    .is_err());
}

#[test]
fn test_simulated_annealing_needs_a_starting_temperature() {
    let preset = LocalSearchConfig::default()
        .with_local_search_type(LocalSearchType::SimulatedAnnealing)
        .resolve_acceptor()
        .unwrap();
    let message = config_message(build_acceptor::<NQueensSolution>(&preset));
    assert!(message.contains("starting_temperature"));

    let configured = AcceptorConfig::SimulatedAnnealing {
        starting_temperature: Some("2".to_string()),
    };
    assert!(build_acceptor::<NQueensSolution>(&configured).is_ok());

    let unparseable = AcceptorConfig::SimulatedAnnealing {
        starting_temperature: Some("warm".to_string()),
    };
    let message = config_message(build_acceptor::<NQueensSolution>(&unparseable));
    assert!(message.contains("warm"));
}

#[test]
fn test_late_acceptance_size_must_be_positive() {
    let config = AcceptorConfig::LateAcceptance {
        late_acceptance_size: Some(0),
    };
    assert!(config_message(build_acceptor::<NQueensSolution>(&config)).contains("late_acceptance_size"));
}

#[test]
fn test_forager_validation() {
    type QueenForager = LocalSearchForager<ChangeMove<NQueensSolution, i64>, SimpleScore>;

    let unlimited = build_forager::<ChangeMove<NQueensSolution, i64>, SimpleScore>(
        &ForagerConfig::default(),
    )
    .unwrap();
    assert!(!unlimited.supports_never_ending_move_selector());

    let limited: QueenForager =
        build_forager(&ForagerConfig::default().with_accepted_count_limit(4)).unwrap();
    assert!(limited.supports_never_ending_move_selector());

    let zero: Result<QueenForager> = build_forager(&ForagerConfig::default().with_accepted_count_limit(0));
    assert!(config_message(zero).contains("accepted_count_limit"));

    let missing_probability: Result<QueenForager> = build_forager(
        &ForagerConfig::default()
            .with_pick_early_type(PickEarlyType::FirstRandomAcceptedWithProbability),
    );
    assert!(config_message(missing_probability).contains("pick_early_probability"));
}

#[test]
fn test_termination_combines_limits() {
    let empty = build_termination::<NQueensSolution, NQueensDirector>(&TerminationConfig::default())
        .unwrap();
    assert!(empty.is_none());

    let combined = build_termination::<NQueensSolution, NQueensDirector>(
        &TerminationConfig::default()
            .with_step_count_limit(10)
            .with_best_score_limit("0"),
    )
    .unwrap();
    assert!(combined.is_some());

    let bad = build_termination::<NQueensSolution, NQueensDirector>(
        &TerminationConfig::default().with_best_score_limit("zero"),
    );
    assert!(config_message(bad).contains("best_score_limit"));
}

#[test]
fn test_nearby_distribution_kinds_conflict() {
    let config = MoveSelectorConfig::ChangeMoveSelector(ChangeMoveSelectorConfig {
        nearby: Some(NearbySelectionConfig {
            block_distribution_size_maximum: Some(2),
            linear_distribution_size_maximum: Some(3),
            ..NearbySelectionConfig::default()
        }),
        ..ChangeMoveSelectorConfig::default()
    });
    let binding = row_binding().with_nearby_distance(row_distance);

    let message = config_message(build_selector(&config, binding));
    assert!(message.contains("blockDistribution"));
    assert!(message.contains("linearDistribution"));
}

#[test]
fn test_nearby_selection_needs_a_distance_meter() {
    let config = MoveSelectorConfig::ChangeMoveSelector(ChangeMoveSelectorConfig {
        nearby: Some(NearbySelectionConfig::default()),
        ..ChangeMoveSelectorConfig::default()
    });

    assert!(config_message(build_selector(&config, row_binding())).contains("distance meter"));
    let selector = build_selector(&config, row_binding().with_nearby_distance(row_distance)).unwrap();
    assert!(selector.is_never_ending());
}

#[test]
fn test_sorted_order_needs_an_entity_difficulty() {
    let config = change_selector(SelectionConfig {
        cache_type: Some(SelectionCacheType::Step),
        selection_order: Some(SelectionOrder::Sorted),
        ..SelectionConfig::default()
    });

    assert!(config_message(build_selector(&config, row_binding())).contains("entity difficulty"));
    let binding = row_binding().with_entity_difficulty(|_, entity_index| entity_index as i64);
    assert!(!build_selector(&config, binding).unwrap().is_never_ending());
}

#[test]
fn test_shuffled_order_needs_a_cache() {
    let config = change_selector(SelectionConfig {
        selection_order: Some(SelectionOrder::Shuffled),
        ..SelectionConfig::default()
    });
    assert!(config_message(build_selector(&config, row_binding())).contains("cache_type"));
}

#[test]
fn test_selection_order_decides_never_ending() {
    let random = change_selector(SelectionConfig::default());
    assert!(build_selector(&random, row_binding()).unwrap().is_never_ending());

    let original = change_selector(SelectionConfig {
        selection_order: Some(SelectionOrder::Original),
        ..SelectionConfig::default()
    });
    assert!(!build_selector(&original, row_binding()).unwrap().is_never_ending());

    let cached_random = change_selector(SelectionConfig {
        cache_type: Some(SelectionCacheType::Phase),
        ..SelectionConfig::default()
    });
    assert!(build_selector(&cached_random, row_binding()).unwrap().is_never_ending());
}

#[test]
fn test_unknown_variable_name_is_rejected() {
    let config = MoveSelectorConfig::ChangeMoveSelector(ChangeMoveSelectorConfig {
        variable_name: Some("column".to_string()),
        ..ChangeMoveSelectorConfig::default()
    });
    let message = config_message(build_selector(&config, row_binding()));
    assert!(message.contains("column"));
    assert!(message.contains("row"));

    let no_bindings = build_move_selector::<NQueensSolution, NQueensDirector, i64>(
        &config,
        &[],
        SelectionOrder::Random,
    );
    assert!(no_bindings.is_err());
}

#[test]
fn test_union_weights_must_match_children() {
    let config = MoveSelectorConfig::UnionMoveSelector(UnionMoveSelectorConfig {
        selectors: vec![change_selector(SelectionConfig::default())],
        selector_probability_weights: Some(vec![1.0, 2.0]),
        selection_order: None,
    });
    assert!(config_message(build_selector(&config, row_binding())).contains("selector_probability_weights"));
}

#[test]
fn test_move_thread_count_resolution() {
    let zero = QueenBuilder::new(SolverConfig::new().with_move_thread_count(MoveThreadCount::Count(0)))
        .with_binding(row_binding());
    assert!(config_message(zero.build()).contains("move_thread_count"));

    let auto = QueenBuilder::new(SolverConfig::new().with_move_thread_count(MoveThreadCount::Auto))
        .with_available_processors(8);
    let config = auto.move_thread_config().unwrap().unwrap();
    assert_eq!(config.move_thread_count, 4);
    assert_eq!(config.selected_move_buffer_size, 40);

    let few = QueenBuilder::new(SolverConfig::new().with_move_thread_count(MoveThreadCount::Auto))
        .with_available_processors(2);
    assert!(few.move_thread_config().unwrap().is_none());
}

#[test]
fn test_never_ending_selector_with_unlimited_forager_fails_to_build() {
    let phase = LocalSearchConfig::default()
        .with_acceptor(AcceptorConfig::HillClimbing)
        .with_forager(ForagerConfig::default());
    let builder = QueenBuilder::new(SolverConfig::new().with_phase(PhaseConfig::LocalSearch(phase)))
        .with_binding(row_binding());

    assert!(config_message(builder.build()).contains("never ends"));
}

#[test]
fn test_preset_with_explicit_acceptor_fails_to_build() {
    let phase = LocalSearchConfig::default()
        .with_local_search_type(LocalSearchType::TabuSearch)
        .with_acceptor(AcceptorConfig::HillClimbing);
    let builder = QueenBuilder::new(SolverConfig::new().with_phase(PhaseConfig::LocalSearch(phase)))
        .with_binding(row_binding());

    assert!(config_message(builder.build()).contains("local_search_type"));
}

#[test]
fn test_solve_nqueens_from_toml() {
    let config = SolverConfig::from_toml_str(
        r#"
        random_seed = 3

        [termination]
        step_count_limit = 30

        [[phases]]
        type = "local_search"

        [phases.acceptor]
        type = "hill_climbing"

        [phases.forager]
        break_tie_randomly = false

        [phases.move_selector]
        type = "change_move_selector"
        selection_order = "original"
        "#,
    )
    .unwrap();

    let mut solver = QueenBuilder::new(config).with_binding(row_binding()).build().unwrap();
    assert_eq!(solver.phase_count(), 1);
    let solution = solver.solve(create_nqueens_director(&[0, 0, 0, 0])).unwrap();
    assert!(solution.score.unwrap() > SimpleScore::of(-6));
}

#[test]
fn test_default_phase_is_added() {
    let solver = QueenBuilder::new(
        SolverConfig::new().with_termination(TerminationConfig::default().with_step_count_limit(5)),
    )
    .with_binding(row_binding())
    .build()
    .unwrap();
    assert_eq!(solver.phase_count(), 1);
}

#[test]
fn test_move_filter_applies_to_every_phase() {
    fn spare_first_queen(
        _solution: &NQueensSolution,
        mv: &ConfiguredMove<NQueensSolution, i64>,
    ) -> bool {
        !mv.entity_indices().contains(&0)
    }

    let phase = LocalSearchConfig::default()
        .with_local_search_type(LocalSearchType::HillClimbing)
        .with_move_selector(change_selector(SelectionConfig {
            selection_order: Some(SelectionOrder::Original),
            ..SelectionConfig::default()
        }))
        .with_termination(TerminationConfig::default().with_step_count_limit(6));
    let config = SolverConfig::new()
        .with_phase(PhaseConfig::LocalSearch(phase.clone()))
        .with_phase(PhaseConfig::LocalSearch(phase));

    let mut solver = QueenBuilder::new(config)
        .with_binding(row_binding())
        .with_move_filter(spare_first_queen)
        .build()
        .unwrap();
    assert_eq!(solver.phase_count(), 2);
    let solution = solver.solve(create_nqueens_director(&[0, 0, 0, 0])).unwrap();
    assert_eq!(solution.rows()[0], Some(0));
}

type StepTrace = Vec<(u64, SimpleScore, SimpleScore, u64, String)>;

#[derive(Debug, Default)]
struct TrajectoryRecorder {
    steps: Mutex<StepTrace>,
}

impl SolverEventListener<NQueensSolution> for TrajectoryRecorder {
    fn on_best_solution_changed(&self, _solution: &NQueensSolution, _score: &SimpleScore) {}

    fn on_step_ended(&self, event: &StepEndedEvent<SimpleScore>) {
        self.steps.lock().unwrap().push((
            event.step_index,
            event.step_score,
            event.best_score,
            event.selected_move_count,
            event.step.clone(),
        ));
    }
}

/// Solves an all-zero board of `queens` queens for `steps` steps with a
/// single local search phase.
fn solve_trajectory(
    phase: LocalSearchConfig,
    seed: u64,
    queens: usize,
    steps: u64,
    move_thread_count: MoveThreadCount,
) -> (StepTrace, Vec<Option<i64>>) {
    let config = SolverConfig::new()
        .with_random_seed(seed)
        .with_move_thread_count(move_thread_count)
        .with_termination(TerminationConfig::default().with_step_count_limit(steps))
        .with_phase(PhaseConfig::LocalSearch(phase));

    let recorder = Arc::new(TrajectoryRecorder::default());
    let mut solver = QueenBuilder::new(config)
        .with_binding(row_binding())
        .with_event_listener(recorder.clone())
        .build()
        .unwrap();
    let solution = solver.solve(create_nqueens_director(&vec![0_i64; queens])).unwrap();
    let steps = recorder.steps.lock().unwrap().clone();
    (steps, solution.rows())
}

/// Asserts that every thread count walks the single-threaded trajectory,
/// run after run.
fn assert_thread_counts_agree(phase: LocalSearchConfig, seed: u64, queens: usize, steps: u64) {
    let (single_steps, single_rows) =
        solve_trajectory(phase.clone(), seed, queens, steps, MoveThreadCount::None);
    assert_eq!(single_steps.len() as u64, steps);

    for _ in 0..5 {
        for threads in [3, 4] {
            let (multi_steps, multi_rows) = solve_trajectory(
                phase.clone(),
                seed,
                queens,
                steps,
                MoveThreadCount::Count(threads),
            );
            assert_eq!(single_steps, multi_steps, "{threads} move threads");
            assert_eq!(single_rows, multi_rows, "{threads} move threads");
        }
    }
}

#[test]
fn test_three_move_threads_reproduce_the_single_threaded_trajectory() {
    let phase = LocalSearchConfig::default()
        .with_acceptor(AcceptorConfig::LateAcceptance {
            late_acceptance_size: Some(20),
        })
        .with_forager(ForagerConfig::default())
        .with_move_selector(change_selector(SelectionConfig {
            selected_count_limit: Some(5),
            ..SelectionConfig::default()
        }));

    let (single_steps, single_rows) =
        solve_trajectory(phase.clone(), 11, 8, 3, MoveThreadCount::None);
    let (multi_steps, multi_rows) = solve_trajectory(phase, 11, 8, 3, MoveThreadCount::Count(3));

    assert_eq!(single_steps.len(), 3);
    assert!(single_steps.iter().all(|step| step.3 == 5));
    assert_eq!(single_steps, multi_steps);
    assert_eq!(single_rows, multi_rows);
}

#[test]
fn test_move_threads_agree_when_the_first_accepted_move_wins() {
    let phase = LocalSearchConfig::default()
        .with_acceptor(AcceptorConfig::LateAcceptance {
            late_acceptance_size: Some(20),
        })
        .with_forager(ForagerConfig::default().with_accepted_count_limit(1))
        .with_move_selector(change_selector(SelectionConfig::default()));

    assert_thread_counts_agree(phase, 5, 12, 60);
}

#[test]
fn test_move_threads_agree_when_picking_early_at_random() {
    let phase = LocalSearchConfig::default()
        .with_acceptor(AcceptorConfig::EntityTabu {
            entity_tabu_size: Some(3),
            entity_tabu_ratio: None,
        })
        .with_forager(ForagerConfig {
            pick_early_probability: Some(0.3),
            ..ForagerConfig::default()
                .with_accepted_count_limit(4)
                .with_pick_early_type(PickEarlyType::FirstRandomAcceptedWithProbability)
        })
        .with_move_selector(change_selector(SelectionConfig::default()));

    assert_thread_counts_agree(phase, 5, 12, 60);
}
