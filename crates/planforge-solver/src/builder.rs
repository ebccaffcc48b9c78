//! Builder module for constructing solver components from configuration
//!
//! This module provides the wiring between configuration types and the
//! solver runtime. Every invalid combination of settings is reported as a
//! [`PlanForgeError::Config`] when building, never while solving.

use std::fmt::Debug;
use std::sync::Arc;

use planforge_config::{
    AcceptorConfig, ChangeMoveSelectorConfig, EnvironmentMode, FinalistPodiumType, ForagerConfig,
    LocalSearchConfig, MoveSelectorConfig, PhaseConfig, SelectionConfig, SelectionOrder,
    SolverConfig, SwapMoveSelectorConfig, TerminationConfig, UnionMoveSelectorConfig,
};
use planforge_core::domain::PlanningSolution;
use planforge_core::error::{PlanForgeError, Result};
use planforge_core::score::{ParseableScore, Score};
use planforge_scoring::ScoreDirector;
use tracing::{debug, warn};

use crate::event::SolverEventListener;
use crate::heuristic::binding::PlanningVariableBinding;
use crate::heuristic::r#move::{EitherMove, Move};
use crate::heuristic::selector::decorator::{
    CachingMoveSelector, FilteringMoveSelector, MoveFilter, ProbabilisticMoveSelector,
    SelectedCountLimitMoveSelector, ShufflingMoveSelector, SortingMoveSelector, UnionMoveSelector,
};
use crate::heuristic::selector::{
    ChangeMoveSelector, MoveSelector, NearbyChangeMoveSelector, NearbyDistribution,
    SwapMoveSelector,
};
use crate::phase::localsearch::{
    Acceptor, EntityTabuAcceptor, FinalistPodium, HighestScoreFinalistPodium,
    HillClimbingAcceptor, LateAcceptanceAcceptor, LocalSearchDecider, LocalSearchForager,
    LocalSearchPhase, SimulatedAnnealingAcceptor, StepAssertions,
    StrategicOscillationByLevelFinalistPodium,
};
use crate::scope::YieldThrottle;
use crate::solver::Solver;
use crate::termination::{
    BestScoreFeasibleTermination, BestScoreTermination, OrTermination, StepCountTermination,
    Termination, TimeTermination, UnimprovedStepCountTermination,
};
use crate::thread::MoveThreadConfig;

/// The move type of configured phases: a change or a swap of one variable.
pub type ConfiguredMove<S, V> = EitherMove<S, V>;

/// A move selector built from a [`MoveSelectorConfig`].
pub type ConfiguredMoveSelector<S, D, V> = Box<dyn MoveSelector<S, D, ConfiguredMove<S, V>>>;

/// A local search phase built from a [`LocalSearchConfig`].
pub type ConfiguredLocalSearchPhase<S, D, V> = LocalSearchPhase<
    S,
    D,
    ConfiguredMove<S, V>,
    ConfiguredMoveSelector<S, D, V>,
    Box<dyn Acceptor<S>>,
>;

/// Builds a [`Solver`] from a [`SolverConfig`] and the planning variables
/// its moves change.
///
/// All bindings share the value type `V`. Selectors without a
/// `variable_name` cover every binding.
///
/// # Example
///
/// ```
/// use planforge_config::{SolverConfig, TerminationConfig};
/// use planforge_solver::builder::SolverBuilder;
/// use planforge_solver::heuristic::binding::PlanningVariableBinding;
/// use planforge_test::nqueens::{
///     create_nqueens_director, get_queen_row, queen_count, row_values, set_queen_row,
///     NQueensDirector, NQueensSolution, QUEEN_DESCRIPTOR_INDEX,
/// };
///
/// let config = SolverConfig::new()
///     .with_termination(TerminationConfig::default().with_step_count_limit(20));
/// let binding = PlanningVariableBinding::new(
///     QUEEN_DESCRIPTOR_INDEX,
///     "row",
///     get_queen_row,
///     set_queen_row,
///     row_values,
///     queen_count,
/// );
///
/// let mut solver = SolverBuilder::<NQueensSolution, NQueensDirector, i64>::new(config)
///     .with_binding(binding)
///     .build()
///     .unwrap();
/// let solution = solver.solve(create_nqueens_director(&[0, 0, 0, 0])).unwrap();
/// assert!(solution.score.is_some());
/// ```
pub struct SolverBuilder<S: PlanningSolution, D: ScoreDirector<S>, V> {
    config: SolverConfig,
    bindings: Vec<PlanningVariableBinding<S, V>>,
    move_filter: Option<MoveFilter<S, ConfiguredMove<S, V>>>,
    listeners: Vec<Arc<dyn SolverEventListener<S>>>,
    yield_throttle: Option<Arc<YieldThrottle>>,
    available_processors: Option<usize>,
    _phantom: std::marker::PhantomData<fn() -> D>,
}

impl<S, D, V> Debug for SolverBuilder<S, D, V>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolverBuilder")
            .field("config", &self.config)
            .field("bindings", &self.bindings)
            .field("filtered", &self.move_filter.is_some())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<S, D, V> SolverBuilder<S, D, V>
where
    S: PlanningSolution,
    S::Score: ParseableScore,
    D: ScoreDirector<S>,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
{
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            bindings: Vec::new(),
            move_filter: None,
            listeners: Vec::new(),
            yield_throttle: None,
            available_processors: None,
            _phantom: std::marker::PhantomData,
        }
    }

    pub fn with_binding(mut self, binding: PlanningVariableBinding<S, V>) -> Self {
        self.bindings.push(binding);
        self
    }

    /// Drops the moves rejected by `filter` in every phase.
    pub fn with_move_filter(mut self, filter: MoveFilter<S, ConfiguredMove<S, V>>) -> Self {
        self.move_filter = Some(filter);
        self
    }

    pub fn with_event_listener(mut self, listener: Arc<dyn SolverEventListener<S>>) -> Self {
        self.listeners.push(listener);
        self
    }

    pub fn with_yield_throttle(mut self, throttle: Arc<YieldThrottle>) -> Self {
        self.yield_throttle = Some(throttle);
        self
    }

    /// Overrides the processor count `move_thread_count = "auto"` resolves
    /// against.
    pub fn with_available_processors(mut self, available_processors: usize) -> Self {
        self.available_processors = Some(available_processors);
        self
    }

    /// The move threads the configuration resolves to, if any.
    pub fn move_thread_config(&self) -> Result<Option<MoveThreadConfig>> {
        let available = self.available_processors.unwrap_or_else(|| {
            std::thread::available_parallelism().map_or(1, |count| count.get())
        });
        let Some(thread_count) = self.config.resolved_move_thread_count(available)? else {
            return Ok(None);
        };
        let buffer_size = self.config.resolved_move_thread_buffer_size()?;
        Ok(Some(MoveThreadConfig::new(thread_count, buffer_size)))
    }

    pub fn build(&self) -> Result<Solver<S, D>> {
        let environment_mode = self.config.environment_mode;
        let move_thread_config = self.move_thread_config()?;
        let context = PhaseBuildContext {
            bindings: &self.bindings,
            environment_mode,
            move_thread_config,
            move_filter: self.move_filter,
        };

        let mut solver = Solver::new()
            .with_environment_mode(environment_mode)
            .with_random_seed(self.config.resolved_random_seed());
        let solver_termination = match &self.config.termination {
            Some(config) => build_termination::<S, D>(config)?,
            None => None,
        };
        let has_solver_termination = solver_termination.is_some();
        if let Some(termination) = solver_termination {
            solver = solver.with_termination(termination);
        }

        let default_phases = [PhaseConfig::LocalSearch(LocalSearchConfig::default())];
        let phases = if self.config.phases.is_empty() {
            &default_phases[..]
        } else {
            &self.config.phases[..]
        };
        for (phase_index, phase_config) in phases.iter().enumerate() {
            let PhaseConfig::LocalSearch(local_search) = phase_config;
            let is_last = phase_index + 1 == phases.len();
            if is_last && !has_solver_termination && local_search.termination.is_none() {
                warn!(
                    event = "phase_without_termination",
                    phase_index,
                    "the last phase never terminates unless terminated early"
                );
            }
            let phase = build_local_search_phase(local_search, &context)?;
            solver = solver.with_phase(Box::new(phase));
        }

        for listener in &self.listeners {
            solver.add_event_listener(Arc::clone(listener));
        }
        if let Some(throttle) = &self.yield_throttle {
            solver = solver.with_yield_throttle(Arc::clone(throttle));
        }
        debug!(
            event = "solver_built",
            phases = solver.phase_count(),
            environment_mode = ?environment_mode,
            move_threads = move_thread_config.map_or(0, |config| config.move_thread_count),
        );
        Ok(solver)
    }
}

/// Solver-wide settings every configured phase is built with.
pub struct PhaseBuildContext<'a, S, V> {
    pub bindings: &'a [PlanningVariableBinding<S, V>],
    pub environment_mode: EnvironmentMode,
    pub move_thread_config: Option<MoveThreadConfig>,
    pub move_filter: Option<MoveFilter<S, ConfiguredMove<S, V>>>,
}

impl<'a, S, V> PhaseBuildContext<'a, S, V> {
    /// A single-threaded, reproducible context without a move filter.
    pub fn new(bindings: &'a [PlanningVariableBinding<S, V>]) -> Self {
        Self {
            bindings,
            environment_mode: EnvironmentMode::default(),
            move_thread_config: None,
            move_filter: None,
        }
    }
}

/// Builds one local search phase.
pub fn build_local_search_phase<S, D, V>(
    config: &LocalSearchConfig,
    context: &PhaseBuildContext<'_, S, V>,
) -> Result<ConfiguredLocalSearchPhase<S, D, V>>
where
    S: PlanningSolution,
    S::Score: ParseableScore,
    D: ScoreDirector<S>,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
{
    let acceptor = build_acceptor::<S>(&config.resolve_acceptor()?)?;
    let forager: LocalSearchForager<ConfiguredMove<S, V>, S::Score> =
        build_forager(&config.resolve_forager()?)?;
    let move_selector_config = config
        .move_selector
        .clone()
        .unwrap_or_else(MoveSelectorConfig::default_union);
    let mut move_selector =
        build_move_selector::<S, D, V>(&move_selector_config, context.bindings, SelectionOrder::Random)?;
    if let Some(filter) = context.move_filter {
        move_selector = Box::new(FilteringMoveSelector::new(move_selector, filter));
    }
    if move_selector.is_never_ending() && !forager.supports_never_ending_move_selector() {
        return Err(PlanForgeError::Config(format!(
            "the move selector ({move_selector:?}) never ends, so the forager needs an \
             accepted_count_limit or a pick_early_type"
        )));
    }

    let decider = LocalSearchDecider::new(move_selector, acceptor, forager)
        .with_assertions(StepAssertions::for_mode(context.environment_mode));
    let mut phase = LocalSearchPhase::new(decider);
    if let Some(termination) = &config.termination {
        if let Some(termination) = build_termination::<S, D>(termination)? {
            phase = phase.with_termination(termination);
        }
    }
    if let Some(move_thread_config) = context.move_thread_config {
        phase = phase.with_move_threads(move_thread_config);
    }
    Ok(phase)
}

/// Builds the terminations of `config`, or `None` if it sets no limit.
///
/// Several limits combine into an [`OrTermination`].
pub fn build_termination<S, D>(config: &TerminationConfig) -> Result<Option<Box<dyn Termination<S, D>>>>
where
    S: PlanningSolution,
    S::Score: ParseableScore,
    D: ScoreDirector<S>,
{
    let mut terminations: Vec<Box<dyn Termination<S, D>>> = Vec::new();
    if let Some(limit) = config.time_limit() {
        terminations.push(Box::new(TimeTermination::new(limit)));
    }
    if let Some(limit) = config.step_count_limit {
        terminations.push(Box::new(StepCountTermination::new(limit)));
    }
    if let Some(limit) = config.unimproved_step_count_limit {
        terminations.push(Box::new(UnimprovedStepCountTermination::new(limit)));
    }
    if let Some(limit) = &config.best_score_limit {
        let limit = parse_score::<S::Score>("best_score_limit", limit)?;
        terminations.push(Box::new(BestScoreTermination::new(limit)));
    }
    if config.best_score_feasible == Some(true) {
        terminations.push(Box::new(BestScoreFeasibleTermination::<S>::new()));
    }
    if terminations.len() > 1 {
        let any: Box<dyn Termination<S, D>> = Box::new(OrTermination::new(terminations));
        return Ok(Some(any));
    }
    Ok(terminations.pop())
}

/// Builds the acceptor of a resolved [`AcceptorConfig`].
pub fn build_acceptor<S>(config: &AcceptorConfig) -> Result<Box<dyn Acceptor<S>>>
where
    S: PlanningSolution,
    S::Score: ParseableScore,
{
    let acceptor: Box<dyn Acceptor<S>> = match config {
        AcceptorConfig::HillClimbing => Box::new(HillClimbingAcceptor::new()),
        AcceptorConfig::EntityTabu {
            entity_tabu_size,
            entity_tabu_ratio,
        } => match (entity_tabu_size, entity_tabu_ratio) {
            (Some(size), Some(ratio)) => {
                return Err(PlanForgeError::Config(format!(
                    "the entity_tabu_size ({size}) and the entity_tabu_ratio ({ratio}) \
                     cannot both be configured"
                )))
            }
            (Some(0), None) => {
                return Err(PlanForgeError::Config(
                    "the entity_tabu_size (0) must be at least 1".to_string(),
                ))
            }
            (Some(size), None) => Box::new(EntityTabuAcceptor::new(*size)),
            (None, ratio) => {
                let ratio = ratio.unwrap_or(AcceptorConfig::DEFAULT_ENTITY_TABU_RATIO);
                if !(ratio > 0.0 && ratio < 1.0) {
                    return Err(PlanForgeError::Config(format!(
                        "the entity_tabu_ratio ({ratio}) must be between 0.0 and 1.0, exclusive"
                    )));
                }
                Box::new(EntityTabuAcceptor::with_ratio(ratio))
            }
        },
        AcceptorConfig::SimulatedAnnealing {
            starting_temperature,
        } => {
            let Some(starting_temperature) = starting_temperature else {
                return Err(PlanForgeError::Config(
                    "simulated annealing needs a starting_temperature".to_string(),
                ));
            };
            let temperature = parse_score::<S::Score>("starting_temperature", starting_temperature)?;
            Box::new(SimulatedAnnealingAcceptor::<S>::new(temperature)?)
        }
        AcceptorConfig::LateAcceptance {
            late_acceptance_size,
        } => {
            let size = late_acceptance_size.unwrap_or(AcceptorConfig::DEFAULT_LATE_ACCEPTANCE_SIZE);
            if size == 0 {
                return Err(PlanForgeError::Config(
                    "the late_acceptance_size (0) must be at least 1".to_string(),
                ));
            }
            Box::new(LateAcceptanceAcceptor::<S>::new(size))
        }
    };
    Ok(acceptor)
}

/// Builds the forager of a resolved [`ForagerConfig`].
pub fn build_forager<M, Sc>(config: &ForagerConfig) -> Result<LocalSearchForager<M, Sc>>
where
    M: Clone + Send + Debug + 'static,
    Sc: Score,
{
    let podium: Box<dyn FinalistPodium<M, Sc>> = match config.finalist_podium_type.unwrap_or_default() {
        FinalistPodiumType::HighestScore => Box::new(HighestScoreFinalistPodium::new()),
        FinalistPodiumType::StrategicOscillation | FinalistPodiumType::StrategicOscillationByLevel => {
            Box::new(StrategicOscillationByLevelFinalistPodium::new(false))
        }
        FinalistPodiumType::StrategicOscillationByLevelOnBestScore => {
            Box::new(StrategicOscillationByLevelFinalistPodium::new(true))
        }
    };
    let mut forager = LocalSearchForager::new(podium)
        .with_pick_early_type(config.pick_early_type.unwrap_or_default())
        .with_break_tie_randomly(config.break_tie_randomly.unwrap_or(true));
    if let Some(probability) = config.resolved_pick_early_probability()? {
        forager = forager.with_pick_early_probability(probability);
    }
    match config.accepted_count_limit {
        Some(0) => {
            return Err(PlanForgeError::Config(
                "the accepted_count_limit (0) must be at least 1".to_string(),
            ))
        }
        Some(limit) => forager = forager.with_accepted_count_limit(limit),
        None => {}
    }
    Ok(forager)
}

/// Builds a move selector tree. `inherited` is the order of the enclosing
/// selector, random at the root.
pub fn build_move_selector<S, D, V>(
    config: &MoveSelectorConfig,
    bindings: &[PlanningVariableBinding<S, V>],
    inherited: SelectionOrder,
) -> Result<ConfiguredMoveSelector<S, D, V>>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
{
    match config {
        MoveSelectorConfig::ChangeMoveSelector(change) => {
            let order = change.selection.resolved_selection_order(inherited);
            let leaves = select_bindings(bindings, change.variable_name.as_deref())?
                .into_iter()
                .map(|binding| build_change_leaf::<S, D, V>(change, binding, order))
                .collect::<Result<Vec<_>>>()?;
            Ok(union_of(leaves, order))
        }
        MoveSelectorConfig::SwapMoveSelector(swap) => {
            let order = swap.selection.resolved_selection_order(inherited);
            let leaves = select_bindings(bindings, swap.variable_name.as_deref())?
                .into_iter()
                .map(|binding| build_swap_leaf::<S, D, V>(swap, binding, order))
                .collect::<Result<Vec<_>>>()?;
            Ok(union_of(leaves, order))
        }
        MoveSelectorConfig::UnionMoveSelector(union) => build_union(union, bindings, inherited),
    }
}

fn build_union<S, D, V>(
    config: &UnionMoveSelectorConfig,
    bindings: &[PlanningVariableBinding<S, V>],
    inherited: SelectionOrder,
) -> Result<ConfiguredMoveSelector<S, D, V>>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
{
    config.validate()?;
    let order = config.selection_order.unwrap_or_default().resolve(inherited);
    if !matches!(order, SelectionOrder::Original | SelectionOrder::Random) {
        return Err(PlanForgeError::Config(format!(
            "the union_move_selector supports selection_order original or random, not {order:?}"
        )));
    }
    if config.selector_probability_weights.is_some() && order != SelectionOrder::Random {
        return Err(PlanForgeError::Config(
            "the union_move_selector has selector_probability_weights but is not in random order"
                .to_string(),
        ));
    }
    let children = config
        .selectors
        .iter()
        .map(|child| build_move_selector::<S, D, V>(child, bindings, order))
        .collect::<Result<Vec<_>>>()?;
    let mut union = UnionMoveSelector::new(children).with_random_order(order == SelectionOrder::Random);
    if let Some(weights) = &config.selector_probability_weights {
        union = union.with_weights(weights.clone())?;
    }
    Ok(Box::new(union))
}

fn build_change_leaf<S, D, V>(
    config: &ChangeMoveSelectorConfig,
    binding: PlanningVariableBinding<S, V>,
    order: SelectionOrder,
) -> Result<ConfiguredMoveSelector<S, D, V>>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
{
    let selection = &config.selection;
    selection.validate(order)?;
    if let Some(nearby) = &config.nearby {
        nearby.validate(selection.resolved_cache_type(), order)?;
        let Some(meter) = binding.nearby_distance else {
            return Err(PlanForgeError::Config(format!(
                "nearby selection of the variable ({}) needs a nearby distance meter",
                binding.variable_name
            )));
        };
        let distribution = nearby
            .resolve_distribution(order)?
            .map(NearbyDistribution::from_resolved)
            .transpose()?;
        let leaf: ConfiguredMoveSelector<S, D, V> =
            Box::new(NearbyChangeMoveSelector::new(binding, meter, distribution));
        return Ok(limit_selected_count(leaf, selection));
    }
    let leaf = ChangeMoveSelector::new(binding).with_random_order(is_leaf_random(selection, order));
    decorate(Box::new(leaf), binding, selection, order)
}

fn build_swap_leaf<S, D, V>(
    config: &SwapMoveSelectorConfig,
    binding: PlanningVariableBinding<S, V>,
    order: SelectionOrder,
) -> Result<ConfiguredMoveSelector<S, D, V>>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
{
    let selection = &config.selection;
    selection.validate(order)?;
    let leaf = SwapMoveSelector::new(binding).with_random_order(is_leaf_random(selection, order));
    decorate(Box::new(leaf), binding, selection, order)
}

/// A leaf samples randomly itself only when no move cache sits above it.
fn is_leaf_random(selection: &SelectionConfig, order: SelectionOrder) -> bool {
    order == SelectionOrder::Random && !selection.resolved_cache_type().is_cached()
}

/// Wraps a leaf in the cache, order and count limit decorators its
/// selection settings ask for.
fn decorate<S, D, V>(
    leaf: ConfiguredMoveSelector<S, D, V>,
    binding: PlanningVariableBinding<S, V>,
    selection: &SelectionConfig,
    order: SelectionOrder,
) -> Result<ConfiguredMoveSelector<S, D, V>>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
{
    let cache_type = selection.resolved_cache_type();
    if !cache_type.is_cached() {
        return Ok(limit_selected_count(leaf, selection));
    }
    let cached = CachingMoveSelector::new(leaf, cache_type)?;
    let selector: ConfiguredMoveSelector<S, D, V> = match order {
        SelectionOrder::Random => Box::new(cached.with_random_order(true)),
        SelectionOrder::Shuffled => Box::new(ShufflingMoveSelector::new(cached)),
        SelectionOrder::Sorted => {
            let Some(difficulty) = binding.entity_difficulty else {
                return Err(PlanForgeError::Config(format!(
                    "sorted selection of the variable ({}) needs an entity difficulty",
                    binding.variable_name
                )));
            };
            Box::new(SortingMoveSelector::by_entity_difficulty(
                cached,
                difficulty,
                selection.sorter_order.unwrap_or_default(),
            ))
        }
        SelectionOrder::Probabilistic => {
            let Some(weight) = binding.entity_weight else {
                return Err(PlanForgeError::Config(format!(
                    "probabilistic selection of the variable ({}) needs an entity weight",
                    binding.variable_name
                )));
            };
            Box::new(ProbabilisticMoveSelector::by_entity_weight(cached, weight))
        }
        SelectionOrder::Original | SelectionOrder::Inherit => Box::new(cached),
    };
    Ok(limit_selected_count(selector, selection))
}

fn limit_selected_count<S, D, M>(
    selector: Box<dyn MoveSelector<S, D, M>>,
    selection: &SelectionConfig,
) -> Box<dyn MoveSelector<S, D, M>>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
{
    match selection.selected_count_limit {
        Some(limit) => Box::new(SelectedCountLimitMoveSelector::new(selector, limit)),
        None => selector,
    }
}

/// One leaf per binding is combined into a union in the leaves' order.
fn union_of<S, D, V>(
    mut leaves: Vec<ConfiguredMoveSelector<S, D, V>>,
    order: SelectionOrder,
) -> ConfiguredMoveSelector<S, D, V>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
{
    if leaves.len() == 1 {
        if let Some(leaf) = leaves.pop() {
            return leaf;
        }
    }
    Box::new(UnionMoveSelector::new(leaves).with_random_order(order.is_random()))
}

fn select_bindings<S, V>(
    bindings: &[PlanningVariableBinding<S, V>],
    variable_name: Option<&str>,
) -> Result<Vec<PlanningVariableBinding<S, V>>> {
    if bindings.is_empty() {
        return Err(PlanForgeError::Config(
            "a move selector needs at least one planning variable binding".to_string(),
        ));
    }
    match variable_name {
        None => Ok(bindings.to_vec()),
        Some(name) => match bindings.iter().find(|binding| binding.variable_name == name) {
            Some(binding) => Ok(vec![*binding]),
            None => Err(PlanForgeError::Config(format!(
                "the variable_name ({name}) matches none of the bound variables ({:?})",
                bindings.iter().map(|binding| binding.variable_name).collect::<Vec<_>>()
            ))),
        },
    }
}

fn parse_score<Sc: ParseableScore>(field: &str, value: &str) -> Result<Sc> {
    Sc::parse(value).map_err(|error| {
        PlanForgeError::Config(format!("the {field} ({value}) is not a valid score: {error}"))
    })
}

#[cfg(test)]
mod tests;
