//! Solver entry point that hides the configuration wiring.

use std::fmt::Debug;
use std::path::Path;

use planforge_config::{ConfigError, SolverConfig};
use planforge_core::domain::PlanningSolution;
use planforge_core::error::Result;
use planforge_core::score::ParseableScore;
use planforge_scoring::ScoreDirector;
use planforge_solver::{PlanningVariableBinding, SolverBuilder};
use tracing::info;

/// Solves the working solution of `score_director` with the configuration
/// in `solver.toml`, or the defaults when that file does not exist.
///
/// A `solver.toml` that exists but does not parse is an error.
pub fn run_solver<S, D, V>(score_director: D, binding: PlanningVariableBinding<S, V>) -> Result<S>
where
    S: PlanningSolution,
    S::Score: ParseableScore,
    D: ScoreDirector<S>,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
{
    let config = load_or_default("solver.toml")?;
    run_solver_with_config(config, score_director, binding)
}

/// Solves the working solution of `score_director` with `config`.
///
/// # Example
///
/// ```
/// use planforge::prelude::*;
/// use planforge::TerminationConfig;
/// use planforge_test::nqueens::{
///     create_nqueens_director, get_queen_row, queen_count, row_values, set_queen_row,
///     QUEEN_DESCRIPTOR_INDEX,
/// };
///
/// let config = SolverConfig::new()
///     .with_termination(TerminationConfig::default().with_step_count_limit(50));
/// let binding = PlanningVariableBinding::new(
///     QUEEN_DESCRIPTOR_INDEX,
///     "row",
///     get_queen_row,
///     set_queen_row,
///     row_values,
///     queen_count,
/// );
///
/// let solution =
///     run_solver_with_config(config, create_nqueens_director(&[0; 6]), binding).unwrap();
/// assert!(solution.score.unwrap() > SimpleScore::of(-15));
/// ```
pub fn run_solver_with_config<S, D, V>(
    config: SolverConfig,
    score_director: D,
    binding: PlanningVariableBinding<S, V>,
) -> Result<S>
where
    S: PlanningSolution,
    S::Score: ParseableScore,
    D: ScoreDirector<S>,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
{
    let mut solver = SolverBuilder::<S, D, V>::new(config)
        .with_binding(binding)
        .build()?;
    solver.solve(score_director)
}

fn load_or_default(path: impl AsRef<Path>) -> Result<SolverConfig> {
    let path = path.as_ref();
    match SolverConfig::load(path) {
        Ok(config) => Ok(config),
        Err(ConfigError::Io(error)) if error.kind() == std::io::ErrorKind::NotFound => {
            info!(event = "config_defaults", path = %path.display());
            Ok(SolverConfig::default())
        }
        Err(error) => Err(error.into()),
    }
}
