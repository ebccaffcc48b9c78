//! Simulated annealing acceptor.

use std::fmt::{self, Debug};

use planforge_core::domain::PlanningSolution;
use planforge_core::error::{PlanForgeError, Result};
use planforge_core::score::Score;
use rand::rngs::StdRng;
use rand::Rng;

use super::{AcceptanceContext, Acceptor};

/// Temperatures never drop below this, so a late worsening move keeps a
/// vanishing but well defined chance.
const TEMPERATURE_MINIMUM: f64 = 1.0e-100;

/// Simulated annealing acceptor - accepts worsening moves with a chance that
/// shrinks as the time gradient grows.
///
/// The starting temperature is a score: each level has its own temperature,
/// scaled by `1 - time_gradient` at every step start. A move that worsens
/// level `i` by `d` survives that level with chance `exp(-d / t_i)`; the
/// acceptance chance is the product over all levels.
///
/// # Example
///
/// ```
/// use planforge_core::score::HardSoftScore;
/// use planforge_solver::phase::localsearch::SimulatedAnnealingAcceptor;
/// use planforge_test::task::TaskSolution;
///
/// let acceptor =
///     SimulatedAnnealingAcceptor::<TaskSolution>::new(HardSoftScore::of(0, 100)).unwrap();
/// assert_eq!(acceptor.temperatures(), &[0.0, 100.0]);
/// ```
pub struct SimulatedAnnealingAcceptor<S: PlanningSolution> {
    starting_temperature: S::Score,
    starting_levels: Vec<f64>,
    temperatures: Vec<f64>,
}

impl<S: PlanningSolution> Debug for SimulatedAnnealingAcceptor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulatedAnnealingAcceptor")
            .field("starting_temperature", &self.starting_temperature)
            .field("temperatures", &self.temperatures)
            .finish()
    }
}

impl<S: PlanningSolution> SimulatedAnnealingAcceptor<S> {
    /// Creates an acceptor with a per-level starting temperature.
    ///
    /// Returns a configuration error if the temperature has a negative level
    /// or an init score.
    pub fn new(starting_temperature: S::Score) -> Result<Self> {
        let starting_levels = starting_temperature.to_level_doubles();
        if starting_temperature.init_score() != 0
            || starting_levels.iter().any(|level| *level < 0.0)
        {
            return Err(PlanForgeError::Config(format!(
                "the simulated annealing starting temperature ({starting_temperature}) \
                 cannot have a negative level or an init score"
            )));
        }
        Ok(Self {
            starting_temperature,
            temperatures: starting_levels.clone(),
            starting_levels,
        })
    }

    /// The temperature of every level at the current step.
    pub fn temperatures(&self) -> &[f64] {
        &self.temperatures
    }

    fn accept_chance(&self, last_step_score: &S::Score, move_score: &S::Score) -> f64 {
        let difference = (*last_step_score - *move_score).to_level_doubles();
        difference
            .iter()
            .zip(&self.temperatures)
            .filter(|(worsening, _)| **worsening > 0.0)
            .map(|(worsening, temperature)| (-worsening / temperature).exp())
            .product()
    }
}

impl<S: PlanningSolution> Acceptor<S> for SimulatedAnnealingAcceptor<S> {
    fn phase_started(&mut self, _initial_score: &S::Score, _entity_count: usize) {
        self.temperatures = self.starting_levels.clone();
    }

    fn step_started(&mut self, _step_index: u64, time_gradient: f64) {
        let reverse_gradient = 1.0 - time_gradient.clamp(0.0, 1.0);
        for (temperature, starting) in self.temperatures.iter_mut().zip(&self.starting_levels) {
            *temperature = (starting * reverse_gradient).max(TEMPERATURE_MINIMUM);
        }
    }

    fn is_accepted(&mut self, context: &AcceptanceContext<'_, S::Score>, rng: &mut StdRng) -> bool {
        if context.move_score.init_score() < context.last_step_score.init_score() {
            return false;
        }
        if context.move_score >= context.last_step_score {
            return true;
        }
        let chance = self.accept_chance(&context.last_step_score, &context.move_score);
        rng.random::<f64>() < chance
    }
}
