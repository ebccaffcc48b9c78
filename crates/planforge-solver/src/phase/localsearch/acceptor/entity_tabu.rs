//! Entity tabu acceptor.

use std::collections::{HashMap, VecDeque};
use std::fmt::{self, Debug};

use planforge_core::domain::PlanningSolution;
use rand::rngs::StdRng;
use smallvec::SmallVec;

use super::{AcceptanceContext, Acceptor};

/// An entity, identified by its descriptor and its index.
type TabuKey = (usize, usize);

/// How the tabu size is determined.
#[derive(Debug, Clone, Copy, PartialEq)]
enum TabuSize {
    Fixed(usize),
    /// A fraction of the number of entities.
    Ratio(f64),
}

/// Entity tabu acceptor - forbids moving recently moved entities.
///
/// The entities changed by a step's winner stay tabu for the next
/// `tabu_size` steps. A tabu move is still accepted when it beats the best
/// score (aspiration). Non-tabu moves are always accepted; the forager
/// picks among them.
///
/// # Example
///
/// ```
/// use planforge_solver::phase::localsearch::EntityTabuAcceptor;
///
/// let acceptor = EntityTabuAcceptor::new(7);
/// assert!(!acceptor.is_entity_tabu(0, 42));
/// ```
pub struct EntityTabuAcceptor {
    size: TabuSize,
    working_tabu_size: usize,
    aspiration_enabled: bool,
    tabu_to_step_index: HashMap<TabuKey, u64>,
    tabu_sequence: VecDeque<TabuKey>,
}

impl Debug for EntityTabuAcceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityTabuAcceptor")
            .field("size", &self.size)
            .field("working_tabu_size", &self.working_tabu_size)
            .field("tabu_list_len", &self.tabu_sequence.len())
            .finish()
    }
}

impl EntityTabuAcceptor {
    /// Creates an acceptor keeping `entity_tabu_size` steps of tabu entities.
    pub fn new(entity_tabu_size: usize) -> Self {
        Self::with_size(TabuSize::Fixed(entity_tabu_size.max(1)))
    }

    /// Creates an acceptor whose tabu size is `ratio` times the entity count.
    pub fn with_ratio(entity_tabu_ratio: f64) -> Self {
        Self::with_size(TabuSize::Ratio(entity_tabu_ratio))
    }

    fn with_size(size: TabuSize) -> Self {
        Self {
            size,
            working_tabu_size: 1,
            aspiration_enabled: true,
            tabu_to_step_index: HashMap::new(),
            tabu_sequence: VecDeque::new(),
        }
    }

    pub fn with_aspiration(mut self, aspiration_enabled: bool) -> Self {
        self.aspiration_enabled = aspiration_enabled;
        self
    }

    /// The tabu size resolved for the current phase.
    pub fn working_tabu_size(&self) -> usize {
        self.working_tabu_size
    }

    /// Returns true if the entity is in the tabu list.
    pub fn is_entity_tabu(&self, descriptor_index: usize, entity_index: usize) -> bool {
        self.tabu_to_step_index
            .contains_key(&(descriptor_index, entity_index))
    }

    fn resolve_size(&self, entity_count: usize) -> usize {
        match self.size {
            TabuSize::Fixed(size) => size,
            TabuSize::Ratio(ratio) => {
                let size = (entity_count as f64 * ratio) as usize;
                size.min(entity_count.saturating_sub(1)).max(1)
            }
        }
    }

    fn keys(context: &AcceptanceContext<'_, impl Copy>) -> SmallVec<[TabuKey; 2]> {
        context
            .entity_indices
            .iter()
            .map(|&entity_index| (context.descriptor_index, entity_index))
            .collect()
    }
}

impl<S: PlanningSolution> Acceptor<S> for EntityTabuAcceptor {
    fn phase_started(&mut self, _initial_score: &S::Score, entity_count: usize) {
        self.working_tabu_size = self.resolve_size(entity_count);
        self.tabu_to_step_index.clear();
        self.tabu_sequence.clear();
    }

    fn is_accepted(&mut self, context: &AcceptanceContext<'_, S::Score>, _rng: &mut StdRng) -> bool {
        let maximum_tabu_step_index = Self::keys(context)
            .iter()
            .filter_map(|key| self.tabu_to_step_index.get(key).copied())
            .max();
        let Some(tabu_step_index) = maximum_tabu_step_index else {
            return true;
        };
        if self.aspiration_enabled && context.move_score > context.best_score {
            return true;
        }
        let tabu_step_count = context.step_index.saturating_sub(tabu_step_index);
        tabu_step_count > self.working_tabu_size as u64
    }

    fn step_ended(&mut self, context: &AcceptanceContext<'_, S::Score>) {
        let step_index = context.step_index;
        while let Some(oldest) = self.tabu_sequence.front() {
            let oldest_step_index = self.tabu_to_step_index.get(oldest).copied().unwrap_or(0);
            if step_index.saturating_sub(oldest_step_index) < self.working_tabu_size as u64 {
                break;
            }
            if let Some(expired) = self.tabu_sequence.pop_front() {
                self.tabu_to_step_index.remove(&expired);
            }
        }
        for key in Self::keys(context) {
            if self.tabu_to_step_index.insert(key, step_index).is_some() {
                self.tabu_sequence.retain(|tabu| *tabu != key);
            }
            self.tabu_sequence.push_back(key);
        }
    }

    fn phase_ended(&mut self) {
        self.tabu_to_step_index.clear();
        self.tabu_sequence.clear();
    }
}
