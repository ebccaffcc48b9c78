//! Union move selector combinator.
//!
//! Combines the moves of several child selectors into a single stream.

use std::fmt::{self, Debug};

use planforge_core::domain::PlanningSolution;
use planforge_core::error::{PlanForgeError, Result};
use planforge_scoring::ScoreDirector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::heuristic::r#move::Move;
use crate::heuristic::selector::MoveSelector;

type ChildSelector<S, D, M> = Box<dyn MoveSelector<S, D, M>>;

/// Combines the moves of several child selectors.
///
/// In original order the children are drained one after another. In random
/// order every move comes from a child picked with a probability
/// proportional to its weight; a finite child that runs out is dropped for
/// the rest of the step. Without explicit weights a child weighs its size.
pub struct UnionMoveSelector<S, D, M> {
    children: Vec<ChildSelector<S, D, M>>,
    weights: Option<Vec<f64>>,
    random: bool,
    rng: StdRng,
}

impl<S, D, M> UnionMoveSelector<S, D, M>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
{
    /// Creates a union in original order.
    pub fn new(children: Vec<ChildSelector<S, D, M>>) -> Self {
        Self {
            children,
            weights: None,
            random: false,
            rng: StdRng::seed_from_u64(0),
        }
    }

    pub fn with_random_order(mut self, random: bool) -> Self {
        self.random = random;
        self
    }

    /// Sets one fixed probability weight per child.
    pub fn with_weights(mut self, weights: Vec<f64>) -> Result<Self> {
        if weights.len() != self.children.len() {
            return Err(PlanForgeError::Config(format!(
                "the union move selector has {} children but {} probability weights",
                self.children.len(),
                weights.len()
            )));
        }
        if let Some(weight) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(PlanForgeError::Config(format!(
                "a union move selector probability weight ({weight}) must be finite and non-negative"
            )));
        }
        self.weights = Some(weights);
        Ok(self)
    }

    pub fn children(&self) -> &[ChildSelector<S, D, M>] {
        &self.children
    }

    fn child_weights(&self, score_director: &D) -> Vec<f64> {
        match &self.weights {
            Some(weights) => weights.clone(),
            None => self
                .children
                .iter()
                .map(|child| child.size(score_director) as f64)
                .collect(),
        }
    }

    fn child_seeds(&mut self, seed: u64) -> Vec<u64> {
        let mut seeder = StdRng::seed_from_u64(seed);
        self.rng = StdRng::seed_from_u64(seeder.random());
        self.children.iter().map(|_| seeder.random()).collect()
    }
}

impl<S, D, M> Debug for UnionMoveSelector<S, D, M>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnionMoveSelector")
            .field("children", &self.children)
            .field("weights", &self.weights)
            .field("random", &self.random)
            .finish()
    }
}

impl<S, D, M> MoveSelector<S, D, M> for UnionMoveSelector<S, D, M>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
{
    fn iter_moves<'a>(&'a mut self, score_director: &D) -> Box<dyn Iterator<Item = M> + 'a> {
        let mut weights = self.child_weights(score_director);
        let mut iterators: Vec<Box<dyn Iterator<Item = M> + 'a>> = self
            .children
            .iter_mut()
            .map(|child| child.iter_moves(score_director))
            .collect();

        if !self.random {
            return Box::new(iterators.into_iter().flatten());
        }

        let rng = &mut self.rng;
        Box::new(std::iter::from_fn(move || loop {
            let total: f64 = weights.iter().sum();
            if iterators.is_empty() || total <= 0.0 {
                return None;
            }
            let mut pick = rng.random::<f64>() * total;
            let mut index = weights.len() - 1;
            for (i, weight) in weights.iter().enumerate() {
                if pick < *weight {
                    index = i;
                    break;
                }
                pick -= weight;
            }
            match iterators[index].next() {
                Some(mv) => return Some(mv),
                None => {
                    iterators.remove(index);
                    weights.remove(index);
                }
            }
        }))
    }

    fn size(&self, score_director: &D) -> usize {
        self.children
            .iter()
            .map(|child| child.size(score_director))
            .sum()
    }

    fn is_never_ending(&self) -> bool {
        self.children.iter().any(|child| child.is_never_ending())
    }

    fn snapshot_revision(&self) -> u64 {
        self.children.iter().map(|child| child.snapshot_revision()).sum()
    }

    fn solving_started(&mut self, score_director: &D, seed: u64) -> Result<()> {
        let seeds = self.child_seeds(seed);
        for (child, seed) in self.children.iter_mut().zip(seeds) {
            child.solving_started(score_director, seed)?;
        }
        Ok(())
    }

    fn phase_started(&mut self, score_director: &D, seed: u64) -> Result<()> {
        let seeds = self.child_seeds(seed);
        for (child, seed) in self.children.iter_mut().zip(seeds) {
            child.phase_started(score_director, seed)?;
        }
        Ok(())
    }

    fn step_started(&mut self, score_director: &D, seed: u64) -> Result<()> {
        let seeds = self.child_seeds(seed);
        for (child, seed) in self.children.iter_mut().zip(seeds) {
            child.step_started(score_director, seed)?;
        }
        Ok(())
    }

    fn step_ended(&mut self) {
        for child in &mut self.children {
            child.step_ended();
        }
    }

    fn phase_ended(&mut self) {
        for child in &mut self.children {
            child.phase_ended();
        }
    }
}
