//! EitherMove - a monomorphized union of ChangeMove and SwapMove.
//!
//! A union move selector mixing change and swap moves yields this type, so
//! the local search phase stays generic over a single move type.

use std::fmt::{self, Debug, Display};

use planforge_core::domain::PlanningSolution;
use planforge_core::error::Result;
use planforge_scoring::ScoreDirector;

use super::{ChangeMove, Move, SwapMove};

/// A monomorphized union of `ChangeMove` and `SwapMove`.
pub enum EitherMove<S, V> {
    Change(ChangeMove<S, V>),
    Swap(SwapMove<S, V>),
}

impl<S, V: Clone> Clone for EitherMove<S, V> {
    fn clone(&self) -> Self {
        match self {
            Self::Change(m) => Self::Change(m.clone()),
            Self::Swap(m) => Self::Swap(m.clone()),
        }
    }
}

impl<S, V: Debug> Debug for EitherMove<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Change(m) => Debug::fmt(m, f),
            Self::Swap(m) => Debug::fmt(m, f),
        }
    }
}

impl<S, V: Debug> Display for EitherMove<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Change(m) => Display::fmt(m, f),
            Self::Swap(m) => Display::fmt(m, f),
        }
    }
}

impl<S, V> From<ChangeMove<S, V>> for EitherMove<S, V> {
    fn from(m: ChangeMove<S, V>) -> Self {
        Self::Change(m)
    }
}

impl<S, V> From<SwapMove<S, V>> for EitherMove<S, V> {
    fn from(m: SwapMove<S, V>) -> Self {
        Self::Swap(m)
    }
}

impl<S, V> Move<S> for EitherMove<S, V>
where
    S: PlanningSolution,
    V: Clone + PartialEq + Send + Sync + Debug + 'static,
{
    fn is_doable<D: ScoreDirector<S>>(&self, score_director: &D) -> bool {
        match self {
            Self::Change(m) => m.is_doable(score_director),
            Self::Swap(m) => m.is_doable(score_director),
        }
    }

    fn do_move<D: ScoreDirector<S>>(&self, score_director: &mut D) {
        match self {
            Self::Change(m) => m.do_move(score_director),
            Self::Swap(m) => m.do_move(score_director),
        }
    }

    fn create_undo_move<D: ScoreDirector<S>>(&self, score_director: &D) -> Self {
        match self {
            Self::Change(m) => Self::Change(m.create_undo_move(score_director)),
            Self::Swap(m) => Self::Swap(m.create_undo_move(score_director)),
        }
    }

    fn rebase<D: ScoreDirector<S>>(&self, destination: &D) -> Result<Self> {
        Ok(match self {
            Self::Change(m) => Self::Change(m.rebase(destination)?),
            Self::Swap(m) => Self::Swap(m.rebase(destination)?),
        })
    }

    fn descriptor_index(&self) -> usize {
        match self {
            Self::Change(m) => m.descriptor_index(),
            Self::Swap(m) => m.descriptor_index(),
        }
    }

    fn entity_indices(&self) -> &[usize] {
        match self {
            Self::Change(m) => m.entity_indices(),
            Self::Swap(m) => m.entity_indices(),
        }
    }

    fn variable_name(&self) -> &str {
        match self {
            Self::Change(m) => m.variable_name(),
            Self::Swap(m) => m.variable_name(),
        }
    }
}
