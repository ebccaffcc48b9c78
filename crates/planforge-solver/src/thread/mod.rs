//! Multithreaded move evaluation.
//!
//! Each move thread owns a child score director over its own clone of the
//! working solution. The solver thread keeps the clones in lockstep by
//! broadcasting every applied step, fans the moves of the current step out
//! round-robin, and forages the results in move index order:
//!
//! - [`MoveThreadOperation`]: what the solver thread sends
//! - [`MoveThreadBarrier`]: step boundary synchronisation among workers
//! - [`OrderByMoveIndexQueue`]: results, reordered by move index
//! - [`MoveThreadPool`]: spawns the workers and owns the channels

mod barrier;
mod operation;
mod pool;
mod queue;
mod runner;

pub use barrier::{BrokenBarrierError, MoveThreadBarrier};
pub use operation::MoveThreadOperation;
pub use pool::{MoveThreadConfig, MoveThreadPool};
pub use queue::{MoveResult, MoveResultSender, OrderByMoveIndexQueue};

#[cfg(test)]
mod tests;
