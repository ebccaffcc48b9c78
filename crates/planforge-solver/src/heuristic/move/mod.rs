//! Move system for modifying planning solutions.
//!
//! Moves are the fundamental operations that modify planning variables during
//! solving. The local search phase evaluates each candidate by applying it,
//! scoring the result and applying its undo move.
//!
//! - `ChangeMove<S, V>` - assigns a value to a variable
//! - `SwapMove<S, V>` - swaps values between two entities
//! - `EitherMove<S, V>` - either of the above, for unions of move kinds

mod change;
mod either;
mod swap;
mod traits;

#[cfg(test)]
mod tests;

pub use change::ChangeMove;
pub use either::EitherMove;
pub use swap::SwapMove;
pub use traits::Move;
