//! Move-level scope.

/// An evaluated candidate move of a step.
#[derive(Debug, Clone)]
pub struct MoveScope<M, Sc> {
    /// Position of the move in the step's selection order.
    pub move_index: u64,
    pub mv: M,
    /// The score of the working solution with the move applied.
    pub score: Sc,
    pub accepted: bool,
}

impl<M, Sc> MoveScope<M, Sc> {
    pub fn new(move_index: u64, mv: M, score: Sc, accepted: bool) -> Self {
        Self {
            move_index,
            mv,
            score,
            accepted,
        }
    }
}
