//! N-Queens problem test fixtures.
//!
//! Places N queens on an N×N chessboard such that no two queens threaten
//! each other. Each queen owns a column; its row is the planning variable.
//!
//! # Example
//!
//! ```
//! use planforge_test::nqueens::{create_nqueens_director, get_queen_row};
//! use planforge_scoring::ScoreDirector;
//!
//! let director = create_nqueens_director(&[0, 2, 1, 3]);
//! assert_eq!(get_queen_row(director.working_solution(), 1), Some(2));
//! ```

use std::any::TypeId;

use planforge_core::domain::{
    EntityDescriptor, PlanningEntity, PlanningId, PlanningSolution, SolutionDescriptor,
    TypedEntityExtractor, VariableDescriptor,
};
use planforge_core::score::SimpleScore;
use planforge_scoring::SimpleScoreDirector;

/// Descriptor index of `Queen` in [`create_nqueens_descriptor`].
pub const QUEEN_DESCRIPTOR_INDEX: usize = 0;

/// A queen entity in the N-Queens problem.
///
/// - `id`: planning id, stable across clones
/// - `column`: the column position on the board (problem fact)
/// - `row`: the row position (planning variable, `None` if unassigned)
#[derive(Clone, Debug, PartialEq)]
pub struct Queen {
    pub id: i64,
    pub column: i64,
    pub row: Option<i64>,
    pub pinned: bool,
}

impl Queen {
    pub fn new(id: i64, column: i64, row: Option<i64>) -> Self {
        Self {
            id,
            column,
            row,
            pinned: false,
        }
    }

    pub fn assigned(id: i64, column: i64, row: i64) -> Self {
        Self::new(id, column, Some(row))
    }

    pub fn unassigned(id: i64, column: i64) -> Self {
        Self::new(id, column, None)
    }
}

impl PlanningEntity for Queen {
    fn is_pinned(&self) -> bool {
        self.pinned
    }
}

impl PlanningId for Queen {
    fn planning_id(&self) -> i64 {
        self.id
    }
}

/// N-Queens problem solution.
///
/// The score is the negative count of conflicting queen pairs (row and
/// diagonal), with one init point lost per unassigned row.
#[derive(Clone, Debug, PartialEq)]
pub struct NQueensSolution {
    pub n: usize,
    pub queens: Vec<Queen>,
    pub score: Option<SimpleScore>,
}

impl NQueensSolution {
    pub fn new(queens: Vec<Queen>) -> Self {
        Self {
            n: queens.len(),
            queens,
            score: None,
        }
    }

    /// Queens in columns `0..n` with no row assigned.
    pub fn uninitialized(n: usize) -> Self {
        Self::new(
            (0..n)
                .map(|i| Queen::unassigned(i as i64, i as i64))
                .collect(),
        )
    }

    /// Queens in columns `0..n` with the given rows.
    pub fn with_rows(rows: &[i64]) -> Self {
        Self::new(
            rows.iter()
                .enumerate()
                .map(|(i, &row)| Queen::assigned(i as i64, i as i64, row))
                .collect(),
        )
    }

    pub fn with_optional_rows(rows: &[Option<i64>]) -> Self {
        Self::new(
            rows.iter()
                .enumerate()
                .map(|(i, &row)| Queen::new(i as i64, i as i64, row))
                .collect(),
        )
    }

    /// The same board with the queen collection reversed, as a clone
    /// obtained from another source may be.
    pub fn reversed(&self) -> Self {
        let mut queens = self.queens.clone();
        queens.reverse();
        Self {
            n: self.n,
            queens,
            score: self.score,
        }
    }

    pub fn rows(&self) -> Vec<Option<i64>> {
        self.queens.iter().map(|q| q.row).collect()
    }
}

impl PlanningSolution for NQueensSolution {
    type Score = SimpleScore;

    fn score(&self) -> Option<Self::Score> {
        self.score
    }

    fn set_score(&mut self, score: Option<Self::Score>) {
        self.score = score;
    }

    fn uninitialized_variable_count(&self) -> usize {
        self.queens.iter().filter(|q| q.row.is_none()).count()
    }
}

pub fn get_queens(s: &NQueensSolution) -> &Vec<Queen> {
    &s.queens
}

pub fn queen_count(s: &NQueensSolution) -> usize {
    s.queens.len()
}

/// The typed getter of the `row` planning variable.
pub fn get_queen_row(s: &NQueensSolution, idx: usize) -> Option<i64> {
    s.queens.get(idx).and_then(|q| q.row)
}

/// The typed setter of the `row` planning variable.
pub fn set_queen_row(s: &mut NQueensSolution, idx: usize, v: Option<i64>) {
    if let Some(queen) = s.queens.get_mut(idx) {
        queen.row = v;
    }
}

/// The value range of the `row` variable: `0..n`.
pub fn row_values(s: &NQueensSolution) -> Vec<i64> {
    (0..s.n as i64).collect()
}

/// Distance between a queen's column and a candidate row.
///
/// Only reads the queen's column, so it stays fixed while rows change.
pub fn row_distance(s: &NQueensSolution, idx: usize, row: &i64) -> f64 {
    let column = s.queens.get(idx).map(|q| q.column).unwrap_or(0);
    (column - row).abs() as f64
}

/// Counts row and diagonal conflicts between all pairs of assigned queens.
///
/// Returns a negative score where 0 means no conflicts (optimal).
pub fn calculate_conflicts(solution: &NQueensSolution) -> SimpleScore {
    let mut conflicts = 0i64;
    let queens = &solution.queens;

    for i in 0..queens.len() {
        for j in (i + 1)..queens.len() {
            if let (Some(row_i), Some(row_j)) = (queens[i].row, queens[j].row) {
                if row_i == row_j {
                    conflicts += 1;
                }
                let col_diff = (queens[j].column - queens[i].column).abs();
                if (row_i - row_j).abs() == col_diff {
                    conflicts += 1;
                }
            }
        }
    }

    SimpleScore::of(-conflicts)
}

pub fn create_nqueens_descriptor() -> SolutionDescriptor {
    let extractor = TypedEntityExtractor::new("queens", get_queens).with_planning_id();
    let entity_desc = EntityDescriptor::new("Queen", TypeId::of::<Queen>(), "queens")
        .with_extractor(Box::new(extractor))
        .with_variable(VariableDescriptor::genuine("row").with_allows_unassigned(true));

    SolutionDescriptor::new("NQueensSolution", TypeId::of::<NQueensSolution>())
        .with_entity(entity_desc)
}

pub type NQueensCalculator = fn(&NQueensSolution) -> SimpleScore;

pub type NQueensDirector = SimpleScoreDirector<NQueensSolution, NQueensCalculator>;

/// Creates a director over `solution`.
///
/// # Panics
///
/// Panics when two queens share a planning id.
pub fn create_director_for(solution: NQueensSolution) -> NQueensDirector {
    SimpleScoreDirector::new(
        solution,
        create_nqueens_descriptor(),
        calculate_conflicts as NQueensCalculator,
    )
    .expect("queen planning ids are unique")
}

/// Creates a director with queens at the specified rows.
///
/// ```
/// use planforge_test::nqueens::create_nqueens_director;
/// use planforge_scoring::ScoreDirector;
///
/// let mut director = create_nqueens_director(&[0, 0, 0, 0]);
/// assert_eq!(director.calculate_score().score(), -6);
/// ```
pub fn create_nqueens_director(rows: &[i64]) -> NQueensDirector {
    create_director_for(NQueensSolution::with_rows(rows))
}

/// Creates a director with n unassigned queens.
pub fn create_uninitialized_nqueens_director(n: usize) -> NQueensDirector {
    create_director_for(NQueensSolution::uninitialized(n))
}

pub fn create_nqueens_director_optional(rows: &[Option<i64>]) -> NQueensDirector {
    create_director_for(NQueensSolution::with_optional_rows(rows))
}
