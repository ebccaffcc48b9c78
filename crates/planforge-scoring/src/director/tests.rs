//! Tests for the director module.

use std::any::TypeId;

use planforge_core::domain::{
    EntityDescriptor, PlanningEntity, PlanningId, PlanningSolution, SolutionDescriptor,
    TypedEntityExtractor, VariableDescriptor,
};
use planforge_core::score::{HardSoftScore, Score};
use planforge_core::{ConstraintRef, ImpactType, PlanForgeError};

use crate::api::analysis::{ConstraintMatch, EntityRef};
use crate::director::{ChildThreadType, ScoreDirector, SimpleScoreDirector};

mod shadow;

#[derive(Clone, Debug, PartialEq)]
struct Queen {
    id: i64,
    row: Option<i64>,
}

impl PlanningEntity for Queen {}

impl PlanningId for Queen {
    fn planning_id(&self) -> i64 {
        self.id
    }
}

#[derive(Clone, Debug)]
struct Board {
    queens: Vec<Queen>,
    score: Option<HardSoftScore>,
}

impl PlanningSolution for Board {
    type Score = HardSoftScore;

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

fn queens(b: &Board) -> &Vec<Queen> {
    &b.queens
}

fn descriptor() -> SolutionDescriptor {
    SolutionDescriptor::new("Board", TypeId::of::<Board>()).with_entity(
        EntityDescriptor::new("Queen", TypeId::of::<Queen>(), "queens")
            .with_extractor(Box::new(
                TypedEntityExtractor::new("queens", queens).with_planning_id(),
            ))
            .with_variable(VariableDescriptor::genuine("row")),
    )
}

fn same_row_pairs(b: &Board) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for i in 0..b.queens.len() {
        for j in (i + 1)..b.queens.len() {
            if b.queens[i].row.is_some() && b.queens[i].row == b.queens[j].row {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

fn row_conflicts(b: &Board) -> HardSoftScore {
    HardSoftScore::of_hard(-(same_row_pairs(b).len() as i64))
}

fn board(rows: &[Option<i64>]) -> Board {
    Board {
        queens: rows
            .iter()
            .enumerate()
            .map(|(i, &row)| Queen {
                id: 100 + i as i64,
                row,
            })
            .collect(),
        score: None,
    }
}

fn director(rows: &[Option<i64>]) -> SimpleScoreDirector<Board, fn(&Board) -> HardSoftScore> {
    SimpleScoreDirector::new(board(rows), descriptor(), row_conflicts as fn(&Board) -> HardSoftScore)
        .unwrap()
}

fn set_row(d: &mut impl ScoreDirector<Board>, index: usize, row: i64) {
    d.before_variable_changed(0, index, "row");
    d.working_solution_mut().queens[index].row = Some(row);
    d.after_variable_changed(0, index, "row");
    d.trigger_variable_listeners();
}

#[test]
fn test_score_is_cached_until_a_change() {
    let mut d = director(&[Some(0), Some(0), Some(1)]);
    assert_eq!(d.calculate_score(), HardSoftScore::of_hard(-1));
    assert_eq!(d.calculate_score(), HardSoftScore::of_hard(-1));
    assert_eq!(d.calculation_count(), 1);
    assert_eq!(d.working_solution().score(), Some(HardSoftScore::of_hard(-1)));

    set_row(&mut d, 1, 2);
    assert_eq!(d.calculate_score(), HardSoftScore::ZERO);
    assert_eq!(d.calculation_count(), 2);
}

#[test]
fn test_init_score_counts_unassigned_variables() {
    let mut d = director(&[Some(0), None, None]);
    let score = d.calculate_score();
    assert_eq!(score.init_score(), -2);
    assert!(!score.is_solution_initialized());
    assert_eq!(score.to_string(), "-2init/0hard/0soft");
}

#[test]
fn test_planning_id_lookup() {
    let d = director(&[Some(0), Some(1), Some(2)]);
    assert_eq!(d.planning_id(0, 2).unwrap(), 102);
    assert_eq!(d.look_up_working_entity(0, 101).unwrap(), 1);
    assert!(matches!(
        d.look_up_working_entity(0, 7),
        Err(PlanForgeError::DomainModel(_))
    ));
}

#[test]
fn test_set_working_solution_reindexes() {
    let mut d = director(&[Some(0), Some(1)]);
    let mut reversed = board(&[Some(0), Some(1)]);
    reversed.queens.reverse();
    d.set_working_solution(reversed).unwrap();
    assert_eq!(d.look_up_working_entity(0, 100).unwrap(), 1);

    let duplicate = Board {
        queens: vec![Queen { id: 1, row: None }, Queen { id: 1, row: None }],
        score: None,
    };
    assert!(d.set_working_solution(duplicate).is_err());
}

#[test]
fn test_child_thread_is_independent() {
    let mut parent = director(&[Some(0), Some(0)]);
    parent.calculate_score();
    let mut child = parent.create_child_thread(ChildThreadType::MoveThread);
    assert_eq!(child.calculation_count(), 0);

    set_row(&mut child, 0, 3);
    assert_eq!(child.calculate_score(), HardSoftScore::ZERO);
    assert_eq!(parent.calculate_score(), HardSoftScore::of_hard(-1));
    assert_eq!(parent.working_solution().queens[0].row, Some(0));
}

#[test]
fn test_assert_expected_working_score() {
    let mut d = director(&[Some(0), Some(0)]);
    d.assert_expected_working_score(HardSoftScore::of_hard(-1), &"initial")
        .unwrap();

    let err = d
        .assert_expected_working_score(HardSoftScore::ZERO, &"Queen 0 {0 -> 0}")
        .unwrap_err();
    assert!(matches!(err, PlanForgeError::ScoreCorruption(_)));
    let message = err.to_string();
    assert!(message.contains("Queen 0 {0 -> 0}"), "{message}");
    assert!(message.contains("-1hard/0soft"), "{message}");
}

#[test]
fn test_assert_predicted_score_from_scratch() {
    let d = director(&[Some(0), Some(1)]);
    d.assert_predicted_score_from_scratch(HardSoftScore::ZERO, &"noop")
        .unwrap();
    let err = d
        .assert_predicted_score_from_scratch(HardSoftScore::of_soft(5), &"bad move")
        .unwrap_err();
    assert!(err.to_string().contains("bad move"));
}

#[test]
fn test_constraint_match_tracking() {
    fn matches(b: &Board) -> Vec<ConstraintMatch<HardSoftScore>> {
        same_row_pairs(b)
            .into_iter()
            .map(|(i, j)| {
                ConstraintMatch::new(
                    ConstraintRef::new("nqueens", "Row conflict"),
                    ImpactType::Penalty,
                    HardSoftScore::ONE_HARD,
                    vec![EntityRef::new(&b.queens[i]), EntityRef::new(&b.queens[j])],
                )
            })
            .collect()
    }

    let mut d = director(&[Some(0), Some(0), Some(0)]).with_constraint_matches(matches);
    assert!(d.is_constraint_match_enabled());

    let totals = d.constraint_match_totals();
    assert_eq!(totals.len(), 1);
    assert_eq!(totals[0].match_count(), 3);
    assert_eq!(totals[0].score, d.calculate_score());

    let indictments = d.indictments();
    assert_eq!(indictments.len(), 3);
    assert!(indictments.iter().all(|i| i.score == HardSoftScore::of_hard(-2)));

    set_row(&mut d, 2, 5);
    assert_eq!(d.constraint_matches().len(), 1);
}
