use planforge_core::score::HardSoftScore;
use planforge_core::{ConstraintRef, ImpactType};

use super::analysis::{ConstraintMatch, ConstraintMatchTotal, EntityRef, Indictment};

#[derive(Clone, Debug)]
struct Queen {
    column: usize,
}

fn queen(column: usize) -> EntityRef {
    EntityRef::new(&Queen { column })
}

fn row_conflict(a: usize, b: usize) -> ConstraintMatch<HardSoftScore> {
    ConstraintMatch::new(
        ConstraintRef::new("nqueens", "Row conflict"),
        ImpactType::Penalty,
        HardSoftScore::ONE_HARD,
        vec![queen(a), queen(b)],
    )
}

fn preference(a: usize) -> ConstraintMatch<HardSoftScore> {
    ConstraintMatch::new(
        ConstraintRef::new("nqueens", "Preference"),
        ImpactType::Reward,
        HardSoftScore::of_soft(3),
        vec![queen(a)],
    )
}

#[test]
fn test_impact_sign() {
    assert_eq!(row_conflict(0, 1).score, HardSoftScore::of_hard(-1));
    assert_eq!(preference(0).score, HardSoftScore::of_soft(3));
}

#[test]
fn test_totals_per_constraint() {
    let matches = vec![row_conflict(0, 1), preference(2), row_conflict(1, 2)];
    let totals = ConstraintMatchTotal::aggregate(&matches);
    assert_eq!(totals.len(), 2);

    assert_eq!(totals[0].constraint_ref.name, "Preference");
    assert_eq!(totals[0].score, HardSoftScore::of_soft(3));

    assert_eq!(totals[1].constraint_ref.name, "Row conflict");
    assert_eq!(totals[1].match_count(), 2);
    assert_eq!(totals[1].score, HardSoftScore::of_hard(-2));
}

#[test]
fn test_indictments_per_justification() {
    let matches = vec![row_conflict(0, 1), preference(2), row_conflict(1, 2)];
    let indictments = Indictment::aggregate(&matches);
    assert_eq!(indictments.len(), 3);

    let worst = &indictments[0];
    assert_eq!(worst.justification.as_entity::<Queen>().map(|q| q.column), Some(1));
    assert_eq!(worst.score, HardSoftScore::of_hard(-2));
    assert_eq!(worst.constraint_refs().len(), 1);

    let queen2 = indictments
        .iter()
        .find(|i| i.justification == queen(2))
        .unwrap();
    assert_eq!(queen2.match_count(), 2);
    assert_eq!(queen2.score, HardSoftScore::of(-1, 3));
}

#[test]
fn test_duplicate_justification_counts_once() {
    let m = ConstraintMatch::new(
        ConstraintRef::new("", "Self"),
        ImpactType::Penalty,
        HardSoftScore::ONE_SOFT,
        vec![queen(4), queen(4)],
    );
    let indictments = Indictment::aggregate(&[m]);
    assert_eq!(indictments.len(), 1);
    assert_eq!(indictments[0].score, HardSoftScore::of_soft(-1));
}

#[test]
fn test_short_type_name() {
    assert_eq!(queen(0).short_type_name(), "Queen");
    assert_eq!(queen(0).display, "Queen { column: 0 }");
}
