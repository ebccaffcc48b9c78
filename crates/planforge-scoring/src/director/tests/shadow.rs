// ShadowAwareScoreDirector tests

use std::any::TypeId;

use planforge_core::domain::{
    EntityDescriptor, PlanningEntity, PlanningSolution, ShadowVariableKind, SolutionDescriptor,
    TypedEntityExtractor, VariableDescriptor, VariableSource,
};
use planforge_core::score::HardSoftScore;
use planforge_core::PlanForgeError;

use crate::director::{
    ChildThreadType, ScoreDirector, ShadowAwareScoreDirector, ShadowVariableSupport,
    SimpleScoreDirector,
};

#[derive(Clone, Debug)]
struct Task {
    duration: i64,
    worker: usize,
}

impl PlanningEntity for Task {}

#[derive(Clone, Debug)]
struct Worker {
    capacity: i64,
    load: i64,
}

impl PlanningEntity for Worker {}

#[derive(Clone, Debug)]
struct Plan {
    tasks: Vec<Task>,
    workers: Vec<Worker>,
    score: Option<HardSoftScore>,
}

impl PlanningSolution for Plan {
    type Score = HardSoftScore;

    fn score(&self) -> Option<Self::Score> {
        self.score
    }

    fn set_score(&mut self, score: Option<Self::Score>) {
        self.score = score;
    }
}

impl ShadowVariableSupport for Plan {
    fn before_source_changed(&mut self, _source: VariableSource, _d: usize, task: usize) {
        let t = &self.tasks[task];
        self.workers[t.worker].load -= t.duration;
    }

    fn update_shadow(&mut self, _shadow: VariableSource, _source: VariableSource, _d: usize, task: usize) {
        let t = &self.tasks[task];
        self.workers[t.worker].load += t.duration;
    }

    fn update_all_shadows(&mut self) {
        for w in &mut self.workers {
            w.load = 0;
        }
        for t in &self.tasks {
            self.workers[t.worker].load += t.duration;
        }
    }
}

fn tasks(p: &Plan) -> &Vec<Task> {
    &p.tasks
}

fn workers(p: &Plan) -> &Vec<Worker> {
    &p.workers
}

fn descriptor(load_sources: &[(&'static str, &'static str)]) -> SolutionDescriptor {
    let mut load = VariableDescriptor::shadow("load", ShadowVariableKind::Custom);
    for &(entity, variable) in load_sources {
        load = load.with_source(entity, variable);
    }
    SolutionDescriptor::new("Plan", TypeId::of::<Plan>())
        .with_entity(
            EntityDescriptor::new("Task", TypeId::of::<Task>(), "tasks")
                .with_extractor(Box::new(TypedEntityExtractor::new("tasks", tasks)))
                .with_variable(VariableDescriptor::genuine("worker")),
        )
        .with_entity(
            EntityDescriptor::new("Worker", TypeId::of::<Worker>(), "workers")
                .with_extractor(Box::new(TypedEntityExtractor::new("workers", workers)))
                .with_variable(load),
        )
}

// Reads only the shadow variable, so stale loads show up in the score.
fn overload(p: &Plan) -> HardSoftScore {
    let over: i64 = p
        .workers
        .iter()
        .map(|w| (w.load - w.capacity).max(0))
        .sum();
    HardSoftScore::of_hard(-over)
}

type Director = ShadowAwareScoreDirector<Plan, SimpleScoreDirector<Plan, fn(&Plan) -> HardSoftScore>>;

fn plan() -> Plan {
    Plan {
        tasks: vec![
            Task { duration: 3, worker: 0 },
            Task { duration: 4, worker: 0 },
            Task { duration: 2, worker: 1 },
        ],
        workers: vec![
            Worker { capacity: 5, load: 0 },
            Worker { capacity: 5, load: 0 },
        ],
        score: None,
    }
}

fn director() -> Director {
    let inner = SimpleScoreDirector::new(
        plan(),
        descriptor(&[("Task", "worker")]),
        overload as fn(&Plan) -> HardSoftScore,
    )
    .unwrap();
    ShadowAwareScoreDirector::new(inner).unwrap()
}

fn assign(d: &mut Director, task: usize, worker: usize) {
    d.before_variable_changed(0, task, "worker");
    d.working_solution_mut().tasks[task].worker = worker;
    d.after_variable_changed(0, task, "worker");
}

#[test]
fn test_shadows_initialized_on_creation() {
    let mut d = director();
    let loads: Vec<_> = d.working_solution().workers.iter().map(|w| w.load).collect();
    assert_eq!(loads, vec![7, 2]);
    assert_eq!(d.calculate_score(), HardSoftScore::of_hard(-2));
}

#[test]
fn test_trigger_propagates_change() {
    let mut d = director();
    assign(&mut d, 1, 1);
    d.trigger_variable_listeners();
    let loads: Vec<_> = d.working_solution().workers.iter().map(|w| w.load).collect();
    assert_eq!(loads, vec![3, 6]);
    assert_eq!(d.calculate_score(), HardSoftScore::of_hard(-1));
}

#[test]
fn test_calculate_score_flushes_pending() {
    let mut d = director();
    assign(&mut d, 0, 1);
    assert_eq!(d.calculate_score(), HardSoftScore::of_hard(0));
    d.assert_shadow_variables_are_not_stale(HardSoftScore::ZERO, &"Task 0 -> Worker 1")
        .unwrap();
}

#[test]
fn test_stale_shadow_detected() {
    let mut d = director();
    // Write without notification.
    d.working_solution_mut().tasks[1].worker = 1;
    let working = d.calculate_score();
    let err = d
        .assert_shadow_variables_are_not_stale(working, &"unannounced write")
        .unwrap_err();
    assert!(matches!(err, PlanForgeError::ScoreCorruption(_)));
    assert!(err.to_string().contains("unannounced write"));
    assert_eq!(d.calculate_score_from_scratch(), HardSoftScore::of_hard(-1));
}

#[test]
fn test_child_thread_shares_no_state() {
    let mut parent = director();
    let mut child = parent.create_child_thread(ChildThreadType::MoveThread);
    assign(&mut child, 1, 1);
    assert_eq!(child.calculate_score(), HardSoftScore::of_hard(-1));
    assert_eq!(parent.calculate_score(), HardSoftScore::of_hard(-2));
    assert_eq!(child.graph().update_order().len(), 1);
}

#[test]
fn test_cyclic_shadow_rejected() {
    let inner = SimpleScoreDirector::new(
        plan(),
        descriptor(&[("Task", "worker"), ("Worker", "load")]),
        overload as fn(&Plan) -> HardSoftScore,
    )
    .unwrap();
    let err = ShadowAwareScoreDirector::new(inner).unwrap_err();
    assert!(err.is_config());
    assert!(err.to_string().contains("Worker.load -> Worker.load"));
}
