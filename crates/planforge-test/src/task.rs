//! Task assignment test fixtures.
//!
//! Tasks are assigned to workers; each worker's `load` is a shadow variable
//! derived from the `worker` variable of the tasks. Overloading a worker
//! costs hard score, uneven loads cost soft score.
//!
//! # Example
//!
//! ```
//! use planforge_test::task::{create_task_director, Task, TaskSolution, Worker};
//! use planforge_scoring::ScoreDirector;
//!
//! let solution = TaskSolution::new(
//!     vec![Task::assigned(0, 3, 0), Task::assigned(1, 2, 0)],
//!     vec![Worker::new(0, 4), Worker::new(1, 4)],
//! );
//! let mut director = create_task_director(solution);
//! assert_eq!(director.working_solution().workers[0].load, 5);
//! assert_eq!(director.calculate_score().hard(), -1);
//! ```

use std::any::TypeId;

use planforge_core::domain::{
    EntityDescriptor, PlanningEntity, PlanningId, PlanningSolution, ShadowVariableKind,
    SolutionDescriptor, TypedEntityExtractor, VariableDescriptor, VariableSource,
};
use planforge_core::score::HardSoftScore;
use planforge_scoring::{ShadowAwareScoreDirector, ShadowVariableSupport, SimpleScoreDirector};

pub const TASK_DESCRIPTOR_INDEX: usize = 0;
pub const WORKER_DESCRIPTOR_INDEX: usize = 1;

/// A task with a duration, assigned to a worker by index.
#[derive(Clone, Debug, PartialEq)]
pub struct Task {
    pub id: i64,
    pub duration: i64,
    pub worker: Option<usize>,
}

impl Task {
    pub fn new(id: i64, duration: i64, worker: Option<usize>) -> Self {
        Self {
            id,
            duration,
            worker,
        }
    }

    pub fn assigned(id: i64, duration: i64, worker: usize) -> Self {
        Self::new(id, duration, Some(worker))
    }

    pub fn unassigned(id: i64, duration: i64) -> Self {
        Self::new(id, duration, None)
    }
}

impl PlanningEntity for Task {}

impl PlanningId for Task {
    fn planning_id(&self) -> i64 {
        self.id
    }
}

/// A worker; `load` is the summed duration of its tasks.
#[derive(Clone, Debug, PartialEq)]
pub struct Worker {
    pub id: i64,
    pub capacity: i64,
    pub load: i64,
}

impl Worker {
    pub fn new(id: i64, capacity: i64) -> Self {
        Self {
            id,
            capacity,
            load: 0,
        }
    }
}

impl PlanningEntity for Worker {}

impl PlanningId for Worker {
    fn planning_id(&self) -> i64 {
        self.id
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TaskSolution {
    pub tasks: Vec<Task>,
    pub workers: Vec<Worker>,
    pub score: Option<HardSoftScore>,
}

impl TaskSolution {
    pub fn new(tasks: Vec<Task>, workers: Vec<Worker>) -> Self {
        Self {
            tasks,
            workers,
            score: None,
        }
    }

    pub fn assignments(&self) -> Vec<Option<usize>> {
        self.tasks.iter().map(|t| t.worker).collect()
    }
}

impl PlanningSolution for TaskSolution {
    type Score = HardSoftScore;

    fn score(&self) -> Option<Self::Score> {
        self.score
    }

    fn set_score(&mut self, score: Option<Self::Score>) {
        self.score = score;
    }

    fn uninitialized_variable_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.worker.is_none()).count()
    }
}

impl ShadowVariableSupport for TaskSolution {
    fn before_source_changed(&mut self, _source: VariableSource, _d: usize, task: usize) {
        let t = &self.tasks[task];
        if let Some(worker) = t.worker {
            self.workers[worker].load -= t.duration;
        }
    }

    fn update_shadow(
        &mut self,
        _shadow: VariableSource,
        _source: VariableSource,
        _d: usize,
        task: usize,
    ) {
        let t = &self.tasks[task];
        if let Some(worker) = t.worker {
            self.workers[worker].load += t.duration;
        }
    }

    fn update_all_shadows(&mut self) {
        for w in &mut self.workers {
            w.load = 0;
        }
        for t in &self.tasks {
            if let Some(worker) = t.worker {
                self.workers[worker].load += t.duration;
            }
        }
    }
}

pub fn get_tasks(s: &TaskSolution) -> &Vec<Task> {
    &s.tasks
}

pub fn get_workers(s: &TaskSolution) -> &Vec<Worker> {
    &s.workers
}

pub fn task_count(s: &TaskSolution) -> usize {
    s.tasks.len()
}

pub fn get_task_worker(s: &TaskSolution, idx: usize) -> Option<usize> {
    s.tasks.get(idx).and_then(|t| t.worker)
}

pub fn set_task_worker(s: &mut TaskSolution, idx: usize, worker: Option<usize>) {
    if let Some(task) = s.tasks.get_mut(idx) {
        task.worker = worker;
    }
}

pub fn worker_values(s: &TaskSolution) -> Vec<usize> {
    (0..s.workers.len()).collect()
}

/// Scores from the `load` shadow variables only.
pub fn calculate_load_score(solution: &TaskSolution) -> HardSoftScore {
    let overload: i64 = solution
        .workers
        .iter()
        .map(|w| (w.load - w.capacity).max(0))
        .sum();
    let imbalance: i64 = solution.workers.iter().map(|w| w.load * w.load).sum();
    HardSoftScore::of(-overload, -imbalance)
}

pub fn create_task_descriptor() -> SolutionDescriptor {
    let tasks = EntityDescriptor::new("Task", TypeId::of::<Task>(), "tasks")
        .with_extractor(Box::new(
            TypedEntityExtractor::new("tasks", get_tasks).with_planning_id(),
        ))
        .with_variable(VariableDescriptor::genuine("worker").with_allows_unassigned(true));
    let workers = EntityDescriptor::new("Worker", TypeId::of::<Worker>(), "workers")
        .with_extractor(Box::new(
            TypedEntityExtractor::new("workers", get_workers).with_planning_id(),
        ))
        .with_variable(
            VariableDescriptor::shadow("load", ShadowVariableKind::Custom)
                .with_source("Task", "worker"),
        );

    SolutionDescriptor::new("TaskSolution", TypeId::of::<TaskSolution>())
        .with_entity(tasks)
        .with_entity(workers)
}

pub type TaskCalculator = fn(&TaskSolution) -> HardSoftScore;

pub type TaskDirector =
    ShadowAwareScoreDirector<TaskSolution, SimpleScoreDirector<TaskSolution, TaskCalculator>>;

/// Creates a shadow-aware director with every `load` initialized.
///
/// # Panics
///
/// Panics on duplicate planning ids.
pub fn create_task_director(solution: TaskSolution) -> TaskDirector {
    let inner = SimpleScoreDirector::new(
        solution,
        create_task_descriptor(),
        calculate_load_score as TaskCalculator,
    )
    .expect("task and worker planning ids are unique");
    ShadowAwareScoreDirector::new(inner).expect("the load shadow graph is acyclic")
}

/// `task_count` tasks of durations 1, 2, 3, ... all assigned to worker 0.
pub fn create_unbalanced_task_director(task_count: usize, worker_count: usize) -> TaskDirector {
    let tasks = (0..task_count)
        .map(|i| Task::assigned(i as i64, i as i64 % 3 + 1, 0))
        .collect();
    let workers = (0..worker_count)
        .map(|i| Worker::new(100 + i as i64, 6))
        .collect();
    create_task_director(TaskSolution::new(tasks, workers))
}
