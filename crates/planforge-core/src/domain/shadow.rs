//! Shadow variable dependency graph.
//!
//! Built once per solution descriptor. Edges run from a source variable to
//! the shadow variable computed from it; the shadows are then ordered with
//! Kahn's algorithm so that each shadow is updated after all of its sources.

use std::collections::{HashMap, HashSet, VecDeque};

use super::descriptor::SolutionDescriptor;
use super::variable::VariableSource;
use crate::error::{PlanForgeError, Result};

#[derive(Debug, Clone, Default)]
pub struct ShadowVariableGraph {
    /// Shadow variables in topological order.
    order: Vec<VariableSource>,
    /// Direct dependants per variable.
    dependants: HashMap<VariableSource, Vec<VariableSource>>,
    /// Position of each shadow in `order`.
    rank: HashMap<VariableSource, usize>,
}

impl ShadowVariableGraph {
    /// Builds the graph, rejecting unknown sources and cycles.
    pub fn build(descriptor: &SolutionDescriptor) -> Result<Self> {
        let mut shadows = Vec::new();
        let mut dependants: HashMap<VariableSource, Vec<VariableSource>> = HashMap::new();
        let mut in_degree: HashMap<VariableSource, usize> = HashMap::new();

        for entity in &descriptor.entity_descriptors {
            for variable in entity.shadow_variables() {
                let shadow = VariableSource::new(entity.type_name, variable.name);
                if variable.sources.is_empty() {
                    return Err(PlanForgeError::Config(format!(
                        "shadow variable {shadow} declares no source variable"
                    )));
                }
                for source in &variable.sources {
                    if descriptor
                        .find_variable(source.entity_type, source.variable_name)
                        .is_none()
                    {
                        return Err(PlanForgeError::Config(format!(
                            "shadow variable {shadow} declares unknown source variable {source}"
                        )));
                    }
                    dependants.entry(*source).or_default().push(shadow);
                    // Only shadow sources constrain the order: genuine ones are always ready.
                    if descriptor
                        .find_variable(source.entity_type, source.variable_name)
                        .is_some_and(|v| v.is_shadow())
                    {
                        *in_degree.entry(shadow).or_default() += 1;
                    }
                }
                in_degree.entry(shadow).or_default();
                shadows.push(shadow);
            }
        }

        let mut queue: VecDeque<VariableSource> = shadows
            .iter()
            .filter(|s| in_degree.get(*s).copied().unwrap_or(0) == 0)
            .copied()
            .collect();
        let mut order = Vec::with_capacity(shadows.len());
        while let Some(shadow) = queue.pop_front() {
            order.push(shadow);
            for next in dependants.get(&shadow).into_iter().flatten() {
                if let Some(degree) = in_degree.get_mut(next) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(*next);
                    }
                }
            }
        }

        if order.len() < shadows.len() {
            let ordered: HashSet<_> = order.iter().copied().collect();
            let remaining: Vec<_> = shadows
                .iter()
                .copied()
                .filter(|s| !ordered.contains(s))
                .collect();
            let path = find_cycle(&remaining, &dependants)
                .into_iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(PlanForgeError::Config(format!(
                "shadow variable dependency cycle: {path}"
            )));
        }

        let rank = order.iter().enumerate().map(|(i, s)| (*s, i)).collect();
        Ok(Self {
            order,
            dependants,
            rank,
        })
    }

    /// All shadow variables, each after every shadow it depends on.
    pub fn update_order(&self) -> &[VariableSource] {
        &self.order
    }

    /// The shadow variables (transitively) affected by a change of
    /// `entity_type.variable_name`, in update order.
    pub fn affected_by(&self, entity_type: &str, variable_name: &str) -> Vec<VariableSource> {
        let mut seen = HashSet::new();
        let mut stack: Vec<VariableSource> = self
            .dependants
            .iter()
            .filter(|(k, _)| k.entity_type == entity_type && k.variable_name == variable_name)
            .flat_map(|(_, v)| v.iter().copied())
            .collect();
        while let Some(shadow) = stack.pop() {
            if seen.insert(shadow) {
                stack.extend(self.dependants.get(&shadow).into_iter().flatten().copied());
            }
        }
        let mut affected: Vec<_> = seen.into_iter().collect();
        affected.sort_by_key(|s| self.rank.get(s).copied().unwrap_or(usize::MAX));
        affected
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Walks the unsorted remainder until a node repeats and returns that loop.
fn find_cycle(
    remaining: &[VariableSource],
    dependants: &HashMap<VariableSource, Vec<VariableSource>>,
) -> Vec<VariableSource> {
    let candidates: HashSet<_> = remaining.iter().copied().collect();
    let Some(&start) = remaining.first() else {
        return Vec::new();
    };
    let mut path = vec![start];
    let mut current = start;
    loop {
        let next = dependants
            .get(&current)
            .into_iter()
            .flatten()
            .copied()
            .find(|n| candidates.contains(n));
        let Some(next) = next else {
            return path;
        };
        if let Some(pos) = path.iter().position(|v| *v == next) {
            let mut cycle = path.split_off(pos);
            cycle.push(next);
            return cycle;
        }
        path.push(next);
        current = next;
    }
}

#[cfg(test)]
mod tests {
    use std::any::TypeId;

    use super::*;
    use crate::domain::descriptor::{EntityDescriptor, VariableDescriptor};
    use crate::domain::variable::ShadowVariableKind::Custom;

    struct Task;
    struct Worker;

    fn descriptor(task: EntityDescriptor, worker: EntityDescriptor) -> SolutionDescriptor {
        SolutionDescriptor::new("Plan", TypeId::of::<()>())
            .with_entity(task)
            .with_entity(worker)
    }

    fn task() -> EntityDescriptor {
        EntityDescriptor::new("Task", TypeId::of::<Task>(), "tasks")
            .with_variable(VariableDescriptor::genuine("worker"))
    }

    #[test]
    fn test_chain_is_ordered() {
        let worker = EntityDescriptor::new("Worker", TypeId::of::<Worker>(), "workers")
            .with_variable(VariableDescriptor::shadow("overtime", Custom).with_source("Worker", "load"))
            .with_variable(VariableDescriptor::shadow("load", Custom).with_source("Task", "worker"));
        let graph = ShadowVariableGraph::build(&descriptor(task(), worker)).unwrap();

        let order: Vec<_> = graph.update_order().iter().map(|v| v.to_string()).collect();
        assert_eq!(order, vec!["Worker.load", "Worker.overtime"]);

        let affected: Vec<_> = graph
            .affected_by("Task", "worker")
            .iter()
            .map(|v| v.variable_name)
            .collect();
        assert_eq!(affected, vec!["load", "overtime"]);
        assert!(graph.affected_by("Worker", "overtime").is_empty());
    }

    #[test]
    fn test_cycle_is_config_error_naming_path() {
        let worker = EntityDescriptor::new("Worker", TypeId::of::<Worker>(), "workers")
            .with_variable(VariableDescriptor::shadow("a", Custom).with_source("Worker", "b"))
            .with_variable(VariableDescriptor::shadow("b", Custom).with_source("Worker", "a"));
        let err = ShadowVariableGraph::build(&descriptor(task(), worker)).unwrap_err();
        assert!(err.is_config());
        let message = err.to_string();
        assert!(message.contains("cycle"), "{message}");
        assert!(message.contains("Worker.a -> Worker.b -> Worker.a"), "{message}");
    }

    #[test]
    fn test_unknown_source() {
        let worker = EntityDescriptor::new("Worker", TypeId::of::<Worker>(), "workers")
            .with_variable(VariableDescriptor::shadow("load", Custom).with_source("Task", "room"));
        let err = ShadowVariableGraph::build(&descriptor(task(), worker)).unwrap_err();
        assert!(err.to_string().contains("Task.room"));
    }

    #[test]
    fn test_no_shadows() {
        let worker = EntityDescriptor::new("Worker", TypeId::of::<Worker>(), "workers");
        let graph = ShadowVariableGraph::build(&descriptor(task(), worker)).unwrap();
        assert!(graph.is_empty());
    }
}
