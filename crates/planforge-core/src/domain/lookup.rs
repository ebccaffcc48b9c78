//! Planning-id index used to rebase moves between solution clones.

use std::any::Any;
use std::collections::HashMap;

use super::descriptor::SolutionDescriptor;
use crate::error::{PlanForgeError, Result};

#[derive(Debug, Clone)]
enum DescriptorIndex {
    /// Entities carry planning ids.
    Ids {
        ids: Vec<i64>,
        positions: HashMap<i64, usize>,
    },
    /// No ids: the position in the collection is the identity key.
    Positional { count: usize },
}

/// Maps `(descriptor_index, planning_id)` to an entity index for one clone.
#[derive(Debug, Clone, Default)]
pub struct LookUpIndex {
    descriptors: Vec<DescriptorIndex>,
}

impl LookUpIndex {
    /// Indexes every entity collection of `solution`.
    ///
    /// Fails with a domain model error when two entities of one type share a
    /// planning id.
    pub fn build(descriptor: &SolutionDescriptor, solution: &dyn Any) -> Result<Self> {
        let mut descriptors = Vec::with_capacity(descriptor.entity_descriptors.len());
        for entity in &descriptor.entity_descriptors {
            let index = match entity.planning_ids(solution) {
                Some(ids) => {
                    let mut positions = HashMap::with_capacity(ids.len());
                    for (position, id) in ids.iter().enumerate() {
                        if positions.insert(*id, position).is_some() {
                            return Err(PlanForgeError::DomainModel(format!(
                                "duplicate planning id {id} for entity type {}",
                                entity.type_name
                            )));
                        }
                    }
                    DescriptorIndex::Ids { ids, positions }
                }
                None => DescriptorIndex::Positional {
                    count: entity.entity_count(solution),
                },
            };
            descriptors.push(index);
        }
        Ok(Self { descriptors })
    }

    /// An index over `descriptor_count` collections keyed by position only.
    pub fn positional(counts: &[usize]) -> Self {
        Self {
            descriptors: counts
                .iter()
                .map(|&count| DescriptorIndex::Positional { count })
                .collect(),
        }
    }

    /// The planning id of the entity at `entity_index`.
    pub fn planning_id(&self, descriptor_index: usize, entity_index: usize) -> Result<i64> {
        match self.descriptor(descriptor_index)? {
            DescriptorIndex::Ids { ids, .. } => ids.get(entity_index).copied().ok_or_else(|| {
                PlanForgeError::DomainModel(format!(
                    "entity index {entity_index} out of range for descriptor {descriptor_index}"
                ))
            }),
            DescriptorIndex::Positional { count } if entity_index < *count => {
                Ok(entity_index as i64)
            }
            DescriptorIndex::Positional { .. } => Err(PlanForgeError::DomainModel(format!(
                "entity index {entity_index} out of range for descriptor {descriptor_index}"
            ))),
        }
    }

    /// The entity index holding `planning_id` in this clone.
    pub fn look_up(&self, descriptor_index: usize, planning_id: i64) -> Result<usize> {
        let found = match self.descriptor(descriptor_index)? {
            DescriptorIndex::Ids { positions, .. } => positions.get(&planning_id).copied(),
            DescriptorIndex::Positional { count } => usize::try_from(planning_id)
                .ok()
                .filter(|i| i < count),
        };
        found.ok_or_else(|| {
            PlanForgeError::DomainModel(format!(
                "no working entity with planning id {planning_id} for descriptor {descriptor_index}"
            ))
        })
    }

    fn descriptor(&self, descriptor_index: usize) -> Result<&DescriptorIndex> {
        self.descriptors.get(descriptor_index).ok_or_else(|| {
            PlanForgeError::DomainModel(format!("unknown entity descriptor {descriptor_index}"))
        })
    }
}
