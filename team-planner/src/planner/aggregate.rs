//! Order-preserving per-worker merge of the raw plan.

use std::collections::HashMap;

use crate::planner::types::{AggregatedAssignment, SubtaskAssignment};

/// Joins merged subtask descriptions.
pub const DESCRIPTION_SEPARATOR: &str = ". ";

/// Merge repeated agent assignments into one record per agent.
///
/// Pure and deterministic: agents keep their first-appearance order, a
/// repeated agent appends its description to the existing record, and every
/// other field keeps its first-occurrence value (conflicts are not
/// reconciled). Aggregating an already-aggregated sequence is a no-op.
pub fn aggregate(raw: &[SubtaskAssignment]) -> Vec<AggregatedAssignment> {
    let mut merged: Vec<AggregatedAssignment> = Vec::new();
    let mut index_by_agent: HashMap<&str, usize> = HashMap::new();

    for subtask in raw {
        match index_by_agent.get(subtask.agent.as_str()) {
            Some(&position) => {
                let existing = &mut merged[position];
                existing.description.push_str(DESCRIPTION_SEPARATOR);
                existing.description.push_str(&subtask.subtask_description);
            }
            None => {
                index_by_agent.insert(subtask.agent.as_str(), merged.len());
                merged.push(AggregatedAssignment {
                    agent: subtask.agent.clone(),
                    description: subtask.subtask_description.clone(),
                    skill: subtask.skill.clone(),
                    actions: subtask.actions.clone(),
                    watch_items: subtask.watch_items.clone(),
                    trigger: subtask.trigger.clone(),
                });
            }
        }
    }

    merged
}
