//! Immutable name → capability map shared by the later pipeline stages.

use serde::Serialize;
use std::collections::HashMap;
use team_planner_sdk::CapabilityRecord;

use crate::error::PlanError;

/// Read-only registry built once per run from scan or manifest output.
///
/// Duplicate names are resolved last-wins; the scanner reports them as an
/// anomaly before the registry is built.
#[derive(Debug, Default)]
pub struct CapabilityRegistry {
    records: HashMap<String, CapabilityRecord>,
}

/// Compact per-worker view embedded in the plan synthesizer's prompt.
#[derive(Debug, Serialize)]
struct SnapshotEntry<'a> {
    agent: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    skill: Option<&'a str>,
    actions: Vec<&'a str>,
    watch: Vec<&'a str>,
}

impl CapabilityRegistry {
    /// Build the map in one pass.
    pub fn build(records: Vec<CapabilityRecord>) -> Self {
        let mut map = HashMap::with_capacity(records.len());
        for record in records {
            map.insert(record.name.clone(), record);
        }
        Self { records: map }
    }

    /// Look up a worker's capabilities, failing closed when absent.
    pub fn lookup(&self, name: &str) -> Result<&CapabilityRecord, PlanError> {
        self.records
            .get(name)
            .ok_or_else(|| PlanError::UnknownWorker(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Registered names, sorted for deterministic output.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.records.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// JSON array of capabilities, sorted by name, used as prompt context for
    /// the plan synthesizer.
    pub fn snapshot_json(&self) -> String {
        let mut entries: Vec<SnapshotEntry> = self
            .records
            .values()
            .map(|record| SnapshotEntry {
                agent: &record.name,
                skill: record.skill.as_deref(),
                actions: record.actions.iter().map(String::as_str).collect(),
                watch: record.watched.iter().map(String::as_str).collect(),
            })
            .collect();
        entries.sort_by(|a, b| a.agent.cmp(b.agent));
        serde_json::to_string_pretty(&entries).unwrap_or_else(|_| "[]".to_string())
    }
}
