//! Common test utilities for planner tests

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Mutex;

use team_planner::feedback::{Query, Reviewer, Verdict};
use team_planner::provider::{ProviderError, ReasoningService};
use team_planner::registry::CapabilityRegistry;
use team_planner_sdk::{CapabilityRecord, SourceLocation};

/// Create a temporary directory for testing
pub fn create_temp_dir(name: &str) -> PathBuf {
    let temp_dir = std::env::temp_dir().join(format!("team_planner_test_{}", name));
    std::fs::remove_dir_all(&temp_dir).ok();
    std::fs::create_dir_all(&temp_dir).unwrap();
    temp_dir
}

/// Clean up temporary directory
pub fn cleanup_temp_dir(path: &PathBuf) {
    if path.exists() {
        std::fs::remove_dir_all(path).ok();
    }
}

/// Reasoning service that replays scripted responses and records every
/// prompt it is asked.
pub struct ScriptedService {
    responses: Mutex<Vec<String>>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedService {
    pub fn new(responses: &[&str]) -> Self {
        Self {
            responses: Mutex::new(responses.iter().rev().map(|s| s.to_string()).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn seen_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReasoningService for ScriptedService {
    async fn ask(&self, prompt: &str) -> Result<String, ProviderError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop()
            .ok_or(ProviderError::EmptyCompletion)
    }
}

/// Reviewer that replays scripted verdicts.
pub struct ScriptedReviewer {
    verdicts: Vec<Verdict>,
}

impl ScriptedReviewer {
    pub fn new(verdicts: Vec<Verdict>) -> Self {
        Self { verdicts }
    }
}

impl Reviewer for ScriptedReviewer {
    fn review(&mut self, _query: &Query, _response: &str) -> anyhow::Result<Verdict> {
        Ok(self.verdicts.remove(0))
    }
}

pub fn reject(correction: &str) -> Verdict {
    Verdict {
        approved: false,
        correction: Some(correction.to_string()),
    }
}

pub fn approve() -> Verdict {
    Verdict {
        approved: true,
        correction: None,
    }
}

/// Capability record fixture.
pub fn capability(name: &str, actions: &[&str], watched: &[&str]) -> CapabilityRecord {
    CapabilityRecord {
        name: name.to_string(),
        skill: Some(format!("{} skill", name)),
        actions: actions.iter().map(|s| s.to_string()).collect(),
        watched: watched.iter().map(|s| s.to_string()).collect(),
        source: SourceLocation {
            file: PathBuf::from("fixture.rs"),
            line: 1,
        },
    }
}

/// Registry with a two-worker trigger chain: ProductManager then Architect.
pub fn scenario_registry() -> CapabilityRegistry {
    CapabilityRegistry::build(vec![
        capability("ProductManager", &["WritePrd"], &["UserRequirement"]),
        capability("Architect", &["WriteDesign"], &["WritePrd"]),
    ])
}

/// The matching two-subtask plan payload.
pub const SCENARIO_PLAN: &str = r#"[
    {
        "subtask_number": 1,
        "subtask_description": "Write the PRD",
        "agent": "ProductManager",
        "skill": "ProductManager skill",
        "actions": ["WritePrd"],
        "watch_items": ["UserRequirement"],
        "trigger": "user request"
    },
    {
        "subtask_number": 2,
        "subtask_description": "Design the system",
        "agent": "Architect",
        "skill": "Architect skill",
        "actions": ["WriteDesign"],
        "watch_items": ["WritePrd"],
        "trigger": "PRD available"
    }
]"#;
