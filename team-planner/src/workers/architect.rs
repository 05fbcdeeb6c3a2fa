//! Architect: designs the system once a PRD exists.

use team_planner_sdk::{Action, Worker, WorkerCore};

pub struct Architect {
    core: WorkerCore,
}

impl Architect {
    pub const GOAL: &'static str =
        "design a concise, usable, complete software system";

    pub fn new() -> Self {
        let mut core = WorkerCore::new("Architect");
        core.set_actions([Action::WriteDesign]);
        core.watch([Action::WritePrd]);
        Self { core }
    }
}

impl Default for Architect {
    fn default() -> Self {
        Self::new()
    }
}

impl Worker for Architect {
    fn core(&self) -> &WorkerCore {
        &self.core
    }

    fn skill(&self) -> Option<&str> {
        Some(Self::GOAL)
    }
}
