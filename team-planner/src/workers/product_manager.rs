//! Product manager: turns the user requirement into a PRD.

use team_planner_sdk::{Action, Worker, WorkerCore};

pub struct ProductManager {
    core: WorkerCore,
}

impl ProductManager {
    pub const GOAL: &'static str =
        "efficiently create a successful product that meets market demands";

    pub fn new() -> Self {
        let mut core = WorkerCore::new("ProductManager");
        core.set_actions(vec![Action::WritePrd]);
        core.watch(vec![Action::UserRequirement]);
        Self { core }
    }
}

impl Default for ProductManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Worker for ProductManager {
    fn core(&self) -> &WorkerCore {
        &self.core
    }

    fn skill(&self) -> Option<&str> {
        Some(Self::GOAL)
    }
}
