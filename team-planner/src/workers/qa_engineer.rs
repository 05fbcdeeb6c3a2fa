use team_planner_sdk::{Action, Worker, WorkerCore};

pub struct QaEngineer {
    core: WorkerCore,
}

impl QaEngineer {
    pub const GOAL: &'static str =
        "test the system and report defects before release";

    pub fn new() -> Self {
        let mut core = WorkerCore::new("QaEngineer");
        core.set_actions([Action::RunTests, Action::ReviewCode]);
        core.watch([Action::WriteCode]);
        Self { core }
    }
}

impl Default for QaEngineer {
    fn default() -> Self {
        Self::new()
    }
}

impl Worker for QaEngineer {
    fn core(&self) -> &WorkerCore {
        &self.core
    }

    fn skill(&self) -> Option<&str> {
        Some(Self::GOAL)
    }
}
