use team_planner_sdk::{Action, Worker, WorkerCore};

pub struct ProjectManager {
    core: WorkerCore,
}

impl ProjectManager {
    pub const DESC: &'static str =
        "break down tasks according to PRD and design, generate a task list and analyze dependencies";

    pub fn new() -> Self {
        let mut core = WorkerCore::new("ProjectManager");
        core.set_actions(vec![Action::WriteTasks]);
        core.watch(vec![Action::WriteDesign]);
        Self { core }
    }
}

impl Default for ProjectManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Worker for ProjectManager {
    fn core(&self) -> &WorkerCore {
        &self.core
    }

    fn skill(&self) -> Option<&str> {
        Some(Self::DESC)
    }
}
