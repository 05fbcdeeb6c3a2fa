//! Engineer: implements the system from the task list.
//!
//! The assembler always constructs the engineer with a replica count and the
//! resolved review-mode flag; in review mode it additionally reacts to code
//! review output.

use team_planner_sdk::{Action, Worker, WorkerCore};

pub struct Engineer {
    core: WorkerCore,
    replicas: usize,
    review_mode: bool,
}

impl Engineer {
    pub const GOAL: &'static str =
        "write elegant, readable, extensible, efficient code";

    pub fn new(replicas: usize, review_mode: bool) -> Self {
        let mut core = WorkerCore::new("Engineer");
        core.set_actions(vec![Action::WriteCode]);
        core.watch(vec![Action::WriteTasks]);
        if review_mode {
            core.watch(vec![Action::ReviewCode]);
        }
        Self {
            core,
            replicas,
            review_mode,
        }
    }

    pub fn review_mode(&self) -> bool {
        self.review_mode
    }
}

impl Worker for Engineer {
    fn core(&self) -> &WorkerCore {
        &self.core
    }

    fn skill(&self) -> Option<&str> {
        Some(Self::GOAL)
    }

    fn replicas(&self) -> usize {
        self.replicas
    }
}
