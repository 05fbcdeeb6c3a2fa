//! Team instantiation against the factory registry.

use team_planner_sdk::{HireSpec, Worker, WorkerFactory};

use crate::error::PlanError;
use crate::planner::types::AggregatedAssignment;
use crate::registry::CapabilityRegistry;

/// Assembly rules resolved from configuration.
#[derive(Debug, Clone)]
pub struct AssemblyConfig {
    /// Prepend the bootstrap workers even when the plan did not select them.
    /// An explicit choice, off by default.
    pub prepend_bootstrap: bool,
    /// Workers prepended when `prepend_bootstrap` is set.
    pub bootstrap: Vec<String>,
    /// Role whose presence anywhere in the plan enables review mode.
    pub reviewer_role: String,
    /// Role always constructed with the replica count and review-mode flag.
    pub implementer_role: String,
    pub implementer_replicas: usize,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            prepend_bootstrap: false,
            bootstrap: vec!["ProductManager".to_string()],
            reviewer_role: "QaEngineer".to_string(),
            implementer_role: "Engineer".to_string(),
            implementer_replicas: 5,
        }
    }
}

/// Ordered sequence of instantiated workers.
#[derive(Default)]
pub struct Team {
    workers: Vec<Box<dyn Worker>>,
}

impl std::fmt::Debug for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Team")
            .field(
                "workers",
                &self.workers.iter().map(|w| w.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Team {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hire(&mut self, worker: Box<dyn Worker>) {
        self.workers.push(worker);
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Worker> {
        self.workers.iter().map(|worker| worker.as_ref())
    }

    /// Worker names in hire order.
    pub fn names(&self) -> Vec<&str> {
        self.workers.iter().map(|w| w.name()).collect()
    }
}

/// Instantiate the team for an aggregated plan.
///
/// Every referenced agent must be known to both the registry and the
/// factory before anything is constructed; a single unknown name aborts the
/// whole assembly and no partial team is returned.
pub fn assemble_team(
    plan: &[AggregatedAssignment],
    registry: &CapabilityRegistry,
    factory: &WorkerFactory,
    config: &AssemblyConfig,
) -> Result<Team, PlanError> {
    for assignment in plan {
        registry.lookup(&assignment.agent)?;
        if !factory.contains(&assignment.agent) {
            return Err(PlanError::UnknownWorker(assignment.agent.clone()));
        }
    }

    let review_mode = plan.iter().any(|a| a.agent == config.reviewer_role);
    let mut team = Team::new();

    if config.prepend_bootstrap {
        for name in &config.bootstrap {
            if plan.iter().any(|a| &a.agent == name) {
                continue;
            }
            let worker = factory
                .create(name, &hire_spec(name, config, review_mode))
                .ok_or_else(|| PlanError::UnknownWorker(name.clone()))?;
            team.hire(worker);
        }
    }

    for assignment in plan {
        let spec = hire_spec(&assignment.agent, config, review_mode);
        let worker = factory
            .create(&assignment.agent, &spec)
            .ok_or_else(|| PlanError::UnknownWorker(assignment.agent.clone()))?;
        team.hire(worker);
    }

    Ok(team)
}

fn hire_spec(name: &str, config: &AssemblyConfig, review_mode: bool) -> HireSpec {
    if name == config.implementer_role {
        HireSpec {
            replicas: config.implementer_replicas,
            review_mode,
        }
    } else {
        HireSpec::default()
    }
}
