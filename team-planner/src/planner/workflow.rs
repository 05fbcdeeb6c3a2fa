//! Scan and run workflow entry points.
//!
//! The run pipeline executes its stages strictly sequentially: classify,
//! synthesize, aggregate, assemble. Each stage's output is the next stage's
//! required input; the only suspension points are reasoning-service calls and
//! the reviewer channel inside the refinement loop.

use anyhow::{Context, Result};
use std::path::PathBuf;

use team_planner_sdk::{
    log_file_saved, log_found, log_info, log_phase_complete, log_phase_complete_console,
    log_phase_failed, log_phase_start, log_phase_start_console, log_state_file, log_warning,
};

use crate::error::PlanError;
use crate::feedback::{ConsoleReviewer, FeedbackSession};
use crate::planner::aggregate::aggregate;
use crate::planner::assemble::{assemble_team, AssemblyConfig, Team};
use crate::planner::classify::classify_idea;
use crate::planner::cli::{RunArgs, ScanArgs};
use crate::planner::synthesize::synthesize_plan;
use crate::planner::types::{AggregatedAssignment, Domain};
use crate::planner::utils::ellipsize;
use crate::provider::{OpenAiCompatClient, ReasoningService};
use crate::registry::CapabilityRegistry;
use crate::scanner::manifest::{load_manifest, save_manifest, Manifest};
use crate::scanner::scan_workers;
use crate::workers;

const TOTAL_PHASES: usize = 4;

/// Scan configuration derived from CLI arguments.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub workers_dir: PathBuf,
    pub out: PathBuf,
}

impl From<ScanArgs> for ScanConfig {
    fn from(args: ScanArgs) -> Self {
        Self {
            workers_dir: PathBuf::from(args.workers_dir),
            out: PathBuf::from(args.out),
        }
    }
}

/// Run configuration derived from CLI arguments.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub idea: String,
    pub manifest_path: PathBuf,
    pub collect_feedback: bool,
    pub max_refine_rounds: usize,
    pub include_bootstrap: bool,
    pub feedback_log_path: PathBuf,
}

impl From<RunArgs> for RunConfig {
    fn from(args: RunArgs) -> Self {
        Self {
            idea: args.idea,
            manifest_path: PathBuf::from(args.manifest),
            collect_feedback: args.collect_feedback,
            max_refine_rounds: args.max_refine_rounds,
            include_bootstrap: args.include_bootstrap,
            feedback_log_path: PathBuf::from(args.feedback_log),
        }
    }
}

/// Offline step: scan worker sources and persist the capability manifest.
pub async fn run_scan_workflow(config: ScanConfig) -> Result<()> {
    log_info!(format!(
        "Scanning worker sources under {}",
        config.workers_dir.display()
    ));

    let report = scan_workers(&config.workers_dir).await?;
    for failure in &report.failures {
        log_warning!("Skipped {}: {}", failure.path.display(), failure.message);
    }
    for name in &report.duplicates {
        log_warning!("Duplicate worker definition {:?}; keeping the last one", name);
    }
    log_found!(report.records.len(), "worker definitions");

    let manifest = Manifest::new(report.records);
    save_manifest(&manifest, &config.out)?;
    log_file_saved!(config.out.display());
    log_state_file!(
        0,
        config.out.display().to_string(),
        "Worker capability manifest"
    );
    Ok(())
}

/// Plan and assemble a team for the configured idea.
pub async fn run_planning_workflow(config: RunConfig) -> Result<()> {
    let records = load_manifest(&config.manifest_path)?;
    let registry = CapabilityRegistry::build(records);
    if registry.is_empty() {
        anyhow::bail!(
            "Worker manifest {} is empty; re-run `team-planner scan`",
            config.manifest_path.display()
        );
    }
    log_found!(registry.len(), "worker capabilities");

    let service =
        OpenAiCompatClient::from_env().context("Failed to configure the reasoning service")?;
    let mut session = FeedbackSession::new(
        config.collect_feedback,
        config.max_refine_rounds,
        Box::new(ConsoleReviewer),
    );
    log_info!("Planning run {}", session.run_id());

    let assembly = AssemblyConfig {
        prepend_bootstrap: config.include_bootstrap,
        ..Default::default()
    };
    let outcome = plan_team(&service, &mut session, &config.idea, &registry, &assembly).await;

    // The append-only log is flushed even when a later stage failed.
    if session.is_enabled() {
        session.flush(&config.feedback_log_path)?;
        log_file_saved!(config.feedback_log_path.display());
    }

    outcome.map(|team| {
        print_team_roster(&team);
    })
}

/// The pipeline core: classify, synthesize, aggregate, assemble.
///
/// Collaborators are injected so the whole flow can run against any
/// reasoning service and reviewer.
pub async fn plan_team(
    service: &dyn ReasoningService,
    session: &mut FeedbackSession,
    idea: &str,
    registry: &CapabilityRegistry,
    assembly: &AssemblyConfig,
) -> Result<Team> {
    // Phase 1: classification. The raw label comes back verbatim; this
    // boundary is where exact-match validation happens.
    log_phase_start_console!(
        1,
        "Task Classifier",
        "Classify the idea against the supported domains"
    );
    log_phase_start!(1, "Task Classifier", TOTAL_PHASES);
    let label = classify_idea(service, session, idea).await?;
    let domain = match Domain::from_label(&label) {
        Some(domain) => domain,
        None => {
            log_phase_failed!(1, "Task Classifier", format!("unsupported domain {:?}", label));
            return Err(PlanError::UnsupportedDomain(label).into());
        }
    };
    log_info!("Classified idea as a {:?} task", domain.as_str());
    log_phase_complete!(1, "Task Classifier");
    log_phase_complete_console!(1);

    // Phase 2: plan synthesis
    log_phase_start_console!(
        2,
        "Plan Synthesizer",
        "Request an ordered subtask plan constrained to known workers"
    );
    log_phase_start!(2, "Plan Synthesizer", TOTAL_PHASES);
    let raw_plan = synthesize_plan(service, session, idea, domain, registry).await?;
    log_found!(raw_plan.len(), "subtask assignments");
    log_phase_complete!(2, "Plan Synthesizer");
    log_phase_complete_console!(2);

    // Phase 3: aggregation
    log_phase_start!(3, "Plan Aggregator", TOTAL_PHASES);
    let aggregated = aggregate(&raw_plan);
    print_plan_overview(idea, domain, &aggregated);
    log_phase_complete!(3, "Plan Aggregator");

    // Phase 4: assembly
    log_phase_start!(4, "Team Assembler", TOTAL_PHASES);
    let factory = workers::builtin_factory();
    let team = assemble_team(&aggregated, registry, &factory, assembly)?;
    log_phase_complete!(4, "Team Assembler");

    Ok(team)
}

fn print_plan_overview(idea: &str, domain: Domain, plan: &[AggregatedAssignment]) {
    println!("\n{}", "=".repeat(80));
    println!("Recommended agents");
    println!("{}", "=".repeat(80));
    println!("Idea   : {}", idea);
    println!("Domain : {}", domain);
    println!("{}", "-".repeat(80));
    for (index, assignment) in plan.iter().enumerate() {
        println!("{}. {}", index + 1, assignment.agent);
        println!("   Description : {}", ellipsize(&assignment.description, 70));
        println!("   Skill       : {}", ellipsize(&assignment.skill, 70));
        println!("   Actions     : {}", assignment.actions.join(", "));
        println!("   Watch       : {}", assignment.watch_items.join(", "));
        println!("   Trigger     : {}", ellipsize(&assignment.trigger, 70));
        println!("{}", "-".repeat(80));
    }
}

fn print_team_roster(team: &Team) {
    println!("\nAssembled team ({} workers):", team.len());
    for worker in team.iter() {
        let replicas = if worker.replicas() > 1 {
            format!(" x{}", worker.replicas())
        } else {
            String::new()
        };
        println!("  - {}{}", worker.name(), replicas);
    }
}
