//! CLI argument definitions for the team planner.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::scanner::manifest::DEFAULT_MANIFEST_FILE;

/// Default location of the bundled worker-definition sources, relative to
/// the workspace root.
pub const DEFAULT_WORKERS_DIR: &str = "team-planner/src/workers";

/// Default feedback log location.
pub const DEFAULT_FEEDBACK_LOG: &str = "feedback_log.json";

/// Turn a project idea into an ordered team of capability-bearing workers
///
/// Two subcommands make up the workflow:
///
/// - `scan`: inspect worker-definition sources offline and write the
///   capability manifest
/// - `run`: classify the idea, synthesize a subtask plan and assemble the
///   worker team from the manifest
#[derive(Parser, Debug)]
#[command(name = "team-planner")]
#[command(about = "Plan an ordered worker team for a project idea")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan worker-definition sources and write the capability manifest
    Scan(ScanArgs),
    /// Plan and assemble a team for a project idea
    Run(RunArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct ScanArgs {
    /// Directory tree containing worker-definition sources
    #[arg(long, value_name = "DIR", default_value = DEFAULT_WORKERS_DIR)]
    pub workers_dir: String,

    /// Where to write the manifest
    #[arg(long, value_name = "PATH", default_value = DEFAULT_MANIFEST_FILE)]
    pub out: String,
}

#[derive(clap::Args, Debug, Clone)]
pub struct RunArgs {
    /// Your project idea, such as 'Create a 2048 game.'
    #[arg(long, value_name = "TEXT")]
    pub idea: String,

    /// Path to the worker manifest produced by `scan`
    #[arg(long, value_name = "PATH", default_value = DEFAULT_MANIFEST_FILE)]
    pub manifest: String,

    /// Review every reasoning-service response and refine rejected queries
    /// in real time
    #[arg(long)]
    pub collect_feedback: bool,

    /// Maximum rejected refinement rounds per query before giving up
    #[arg(long, value_name = "N", default_value_t = 3)]
    pub max_refine_rounds: usize,

    /// Unconditionally prepend the bootstrap workers to the assembled team
    #[arg(long)]
    pub include_bootstrap: bool,

    /// Where to write the feedback log when collection is enabled
    #[arg(long, value_name = "PATH", default_value = DEFAULT_FEEDBACK_LOG)]
    pub feedback_log: String,
}

impl RunArgs {
    /// Validate arguments before the pipeline starts.
    pub fn validate(&self) -> Result<()> {
        if self.idea.trim().is_empty() {
            anyhow::bail!("--idea must not be empty");
        }
        if self.max_refine_rounds == 0 {
            anyhow::bail!("--max-refine-rounds must be at least 1");
        }
        Ok(())
    }
}
