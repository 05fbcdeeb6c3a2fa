use clap::Parser;
use team_planner::planner::cli::{Cli, Command};
use team_planner::planner::workflow::{run_planning_workflow, run_scan_workflow};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Provider credentials may come from a local .env file.
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    match cli.command {
        Command::Scan(args) => run_scan_workflow(args.into()).await,
        Command::Run(args) => {
            args.validate()?;
            run_planning_workflow(args.into()).await
        }
    }
}
