//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod job;
mod ledger;
mod pipeline;

use anyhow::{Context, Result};
use baton_client::{LsfClient, SchedulerClient};
use baton_driver::DriverContext;
use clap::Subcommand;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::config::GlobalArgs;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Submit one job and record it in the ledger
    Submit {
        /// Job name, substituted into the job name template
        #[arg(long)]
        name: String,

        /// Shell command the job runs
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
    /// Wait for every job in the ledger, then clear it
    Wait,
    /// List the jobs recorded in the ledger
    Pending,
    /// Clear the ledger without waiting
    Clear,
    /// List the scheduler's running jobs
    Running {
        /// Show job names instead of ids
        #[arg(long)]
        names: bool,
    },
    /// Kill jobs by id or name
    Kill {
        /// Job ids, or job names
        #[arg(required = true)]
        targets: Vec<String>,

        /// Only kill jobs owned by this user
        #[arg(long, short)]
        user: Option<String>,

        /// Only kill jobs in this queue
        #[arg(long, short)]
        queue: Option<String>,
    },
    /// Run a staged pipeline plan
    Run {
        /// JSON plan file
        #[arg(long)]
        plan: PathBuf,
    },
}

/// Handle a CLI command
///
/// Commands that only talk to the scheduler never open the ledger.
pub async fn handle_command(command: Commands, args: &GlobalArgs) -> Result<()> {
    let scheduler: Arc<dyn SchedulerClient> = Arc::new(LsfClient::new());

    match command {
        Commands::Submit { name, command } => {
            let context = open_context(args, scheduler).await?;
            job::submit_job(&context, &name, &command.join(" ")).await
        }
        Commands::Wait => ledger::wait(&open_context(args, scheduler).await?).await,
        Commands::Pending => ledger::list_pending(&open_context(args, scheduler).await?).await,
        Commands::Clear => ledger::clear(&open_context(args, scheduler).await?).await,
        Commands::Running { names } => job::list_running(scheduler.as_ref(), names).await,
        Commands::Kill {
            targets,
            user,
            queue,
        } => job::kill_jobs(scheduler.as_ref(), &targets, user, queue).await,
        Commands::Run { plan } => {
            let context = open_context(args, scheduler).await?;
            pipeline::run_plan(&context, &plan).await
        }
    }
}

async fn open_context(
    args: &GlobalArgs,
    scheduler: Arc<dyn SchedulerClient>,
) -> Result<DriverContext> {
    let config = args.driver_config()?;
    info!("Workspace : {}", config.workspace.display());
    info!("LSF Job DB : {}", config.ledger_path.display());
    let ledger_path = config.ledger_path.clone();
    DriverContext::open(config, scheduler)
        .await
        .with_context(|| format!("failed to open ledger {}", ledger_path.display()))
}
