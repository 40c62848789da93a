//! Job command handlers
//!
//! Submission plus the administrative commands that talk to the scheduler
//! directly.

use anyhow::Result;
use baton_client::SchedulerClient;
use baton_core::KillOptions;
use baton_driver::DriverContext;
use colored::*;

/// Submit one job and record it in the ledger
pub async fn submit_job(context: &DriverContext, name: &str, command: &str) -> Result<()> {
    let params = &context.config.scheduler;
    let job_id = context.submit(command, name, params).await?;

    println!(
        "{} {} ({})",
        "✓ Submitted job".green(),
        job_id.as_str().bold(),
        params.render_job_name(name).dimmed()
    );
    Ok(())
}

/// List the scheduler's running jobs
pub async fn list_running(scheduler: &dyn SchedulerClient, by_name: bool) -> Result<()> {
    let mut jobs: Vec<String> = scheduler.running_jobs(by_name).await?.into_iter().collect();
    jobs.sort();

    if jobs.is_empty() {
        println!("{}", "No running jobs found.".yellow());
    } else {
        println!("{}", format!("Found {} running job(s):", jobs.len()).bold());
        for job in jobs {
            println!("  {}", job);
        }
    }

    Ok(())
}

/// Kill jobs by id or name
pub async fn kill_jobs(
    scheduler: &dyn SchedulerClient,
    targets: &[String],
    user: Option<String>,
    queue: Option<String>,
) -> Result<()> {
    let options = KillOptions { user, queue };
    scheduler.kill(targets, &options).await?;

    println!(
        "{}",
        format!("✓ Kill requested for {} job(s)", targets.len()).green()
    );
    Ok(())
}
