//! Ledger command handlers

use anyhow::Result;
use baton_driver::DriverContext;
use colored::*;

/// Run the stage barrier on the current ledger
pub async fn wait(context: &DriverContext) -> Result<()> {
    let drained = context.barrier().wait().await?;

    if drained.was_empty() {
        println!("{}", "No pending jobs.".yellow());
    } else {
        println!(
            "{}",
            format!(
                "✓ All jobs finished after {} check(s) ({:.1}s)",
                drained.checks,
                drained.waited.as_secs_f64()
            )
            .green()
        );
    }

    Ok(())
}

/// List the jobs recorded in the ledger
pub async fn list_pending(context: &DriverContext) -> Result<()> {
    let pending = context.ledger.list().await?;

    if pending.is_empty() {
        println!("{}", "No pending jobs.".yellow());
    } else {
        println!("{}", format!("{} pending job(s):", pending.len()).bold());
        for job_id in pending {
            println!("  {}", job_id);
        }
    }

    Ok(())
}

/// Clear the ledger without polling
pub async fn clear(context: &DriverContext) -> Result<()> {
    let removed = context.ledger.clear().await?;

    println!(
        "{}",
        format!("✓ Removed {} job(s) from the ledger", removed.len()).green()
    );
    for job_id in removed {
        println!("  {}", job_id.to_string().dimmed());
    }

    Ok(())
}
