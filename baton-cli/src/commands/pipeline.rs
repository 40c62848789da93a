//! Pipeline command handler

use anyhow::{Context, Result};
use baton_driver::{DriverContext, PipelineRunner, StagePlan};
use colored::*;
use std::path::Path;

/// Run a staged plan from a JSON file
pub async fn run_plan(context: &DriverContext, path: &Path) -> Result<()> {
    let plan = StagePlan::from_file(path)?;

    println!(
        "{}",
        format!(
            "Running plan {}: {} stage(s), {} job(s)",
            path.display(),
            plan.stages.len(),
            plan.job_count()
        )
        .bold()
    );

    let summary = PipelineRunner::new(context)
        .run(&plan)
        .await
        .with_context(|| format!("pipeline {} did not complete", path.display()))?;

    if summary.recovered > 0 {
        println!(
            "{}",
            format!(
                "Recovered {} job(s) left by a previous run",
                summary.recovered
            )
            .yellow()
        );
    }
    if !summary.skipped.is_empty() {
        println!(
            "{}",
            format!(
                "Skipped {} job(s) with existing output: {}",
                summary.skipped.len(),
                summary.skipped.join(", ")
            )
            .blue()
        );
    }
    println!(
        "{}",
        format!(
            "✓ Completed {} stage(s), {} job(s)",
            summary.stages,
            summary.submitted.len()
        )
        .green()
    );

    Ok(())
}
