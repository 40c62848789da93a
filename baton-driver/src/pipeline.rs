//! Staged pipeline plans
//!
//! A plan is an ordered list of stages; each stage is a set of independent
//! batch jobs. All jobs of a stage are submitted, then the stage barrier
//! blocks until they have finished before the next stage starts.
//!
//! A job that names an `output` is skipped when that file already exists,
//! which lets a rerun resume after a crash or timeout. Relative outputs are
//! resolved against the workspace.
//!
//! ```json
//! {
//!   "stages": [
//!     { "name": "annotate", "jobs": [
//!         { "name": "chr1", "command": "annotate chr1.vcf.gz > chr1.out.vcf.gz",
//!           "output": "chr1.out.vcf.gz", "memory_mb": 16000 }
//!     ] }
//!   ]
//! }
//! ```

use baton_core::{JobId, SchedulerParams};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{info, warn};

use crate::context::DriverContext;
use crate::error::{DriverError, DriverResult};

/// Ordered list of stages
#[derive(Debug, Clone, Deserialize)]
pub struct StagePlan {
    pub stages: Vec<StageDefinition>,
}

/// One stage: jobs that may run concurrently
#[derive(Debug, Clone, Deserialize)]
pub struct StageDefinition {
    pub name: String,
    #[serde(default)]
    pub jobs: Vec<JobDefinition>,
}

/// One batch job, with optional per-job scheduler overrides
#[derive(Debug, Clone, Deserialize)]
pub struct JobDefinition {
    pub name: String,
    pub command: String,
    #[serde(default)]
    pub queue: Option<String>,
    #[serde(default)]
    pub memory_mb: Option<u64>,
    /// File the job produces; its existence marks the job as done
    #[serde(default)]
    pub output: Option<PathBuf>,
}

impl JobDefinition {
    /// Scheduler parameters for this job, starting from `defaults`
    pub fn params(&self, defaults: &SchedulerParams) -> SchedulerParams {
        let mut params = defaults.clone();
        if let Some(queue) = &self.queue {
            params.queue = queue.clone();
        }
        if let Some(memory_mb) = self.memory_mb {
            params.memory_mb = memory_mb;
        }
        params
    }
}

impl StagePlan {
    /// Loads and validates a plan file
    pub fn from_file(path: &Path) -> DriverResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| DriverError::PlanRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Parses and validates a plan
    pub fn from_json(json: &str) -> DriverResult<Self> {
        let plan: StagePlan = serde_json::from_str(json)?;
        plan.validate()?;
        Ok(plan)
    }

    pub fn validate(&self) -> DriverResult<()> {
        if self.stages.is_empty() {
            return Err(DriverError::InvalidPlan("plan has no stages".to_string()));
        }

        for (index, stage) in self.stages.iter().enumerate() {
            if stage.name.trim().is_empty() {
                return Err(DriverError::InvalidPlan(format!(
                    "stage {} has no name",
                    index + 1
                )));
            }
            for job in &stage.jobs {
                if job.name.trim().is_empty() {
                    return Err(DriverError::InvalidPlan(format!(
                        "stage '{}' has a job without a name",
                        stage.name
                    )));
                }
                if job.command.trim().is_empty() {
                    return Err(DriverError::InvalidPlan(format!(
                        "job '{}' in stage '{}' has an empty command",
                        job.name, stage.name
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn job_count(&self) -> usize {
        self.stages.iter().map(|stage| stage.jobs.len()).sum()
    }
}

/// What a completed run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub stages: usize,
    pub submitted: Vec<JobId>,
    /// Jobs left over from an interrupted run that were waited on first
    pub recovered: usize,
    /// Jobs whose output already existed
    pub skipped: Vec<String>,
}

/// Executes a [`StagePlan`] stage by stage
pub struct PipelineRunner<'a> {
    context: &'a DriverContext,
}

impl<'a> PipelineRunner<'a> {
    pub fn new(context: &'a DriverContext) -> Self {
        Self { context }
    }

    /// Runs every stage of `plan` in order.
    ///
    /// Jobs still in the ledger from an earlier, interrupted run are waited
    /// for before the first stage starts.
    pub async fn run(&self, plan: &StagePlan) -> DriverResult<RunSummary> {
        let barrier = self.context.barrier();
        let mut summary = RunSummary::default();

        let leftover = self.context.ledger.size().await?;
        if leftover > 0 {
            warn!(
                "Ledger holds {} job(s) from a previous run, waiting for them first",
                leftover
            );
            barrier.wait().await?;
            summary.recovered = leftover;
        }

        self.prepare_log_dir().await?;

        let total = plan.stages.len();
        for (index, stage) in plan.stages.iter().enumerate() {
            info!(
                "Stage {}/{}: {} ({} job(s))",
                index + 1,
                total,
                stage.name,
                stage.jobs.len()
            );

            for job in &stage.jobs {
                if let Some(output) = &job.output {
                    let output = self.context.config.workspace.join(output);
                    if output.exists() {
                        info!("Output already exists: {}", output.display());
                        touch(&output)?;
                        summary.skipped.push(job.name.clone());
                        continue;
                    }
                    create_parent_dir(&output).await?;
                }

                let params = job.params(&self.context.config.scheduler);
                let job_id = self.context.submit(&job.command, &job.name, &params).await?;
                summary.submitted.push(job_id);
            }

            barrier.wait().await?;
            summary.stages += 1;
            info!("Stage {} complete", stage.name);
        }

        Ok(summary)
    }

    /// Creates the directory the scheduler writes job logs into.
    async fn prepare_log_dir(&self) -> DriverResult<()> {
        let log_path = Path::new(&self.context.config.scheduler.output_log_path);
        create_parent_dir(log_path).await
    }
}

async fn create_parent_dir(path: &Path) -> DriverResult<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|source| DriverError::Directory {
                path: dir.to_path_buf(),
                source,
            })?;
    }
    Ok(())
}

/// Refreshes the modification time of an existing output.
fn touch(path: &Path) -> DriverResult<()> {
    info!("Updating output file modification time");
    File::options()
        .write(true)
        .open(path)
        .and_then(|file| file.set_modified(SystemTime::now()))
        .map_err(|source| DriverError::Output {
            path: path.to_path_buf(),
            source,
        })
}
