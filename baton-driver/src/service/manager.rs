//! Batch job manager

use baton_client::SchedulerClient;
use baton_core::{JobId, SchedulerParams};
use baton_ledger::JobLedger;
use std::sync::Arc;
use tracing::{error, info};

use crate::error::DriverResult;

/// Submission façade used by pipeline stages
#[derive(Clone)]
pub struct BatchJobManager {
    scheduler: Arc<dyn SchedulerClient>,
}

impl BatchJobManager {
    pub fn new(scheduler: Arc<dyn SchedulerClient>) -> Self {
        Self { scheduler }
    }

    /// Submits a job and returns the scheduler's id.
    pub async fn submit_job(
        &self,
        command: &str,
        job_name: &str,
        params: &SchedulerParams,
    ) -> DriverResult<JobId> {
        let job_id = self.scheduler.submit(command, job_name, params).await?;
        info!("Generated LSF job ID: {}", job_id);
        Ok(job_id)
    }

    /// Submits a job and records it in `ledger`.
    pub async fn submit_tracked(
        &self,
        ledger: &JobLedger,
        command: &str,
        job_name: &str,
        params: &SchedulerParams,
    ) -> DriverResult<JobId> {
        let job_id = self.submit_job(command, job_name, params).await?;

        if let Err(e) = ledger.append(&job_id).await {
            error!(
                "Job {} is running but could not be recorded in the ledger",
                job_id
            );
            return Err(e.into());
        }

        Ok(job_id)
    }
}
