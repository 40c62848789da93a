//! Run context
//!
//! Everything one pipeline run needs, created once at startup and passed to
//! the components that need it:
//! - Configuration
//! - The ledger of pending jobs
//! - The scheduler client

use baton_client::SchedulerClient;
use baton_core::{JobId, SchedulerParams};
use baton_ledger::JobLedger;
use std::sync::Arc;

use crate::config::DriverConfig;
use crate::error::DriverResult;
use crate::scheduler::CompletionPoller;
use crate::service::{BatchJobManager, StageBarrier};

/// Context shared across one pipeline run
pub struct DriverContext {
    pub config: DriverConfig,
    pub ledger: JobLedger,
    pub scheduler: Arc<dyn SchedulerClient>,
}

impl DriverContext {
    /// Opens the ledger named by `config` and assembles the context
    pub async fn open(
        config: DriverConfig,
        scheduler: Arc<dyn SchedulerClient>,
    ) -> DriverResult<Self> {
        let ledger = JobLedger::open(&config.ledger_path).await?;
        Ok(Self {
            config,
            ledger,
            scheduler,
        })
    }

    pub fn manager(&self) -> BatchJobManager {
        BatchJobManager::new(Arc::clone(&self.scheduler))
    }

    pub fn poller(&self) -> CompletionPoller {
        CompletionPoller::new(Arc::clone(&self.scheduler), self.config.backoff)
    }

    pub fn barrier(&self) -> StageBarrier {
        StageBarrier::new(
            self.poller(),
            self.ledger.clone(),
            self.config.poll_timeout,
            self.config.grace_period,
        )
    }

    /// Submits a job and records it, waiting first for a free slot when a
    /// concurrency cap is configured.
    pub async fn submit(
        &self,
        command: &str,
        job_name: &str,
        params: &SchedulerParams,
    ) -> DriverResult<JobId> {
        if let Some(max_jobs) = self.config.max_concurrent_jobs {
            self.scheduler.cap_at(max_jobs, self.config.backoff).await?;
        }

        self.manager()
            .submit_tracked(&self.ledger, command, job_name, params)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeScheduler;

    #[tokio::test]
    async fn test_open_uses_configured_ledger_path() {
        let dir = tempfile::tempdir().unwrap();
        let config = DriverConfig::new(dir.path());
        let context = DriverContext::open(config, Arc::new(FakeScheduler::default()))
            .await
            .unwrap();

        assert_eq!(context.ledger.path(), dir.path().join(".job_queue.db"));
    }

    #[tokio::test]
    async fn test_submit_checks_cap_before_submitting() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = DriverConfig::new(dir.path());
        config.max_concurrent_jobs = Some(2);
        let scheduler = Arc::new(FakeScheduler::new(vec!["777"], vec![Some(vec!["1"])]));
        let context = DriverContext::open(config, scheduler.clone()).await.unwrap();

        let params = context.config.scheduler.clone();
        let job_id = context.submit("true", "probe", &params).await.unwrap();

        assert_eq!(job_id, JobId::from("777"));
        assert_eq!(scheduler.listing_calls(), 1);
        assert_eq!(context.ledger.list().await.unwrap(), vec![job_id]);
    }
}
