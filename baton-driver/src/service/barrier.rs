//! Stage barrier
//!
//! Runs at every stage boundary: polls the ledger's jobs to completion,
//! clears the ledger, then pauses so that outputs written by the finished
//! jobs become visible on the shared filesystem.

use baton_core::Drained;
use baton_ledger::JobLedger;
use std::time::Duration;
use tracing::info;

use crate::error::DriverResult;
use crate::scheduler::CompletionPoller;

/// Blocks a pipeline until the jobs recorded in the ledger have finished
#[derive(Clone)]
pub struct StageBarrier {
    poller: CompletionPoller,
    ledger: JobLedger,
    timeout: Duration,
    grace_period: Duration,
}

impl StageBarrier {
    pub fn new(
        poller: CompletionPoller,
        ledger: JobLedger,
        timeout: Duration,
        grace_period: Duration,
    ) -> Self {
        Self {
            poller,
            ledger,
            timeout,
            grace_period,
        }
    }

    /// Waits for every job in the ledger, then clears those jobs.
    ///
    /// Jobs recorded while the poll is running are not part of this wait and
    /// stay in the ledger. On timeout the ledger is left untouched so a later
    /// run (or an operator) can still see which jobs were outstanding.
    pub async fn wait(&self) -> DriverResult<Drained> {
        let snapshot = self.ledger.snapshot().await?;
        let targets = &snapshot.jobs;
        if targets.is_empty() {
            info!("There are no batch jobs to wait for");
            return Ok(Drained::empty());
        }

        info!("Waiting for {} batch job(s):", targets.len());
        for job_id in targets {
            info!("  - {}", job_id);
        }

        let drained = self.poller.wait(targets, self.timeout).await?;
        self.ledger.clear_snapshot(&snapshot).await?;

        if !self.grace_period.is_zero() {
            info!(
                "Pausing {:?} for the filesystem to catch up",
                self.grace_period
            );
            tokio::time::sleep(self.grace_period).await;
        }

        Ok(drained)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DriverError;
    use crate::testing::FakeScheduler;
    use async_trait::async_trait;
    use baton_client::{Result as ClientResult, SchedulerClient};
    use baton_core::{BackoffPolicy, JobId, KillOptions, SchedulerParams};
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    fn fast_backoff() -> BackoffPolicy {
        BackoffPolicy::new(
            Duration::from_millis(5),
            Duration::from_millis(5),
            Duration::from_millis(20),
        )
    }

    async fn barrier(
        scheduler: Arc<FakeScheduler>,
        timeout: Duration,
    ) -> (tempfile::TempDir, JobLedger, StageBarrier) {
        let dir = tempfile::tempdir().unwrap();
        let ledger = JobLedger::open(dir.path().join(".job_queue.db"))
            .await
            .unwrap();
        let poller = CompletionPoller::new(scheduler, fast_backoff());
        let barrier = StageBarrier::new(poller, ledger.clone(), timeout, Duration::ZERO);
        (dir, ledger, barrier)
    }

    #[tokio::test]
    async fn test_drained_stage_clears_ledger() {
        let scheduler = Arc::new(FakeScheduler::new(
            vec![],
            vec![Some(vec!["777", "888"]), Some(vec!["888"])],
        ));
        let (_dir, ledger, barrier) = barrier(scheduler.clone(), Duration::from_secs(10)).await;
        ledger.append(&JobId::from("777")).await.unwrap();

        let drained = barrier.wait().await.unwrap();

        assert_eq!(drained.checks, 2);
        assert_eq!(ledger.size().await.unwrap(), 0);
        assert_eq!(scheduler.listing_calls(), 2);
    }

    /// Scheduler whose first listing coincides with another submitter
    /// recording job 999 in the same ledger file.
    struct LateSubmission {
        other: JobLedger,
        listings: Mutex<usize>,
    }

    #[async_trait]
    impl SchedulerClient for LateSubmission {
        async fn submit(&self, _: &str, _: &str, _: &SchedulerParams) -> ClientResult<JobId> {
            unreachable!("the barrier never submits")
        }

        async fn running_jobs(&self, _by_name: bool) -> ClientResult<HashSet<String>> {
            let first = {
                let mut listings = self.listings.lock().unwrap();
                *listings += 1;
                *listings == 1
            };
            if first {
                self.other.append(&JobId::from("999")).await.unwrap();
                Ok(["777", "999"].into_iter().map(String::from).collect())
            } else {
                Ok(["999"].into_iter().map(String::from).collect())
            }
        }

        async fn kill(&self, _: &[String], _: &KillOptions) -> ClientResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_jobs_recorded_during_poll_stay_in_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".job_queue.db");
        let ledger = JobLedger::open(&path).await.unwrap();
        ledger.append(&JobId::from("777")).await.unwrap();

        let scheduler = Arc::new(LateSubmission {
            other: JobLedger::open(&path).await.unwrap(),
            listings: Mutex::new(0),
        });
        let barrier = StageBarrier::new(
            CompletionPoller::new(scheduler, fast_backoff()),
            ledger.clone(),
            Duration::from_secs(10),
            Duration::ZERO,
        );

        let drained = barrier.wait().await.unwrap();

        assert_eq!(drained.checks, 2);
        assert_eq!(ledger.list().await.unwrap(), vec![JobId::from("999")]);
    }

    #[tokio::test]
    async fn test_empty_ledger_is_a_no_op() {
        let scheduler = Arc::new(FakeScheduler::default());
        let (_dir, _ledger, barrier) = barrier(scheduler.clone(), Duration::from_secs(10)).await;

        let drained = barrier.wait().await.unwrap();

        assert!(drained.was_empty());
        assert_eq!(scheduler.listing_calls(), 0);
    }

    #[tokio::test]
    async fn test_timeout_keeps_ledger_contents() {
        let scheduler = Arc::new(FakeScheduler::new(vec![], vec![Some(vec!["777"])]));
        let (_dir, ledger, barrier) = barrier(scheduler, Duration::from_millis(30)).await;
        ledger.append(&JobId::from("777")).await.unwrap();

        let err = barrier.wait().await.unwrap_err();

        assert!(matches!(err, DriverError::PollTimeout { .. }));
        assert_eq!(ledger.list().await.unwrap(), vec![JobId::from("777")]);
    }

    #[tokio::test]
    async fn test_grace_period_is_applied_after_drain() {
        let scheduler = Arc::new(FakeScheduler::new(vec![], vec![Some(vec![])]));
        let dir = tempfile::tempdir().unwrap();
        let ledger = JobLedger::open(dir.path().join(".job_queue.db"))
            .await
            .unwrap();
        ledger.append(&JobId::from("777")).await.unwrap();
        let barrier = StageBarrier::new(
            CompletionPoller::new(scheduler, fast_backoff()),
            ledger.clone(),
            Duration::from_secs(10),
            Duration::from_millis(50),
        );

        let started = std::time::Instant::now();
        barrier.wait().await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(50));
        assert!(ledger.is_empty().await.unwrap());
    }
}
