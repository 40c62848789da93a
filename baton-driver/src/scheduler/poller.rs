//! Completion poller
//!
//! One call to [`CompletionPoller::wait`] is one poll session: it lists the
//! scheduler's unfinished jobs until none of the target jobs appears, sleeping
//! on an additive backoff between listings. The time slept (the kill-timer)
//! is bounded by the caller's timeout; exceeding it is fatal for the run and
//! the outstanding jobs are left running for an operator to inspect.

use baton_client::SchedulerClient;
use baton_core::{BackoffPolicy, Drained, JobId};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{DriverError, DriverResult};

/// Result of a single listing within a session
enum Check {
    Drained,
    Outstanding(Vec<JobId>),
    Failed,
}

/// Waits for job sets to drain from the scheduler
#[derive(Clone)]
pub struct CompletionPoller {
    scheduler: Arc<dyn SchedulerClient>,
    backoff: BackoffPolicy,
}

impl CompletionPoller {
    /// Creates a new completion poller
    pub fn new(scheduler: Arc<dyn SchedulerClient>, backoff: BackoffPolicy) -> Self {
        Self { scheduler, backoff }
    }

    /// Blocks until none of `targets` is listed by the scheduler.
    ///
    /// Returns immediately, without listing, when `targets` is empty. A
    /// listing failure counts as an unsuccessful check so the timeout still
    /// bounds the session.
    ///
    /// # Errors
    /// [`DriverError::PollTimeout`] once the kill-timer reaches `timeout`
    /// while target jobs are still listed. If the last listing failed, every
    /// target is reported as outstanding.
    pub async fn wait(&self, targets: &[JobId], timeout: Duration) -> DriverResult<Drained> {
        if targets.is_empty() {
            debug!("No jobs to poll for");
            return Ok(Drained::empty());
        }

        info!(
            "Entering completion poller for {} job(s) (timeout: {:?})",
            targets.len(),
            timeout
        );

        let mut backoff = self.backoff.schedule();
        let mut kill_timer = Duration::ZERO;
        let mut checks = 1;
        let mut check = self.check(targets).await;

        loop {
            let outstanding = match check {
                Check::Drained => {
                    info!("Exiting completion poller after {:?}", kill_timer);
                    return Ok(Drained {
                        checks,
                        waited: kill_timer,
                    });
                }
                Check::Outstanding(outstanding) => outstanding,
                Check::Failed => targets.to_vec(),
            };

            if kill_timer >= timeout {
                return Err(DriverError::PollTimeout {
                    outstanding,
                    waited: kill_timer,
                    timeout,
                });
            }

            let interval = backoff.current();
            debug!(
                "Sleeping for {:?} (kill_timer: {:?}) [timeout={:?}]",
                interval, kill_timer, timeout
            );
            tokio::time::sleep(interval).await;
            kill_timer += interval;
            backoff.advance();

            check = self.check(targets).await;
            checks += 1;
        }
    }

    async fn check(&self, targets: &[JobId]) -> Check {
        let active: HashSet<String> = match self.scheduler.running_jobs(false).await {
            Ok(active) => active,
            Err(e) => {
                warn!("Job listing failed, will retry: {}", e);
                return Check::Failed;
            }
        };

        debug!("There are {} active jobs running", active.len());

        let outstanding: Vec<JobId> = targets
            .iter()
            .filter(|id| active.contains(id.as_str()))
            .cloned()
            .collect();

        if outstanding.is_empty() {
            Check::Drained
        } else {
            debug!("{} target job(s) still running", outstanding.len());
            Check::Outstanding(outstanding)
        }
    }
}
