//! Baton scheduler client
//!
//! Talks to an LSF-style batch scheduler through its command-line tools
//! (`bsub`, `bjobs`, `bkill`). Every interaction goes through the
//! [`CommandRunner`] boundary and is logged with its literal command line.
//!
//! # Example
//!
//! ```no_run
//! use baton_client::{LsfClient, SchedulerClient};
//! use baton_core::SchedulerParams;
//!
//! #[tokio::main]
//! async fn main() -> baton_client::Result<()> {
//!     let client = LsfClient::new();
//!     let job_id = client
//!         .submit("samtools index in.bam", "index", &SchedulerParams::default())
//!         .await?;
//!     println!("Submitted job {}", job_id);
//!     Ok(())
//! }
//! ```

pub mod command;
pub mod error;
pub mod flags;
mod kill;
mod listing;
mod lsf;
mod submit;

pub use command::{CommandOutput, CommandRunner, ShellRunner};
pub use error::{Result, SchedulerError};
pub use lsf::LsfClient;

use async_trait::async_trait;
use baton_core::{BackoffPolicy, JobId, KillOptions, SchedulerParams};
use std::collections::HashSet;
use tracing::debug;

/// Operations Baton needs from a batch scheduler
#[async_trait]
pub trait SchedulerClient: Send + Sync {
    /// Submits `command` under `job_name` and returns the scheduler's id.
    async fn submit(&self, command: &str, job_name: &str, params: &SchedulerParams)
    -> Result<JobId>;

    /// Lists the scheduler's unfinished jobs, by numeric id or by job name.
    async fn running_jobs(&self, by_name: bool) -> Result<HashSet<String>>;

    /// Kills jobs by numeric id or by job name.
    async fn kill(&self, targets: &[String], options: &KillOptions) -> Result<()>;

    /// Blocks until fewer than `max_concurrent` jobs are running.
    ///
    /// Sleeps on `policy` between listings. A `max_concurrent` of zero
    /// disables the cap. Listing failures are returned, not retried.
    async fn cap_at(&self, max_concurrent: usize, policy: BackoffPolicy) -> Result<()> {
        if max_concurrent == 0 {
            return Ok(());
        }

        let mut backoff = policy.schedule();
        loop {
            let running = self.running_jobs(false).await?.len();
            if running < max_concurrent {
                return Ok(());
            }

            let interval = backoff.current();
            debug!(
                "{} jobs running (cap {}), sleeping for {:?}",
                running, max_concurrent, interval
            );
            tokio::time::sleep(interval).await;
            backoff.advance();
        }
    }
}
