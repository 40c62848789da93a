//! Error types for the pipeline driver

use baton_client::SchedulerError;
use baton_core::JobId;
use baton_ledger::LedgerError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for driver operations
pub type DriverResult<T> = Result<T, DriverError>;

/// Errors that can abort a pipeline run
#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Jobs were still listed by the scheduler when the kill-timer reached
    /// the timeout. Fatal for the run.
    #[error(
        "{} batch job(s) still running past the timeout of {}s (waited {:.2}s), please investigate: {}",
        .outstanding.len(),
        .timeout.as_secs(),
        .waited.as_secs_f64(),
        join_ids(.outstanding)
    )]
    PollTimeout {
        outstanding: Vec<JobId>,
        waited: Duration,
        timeout: Duration,
    },

    #[error("failed to read plan {}: {source}", .path.display())]
    PlanRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create directory {}: {source}", .path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to refresh output {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse plan: {0}")]
    PlanParse(#[from] serde_json::Error),

    #[error("invalid plan: {0}")]
    InvalidPlan(String),
}

impl DriverError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::PollTimeout { .. })
    }
}

fn join_ids(ids: &[JobId]) -> String {
    ids.iter()
        .map(JobId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
