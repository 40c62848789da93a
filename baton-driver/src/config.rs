//! Driver configuration
//!
//! Defines all configurable parameters of a pipeline run: where the ledger
//! lives, how long a stage may take, how the poller backs off, and the
//! default scheduler parameters for submitted jobs.

use baton_core::{BackoffPolicy, SchedulerParams};
use std::path::PathBuf;
use std::time::Duration;

/// File name of the ledger inside the workspace
pub const LEDGER_FILE_NAME: &str = ".job_queue.db";

/// Driver configuration
///
/// Built once at startup and owned by the [`DriverContext`](crate::DriverContext)
/// for the lifetime of the run.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Directory the pipeline writes its outputs into
    pub workspace: PathBuf,

    /// Path of the ledger's SQLite file
    pub ledger_path: PathBuf,

    /// Maximum time a stage barrier waits for its jobs
    pub poll_timeout: Duration,

    /// Backoff between job listings (poller and admission guard)
    pub backoff: BackoffPolicy,

    /// Pause after a stage drains, for shared-filesystem propagation
    pub grace_period: Duration,

    /// Cap on concurrently running jobs; `None` submits without waiting
    pub max_concurrent_jobs: Option<usize>,

    /// Defaults applied to every submission
    pub scheduler: SchedulerParams,
}

impl DriverConfig {
    /// Creates a configuration with defaults for `workspace`
    pub fn new(workspace: impl Into<PathBuf>) -> Self {
        let workspace = workspace.into();
        Self {
            ledger_path: workspace.join(LEDGER_FILE_NAME),
            poll_timeout: Duration::from_secs(43_200), // 12 hours
            backoff: BackoffPolicy::default(),
            grace_period: Duration::from_secs(30),
            max_concurrent_jobs: None,
            scheduler: SchedulerParams::for_workspace(&workspace),
            workspace,
        }
    }

    /// Overrides the ledger location
    pub fn with_ledger_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ledger_path = path.into();
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.workspace.as_os_str().is_empty() {
            anyhow::bail!("workspace cannot be empty");
        }

        if self.ledger_path.as_os_str().is_empty() {
            anyhow::bail!("ledger path cannot be empty");
        }

        if self.poll_timeout.is_zero() {
            anyhow::bail!("poll_timeout must be greater than 0");
        }

        if self.backoff.initial.is_zero() {
            anyhow::bail!("initial poll interval must be greater than 0");
        }

        if self.backoff.ceiling < self.backoff.initial {
            anyhow::bail!("poll interval ceiling must not be below the initial interval");
        }

        if self.max_concurrent_jobs == Some(0) {
            anyhow::bail!("max_concurrent_jobs must be greater than 0");
        }

        if self.scheduler.queue.is_empty() {
            anyhow::bail!("scheduler queue cannot be empty");
        }

        if !self.scheduler.job_name_template.contains("{name}") {
            anyhow::bail!("job name template must contain {{name}}");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DriverConfig::new("/scratch/run1");
        assert_eq!(config.ledger_path, PathBuf::from("/scratch/run1/.job_queue.db"));
        assert_eq!(config.poll_timeout, Duration::from_secs(43_200));
        assert_eq!(config.grace_period, Duration::from_secs(30));
        assert_eq!(config.backoff, BackoffPolicy::default());
        assert_eq!(config.scheduler.output_log_path, "/scratch/run1/logs/%J.out");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = DriverConfig::new("/scratch/run1");

        config.poll_timeout = Duration::ZERO;
        assert!(config.validate().is_err());
        config.poll_timeout = Duration::from_secs(60);

        config.max_concurrent_jobs = Some(0);
        assert!(config.validate().is_err());
        config.max_concurrent_jobs = Some(10);
        assert!(config.validate().is_ok());

        config.backoff.ceiling = Duration::from_millis(500);
        assert!(config.validate().is_err());
        config.backoff = BackoffPolicy::default();

        config.scheduler.job_name_template = "{project}".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_with_ledger_path() {
        let config = DriverConfig::new("/scratch/run1").with_ledger_path("/var/tmp/jobs.db");
        assert_eq!(config.ledger_path, PathBuf::from("/var/tmp/jobs.db"));
        assert!(config.validate().is_ok());
    }
}
