//! Configuration module
//!
//! Global command-line arguments and their translation into a
//! [`DriverConfig`].

use anyhow::{Context, Result};
use baton_driver::DriverConfig;
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Arguments shared by every subcommand
#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Pipeline workspace directory
    #[arg(long, env = "BATON_WORKSPACE", default_value = ".")]
    pub workspace: PathBuf,

    /// Ledger file (defaults to <workspace>/.job_queue.db)
    #[arg(long, env = "BATON_JOB_DB")]
    pub job_db: Option<PathBuf>,

    /// Seconds a stage may wait for its jobs
    #[arg(long, env = "BATON_TIMEOUT", default_value_t = 43_200)]
    pub timeout: u64,

    /// Seconds to pause after a stage drains
    #[arg(long, env = "BATON_GRACE_PERIOD", default_value_t = 30)]
    pub grace_period: u64,

    /// Hold submissions while this many jobs are running
    #[arg(long, env = "BATON_MAX_JOBS")]
    pub max_jobs: Option<usize>,

    /// Default queue for submissions
    #[arg(long, env = "BATON_QUEUE")]
    pub queue: Option<String>,

    /// Default memory reservation in megabytes
    #[arg(long, env = "BATON_MEMORY_MB")]
    pub memory_mb: Option<u64>,

    /// Address notified when each job finishes
    #[arg(long, env = "BATON_EMAIL")]
    pub email: Option<String>,

    /// Project prefix for job names
    #[arg(long, env = "BATON_PROJECT_NAME")]
    pub project_name: Option<String>,

    /// Append logs to this file instead of stderr
    #[arg(long, env = "BATON_LOG")]
    pub log: Option<PathBuf>,

    /// Log level for baton crates (RUST_LOG overrides)
    #[arg(long, env = "BATON_LOG_LEVEL", value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl GlobalArgs {
    /// Builds and validates the driver configuration
    pub fn driver_config(&self) -> Result<DriverConfig> {
        let workspace = std::path::absolute(&self.workspace).with_context(|| {
            format!("failed to resolve workspace {}", self.workspace.display())
        })?;

        let mut config = DriverConfig::new(workspace);
        if let Some(job_db) = &self.job_db {
            config = config.with_ledger_path(job_db);
        }
        config.poll_timeout = Duration::from_secs(self.timeout);
        config.grace_period = Duration::from_secs(self.grace_period);
        config.max_concurrent_jobs = self.max_jobs;

        let scheduler = &mut config.scheduler;
        if let Some(queue) = &self.queue {
            scheduler.queue = queue.clone();
        }
        if let Some(memory_mb) = self.memory_mb {
            scheduler.memory_mb = memory_mb;
        }
        if let Some(project) = &self.project_name {
            scheduler.project = project.clone();
        }
        scheduler.notify_email = self.email.clone();

        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        global: GlobalArgs,
    }

    fn parse(args: &[&str]) -> GlobalArgs {
        TestCli::parse_from(std::iter::once("baton").chain(args.iter().copied())).global
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["--workspace", "/scratch/run1"])
            .driver_config()
            .unwrap();

        assert_eq!(config.ledger_path, PathBuf::from("/scratch/run1/.job_queue.db"));
        assert_eq!(config.poll_timeout, Duration::from_secs(43_200));
        assert_eq!(config.grace_period, Duration::from_secs(30));
        assert_eq!(config.max_concurrent_jobs, None);
        assert_eq!(config.scheduler.queue, "short");
        assert_eq!(config.scheduler.notify_email, None);
    }

    #[test]
    fn test_overrides() {
        let config = parse(&[
            "--workspace",
            "/scratch/run1",
            "--job-db",
            "/var/tmp/jobs.db",
            "--timeout",
            "600",
            "--max-jobs",
            "50",
            "--queue",
            "long",
            "--memory-mb",
            "32000",
            "--email",
            "ops@example.org",
            "--project-name",
            "cohort7",
            "--log-level",
            "debug",
        ]);
        assert_eq!(config.log_level, LogLevel::Debug);

        let config = config.driver_config().unwrap();
        assert_eq!(config.ledger_path, PathBuf::from("/var/tmp/jobs.db"));
        assert_eq!(config.poll_timeout, Duration::from_secs(600));
        assert_eq!(config.max_concurrent_jobs, Some(50));
        assert_eq!(config.scheduler.queue, "long");
        assert_eq!(config.scheduler.memory_mb, 32000);
        assert_eq!(config.scheduler.notify_email.as_deref(), Some("ops@example.org"));
        assert_eq!(config.scheduler.render_job_name("qc"), "cohort7.qc");
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(parse(&["--timeout", "0"]).driver_config().is_err());
        assert!(parse(&["--max-jobs", "0"]).driver_config().is_err());
    }
}
