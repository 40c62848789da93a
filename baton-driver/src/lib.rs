//! Baton Driver
//!
//! Drives a staged batch pipeline against an LSF-style cluster.
//!
//! Architecture:
//! - Configuration: one [`DriverConfig`] per run, validated up front
//! - Context: [`DriverContext`] owns the config, ledger and scheduler client
//! - Scheduler: the completion poller that blocks until a job set drains
//! - Services: job submission and the stage barrier
//! - Pipeline: a minimal JSON stage plan and the runner that executes it
//!
//! Every submitted job is recorded in the ledger before the next stage can
//! start; at the stage boundary the barrier polls the scheduler until none of
//! the recorded jobs is still listed, clears the ledger and lets the pipeline
//! continue.

pub mod config;
pub mod context;
pub mod error;
pub mod pipeline;
pub mod scheduler;
pub mod service;

pub use config::DriverConfig;
pub use context::DriverContext;
pub use error::{DriverError, DriverResult};
pub use pipeline::{PipelineRunner, RunSummary, StagePlan};
pub use scheduler::CompletionPoller;
pub use service::{BatchJobManager, StageBarrier};

#[cfg(test)]
pub(crate) mod testing;
