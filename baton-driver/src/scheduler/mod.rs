//! Scheduler layer for the driver
//!
//! This layer watches the batch scheduler on behalf of the pipeline: it
//! blocks a stage transition until the stage's jobs have left the
//! scheduler's live-job list.

pub mod poller;

pub use poller::CompletionPoller;
