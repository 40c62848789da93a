//! Baton Core
//!
//! Core types shared by the Baton pipeline driver crates.
//!
//! This crate contains:
//! - Domain types: job identifiers, scheduler submission parameters
//! - Polling primitives: the backoff schedule and poll outcomes

pub mod domain;

pub use domain::backoff::{Backoff, BackoffPolicy};
pub use domain::job::JobId;
pub use domain::poll::Drained;
pub use domain::scheduler::{KillOptions, SchedulerParams};
