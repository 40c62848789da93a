//! Core domain types
//!
//! These types are shared between the scheduler client (which produces job
//! ids), the ledger (which persists them) and the driver (which waits on them).

pub mod backoff;
pub mod job;
pub mod poll;
pub mod scheduler;
