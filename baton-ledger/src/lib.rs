//! Baton job ledger
//!
//! Durable record of the job ids a pipeline run must wait for before moving
//! on to its next stage. Backed by a SQLite file so that a restarted driver
//! can pick up jobs that are still running on the cluster.

pub mod db;
pub mod error;
mod ledger;

pub use error::{LedgerError, LedgerResult};
pub use ledger::{JobLedger, Snapshot};
