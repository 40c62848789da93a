//! Service layer
//!
//! Services combine the scheduler client, the ledger and the poller into the
//! two operations pipeline stages need: submitting a tracked job and waiting
//! at a stage boundary.

mod barrier;
mod manager;

pub use barrier::StageBarrier;
pub use manager::BatchJobManager;
