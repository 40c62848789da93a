//! Poll session outcomes

use std::time::Duration;

/// Successful end of a poll session: none of the target jobs is still
/// listed by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Drained {
    /// Number of job listings taken during the session
    pub checks: usize,

    /// Cumulative time slept between listings (the kill-timer)
    pub waited: Duration,
}

impl Drained {
    /// Outcome of a session that had nothing to wait for.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the session returned without contacting the scheduler.
    pub fn was_empty(&self) -> bool {
        self.checks == 0
    }
}
