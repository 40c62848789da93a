//! Additive backoff schedule
//!
//! Used both by the completion poller and by the admission guard that caps
//! the number of concurrently running jobs. The interval grows by a fixed
//! step after every unsuccessful check and saturates at a ceiling.

use std::time::Duration;

/// Parameters of the additive backoff schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Interval slept after the first unsuccessful check
    pub initial: Duration,

    /// Amount added to the interval after every unsuccessful check
    pub step: Duration,

    /// Upper bound for the interval
    pub ceiling: Duration,
}

impl BackoffPolicy {
    pub const fn new(initial: Duration, step: Duration, ceiling: Duration) -> Self {
        Self {
            initial,
            step,
            ceiling,
        }
    }

    /// Starts a fresh schedule at the initial interval.
    pub fn schedule(&self) -> Backoff {
        Backoff::new(*self)
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::new(
            Duration::from_secs(1),
            Duration::from_millis(250),
            Duration::from_secs(180),
        )
    }
}

/// A running backoff schedule.
///
/// Iterating yields the interval to sleep next; every yielded value is
/// greater than or equal to the previous one and never above the ceiling.
#[derive(Debug, Clone)]
pub struct Backoff {
    policy: BackoffPolicy,
    current: Duration,
}

impl Backoff {
    pub fn new(policy: BackoffPolicy) -> Self {
        Self {
            current: policy.initial.min(policy.ceiling),
            policy,
        }
    }

    /// The interval that will be slept next.
    pub fn current(&self) -> Duration {
        self.current
    }

    /// Grows the interval by one step, saturating at the ceiling.
    pub fn advance(&mut self) {
        self.current = (self.current + self.policy.step).min(self.policy.ceiling);
    }
}

impl Iterator for Backoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        let interval = self.current;
        self.advance();
        Some(interval)
    }
}
