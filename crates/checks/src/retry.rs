//! Fixed-count, fixed-delay retry schedule for check-run updates.
//!
//! GitHub intermittently answers valid update requests with
//! `401 Bad credentials`. A short pause followed by the same request
//! succeeds, so updates are retried on every failure.

use std::time::Duration;

/// How many times to attempt an operation and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrySchedule {
    max_attempts: u32,
    delay: Duration,
}

impl RetrySchedule {
    /// Default number of attempts, including the first.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

    /// Default pause between consecutive attempts.
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

    /// Creates a schedule, returning `None` if `max_attempts` is zero.
    pub fn new(max_attempts: u32, delay: Duration) -> Option<Self> {
        if max_attempts == 0 {
            None
        } else {
            Some(Self {
                max_attempts,
                delay,
            })
        }
    }

    /// Total number of attempts, including the first.
    pub fn max_attempts(self) -> u32 {
        self.max_attempts
    }

    /// Pause between two consecutive attempts.
    pub fn delay(self) -> Duration {
        self.delay
    }

    /// Returns `true` if another attempt follows attempt number `attempt`
    /// (1-based).
    pub fn has_attempt_after(self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

impl Default for RetrySchedule {
    fn default() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            delay: Self::DEFAULT_DELAY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_five_attempts_one_second_apart() {
        let schedule = RetrySchedule::default();
        assert_eq!(schedule.max_attempts(), 5);
        assert_eq!(schedule.delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        assert!(RetrySchedule::new(0, Duration::ZERO).is_none());
    }

    #[test]
    fn test_no_attempt_after_the_last() {
        let schedule = RetrySchedule::default();
        assert!(schedule.has_attempt_after(1));
        assert!(schedule.has_attempt_after(4));
        assert!(!schedule.has_attempt_after(5));
    }
}
