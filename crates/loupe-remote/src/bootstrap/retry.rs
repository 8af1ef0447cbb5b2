use std::time::Duration;

/// Connection attempts made after launching a primary.
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 12;

/// Attempts that use the short delay before settling to the long one.
pub const FAST_RETRY_ATTEMPTS: u32 = 2;

/// Waits between attempts to reach a newly launched primary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrySchedule {
    attempts: u32,
    fast_attempts: u32,
    fast_delay: Duration,
    slow_delay: Duration,
}

impl Default for RetrySchedule {
    fn default() -> Self {
        Self::new(
            DEFAULT_RETRY_ATTEMPTS,
            FAST_RETRY_ATTEMPTS,
            Duration::from_millis(500),
            Duration::from_secs(1),
        )
    }
}

impl RetrySchedule {
    /// Builds a schedule of `attempts` retries where the first
    /// `fast_attempts` wait `fast_delay` and the rest wait `slow_delay`.
    pub const fn new(
        attempts: u32,
        fast_attempts: u32,
        fast_delay: Duration,
        slow_delay: Duration,
    ) -> Self {
        Self {
            attempts,
            fast_attempts,
            fast_delay,
            slow_delay,
        }
    }

    /// Schedule with `attempts` retries and no waiting.
    pub const fn immediate(attempts: u32) -> Self {
        Self::new(attempts, 0, Duration::ZERO, Duration::ZERO)
    }

    /// Total number of retries.
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Wait before the 1-based retry `attempt`.
    pub const fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= self.fast_attempts {
            self.fast_delay
        } else {
            self.slow_delay
        }
    }

    /// Sum of every wait in the schedule.
    pub fn total_delay(&self) -> Duration {
        (1..=self.attempts).map(|attempt| self.delay_before(attempt)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 500)]
    #[case(2, 500)]
    #[case(3, 1000)]
    #[case(12, 1000)]
    fn default_schedule_polls_fast_then_settles(#[case] attempt: u32, #[case] millis: u64) {
        assert_eq!(
            RetrySchedule::default().delay_before(attempt),
            Duration::from_millis(millis)
        );
    }

    #[test]
    fn default_schedule_waits_eleven_seconds_in_total() {
        let schedule = RetrySchedule::default();
        assert_eq!(schedule.attempts(), 12);
        assert_eq!(schedule.total_delay(), Duration::from_secs(11));
    }
}
