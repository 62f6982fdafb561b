use std::time::Duration;

/// Retry policy for failed polls
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Consecutive failures tolerated before the poller gives up
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Exponential backoff: base * 2^(n-1), capped at `max_delay`
    pub fn delay_for(&self, failures: u32) -> Duration {
        let exponent = failures.saturating_sub(1).min(31);
        self.base_delay
            .checked_mul(1u32 << exponent)
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }

    pub fn exhausted(&self, failures: u32) -> bool {
        failures > self.max_retries
    }
}
