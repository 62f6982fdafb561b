use crate::client::types::JobState;
use crate::poller::backoff::RetryPolicy;
use std::time::Duration;

/// Configuration for a progress poller
#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub request_timeout: Duration,
    /// Re-poll delay for states without a rule of their own
    pub fallback_delay_secs: f64,
    pub retry: RetryPolicy,
    /// States that end polling once reported
    pub terminal_states: Vec<JobState>,
    /// Upper bound on successful cycles, unbounded when `None`
    pub max_cycles: Option<u64>,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(crate::DEFAULT_REQUEST_TIMEOUT_SECS),
            fallback_delay_secs: crate::DEFAULT_FALLBACK_DELAY_SECS,
            retry: RetryPolicy::default(),
            terminal_states: crate::DEFAULT_TERMINAL_STATES
                .iter()
                .map(|s| JobState::from(*s))
                .collect(),
            max_cycles: None,
        }
    }
}
