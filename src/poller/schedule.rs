//! Turns a single status snapshot into a progress update and the delay
//! before the next poll.

use crate::client::types::{JobState, StatusSnapshot};
use crate::error::PollerError;
use std::time::Duration;

pub const MSG_PENDING: &str = "Waiting in the job queue.";
pub const MSG_COLLECTING: &str = "Collecting Tweets";
pub const MSG_RATE_LIMITED: &str = "Rate Limit hit";

/// What a sink should display after one poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub status: String,
    /// Raw percentage. Can leave 0..=100 while rate limited.
    pub percent: i64,
    /// `None` keeps whatever message is already displayed
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub update: ProgressUpdate,
    /// `None` once a terminal state has been seen
    pub delay_secs: Option<f64>,
}

/// Evaluate one snapshot.
///
/// `re_runs` is the number of cycles completed before this one and `now_secs`
/// the current wall clock in epoch seconds (used for the rate limit window).
/// States without a rule of their own re-poll after `fallback_delay_secs`.
pub fn evaluate(
    snapshot: &StatusSnapshot,
    re_runs: u64,
    previous_percent: i64,
    now_secs: f64,
    fallback_delay_secs: f64,
    terminal_states: &[JobState],
) -> Result<Evaluation, PollerError> {
    let status = snapshot.state.to_string();
    let re_runs = re_runs as f64;

    let (percent, message, delay_secs) = match &snapshot.state {
        JobState::Pending => (
            previous_percent,
            Some(MSG_PENDING),
            Some(10.0 * (re_runs + 1.0)),
        ),
        JobState::Starting | JobState::Collecting => {
            let percent = collection_percent(snapshot)?;
            let remaining = (100 - percent) as f64 / 100.0;
            (percent, Some(MSG_COLLECTING), Some(5.0 + re_runs * remaining))
        }
        JobState::RateLimiting => {
            let (sleep_start, sleep) = rate_limit_window(snapshot)?;
            let percent = (100.0 * (now_secs - sleep_start) / sleep).floor() as i64;
            (percent, Some(MSG_RATE_LIMITED), Some(sleep / 10.0))
        }
        state if terminal_states.contains(state) => {
            let percent = if state.as_str() == "SUCCESS" { 100 } else { previous_percent };
            (percent, None, None)
        }
        _ => (0, None, Some(fallback_delay_secs)),
    };

    Ok(Evaluation {
        update: ProgressUpdate {
            status,
            percent,
            message: message.map(str::to_string),
        },
        delay_secs,
    })
}

/// Fractional milliseconds are truncated; negative or NaN delays become zero.
pub fn delay_from_secs(secs: f64) -> Duration {
    Duration::from_millis((secs * 1000.0) as u64)
}

fn collection_percent(snapshot: &StatusSnapshot) -> Result<i64, PollerError> {
    let collected = snapshot.collected.ok_or_else(|| {
        PollerError::MalformedSnapshot(format!("{} without `collected`", snapshot.state))
    })?;
    let max_results = match snapshot.max_results {
        Some(0) | None => {
            return Err(PollerError::MalformedSnapshot(format!(
                "{} needs a positive `max_results`",
                snapshot.state
            )))
        }
        Some(n) => n,
    };

    Ok((100.0 * collected as f64 / max_results as f64).floor() as i64)
}

fn rate_limit_window(snapshot: &StatusSnapshot) -> Result<(f64, f64), PollerError> {
    match (snapshot.sleep_start, snapshot.sleep) {
        (Some(start), Some(sleep)) if sleep > 0.0 && start.is_finite() => Ok((start, sleep)),
        _ => Err(PollerError::MalformedSnapshot(
            "RATE_LIMITING needs `sleep_start` and a positive `sleep`".to_string(),
        )),
    }
}
