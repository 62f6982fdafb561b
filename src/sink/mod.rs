pub mod terminal;

use crate::error::PollerError;
use crate::poller::schedule::ProgressUpdate;
use crate::poller::PollOutcome;

pub use terminal::TerminalSink;

/// Receives progress from a poller.
///
/// The poller calls these from its own task, one cycle at a time.
pub trait ProgressSink: Send + Sync {
    /// Called once before the first request
    fn attach(&self, _target: &str) {}

    fn on_update(&self, update: &ProgressUpdate);

    /// Called for every failed cycle, `attempt` counts consecutive failures
    fn on_error(&self, _error: &PollerError, _attempt: u32) {}

    fn on_finish(&self, _outcome: &PollOutcome) {}
}

/// No-op sink for tests and headless use
pub struct SilentSink;

impl ProgressSink for SilentSink {
    fn on_update(&self, _update: &ProgressUpdate) {}
}

/// Sink that writes every update to the log
pub struct LogSink {
    target: String,
}

impl LogSink {
    pub fn new(target: impl Into<String>) -> Self {
        Self { target: target.into() }
    }
}

impl ProgressSink for LogSink {
    fn on_update(&self, update: &ProgressUpdate) {
        match &update.message {
            Some(message) => log::info!(
                "{}: {} {}% - {}",
                self.target,
                update.status,
                update.percent,
                message
            ),
            None => log::info!("{}: {} {}%", self.target, update.status, update.percent),
        }
    }

    fn on_finish(&self, outcome: &PollOutcome) {
        log::info!("{}: finished: {:?}", self.target, outcome);
    }
}
