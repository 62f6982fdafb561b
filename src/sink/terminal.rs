use super::ProgressSink;
use crate::error::PollerError;
use crate::poller::schedule::ProgressUpdate;
use crate::poller::PollOutcome;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::Mutex;

const BAR_TEMPLATE: &str = "{prefix:>14.bold} [{bar:40.cyan/blue}] {pos:>3}% {msg}";

/// Renders one poller as an `indicatif` progress bar
pub struct TerminalSink {
    bar: ProgressBar,
    /// Last message from the job itself, shown again once a retry succeeds
    job_message: Mutex<String>,
}

impl TerminalSink {
    /// Standalone bar drawn on stdout
    pub fn new() -> Self {
        Self::with_bar(ProgressBar::with_draw_target(Some(100), ProgressDrawTarget::stdout()))
    }

    /// Group whose bars draw on stdout, leaving stderr to the logger
    pub fn group() -> MultiProgress {
        MultiProgress::with_draw_target(ProgressDrawTarget::stdout())
    }

    /// Bar that shares the terminal with other pollers
    pub fn in_group(group: &MultiProgress) -> Self {
        Self::with_bar(group.add(ProgressBar::new(100)))
    }

    fn with_bar(bar: ProgressBar) -> Self {
        let style = ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        bar.set_style(style);
        Self {
            bar,
            job_message: Mutex::new(String::new()),
        }
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    fn show_job_message(&self, message: Option<&str>) {
        if let Ok(mut job_message) = self.job_message.lock() {
            if let Some(message) = message {
                *job_message = message.to_string();
            }
            self.bar.set_message(job_message.clone());
        }
    }
}

impl Default for TerminalSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for TerminalSink {
    fn attach(&self, target: &str) {
        self.bar.set_prefix("CONNECTING");
        self.show_job_message(Some(&format!("polling {}", target)));
    }

    fn on_update(&self, update: &ProgressUpdate) {
        self.bar.set_prefix(update.status.clone());
        self.bar.set_position(update.percent.clamp(0, 100) as u64);
        self.show_job_message(update.message.as_deref());
    }

    fn on_error(&self, error: &PollerError, attempt: u32) {
        self.bar.set_message(format!("retry {}: {}", attempt, error));
    }

    fn on_finish(&self, outcome: &PollOutcome) {
        match outcome {
            PollOutcome::Finished { state, .. } => {
                self.bar.finish_with_message(format!("done ({})", state))
            }
            PollOutcome::Cancelled { .. } => self.bar.abandon_with_message("cancelled"),
            PollOutcome::CycleLimit { cycles } => {
                self.bar.abandon_with_message(format!("stopped after {} polls", cycles))
            }
            PollOutcome::Failed(err) => self.bar.abandon_with_message(format!("failed: {}", err)),
        }
    }
}
