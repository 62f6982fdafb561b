//! # Job Progress
//!
//! Client side progress tracking for long-running server jobs.
//!
//! ## Features
//!
//! - Polls a JSON status endpoint over HTTP
//! - Re-poll delay adapts to the reported job state (queued, collecting, rate limited)
//! - Cancellable pollers with an explicit stop on terminal states
//! - Exponential backoff on failed polls, surfaced to the sink once exhausted
//! - Pluggable progress sinks, with an `indicatif` terminal bar

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod poller;
pub mod sink;

pub use client::types::{JobState, StatusSnapshot};
pub use client::{StatusClient, StatusSource};
pub use config::PollerConfig;
pub use error::{PollerError, PollerResult};
pub use poller::schedule::ProgressUpdate;
pub use poller::{
    check_long_task, check_long_task_with, Canceller, Cycle, PollOutcome, PollerHandle, ProgressPoller,
};
pub use sink::{ProgressSink, SilentSink};

/// Default per-request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Re-poll delay for unrecognised, non-terminal job states
pub const DEFAULT_FALLBACK_DELAY_SECS: f64 = 1.0;

/// States that end polling by default
pub const DEFAULT_TERMINAL_STATES: &[&str] = &["SUCCESS", "FAILURE"];
