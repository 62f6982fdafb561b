pub mod backoff;
pub mod schedule;

use crate::client::types::JobState;
use crate::client::{StatusClient, StatusSource};
use crate::config::PollerConfig;
use crate::error::{PollerError, PollerResult};
use crate::sink::ProgressSink;
use schedule::{delay_from_secs, evaluate};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::Notify;
use tokio::task::JoinHandle;

/// Result of one successful polling cycle
#[derive(Debug, Clone, PartialEq)]
pub enum Cycle {
    Continue(Duration),
    Finished(JobState),
}

/// How a poller ended
#[derive(Debug)]
pub enum PollOutcome {
    Finished { state: JobState, cycles: u64 },
    Cancelled { cycles: u64 },
    CycleLimit { cycles: u64 },
    Failed(PollerError),
}

impl PollOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, PollOutcome::Failed(_))
    }
}

/// Polls one job status source and reports progress to a sink
pub struct ProgressPoller {
    source: Arc<dyn StatusSource>,
    sink: Arc<dyn ProgressSink>,
    config: PollerConfig,
    re_runs: u64,
    last_percent: i64,
}

impl ProgressPoller {
    pub fn new(
        source: Arc<dyn StatusSource>,
        sink: Arc<dyn ProgressSink>,
        config: PollerConfig,
    ) -> Self {
        Self {
            source,
            sink,
            config,
            re_runs: 0,
            last_percent: 0,
        }
    }

    /// Completed cycles so far
    pub fn re_runs(&self) -> u64 {
        self.re_runs
    }

    /// Run a single polling cycle: fetch, evaluate, report.
    ///
    /// Failed cycles leave the re-run counter and the last percent untouched.
    pub async fn advance(&mut self) -> PollerResult<Cycle> {
        let snapshot = self.source.fetch().await?;
        let evaluation = evaluate(
            &snapshot,
            self.re_runs,
            self.last_percent,
            now_secs(),
            self.config.fallback_delay_secs,
            &self.config.terminal_states,
        )?;

        log::debug!(
            "{}: cycle {} state={} percent={}",
            self.source.describe(),
            self.re_runs,
            evaluation.update.status,
            evaluation.update.percent
        );
        self.sink.on_update(&evaluation.update);

        self.re_runs += 1;
        self.last_percent = evaluation.update.percent;

        match evaluation.delay_secs {
            Some(secs) => Ok(Cycle::Continue(delay_from_secs(secs))),
            None => Ok(Cycle::Finished(snapshot.state)),
        }
    }

    /// Spawn the polling loop in a background task
    pub fn start(self) -> PollerHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        let shutdown = Arc::new(Notify::new());
        let target = self.source.describe();

        let task = tokio::spawn(self.run(cancelled.clone(), shutdown.clone()));

        PollerHandle {
            target,
            cancelled,
            shutdown,
            task: Some(task),
        }
    }

    async fn run(mut self, cancelled: Arc<AtomicBool>, shutdown: Arc<Notify>) -> PollOutcome {
        let target = self.source.describe();
        self.sink.attach(&target);
        log::info!("{}: polling started", target);

        let mut failures = 0u32;

        let outcome = loop {
            if cancelled.load(Ordering::SeqCst) {
                break PollOutcome::Cancelled { cycles: self.re_runs };
            }

            let result = tokio::select! {
                result = self.advance() => Some(result),
                _ = shutdown.notified() => None,
            };
            let Some(result) = result else {
                break PollOutcome::Cancelled { cycles: self.re_runs };
            };

            let wait = match result {
                Ok(Cycle::Continue(delay)) => {
                    failures = 0;
                    if let Some(max) = self.config.max_cycles {
                        if self.re_runs >= max {
                            break PollOutcome::CycleLimit { cycles: self.re_runs };
                        }
                    }
                    delay
                }
                Ok(Cycle::Finished(state)) => {
                    break PollOutcome::Finished { state, cycles: self.re_runs };
                }
                Err(err) => {
                    failures += 1;
                    log::warn!("{}: poll failed (attempt {}): {}", target, failures, err);
                    self.sink.on_error(&err, failures);

                    if self.config.retry.exhausted(failures) {
                        break PollOutcome::Failed(PollerError::RetriesExhausted {
                            attempts: failures,
                            last: err.to_string(),
                        });
                    }
                    self.config.retry.delay_for(failures)
                }
            };

            if cancelled.load(Ordering::SeqCst) {
                break PollOutcome::Cancelled { cycles: self.re_runs };
            }

            log::debug!("{}: next poll in {:?}", target, wait);
            let interrupted = tokio::select! {
                _ = tokio::time::sleep(wait) => false,
                _ = shutdown.notified() => true,
            };
            if interrupted {
                break PollOutcome::Cancelled { cycles: self.re_runs };
            }
        };

        match &outcome {
            PollOutcome::Failed(err) => log::error!("{}: {}", target, err),
            other => log::info!("{}: polling stopped: {:?}", target, other),
        }
        self.sink.on_finish(&outcome);
        outcome
    }
}

/// Handle to a running poller. Dropping it without `join` cancels the poller.
pub struct PollerHandle {
    target: String,
    cancelled: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
    task: Option<JoinHandle<PollOutcome>>,
}

impl PollerHandle {
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Request a stop; takes effect before the next reschedule or immediately
    /// if the poller is waiting.
    pub fn cancel(&self) {
        self.canceller().cancel();
    }

    /// Detached cancel capability, usable after the handle has moved
    pub fn canceller(&self) -> Canceller {
        Canceller {
            cancelled: self.cancelled.clone(),
            shutdown: self.shutdown.clone(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |task| task.is_finished())
    }

    /// Wait for the poller to stop
    pub async fn join(mut self) -> PollOutcome {
        let Some(task) = self.task.take() else {
            return PollOutcome::Failed(PollerError::TaskAborted("already joined".to_string()));
        };

        match task.await {
            Ok(outcome) => outcome,
            Err(e) => PollOutcome::Failed(PollerError::TaskAborted(e.to_string())),
        }
    }
}

#[derive(Clone)]
pub struct Canceller {
    cancelled: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
}

impl Canceller {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.shutdown.notify_one();
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        if self.task.is_some() {
            self.cancel();
        }
    }
}

/// Start polling `status_url` with the default configuration
pub fn check_long_task(status_url: &str, sink: Arc<dyn ProgressSink>) -> PollerResult<PollerHandle> {
    check_long_task_with(status_url, sink, PollerConfig::default())
}

pub fn check_long_task_with(
    status_url: &str,
    sink: Arc<dyn ProgressSink>,
    config: PollerConfig,
) -> PollerResult<PollerHandle> {
    let client = StatusClient::new(status_url.to_string(), config.request_timeout)?;
    Ok(ProgressPoller::new(Arc::new(client), sink, config).start())
}

fn now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
