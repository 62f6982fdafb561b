use clap::Parser;
use job_progress::sink::{LogSink, TerminalSink};
use job_progress::*;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Track the progress of long-running jobs through their status URLs
#[derive(Parser, Debug)]
#[command(name = "job-progress", version, about)]
struct Cli {
    /// Status endpoints to poll, one poller each
    #[arg(required = true)]
    status_urls: Vec<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    timeout: u64,

    /// Consecutive failed polls tolerated before giving up
    #[arg(long, default_value_t = 5)]
    max_retries: u32,

    /// Stop after this many successful polls
    #[arg(long)]
    max_cycles: Option<u64>,

    /// State that ends polling (repeatable, replaces SUCCESS/FAILURE)
    #[arg(long = "terminal-state", value_name = "STATE")]
    terminal_states: Vec<String>,

    /// Log progress lines instead of drawing bars
    #[arg(long)]
    plain: bool,

    /// Also write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn poller_config(&self) -> PollerConfig {
        let mut config = PollerConfig {
            request_timeout: Duration::from_secs(self.timeout),
            max_cycles: self.max_cycles,
            ..Default::default()
        };
        config.retry.max_retries = self.max_retries;
        if !self.terminal_states.is_empty() {
            config.terminal_states = self
                .terminal_states
                .iter()
                .map(|s| JobState::from(s.as_str()))
                .collect();
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<(), PollerError> {
    let cli = Cli::parse();
    let group = TerminalSink::group();
    let bars = if cli.plain { None } else { Some(&group) };
    logging::initialize(cli.verbose || cli.plain, cli.log_file.as_deref(), bars);

    let config = cli.poller_config();

    let mut handles = Vec::new();
    for url in &cli.status_urls {
        let sink: Arc<dyn ProgressSink> = if cli.plain {
            Arc::new(LogSink::new(url.clone()))
        } else {
            Arc::new(TerminalSink::in_group(&group))
        };
        handles.push(check_long_task_with(url, sink, config.clone())?);
    }

    let cancellers: Vec<Canceller> = handles.iter().map(PollerHandle::canceller).collect();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupted, cancelling {} poller(s)", cancellers.len());
            for canceller in &cancellers {
                canceller.cancel();
            }
        }
    });

    let mut outcomes = Vec::new();
    for handle in handles {
        let target = handle.target().to_string();
        outcomes.push((target, handle.join().await));
    }

    let mut last_error = None;
    for (target, outcome) in outcomes {
        if let PollOutcome::Failed(err) = outcome {
            eprintln!("{}: {}", target, err);
            last_error = Some(err);
        }
    }

    match last_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
