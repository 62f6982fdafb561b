//! Logger initialization for the `job-progress` binary.
//!
//! Terminal output goes to stderr. When progress bars are on screen the bars
//! are hidden while a record is printed, so log lines never overwrite them.
//! An optional log file receives the same records.

use std::fs::File;
use std::path::Path;

use indicatif::MultiProgress;
use log::{LevelFilter, Log, Metadata, Record};
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Initialize the global logger.
///
/// Pass the bar group when progress bars are drawn. Safe to call more than
/// once; later calls are ignored.
pub fn initialize(verbose: bool, log_file: Option<&Path>, bars: Option<&MultiProgress>) {
    let level = level_for(verbose);
    let config = build_config();

    let term_logger = TermLogger::new(level, config.clone(), TerminalMode::Stderr, ColorChoice::Auto);
    let terminal: Box<dyn SharedLogger> = match bars {
        Some(group) => Box::new(BarAwareLogger::new(term_logger, group.clone())),
        None => term_logger,
    };
    let mut loggers = vec![terminal];

    if let Some(path) = log_file {
        match File::create(path) {
            Ok(file) => loggers.push(WriteLogger::new(LevelFilter::Debug, config, file)),
            Err(err) => eprintln!("Warning: Could not create log file at {:?}: {}", path, err),
        }
    }

    let _ = CombinedLogger::init(loggers);
}

/// Terminal logger that suspends the progress bars around each record
pub struct BarAwareLogger {
    inner: Box<TermLogger>,
    group: MultiProgress,
}

impl BarAwareLogger {
    pub fn new(inner: Box<TermLogger>, group: MultiProgress) -> Self {
        Self { inner, group }
    }
}

impl Log for BarAwareLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            self.group.suspend(|| self.inner.log(record));
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

impl SharedLogger for BarAwareLogger {
    fn level(&self) -> LevelFilter {
        self.inner.level()
    }

    fn config(&self) -> Option<&Config> {
        self.inner.config()
    }

    fn as_log(self: Box<Self>) -> Box<dyn Log> {
        Box::new(*self)
    }
}

fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}
