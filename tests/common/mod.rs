#![allow(dead_code)]

use async_trait::async_trait;
use job_progress::{PollOutcome, PollerError, ProgressSink, ProgressUpdate, StatusSnapshot, StatusSource};
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::time::Instant;

/// One scripted reply
pub enum Reply {
    Snapshot(StatusSnapshot),
    Status(u16),
}

/// Status source that replays a script, then repeats `fallback` forever
pub struct ScriptedSource {
    script: Mutex<VecDeque<Reply>>,
    fallback: StatusSnapshot,
    fetches: Mutex<Vec<Instant>>,
}

impl ScriptedSource {
    pub fn new(script: Vec<Reply>, fallback: StatusSnapshot) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
            fetches: Mutex::new(Vec::new()),
        }
    }

    pub fn fetch_times(&self) -> Vec<Instant> {
        self.fetches.lock().unwrap().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.lock().unwrap().len()
    }
}

#[async_trait]
impl StatusSource for ScriptedSource {
    async fn fetch(&self) -> Result<StatusSnapshot, PollerError> {
        self.fetches.lock().unwrap().push(Instant::now());
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Reply::Snapshot(snapshot)) => Ok(snapshot),
            Some(Reply::Status(code)) => Err(PollerError::HttpStatus(code)),
            None => Ok(self.fallback.clone()),
        }
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}

/// Sink that keeps everything it is told
#[derive(Default)]
pub struct RecordingSink {
    pub attached: Mutex<Vec<String>>,
    pub updates: Mutex<Vec<ProgressUpdate>>,
    pub errors: Mutex<Vec<(String, u32)>>,
    pub finished: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn updates(&self) -> Vec<ProgressUpdate> {
        self.updates.lock().unwrap().clone()
    }

    pub fn error_attempts(&self) -> Vec<u32> {
        self.errors.lock().unwrap().iter().map(|(_, n)| *n).collect()
    }

    pub fn finish_count(&self) -> usize {
        self.finished.lock().unwrap().len()
    }
}

impl ProgressSink for RecordingSink {
    fn attach(&self, target: &str) {
        self.attached.lock().unwrap().push(target.to_string());
    }

    fn on_update(&self, update: &ProgressUpdate) {
        self.updates.lock().unwrap().push(update.clone());
    }

    fn on_error(&self, error: &PollerError, attempt: u32) {
        self.errors.lock().unwrap().push((error.to_string(), attempt));
    }

    fn on_finish(&self, outcome: &PollOutcome) {
        self.finished.lock().unwrap().push(format!("{:?}", outcome));
    }
}

/// Source whose request never completes
#[derive(Default)]
pub struct StalledSource {
    pub started: Mutex<u32>,
}

#[async_trait]
impl StatusSource for StalledSource {
    async fn fetch(&self) -> Result<StatusSnapshot, PollerError> {
        *self.started.lock().unwrap() += 1;
        std::future::pending().await
    }

    fn describe(&self) -> String {
        "stalled".to_string()
    }
}
