use serde::{Deserialize, Serialize};
use std::fmt;

/// Job phase reported by the status endpoint
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobState {
    Pending,
    Starting,
    Collecting,
    RateLimiting,
    Other(String),
}

impl JobState {
    pub fn as_str(&self) -> &str {
        match self {
            JobState::Pending => "PENDING",
            JobState::Starting => "STARTING",
            JobState::Collecting => "COLLECTING",
            JobState::RateLimiting => "RATE_LIMITING",
            JobState::Other(s) => s,
        }
    }
}

impl From<String> for JobState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "PENDING" => JobState::Pending,
            "STARTING" => JobState::Starting,
            "COLLECTING" => JobState::Collecting,
            "RATE_LIMITING" => JobState::RateLimiting,
            _ => JobState::Other(s),
        }
    }
}

impl From<&str> for JobState {
    fn from(s: &str) -> Self {
        JobState::from(s.to_string())
    }
}

impl From<JobState> for String {
    fn from(state: JobState) -> Self {
        match state {
            JobState::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One status payload returned by the endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub state: JobState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collected: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_start: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep: Option<f64>,
}

impl StatusSnapshot {
    pub fn new(state: impl Into<JobState>) -> Self {
        Self {
            state: state.into(),
            collected: None,
            max_results: None,
            sleep_start: None,
            sleep: None,
        }
    }

    pub fn collecting(collected: u64, max_results: u64) -> Self {
        Self {
            collected: Some(collected),
            max_results: Some(max_results),
            ..Self::new(JobState::Collecting)
        }
    }

    pub fn rate_limiting(sleep_start: f64, sleep: f64) -> Self {
        Self {
            sleep_start: Some(sleep_start),
            sleep: Some(sleep),
            ..Self::new(JobState::RateLimiting)
        }
    }
}
