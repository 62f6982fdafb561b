use thiserror::Error;

#[derive(Error, Debug)]
pub enum PollerError {
    #[error("HTTP transport error: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("Status endpoint returned HTTP {0}")]
    HttpStatus(u16),

    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Malformed status snapshot: {0}")]
    MalformedSnapshot(String),

    #[error("Invalid status URL: {0}")]
    InvalidUrl(String),

    #[error("Giving up after {attempts} failed polls: {last}")]
    RetriesExhausted { attempts: u32, last: String },

    #[error("Poller task aborted: {0}")]
    TaskAborted(String),
}

pub type PollerResult<T> = Result<T, PollerError>;
