use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Never carries the request url, which holds the api key.
    #[error("request failed: {0}")]
    Transport(reqwest::Error),

    #[error("search api returned {status}")]
    Status { status: reqwest::StatusCode },

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Store(#[from] mongodb::error::Error),

    #[error("{operation} timed out after {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },

    #[error("invalid date range: {begin} is after {end}")]
    InvalidRange { begin: NaiveDate, end: NaiveDate },

    #[error("invalid date key {0:?}, expected YYYYMMDD")]
    InvalidDateKey(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize output: {0}")]
    Output(#[source] serde_json::Error),

    #[error("corrupt file {}: {source}", path.display())]
    CorruptFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.without_url())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
