use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop a run. Anything raised here is reported once and
/// ends the process with a non-zero status.
#[derive(Debug, Error)]
pub enum FuzzError {
    #[error("invalid target `{target}`: {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error("subdomain mode needs a DNS host, `{0}` has none")]
    NoSubdomainHost(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("wordlist {path}: {source}")]
    Wordlist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("report file {path}: {source}")]
    Sink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode report record: {0}")]
    Record(String),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Failure of a single probe. Never fatal: the candidate is dropped.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for ProbeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProbeError::Timeout
        } else if e.is_connect() {
            ProbeError::Connect(e.to_string())
        } else {
            ProbeError::Transport(e.to_string())
        }
    }
}
