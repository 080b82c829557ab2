// Error types for opsdash

use std::time::Duration;
use thiserror::Error;

/// Result type alias using anyhow::Error
pub type Result<T> = anyhow::Result<T>;

/// Application-level error types
#[derive(Error, Debug)]
pub enum OpsdashError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of the durable key-value store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt storage file {path}: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode value for key '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures raised by a transport before any HTTP status was received
#[derive(Error, Debug)]
pub enum TransportError {
    /// No network path to the backend (refused, unresolvable, reset)
    #[error("transport unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Other(anyhow::Error),
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() {
            TransportError::Unavailable(error.to_string())
        } else {
            TransportError::Other(error.into())
        }
    }
}

/// Classified outcome of a failed HTTP client call
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Session expired. Please login again.")]
    SessionExpired,

    /// Non-2xx response other than 401, after any retry
    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("Request timed out. Please check your connection and try again.")]
    Timeout { timeout: Duration },

    #[error("Unable to connect to server. Please check if the backend is running.")]
    Unavailable { url: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Failed to persist session: {0}")]
    Session(#[from] StoreError),

    #[error(transparent)]
    Encode(serde_json::Error),

    #[error(transparent)]
    Decode(serde_json::Error),

    #[error(transparent)]
    Transport(anyhow::Error),
}

impl ClientError {
    /// HTTP status behind this error, when one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::SessionExpired => Some(401),
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, ClientError::SessionExpired)
    }

    /// Short name recorded in log entries
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::SessionExpired => "SessionExpired",
            ClientError::Http { .. } => "HttpError",
            ClientError::Timeout { .. } => "TimeoutError",
            ClientError::Unavailable { .. } => "NetworkError",
            ClientError::InvalidRequest(_) => "InvalidRequest",
            ClientError::Session(_) => "SessionStoreError",
            ClientError::Encode(_) => "EncodeError",
            ClientError::Decode(_) => "DecodeError",
            ClientError::Transport(_) => "TransportError",
        }
    }
}
