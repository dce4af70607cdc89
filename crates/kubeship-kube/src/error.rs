//! Error types for kubeship-kube

use kubeship_core::{ConfigError, CoreError};
use kubeship_engine::EngineError;
use thiserror::Error;

/// Result type for kubeship-kube operations
pub type Result<T> = std::result::Result<T, KubeError>;

/// Errors that stop an operation before or between requests
///
/// Individual request failures never surface here: they are reported as
/// [`RequestFailure`] values and the caller decides whether to continue.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KubeError {
    /// Client construction rejected the configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Reading secrets or manifests failed
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Template rendering failed
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The HTTP transport could not be built
    #[error("failed to build HTTP client: {0}")]
    Transport(String),

    /// Readiness polling was cancelled
    #[error("operation cancelled while waiting for the API server")]
    Cancelled,
}

impl From<reqwest::Error> for KubeError {
    fn from(e: reqwest::Error) -> Self {
        KubeError::Transport(e.to_string())
    }
}

/// Outcome of a single REST call that did not produce a decoded body
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestFailure {
    /// No HTTP response (connection refused, DNS, TLS, timeout)
    #[error("request failed: {message}")]
    Transport { message: String },

    /// The server answered with a non-success status
    #[error("HTTP status code {status}, {message}")]
    Status { status: u16, message: String },

    /// A success response whose body is not valid JSON
    #[error("invalid response body: {message}")]
    Decode { message: String },

    /// The request could not be built from the manifest
    #[error("invalid request: {message}")]
    Invalid { message: String },
}

impl RequestFailure {
    /// HTTP status code, when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestFailure::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }
}
