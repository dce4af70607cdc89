//! CLI error types with exit code handling
//!
//! This module provides a unified error type for CLI operations that
//! maps errors to appropriate exit codes.

use kubeship_core::{ConfigError, CoreError};
use kubeship_engine::{EngineError, TemplateError};
use kubeship_kube::{KubeError, RequestFailure};
use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// Client configuration rejected
    #[error("Configuration error: {message}")]
    #[diagnostic(code(kubeship::cli::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Template rendering failed, with the source-annotated diagnostic
    #[error(transparent)]
    #[diagnostic(transparent)]
    Template(TemplateError),

    /// A single request failed
    #[error("Request failed: {message}")]
    #[diagnostic(code(kubeship::cli::request))]
    Request { message: String },

    /// Some entities of a batch failed
    #[error("{failed} of {total} entities failed")]
    #[diagnostic(
        code(kubeship::cli::batch),
        help("Failed requests are logged above; rerun with --debug for details")
    )]
    PartialFailure { failed: usize, total: usize },

    /// Readiness wait did not complete
    #[error("API server not ready: {message}")]
    #[diagnostic(code(kubeship::cli::not_ready))]
    NotReady { message: String },

    /// Ctrl-C received before the command finished
    #[error("Interrupted")]
    #[diagnostic(
        code(kubeship::cli::interrupted),
        help("Entities submitted before the interrupt are left in place")
    )]
    Interrupted,

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(kubeship::cli::io))]
    Io { message: String },

    /// Wrapped error for passthrough (stores the formatted message)
    #[error("{message}")]
    #[diagnostic(code(kubeship::cli::error))]
    Other { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config { .. } => exit_codes::CONFIG_ERROR,
            CliError::Template(_) => exit_codes::TEMPLATE_ERROR,
            CliError::Request { .. } => exit_codes::REQUEST_ERROR,
            CliError::PartialFailure { .. } => exit_codes::ERROR,
            CliError::NotReady { .. } => exit_codes::NOT_READY,
            CliError::Interrupted => exit_codes::INTERRUPTED,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Other { .. } => exit_codes::ERROR,
        }
    }

    pub fn not_ready(message: impl Into<String>) -> Self {
        Self::NotReady {
            message: message.into(),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        let help = match &err {
            ConfigError::MissingEndpoint => {
                Some("Pass --server or set `server` in the configuration file".to_string())
            }
            ConfigError::ConflictingAuth => Some(
                "Use --token, --token-file or --username/--password, not a combination".to_string(),
            ),
            ConfigError::IncompleteBasicAuth => {
                Some("Pass both --username and --password".to_string())
            }
            ConfigError::InvalidBearerToken => {
                Some("Check the token for stray newlines or control characters".to_string())
            }
            _ => None,
        };
        CliError::Config {
            message: err.to_string(),
            help,
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Config(e) => e.into(),
            CoreError::DirectoryNotFound { .. } | CoreError::FileAccess { .. } => CliError::Io {
                message: err.to_string(),
            },
            other => CliError::Other {
                message: other.to_string(),
            },
        }
    }
}

impl From<EngineError> for CliError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Template(e) => CliError::Template(e),
            EngineError::Read { .. } => CliError::Io {
                message: err.to_string(),
            },
        }
    }
}

impl From<KubeError> for CliError {
    fn from(err: KubeError) -> Self {
        match err {
            KubeError::Config(e) => e.into(),
            KubeError::Core(e) => e.into(),
            KubeError::Engine(e) => e.into(),
            KubeError::Cancelled => CliError::Interrupted,
            other => CliError::Other {
                message: other.to_string(),
            },
        }
    }
}

impl From<RequestFailure> for CliError {
    fn from(err: RequestFailure) -> Self {
        CliError::Request {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_exit_code_and_help() {
        let err: CliError = ConfigError::MissingEndpoint.into();
        assert_eq!(err.exit_code(), exit_codes::CONFIG_ERROR);
        let CliError::Config { help, .. } = err else {
            panic!("expected config error");
        };
        assert!(help.unwrap().contains("--server"));
    }

    #[test]
    fn test_kube_errors_map_to_exit_codes() {
        let cancelled: CliError = KubeError::Cancelled.into();
        assert_eq!(cancelled.exit_code(), exit_codes::INTERRUPTED);

        let missing: CliError = KubeError::Core(CoreError::DirectoryNotFound {
            path: "entities".into(),
        })
        .into();
        assert_eq!(missing.exit_code(), exit_codes::IO_ERROR);
    }

    #[test]
    fn test_request_failure_message() {
        let err: CliError = RequestFailure::Status {
            status: 404,
            message: "not found".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Request failed: HTTP status code 404, not found");
        assert_eq!(err.exit_code(), exit_codes::REQUEST_ERROR);
    }

    #[test]
    fn test_partial_failure() {
        let err = CliError::PartialFailure { failed: 1, total: 3 };
        assert_eq!(err.to_string(), "1 of 3 entities failed");
        assert_eq!(err.exit_code(), exit_codes::ERROR);
    }
}
