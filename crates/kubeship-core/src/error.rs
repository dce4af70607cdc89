//! Core error types

use std::path::PathBuf;
use thiserror::Error;

/// Configuration problems detected while building a client
///
/// These are fatal: a client cannot be constructed until they are fixed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing API server URI")]
    MissingEndpoint,

    #[error("Invalid API server URI '{uri}': {reason}")]
    InvalidEndpoint { uri: String, reason: String },

    #[error("Missing API version")]
    MissingApiVersion,

    #[error(
        "Invalid auth options: specify only one of username/password, bearer_token or bearer_token_file"
    )]
    ConflictingAuth,

    #[error("Basic auth requires both username & password")]
    IncompleteBasicAuth,

    #[error("Bearer token contains characters not allowed in an HTTP header")]
    InvalidBearerToken,

    #[error("Token file {path} does not exist")]
    TokenFileMissing { path: PathBuf },

    #[error("Cannot read token file {path}: {reason}")]
    TokenFileUnreadable { path: PathBuf, reason: String },

    #[error("Client certificate and client key must be configured together")]
    IncompleteClientCert,

    #[error("Cannot read TLS file {path}: {reason}")]
    TlsFileUnreadable { path: PathBuf, reason: String },

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid manifest {source_name}: {message}")]
    InvalidManifest { source_name: String, message: String },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Failed to read {path}: {message}")]
    FileAccess { path: PathBuf, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
