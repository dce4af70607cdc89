//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions where applicable.

/// General error - unspecified failure, or some entities in a batch failed
pub const ERROR: i32 = 1;

/// Configuration error - endpoint, auth or TLS options rejected
pub const CONFIG_ERROR: i32 = 2;

/// Template error - template rendering failed
pub const TEMPLATE_ERROR: i32 = 3;

/// Request error - a single REST call failed
pub const REQUEST_ERROR: i32 = 4;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;

/// The API server did not become ready before the deadline
pub const NOT_READY: i32 = 6;

/// Interrupted by Ctrl-C (128 + SIGINT)
pub const INTERRUPTED: i32 = 130;
