//! Kubeship Core - Core types for the entity deployment client
//!
//! This crate provides the foundational types used throughout kubeship:
//! - `EndpointConfig`: Canonical API server base URL
//! - `AuthOptions` / `Credentials`: Authentication negotiation
//! - `SslOptions`: TLS material and verification mode
//! - `naming`: Kind to REST path segment mapping
//! - `EntityManifest`: Parsed entity documents
//! - `SecretMap`: Base64-encoded secret files for templates
//! - `ClientConfig`: Configuration file

pub mod auth;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod manifest;
pub mod naming;
pub mod secrets;
pub mod tls;

pub use auth::{AuthOptions, Credentials};
pub use config::{CONFIG_ENV_VAR, ClientConfig};
pub use endpoint::{DEFAULT_API_PATH, DEFAULT_API_VERSION, EndpointConfig};
pub use error::{ConfigError, CoreError, Result};
pub use manifest::{EntityManifest, load_file, parse_documents};
pub use naming::{DEFAULT_NAMESPACE, entity_path, namespace_prefix, resource_name};
pub use secrets::{SecretMap, load_secrets};
pub use tls::{SslOptions, VerifyMode};
