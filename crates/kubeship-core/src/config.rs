//! Client configuration
//!
//! Stored as YAML, by default in `~/.config/kubeship/config.yaml`:
//!
//! ```yaml
//! server: https://172.17.4.202:443
//! path: /api
//! apiVersion: v1
//! pollInterval: 10s
//! auth:
//!   bearerTokenFile: /var/run/secrets/token
//! tls:
//!   clientCert: ssl/admin.pem
//!   clientKey: ssl/admin-key.pem
//!   caFile: ssl/ca.pem
//! secretsDir: secrets
//! entitiesDir: kubernetes-files
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::auth::AuthOptions;
use crate::endpoint::{DEFAULT_API_PATH, DEFAULT_API_VERSION, EndpointConfig};
use crate::error::{ConfigError, CoreError, Result};
use crate::tls::SslOptions;

/// Environment variable pointing at a configuration file
pub const CONFIG_ENV_VAR: &str = "KUBESHIP_CONFIG";

/// Everything needed to build a client and run a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// API server URI (scheme, host, port and optionally path)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    /// Path prefix used when `server` has none
    #[serde(default = "default_path")]
    pub path: String,

    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default)]
    pub auth: AuthOptions,

    #[serde(default)]
    pub tls: SslOptions,

    /// Delay between readiness checks
    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,

    /// Per-request timeout
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,

    #[serde(default = "default_secrets_dir")]
    pub secrets_dir: PathBuf,

    #[serde(default = "default_entities_dir")]
    pub entities_dir: PathBuf,
}

fn default_path() -> String {
    DEFAULT_API_PATH.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(10)
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_secrets_dir() -> PathBuf {
    PathBuf::from("secrets")
}

fn default_entities_dir() -> PathBuf {
    PathBuf::from("entities")
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: None,
            path: default_path(),
            api_version: default_api_version(),
            auth: AuthOptions::default(),
            tls: SslOptions::default(),
            poll_interval: default_poll_interval(),
            request_timeout: default_request_timeout(),
            secrets_dir: default_secrets_dir(),
            entities_dir: default_entities_dir(),
        }
    }
}

impl ClientConfig {
    /// Config pointing at a server with default settings
    pub fn for_server(server: impl Into<String>) -> Self {
        Self {
            server: Some(server.into()),
            ..Self::default()
        }
    }

    /// Load from `$KUBESHIP_CONFIG` or the default location
    ///
    /// A missing default file yields the defaults; a missing file named by
    /// the environment variable is an error.
    pub fn load() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Self::load_from(Path::new(&path));
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::FileAccess {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Default configuration path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("kubeship").join("config.yaml"))
    }

    /// Resolve the endpoint
    pub fn endpoint(&self) -> std::result::Result<EndpointConfig, ConfigError> {
        EndpointConfig::new(self.server.as_deref(), &self.path, &self.api_version)
    }

    /// Run every construction-time check without touching the network
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        self.endpoint()?;
        self.auth.validate()?;
        self.tls.validate()?;
        if self.poll_interval.is_zero() {
            return Err(ConfigError::Invalid {
                message: "pollInterval must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
