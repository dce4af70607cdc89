//! Authentication options and their resolution into credentials
//!
//! A client authenticates in at most one way:
//! - bearer token given inline
//! - bearer token read from a file (service-account style)
//! - HTTP basic auth (username + password)
//! - anonymous

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Authentication options as written in configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthOptions {
    /// Basic auth user (`user` is accepted for compatibility)
    #[serde(default, alias = "user", skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Basic auth password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Inline bearer token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_token: Option<String>,

    /// File containing a bearer token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_token_file: Option<PathBuf>,
}

impl AuthOptions {
    /// Anonymous access
    pub fn none() -> Self {
        Self::default()
    }

    /// Inline bearer token
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            bearer_token: Some(token.into()),
            ..Self::default()
        }
    }

    /// Bearer token read from a file at construction time
    pub fn bearer_file(path: impl Into<PathBuf>) -> Self {
        Self {
            bearer_token_file: Some(path.into()),
            ..Self::default()
        }
    }

    /// HTTP basic auth
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
            ..Self::default()
        }
    }

    /// Check that at most one mode is selected and basic auth is complete
    pub fn validate(&self) -> Result<(), ConfigError> {
        let username = non_empty(&self.username);
        let password = non_empty(&self.password);
        let token_file = self
            .bearer_token_file
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty());

        let modes = [
            non_empty(&self.bearer_token).is_some(),
            token_file.is_some(),
            username.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count();

        if modes > 1 {
            return Err(ConfigError::ConflictingAuth);
        }
        if username.is_some() != password.is_some() {
            return Err(ConfigError::IncompleteBasicAuth);
        }
        Ok(())
    }

    /// Validate and materialize the effective credential
    pub fn resolve(&self) -> Result<Credentials, ConfigError> {
        self.validate()?;

        if let Some(token) = non_empty(&self.bearer_token) {
            return Ok(Credentials::Bearer {
                token: token.to_string(),
            });
        }

        if let Some(path) = self
            .bearer_token_file
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
        {
            let token = read_token_file(path)?;
            return Ok(Credentials::Bearer { token });
        }

        match (non_empty(&self.username), non_empty(&self.password)) {
            (Some(username), Some(password)) => Ok(Credentials::Basic {
                username: username.to_string(),
                password: password.to_string(),
            }),
            _ => Ok(Credentials::None),
        }
    }
}

/// The single effective credential of a client
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Credentials {
    #[default]
    None,
    Bearer {
        token: String,
    },
    Basic {
        username: String,
        password: String,
    },
}

impl Credentials {
    /// `Authorization` header value for bearer credentials
    pub fn bearer_header(&self) -> Option<String> {
        match self {
            Credentials::Bearer { token } => Some(format!("Bearer {}", token)),
            _ => None,
        }
    }

    /// Basic auth pair, attached per request
    pub fn basic_pair(&self) -> Option<(&str, &str)> {
        match self {
            Credentials::Basic { username, password } => Some((username, password)),
            _ => None,
        }
    }

    /// Short label for logs
    pub fn mode(&self) -> &'static str {
        match self {
            Credentials::None => "anonymous",
            Credentials::Bearer { .. } => "bearer",
            Credentials::Basic { .. } => "basic",
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::None => f.write_str("None"),
            Credentials::Bearer { .. } => f.debug_struct("Bearer").field("token", &"***").finish(),
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn read_token_file(path: &Path) -> Result<String, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::TokenFileMissing {
            path: path.to_path_buf(),
        });
    }

    let content =
        std::fs::read_to_string(path).map_err(|e| ConfigError::TokenFileUnreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    Ok(content.trim_end().to_string())
}
