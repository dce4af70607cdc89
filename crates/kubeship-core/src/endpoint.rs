//! API server endpoint resolution
//!
//! An endpoint is the server origin (scheme, host, port) plus the API path
//! prefix and the API version served under it:
//!
//! ```text
//! https://10.0.0.1:443  /api  v1
//! └──── server ───────┘└path┘└version┘
//! ```

use url::Url;

use crate::error::ConfigError;

/// Default API path prefix for the core group
pub const DEFAULT_API_PATH: &str = "/api";

/// Default API version
pub const DEFAULT_API_VERSION: &str = "v1";

/// Canonical base for every REST call issued by a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    /// Scheme, host and port (path cleared)
    server: Url,
    /// Path prefix, never ending with `/`
    path: String,
    /// API version (non-empty)
    api_version: String,
}

impl EndpointConfig {
    /// Resolve an endpoint from a URI string
    pub fn new(uri: Option<&str>, path: &str, api_version: &str) -> Result<Self, ConfigError> {
        let uri = uri
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(ConfigError::MissingEndpoint)?;

        let url = Url::parse(uri).map_err(|e| ConfigError::InvalidEndpoint {
            uri: uri.to_string(),
            reason: e.to_string(),
        })?;

        Self::from_url(url, path, api_version)
    }

    /// Resolve an endpoint from an already parsed URL
    ///
    /// The URL's own path wins; `path` is only used when the URL has none.
    pub fn from_url(url: Url, path: &str, api_version: &str) -> Result<Self, ConfigError> {
        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(ConfigError::InvalidEndpoint {
                uri: url.to_string(),
                reason: "URI has no host".to_string(),
            });
        }

        let api_version = api_version.trim();
        if api_version.is_empty() {
            return Err(ConfigError::MissingApiVersion);
        }

        let own_path = url.path();
        let chosen = if own_path.is_empty() || own_path == "/" {
            path
        } else {
            own_path
        };
        let path = normalize_path(chosen);

        let mut server = url;
        server.set_path("");
        server.set_query(None);
        server.set_fragment(None);

        Ok(Self {
            server,
            path,
            api_version: api_version.to_string(),
        })
    }

    /// Server origin without a trailing slash
    pub fn server(&self) -> &str {
        self.server.as_str().trim_end_matches('/')
    }

    /// Path prefix (e.g. `/api`)
    pub fn path(&self) -> &str {
        &self.path
    }

    /// API version (e.g. `v1`)
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Discovery URL: the bare API root
    pub fn api_root(&self) -> String {
        format!("{}{}", self.server(), self.path)
    }

    /// Versioned base under which entities live
    pub fn api_base(&self) -> String {
        format!("{}/{}", self.api_root(), self.api_version)
    }

    /// Full URL for a path relative to the versioned base
    pub fn url_for(&self, relative: &str) -> String {
        format!("{}/{}", self.api_base(), relative.trim_start_matches('/'))
    }
}

impl std::fmt::Display for EndpointConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.api_base())
    }
}

/// Ensure a leading slash and strip one trailing slash
fn normalize_path(path: &str) -> String {
    let path = path.trim();
    let path = path.strip_suffix('/').unwrap_or(path);
    if path.is_empty() || path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_substituted_when_uri_has_none() {
        let ep = EndpointConfig::new(Some("https://172.17.4.202:443"), "/api/", "v1").unwrap();
        assert_eq!(ep.path(), "/api");
        assert_eq!(ep.api_root(), "https://172.17.4.202/api");
        assert_eq!(ep.api_base(), "https://172.17.4.202/api/v1");
    }

    #[test]
    fn test_uri_path_wins() {
        let ep = EndpointConfig::new(Some("http://localhost:8080/k8s/api/"), "/api", "v1").unwrap();
        assert_eq!(ep.path(), "/k8s/api");
        assert_eq!(ep.api_root(), "http://localhost:8080/k8s/api");
    }

    #[test]
    fn test_trailing_slash_stripped() {
        let ep = EndpointConfig::new(Some("http://localhost:8080"), "/api/", "v1").unwrap();
        assert!(!ep.path().ends_with('/'));
    }

    #[test]
    fn test_missing_uri() {
        assert_eq!(
            EndpointConfig::new(None, "/api", "v1"),
            Err(ConfigError::MissingEndpoint)
        );
        assert_eq!(
            EndpointConfig::new(Some("   "), "/api", "v1"),
            Err(ConfigError::MissingEndpoint)
        );
    }

    #[test]
    fn test_invalid_uri() {
        let err = EndpointConfig::new(Some("not a uri"), "/api", "v1").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEndpoint { .. }));
    }

    #[test]
    fn test_empty_version() {
        assert_eq!(
            EndpointConfig::new(Some("http://localhost"), "/api", ""),
            Err(ConfigError::MissingApiVersion)
        );
    }

    #[test]
    fn test_url_for() {
        let ep = EndpointConfig::new(Some("http://localhost:8080"), "/api", "v1").unwrap();
        assert_eq!(
            ep.url_for("namespaces/default/pods"),
            "http://localhost:8080/api/v1/namespaces/default/pods"
        );
        assert_eq!(
            ep.url_for("/namespaces/default/pods"),
            "http://localhost:8080/api/v1/namespaces/default/pods"
        );
    }

    #[test]
    fn test_relative_path_gets_leading_slash() {
        let ep = EndpointConfig::new(Some("http://localhost"), "api", "v1").unwrap();
        assert_eq!(ep.path(), "/api");
    }
}
