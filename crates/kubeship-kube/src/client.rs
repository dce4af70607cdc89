//! REST façade over the API server
//!
//! Every call goes through a single funnel that turns the HTTP exchange into a
//! [`RestResult`]. Failures are logged once, at warn level, and handed back as
//! values so batch callers can keep going.

use std::time::Duration;

use kubeship_core::{
    AuthOptions, ClientConfig, ConfigError, Credentials, EndpointConfig, EntityManifest, SslOptions,
};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::error::{KubeError, RequestFailure, Result};

/// Decoded JSON body on success, classified failure otherwise
pub type RestResult = std::result::Result<JsonValue, RequestFailure>;

/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for entity CRUD against one API server
#[derive(Debug, Clone)]
pub struct RestClient {
    http: Client,
    endpoint: EndpointConfig,
    credentials: Credentials,
}

impl RestClient {
    /// Build a client, validating auth and TLS options without any network I/O
    ///
    /// A bearer token is installed as a default header here, so a token that
    /// cannot be sent is rejected before any request.
    pub fn new(endpoint: EndpointConfig, auth: &AuthOptions, ssl: &SslOptions) -> Result<Self> {
        Self::with_timeout(endpoint, auth, ssl, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(
        endpoint: EndpointConfig,
        auth: &AuthOptions,
        ssl: &SslOptions,
        timeout: Duration,
    ) -> Result<Self> {
        let credentials = auth.resolve()?;
        let http = build_http(ssl, &credentials, timeout)?;

        debug!(
            endpoint = %endpoint,
            auth = credentials.mode(),
            verify = ?ssl.verify_ssl,
            "created API client"
        );

        Ok(Self {
            http,
            endpoint,
            credentials,
        })
    }

    /// Build a client from a loaded configuration file
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        Self::with_timeout(
            config.endpoint()?,
            &config.auth,
            &config.tls,
            config.request_timeout,
        )
    }

    pub fn endpoint(&self) -> &EndpointConfig {
        &self.endpoint
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    // ========== Raw verbs ==========

    /// GET a path relative to `{api_root}/{version}/`
    pub async fn get(&self, relative: &str) -> RestResult {
        self.execute(Method::GET, self.endpoint.url_for(relative), None)
            .await
    }

    /// POST a JSON body to a relative path
    pub async fn post(&self, relative: &str, body: &JsonValue) -> RestResult {
        self.execute(Method::POST, self.endpoint.url_for(relative), Some(body))
            .await
    }

    /// PUT a JSON body to a relative path
    pub async fn put(&self, relative: &str, body: &JsonValue) -> RestResult {
        self.execute(Method::PUT, self.endpoint.url_for(relative), Some(body))
            .await
    }

    pub async fn delete(&self, relative: &str) -> RestResult {
        self.execute(Method::DELETE, self.endpoint.url_for(relative), None)
            .await
    }

    /// GET the API root, which lists the served versions
    pub async fn discover(&self) -> RestResult {
        self.execute(Method::GET, self.endpoint.api_root(), None).await
    }

    /// Whether the server is reachable and serves the configured version
    pub async fn api_valid(&self) -> bool {
        match self.discover().await {
            Ok(body) => serves_version(&body, self.endpoint.api_version()),
            Err(_) => false,
        }
    }

    // ========== Entity operations ==========

    /// Create an entity by POSTing it to its collection
    pub async fn create_entity(&self, manifest: &EntityManifest) -> RestResult {
        debug!(entity = %manifest.display_name(), "creating entity");
        self.post(&manifest.collection_path(), &manifest.body).await
    }

    /// Replace an existing entity with a PUT on its item path
    pub async fn update_entity(&self, manifest: &EntityManifest) -> RestResult {
        let path = item_path(manifest)?;
        debug!(entity = %manifest.display_name(), "updating entity");
        self.put(&path, &manifest.body).await
    }

    /// Delete the entity a manifest describes
    pub async fn delete_manifest(&self, manifest: &EntityManifest) -> RestResult {
        let path = item_path(manifest)?;
        debug!(entity = %manifest.display_name(), "deleting entity");
        self.delete(&path).await
    }

    pub async fn delete_entity(&self, kind: &str, name: &str, namespace: Option<&str>) -> RestResult {
        self.delete(&kubeship_core::entity_path(kind, namespace, Some(name)))
            .await
    }

    pub async fn get_entity(&self, kind: &str, name: &str, namespace: Option<&str>) -> RestResult {
        self.get(&kubeship_core::entity_path(kind, namespace, Some(name)))
            .await
    }

    // ========== Funnel ==========

    async fn execute(&self, method: Method, url: String, body: Option<&JsonValue>) -> RestResult {
        debug!(%method, %url, "sending request");

        let outcome = match self.prepare(method.clone(), &url, body).send().await {
            Ok(response) => read_response(response).await,
            Err(e) => Err(RequestFailure::Transport {
                message: e.to_string(),
            }),
        };

        if let Err(failure) = &outcome {
            warn!(%method, %url, "{}", failure);
        }
        outcome
    }

    /// Basic auth and the JSON body; a bearer token is already a default header
    fn prepare(&self, method: Method, url: &str, body: Option<&JsonValue>) -> RequestBuilder {
        let mut request = self.http.request(method, url);

        if let Some((username, password)) = self.credentials.basic_pair() {
            request = request.basic_auth(username, Some(password));
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        request
    }
}

fn build_http(ssl: &SslOptions, credentials: &Credentials, timeout: Duration) -> Result<Client> {
    let mut builder = Client::builder()
        .use_rustls_tls()
        .timeout(timeout)
        .user_agent(concat!("kubeship/", env!("CARGO_PKG_VERSION")))
        .default_headers(default_headers(credentials)?);

    if let Some(pem) = ssl.identity_pem()? {
        let identity = reqwest::Identity::from_pem(&pem)
            .map_err(|e| KubeError::Transport(format!("invalid client certificate: {}", e)))?;
        builder = builder.identity(identity);
    }

    if let Some(pem) = ssl.ca_pem()? {
        let certificates = reqwest::Certificate::from_pem_bundle(&pem)
            .map_err(|e| KubeError::Transport(format!("invalid CA bundle: {}", e)))?;
        if certificates.is_empty() {
            return Err(KubeError::Transport(
                "invalid CA bundle: no PEM certificates found".to_string(),
            ));
        }
        for certificate in certificates {
            builder = builder.add_root_certificate(certificate);
        }
    }

    if ssl.accepts_invalid_certs() {
        builder = builder.danger_accept_invalid_certs(true);
    }

    Ok(builder.build()?)
}

fn default_headers(credentials: &Credentials) -> std::result::Result<HeaderMap, ConfigError> {
    let mut headers = HeaderMap::new();
    if let Some(header) = credentials.bearer_header() {
        let mut value =
            HeaderValue::from_str(&header).map_err(|_| ConfigError::InvalidBearerToken)?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}

async fn read_response(response: Response) -> RestResult {
    let status = response.status();
    let bytes = response
        .bytes()
        .await
        .map_err(|e| RequestFailure::Transport {
            message: e.to_string(),
        })?;

    if !status.is_success() {
        let message = status_message(&bytes).unwrap_or_else(|| status.to_string());
        return Err(RequestFailure::Status {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_slice(&bytes).map_err(|e| RequestFailure::Decode {
        message: e.to_string(),
    })
}

/// `message` field of an error body, when the server sent a Status object
fn status_message(bytes: &[u8]) -> Option<String> {
    let body: JsonValue = serde_json::from_slice(bytes).ok()?;
    body.get("message")
        .and_then(JsonValue::as_str)
        .filter(|m| !m.is_empty())
        .map(String::from)
}

fn serves_version(body: &JsonValue, version: &str) -> bool {
    body.get("versions")
        .and_then(JsonValue::as_array)
        .is_some_and(|versions| versions.iter().any(|v| v.as_str() == Some(version)))
}

fn item_path(manifest: &EntityManifest) -> std::result::Result<String, RequestFailure> {
    manifest.item_path().ok_or_else(|| RequestFailure::Invalid {
        message: format!("{} has no metadata.name", manifest.display_name()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serves_version() {
        let body = json!({"kind": "APIVersions", "versions": ["v1"]});
        assert!(serves_version(&body, "v1"));
        assert!(!serves_version(&body, "v2"));
        assert!(!serves_version(&json!({}), "v1"));
        assert!(!serves_version(&json!({"versions": "v1"}), "v1"));
    }

    #[test]
    fn test_status_message() {
        assert_eq!(
            status_message(br#"{"kind":"Status","message":"not found"}"#).as_deref(),
            Some("not found")
        );
        assert_eq!(status_message(b"<html>oops</html>"), None);
        assert_eq!(status_message(br#"{"message":""}"#), None);
    }

    #[test]
    fn test_rejects_conflicting_auth() {
        let endpoint = EndpointConfig::new(Some("http://localhost:8080"), "/api", "v1").unwrap();
        let auth = AuthOptions {
            username: Some("admin".to_string()),
            password: Some("secret".to_string()),
            bearer_token: Some("token".to_string()),
            ..Default::default()
        };

        let err = RestClient::new(endpoint, &auth, &SslOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            KubeError::Config(ConfigError::ConflictingAuth)
        ));
    }

    #[test]
    fn test_rejects_missing_token_file() {
        let endpoint = EndpointConfig::new(Some("http://localhost:8080"), "/api", "v1").unwrap();
        let auth = AuthOptions::bearer_file("/nonexistent/kubeship/token");

        let err = RestClient::new(endpoint, &auth, &SslOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            KubeError::Config(ConfigError::TokenFileMissing { .. })
        ));
    }

    #[test]
    fn test_rejects_unsendable_bearer_token() {
        let endpoint = EndpointConfig::new(Some("http://localhost:8080"), "/api", "v1").unwrap();

        let err = RestClient::new(endpoint, &AuthOptions::bearer("abc\ndef"), &SslOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            KubeError::Config(ConfigError::InvalidBearerToken)
        ));
    }

    #[test]
    fn test_default_headers() {
        let bearer = AuthOptions::bearer("abc").resolve().unwrap();
        let headers = default_headers(&bearer).unwrap();
        let value = headers.get(AUTHORIZATION).unwrap();
        assert_eq!(value, "Bearer abc");
        assert!(value.is_sensitive());

        let basic = AuthOptions::basic("admin", "secret").resolve().unwrap();
        assert!(default_headers(&basic).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_garbage_ca_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let ca = dir.path().join("ca.pem");
        std::fs::write(&ca, "this is not a certificate\n").unwrap();

        let endpoint = EndpointConfig::new(Some("https://localhost:6443"), "/api", "v1").unwrap();
        let ssl = SslOptions {
            ca_file: Some(ca),
            ..SslOptions::default()
        };

        let err = RestClient::new(endpoint, &AuthOptions::default(), &ssl).unwrap_err();
        let KubeError::Transport(message) = err else {
            panic!("expected transport error, got {:?}", err);
        };
        assert!(message.contains("CA bundle"), "{}", message);
    }

    #[test]
    fn test_rejects_undecodable_ca_certificate() {
        let dir = tempfile::tempdir().unwrap();
        let ca = dir.path().join("ca.pem");
        std::fs::write(
            &ca,
            "-----BEGIN CERTIFICATE-----\nbm90IGEgY2VydGlmaWNhdGU=\n-----END CERTIFICATE-----\n",
        )
        .unwrap();

        let endpoint = EndpointConfig::new(Some("https://localhost:6443"), "/api", "v1").unwrap();
        let ssl = SslOptions {
            ca_file: Some(ca),
            ..SslOptions::default()
        };

        let err = RestClient::new(endpoint, &AuthOptions::default(), &ssl).unwrap_err();
        assert!(matches!(err, KubeError::Transport(_)), "{:?}", err);
    }

    #[test]
    fn test_rejects_garbage_client_identity() {
        let dir = tempfile::tempdir().unwrap();
        let cert = dir.path().join("admin.pem");
        let key = dir.path().join("admin-key.pem");
        std::fs::write(&cert, "CERT\n").unwrap();
        std::fs::write(&key, "KEY\n").unwrap();

        let endpoint = EndpointConfig::new(Some("https://localhost:6443"), "/api", "v1").unwrap();
        let ssl = SslOptions {
            client_cert: Some(cert),
            client_key: Some(key),
            ..SslOptions::default()
        };

        let err = RestClient::new(endpoint, &AuthOptions::default(), &ssl).unwrap_err();
        let KubeError::Transport(message) = err else {
            panic!("expected transport error, got {:?}", err);
        };
        assert!(message.contains("client certificate"), "{}", message);
    }

    #[test]
    fn test_missing_ca_file_is_config_error() {
        let endpoint = EndpointConfig::new(Some("https://localhost:6443"), "/api", "v1").unwrap();
        let ssl = SslOptions {
            ca_file: Some("/nonexistent/kubeship/ca.pem".into()),
            ..SslOptions::default()
        };

        let err = RestClient::new(endpoint, &AuthOptions::default(), &ssl).unwrap_err();
        assert!(matches!(
            err,
            KubeError::Config(ConfigError::TlsFileUnreadable { .. })
        ));
    }

    #[test]
    fn test_update_without_name_is_invalid() {
        let manifest = EntityManifest::from_value(json!({"kind": "Pod"}), "pod.yml").unwrap();
        let failure = item_path(&manifest).unwrap_err();
        assert!(matches!(failure, RequestFailure::Invalid { .. }));
    }
}
