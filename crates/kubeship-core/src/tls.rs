//! TLS options for the API transport

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Server certificate verification mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerifyMode {
    /// Verify the server certificate chain and hostname
    #[default]
    Peer,
    /// Accept any server certificate
    None,
}

/// TLS material and verification settings
///
/// With no `ca_file`, the built-in root store is used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SslOptions {
    /// PEM client certificate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_cert: Option<PathBuf>,

    /// PEM client private key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_key: Option<PathBuf>,

    /// PEM CA bundle used to verify the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_file: Option<PathBuf>,

    #[serde(default)]
    pub verify_ssl: VerifyMode,
}

impl SslOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.client_cert.is_some() != self.client_key.is_some() {
            return Err(ConfigError::IncompleteClientCert);
        }
        Ok(())
    }

    /// Client certificate followed by its key, as one PEM bundle
    pub fn identity_pem(&self) -> Result<Option<Vec<u8>>, ConfigError> {
        self.validate()?;

        match (&self.client_cert, &self.client_key) {
            (Some(cert), Some(key)) => {
                let mut pem = read_pem(cert)?;
                if !pem.ends_with(b"\n") {
                    pem.push(b'\n');
                }
                pem.extend(read_pem(key)?);
                Ok(Some(pem))
            }
            _ => Ok(None),
        }
    }

    /// CA bundle contents, if configured
    pub fn ca_pem(&self) -> Result<Option<Vec<u8>>, ConfigError> {
        self.ca_file.as_deref().map(read_pem).transpose()
    }

    pub fn accepts_invalid_certs(&self) -> bool {
        self.verify_ssl == VerifyMode::None
    }
}

fn read_pem(path: &Path) -> Result<Vec<u8>, ConfigError> {
    std::fs::read(path).map_err(|e| ConfigError::TlsFileUnreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cert_without_key() {
        let opts = SslOptions {
            client_cert: Some(PathBuf::from("admin.pem")),
            ..SslOptions::default()
        };
        assert_eq!(opts.validate(), Err(ConfigError::IncompleteClientCert));
    }

    #[test]
    fn test_identity_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let cert = dir.path().join("admin.pem");
        let key = dir.path().join("admin-key.pem");
        std::fs::write(&cert, "CERT").unwrap();
        std::fs::write(&key, "KEY\n").unwrap();

        let opts = SslOptions {
            client_cert: Some(cert),
            client_key: Some(key),
            ..SslOptions::default()
        };
        let pem = opts.identity_pem().unwrap().unwrap();
        assert_eq!(pem, b"CERT\nKEY\n");
    }

    #[test]
    fn test_missing_ca_file() {
        let opts = SslOptions {
            ca_file: Some(PathBuf::from("/definitely/not/here/ca.pem")),
            ..SslOptions::default()
        };
        assert!(matches!(
            opts.ca_pem(),
            Err(ConfigError::TlsFileUnreadable { .. })
        ));
    }

    #[test]
    fn test_verify_mode_yaml() {
        let opts: SslOptions = serde_yaml::from_str("verifySsl: none\n").unwrap();
        assert!(opts.accepts_invalid_certs());
        assert_eq!(SslOptions::default().verify_ssl, VerifyMode::Peer);
    }
}
