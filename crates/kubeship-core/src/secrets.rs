//! Secret files loaded for template injection
//!
//! Every regular file directly inside the secrets directory becomes one entry,
//! keyed by its file name, holding the base64 encoding of the whole file:
//!
//! ```text
//! secrets/
//!   ca.pem          -> secrets["ca.pem"]  = "LS0tLS1CRUdJTi..."
//!   db-password     -> secrets["db-password"] = "aHVudGVyMg=="
//! ```
//!
//! The map is built fresh for each batch and never cached.

use base64::Engine;
use indexmap::IndexMap;
use serde::Serialize;
use std::path::Path;
use walkdir::WalkDir;

use crate::error::{CoreError, Result};

/// File name -> base64(content)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SecretMap(IndexMap<String, String>);

impl SecretMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode raw content and store it under `name`
    pub fn insert_raw(&mut self, name: impl Into<String>, content: &[u8]) {
        let encoded = base64::engine::general_purpose::STANDARD.encode(content);
        self.0.insert(name.into(), encoded);
    }

    /// Encoded value for a secret
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Build a secret map from the files of `dir`
///
/// Subdirectories are not descended into. Entries are visited in file name
/// order so the map is stable across runs.
pub fn load_secrets(dir: &Path) -> Result<SecretMap> {
    if !dir.is_dir() {
        return Err(CoreError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut secrets = SecretMap::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| CoreError::FileAccess {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;

        // Follow symlinks to files, skip anything that isn't one
        if !entry.path().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_string();
        let content = std::fs::read(entry.path()).map_err(|e| CoreError::FileAccess {
            path: entry.path().to_path_buf(),
            message: e.to_string(),
        })?;

        tracing::debug!(secret = %name, bytes = content.len(), "loaded secret");
        secrets.insert_raw(name, &content);
    }

    Ok(secrets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_secrets() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a"), "hello").unwrap();
        std::fs::write(dir.path().join("b"), "world").unwrap();

        let secrets = load_secrets(dir.path()).unwrap();
        assert_eq!(secrets.len(), 2);
        assert_eq!(secrets.get("a"), Some("aGVsbG8="));
        assert_eq!(secrets.get("b"), Some("d29ybGQ="));
    }

    #[test]
    fn test_whole_file_encoded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("multi"), "line one\nline two\n").unwrap();

        let secrets = load_secrets(dir.path()).unwrap();
        let expected =
            base64::engine::general_purpose::STANDARD.encode("line one\nline two\n");
        assert_eq!(secrets.get("multi"), Some(expected.as_str()));
    }

    #[test]
    fn test_subdirectories_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("inner"), "x").unwrap();
        std::fs::write(dir.path().join("top"), "y").unwrap();

        let secrets = load_secrets(dir.path()).unwrap();
        assert_eq!(secrets.names().collect::<Vec<_>>(), vec!["top"]);
    }

    #[test]
    fn test_binary_content() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("key.der"), [0u8, 159, 146, 150]).unwrap();

        let secrets = load_secrets(dir.path()).unwrap();
        assert_eq!(secrets.get("key.der"), Some("AJ+Slg=="));
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_secrets(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, CoreError::DirectoryNotFound { .. }));
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_secrets(dir.path()).unwrap().is_empty());
    }
}
