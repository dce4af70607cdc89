//! Entity manifests
//!
//! A manifest file holds one or more YAML documents, each describing one
//! entity. Only `kind`, `metadata.name` and `metadata.namespace` are
//! interpreted; the rest of the body is passed to the API server untouched.

use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::path::Path;

use crate::error::{CoreError, Result};
use crate::naming;

/// A single entity ready for submission
#[derive(Debug, Clone, PartialEq)]
pub struct EntityManifest {
    /// Entity kind (e.g. `Pod`)
    pub kind: String,
    /// `metadata.name`, required for update/delete/get
    pub name: Option<String>,
    /// `metadata.namespace` as written
    pub namespace: Option<String>,
    /// Full document, sent as the request body
    pub body: JsonValue,
}

impl EntityManifest {
    /// Build from a decoded document
    pub fn from_value(body: JsonValue, source_name: &str) -> Result<Self> {
        let invalid = |message: &str| CoreError::InvalidManifest {
            source_name: source_name.to_string(),
            message: message.to_string(),
        };

        if !body.is_object() {
            return Err(invalid("document is not a mapping"));
        }

        let kind = body
            .get("kind")
            .and_then(JsonValue::as_str)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| invalid("missing 'kind'"))?
            .to_string();

        let metadata = body.get("metadata");
        let name = metadata
            .and_then(|m| m.get("name"))
            .and_then(JsonValue::as_str)
            .filter(|n| !n.is_empty())
            .map(String::from);
        let namespace = metadata
            .and_then(|m| m.get("namespace"))
            .and_then(JsonValue::as_str)
            .map(String::from);

        Ok(Self {
            kind,
            name,
            namespace,
            body,
        })
    }

    /// Namespace the entity lands in
    pub fn effective_namespace(&self) -> &str {
        naming::effective_namespace(self.namespace.as_deref())
    }

    /// Collection path used for creation
    pub fn collection_path(&self) -> String {
        naming::entity_path(&self.kind, self.namespace.as_deref(), None)
    }

    /// Item path used for update, delete and get
    pub fn item_path(&self) -> Option<String> {
        self.name
            .as_deref()
            .map(|name| naming::entity_path(&self.kind, self.namespace.as_deref(), Some(name)))
    }

    /// Human-readable identifier for logs: `ns/Kind/name`
    pub fn display_name(&self) -> String {
        format!(
            "{}/{}/{}",
            self.effective_namespace(),
            self.kind,
            self.name.as_deref().unwrap_or("unnamed")
        )
    }
}

/// Parse every entity document from YAML text
///
/// Empty documents (bare `---` separators, comment-only sections) are framing
/// and are skipped.
pub fn parse_documents(text: &str, source_name: &str) -> Result<Vec<EntityManifest>> {
    let mut manifests = Vec::new();

    for document in serde_yaml::Deserializer::from_str(text) {
        let value = JsonValue::deserialize(document)?;
        if value.is_null() {
            continue;
        }
        manifests.push(EntityManifest::from_value(value, source_name)?);
    }

    Ok(manifests)
}

/// Read and parse a manifest file
pub fn load_file(path: &Path) -> Result<Vec<EntityManifest>> {
    let text = std::fs::read_to_string(path).map_err(|e| CoreError::FileAccess {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    parse_documents(&text, &path.display().to_string())
}
