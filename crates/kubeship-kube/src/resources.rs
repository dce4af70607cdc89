//! Per-entity actions and their batch summary

use kubeship_core::EntityManifest;

use crate::client::{RestClient, RestResult};
use crate::error::RequestFailure;

/// What a batch does with each entity it reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityAction {
    /// POST to the collection
    Create,
    /// PUT to the item path
    Update,
    /// DELETE the item path
    Delete,
}

impl EntityAction {
    /// Past tense, for summaries
    pub fn past_tense(&self) -> &'static str {
        match self {
            EntityAction::Create => "created",
            EntityAction::Update => "updated",
            EntityAction::Delete => "deleted",
        }
    }

    /// Submit one entity through the client
    pub async fn submit(&self, client: &RestClient, manifest: &EntityManifest) -> RestResult {
        match self {
            EntityAction::Create => client.create_entity(manifest).await,
            EntityAction::Update => client.update_entity(manifest).await,
            EntityAction::Delete => client.delete_manifest(manifest).await,
        }
    }

    /// Failure text for the summary, naming the usual conflicts
    pub fn describe_failure(&self, failure: &RequestFailure) -> String {
        match self {
            EntityAction::Create if failure.is_conflict() => format!("{} (already exists)", failure),
            EntityAction::Update | EntityAction::Delete if failure.is_not_found() => {
                format!("{} (does not exist)", failure)
            }
            _ => failure.to_string(),
        }
    }
}

impl std::fmt::Display for EntityAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let verb = match self {
            EntityAction::Create => "create",
            EntityAction::Update => "update",
            EntityAction::Delete => "delete",
        };
        f.write_str(verb)
    }
}

/// Per-entity outcome of a batch, in submission order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationSummary {
    /// `ns/Kind/name (past tense)` for each accepted request
    pub succeeded: Vec<String>,
    /// Entity or file label with the failure text
    pub failed: Vec<(String, String)>,
    /// Files not submitted, with the reason
    pub skipped: Vec<(String, String)>,
}

impl OperationSummary {
    /// No entity or file failed; skips don't count
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Entries seen by the batch, skipped ones included
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len() + self.skipped.len()
    }

    /// Fold another summary into this one, keeping order
    pub fn merge(&mut self, other: OperationSummary) {
        self.succeeded.extend(other.succeeded);
        self.failed.extend(other.failed);
        self.skipped.extend(other.skipped);
    }

    /// One-line tally such as `2 succeeded, 1 skipped`
    pub fn summary(&self) -> String {
        let mut parts = Vec::with_capacity(3);
        if !self.succeeded.is_empty() {
            parts.push(format!("{} succeeded", self.succeeded.len()));
        }
        if !self.failed.is_empty() {
            parts.push(format!("{} failed", self.failed.len()));
        }
        if !self.skipped.is_empty() {
            parts.push(format!("{} skipped", self.skipped.len()));
        }
        if parts.is_empty() {
            "No entities processed".to_string()
        } else {
            parts.join(", ")
        }
    }
}
