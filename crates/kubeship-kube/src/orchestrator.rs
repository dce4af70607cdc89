//! Directory-driven batches of entity operations
//!
//! Entries of the entities directory are visited in file-name order and
//! classified by extension. Templated entries are rendered with the secret map
//! into a scratch file that lives only for the duration of its submission.

use std::io::Write;
use std::path::{Path, PathBuf};

use kubeship_core::naming::is_known_kind;
use kubeship_core::{CoreError, SecretMap, load_file, load_secrets};
use kubeship_engine::{Renderer, TEMPLATE_EXTENSION};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::client::RestClient;
use crate::error::Result;
use crate::resources::{EntityAction, OperationSummary};

/// Reason recorded for templated entries outside of a deploy
const TEMPLATE_SKIP_REASON: &str = "templated manifests are only rendered on create";

/// How an entry of the entities directory is handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityFile {
    /// `.j2`: rendered with secrets before submission
    Templated(PathBuf),
    /// `.yml` / `.yaml`: submitted as written
    Static(PathBuf),
    /// Anything else
    Ignored(PathBuf),
}

impl EntityFile {
    pub fn classify(path: &Path) -> Self {
        let path_buf = path.to_path_buf();
        match path.extension().and_then(|e| e.to_str()) {
            Some(TEMPLATE_EXTENSION) => EntityFile::Templated(path_buf),
            Some("yml") | Some("yaml") => EntityFile::Static(path_buf),
            _ => EntityFile::Ignored(path_buf),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            EntityFile::Templated(path) | EntityFile::Static(path) | EntityFile::Ignored(path) => {
                path
            }
        }
    }

    /// File name used to label summary entries
    pub fn label(&self) -> String {
        file_label(self.path())
    }
}

/// Runs batches against one client
pub struct BulkOrchestrator<'a> {
    client: &'a RestClient,
    renderer: Renderer,
    scratch_dir: Option<PathBuf>,
}

impl<'a> BulkOrchestrator<'a> {
    pub fn new(client: &'a RestClient) -> Self {
        Self {
            client,
            renderer: Renderer::default(),
            scratch_dir: None,
        }
    }

    pub fn with_renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Directory for rendered scratch files (system temp dir by default)
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    /// Create every entity in `entities_dir`, rendering templates with the
    /// secrets found in `secrets_dir`
    pub async fn deploy_all(&self, secrets_dir: &Path, entities_dir: &Path) -> Result<OperationSummary> {
        let secrets = load_secrets(secrets_dir)?;
        let entries = list_entries(entities_dir)?;
        info!(
            secrets = secrets.len(),
            entries = entries.len(),
            dir = %entities_dir.display(),
            "deploying entities"
        );

        let mut summary = OperationSummary::default();
        for entry in &entries {
            match entry {
                EntityFile::Templated(path) => {
                    summary.merge(self.submit_template(path, &secrets).await);
                }
                EntityFile::Static(path) => {
                    summary.merge(self.submit_file(path, &entry.label(), EntityAction::Create).await);
                }
                EntityFile::Ignored(_) => skip_unsupported(entry, &mut summary),
            }
        }

        info!(result = %summary.summary(), "deploy finished");
        Ok(summary)
    }

    /// Replace every entity described by the static manifests in `entities_dir`
    pub async fn update_all(&self, entities_dir: &Path) -> Result<OperationSummary> {
        self.run_static(entities_dir, EntityAction::Update).await
    }

    /// Delete every entity described by the static manifests in `entities_dir`
    pub async fn delete_all(&self, entities_dir: &Path) -> Result<OperationSummary> {
        self.run_static(entities_dir, EntityAction::Delete).await
    }

    /// Apply one action to every document of a single manifest file
    pub async fn apply_file(&self, path: &Path, action: EntityAction) -> OperationSummary {
        self.submit_file(path, &file_label(path), action).await
    }

    /// Render a template and create its entities through a scratch file
    pub async fn apply_template(&self, path: &Path, secrets: &SecretMap) -> OperationSummary {
        self.submit_template(path, secrets).await
    }

    async fn run_static(&self, entities_dir: &Path, action: EntityAction) -> Result<OperationSummary> {
        let entries = list_entries(entities_dir)?;
        info!(
            %action,
            entries = entries.len(),
            dir = %entities_dir.display(),
            "processing entities"
        );

        let mut summary = OperationSummary::default();
        for entry in &entries {
            match entry {
                EntityFile::Static(path) => {
                    summary.merge(self.submit_file(path, &entry.label(), action).await);
                }
                EntityFile::Templated(_) => {
                    summary
                        .skipped
                        .push((entry.label(), TEMPLATE_SKIP_REASON.to_string()));
                }
                EntityFile::Ignored(_) => skip_unsupported(entry, &mut summary),
            }
        }

        info!(%action, result = %summary.summary(), "batch finished");
        Ok(summary)
    }

    async fn submit_template(&self, path: &Path, secrets: &SecretMap) -> OperationSummary {
        let label = file_label(path);
        let mut summary = OperationSummary::default();

        let rendered = match self.renderer.render_file(path, secrets) {
            Ok(rendered) => rendered,
            Err(e) => {
                summary.failed.push((label, e.to_string()));
                return summary;
            }
        };

        let scratch = match self.write_scratch(&rendered) {
            Ok(scratch) => scratch,
            Err(e) => {
                summary
                    .failed
                    .push((label, format!("failed to write rendered manifest: {}", e)));
                return summary;
            }
        };
        debug!(template = %label, scratch = %scratch.path().display(), "rendered template");

        // `scratch` is removed when it goes out of scope
        self.submit_file(scratch.path(), &label, EntityAction::Create)
            .await
    }

    async fn submit_file(&self, path: &Path, label: &str, action: EntityAction) -> OperationSummary {
        let mut summary = OperationSummary::default();

        let manifests = match load_file(path) {
            Ok(manifests) => manifests,
            Err(e) => {
                summary.failed.push((label.to_string(), e.to_string()));
                return summary;
            }
        };

        if manifests.is_empty() {
            summary
                .skipped
                .push((label.to_string(), "no entity documents".to_string()));
            return summary;
        }

        for manifest in &manifests {
            let name = manifest.display_name();
            if !is_known_kind(&manifest.kind) {
                warn!(kind = %manifest.kind, "kind is not served by the core API group");
            }
            match action.submit(self.client, manifest).await {
                Ok(_) => summary
                    .succeeded
                    .push(format!("{} ({})", name, action.past_tense())),
                Err(failure) => summary.failed.push((name, action.describe_failure(&failure))),
            }
        }

        summary
    }

    fn write_scratch(&self, rendered: &str) -> std::io::Result<tempfile::NamedTempFile> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("kubeship-").suffix(".yml");

        let mut scratch = match &self.scratch_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        scratch.write_all(rendered.as_bytes())?;
        scratch.flush()?;
        Ok(scratch)
    }
}

/// Files directly inside `dir` (symlinks followed), sorted by name
pub fn list_entries(dir: &Path) -> Result<Vec<EntityFile>> {
    if !dir.is_dir() {
        return Err(CoreError::DirectoryNotFound {
            path: dir.to_path_buf(),
        }
        .into());
    }

    let mut entries = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| CoreError::FileAccess {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;
        // Mounted config directories are symlinks all the way down
        if entry.path().is_file() {
            entries.push(EntityFile::classify(entry.path()));
        }
    }

    Ok(entries)
}

fn skip_unsupported(entry: &EntityFile, summary: &mut OperationSummary) {
    debug!(file = %entry.path().display(), "ignoring entry with unsupported extension");
    summary
        .skipped
        .push((entry.label(), "unsupported extension".to_string()));
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
