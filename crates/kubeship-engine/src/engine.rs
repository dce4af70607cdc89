//! Template renderer based on MiniJinja
//!
//! Templated manifests see the secret map as `secrets`:
//!
//! ```jinja2
//! apiVersion: v1
//! kind: Secret
//! metadata:
//!   name: tls
//! data:
//!   ca.pem: {{ secrets["ca.pem"] }}
//!   token: {{ secrets.token }}
//! ```

use minijinja::Environment;
use kubeship_core::SecretMap;
use std::path::Path;

use crate::error::{EngineError, Result, TemplateError, TemplateErrorKind};
use crate::filters;
use crate::suggestions;

/// Extension marking a manifest as a template
pub const TEMPLATE_EXTENSION: &str = "j2";

/// Renderer builder
pub struct RendererBuilder {
    strict_mode: bool,
}

impl Default for RendererBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RendererBuilder {
    pub fn new() -> Self {
        Self { strict_mode: true }
    }

    /// Set strict mode (fail on undefined secrets)
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict_mode = strict;
        self
    }

    pub fn build(self) -> Renderer {
        Renderer::new(self.strict_mode)
    }
}

/// Expands templated manifests with a secret map
#[derive(Debug, Clone)]
pub struct Renderer {
    strict_mode: bool,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Renderer {
    pub fn new(strict_mode: bool) -> Self {
        Self { strict_mode }
    }

    pub fn builder() -> RendererBuilder {
        RendererBuilder::new()
    }

    fn create_environment(&self) -> Environment<'static> {
        let mut env = Environment::new();

        if self.strict_mode {
            env.set_undefined_behavior(minijinja::UndefinedBehavior::Strict);
        } else {
            env.set_undefined_behavior(minijinja::UndefinedBehavior::Lenient);
        }
        env.set_keep_trailing_newline(true);

        env.add_filter("b64encode", filters::b64encode);
        env.add_filter("b64decode", filters::b64decode);
        env.add_filter("quote", filters::quote);
        env.add_filter("indent", filters::indent);
        env.add_filter("nindent", filters::nindent);

        env
    }

    /// Render template source held in memory
    pub fn render_str(&self, name: &str, source: &str, secrets: &SecretMap) -> Result<String> {
        let env = self.create_environment();
        let ctx = minijinja::context! {
            secrets => secrets,
        };

        env.render_named_str(name, source, ctx)
            .map_err(|e| self.template_error(e, name, source, secrets).into())
    }

    /// Read and render a template file
    pub fn render_file(&self, path: &Path, secrets: &SecretMap) -> Result<String> {
        let source = std::fs::read_to_string(path).map_err(|e| EngineError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        tracing::debug!(template = %name, secrets = secrets.len(), "rendering template");
        self.render_str(&name, &source, secrets)
    }

    fn template_error(
        &self,
        err: minijinja::Error,
        name: &str,
        source: &str,
        secrets: &SecretMap,
    ) -> TemplateError {
        let error = TemplateError::from_minijinja(err, name, source);
        match error.kind() {
            TemplateErrorKind::UndefinedVariable => {
                let available: Vec<&str> = secrets.names().collect();
                match suggestions::suggest_missing_secrets(source, &available) {
                    Some(help) => error.with_suggestion(help),
                    None => error,
                }
            }
            TemplateErrorKind::UnknownFilter => error.with_suggestion(format!(
                "Available filters: {}",
                suggestions::AVAILABLE_FILTERS.join(", ")
            )),
            _ => error,
        }
    }
}

/// Whether a path carries the template extension
pub fn is_template(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(TEMPLATE_EXTENSION)
}
