//! Kubeship Engine - Jinja2 templating for entity manifests
//!
//! This crate provides a MiniJinja-based renderer with:
//! - The secret map exposed as `secrets`
//! - Base64 and formatting filters
//! - Source-annotated error messages with hints for missing secrets

pub mod engine;
pub mod error;
pub mod filters;
pub mod suggestions;

pub use engine::{Renderer, RendererBuilder, TEMPLATE_EXTENSION, is_template};
pub use error::{EngineError, Result, TemplateError, TemplateErrorKind};
pub use suggestions::AVAILABLE_FILTERS;
