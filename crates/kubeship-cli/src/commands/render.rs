//! Render command - expand a templated manifest locally

use std::path::Path;

use console::style;
use kubeship_core::{load_secrets, parse_documents};
use kubeship_engine::Renderer;

use super::ConnectionArgs;
use crate::error::Result;

/// Run the render command
///
/// Nothing is sent to the API server. With `check`, the output is also
/// parsed as entity manifests and a one-line summary goes to stderr.
pub fn run(
    connection: &ConnectionArgs,
    file: &Path,
    secrets_dir: Option<&Path>,
    lenient: bool,
    check: bool,
) -> Result<()> {
    let config = connection.load_config()?;
    let secrets = load_secrets(secrets_dir.unwrap_or(config.secrets_dir.as_path()))?;

    let renderer = Renderer::builder().strict(!lenient).build();
    let rendered = renderer.render_file(file, &secrets)?;

    print!("{}", rendered);

    if check {
        let manifests = parse_documents(&rendered, &file.display().to_string())?;
        eprintln!(
            "{} {} entit{} in {}",
            style("✓").green().bold(),
            manifests.len(),
            if manifests.len() == 1 { "y" } else { "ies" },
            style(file.display()).cyan()
        );
    }

    Ok(())
}
