//! Custom command - create the entities of a single manifest file

use std::path::Path;

use console::style;
use kubeship_core::load_secrets;
use kubeship_engine::is_template;
use kubeship_kube::{BulkOrchestrator, EntityAction};
use tokio_util::sync::CancellationToken;

use super::{ConnectionArgs, WaitArgs, finish, wait_for_api};
use crate::display;
use crate::error::Result;

/// Run the custom command
///
/// A `.j2` file is rendered with the secrets directory first.
pub async fn run(
    connection: &ConnectionArgs,
    file: &Path,
    secrets_dir: Option<&Path>,
    wait: &WaitArgs,
    shutdown: &CancellationToken,
) -> Result<()> {
    let (config, client) = connection.connect()?;
    wait_for_api(&client, &config, wait, shutdown).await?;

    println!(
        "{} Creating entities from {}",
        style("→").blue().bold(),
        style(file.display()).cyan()
    );

    let orchestrator = BulkOrchestrator::new(&client);
    let summary = if is_template(file) {
        let secrets = load_secrets(secrets_dir.unwrap_or(config.secrets_dir.as_path()))?;
        orchestrator.apply_template(file, &secrets).await
    } else {
        orchestrator.apply_file(file, EntityAction::Create).await
    };

    display::print_summary(EntityAction::Create, &summary);
    finish(&summary)
}
