//! Create command - deploy every entity of the entities directory

use console::style;
use kubeship_kube::{BulkOrchestrator, EntityAction};
use tokio_util::sync::CancellationToken;

use super::{BatchArgs, ConnectionArgs, finish, wait_for_api};
use crate::display;
use crate::error::Result;

/// Run the create command
pub async fn run(
    connection: &ConnectionArgs,
    batch: &BatchArgs,
    shutdown: &CancellationToken,
) -> Result<()> {
    let (config, client) = connection.connect()?;
    wait_for_api(&client, &config, &batch.wait, shutdown).await?;

    let secrets_dir = batch.secrets_dir(&config);
    let entities_dir = batch.entities_dir(&config);

    println!(
        "{} Creating entities from {} (secrets: {})",
        style("→").blue().bold(),
        style(entities_dir.display()).cyan(),
        style(secrets_dir.display()).yellow()
    );

    let summary = BulkOrchestrator::new(&client)
        .deploy_all(secrets_dir, entities_dir)
        .await?;

    display::print_summary(EntityAction::Create, &summary);
    finish(&summary)
}
