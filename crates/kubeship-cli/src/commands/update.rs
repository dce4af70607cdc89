//! Update command - replace every entity described by static manifests

use console::style;
use kubeship_kube::{BulkOrchestrator, EntityAction};
use tokio_util::sync::CancellationToken;

use super::{BatchArgs, ConnectionArgs, finish, wait_for_api};
use crate::display;
use crate::error::Result;

/// Run the update command
pub async fn run(
    connection: &ConnectionArgs,
    batch: &BatchArgs,
    shutdown: &CancellationToken,
) -> Result<()> {
    let (config, client) = connection.connect()?;
    wait_for_api(&client, &config, &batch.wait, shutdown).await?;

    let entities_dir = batch.entities_dir(&config);
    println!(
        "{} Updating entities from {}",
        style("→").blue().bold(),
        style(entities_dir.display()).cyan()
    );

    let summary = BulkOrchestrator::new(&client)
        .update_all(entities_dir)
        .await?;

    display::print_summary(EntityAction::Update, &summary);
    finish(&summary)
}
