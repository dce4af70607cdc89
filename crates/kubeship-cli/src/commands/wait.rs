//! Wait command - block until the API server is ready

use tokio_util::sync::CancellationToken;

use super::{ConnectionArgs, WaitArgs, wait_for_api};
use crate::error::Result;

/// Run the wait command
pub async fn run(
    connection: &ConnectionArgs,
    ready_timeout: Option<u64>,
    shutdown: &CancellationToken,
) -> Result<()> {
    let (config, client) = connection.connect()?;
    let wait = WaitArgs {
        no_wait: false,
        ready_timeout,
    };
    wait_for_api(&client, &config, &wait, shutdown).await
}
