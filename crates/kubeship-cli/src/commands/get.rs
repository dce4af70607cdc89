//! Get command - print one entity as JSON or YAML

use clap::ValueEnum;

use super::ConnectionArgs;
use crate::error::{CliError, Result};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

/// Run the get command
pub async fn run(
    connection: &ConnectionArgs,
    kind: &str,
    name: &str,
    namespace: Option<&str>,
    output: OutputFormat,
) -> Result<()> {
    let (_, client) = connection.connect()?;
    let entity = client.get_entity(kind, name, namespace).await?;

    let text = match output {
        OutputFormat::Json => serde_json::to_string_pretty(&entity).map_err(|e| e.to_string()),
        OutputFormat::Yaml => serde_yaml::to_string(&entity).map_err(|e| e.to_string()),
    }
    .map_err(|message| CliError::Other { message })?;

    println!("{}", text.trim_end());
    Ok(())
}
