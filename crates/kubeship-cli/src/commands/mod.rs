//! CLI commands

pub mod create;
pub mod custom;
pub mod delete;
pub mod get;
pub mod render;
pub mod update;
pub mod wait;

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;
use console::style;
use kubeship_core::{AuthOptions, ClientConfig, VerifyMode};
use kubeship_kube::{OperationSummary, ReadinessPoller, RestClient};
use tokio_util::sync::CancellationToken;

use crate::error::{CliError, Result};

/// Connection settings shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Configuration file (default: $KUBESHIP_CONFIG or the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// API server URI, optionally with a path (e.g. https://host:6443/api)
    #[arg(long, global = true, env = "KUBESHIP_SERVER")]
    pub server: Option<String>,

    /// Bearer token
    #[arg(long, global = true, env = "KUBESHIP_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// File containing a bearer token
    #[arg(long, global = true)]
    pub token_file: Option<PathBuf>,

    /// Basic auth user
    #[arg(long, global = true)]
    pub username: Option<String>,

    /// Basic auth password
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Skip server certificate verification
    #[arg(long, global = true)]
    pub insecure: bool,
}

impl ConnectionArgs {
    /// Load the configuration file and apply command-line overrides
    pub fn load_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::load_from(path)?,
            None => ClientConfig::load()?,
        };
        self.apply(&mut config);
        Ok(config)
    }

    fn apply(&self, config: &mut ClientConfig) {
        if let Some(server) = &self.server {
            config.server = Some(server.clone());
        }

        // Auth flags replace the file's auth section as a whole
        if self.has_auth_flags() {
            config.auth = AuthOptions {
                username: self.username.clone(),
                password: self.password.clone(),
                bearer_token: self.token.clone(),
                bearer_token_file: self.token_file.clone(),
            };
        }

        if self.insecure {
            config.tls.verify_ssl = VerifyMode::None;
        }
    }

    fn has_auth_flags(&self) -> bool {
        self.token.is_some()
            || self.token_file.is_some()
            || self.username.is_some()
            || self.password.is_some()
    }

    /// Load the configuration and build a client from it
    pub fn connect(&self) -> Result<(ClientConfig, RestClient)> {
        let config = self.load_config()?;
        let client = RestClient::from_config(&config)?;
        Ok((config, client))
    }
}

/// Readiness wait options
#[derive(Args, Debug, Clone, Default)]
pub struct WaitArgs {
    /// Do not wait for the API server before sending requests
    #[arg(long)]
    pub no_wait: bool,

    /// Give up waiting for the API server after this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub ready_timeout: Option<u64>,
}

/// Directory options for batch commands
#[derive(Args, Debug, Clone, Default)]
pub struct BatchArgs {
    /// Directory of secret files exposed to templates
    #[arg(long)]
    pub secrets_dir: Option<PathBuf>,

    /// Directory of entity manifests
    #[arg(long)]
    pub entities_dir: Option<PathBuf>,

    #[command(flatten)]
    pub wait: WaitArgs,
}

impl BatchArgs {
    pub fn secrets_dir<'a>(&'a self, config: &'a ClientConfig) -> &'a Path {
        self.secrets_dir.as_deref().unwrap_or(config.secrets_dir.as_path())
    }

    pub fn entities_dir<'a>(&'a self, config: &'a ClientConfig) -> &'a Path {
        self.entities_dir.as_deref().unwrap_or(config.entities_dir.as_path())
    }
}

/// Block until the API server serves the configured version
///
/// `shutdown` cancels the wait; `--ready-timeout` bounds it.
pub async fn wait_for_api(
    client: &RestClient,
    config: &ClientConfig,
    args: &WaitArgs,
    shutdown: &CancellationToken,
) -> Result<()> {
    if args.no_wait {
        return Ok(());
    }

    println!(
        "{} Waiting for API server at {}",
        style("→").blue().bold(),
        style(client.endpoint().api_root()).cyan()
    );

    let poller = ReadinessPoller::new(config.poll_interval).with_cancellation(shutdown.clone());

    let outcome = match args.ready_timeout {
        Some(secs) => {
            match tokio::time::timeout(Duration::from_secs(secs), poller.wait_until_ready(client)).await {
                Ok(result) => result.map_err(CliError::from),
                Err(_) => Err(CliError::not_ready(format!("still unavailable after {}s", secs))),
            }
        }
        None => poller.wait_until_ready(client).await.map_err(CliError::from),
    };

    let attempts = outcome?;
    println!(
        "{} API server ready ({} check{})",
        style("✓").green().bold(),
        attempts,
        if attempts == 1 { "" } else { "s" }
    );
    Ok(())
}

/// Turn a batch summary into the command's outcome
pub fn finish(summary: &OperationSummary) -> Result<()> {
    if summary.is_success() {
        Ok(())
    } else {
        Err(CliError::PartialFailure {
            failed: summary.failed.len(),
            total: summary.total(),
        })
    }
}
