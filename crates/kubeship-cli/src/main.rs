//! Kubeship CLI - deploy entity manifests to a Kubernetes API server

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;
mod error;
mod exit_codes;

use commands::{BatchArgs, ConnectionArgs, WaitArgs};
use commands::get::OutputFormat;
use error::{CliError, Result};

#[derive(Parser)]
#[command(name = "kubeship")]
#[command(author = "Kubeship Contributors")]
#[command(version)]
#[command(about = "Deploy entity manifests and templated secrets to a Kubernetes API server", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    connection: ConnectionArgs,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create every entity in the entities directory, rendering templates with secrets
    Create(BatchArgs),

    /// Replace every entity described by the static manifests
    Update(BatchArgs),

    /// Delete every entity described by the static manifests
    Delete(BatchArgs),

    /// Create the entities of a single manifest file
    Custom {
        /// Manifest file (`.yml`, `.yaml`, or `.j2` template)
        file: PathBuf,

        /// Secrets directory used when the file is a template
        #[arg(long)]
        secrets_dir: Option<PathBuf>,

        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Print one entity
    Get {
        /// Entity kind (e.g. Pod, Service)
        kind: String,

        /// Entity name
        name: String,

        /// Namespace (default: "default")
        #[arg(short, long)]
        namespace: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        output: OutputFormat,
    },

    /// Wait until the API server serves the configured version
    Wait {
        /// Give up after this many seconds
        #[arg(long, value_name = "SECONDS")]
        ready_timeout: Option<u64>,
    },

    /// Render a templated manifest to stdout without contacting the server
    Render {
        /// Template file
        file: PathBuf,

        /// Directory of secret files
        #[arg(long)]
        secrets_dir: Option<PathBuf>,

        /// Render missing secrets as empty strings instead of failing
        #[arg(long)]
        lenient: bool,

        /// Parse the output as entity manifests
        #[arg(long)]
        check: bool,
    },

    #[command(external_subcommand)]
    External(Vec<String>),
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli, shutdown: &CancellationToken) -> Result<()> {
    let connection = &cli.connection;

    match cli.command {
        Commands::Create(batch) => commands::create::run(connection, &batch, shutdown).await,

        Commands::Update(batch) => commands::update::run(connection, &batch, shutdown).await,

        Commands::Delete(batch) => commands::delete::run(connection, &batch, shutdown).await,

        Commands::Custom {
            file,
            secrets_dir,
            wait,
        } => commands::custom::run(connection, &file, secrets_dir.as_deref(), &wait, shutdown).await,

        Commands::Get {
            kind,
            name,
            namespace,
            output,
        } => commands::get::run(connection, &kind, &name, namespace.as_deref(), output).await,

        Commands::Wait { ready_timeout } => commands::wait::run(connection, ready_timeout, shutdown).await,

        Commands::Render {
            file,
            secrets_dir,
            lenient,
            check,
        } => commands::render::run(connection, &file, secrets_dir.as_deref(), lenient, check),

        Commands::External(args) => {
            tracing::debug!(?args, "unknown command");
            println!("Not implemented");
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_tracing(cli.debug);

    // One listener for the whole run: Ctrl-C stops the readiness wait or an
    // in-flight batch alike
    let shutdown = CancellationToken::new();
    let interrupt = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });

    let outcome = tokio::select! {
        result = run(cli, &shutdown) => result,
        _ = shutdown.cancelled() => Err(CliError::Interrupted),
    };

    if let Err(err) = outcome {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}
