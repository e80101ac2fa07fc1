use anyhow::Result;
use clap::{Parser, Subcommand};
use contact_identity_core::env_config::{env_non_empty, env_parse_with_default};
use contact_identity_core::{ENV_DATABASE_URL, ENV_PG_MAX_CONNECTIONS, PG_POOL_MAX_CONNECTIONS};
use contact_identity_storage::StorageBackend;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "contact-identity")]
#[command(about = "Contact identity reconciliation service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Listen port [default: $PORT or 3000]
        #[arg(short, long)]
        port: Option<u16>,
        #[arg(short = 'H', long, default_value = "0.0.0.0")]
        host: String,
        /// Serve POST /clear-db
        #[arg(long)]
        enable_admin: bool,
    },
    /// Resolve one email/phone observation and print its identity
    Identify {
        #[arg(short, long)]
        email: Option<String>,
        #[arg(short, long)]
        phone: Option<String>,
    },
    /// Delete every contact
    Clear,
    /// Audit the primary/secondary link graph
    Check,
}

/// Postgres when `DATABASE_URL` is set, otherwise a process-local in-memory store.
pub(crate) async fn open_storage() -> Result<StorageBackend> {
    if let Some(url) = env_non_empty(ENV_DATABASE_URL) {
        let max_connections =
            env_parse_with_default(ENV_PG_MAX_CONNECTIONS, PG_POOL_MAX_CONNECTIONS);
        let storage = StorageBackend::new_postgres(&url, max_connections).await?;
        tracing::info!(max_connections, "connected to PostgreSQL");
        Ok(storage)
    } else {
        tracing::warn!("{ENV_DATABASE_URL} not set, using in-memory storage; data is lost on exit");
        Ok(StorageBackend::new_memory())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, host, enable_admin } => {
            commands::serve::run(port, host, enable_admin).await?;
        },
        Commands::Identify { email, phone } => {
            commands::identify::run(email, phone).await?;
        },
        Commands::Clear => {
            commands::admin::run_clear().await?;
        },
        Commands::Check => {
            commands::admin::run_check().await?;
        },
    }

    Ok(())
}
