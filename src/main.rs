//! # ZYCLE API Main Entry Point
//!
//! Loads layered configuration, initializes telemetry and the database pool,
//! then serves the HTTP API.

use clap::Parser;
use zycle::{
    config::ConfigLoader,
    db::{init_pool, run_migrations},
    server::run_server,
    telemetry::init_tracing,
};

/// ZYCLE management API server
#[derive(Debug, Parser)]
#[command(name = "zycle", version, about)]
struct Args {
    /// Apply pending database migrations before serving
    #[arg(long)]
    migrate: bool,

    /// Apply migrations and exit without starting the server
    #[arg(long, conflicts_with = "migrate")]
    migrate_only: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration from layered env files and variables
    let config = ConfigLoader::new().load()?;
    init_tracing(&config)?;

    tracing::info!(profile = %config.profile, "Loaded configuration");
    if let Ok(redacted_json) = config.redacted_json() {
        tracing::debug!(config = %redacted_json, "Effective configuration");
    }

    let db = init_pool(&config).await?;

    if args.migrate || args.migrate_only {
        run_migrations(&db).await?;
    }
    if args.migrate_only {
        return Ok(());
    }

    run_server(config, db).await
}
