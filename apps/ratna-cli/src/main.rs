//! # Ratna Command-Line Entry Point
//!
//! ## Startup Sequence
//! 1. Initialize tracing (stderr, `RUST_LOG`, default `info`)
//! 2. Parse arguments
//! 3. Load configuration (defaults → ratna.toml → RATNA_* env)
//! 4. Connect to database & run migrations
//! 5. Dispatch the subcommand, log its total, print the JSON result on stdout
//!
//! Handler failures are printed as `{"error": {...}}` on stdout with exit
//! status 1; startup failures surface through `anyhow`.

use anyhow::Context;
use clap::Parser;
use ratna_cli::{dispatch, AppConfig, Cli};
use ratna_db::{Database, DbConfig};
use serde_json::json;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(path) = cli.db {
        config.database_path = path;
    }
    info!(database = %config.database_path, shop_id = %config.shop_id, "Starting ratna");

    let db = Database::new(DbConfig::new(&config.database_path))
        .await
        .with_context(|| format!("opening database {}", config.database_path))?;

    let ctx = config.request_context();
    let result = dispatch(&db, &ctx, cli.command).await;
    db.close().await;

    match result {
        Ok(output) => {
            if let Some(total) = output.total {
                info!(total = %config.format_currency(total), "Done");
            }
            println!("{}", serde_json::to_string_pretty(&output.json)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            error!(code = ?err.code, "{}", err.message);
            println!("{}", serde_json::to_string_pretty(&json!({ "error": err }))?);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Logs go to stderr so stdout carries only JSON.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}
