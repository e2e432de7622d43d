//! spotter-import - Need-driven player import service
//!
//! Pulls player rosters from the sports-data provider, filters them
//! against a scouting need and persists the accepted candidates,
//! exposing import control and need CRUD over HTTP.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use spotter_common::config::{self, TomlConfig};
use spotter_import::services::ProviderClient;
use spotter_import::AppState;

#[derive(Parser, Debug)]
#[command(name = "spotter-import", about = "Need-driven player import service")]
struct Args {
    /// Data folder holding the SQLite database
    #[arg(long)]
    data_folder: Option<PathBuf>,

    /// Listen port
    #[arg(long, default_value_t = 5876)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let toml_config = TomlConfig::load_or_default();

    // Initialize tracing; RUST_LOG wins over the config file level
    let default_level = toml_config
        .logging
        .level
        .clone()
        .unwrap_or_else(|| "info".to_string());
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting spotter-import (need-driven player import)");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let data_folder = config::resolve_data_folder(args.data_folder.as_deref(), &toml_config);
    config::ensure_data_folder(&data_folder)
        .map_err(|e| anyhow::anyhow!("Failed to initialize data folder: {}", e))?;

    let db_path = config::database_path(&data_folder);
    info!("Database: {}", db_path.display());
    let db_pool = spotter_import::db::init_database_pool(&db_path).await?;
    info!("Database connection established");

    let api_key = config::resolve_api_key(&toml_config)?;
    let provider = ProviderClient::new(api_key, toml_config.provider_base_url.clone())
        .map_err(|e| anyhow::anyhow!("Failed to build provider client: {}", e))?;

    let state = AppState::new(db_pool, Arc::new(provider));
    let app = spotter_import::build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", args.port)).await?;
    info!("Listening on http://127.0.0.1:{}", args.port);
    info!("Health check: http://127.0.0.1:{}/health", args.port);

    axum::serve(listener, app).await?;

    Ok(())
}
