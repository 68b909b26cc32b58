//! Phydon Server - Main entry point

use anyhow::Result;
use phydon_common::logging::{init_logging, LogConfig};
use phydon_server::{api, config::Config};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Environment variables take precedence over these defaults
    let log_config = LogConfig::builder()
        .log_file_prefix("phydon-server")
        .filter_directives("phydon_server=debug,phydon_lookup=info,tower_http=debug")
        .build()
        .merge_env()?;
    let _log_guard = init_logging(&log_config)?;

    info!("Starting Phydon Server");

    let config = Config::load()?;
    info!(
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );

    api::serve(config).await
}
