//! `--serve`: run the HTTP API from the CLI

use std::path::PathBuf;

use phydon_server::Config;
use tracing::info;

use crate::error::{CliError, Result};

/// Start the server with the CLI's host, port and cache directory
/// layered over the environment configuration.
pub async fn run(cache_dir: PathBuf, host: String, port: u16) -> Result<()> {
    let mut config = Config::load().map_err(|e| CliError::Server(format!("{:#}", e)))?;
    config.server.host = host;
    config.server.port = port;
    config.lookup.cache_dir = cache_dir;

    info!(
        addr = %config.bind_address(),
        cache_dir = %config.lookup.cache_dir.display(),
        "Starting server"
    );

    phydon_server::serve(config)
        .await
        .map_err(|e| CliError::Server(format!("{:#}", e)))
}
