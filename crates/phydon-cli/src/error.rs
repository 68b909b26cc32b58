//! Error types for the Phydon CLI
//!
//! Messages are user-facing and say what to do next.

use std::path::PathBuf;

use phydon_common::PhydonError;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    /// Neither a query nor `--serve` was given
    #[error("provide a taxonomic query or --serve.")]
    MissingQuery,

    /// The aggregate tables have not been built into the cache directory
    #[error(
        "No aggregate tables in '{}' ({}). Run 'phydon-ingest build --cache-dir {}' first.",
        .cache_dir.display(), .reason, .cache_dir.display()
    )]
    NotBuilt { cache_dir: PathBuf, reason: String },

    #[error(transparent)]
    Lookup(PhydonError),

    /// Server mode failed to start or stopped with an error
    #[error("Server error: {0}. Check PHYDON_HOST, PHYDON_PORT and that the port is free.")]
    Server(String),

    #[error("Failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Attach the cache directory to a missing-table error
    pub fn from_lookup(error: PhydonError, cache_dir: impl Into<PathBuf>) -> Self {
        match error {
            PhydonError::NotBuilt { rank, reason } => CliError::NotBuilt {
                cache_dir: cache_dir.into(),
                reason: format!("{}: {}", rank, reason),
            },
            other => CliError::Lookup(other),
        }
    }
}
