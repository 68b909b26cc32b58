//! Build configuration

use std::path::PathBuf;

use phydon_common::DEFAULT_CACHE_DIR;
use serde::{Deserialize, Serialize};

// ============================================================================
// Build Configuration Constants
// ============================================================================

/// Released Phydon predictions for GTDB genomes (SSU + optimal growth temperature).
pub const DEFAULT_CSV_URL: &str =
    "https://github.com/xl0418/Phydon/releases/download/v1.0.0/phydon_gtdb_ssu_with_OGT.csv";

/// Default directory for downloaded raw files.
pub const DEFAULT_RAW_DIR: &str = "raw";

/// Settings of one aggregation build
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Where to download the prediction CSV from
    pub url: String,

    /// Directory holding the downloaded CSV
    pub raw_dir: PathBuf,

    /// Directory receiving the per-rank tables and the manifest
    pub cache_dir: PathBuf,

    /// Local CSV to aggregate instead of downloading
    pub input: Option<PathBuf>,

    /// Download again even if the raw file is present
    pub force_download: bool,
}

impl BuildConfig {
    /// Load configuration from environment and defaults
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = BuildConfig {
            url: std::env::var("PHYDON_CSV_URL").unwrap_or_else(|_| DEFAULT_CSV_URL.to_string()),
            raw_dir: std::env::var("PHYDON_RAW_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_RAW_DIR)),
            cache_dir: std::env::var("PHYDON_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_CACHE_DIR)),
            input: None,
            force_download: false,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.input.is_none() && self.url.trim().is_empty() {
            anyhow::bail!("Either a source URL or a local input file is required");
        }

        if self.cache_dir.as_os_str().is_empty() {
            anyhow::bail!("Cache directory cannot be empty");
        }

        if let Some(ref input) = self.input {
            if !input.is_file() {
                anyhow::bail!("Input file {} does not exist", input.display());
            }
        }

        Ok(())
    }

    /// Label recorded in the manifest for the data source
    pub fn source_label(&self) -> String {
        match self.input {
            Some(ref input) => input.display().to_string(),
            None => self.url.clone(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_CSV_URL.to_string(),
            raw_dir: PathBuf::from(DEFAULT_RAW_DIR),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            input: None,
            force_download: false,
        }
    }
}
