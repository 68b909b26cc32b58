//! Build manifest written next to the aggregate tables
//!
//! Records where the raw predictions came from, a checksum of the exact
//! file that was aggregated, and how many rows each rank table holds.

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::types::Rank;

/// File name of the manifest inside the cache directory
pub const MANIFEST_FILE: &str = "manifest.json";

/// Row count of one rank table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankSummary {
    pub rank: Rank,
    pub rows: usize,
}

/// Provenance of one aggregation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildManifest {
    /// URL or local path the raw CSV was read from
    pub source: String,

    /// SHA-256 of the raw CSV, hex encoded
    pub source_sha256: String,

    pub built_at: DateTime<Utc>,

    /// Genome rows read from the CSV
    pub genomes: usize,

    /// Genome rows without a usable `combopred`
    pub skipped: usize,

    pub ranks: Vec<RankSummary>,
}

impl BuildManifest {
    /// Rows in the table for `rank`, if it was built
    pub fn rows_for(&self, rank: Rank) -> Option<usize> {
        self.ranks
            .iter()
            .find(|summary| summary.rank == rank)
            .map(|summary| summary.rows)
    }

    pub fn save(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(dir.join(MANIFEST_FILE), json)?;
        Ok(())
    }

    /// Load the manifest of the build in `dir`, if there is one
    pub fn load(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(MANIFEST_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&json)?))
    }
}

/// SHA-256 of a file, hex encoded
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 64 * 1024];

    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(hex::encode(hasher.finalize()))
}
