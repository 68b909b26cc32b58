//! Build pipeline: raw CSV to per-rank Parquet tables
//!
//! 1. fetch the CSV (or use a local one)
//! 2. parse lineages and read `combopred`
//! 3. aggregate each rank independently
//! 4. write `<cache_dir>/<rank>.parquet` and `manifest.json`

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use phydon_common::manifest::{sha256_file, BuildManifest, RankSummary};
use phydon_common::storage::TableStore;
use phydon_common::taxonomy::TaxonomyParser;
use tracing::{info, instrument};

use crate::aggregate::RankAggregator;
use crate::config::BuildConfig;
use crate::download;
use crate::records::read_records;

/// Run a full build as described by `config`
pub async fn run(config: &BuildConfig) -> Result<BuildManifest> {
    config.validate()?;

    let source_path = match config.input {
        Some(ref input) => input.clone(),
        None => {
            let client = reqwest::Client::builder()
                .user_agent(concat!("phydon-ingest/", env!("CARGO_PKG_VERSION")))
                .build()?;
            download::fetch_source(&client, &config.url, &config.raw_dir, config.force_download)
                .await?
        },
    };

    let label = config.source_label();
    let cache_dir = config.cache_dir.clone();

    // CSV parsing and Parquet writes are blocking work
    tokio::task::spawn_blocking(move || build_from_file(&source_path, &label, &cache_dir))
        .await
        .context("Build task panicked")?
}

/// Aggregate a local CSV into `cache_dir`
#[instrument(skip(source_label))]
pub fn build_from_file(path: &Path, source_label: &str, cache_dir: &Path) -> Result<BuildManifest> {
    let source_sha256 = sha256_file(path)?;
    let set = read_records(path, &TaxonomyParser::new())?;

    let store = TableStore::new(cache_dir);
    let aggregator = RankAggregator::new();
    let mut ranks = Vec::new();

    for (rank, rows) in aggregator.aggregate_all(&set.records) {
        let written = store
            .write(rank, &rows)
            .with_context(|| format!("Failed to write the {} table", rank))?;
        info!(rank = %rank, rows = rows.len(), path = %written.display(), "Wrote rank table");
        ranks.push(RankSummary {
            rank,
            rows: rows.len(),
        });
    }

    let manifest = BuildManifest {
        source: source_label.to_string(),
        source_sha256,
        built_at: Utc::now(),
        genomes: set.records.len(),
        skipped: set.skipped,
        ranks,
    };
    manifest.save(cache_dir)?;

    info!(
        genomes = manifest.genomes,
        skipped = manifest.skipped,
        cache_dir = %cache_dir.display(),
        "Build complete"
    );
    Ok(manifest)
}
