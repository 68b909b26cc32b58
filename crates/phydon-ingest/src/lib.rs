//! Phydon Ingest Library
//!
//! Turns the released per-genome doubling-time predictions into the
//! per-rank aggregate tables the lookup engine reads.
//!
//! # Example
//!
//! ```no_run
//! use phydon_ingest::{pipeline, BuildConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = BuildConfig::load()?;
//!     let manifest = pipeline::run(&config).await?;
//!     println!("{} genomes aggregated", manifest.genomes);
//!     Ok(())
//! }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod aggregate;
pub mod config;
pub mod download;
pub mod pipeline;
pub mod records;

pub use aggregate::RankAggregator;
pub use config::BuildConfig;
pub use records::{GenomeRecord, RecordSet};
