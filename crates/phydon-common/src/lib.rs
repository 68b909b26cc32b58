//! Phydon Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, storage, and error handling for the Phydon growth-rate lookup.
//!
//! # Overview
//!
//! This crate provides the pieces used by every workspace member:
//!
//! - **Types**: taxonomic ranks, statistics, lineages and aggregate rows
//! - **Taxonomy**: parsing of GTDB-style lineage strings
//! - **Storage**: the per-rank Parquet tables and the build manifest
//! - **Error Handling**: the shared error and result types
//! - **Logging**: tracing subscriber setup
//!
//! # Example
//!
//! ```no_run
//! use phydon_common::storage::TableStore;
//! use phydon_common::{Rank, Result};
//!
//! fn genus_rows() -> Result<usize> {
//!     let store = TableStore::new("cache");
//!     let rows = store.read(Rank::Genus)?;
//!     Ok(rows.len())
//! }
//! ```

pub mod error;
pub mod logging;
pub mod manifest;
pub mod storage;
pub mod taxonomy;
pub mod types;

// Re-export commonly used types
pub use error::{PhydonError, Result};
pub use types::{AggregateRow, Lineage, Rank, Statistic, SummaryStats};

/// Directory holding the per-rank tables when nothing else is configured.
pub const DEFAULT_CACHE_DIR: &str = "cache";
