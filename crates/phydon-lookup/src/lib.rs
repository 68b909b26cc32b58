//! Phydon Lookup
//!
//! Name resolution over the per-rank aggregate tables:
//!
//! - [`AggregateIndex`]: the seven rank tables, each loaded once on demand
//! - [`ApproximateMatcher`]: weighted fuzzy scoring of candidate names
//! - [`LookupResolver`]: exact, approximate and fallback search policy
//! - [`ResultProjector`]: JSON-ready response records
//!
//! This crate has no transport dependency; the CLI and the HTTP server both
//! call [`LookupResolver::lookup`].
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use phydon_lookup::{AggregateIndex, LookupResolver};
//!
//! fn main() -> anyhow::Result<()> {
//!     let index = Arc::new(AggregateIndex::open("cache"));
//!     let resolver = LookupResolver::new(index);
//!
//!     let response = resolver.lookup("pseudomonas", Some("genus"), Some("median"))?;
//!     println!("{}", serde_json::to_string_pretty(&response)?);
//!     Ok(())
//! }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod index;
pub mod matcher;
pub mod projection;
pub mod resolver;

pub use index::{AggregateIndex, MemorySource, RankTable, TableSource};
pub use matcher::{ApproximateMatcher, FuzzyMatch, DEFAULT_SCORE_CUTOFF};
pub use projection::{LookupResponse, MatchResponse, MatchScore, NoMatchResponse, ResultProjector};
pub use resolver::{LookupResolver, MatchResult};
