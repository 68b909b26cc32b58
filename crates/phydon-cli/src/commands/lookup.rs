//! One-shot lookup against the tables in the cache directory

use std::path::Path;
use std::sync::Arc;

use phydon_lookup::{AggregateIndex, LookupResolver, LookupResponse};
use tracing::{debug, info};

use crate::commands::output;
use crate::error::{CliError, Result};
use crate::OutputFormat;

/// Resolve `query` and print the payload in the requested format.
///
/// A query without a match still succeeds; its payload is printed.
pub fn run(
    cache_dir: &Path,
    query: &str,
    level: Option<&str>,
    stat: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let response = resolve(cache_dir, query, level, stat)?;

    if !response.is_match() {
        info!(query = %query, "No match found");
    }

    println!("{}", output::render(&response, format)?);
    Ok(())
}

/// Run the lookup without printing
pub fn resolve(
    cache_dir: &Path,
    query: &str,
    level: Option<&str>,
    stat: Option<&str>,
) -> Result<LookupResponse> {
    debug!(
        cache_dir = %cache_dir.display(),
        query = %query,
        level = ?level,
        stat = ?stat,
        "Looking up"
    );

    let index = Arc::new(AggregateIndex::open(cache_dir));
    let resolver = LookupResolver::new(index);

    resolver
        .lookup(query, level, stat)
        .map_err(|e| CliError::from_lookup(e, cache_dir))
}
