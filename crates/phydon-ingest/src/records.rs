//! Reading per-genome prediction rows
//!
//! The source CSV carries many columns; only `taxonomy` and `combopred` are
//! used. Files ending in `.gz` are decompressed on the fly.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;
use phydon_common::taxonomy::TaxonomyParser;
use phydon_common::Lineage;
use serde::Deserialize;
use tracing::{debug, info};

/// One genome's parsed lineage and predicted doubling time
#[derive(Debug, Clone, PartialEq)]
pub struct GenomeRecord {
    pub lineage: Lineage,

    /// Predicted minimum doubling time in hours; `None` when missing or not a finite number
    pub combopred: Option<f64>,
}

impl GenomeRecord {
    pub fn new(lineage: Lineage, combopred: Option<f64>) -> Self {
        Self {
            lineage,
            combopred: combopred.filter(|value| value.is_finite()),
        }
    }
}

/// All rows of one source file
#[derive(Debug, Default)]
pub struct RecordSet {
    pub records: Vec<GenomeRecord>,

    /// Rows whose `combopred` could not be used
    pub skipped: usize,
}

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(default)]
    taxonomy: Option<String>,

    #[serde(default, deserialize_with = "csv::invalid_option")]
    combopred: Option<f64>,
}

/// Read every row of a prediction CSV (plain or gzip-compressed)
pub fn read_records(path: &Path, parser: &TaxonomyParser) -> Result<RecordSet> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;

    let is_gz = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false);

    let reader: Box<dyn Read> = if is_gz {
        Box::new(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    let set = read_from(reader, parser).with_context(|| format!("Failed to read {}", path.display()))?;
    info!(
        path = %path.display(),
        genomes = set.records.len(),
        skipped = set.skipped,
        "Read genome predictions"
    );
    Ok(set)
}

/// Read prediction rows from any CSV stream with a header row
pub fn read_from<R: Read>(reader: R, parser: &TaxonomyParser) -> Result<RecordSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    for required in ["taxonomy", "combopred"] {
        if !headers.iter().any(|h| h == required) {
            anyhow::bail!("missing required column '{}'", required);
        }
    }

    let mut set = RecordSet::default();
    for (line, row) in rdr.deserialize::<RawRow>().enumerate() {
        let row = row.with_context(|| format!("Malformed row {}", line + 2))?;

        let lineage = row
            .taxonomy
            .as_deref()
            .map(|raw| parser.parse(raw))
            .unwrap_or_default();
        let record = GenomeRecord::new(lineage, row.combopred);

        if record.combopred.is_none() {
            debug!(row = line + 2, "Row without a usable combopred");
            set.skipped += 1;
        }
        set.records.push(record);
    }

    Ok(set)
}
