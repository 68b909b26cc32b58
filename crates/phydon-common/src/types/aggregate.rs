use serde::{Deserialize, Serialize};

use super::Rank;

/// Summary of the `combopred` doubling times (hours) of one taxon.
///
/// `std` and `se` are `None` when `count == 1`: a single genome has no
/// sample spread, which is not the same as zero spread.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub std: Option<f64>,
    pub count: u64,
    pub range: f64,
    pub se: Option<f64>,
}

/// One row of a rank's summary table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    /// Rank this row summarizes
    pub rank: Rank,

    /// Names from domain down to `rank`, one per rank in `rank.lineage()`
    pub lineage: Vec<String>,

    pub stats: SummaryStats,
}

impl AggregateRow {
    /// Name of the taxon at the row's own rank
    pub fn name(&self) -> &str {
        self.lineage.last().map(String::as_str).unwrap_or_default()
    }

    /// `(rank, name)` pairs from domain down to the row's rank
    pub fn lineage_pairs(&self) -> impl Iterator<Item = (Rank, &str)> + '_ {
        self.rank
            .lineage()
            .iter()
            .copied()
            .zip(self.lineage.iter().map(String::as_str))
    }
}
