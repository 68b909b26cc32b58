//! Per-rank summary statistics
//!
//! Every rank is aggregated straight from the genome rows. Groups are keyed
//! by the full lineage from domain down to the target rank, so two genera
//! with the same name under different families stay separate.

use std::collections::BTreeMap;

use phydon_common::{AggregateRow, Rank, SummaryStats};
use tracing::debug;

use crate::records::GenomeRecord;

/// Groups genome rows by lineage prefix and summarizes `combopred`
#[derive(Debug, Clone, Copy, Default)]
pub struct RankAggregator;

impl RankAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Summaries for every distinct lineage at `rank`, ordered by lineage.
    ///
    /// Rows with no value at `rank` (or at any coarser rank) and rows
    /// without a usable `combopred` are left out.
    pub fn aggregate(&self, records: &[GenomeRecord], rank: Rank) -> Vec<AggregateRow> {
        let mut groups: BTreeMap<Vec<String>, Vec<f64>> = BTreeMap::new();

        for record in records {
            let Some(value) = record.combopred else {
                continue;
            };
            let Some(key) = record.lineage.key_through(rank) else {
                continue;
            };
            groups.entry(key).or_default().push(value);
        }

        let rows: Vec<AggregateRow> = groups
            .into_iter()
            .filter_map(|(lineage, mut values)| {
                summarize(&mut values).map(|stats| AggregateRow {
                    rank,
                    lineage,
                    stats,
                })
            })
            .collect();

        debug!(rank = %rank, groups = rows.len(), "Aggregated rank");
        rows
    }

    /// Aggregate at all seven ranks, coarsest first
    pub fn aggregate_all(&self, records: &[GenomeRecord]) -> Vec<(Rank, Vec<AggregateRow>)> {
        Rank::ALL
            .into_iter()
            .map(|rank| (rank, self.aggregate(records, rank)))
            .collect()
    }
}

/// Summary statistics of one group; `None` for an empty group.
///
/// Sorts `values` in place.
pub fn summarize(values: &mut [f64]) -> Option<SummaryStats> {
    if values.is_empty() {
        return None;
    }

    values.sort_by(f64::total_cmp);

    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    };
    let min = values[0];
    let max = values[n - 1];

    // sample standard deviation; undefined for a single genome
    let std = (n > 1).then(|| {
        let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (sum_sq / (n - 1) as f64).sqrt()
    });
    let se = std.map(|s| s / (n as f64).sqrt());

    Some(SummaryStats {
        mean,
        median,
        min,
        max,
        std,
        count: n as u64,
        range: max - min,
        se,
    })
}
