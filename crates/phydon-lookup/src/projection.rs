//! Shaping matched rows into response records
//!
//! Full record:
//!
//! ```json
//! {
//!   "lineage": {"domain": "bacteria", "...": "...", "genus": "pseudomonas"},
//!   "doubling_time_hours": {"mean": 3.0, "median": 3.0, "min": 2.0, "max": 4.0,
//!                           "range": 2.0, "std": 1.4142, "se": 1.0},
//!   "species_count": 2
//! }
//! ```
//!
//! With a statistic requested the record narrows to
//! `{"lineage": ..., "value": 3.0, "stat": "median", "unit": "hours"}`.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use phydon_common::types::StatValue;
use phydon_common::{AggregateRow, Rank, Statistic};

use crate::resolver::{MatchResult, EXACT_SCORE};

/// Message of the no-match payload
pub const NO_MATCH_MESSAGE: &str = "No match found at any taxonomic level.";

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn round4(value: f64) -> f64 {
    round_to(value, 4)
}

/// Lineage from domain down to the matched rank, serialized as an ordered map
#[derive(Debug, Clone, PartialEq)]
pub struct LineageView(pub Vec<(Rank, String)>);

impl LineageView {
    pub fn of(row: &AggregateRow) -> Self {
        Self(
            row.lineage_pairs()
                .map(|(rank, name)| (rank, name.to_string()))
                .collect(),
        )
    }

    /// Name at `rank`, if the lineage reaches it
    pub fn get(&self, rank: Rank) -> Option<&str> {
        self.0
            .iter()
            .find(|(r, _)| *r == rank)
            .map(|(_, name)| name.as_str())
    }
}

impl Serialize for LineageView {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (rank, name) in &self.0 {
            map.serialize_entry(rank.as_str(), name)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoublingTimes {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    pub std: Option<f64>,
    pub se: Option<f64>,
}

/// Every statistic of one taxon
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxonRecord {
    pub lineage: LineageView,
    pub doubling_time_hours: DoublingTimes,
    pub species_count: u64,
}

/// One statistic of one taxon
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatRecord {
    pub lineage: LineageView,
    pub value: StatValue,
    pub stat: Statistic,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResultRecord {
    Full(TaxonRecord),
    Stat(StatRecord),
}

/// Payload of a successful lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResponse {
    pub query: String,
    pub matched_name: String,
    pub matched_level: Rank,
    pub match_score: MatchScore,
    pub results: Vec<ResultRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stat_requested: Option<Statistic>,
}

/// Payload when nothing matched
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoMatchResponse {
    pub query: String,
    pub error: String,
}

/// Outcome of a lookup as returned to callers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LookupResponse {
    Match(MatchResponse),
    NoMatch(NoMatchResponse),
}

impl LookupResponse {
    pub fn is_match(&self) -> bool {
        matches!(self, LookupResponse::Match(_))
    }
}

/// Similarity of the matched name to the query.
///
/// Exact matches serialize as the integer `100`; approximate scores as a
/// float rounded to two decimals, even when the rounded value is whole.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchScore {
    Exact,
    Approximate(f64),
}

impl MatchScore {
    pub fn of(result: &MatchResult) -> Self {
        if result.is_exact() {
            MatchScore::Exact
        } else {
            MatchScore::Approximate(round_to(result.score, 2))
        }
    }
}

impl Serialize for MatchScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            MatchScore::Exact => serializer.serialize_u64(EXACT_SCORE as u64),
            MatchScore::Approximate(score) => serializer.serialize_f64(score),
        }
    }
}

/// Builds response payloads from match results
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultProjector;

impl ResultProjector {
    pub fn new() -> Self {
        Self
    }

    pub fn record(&self, row: &AggregateRow) -> TaxonRecord {
        let stats = &row.stats;
        TaxonRecord {
            lineage: LineageView::of(row),
            doubling_time_hours: DoublingTimes {
                mean: round4(stats.mean),
                median: round4(stats.median),
                min: round4(stats.min),
                max: round4(stats.max),
                range: round4(stats.range),
                std: stats.std.map(round4),
                se: stats.se.map(round4),
            },
            species_count: stats.count,
        }
    }

    pub fn narrow(&self, row: &AggregateRow, stat: Statistic) -> StatRecord {
        let value = match stat.select(&row.stats) {
            StatValue::Hours(hours) => StatValue::Hours(hours.map(round4)),
            count => count,
        };

        StatRecord {
            lineage: LineageView::of(row),
            value,
            stat,
            unit: stat.unit(),
        }
    }

    /// Response for a match, narrowed to `stat` when one was requested
    pub fn project(&self, query: &str, result: &MatchResult, stat: Option<Statistic>) -> MatchResponse {
        let results = result
            .rows
            .iter()
            .map(|row| match stat {
                Some(stat) => ResultRecord::Stat(self.narrow(row, stat)),
                None => ResultRecord::Full(self.record(row)),
            })
            .collect();

        MatchResponse {
            query: query.to_string(),
            matched_name: result.matched_name.clone(),
            matched_level: result.rank,
            match_score: MatchScore::of(result),
            results,
            note: result.note.clone(),
            stat_requested: stat,
        }
    }

    pub fn no_match(&self, query: &str) -> NoMatchResponse {
        NoMatchResponse {
            query: query.to_string(),
            error: NO_MATCH_MESSAGE.to_string(),
        }
    }
}
