//! Query resolution
//!
//! Without a rank hint every rank is searched: an exact name at the
//! coarsest rank wins outright, otherwise the best approximate match over
//! all ranks. With a valid hint that rank is tried first (exact, then
//! approximate) and the all-rank search is the fallback, noted in the
//! result. An unrecognized hint is ignored.

use std::sync::Arc;

use phydon_common::{AggregateRow, PhydonError, Rank, Result, Statistic};
use tracing::{debug, instrument};

use crate::index::{AggregateIndex, RankTable};
use crate::matcher::ApproximateMatcher;
use crate::projection::{LookupResponse, ResultProjector};

/// Score of an exact name match
pub const EXACT_SCORE: f64 = 100.0;

/// A resolved taxon and every row carrying its name
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub matched_name: String,
    pub rank: Rank,
    /// 100 for exact matches
    pub score: f64,
    /// Found by name equality rather than by the fuzzy scorer
    pub exact: bool,
    /// More than one when several lineages share the matched name
    pub rows: Vec<AggregateRow>,
    pub note: Option<String>,
}

impl MatchResult {
    pub fn is_exact(&self) -> bool {
        self.exact
    }
}

/// Resolves free-text taxon names against an [`AggregateIndex`]
#[derive(Debug)]
pub struct LookupResolver {
    index: Arc<AggregateIndex>,
    matcher: ApproximateMatcher,
    projector: ResultProjector,
}

impl LookupResolver {
    pub fn new(index: Arc<AggregateIndex>) -> Self {
        Self {
            index,
            matcher: ApproximateMatcher::default(),
            projector: ResultProjector::new(),
        }
    }

    pub fn with_matcher(mut self, matcher: ApproximateMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn index(&self) -> &AggregateIndex {
        &self.index
    }

    /// Resolve `query` and shape the response.
    ///
    /// `stat` is validated before any table is touched. Blank `rank_hint`
    /// and `stat` values count as absent.
    #[instrument(skip(self))]
    pub fn lookup(&self, query: &str, rank_hint: Option<&str>, stat: Option<&str>) -> Result<LookupResponse> {
        let stat = match stat.map(str::trim).filter(|s| !s.is_empty()) {
            Some(stat) => Some(stat.parse::<Statistic>()?),
            None => None,
        };

        let response = match self.resolve(query, rank_hint)? {
            Some(result) => LookupResponse::Match(self.projector.project(query, &result, stat)),
            None => LookupResponse::NoMatch(self.projector.no_match(query)),
        };
        Ok(response)
    }

    /// Find the best taxon for `query`, or `None` when nothing scores high enough
    pub fn resolve(&self, query: &str, rank_hint: Option<&str>) -> Result<Option<MatchResult>> {
        let name = normalize(query);
        if name.is_empty() {
            return Ok(None);
        }

        let hint = rank_hint.map(str::trim).filter(|hint| !hint.is_empty());
        let rank = match hint.map(str::parse::<Rank>) {
            None => return self.search_all_ranks(&name),
            Some(Ok(rank)) => rank,
            Some(Err(PhydonError::InvalidRank(hint))) => {
                debug!(hint = %hint, "Ignoring unrecognized rank hint");
                return self.search_all_ranks(&name);
            },
            Some(Err(e)) => return Err(e),
        };

        if let Some(found) = self.search_rank(rank, &name)? {
            return Ok(Some(found));
        }

        debug!(rank = %rank, "No match at hinted rank, searching all ranks");
        Ok(self.search_all_ranks(&name)?.map(|mut found| {
            found.note = Some(format!(
                "'{}' was not found at the '{}' level. Found at '{}' instead.",
                query, rank, found.rank
            ));
            found
        }))
    }

    /// Exact match at the coarsest rank that has one, else the best approximate match
    pub fn search_all_ranks(&self, name: &str) -> Result<Option<MatchResult>> {
        for rank in Rank::ALL {
            let table = self.index.get(rank)?;
            if let Some(found) = exact_match(&table, name) {
                return Ok(Some(found));
            }
        }

        let mut best: Option<MatchResult> = None;
        for rank in Rank::ALL {
            let table = self.index.get(rank)?;
            if let Some(found) = self.approximate_match(&table, name) {
                // strictly greater keeps the coarser rank on ties
                if best.as_ref().map_or(true, |b| found.score > b.score) {
                    best = Some(found);
                }
            }
        }

        Ok(best)
    }

    fn search_rank(&self, rank: Rank, name: &str) -> Result<Option<MatchResult>> {
        let table = self.index.get(rank)?;
        Ok(exact_match(&table, name).or_else(|| self.approximate_match(&table, name)))
    }

    fn approximate_match(&self, table: &RankTable, name: &str) -> Option<MatchResult> {
        let found = self
            .matcher
            .best_match(name, table.names().iter().map(String::as_str))?;
        let rows = table.rows_named(&found.name);

        Some(MatchResult {
            matched_name: found.name,
            rank: table.rank(),
            score: found.score,
            exact: false,
            rows,
            note: None,
        })
    }
}

fn exact_match(table: &RankTable, name: &str) -> Option<MatchResult> {
    if !table.contains(name) {
        return None;
    }

    Some(MatchResult {
        matched_name: name.to_string(),
        rank: table.rank(),
        score: EXACT_SCORE,
        exact: true,
        rows: table.rows_named(name),
        note: None,
    })
}

fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}
