//! Lazily loaded per-rank aggregate tables
//!
//! Each rank is read from its [`TableSource`] the first time it is asked
//! for and kept for the lifetime of the index. Concurrent first requests
//! for the same rank wait on a single load.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use phydon_common::storage::TableStore;
use phydon_common::{AggregateRow, PhydonError, Rank, Result};
use tracing::{debug, info};

/// Where rank tables come from
pub trait TableSource: Send + Sync {
    /// All rows of the table for `rank`; [`PhydonError::NotBuilt`] if it does not exist
    fn load(&self, rank: Rank) -> Result<Vec<AggregateRow>>;
}

impl TableSource for TableStore {
    fn load(&self, rank: Rank) -> Result<Vec<AggregateRow>> {
        self.read(rank)
    }
}

/// Rank tables held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    tables: HashMap<Rank, Vec<AggregateRow>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the table for `rank`
    pub fn with_table(mut self, rank: Rank, rows: Vec<AggregateRow>) -> Self {
        self.tables.insert(rank, rows);
        self
    }

    /// Group rows into tables by their own rank
    pub fn from_rows(rows: impl IntoIterator<Item = AggregateRow>) -> Self {
        let mut tables: HashMap<Rank, Vec<AggregateRow>> = HashMap::new();
        for row in rows {
            tables.entry(row.rank).or_default().push(row);
        }
        Self { tables }
    }
}

impl TableSource for MemorySource {
    fn load(&self, rank: Rank) -> Result<Vec<AggregateRow>> {
        self.tables
            .get(&rank)
            .cloned()
            .ok_or_else(|| PhydonError::not_built(rank, "no table in memory"))
    }
}

/// One loaded rank table plus its lookup structures
#[derive(Debug)]
pub struct RankTable {
    rank: Rank,
    rows: Vec<AggregateRow>,
    /// Distinct names in first-seen order
    names: Vec<String>,
    positions: HashMap<String, Vec<usize>>,
}

impl RankTable {
    pub fn new(rank: Rank, rows: Vec<AggregateRow>) -> Self {
        let mut names = Vec::new();
        let mut positions: HashMap<String, Vec<usize>> = HashMap::new();

        for (i, row) in rows.iter().enumerate() {
            let name = row.name();
            match positions.get_mut(name) {
                Some(found) => found.push(i),
                None => {
                    names.push(name.to_string());
                    positions.insert(name.to_string(), vec![i]);
                },
            }
        }

        Self {
            rank,
            rows,
            names,
            positions,
        }
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn rows(&self) -> &[AggregateRow] {
        &self.rows
    }

    /// Distinct names at this rank, in table order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Every row whose name at this rank equals `name`, in table order
    pub fn rows_named(&self, name: &str) -> Vec<AggregateRow> {
        self.positions
            .get(name)
            .map(|positions| positions.iter().map(|&i| self.rows[i].clone()).collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The seven rank tables, each loaded at most once
pub struct AggregateIndex {
    source: Box<dyn TableSource>,
    tables: [OnceCell<Arc<RankTable>>; 7],
}

impl AggregateIndex {
    pub fn new(source: impl TableSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            tables: Default::default(),
        }
    }

    /// Index over the Parquet tables in `dir`
    pub fn open(dir: impl Into<std::path::PathBuf>) -> Self {
        Self::new(TableStore::new(dir))
    }

    /// Table for `rank`, loading it on first use.
    ///
    /// A failed load is not cached; the next call tries again.
    pub fn get(&self, rank: Rank) -> Result<Arc<RankTable>> {
        self.tables[rank.depth()]
            .get_or_try_init(|| {
                let rows = self.source.load(rank)?;
                info!(rank = %rank, rows = rows.len(), "Loaded rank table");
                Ok::<_, PhydonError>(Arc::new(RankTable::new(rank, rows)))
            })
            .cloned()
    }

    /// Load every rank now
    pub fn preload(&self) -> Result<()> {
        for rank in Rank::ALL {
            self.get(rank)?;
        }
        debug!("All rank tables loaded");
        Ok(())
    }

    pub fn is_loaded(&self, rank: Rank) -> bool {
        self.tables[rank.depth()].get().is_some()
    }

    pub fn loaded_ranks(&self) -> Vec<Rank> {
        Rank::ALL
            .into_iter()
            .filter(|rank| self.is_loaded(*rank))
            .collect()
    }
}

impl std::fmt::Debug for AggregateIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AggregateIndex")
            .field("loaded", &self.loaded_ranks())
            .finish_non_exhaustive()
    }
}
