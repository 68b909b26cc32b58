//! Error types for Phydon

use crate::types::Rank;
use thiserror::Error;

/// Result type alias for Phydon operations
pub type Result<T> = std::result::Result<T, PhydonError>;

/// Main error type for Phydon
#[derive(Error, Debug)]
pub enum PhydonError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// The aggregate table for a rank is missing or unreadable
    #[error("Aggregate table for '{rank}' is not built ({reason}). Run `phydon-ingest build` first.")]
    NotBuilt { rank: Rank, reason: String },

    #[error("Invalid statistic: '{0}'. Expected one of: mean, median, min, max, range, std, se, count")]
    InvalidStat(String),

    #[error("Invalid rank: '{0}'. Expected one of: domain, phylum, class, order, family, genus, species")]
    InvalidRank(String),

    #[error("Schema error: {0}")]
    Schema(String),
}

impl PhydonError {
    /// Create a not-built error for a rank
    pub fn not_built(rank: Rank, reason: impl Into<String>) -> Self {
        Self::NotBuilt {
            rank,
            reason: reason.into(),
        }
    }

    /// Create a schema error
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    /// Whether the error means the index has to be (re)built before lookups can succeed
    pub fn is_not_built(&self) -> bool {
        matches!(self, Self::NotBuilt { .. })
    }
}
