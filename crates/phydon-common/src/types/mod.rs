//! Common types used across Phydon
//!
//! The two closed vocabularies of the lookup (taxonomic [`Rank`]s and
//! [`Statistic`]s), plus the lineage and aggregate row shapes shared by the
//! build pipeline and the resolver.

mod aggregate;
mod lineage;
mod rank;
mod statistic;

pub use aggregate::{AggregateRow, SummaryStats};
pub use lineage::Lineage;
pub use rank::Rank;
pub use statistic::{StatValue, Statistic};
