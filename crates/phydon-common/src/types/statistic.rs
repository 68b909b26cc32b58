use serde::{Deserialize, Serialize};

use super::SummaryStats;
use crate::error::PhydonError;

/// A statistic that can be requested for a taxon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Statistic {
    Mean,
    Median,
    Min,
    Max,
    Range,
    Std,
    Se,
    Count,
}

/// The value of one statistic for one taxon.
///
/// Doubling-time statistics are in hours and may be undefined (`std` and
/// `se` of a single-genome taxon); the genome count is always defined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatValue {
    Hours(Option<f64>),
    Count(u64),
}

impl Statistic {
    /// All statistics in their public listing order
    pub const ALL: [Statistic; 8] = [
        Statistic::Mean,
        Statistic::Median,
        Statistic::Min,
        Statistic::Max,
        Statistic::Range,
        Statistic::Std,
        Statistic::Se,
        Statistic::Count,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Statistic::Mean => "mean",
            Statistic::Median => "median",
            Statistic::Min => "min",
            Statistic::Max => "max",
            Statistic::Range => "range",
            Statistic::Std => "std",
            Statistic::Se => "se",
            Statistic::Count => "count",
        }
    }

    /// Unit of the statistic's value; `count` is dimensionless
    pub fn unit(self) -> Option<&'static str> {
        match self {
            Statistic::Count => None,
            _ => Some("hours"),
        }
    }

    /// Read this statistic out of a summary
    pub fn select(self, stats: &SummaryStats) -> StatValue {
        match self {
            Statistic::Mean => StatValue::Hours(Some(stats.mean)),
            Statistic::Median => StatValue::Hours(Some(stats.median)),
            Statistic::Min => StatValue::Hours(Some(stats.min)),
            Statistic::Max => StatValue::Hours(Some(stats.max)),
            Statistic::Range => StatValue::Hours(Some(stats.range)),
            Statistic::Std => StatValue::Hours(stats.std),
            Statistic::Se => StatValue::Hours(stats.se),
            Statistic::Count => StatValue::Count(stats.count),
        }
    }

    /// Statistic names in order, as exposed by the `/levels` route
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|stat| stat.as_str()).collect()
    }
}

impl std::str::FromStr for Statistic {
    type Err = PhydonError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|stat| stat.as_str() == normalized)
            .ok_or_else(|| PhydonError::InvalidStat(s.to_string()))
    }
}

impl std::fmt::Display for Statistic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn single_genome() -> SummaryStats {
        SummaryStats {
            mean: 1.5,
            median: 1.5,
            min: 1.5,
            max: 1.5,
            std: None,
            count: 1,
            range: 0.0,
            se: None,
        }
    }

    #[test]
    fn test_statistic_from_str() {
        assert_eq!("median".parse::<Statistic>().unwrap(), Statistic::Median);
        assert_eq!(" SE ".parse::<Statistic>().unwrap(), Statistic::Se);
        assert!(matches!(
            "variance".parse::<Statistic>(),
            Err(PhydonError::InvalidStat(s)) if s == "variance"
        ));
    }

    #[test]
    fn test_units() {
        assert_eq!(Statistic::Count.unit(), None);
        for stat in Statistic::ALL.iter().filter(|s| **s != Statistic::Count) {
            assert_eq!(stat.unit(), Some("hours"));
        }
    }

    #[test]
    fn test_select_keeps_undefined_spread() {
        let stats = single_genome();
        assert_eq!(Statistic::Std.select(&stats), StatValue::Hours(None));
        assert_eq!(Statistic::Se.select(&stats), StatValue::Hours(None));
        assert_eq!(Statistic::Range.select(&stats), StatValue::Hours(Some(0.0)));
        assert_eq!(Statistic::Count.select(&stats), StatValue::Count(1));
    }

    #[test]
    fn test_stat_value_serializes_bare() {
        assert_eq!(
            serde_json::to_string(&StatValue::Count(12)).unwrap(),
            "12"
        );
        assert_eq!(
            serde_json::to_string(&StatValue::Hours(None)).unwrap(),
            "null"
        );
        assert_eq!(
            serde_json::to_string(&StatValue::Hours(Some(2.5))).unwrap(),
            "2.5"
        );
    }
}
