use serde::{Deserialize, Serialize};

use crate::error::PhydonError;

/// One of the seven fixed taxonomic ranks, ordered from coarsest to finest.
///
/// The derived `Ord` follows declaration order, so `Rank::Domain < Rank::Species`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    Domain,
    Phylum,
    Class,
    Order,
    Family,
    Genus,
    Species,
}

impl Rank {
    /// All ranks in domain → species order.
    pub const ALL: [Rank; 7] = [
        Rank::Domain,
        Rank::Phylum,
        Rank::Class,
        Rank::Order,
        Rank::Family,
        Rank::Genus,
        Rank::Species,
    ];

    /// Lowercase rank name, also used as the Parquet column and file name
    pub fn as_str(self) -> &'static str {
        match self {
            Rank::Domain => "domain",
            Rank::Phylum => "phylum",
            Rank::Class => "class",
            Rank::Order => "order",
            Rank::Family => "family",
            Rank::Genus => "genus",
            Rank::Species => "species",
        }
    }

    /// GTDB marker carried by lineage segments at this rank
    pub fn prefix(self) -> &'static str {
        match self {
            Rank::Domain => "d__",
            Rank::Phylum => "p__",
            Rank::Class => "c__",
            Rank::Order => "o__",
            Rank::Family => "f__",
            Rank::Genus => "g__",
            Rank::Species => "s__",
        }
    }

    /// Zero-based depth (domain = 0)
    pub fn depth(self) -> usize {
        self as usize
    }

    /// Ranks from domain down to and including `self`
    pub fn lineage(self) -> &'static [Rank] {
        &Self::ALL[..=self.depth()]
    }

    /// Rank names in order, as exposed by the `/levels` route
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|rank| rank.as_str()).collect()
    }
}

impl std::str::FromStr for Rank {
    type Err = PhydonError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|rank| rank.as_str() == normalized)
            .ok_or_else(|| PhydonError::InvalidRank(s.to_string()))
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_from_str() {
        assert_eq!("genus".parse::<Rank>().unwrap(), Rank::Genus);
        assert_eq!(" Species ".parse::<Rank>().unwrap(), Rank::Species);
        assert_eq!("ORDER".parse::<Rank>().unwrap(), Rank::Order);
        assert!("kingdom".parse::<Rank>().is_err());
        assert!("".parse::<Rank>().is_err());
    }

    #[test]
    fn test_rank_order_is_coarse_to_fine() {
        assert!(Rank::Domain < Rank::Phylum);
        assert!(Rank::Genus < Rank::Species);
        assert_eq!(Rank::ALL.first(), Some(&Rank::Domain));
        assert_eq!(Rank::ALL.last(), Some(&Rank::Species));
    }

    #[test]
    fn test_lineage_prefix_of_ranks() {
        assert_eq!(Rank::Domain.lineage(), &[Rank::Domain]);
        assert_eq!(
            Rank::Class.lineage(),
            &[Rank::Domain, Rank::Phylum, Rank::Class]
        );
        assert_eq!(Rank::Species.lineage().len(), 7);
    }

    #[test]
    fn test_prefixes_are_three_chars() {
        for rank in Rank::ALL {
            assert_eq!(rank.prefix().len(), 3);
            assert!(rank.prefix().starts_with(&rank.as_str()[..1]));
        }
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Rank::Family).unwrap(), "\"family\"");
        let rank: Rank = serde_json::from_str("\"phylum\"").unwrap();
        assert_eq!(rank, Rank::Phylum);
    }
}
