use super::Rank;

/// Seven optional rank values of one genome, domain first.
///
/// Values are lowercase with their GTDB marker stripped. A rank is `None`
/// when the source lineage string stopped before it or carried an empty
/// segment there.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lineage {
    ranks: [Option<String>; 7],
}

impl Lineage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value at `rank`, if present
    pub fn get(&self, rank: Rank) -> Option<&str> {
        self.ranks[rank.depth()].as_deref()
    }

    pub fn set(&mut self, rank: Rank, value: Option<String>) {
        self.ranks[rank.depth()] = value;
    }

    /// Grouping key for `rank`: every value from domain down to `rank`.
    ///
    /// Returns `None` when any of those values is absent.
    pub fn key_through(&self, rank: Rank) -> Option<Vec<String>> {
        rank.lineage()
            .iter()
            .map(|r| self.get(*r).map(str::to_string))
            .collect()
    }

    /// Number of leading ranks that are present
    pub fn resolved_depth(&self) -> usize {
        self.ranks.iter().take_while(|value| value.is_some()).count()
    }
}

impl FromIterator<(Rank, String)> for Lineage {
    fn from_iter<I: IntoIterator<Item = (Rank, String)>>(iter: I) -> Self {
        let mut lineage = Lineage::new();
        for (rank, value) in iter {
            lineage.set(rank, Some(value));
        }
        lineage
    }
}
