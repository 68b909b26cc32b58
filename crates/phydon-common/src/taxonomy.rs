//! GTDB lineage string parser
//!
//! Lineages arrive as one semicolon-delimited string per genome:
//!
//! ```text
//! d__Bacteria;p__Pseudomonadota;c__Gammaproteobacteria;o__Pseudomonadales;f__Pseudomonadaceae;g__Pseudomonas;s__Pseudomonas aeruginosa
//! ```
//!
//! Each segment carries the marker of its rank (`d__` … `s__`). Parsing is
//! permissive: short lineages leave the finer ranks absent, and a segment
//! without its marker is kept verbatim.

use tracing::trace;

use crate::types::{Lineage, Rank};

/// Separator between lineage segments
pub const SEGMENT_SEPARATOR: char = ';';

/// Parser for GTDB-style lineage strings
#[derive(Debug, Clone, Copy, Default)]
pub struct TaxonomyParser;

impl TaxonomyParser {
    pub fn new() -> Self {
        Self
    }

    /// Split a lineage string into its seven ranks.
    ///
    /// Never fails. Segments past the seventh are ignored.
    pub fn parse(&self, raw: &str) -> Lineage {
        let mut lineage = Lineage::new();

        for (rank, segment) in Rank::ALL.into_iter().zip(raw.split(SEGMENT_SEPARATOR)) {
            lineage.set(rank, Self::parse_segment(rank, segment));
        }

        lineage
    }

    /// Normalize one segment: strip the rank marker, trim, lowercase.
    ///
    /// An empty value (e.g. a bare `s__`) is treated as absent.
    pub fn parse_segment(rank: Rank, segment: &str) -> Option<String> {
        let trimmed = segment.trim();
        let value = match trimmed.strip_prefix(rank.prefix()) {
            Some(stripped) => stripped,
            None => {
                if !trimmed.is_empty() {
                    trace!(rank = %rank, segment = trimmed, "Lineage segment without rank marker");
                }
                trimmed
            },
        };

        let value = value.trim().to_lowercase();
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const AERUGINOSA: &str = "d__Bacteria;p__Pseudomonadota;c__Gammaproteobacteria;o__Pseudomonadales;f__Pseudomonadaceae;g__Pseudomonas;s__Pseudomonas aeruginosa";

    #[test]
    fn test_parse_full_lineage() {
        let lineage = TaxonomyParser::new().parse(AERUGINOSA);

        assert_eq!(lineage.get(Rank::Domain), Some("bacteria"));
        assert_eq!(lineage.get(Rank::Phylum), Some("pseudomonadota"));
        assert_eq!(lineage.get(Rank::Class), Some("gammaproteobacteria"));
        assert_eq!(lineage.get(Rank::Order), Some("pseudomonadales"));
        assert_eq!(lineage.get(Rank::Family), Some("pseudomonadaceae"));
        assert_eq!(lineage.get(Rank::Genus), Some("pseudomonas"));
        assert_eq!(lineage.get(Rank::Species), Some("pseudomonas aeruginosa"));
        assert_eq!(lineage.resolved_depth(), 7);
    }

    #[test]
    fn test_short_lineage_leaves_finer_ranks_absent() {
        let lineage = TaxonomyParser::new().parse("d__Archaea;p__Thermoproteota");

        assert_eq!(lineage.get(Rank::Domain), Some("archaea"));
        assert_eq!(lineage.get(Rank::Phylum), Some("thermoproteota"));
        assert_eq!(lineage.get(Rank::Class), None);
        assert_eq!(lineage.get(Rank::Species), None);
    }

    #[test]
    fn test_segment_without_marker_is_kept_verbatim() {
        let lineage = TaxonomyParser::new().parse("d__Bacteria;Bacillota;c__Bacilli");

        assert_eq!(lineage.get(Rank::Phylum), Some("bacillota"));
        assert_eq!(lineage.get(Rank::Class), Some("bacilli"));
    }

    #[test]
    fn test_marker_of_another_rank_is_not_stripped() {
        let lineage = TaxonomyParser::new().parse("p__Bacteria");
        assert_eq!(lineage.get(Rank::Domain), Some("p__bacteria"));
    }

    #[test]
    fn test_whitespace_and_empty_segments() {
        let lineage = TaxonomyParser::new().parse(" d__Bacteria ; p__ Bacillota ;c__;o__Bacillales");

        assert_eq!(lineage.get(Rank::Domain), Some("bacteria"));
        assert_eq!(lineage.get(Rank::Phylum), Some("bacillota"));
        assert_eq!(lineage.get(Rank::Class), None);
        // values are not inferred across a gap
        assert_eq!(lineage.get(Rank::Order), Some("bacillales"));
    }

    #[test]
    fn test_extra_segments_are_ignored() {
        let raw = format!("{};x__strain 7", AERUGINOSA);
        let lineage = TaxonomyParser::new().parse(&raw);
        assert_eq!(lineage.get(Rank::Species), Some("pseudomonas aeruginosa"));
    }

    #[test]
    fn test_empty_string() {
        let lineage = TaxonomyParser::new().parse("");
        assert_eq!(lineage, Lineage::new());
    }

    proptest! {
        #[test]
        fn parsed_values_are_lowercase_and_trimmed(raw in "[ -~]{0,120}") {
            let lineage = TaxonomyParser::new().parse(&raw);
            for rank in Rank::ALL {
                if let Some(value) = lineage.get(rank) {
                    prop_assert!(!value.is_empty());
                    prop_assert_eq!(value.trim(), value);
                    prop_assert_eq!(value.to_lowercase(), value);
                    prop_assert!(!value.contains(SEGMENT_SEPARATOR));
                }
            }
        }
    }
}
