//! Resolution policy over a small aggregated fixture

use std::sync::Arc;

use phydon_common::storage::TableStore;
use phydon_common::taxonomy::TaxonomyParser;
use phydon_common::{PhydonError, Rank};
use phydon_ingest::records::read_from;
use phydon_ingest::RankAggregator;
use phydon_lookup::{AggregateIndex, LookupResolver, LookupResponse, MemorySource};
use serde_json::{json, Value};
use tempfile::TempDir;

const PREDICTIONS: &str = "\
taxonomy,combopred
d__Bacteria;p__Pseudomonadota;c__Gammaproteobacteria;o__Pseudomonadales;f__Pseudomonadaceae;g__Pseudomonas;s__Pseudomonas aeruginosa,2.0
d__Bacteria;p__Pseudomonadota;c__Gammaproteobacteria;o__Pseudomonadales;f__Pseudomonadaceae;g__Pseudomonas;s__Pseudomonas aeruginosa,4.0
d__Bacteria;p__Pseudomonadota;c__Gammaproteobacteria;o__Enterobacterales;f__Enterobacteriaceae;g__Escherichia;s__Escherichia coli,0.5
d__Bacteria;p__Bacillota;c__Bacilli;o__Bacillales;f__Bacillaceae;g__Bacillus;s__Bacillus subtilis,0.7
d__Bacteria;p__Bacillota;c__Bacilli;o__Lactobacillales;f__Fam_One;g__Shared;s__Shared alpha,1.0
d__Bacteria;p__Bacillota;c__Bacilli;o__Lactobacillales;f__Fam_Two;g__Shared;s__Shared beta,3.0
d__Bacteria;p__Chloroflexota;c__Chloroflexia;o__Chloroflexales;f__Chloroflexaceae;g__Chloroflexota,5.0
d__Archaea;p__Thermoproteota;c__Thermoprotei;o__Sulfolobales;f__Sulfolobaceae;g__Sulfolobus;s__Sulfolobus acidocaldarius,6.0
";

fn fixture_rows() -> Vec<phydon_common::AggregateRow> {
    let set = read_from(PREDICTIONS.as_bytes(), &TaxonomyParser::new()).unwrap();
    RankAggregator::new()
        .aggregate_all(&set.records)
        .into_iter()
        .flat_map(|(_, rows)| rows)
        .collect()
}

fn resolver() -> LookupResolver {
    let index = AggregateIndex::new(MemorySource::from_rows(fixture_rows()));
    LookupResolver::new(Arc::new(index))
}

fn lookup_json(resolver: &LookupResolver, query: &str, level: Option<&str>, stat: Option<&str>) -> Value {
    serde_json::to_value(resolver.lookup(query, level, stat).unwrap()).unwrap()
}

#[test]
fn test_exact_genus_without_hint() {
    let value = lookup_json(&resolver(), "pseudomonas", None, None);

    assert_eq!(value["matched_name"], json!("pseudomonas"));
    assert_eq!(value["matched_level"], json!("genus"));
    assert_eq!(value["match_score"], json!(100));
    assert!(value.get("note").is_none());

    let record = &value["results"][0];
    assert_eq!(record["doubling_time_hours"]["mean"], json!(3.0));
    assert_eq!(record["doubling_time_hours"]["median"], json!(3.0));
    assert_eq!(record["doubling_time_hours"]["std"], json!(1.4142));
    assert_eq!(record["doubling_time_hours"]["se"], json!(1.0));
    assert_eq!(record["doubling_time_hours"]["range"], json!(2.0));
    assert_eq!(record["species_count"], json!(2));
    assert_eq!(record["lineage"]["family"], json!("pseudomonadaceae"));
}

#[test]
fn test_query_is_trimmed_and_case_folded() {
    let value = lookup_json(&resolver(), "  PseudoMonas ", None, None);
    assert_eq!(value["query"], json!("  PseudoMonas "));
    assert_eq!(value["matched_name"], json!("pseudomonas"));
    assert_eq!(value["match_score"], json!(100));
}

#[test]
fn test_exact_match_prefers_coarser_rank() {
    let found = resolver().resolve("chloroflexota", None).unwrap().unwrap();
    assert_eq!(found.rank, Rank::Phylum);
    assert!(found.is_exact());
}

#[test]
fn test_approximate_tie_prefers_coarser_rank() {
    let found = resolver().resolve("chloroflexot", None).unwrap().unwrap();
    assert_eq!(found.matched_name, "chloroflexota");
    assert_eq!(found.rank, Rank::Phylum);
    assert!(!found.is_exact());
}

#[test]
fn test_hinted_rank_fuzzy_match() {
    let value = lookup_json(&resolver(), "pseudomona", Some("genus"), None);
    assert_eq!(value["matched_name"], json!("pseudomonas"));
    assert_eq!(value["matched_level"], json!("genus"));
    assert_eq!(value["match_score"], json!(95.24));
}

#[test]
fn test_whole_fuzzy_score_is_not_reported_as_exact() {
    // folds to `pseudomonas aeruginosa`, but is not the stored name
    let value = lookup_json(&resolver(), "Pseudomonas_aeruginosa", Some("species"), None);
    assert_eq!(value["matched_name"], json!("pseudomonas aeruginosa"));
    assert!(value["match_score"].is_f64());
    assert_eq!(value["match_score"].as_f64(), Some(100.0));
}

#[test]
fn test_hinted_rank_approximate_beats_exact_elsewhere() {
    let found = resolver().resolve("pseudomonas", Some("order")).unwrap().unwrap();
    assert_eq!(found.matched_name, "pseudomonadales");
    assert_eq!(found.rank, Rank::Order);
    assert!(found.note.is_none());
}

#[test]
fn test_hint_fallback_adds_note() {
    let value = lookup_json(&resolver(), "pseudomonas", Some("domain"), None);

    assert_eq!(value["matched_level"], json!("genus"));
    assert_eq!(value["match_score"], json!(100));
    assert_eq!(
        value["note"],
        json!("'pseudomonas' was not found at the 'domain' level. Found at 'genus' instead.")
    );
}

#[test]
fn test_hint_is_case_insensitive() {
    let found = resolver().resolve("bacillus", Some(" GENUS ")).unwrap().unwrap();
    assert_eq!(found.rank, Rank::Genus);
    assert!(found.note.is_none());
}

#[test]
fn test_unrecognized_hint_is_ignored() {
    let resolver = resolver();
    let hinted = resolver.resolve("pseudomonas", Some("kingdom")).unwrap();
    let plain = resolver.resolve("pseudomonas", None).unwrap();
    assert_eq!(hinted, plain);
    assert!(hinted.unwrap().note.is_none());
}

#[test]
fn test_shared_name_returns_every_lineage() {
    let value = lookup_json(&resolver(), "shared", Some("genus"), None);

    let results = value["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["lineage"]["family"], json!("fam_one"));
    assert_eq!(results[1]["lineage"]["family"], json!("fam_two"));
}

#[test]
fn test_no_match_anywhere() {
    let resolver = resolver();
    let response = resolver.lookup("zzzzqqqq", None, Some("median")).unwrap();
    assert!(!response.is_match());

    let value = serde_json::to_value(response).unwrap();
    assert_eq!(
        value,
        json!({"query": "zzzzqqqq", "error": "No match found at any taxonomic level."})
    );
}

#[test]
fn test_hinted_no_match_has_no_note() {
    let response = resolver().lookup("zzzzqqqq", Some("genus"), None).unwrap();
    assert!(matches!(response, LookupResponse::NoMatch(_)));
}

#[test]
fn test_blank_query_is_no_match() {
    assert!(!resolver().lookup("   ", None, None).unwrap().is_match());
}

#[test]
fn test_count_narrowing() {
    let value = lookup_json(&resolver(), "bacillota", None, Some("count"));

    assert_eq!(value["stat_requested"], json!("count"));
    let record = &value["results"][0];
    assert_eq!(record["value"], json!(3));
    assert!(record.get("unit").is_none());
    assert!(record.get("doubling_time_hours").is_none());
    assert!(record.get("species_count").is_none());
}

#[test]
fn test_single_genome_std_is_null() {
    let value = lookup_json(&resolver(), "escherichia", None, Some("std"));
    let record = &value["results"][0];
    assert!(record["value"].is_null());
    assert_eq!(record["unit"], json!("hours"));
}

#[test]
fn test_invalid_stat_fails_before_search() {
    // an empty index would fail with NotBuilt if it were searched
    let resolver = LookupResolver::new(Arc::new(AggregateIndex::new(MemorySource::new())));
    let err = resolver.lookup("pseudomonas", None, Some("variance")).unwrap_err();
    assert!(matches!(err, PhydonError::InvalidStat(s) if s == "variance"));
}

#[test]
fn test_missing_tables_propagate_not_built() {
    let resolver = LookupResolver::new(Arc::new(AggregateIndex::new(MemorySource::new())));
    let err = resolver.lookup("pseudomonas", None, None).unwrap_err();
    assert!(matches!(err, PhydonError::NotBuilt { rank: Rank::Domain, .. }));
}

#[test]
fn test_resolves_from_parquet_directory() {
    let dir = TempDir::new().unwrap();
    let store = TableStore::new(dir.path());
    for (rank, rows) in RankAggregator::new()
        .aggregate_all(&read_from(PREDICTIONS.as_bytes(), &TaxonomyParser::new()).unwrap().records)
    {
        store.write(rank, &rows).unwrap();
    }

    let index = Arc::new(AggregateIndex::open(dir.path()));
    let resolver = LookupResolver::new(index.clone());

    let value = lookup_json(&resolver, "sulfolobus", Some("genus"), Some("mean"));
    assert_eq!(value["results"][0]["value"], json!(6.0));
    assert_eq!(value["results"][0]["lineage"]["domain"], json!("archaea"));
    assert!(index.is_loaded(Rank::Genus));
}
