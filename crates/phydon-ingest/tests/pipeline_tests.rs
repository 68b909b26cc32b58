//! End-to-end build from a local CSV

use phydon_common::manifest::BuildManifest;
use phydon_common::storage::TableStore;
use phydon_common::Rank;
use phydon_ingest::{pipeline, BuildConfig};
use tempfile::TempDir;

const PREDICTIONS: &str = "\
genome,taxonomy,combopred
GB_1,d__Bacteria;p__Pseudomonadota;c__Gammaproteobacteria;o__Pseudomonadales;f__Pseudomonadaceae;g__Pseudomonas;s__Pseudomonas_aeruginosa,2.0
GB_2,d__Bacteria;p__Pseudomonadota;c__Gammaproteobacteria;o__Pseudomonadales;f__Pseudomonadaceae;g__Pseudomonas;s__Pseudomonas_aeruginosa,4.0
GB_3,d__Bacteria;p__Pseudomonadota;c__Gammaproteobacteria;o__Enterobacterales;f__Enterobacteriaceae;g__Escherichia;s__Escherichia coli,0.5
GB_4,d__Archaea;p__Thermoproteota,6.0
GB_5,d__Archaea;p__Thermoproteota,NA
";

fn write_csv(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("predictions.csv");
    std::fs::write(&path, PREDICTIONS).unwrap();
    path
}

#[tokio::test]
async fn test_build_writes_every_rank_and_manifest() {
    let dir = TempDir::new().unwrap();
    let input = write_csv(&dir);
    let cache_dir = dir.path().join("cache");

    let config = BuildConfig {
        input: Some(input.clone()),
        cache_dir: cache_dir.clone(),
        raw_dir: dir.path().join("raw"),
        ..BuildConfig::default()
    };

    let manifest = pipeline::run(&config).await.unwrap();
    assert_eq!(manifest.genomes, 5);
    assert_eq!(manifest.skipped, 1);
    assert_eq!(manifest.source, input.display().to_string());
    assert_eq!(manifest.rows_for(Rank::Domain), Some(2));
    assert_eq!(manifest.rows_for(Rank::Phylum), Some(2));
    assert_eq!(manifest.rows_for(Rank::Genus), Some(2));
    assert_eq!(manifest.rows_for(Rank::Species), Some(2));

    let store = TableStore::new(&cache_dir);
    for rank in Rank::ALL {
        assert!(store.exists(rank), "missing {} table", rank);
    }

    let genus = store.read(Rank::Genus).unwrap();
    let pseudomonas = genus.iter().find(|row| row.name() == "pseudomonas").unwrap();
    assert_eq!(pseudomonas.stats.mean, 3.0);
    assert_eq!(pseudomonas.stats.count, 2);

    let domains = store.read(Rank::Domain).unwrap();
    let archaea = domains.iter().find(|row| row.name() == "archaea").unwrap();
    assert_eq!(archaea.stats.count, 1);
    assert_eq!(archaea.stats.std, None);

    let saved = BuildManifest::load(&cache_dir).unwrap().unwrap();
    assert_eq!(saved, manifest);

    // no download happened
    assert!(!dir.path().join("raw").exists());
}

#[test]
fn test_rebuild_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let input = write_csv(&dir);
    let first = dir.path().join("first");
    let second = dir.path().join("second");

    pipeline::build_from_file(&input, "predictions.csv", &first).unwrap();
    pipeline::build_from_file(&input, "predictions.csv", &second).unwrap();

    for rank in Rank::ALL {
        let name = format!("{}.parquet", rank);
        assert_eq!(
            std::fs::read(first.join(&name)).unwrap(),
            std::fs::read(second.join(&name)).unwrap(),
            "{} differs between builds",
            name
        );
    }
}
