//! Fetching the prediction CSV
//!
//! The raw file is downloaded once into the raw directory and reused by
//! later builds unless a fresh download is forced.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, instrument};

/// File name used when the URL has no usable last path segment
const FALLBACK_FILE_NAME: &str = "phydon_predictions.csv";

/// Local file name for a download URL: its last path segment
pub fn file_name_from_url(url: &str) -> String {
    let without_query = url.split(['?', '#']).next().unwrap_or_default();
    let without_scheme = without_query
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(without_query);

    without_scheme
        .split_once('/')
        .and_then(|(_, path)| path.rsplit('/').next())
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string())
}

/// Make sure the CSV behind `url` is present in `raw_dir` and return its path.
///
/// An existing file is reused unless `force` is set.
#[instrument(skip(client))]
pub async fn fetch_source(
    client: &reqwest::Client,
    url: &str,
    raw_dir: &Path,
    force: bool,
) -> Result<PathBuf> {
    let path = raw_dir.join(file_name_from_url(url));

    if path.is_file() && !force {
        info!(path = %path.display(), "Source already present, skipping download");
        return Ok(path);
    }

    std::fs::create_dir_all(raw_dir)
        .with_context(|| format!("Failed to create {}", raw_dir.display()))?;
    download_file(client, url, &path).await?;
    Ok(path)
}

/// Stream `url` to `output_path`, returning the number of bytes written.
///
/// The body goes to a `.part` file that is renamed on success, so an
/// interrupted download never looks like a finished one.
pub async fn download_file(client: &reqwest::Client, url: &str, output_path: &Path) -> Result<u64> {
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to request {}", url))?;

    if !response.status().is_success() {
        anyhow::bail!("Failed to download {}: {}", url, response.status());
    }

    let total_size = response.content_length().unwrap_or(0);
    let display_name = output_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| output_path.display().to_string());

    let pb = ProgressBar::new(total_size);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({eta})")?
            .progress_chars("#>-"),
    );
    pb.set_message(format!("Downloading {}", display_name));

    let partial_path = output_path.with_extension("part");
    let mut file = std::fs::File::create(&partial_path)
        .with_context(|| format!("Failed to create {}", partial_path.display()))?;
    let mut downloaded = 0u64;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.with_context(|| format!("Download of {} interrupted", url))?;
        file.write_all(&chunk)?;
        downloaded += chunk.len() as u64;
        pb.set_position(downloaded);
    }
    file.flush()?;
    drop(file);

    std::fs::rename(&partial_path, output_path)?;
    pb.finish_with_message(format!("Downloaded {}", display_name));
    info!(url, bytes = downloaded, path = %output_path.display(), "Download complete");

    Ok(downloaded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_from_url() {
        assert_eq!(
            file_name_from_url(
                "https://github.com/xl0418/Phydon/releases/download/v1.0.0/phydon_gtdb_ssu_with_OGT.csv"
            ),
            "phydon_gtdb_ssu_with_OGT.csv"
        );
        assert_eq!(
            file_name_from_url("https://example.org/data/preds.csv.gz?raw=1"),
            "preds.csv.gz"
        );
        assert_eq!(file_name_from_url("https://example.org/"), FALLBACK_FILE_NAME);
        assert_eq!(file_name_from_url("https://example.org"), FALLBACK_FILE_NAME);
    }
}
