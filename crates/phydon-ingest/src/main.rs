//! Phydon Ingest - builds the aggregate tables

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use phydon_common::logging::{init_logging, LogConfig, LogLevel};
use phydon_common::DEFAULT_CACHE_DIR;
use phydon_ingest::config::{BuildConfig, DEFAULT_CSV_URL, DEFAULT_RAW_DIR};
use phydon_ingest::pipeline;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "phydon-ingest")]
#[command(author, version, about = "Phydon aggregate table builder")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Parser, Debug)]
enum Command {
    /// Download the predictions and build every rank table
    Build {
        /// Source URL of the prediction CSV
        #[arg(long, env = "PHYDON_CSV_URL", default_value = DEFAULT_CSV_URL)]
        url: String,

        /// Directory for the downloaded CSV
        #[arg(long, env = "PHYDON_RAW_DIR", default_value = DEFAULT_RAW_DIR)]
        raw_dir: PathBuf,

        /// Output directory for the rank tables
        #[arg(long, env = "PHYDON_CACHE_DIR", default_value = DEFAULT_CACHE_DIR)]
        cache_dir: PathBuf,

        /// Aggregate a local CSV (plain or .gz) instead of downloading
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Download again even if the raw file exists
        #[arg(long)]
        force_download: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    // Environment variables take precedence over the flags
    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("phydon-ingest")
        .build()
        .merge_env()?;
    let _log_guard = init_logging(&log_config)?;

    match cli.command {
        Command::Build {
            url,
            raw_dir,
            cache_dir,
            input,
            force_download,
        } => {
            let config = BuildConfig {
                url,
                raw_dir,
                cache_dir,
                input,
                force_download,
            };
            info!(source = %config.source_label(), "Building aggregate tables");
            let manifest = pipeline::run(&config).await?;

            for summary in &manifest.ranks {
                info!(rank = %summary.rank, rows = summary.rows, "Rank table");
            }
        },
    }

    Ok(())
}
