//! Phydon CLI Library
//!
//! Command-line front end for the doubling-time lookup.
//!
//! - **One-shot lookups**: `phydon pseudomonas --genus --median`
//! - **Server mode**: `phydon --serve --port 5000`
//!
//! The per-rank tables must exist in the cache directory; they are produced
//! by `phydon-ingest build`.

pub mod commands;
pub mod error;

pub use error::{CliError, Result};

use std::path::PathBuf;

use clap::builder::PossibleValuesParser;
use clap::{Args, Parser, ValueEnum};
use phydon_common::{Rank, Statistic, DEFAULT_CACHE_DIR};
use phydon_server::config::{DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT};

/// Phydon - look up predicted microbial doubling times by taxonomy
#[derive(Parser, Debug)]
#[command(name = "phydon")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Taxonomic name to search for
    pub query: Option<String>,

    /// Rank to search first
    #[arg(long, value_parser = PossibleValuesParser::new(Rank::names()))]
    pub level: Option<String>,

    #[command(flatten)]
    pub level_flags: LevelFlags,

    /// Report a single statistic
    #[arg(long, value_parser = PossibleValuesParser::new(Statistic::names()))]
    pub stat: Option<String>,

    #[command(flatten)]
    pub stat_flags: StatFlags,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Directory holding the per-rank tables
    #[arg(long, env = "PHYDON_CACHE_DIR", default_value = DEFAULT_CACHE_DIR)]
    pub cache_dir: PathBuf,

    /// Start the HTTP API instead of running a lookup
    #[arg(long)]
    pub serve: bool,

    /// Address to bind in server mode
    #[arg(long, env = "PHYDON_HOST", default_value = DEFAULT_SERVER_HOST)]
    pub host: String,

    /// Port to bind in server mode
    #[arg(long, env = "PHYDON_PORT", default_value_t = DEFAULT_SERVER_PORT)]
    pub port: u16,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the CLI reference as markdown
    #[arg(long, hide = true)]
    pub markdown_help: bool,
}

impl Cli {
    /// Rank hint; `--level` takes precedence over a shortcut flag
    pub fn level(&self) -> Option<&str> {
        self.level
            .as_deref()
            .or_else(|| self.level_flags.selected().map(Rank::as_str))
    }

    /// Requested statistic; `--stat` takes precedence over a shortcut flag
    pub fn stat(&self) -> Option<&str> {
        self.stat
            .as_deref()
            .or_else(|| self.stat_flags.selected().map(Statistic::as_str))
    }
}

/// Shortcut flags equivalent to `--level <rank>`
#[derive(Args, Debug, Default)]
#[group(id = "level_shortcut", multiple = false)]
pub struct LevelFlags {
    /// Shortcut for --level domain
    #[arg(long)]
    pub domain: bool,
    /// Shortcut for --level phylum
    #[arg(long)]
    pub phylum: bool,
    /// Shortcut for --level class
    #[arg(long)]
    pub class: bool,
    /// Shortcut for --level order
    #[arg(long)]
    pub order: bool,
    /// Shortcut for --level family
    #[arg(long)]
    pub family: bool,
    /// Shortcut for --level genus
    #[arg(long)]
    pub genus: bool,
    /// Shortcut for --level species
    #[arg(long)]
    pub species: bool,
}

impl LevelFlags {
    pub fn selected(&self) -> Option<Rank> {
        let set = [
            self.domain,
            self.phylum,
            self.class,
            self.order,
            self.family,
            self.genus,
            self.species,
        ];
        Rank::ALL
            .into_iter()
            .zip(set)
            .find_map(|(rank, on)| on.then_some(rank))
    }
}

/// Shortcut flags equivalent to `--stat <statistic>`
#[derive(Args, Debug, Default)]
#[group(id = "stat_shortcut", multiple = false)]
pub struct StatFlags {
    /// Shortcut for --stat mean
    #[arg(long)]
    pub mean: bool,
    /// Shortcut for --stat median
    #[arg(long)]
    pub median: bool,
    /// Shortcut for --stat min
    #[arg(long)]
    pub min: bool,
    /// Shortcut for --stat max
    #[arg(long)]
    pub max: bool,
    /// Shortcut for --stat range
    #[arg(long)]
    pub range: bool,
    /// Shortcut for --stat std
    #[arg(long = "std")]
    pub std_dev: bool,
    /// Shortcut for --stat se
    #[arg(long)]
    pub se: bool,
    /// Shortcut for --stat count
    #[arg(long)]
    pub count: bool,
}

impl StatFlags {
    pub fn selected(&self) -> Option<Statistic> {
        let set = [
            self.mean,
            self.median,
            self.min,
            self.max,
            self.range,
            self.std_dev,
            self.se,
            self.count,
        ];
        Statistic::ALL
            .into_iter()
            .zip(set)
            .find_map(|(stat, on)| on.then_some(stat))
    }
}

/// How a lookup result is printed
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Pretty-printed JSON payload
    #[default]
    Json,
    /// Human-readable summary table
    Table,
}
