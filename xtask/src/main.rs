//! Build automation tasks for Phydon
//!
//! - Generating the CLI reference from the clap definitions

use clap::Parser;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation tasks for Phydon", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Generate the CLI reference in markdown
    GenerateCliDocs {
        /// Output directory for generated documentation
        #[arg(short, long, default_value = "docs")]
        output_dir: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::GenerateCliDocs { output_dir } => generate_cli_docs(&output_dir)?,
    }

    Ok(())
}

fn generate_cli_docs(output_dir: &str) -> anyhow::Result<()> {
    println!("Generating CLI documentation...");

    let markdown = clap_markdown::help_markdown::<phydon_cli::Cli>();

    let content = format!(
        r#"# Phydon CLI Reference

Generated from the CLI source code. Last updated: {}.

## Overview

`phydon` looks up predicted microbial doubling times by taxonomic name. Names
are matched exactly first, then approximately, across the seven ranks from
domain to species.

## Quick Start

```bash
# Build the per-rank tables (downloads the predictions once)
phydon-ingest build

# Look up a genus
phydon pseudomonas

# Search a specific rank and report one statistic
phydon "pseudomonas aeruginosa" --species --median

# Human-readable output
phydon bacillus --format table

# Serve the HTTP API
phydon --serve --port 5000
```

## Commands

{}

## Environment Variables

- `PHYDON_CACHE_DIR` - Directory holding the per-rank tables (default: `cache`)
- `PHYDON_HOST` / `PHYDON_PORT` - Bind address for `--serve` (default: `127.0.0.1:5000`)
- `PHYDON_SCORE_CUTOFF` - Minimum approximate-match score in server mode (default: `50`)
- `LOG_LEVEL`, `LOG_FORMAT`, `LOG_OUTPUT` - Logging overrides

---

*To update, run `cargo run -p xtask -- generate-cli-docs`.*
"#,
        chrono::Utc::now().format("%Y-%m-%d"),
        markdown
    );

    let output_path = PathBuf::from(output_dir);
    fs::create_dir_all(&output_path)?;

    let file_path = output_path.join("cli-reference.md");
    fs::write(&file_path, content)?;

    println!("Generated CLI documentation at: {}", file_path.display());

    Ok(())
}
