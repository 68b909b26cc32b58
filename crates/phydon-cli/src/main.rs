//! Phydon CLI - Main entry point

use clap::Parser;
use phydon_cli::{commands, Cli, CliError};
use phydon_common::logging::{init_logging, ConsoleStream, LogConfig, LogLevel, LogOutput};
use std::process;
use tracing::error;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if cli.markdown_help {
        println!("{}", clap_markdown::help_markdown::<Cli>());
        return;
    }

    // stdout carries only the payload
    let defaults = LogConfig::builder()
        .level(if cli.verbose { LogLevel::Debug } else { LogLevel::Warn })
        .output(LogOutput::Console)
        .console_stream(ConsoleStream::Stderr)
        .log_file_prefix("phydon-cli")
        .build();

    // Environment variables take precedence
    let log_config = match defaults.clone().merge_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: ignoring invalid logging environment: {}", e);
            defaults
        },
    };

    // the CLI works without logging
    let _log_guard = init_logging(&log_config).ok();

    if let Err(e) = execute(&cli).await {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn execute(cli: &Cli) -> phydon_cli::Result<()> {
    if cli.serve {
        return commands::serve::run(cli.cache_dir.clone(), cli.host.clone(), cli.port).await;
    }

    let query = cli
        .query
        .as_deref()
        .filter(|query| !query.trim().is_empty())
        .ok_or(CliError::MissingQuery)?;

    commands::lookup::run(&cli.cache_dir, query, cli.level(), cli.stat(), cli.format)
}
