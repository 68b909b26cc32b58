//! Printing lookup payloads

use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use phydon_common::types::StatValue;
use phydon_lookup::projection::{LineageView, MatchResponse, NoMatchResponse, ResultRecord};
use phydon_lookup::{LookupResponse, MatchScore};

use crate::error::Result;
use crate::OutputFormat;

/// Render a payload for stdout
pub fn render(response: &LookupResponse, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(response)?),
        OutputFormat::Table => Ok(match response {
            LookupResponse::Match(found) => render_match(found),
            LookupResponse::NoMatch(missing) => render_no_match(missing),
        }),
    }
}

fn render_match(response: &MatchResponse) -> String {
    let mut out = format!(
        "{} {} at {} level (score {})\n",
        "Matched".green().bold(),
        response.matched_name.bold(),
        response.matched_level,
        format_score(response.match_score),
    );
    if let Some(ref note) = response.note {
        out.push_str(&format!("{}\n", note.yellow()));
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS);

    match response.stat_requested {
        Some(stat) => {
            let header = match stat.unit() {
                Some(unit) => format!("{} ({})", stat, unit),
                None => stat.to_string(),
            };
            table.set_header(vec!["Lineage".to_string(), header]);
        },
        None => {
            table.set_header(vec![
                "Lineage", "Mean", "Median", "Min", "Max", "Range", "Std", "SE", "Genomes",
            ]);
        },
    }

    for record in &response.results {
        match record {
            ResultRecord::Full(taxon) => {
                let hours = &taxon.doubling_time_hours;
                table.add_row(vec![
                    lineage_path(&taxon.lineage),
                    hours.mean.to_string(),
                    hours.median.to_string(),
                    hours.min.to_string(),
                    hours.max.to_string(),
                    hours.range.to_string(),
                    optional(hours.std),
                    optional(hours.se),
                    taxon.species_count.to_string(),
                ]);
            },
            ResultRecord::Stat(narrowed) => {
                let value = match narrowed.value {
                    StatValue::Hours(hours) => optional(hours),
                    StatValue::Count(count) => count.to_string(),
                };
                table.add_row(vec![lineage_path(&narrowed.lineage), value]);
            },
        }
    }

    out.push_str(&table.to_string());
    out
}

fn render_no_match(response: &NoMatchResponse) -> String {
    format!(
        "{} '{}': {}",
        "No match for".red().bold(),
        response.query,
        response.error
    )
}

fn lineage_path(lineage: &LineageView) -> String {
    lineage
        .0
        .iter()
        .map(|(_, name)| name.as_str())
        .collect::<Vec<_>>()
        .join(" > ")
}

fn optional(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn format_score(score: MatchScore) -> String {
    match score {
        MatchScore::Exact => "100 exact".to_string(),
        MatchScore::Approximate(score) => format!("{:.2}", score),
    }
}
