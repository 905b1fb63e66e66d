//! Output formatting for CLI commands.

use std::fmt::Write as _;
use std::time::Duration;

use serde::Serialize;

use crate::cli::args::{OutputFormat, SpatialArgs};
use crate::cli::commands::ValidationReport;
use crate::error::Result;
use crate::search::SearchResponse;

/// Search response together with timing, as written in JSON mode.
#[derive(Debug, Serialize)]
pub struct SearchOutput<'a> {
    #[serde(flatten)]
    pub response: &'a SearchResponse,
    pub duration_ms: u64,
}

/// Output a search response in the selected format.
pub fn output_search(
    response: &SearchResponse,
    distances_key: &str,
    duration: Duration,
    args: &SpatialArgs,
) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            print!("{}", format_search_human(response, distances_key, duration));
            Ok(())
        }
        OutputFormat::Json => output_json(
            &SearchOutput {
                response,
                duration_ms: duration.as_millis() as u64,
            },
            args,
        ),
    }
}

/// Output a validation report in the selected format.
pub fn output_validation(report: &ValidationReport, args: &SpatialArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            print!("{}", format_validation_human(report));
            Ok(())
        }
        OutputFormat::Json => output_json(report, args),
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &SpatialArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}

/// Render search results for a terminal.
pub fn format_search_human(
    response: &SearchResponse,
    distances_key: &str,
    duration: Duration,
) -> String {
    let distances = response.section(distances_key);
    let mut out = String::new();
    let _ = writeln!(out, "Search Results:");
    let _ = writeln!(out, "═══════════════");

    for (i, hit) in response.hits.iter().enumerate() {
        let key = hit.key.as_deref().unwrap_or("?");
        let _ = write!(out, "{}. {key} (Score: {:.3})", response.start + i + 1, hit.score);
        if let Some(miles) = distances.and_then(|d| d.get(key)).and_then(|v| v.as_f64()) {
            let _ = write!(out, " [{miles:.3} mi]");
        }
        let _ = writeln!(out);

        let mut fields: Vec<_> = hit.document.fields().iter().collect();
        fields.sort_by(|a, b| a.0.cmp(b.0));
        for (name, value) in fields {
            let _ = writeln!(out, "   {name}: {value}");
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Total hits: {}", response.total_hits);
    let _ = writeln!(out, "Search time: {}ms", duration.as_millis());
    out
}

/// Render a validation report for a terminal.
pub fn format_validation_human(report: &ValidationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Checked {} documents: {} valid, {} invalid",
        report.total,
        report.valid,
        report.invalid.len()
    );
    for doc in &report.invalid {
        let _ = writeln!(
            out,
            "  #{} ({}): {}",
            doc.position,
            doc.key.as_deref().unwrap_or("no id"),
            doc.reason
        );
    }
    out
}
