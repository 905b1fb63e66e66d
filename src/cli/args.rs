//! Command line argument parsing for the sarissa-spatial CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Sarissa Spatial - geospatial search over JSON documents
#[derive(Parser, Debug, Clone)]
#[command(name = "sarissa-spatial")]
#[command(about = "Radius filtering and distance sorting over JSON documents")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Sarissa Contributors")]
#[command(long_about = None)]
pub struct SpatialArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl SpatialArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n + 1,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Load documents and run one search
    Search(SearchArgs),

    /// Report documents with missing or invalid coordinates
    Validate(ValidateArgs),
}

/// Arguments for searching
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Document file path (JSON array or JSONL)
    #[arg(long, value_name = "DOCUMENT_FILE")]
    pub docs: PathBuf,

    /// Schema definition file path (JSON); inferred from the documents if omitted
    #[arg(long, value_name = "SCHEMA_FILE")]
    pub schema: Option<PathBuf>,

    /// Engine and spatial settings file path (JSON)
    #[arg(long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Text query
    #[arg(long = "q", value_name = "QUERY")]
    pub query: Option<String>,

    /// Comma-separated fields searched by the text query
    #[arg(long = "qf", value_delimiter = ',')]
    pub query_fields: Vec<String>,

    /// Minimum number of query words that must match
    #[arg(long = "mm", default_value = "1")]
    pub min_should_match: usize,

    /// Filter query, e.g. `rating:4.0` (repeatable)
    #[arg(long = "fq", value_name = "FILTER")]
    pub filter_queries: Vec<String>,

    /// Spatial expression, e.g. `{!radius=10 sort=true}40.71,-74.00`
    #[arg(long, value_name = "EXPR")]
    pub spatial: Option<String>,

    /// Sort specification, e.g. `rating desc`
    #[arg(long)]
    pub sort: Option<String>,

    /// Offset of the first result
    #[arg(long, default_value = "0")]
    pub start: usize,

    /// Maximum number of results to return
    #[arg(long)]
    pub rows: Option<usize>,
}

/// Arguments for validating documents
#[derive(Parser, Debug, Clone)]
pub struct ValidateArgs {
    /// Document file path (JSON array or JSONL)
    #[arg(long, value_name = "DOCUMENT_FILE")]
    pub docs: PathBuf,

    /// Latitude field name
    #[arg(long, default_value = "lat")]
    pub lat_field: String,

    /// Longitude field name
    #[arg(long, default_value = "lng")]
    pub lng_field: String,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}
