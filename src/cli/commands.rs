//! Command implementations for the sarissa-spatial CLI.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::document::{Document, DocumentParser};
use crate::error::{Result, SarissaError};
use crate::schema::Schema;
use crate::search::{EngineConfig, SearchEngine, SearchRequest, SearchResponse};
use crate::spatial::{GeoPoint, SpatialComponent, SpatialConfig};

/// Settings read from `--config`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Engine settings.
    pub engine: EngineConfig,
    /// Spatial component settings.
    pub spatial: SpatialConfig,
}

/// Execute a CLI command.
pub fn execute_command(args: SpatialArgs) -> Result<()> {
    match &args.command {
        Command::Search(search_args) => {
            let start_time = Instant::now();
            let (response, config) = run_search(search_args)?;
            let duration = start_time.elapsed();
            output_search(&response, &config.spatial.response_key, duration, &args)
        }
        Command::Validate(validate_args) => {
            let report = run_validate(validate_args)?;
            output_validation(&report, &args)
        }
    }
}

/// Load the documents, build an engine and execute one search.
pub fn run_search(args: &SearchArgs) -> Result<(SearchResponse, CliConfig)> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => CliConfig::default(),
    };

    let raw_docs = load_documents(&args.docs)?;
    let schema = match &args.schema {
        Some(path) => load_schema(path)?,
        None => {
            let schema = Schema::infer(&raw_docs);
            debug!("Inferred schema with {} fields", schema.len());
            schema
        }
    };

    let mut engine = SearchEngine::new(schema, config.engine.clone())
        .with_component(Arc::new(SpatialComponent::new(config.spatial.clone())));
    engine.add_documents(raw_docs)?;
    engine.commit()?;
    info!("Indexed {} documents", engine.stats().doc_count);

    let mut request = SearchRequest::new()
        .with_query_fields(args.query_fields.clone())
        .with_min_should_match(args.min_should_match)
        .with_start(args.start);
    request.query = args.query.clone();
    request.filter_queries = args.filter_queries.clone();
    request.sort = args.sort.clone();
    request.rows = args.rows;
    if let Some(spatial) = &args.spatial {
        request.params.set(config.spatial.param_name.clone(), spatial.clone());
    }

    let response = engine.search(&request)?;
    Ok((response, config))
}

/// A document that cannot take part in spatial search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvalidDocument {
    /// Position of the document in the file, starting at 1.
    pub position: usize,
    /// Unique key, if present.
    pub key: Option<String>,
    /// Why the document is invalid.
    pub reason: String,
}

/// Result of validating coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Documents checked.
    pub total: usize,
    /// Documents with usable coordinates.
    pub valid: usize,
    /// Documents that would be skipped.
    pub invalid: Vec<InvalidDocument>,
}

/// Check every document for usable coordinates.
pub fn run_validate(args: &ValidateArgs) -> Result<ValidationReport> {
    let docs = load_documents(&args.docs)?;
    let key_field = Schema::default().unique_key().to_string();
    let mut report = ValidationReport {
        total: docs.len(),
        ..Default::default()
    };

    for (index, doc) in docs.iter().enumerate() {
        match check_coordinates(doc, &args.lat_field, &args.lng_field) {
            Ok(_) => report.valid += 1,
            Err(e) => report.invalid.push(InvalidDocument {
                position: index + 1,
                key: doc.get_field(&key_field).map(|v| v.to_string()),
                reason: e.to_string(),
            }),
        }
    }
    Ok(report)
}

fn check_coordinates(doc: &Document, lat_field: &str, lng_field: &str) -> Result<GeoPoint> {
    let read = |field: &str| {
        doc.get_f64(field).ok_or_else(|| {
            SarissaError::field(format!("Field '{field}' is missing or not a number"))
        })
    };
    GeoPoint::new(read(lat_field)?, read(lng_field)?)
}

fn load_documents(path: &Path) -> Result<Vec<Document>> {
    let content = fs::read_to_string(path)?;
    DocumentParser::new().parse_str(&content)
}

fn load_schema(path: &Path) -> Result<Schema> {
    let file = File::open(path)?;
    let schema: Schema = serde_json::from_reader(BufReader::new(file))?;
    Ok(schema)
}

fn load_config(path: &Path) -> Result<CliConfig> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| {
        SarissaError::invalid_config(format!("Invalid config file {}: {e}", path.display()))
    })
}
