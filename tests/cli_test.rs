//! Integration tests for the CLI search path over JSONL files.

use std::io::Write;

use tempfile::{NamedTempFile, TempDir};

use sarissa_spatial::cli::args::{SearchArgs, ValidateArgs};
use sarissa_spatial::cli::commands::{run_search, run_validate};
use sarissa_spatial::error::{Result, SarissaError};

const CITIES: &str = r#"{"id": "Staten Island", "name_t": "Staten Island", "rating": 4.0, "lat": 40.5834379, "lng": -74.1495875}
{"id": "New York", "name_t": "New York", "rating": 4.0, "lat": "40.7142691", "lng": "-74.0059729"}
{"id": "Yonkers", "name_t": "Yonkers", "rating": 4.0, "lat": 40.9312099, "lng": -73.8987469}

{"id": "Brooklyn", "name_t": "Brooklyn", "rating": 5.0, "lat": 40.6501037, "lng": -73.9495823}
"#;

fn write_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

fn search_args(dir: &TempDir) -> SearchArgs {
    SearchArgs {
        docs: write_file(dir, "cities.jsonl", CITIES),
        schema: None,
        config: None,
        query: None,
        query_fields: Vec::new(),
        min_should_match: 1,
        filter_queries: Vec::new(),
        spatial: None,
        sort: None,
        start: 0,
        rows: None,
    }
}

#[test]
fn test_search_with_inferred_schema() -> Result<()> {
    let dir = TempDir::new()?;
    let args = SearchArgs {
        spatial: Some("{!radius=10 sort=true}40.7142691,-74.0059729".to_string()),
        ..search_args(&dir)
    };

    let (response, config) = run_search(&args)?;
    assert_eq!(response.keys(), vec!["New York", "Brooklyn"]);
    let distances = response.section(&config.spatial.response_key).unwrap();
    assert_eq!(distances["New York"].as_f64(), Some(0.0));
    Ok(())
}

#[test]
fn test_search_with_schema_and_config() -> Result<()> {
    let dir = TempDir::new()?;
    let schema = write_file(
        &dir,
        "schema.json",
        r#"{"unique_key": "id", "fields": {"id": "string", "name_t": "text", "rating": "float", "lat": "float", "lng": "float"}}"#,
    );
    let config = write_file(
        &dir,
        "config.json",
        r#"{"engine": {"default_rows": 3}, "spatial": {"param_name": "geo", "response_key": "miles"}}"#,
    );
    let args = SearchArgs {
        schema: Some(schema),
        config: Some(config),
        spatial: Some("{!sort=true}40.7142691,-74.0059729".to_string()),
        sort: Some("rating desc".to_string()),
        ..search_args(&dir)
    };

    let (response, _) = run_search(&args)?;
    assert_eq!(response.keys(), vec!["Brooklyn", "New York", "Staten Island"]);
    assert_eq!(response.total_hits, 4);
    assert_eq!(response.section("miles").and_then(|v| v.as_object()).map(|m| m.len()), Some(3));
    Ok(())
}

#[test]
fn test_search_with_text_query_and_filter() -> Result<()> {
    let dir = TempDir::new()?;
    let args = SearchArgs {
        query: Some("island york".to_string()),
        query_fields: vec!["name_t".to_string()],
        filter_queries: vec!["rating:[4 TO 4.5]".to_string()],
        ..search_args(&dir)
    };
    let (response, _) = run_search(&args)?;
    assert_eq!(response.keys(), vec!["Staten Island", "New York"]);
    assert!(response.sections.is_empty());
    Ok(())
}

#[test]
fn test_bad_spatial_expression_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let args = SearchArgs {
        spatial: Some("{!radius=10}somewhere".to_string()),
        ..search_args(&dir)
    };
    let err = run_search(&args).unwrap_err();
    assert!(matches!(err, SarissaError::MalformedQuerySyntax(_)));
    assert!(err.is_bad_request());
}

#[test]
fn test_validate_file() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, r#"{{"id": "ok", "latitude": 1.5, "longitude": 2.5}}"#)?;
    writeln!(file, r#"{{"id": "bad", "latitude": "north", "longitude": 2.5}}"#)?;

    let report = run_validate(&ValidateArgs {
        docs: file.path().to_path_buf(),
        lat_field: "latitude".to_string(),
        lng_field: "longitude".to_string(),
    })?;
    assert_eq!(report.valid, 1);
    assert_eq!(report.invalid.len(), 1);
    assert!(report.invalid[0].reason.contains("latitude"));
    Ok(())
}
