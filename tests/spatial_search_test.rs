//! Integration tests for spatial search through the engine pipeline.

use std::collections::BTreeSet;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use sarissa_spatial::document::Document;
use sarissa_spatial::error::{Result, SarissaError};
use sarissa_spatial::schema::{FieldType, Schema};
use sarissa_spatial::search::{EngineConfig, SearchEngine, SearchRequest, SearchResponse};
use sarissa_spatial::spatial::{EARTH_RADIUS_MILES, SpatialComponent, haversine_miles};

const CENTER: &str = "40.7142691, -74.0059729";
const NEW_YORK: (f64, f64) = (40.7142691, -74.0059729);

fn engine_with_fields(lat_field: &str, lng_field: &str) -> SearchEngine {
    let schema = Schema::builder()
        .field("id", FieldType::String)
        .field("name_t", FieldType::Text)
        .field("other_t", FieldType::Text)
        .field("rating", FieldType::Float)
        .field(lat_field, FieldType::Float)
        .field(lng_field, FieldType::Float)
        .build()
        .unwrap();
    SearchEngine::new(schema, EngineConfig::default())
        .with_component(Arc::new(SpatialComponent::default()))
}

fn add_location(
    engine: &mut SearchEngine,
    name: &str,
    lat_field: &str,
    lng_field: &str,
    rating: f64,
    lat: f64,
    lng: f64,
) -> Result<()> {
    engine.add_document(
        Document::builder()
            .add_text("id", name)
            .add_text("name_t", name)
            .add_float("rating", rating)
            .add_location(lat_field, lng_field, lat, lng)
            .build(),
    )
}

fn add_standard_fixtures(engine: &mut SearchEngine, lat_field: &str, lng_field: &str) -> Result<()> {
    // 11.764 miles, but inside the bounding box
    add_location(engine, "Staten Island", lat_field, lng_field, 4.0, 40.5834379, -74.1495875)?;
    // 0.000 miles
    add_location(engine, "New York", lat_field, lng_field, 4.0, 40.7142691, -74.0059729)?;
    // 16.003 miles
    add_location(engine, "Yonkers", lat_field, lng_field, 4.0, 40.9312099, -73.8987469)?;
    // 5.328 miles
    add_location(engine, "Brooklyn", lat_field, lng_field, 5.0, 40.6501037, -73.9495823)?;
    engine.commit()
}

fn standard_engine() -> Result<SearchEngine> {
    let mut engine = engine_with_fields("lat", "lng");
    add_standard_fixtures(&mut engine, "lat", "lng")?;
    Ok(engine)
}

fn spatial(expr: &str) -> SearchRequest {
    SearchRequest::new().with_param("spatial", expr)
}

fn assert_results(response: &SearchResponse, expected: &[&str]) {
    let actual: BTreeSet<&str> = response.keys().into_iter().collect();
    let expected: BTreeSet<&str> = expected.iter().copied().collect();
    assert_eq!(actual, expected);
}

fn assert_results_in_order(response: &SearchResponse, expected: &[&str]) {
    assert_eq!(response.keys(), expected);
}

/// Distances reported for the page, in page order. Each one must be
/// present and at least the previous one.
fn assert_result_distances_in_order(response: &SearchResponse) -> Vec<f64> {
    let block = response
        .section("distances")
        .and_then(|v| v.as_object())
        .expect("distances block");
    assert_eq!(block.len(), response.hits.len());

    let mut previous = -1.0;
    let mut distances = Vec::new();
    for key in response.keys() {
        let distance = block
            .get(key)
            .and_then(|v| v.as_f64())
            .unwrap_or_else(|| panic!("no distance for {key}"));
        assert!(distance >= previous, "{key} at {distance} after {previous}");
        previous = distance;
        distances.push(distance);
    }
    distances
}

#[test]
fn test_simple_spatial_search() -> Result<()> {
    let engine = standard_engine()?;
    let response = engine.search(&spatial(&format!("{{!radius=10}}{CENTER}")))?;
    assert_results(&response, &["New York", "Brooklyn"]);
    assert_eq!(response.total_hits, 2);
    Ok(())
}

#[test]
fn test_custom_field_names() -> Result<()> {
    let mut engine = engine_with_fields("latitude", "longitude");
    add_standard_fixtures(&mut engine, "latitude", "longitude")?;
    let response = engine.search(&spatial(
        "{!radius=10}latitude:40.7142691, longitude:-74.0059729",
    ))?;
    assert_results(&response, &["New York", "Brooklyn"]);
    Ok(())
}

#[test]
fn test_with_other_filters() -> Result<()> {
    let engine = standard_engine()?;
    let request = spatial(&format!("{{!radius=15}}{CENTER}")).add_filter_query("rating:4.0");
    assert_results(&engine.search(&request)?, &["New York", "Staten Island"]);
    Ok(())
}

#[test]
fn test_simple_distance_sorting() -> Result<()> {
    let engine = standard_engine()?;
    let response = engine.search(&spatial(&format!("{{!sort=true}}{CENTER}")))?;
    assert_results_in_order(&response, &["New York", "Brooklyn", "Staten Island", "Yonkers"]);
    Ok(())
}

#[test]
fn test_sorting_with_other_filters() -> Result<()> {
    let engine = standard_engine()?;
    let request = spatial(&format!("{{!sort=true}}{CENTER}"));
    engine.search(&request)?;
    let request = request.add_filter_query("rating:4.0");
    assert_results_in_order(
        &engine.search(&request)?,
        &["New York", "Staten Island", "Yonkers"],
    );
    Ok(())
}

#[test]
fn test_specified_limit() -> Result<()> {
    let engine = standard_engine()?;
    let response = engine.search(&spatial(&format!("{{!sort=true}}{CENTER}")).with_rows(2))?;
    assert_results_in_order(&response, &["New York", "Brooklyn"]);
    assert_eq!(response.total_hits, 4);

    let response = engine.search(
        &spatial(&format!("{{!sort=true}}{CENTER}"))
            .with_start(2)
            .with_rows(2),
    )?;
    assert_results_in_order(&response, &["Staten Island", "Yonkers"]);
    Ok(())
}

#[test]
fn test_compound_sort() -> Result<()> {
    let engine = standard_engine()?;
    let request = spatial(&format!("{{!sort=true}}{CENTER}")).with_sort("rating desc");
    assert_results_in_order(
        &engine.search(&request)?,
        &["Brooklyn", "New York", "Staten Island", "Yonkers"],
    );
    Ok(())
}

#[test]
fn test_explicit_sort_keeps_precedence_over_distance() -> Result<()> {
    let engine = standard_engine()?;
    let request = spatial(&format!("{{!sort=true}}{CENTER}")).with_sort("rating asc");
    assert_results_in_order(
        &engine.search(&request)?,
        &["New York", "Staten Island", "Yonkers", "Brooklyn"],
    );
    Ok(())
}

fn text_engine() -> Result<SearchEngine> {
    let mut engine = engine_with_fields("lat", "lng");
    add_location(&mut engine, "New Haven", "lat", "lng", 5.0, 41.3081527, -72.9281577)?;
    add_standard_fixtures(&mut engine, "lat", "lng")?;
    Ok(engine)
}

#[test]
fn test_text_query_with_spatial_sorting() -> Result<()> {
    let engine = text_engine()?;
    let request = spatial(&format!("{{!sort=true}}{CENTER}"))
        .with_query("new")
        .with_query_fields(["name_t", "other_t"]);
    assert_results(&engine.search(&request)?, &["New York", "New Haven"]);
    Ok(())
}

#[test]
fn test_distance_sort_overrides_relevance() -> Result<()> {
    let engine = text_engine()?;
    let request = spatial(&format!("{{!sort=true}}{CENTER}"))
        .with_query("new haven")
        .with_query_fields(["name_t", "other_t"])
        .with_min_should_match(1);
    let response = engine.search(&request)?;
    assert_results_in_order(&response, &["New York", "New Haven"]);
    assert!(response.hits[1].score > response.hits[0].score);

    let without_sort = engine.search(&request.clone().with_param("spatial", CENTER))?;
    assert_results_in_order(&without_sort, &["New Haven", "New York"]);
    Ok(())
}

#[test]
fn test_adds_distance_to_response() -> Result<()> {
    let engine = standard_engine()?;
    let response = engine.search(&spatial(&format!("{{!radius=10 sort=true}}{CENTER}")))?;
    let distances = assert_result_distances_in_order(&response);
    assert_eq!(distances.len(), 2);
    assert_eq!(distances[0], 0.0);
    assert!((distances[1] - 5.328).abs() < 0.001);
    Ok(())
}

#[test]
fn test_adds_distance_to_response_in_second_search() -> Result<()> {
    let engine = standard_engine()?;
    let request = spatial(&format!("{{!radius=10 sort=true}}{CENTER}"));

    let first = engine.search(&request)?;
    let hits_before = engine.filter_cache().stats().hits;
    let second = engine.search(&request)?;
    assert!(engine.filter_cache().stats().hits > hits_before);

    assert_results_in_order(&second, &["New York", "Brooklyn"]);
    assert_eq!(
        assert_result_distances_in_order(&first),
        assert_result_distances_in_order(&second)
    );
    Ok(())
}

#[test]
fn test_adds_distance_to_response_without_radius() -> Result<()> {
    let engine = standard_engine()?;
    let response = engine.search(&spatial(&format!("{{!sort=true}}{CENTER}")))?;
    let distances = assert_result_distances_in_order(&response);
    assert_eq!(distances.len(), 4);
    assert!((distances[3] - 16.003).abs() < 0.001);
    Ok(())
}

#[test]
fn test_distances_without_sorting() -> Result<()> {
    let engine = standard_engine()?;
    let response = engine.search(&spatial(&format!("{{!radius=10}}{CENTER}")))?;
    let block = response.section("distances").unwrap();
    assert!(block.get("Brooklyn").is_some());
    assert!(block.get("Staten Island").is_none());
    Ok(())
}

#[test]
fn test_only_adds_distances_from_results() -> Result<()> {
    let engine = standard_engine()?;
    let response = engine.search(&spatial(&format!("{{!sort=true}}{CENTER}")).with_rows(2))?;
    assert_result_distances_in_order(&response);
    let block = response.section("distances").unwrap().as_object().unwrap();
    assert_eq!(block.len(), 2);
    assert!(!block.contains_key("Yonkers"));
    Ok(())
}

#[test]
fn test_search_without_spatial() -> Result<()> {
    let engine = standard_engine()?;
    let response = engine.search(&SearchRequest::new().add_filter_query("rating:4.0"))?;
    assert_results(&response, &["New York", "Staten Island", "Yonkers"]);
    assert!(response.section("distances").is_none());
    Ok(())
}

#[test]
fn test_distances_follow_index_changes() -> Result<()> {
    let mut engine = standard_engine()?;
    let request = spatial(&format!("{{!radius=10 sort=true}}{CENTER}"));
    engine.search(&request)?;

    // Move Brooklyn onto the centerpoint.
    add_location(&mut engine, "Brooklyn", "lat", "lng", 5.0, NEW_YORK.0, NEW_YORK.1)?;
    engine.commit()?;

    let response = engine.search(&request)?;
    let block = response.section("distances").unwrap();
    assert_eq!(block["Brooklyn"].as_f64(), Some(0.0));
    Ok(())
}

#[test]
fn test_documents_without_coordinates_are_excluded() -> Result<()> {
    let mut engine = standard_engine()?;
    engine.add_document(
        Document::builder()
            .add_text("id", "Nowhere")
            .add_text("name_t", "Nowhere")
            .add_float("rating", 4.0)
            .build(),
    )?;
    engine.add_document(
        Document::builder()
            .add_text("id", "Half")
            .add_float("rating", 4.0)
            .add_float("lat", 40.7)
            .build(),
    )?;
    engine.commit()?;

    let response = engine.search(&spatial(&format!("{{!sort=true}}{CENTER}")))?;
    assert_results_in_order(&response, &["New York", "Brooklyn", "Staten Island", "Yonkers"]);

    let response = engine.search(&SearchRequest::new().add_filter_query("rating:4.0"))?;
    assert_eq!(response.total_hits, 5);
    Ok(())
}

#[test]
fn test_malformed_spatial_query_is_rejected() {
    let engine = standard_engine().unwrap();
    for expr in ["{!radius=10}40.7142691", "{!radius=x}40.7,-74.0", "{!radius=10 40.7,-74.0"] {
        let err = engine.search(&spatial(expr)).unwrap_err();
        assert!(matches!(err, SarissaError::MalformedQuerySyntax(_)), "{expr}: {err:?}");
        assert!(err.is_bad_request());
    }
}

#[test]
fn test_unsupported_field_encoding_aborts() {
    let engine = standard_engine().unwrap();
    let err = engine
        .search(&spatial("{!radius=10}name_t:40.71,lng:-74.00"))
        .unwrap_err();
    assert!(matches!(err, SarissaError::UnsupportedFieldEncoding { .. }));
    assert!(!err.is_bad_request());
}

#[test]
fn test_radius_filter_matches_brute_force() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(7);
    let mut engine = engine_with_fields("lat", "lng");
    let mut points = Vec::new();
    for i in 0..500 {
        let lat = NEW_YORK.0 + rng.random_range(-1.0..1.0);
        let lng = NEW_YORK.1 + rng.random_range(-1.0..1.0);
        let id = format!("p{i}");
        add_location(&mut engine, &id, "lat", "lng", 1.0, lat, lng)?;
        points.push((id, lat, lng));
    }
    engine.commit()?;

    for radius in [1.0, 10.0, 25.0, 60.0] {
        let request = spatial(&format!("{{!radius={radius} sort=true}}{CENTER}")).with_rows(1000);
        let response = engine.search(&request)?;

        let expected: BTreeSet<&str> = points
            .iter()
            .filter(|(_, lat, lng)| haversine_miles(NEW_YORK.0, NEW_YORK.1, *lat, *lng) <= radius)
            .map(|(id, _, _)| id.as_str())
            .collect();
        let actual: BTreeSet<&str> = response.keys().into_iter().collect();
        assert_eq!(actual, expected, "radius {radius}");

        for distance in assert_result_distances_in_order(&response) {
            assert!(distance <= radius);
        }
    }
    Ok(())
}

/// Point at `distance_miles` from `(lat, lng)` along `bearing_deg`, on the sphere.
fn destination(lat: f64, lng: f64, bearing_deg: f64, distance_miles: f64) -> (f64, f64) {
    let (phi, lambda) = (lat.to_radians(), lng.to_radians());
    let theta = bearing_deg.to_radians();
    let delta = distance_miles / EARTH_RADIUS_MILES;
    let phi2 = (phi.sin() * delta.cos() + phi.cos() * delta.sin() * theta.cos()).asin();
    let lambda2 =
        lambda + (theta.sin() * delta.sin() * phi.cos()).atan2(delta.cos() - phi.sin() * phi2.sin());
    (phi2.to_degrees(), lambda2.to_degrees())
}

#[test]
fn test_large_radius_at_high_latitude_keeps_boundary_documents() -> Result<()> {
    let center = (60.0, 0.0);
    for radius in [300.0, 500.0, 1000.0] {
        let mut engine = engine_with_fields("lat", "lng");
        let mut inside = BTreeSet::new();
        for step in 0..36 {
            let bearing = step as f64 * 10.0;
            let (lat, lng) = destination(center.0, center.1, bearing, radius * 0.995);
            let id = format!("in{step}");
            add_location(&mut engine, &id, "lat", "lng", 1.0, lat, lng)?;
            inside.insert(id);

            let (lat, lng) = destination(center.0, center.1, bearing, radius * 1.005);
            add_location(&mut engine, &format!("out{step}"), "lat", "lng", 1.0, lat, lng)?;
        }
        engine.commit()?;

        let request =
            spatial(&format!("{{!radius={radius} sort=true}}{},{}", center.0, center.1)).with_rows(100);
        let response = engine.search(&request)?;
        let actual: BTreeSet<String> = response.keys().into_iter().map(String::from).collect();
        assert_eq!(actual, inside, "radius {radius}");

        for distance in assert_result_distances_in_order(&response) {
            assert!(distance <= radius);
        }
    }
    Ok(())
}

#[test]
fn test_requested_distance_sort_clause() -> Result<()> {
    let engine = standard_engine()?;

    let request = spatial(&format!("{{!sort=true}}{CENTER}")).with_sort("geo_distance desc");
    let response = engine.search(&request)?;
    assert_results_in_order(&response, &["Yonkers", "Staten Island", "Brooklyn", "New York"]);

    let request = spatial(CENTER).with_sort("rating desc, geo_distance asc");
    let response = engine.search(&request)?;
    assert_results_in_order(&response, &["Brooklyn", "New York", "Staten Island", "Yonkers"]);
    Ok(())
}
