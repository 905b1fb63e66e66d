//! Parsing of spatial expressions.
//!
//! An expression is a centerpoint, optionally preceded by local params:
//!
//! ```text
//! {!radius=10 sort=true}latitude:40.7142691, longitude:-74.0059729
//! ```
//!
//! Field names are taken from the inline `field:` prefixes only; an
//! unlabeled coordinate uses the configured default field.

use lazy_static::lazy_static;
use regex::Regex;

use crate::document::field_value::parse_bool;
use crate::error::{Result, SarissaError};
use crate::search::LocalParams;
use crate::spatial::config::SpatialConfig;
use crate::spatial::geo::GeoPoint;

lazy_static! {
    static ref COORDINATES: Regex = Regex::new(
        r"^(?:(\w+):\s?)?(-?\d+(?:\.\d+)?),\s*(?:(\w+):\s?)?(-?\d+(?:\.\d+)?)$"
    )
    .expect("coordinate pattern is valid");
}

const RADIUS: &str = "radius";
const SORT: &str = "sort";

/// A parsed spatial expression.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialRequest {
    /// Field holding document latitudes.
    pub lat_field: String,
    /// Field holding document longitudes.
    pub lng_field: String,
    /// The centerpoint.
    pub center: GeoPoint,
    /// Radius in miles; `None` disables filtering but not distance computation.
    pub radius_miles: Option<f64>,
    /// Whether results are ordered by distance.
    pub want_sort: bool,
}

/// Parser for spatial expressions.
#[derive(Debug, Clone)]
pub struct SpatialQueryParser {
    default_lat_field: String,
    default_lng_field: String,
}

impl Default for SpatialQueryParser {
    fn default() -> Self {
        Self::new(&SpatialConfig::default())
    }
}

impl SpatialQueryParser {
    /// Create a parser using the configured default field names.
    pub fn new(config: &SpatialConfig) -> Self {
        SpatialQueryParser {
            default_lat_field: config.default_lat_field.clone(),
            default_lng_field: config.default_lng_field.clone(),
        }
    }

    /// Parse a full parameter value, local params included.
    pub fn parse_param(&self, raw: &str) -> Result<SpatialRequest> {
        let (options, body) = LocalParams::parse(raw)?;
        self.parse(body, &options)
    }

    /// Parse a coordinate body with its options.
    ///
    /// Recognized options are `radius` (miles, non-negative) and `sort`
    /// (boolean). Any other option is rejected.
    pub fn parse(&self, raw: &str, options: &LocalParams) -> Result<SpatialRequest> {
        for key in options.keys() {
            if key != RADIUS && key != SORT {
                return Err(SarissaError::malformed_query(format!(
                    "Unknown spatial option '{key}'; field names are given inline as \
                     'lat_field:LAT,lng_field:LNG'"
                )));
            }
        }

        let captures = COORDINATES.captures(raw.trim()).ok_or_else(|| {
            SarissaError::malformed_query(format!(
                "Spatial queries should be of the format [field:]LAT,[field:]LNG, got '{raw}'"
            ))
        })?;

        let lat = parse_coordinate(&captures[2])?;
        let lng = parse_coordinate(&captures[4])?;
        let lat_field = captures
            .get(1)
            .map_or_else(|| self.default_lat_field.clone(), |m| m.as_str().to_string());
        let lng_field = captures
            .get(3)
            .map_or_else(|| self.default_lng_field.clone(), |m| m.as_str().to_string());

        Ok(SpatialRequest {
            lat_field,
            lng_field,
            center: GeoPoint::new(lat, lng)?,
            radius_miles: parse_radius(options.get(RADIUS))?,
            want_sort: parse_sort(options.get(SORT))?,
        })
    }
}

fn parse_coordinate(text: &str) -> Result<f64> {
    text.parse()
        .map_err(|_| SarissaError::malformed_query(format!("Invalid coordinate '{text}'")))
}

fn parse_radius(value: Option<&str>) -> Result<Option<f64>> {
    let Some(value) = value else {
        return Ok(None);
    };
    match value.trim().parse::<f64>() {
        Ok(radius) if radius >= 0.0 => Ok(Some(radius)),
        _ => Err(SarissaError::malformed_query(format!(
            "Radius must be a non-negative number of miles, got '{value}'"
        ))),
    }
}

fn parse_sort(value: Option<&str>) -> Result<bool> {
    match value {
        None => Ok(false),
        Some(value) => parse_bool(value).ok_or_else(|| {
            SarissaError::malformed_query(format!("Sort must be true or false, got '{value}'"))
        }),
    }
}
