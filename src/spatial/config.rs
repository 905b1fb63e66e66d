//! Spatial component settings.

use serde::{Deserialize, Serialize};

/// Settings for [`SpatialComponent`](crate::spatial::SpatialComponent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpatialConfig {
    /// Request parameter carrying the spatial expression.
    pub param_name: String,
    /// Name of the response block holding per-hit distances.
    pub response_key: String,
    /// Latitude field used when the expression has no `field:` prefix.
    pub default_lat_field: String,
    /// Longitude field used when the expression has no `field:` prefix.
    pub default_lng_field: String,
}

impl Default for SpatialConfig {
    fn default() -> Self {
        SpatialConfig {
            param_name: "spatial".to_string(),
            response_key: "distances".to_string(),
            default_lat_field: "lat".to_string(),
            default_lng_field: "lng".to_string(),
        }
    }
}
