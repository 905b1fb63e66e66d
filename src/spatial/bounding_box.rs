//! Rectangular pre-filter around a centerpoint.

use std::sync::Arc;

use crate::error::Result;
use crate::query::{BooleanFilter, Bound, NumericRangeFilter};
use crate::schema::Schema;
use crate::spatial::geo::{EARTH_RADIUS_MILES, GeoPoint, MILES_PER_DEGREE_LATITUDE};

/// An axis-aligned latitude/longitude rectangle.
///
/// Built around a centerpoint so that every point within the radius lies
/// inside it. It does not wrap across the antimeridian; a box reaching past
/// it is widened to the full longitude range instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Southern edge.
    pub lat_low: f64,
    /// Northern edge.
    pub lat_high: f64,
    /// Western edge.
    pub lng_low: f64,
    /// Eastern edge.
    pub lng_high: f64,
}

impl BoundingBox {
    /// The box enclosing the circle of `radius_miles` around `center`.
    ///
    /// The longitude half-width is the circle's exact east-west extent,
    /// `asin(sin δ / cos φ)` for angular radius `δ`, or the flat
    /// `r / (69.047 · cos φ)` widening when that is larger. A circle
    /// reaching a pole spans every longitude.
    pub fn around(center: GeoPoint, radius_miles: f64) -> Self {
        let radius_miles = radius_miles.abs();
        let lat_radius = radius_miles / MILES_PER_DEGREE_LATITUDE;
        let lat_low = center.lat - lat_radius;
        let lat_high = center.lat + lat_radius;

        let (lng_low, lng_high) = match Self::lng_radius(center, radius_miles, lat_low, lat_high) {
            Some(lng_radius)
                if center.lng - lng_radius >= -180.0 && center.lng + lng_radius <= 180.0 =>
            {
                (center.lng - lng_radius, center.lng + lng_radius)
            }
            _ => (-180.0, 180.0),
        };

        BoundingBox {
            lat_low: lat_low.max(-90.0),
            lat_high: lat_high.min(90.0),
            lng_low,
            lng_high,
        }
    }

    /// Longitude half-width in degrees, or `None` when the circle spans
    /// every longitude.
    fn lng_radius(center: GeoPoint, radius_miles: f64, lat_low: f64, lat_high: f64) -> Option<f64> {
        if lat_low <= -90.0 || lat_high >= 90.0 {
            return None;
        }
        let cos_lat = center.lat.to_radians().cos();
        let angular = radius_miles / EARTH_RADIUS_MILES;
        let ratio = angular.sin() / cos_lat;
        if ratio >= 1.0 {
            return None;
        }
        let exact = ratio.asin().to_degrees();
        let flat = radius_miles / (MILES_PER_DEGREE_LATITUDE * cos_lat);
        let lng_radius = exact.max(flat);
        (lng_radius.is_finite() && lng_radius < 180.0).then_some(lng_radius)
    }

    /// Check if a point lies inside the box, edges included.
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        (self.lat_low..=self.lat_high).contains(&lat) && (self.lng_low..=self.lng_high).contains(&lng)
    }
}

/// Builds the bounding-box filter for a spatial request.
#[derive(Debug, Clone, Copy)]
pub struct BoundingBoxBuilder<'a> {
    schema: &'a Schema,
}

impl<'a> BoundingBoxBuilder<'a> {
    /// Create a builder that checks field encodings against `schema`.
    pub fn new(schema: &'a Schema) -> Self {
        BoundingBoxBuilder { schema }
    }

    /// Two inclusive range filters, one per coordinate field, ANDed.
    ///
    /// Fails with [`SarissaError::UnsupportedFieldEncoding`](crate::error::SarissaError::UnsupportedFieldEncoding)
    /// if either field cannot be range-filtered.
    pub fn build(
        &self,
        center: GeoPoint,
        radius_miles: f64,
        lat_field: &str,
        lng_field: &str,
    ) -> Result<BooleanFilter> {
        let bbox = BoundingBox::around(center, radius_miles);
        let lat = NumericRangeFilter::for_schema(
            self.schema,
            lat_field,
            Bound::Included(bbox.lat_low),
            Bound::Included(bbox.lat_high),
        )?;
        let lng = NumericRangeFilter::for_schema(
            self.schema,
            lng_field,
            Bound::Included(bbox.lng_low),
            Bound::Included(bbox.lng_high),
        )?;
        Ok(BooleanFilter::new().must(Arc::new(lat)).must(Arc::new(lng)))
    }
}
