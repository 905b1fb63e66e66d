//! Geospatial search: radius filtering, distance ordering and distance
//! reporting over documents with latitude and longitude fields.
//!
//! A request carries a spatial expression in one parameter:
//!
//! ```text
//! spatial={!radius=10 sort=true}40.7142691,-74.0059729
//! ```
//!
//! [`SpatialComponent`] parses it, builds a [`BoundingBox`] pre-filter
//! wrapped in a [`DistanceFilter`], merges distance ordering into the sort
//! with [`SortMerger`], and adds a `distances` block for the returned page
//! with [`DistanceReporter`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use sarissa_spatial::prelude::*;
//!
//! # fn main() -> sarissa_spatial::error::Result<()> {
//! let schema = Schema::builder()
//!     .field("id", FieldType::String)
//!     .field("lat", FieldType::Float)
//!     .field("lng", FieldType::Float)
//!     .build()?;
//! let mut engine = SearchEngine::new(schema, EngineConfig::default())
//!     .with_component(Arc::new(SpatialComponent::default()));
//!
//! engine.add_document(
//!     Document::builder()
//!         .add_text("id", "brooklyn")
//!         .add_location("lat", "lng", 40.6501037, -73.9495823)
//!         .build(),
//! )?;
//! engine.commit()?;
//!
//! let request = SearchRequest::new()
//!     .with_param("spatial", "{!radius=10 sort=true}40.7142691,-74.0059729");
//! let response = engine.search(&request)?;
//! assert_eq!(response.keys(), vec!["brooklyn"]);
//! assert!(response.section("distances").is_some());
//! # Ok(())
//! # }
//! ```

pub mod bounding_box;
pub mod component;
pub mod config;
pub mod distance;
pub mod geo;
pub mod parser;
pub mod report;
pub mod sort;

pub use bounding_box::{BoundingBox, BoundingBoxBuilder};
pub use component::{SpatialComponent, SpatialExecution};
pub use config::SpatialConfig;
pub use distance::{DistanceFilter, DistanceMap};
pub use geo::{EARTH_RADIUS_MILES, GeoPoint, MILES_PER_DEGREE_LATITUDE, haversine_miles};
pub use parser::{SpatialQueryParser, SpatialRequest};
pub use report::{DistanceReporter, DistanceTable};
pub use sort::{DISTANCE_SORT_KEY, DistanceComparator, SortMerger};
