//! # Sarissa Spatial
//!
//! Geospatial search for the Sarissa search engine.
//!
//! ## Features
//!
//! - Radius filtering with a bounding-box pre-filter and exact haversine check
//! - Distance ordering, alone or as the last tie-break of an explicit sort
//! - Per-hit distances in the response
//! - In-memory index with commit generations and a filter result cache
//! - Text queries, filter queries and multi-key sorts

pub mod analysis;
pub mod cli;
pub mod document;
pub mod error;
pub mod index;
pub mod query;
pub mod schema;
pub mod search;
pub mod spatial;

pub mod prelude {
    pub use crate::document::{Document, DocumentBuilder, DocumentParser, FieldValue};
    pub use crate::error::{Result, SarissaError};
    pub use crate::index::{DocId, IndexReader, MemoryIndex};
    pub use crate::query::{BooleanFilter, DocSet, Filter, NumericRangeFilter, TextQuery};
    pub use crate::schema::{FieldType, Schema};
    pub use crate::search::{
        EngineConfig, SearchEngine, SearchRequest, SearchResponse, SortOrder, SortSpec,
    };
    pub use crate::spatial::{
        DistanceFilter, DistanceMap, GeoPoint, SpatialComponent, SpatialConfig,
        SpatialQueryParser, SpatialRequest,
    };
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
