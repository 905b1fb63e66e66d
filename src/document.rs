//! Document module for schema-light indexing.
//!
//! Documents are flexible collections of field-value pairs. Coordinates are
//! ordinary numeric fields (by default `lat` and `lng`); nothing about a
//! document is spatial until a spatial query reads those fields back.
//!
//! # Core Components
//!
//! - [`document::Document`] - The main document structure with field-value pairs
//! - [`field_value::FieldValue`] - Enum representing different field value types
//! - [`parser::DocumentParser`] - Reads JSON / JSON Lines into documents
//!
//! # Examples
//!
//! ```
//! use sarissa_spatial::document::Document;
//!
//! let doc = Document::builder()
//!     .add_text("id", "1")
//!     .add_text("name", "New York")
//!     .add_float("rating", 4.0)
//!     .add_float("lat", 40.7142691)
//!     .add_float("lng", -74.0059729)
//!     .build();
//!
//! assert_eq!(doc.len(), 5);
//! assert_eq!(doc.get_f64("lat"), Some(40.7142691));
//! ```

#[allow(clippy::module_inception)]
pub mod document;
pub mod field_value;
pub mod parser;

pub use document::{Document, DocumentBuilder};
pub use field_value::FieldValue;
pub use parser::DocumentParser;
