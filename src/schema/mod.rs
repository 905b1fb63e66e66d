//! Schema module for Sarissa.
//!
//! The schema declares field types and the unique-key field. It is the
//! field-type introspection the query layer consults before it builds a
//! range predicate on a field.

pub mod field;
#[allow(clippy::module_inception)]
pub mod schema;

pub use field::FieldType;
pub use schema::{Schema, SchemaBuilder};
