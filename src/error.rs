//! Error types for the Sarissa spatial library.
//!
//! All errors are represented by the [`SarissaError`] enum. Spatial queries
//! distinguish three failure classes:
//!
//! - [`SarissaError::MalformedQuerySyntax`]: the request text does not match
//!   the expected grammar. The query is rejected as a bad request.
//! - [`SarissaError::MissingCoordinateField`]: a candidate document lacks a
//!   usable coordinate. This is recovered by excluding the document and is
//!   never returned from a search.
//! - [`SarissaError::UnsupportedFieldEncoding`]: a range predicate cannot be
//!   built on the configured coordinate field. The query is aborted.
//!
//! # Examples
//!
//! ```
//! use sarissa_spatial::error::{Result, SarissaError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(SarissaError::malformed_query("Spatial queries should be of the format LAT,LNG"))
//! }
//!
//! let err = example_operation().unwrap_err();
//! assert!(err.is_bad_request());
//! ```

use std::io;

use thiserror::Error;

use crate::index::DocId;

/// The main error type for Sarissa operations.
#[derive(Error, Debug)]
pub enum SarissaError {
    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Index-related errors
    #[error("Index error: {0}")]
    Index(String),

    /// Schema-related errors
    #[error("Schema error: {0}")]
    Schema(String),

    /// Query-related errors (parsing, invalid queries, etc.)
    #[error("Query error: {0}")]
    Query(String),

    /// Field-related errors
    #[error("Field error: {0}")]
    Field(String),

    /// User input does not match the query grammar.
    #[error("Malformed query syntax: {0}")]
    MalformedQuerySyntax(String),

    /// A candidate document lacks a required coordinate field.
    #[error("Document {doc_id} has no usable value for field '{field}'")]
    MissingCoordinateField {
        /// Internal document id.
        doc_id: DocId,
        /// The coordinate field that could not be read.
        field: String,
    },

    /// A range predicate cannot be built on the given field.
    #[error("Unsupported field encoding for '{field}': {reason}")]
    UnsupportedFieldEncoding {
        /// Field name.
        field: String,
        /// Why the field cannot carry a range predicate.
        reason: String,
    },

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with SarissaError.
pub type Result<T> = std::result::Result<T, SarissaError>;

impl SarissaError {
    /// Create a new index error.
    pub fn index<S: Into<String>>(msg: S) -> Self {
        SarissaError::Index(msg.into())
    }

    /// Create a new schema error.
    pub fn schema<S: Into<String>>(msg: S) -> Self {
        SarissaError::Schema(msg.into())
    }

    /// Create a new query error.
    pub fn query<S: Into<String>>(msg: S) -> Self {
        SarissaError::Query(msg.into())
    }

    /// Create a new field error.
    pub fn field<S: Into<String>>(msg: S) -> Self {
        SarissaError::Field(msg.into())
    }

    /// Create a new malformed query syntax error.
    pub fn malformed_query<S: Into<String>>(msg: S) -> Self {
        SarissaError::MalformedQuerySyntax(msg.into())
    }

    /// Create a new missing coordinate field error.
    pub fn missing_coordinate<S: Into<String>>(doc_id: DocId, field: S) -> Self {
        SarissaError::MissingCoordinateField {
            doc_id,
            field: field.into(),
        }
    }

    /// Create a new unsupported field encoding error.
    pub fn unsupported_encoding<F: Into<String>, R: Into<String>>(field: F, reason: R) -> Self {
        SarissaError::UnsupportedFieldEncoding {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SarissaError::Other(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        SarissaError::Other(format!("Invalid argument: {}", msg.into()))
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        SarissaError::Other(format!("Invalid configuration: {}", msg.into()))
    }

    /// Whether this error was caused by the request itself rather than by
    /// the index or the environment.
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            SarissaError::MalformedQuerySyntax(_) | SarissaError::Query(_)
        )
    }
}
