//! Document parser for reading JSON documents.
//!
//! Accepts either a single JSON object per line (JSON Lines) or a JSON array
//! of objects. When a [`Schema`] is attached, each parsed document is coerced
//! to the declared field types, so coordinates indexed as strings (for
//! example `"lat": "40.7142691"`) end up as floats.
//!
//! # Examples
//!
//! ```
//! use sarissa_spatial::document::DocumentParser;
//!
//! let input = r#"{"id": "1", "name": "New York", "lat": 40.7142691, "lng": -74.0059729}
//! {"id": "2", "name": "Brooklyn", "lat": 40.6501037, "lng": -73.9495823}"#;
//!
//! let docs = DocumentParser::new().parse_str(input).unwrap();
//! assert_eq!(docs.len(), 2);
//! ```

use std::io::BufRead;
use std::sync::Arc;

use log::debug;

use crate::document::document::Document;
use crate::error::{Result, SarissaError};
use crate::schema::Schema;

/// Parses JSON text into [`Document`]s.
#[derive(Debug, Clone, Default)]
pub struct DocumentParser {
    schema: Option<Arc<Schema>>,
}

impl DocumentParser {
    /// Create a parser that keeps values as they appear in the JSON.
    pub fn new() -> Self {
        DocumentParser { schema: None }
    }

    /// Create a parser that coerces values to the schema's field types.
    pub fn with_schema(schema: Arc<Schema>) -> Self {
        DocumentParser {
            schema: Some(schema),
        }
    }

    /// Parse a single JSON object.
    pub fn parse_line(&self, line: &str) -> Result<Document> {
        let document: Document = serde_json::from_str(line)?;
        Ok(self.finish(document))
    }

    /// Parse JSON Lines or a JSON array from a string.
    pub fn parse_str(&self, input: &str) -> Result<Vec<Document>> {
        if input.trim_start().starts_with('[') {
            let documents: Vec<Document> = serde_json::from_str(input)?;
            return Ok(documents.into_iter().map(|d| self.finish(d)).collect());
        }
        self.parse_reader(input.as_bytes())
    }

    /// Parse JSON Lines from a reader. Blank lines are skipped.
    pub fn parse_reader<R: BufRead>(&self, reader: R) -> Result<Vec<Document>> {
        let mut documents = Vec::new();
        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let document = self.parse_line(&line).map_err(|e| {
                SarissaError::invalid_argument(format!(
                    "Error parsing document on line {}: {e}",
                    line_num + 1
                ))
            })?;
            documents.push(document);
        }
        debug!("Parsed {} documents", documents.len());
        Ok(documents)
    }

    fn finish(&self, document: Document) -> Document {
        match &self.schema {
            Some(schema) => schema.coerce(document),
            None => document,
        }
    }
}
