//! Field type definitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::document::FieldValue;
use crate::error::{Result, SarissaError};

/// How a field is indexed and which predicates it supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Tokenized text, searchable by [`TextQuery`](crate::query::TextQuery).
    Text,
    /// Exact-match string (identifiers, keywords).
    String,
    /// 64-bit float; supports range predicates.
    Float,
    /// 64-bit integer; supports range predicates.
    Integer,
    /// Boolean flag.
    Boolean,
}

impl FieldType {
    /// Whether a numeric range predicate can be built on this field.
    pub fn supports_range(&self) -> bool {
        matches!(self, FieldType::Float | FieldType::Integer)
    }

    /// Whether values are split into words at index time.
    pub fn is_tokenized(&self) -> bool {
        matches!(self, FieldType::Text)
    }

    /// Convert a raw value into this field's representation.
    ///
    /// Values that cannot be converted are returned unchanged; a malformed
    /// value is a per-document data problem, handled where it is read.
    pub fn coerce(&self, value: FieldValue) -> FieldValue {
        match (self, &value) {
            (FieldType::Float, FieldValue::Integer(_) | FieldValue::Text(_)) => {
                value.as_f64().map(FieldValue::Float).unwrap_or(value)
            }
            (FieldType::Integer, FieldValue::Text(s)) => s
                .trim()
                .parse::<i64>()
                .map(FieldValue::Integer)
                .unwrap_or(value),
            (FieldType::Boolean, FieldValue::Text(_) | FieldValue::Integer(_)) => value
                .as_boolean()
                .map(FieldValue::Boolean)
                .unwrap_or(value),
            (FieldType::Text | FieldType::String, FieldValue::Integer(_) | FieldValue::Float(_)) => {
                FieldValue::Text(value.to_string())
            }
            _ => value,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Text => "text",
            FieldType::String => "string",
            FieldType::Float => "float",
            FieldType::Integer => "integer",
            FieldType::Boolean => "boolean",
        };
        write!(f, "{name}")
    }
}

impl FromStr for FieldType {
    type Err = SarissaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(FieldType::Text),
            "string" | "keyword" => Ok(FieldType::String),
            "float" | "double" => Ok(FieldType::Float),
            "integer" | "int" | "long" => Ok(FieldType::Integer),
            "boolean" | "bool" => Ok(FieldType::Boolean),
            other => Err(SarissaError::schema(format!("Unknown field type: {other}"))),
        }
    }
}
