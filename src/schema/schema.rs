//! Schema management for document structure definition.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::document::{Document, FieldValue};
use crate::error::{Result, SarissaError};
use crate::schema::field::FieldType;

fn default_unique_key() -> String {
    "id".to_string()
}

/// A schema defines the field types of an index and its unique-key field.
///
/// The JSON form is
/// `{"unique_key": "id", "fields": {"name_t": "text", "lat": "float"}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Name of the field holding each document's external identifier.
    #[serde(default = "default_unique_key")]
    unique_key: String,
    /// Map of field names to their types.
    #[serde(default)]
    fields: BTreeMap<String, FieldType>,
}

impl Schema {
    /// Create a new empty schema with `id` as unique key.
    pub fn new() -> Self {
        Schema {
            unique_key: default_unique_key(),
            fields: BTreeMap::new(),
        }
    }

    /// Start building a schema.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Add a field to the schema.
    pub fn add_field<S: Into<String>>(&mut self, name: S, field_type: FieldType) -> Result<()> {
        let name = name.into();

        if name.is_empty() {
            return Err(SarissaError::schema("Field name cannot be empty"));
        }
        if self.fields.contains_key(&name) {
            return Err(SarissaError::schema(format!(
                "Field '{name}' already exists"
            )));
        }

        self.fields.insert(name, field_type);
        Ok(())
    }

    /// Get a field type by name.
    pub fn field_type(&self, name: &str) -> Option<FieldType> {
        self.fields.get(name).copied()
    }

    /// Check if a field exists.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Name of the unique-key field.
    pub fn unique_key(&self) -> &str {
        &self.unique_key
    }

    /// All declared fields, ordered by name.
    pub fn fields(&self) -> &BTreeMap<String, FieldType> {
        &self.fields
    }

    /// Get the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the schema is empty.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Names of all tokenized text fields.
    pub fn text_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(_, field_type)| field_type.is_tokenized())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Verify that a range predicate can be built on `field`.
    ///
    /// Undeclared fields and non-numeric fields are rejected with
    /// [`SarissaError::UnsupportedFieldEncoding`].
    pub fn check_range_encoding(&self, field: &str) -> Result<FieldType> {
        match self.field_type(field) {
            Some(field_type) if field_type.supports_range() => Ok(field_type),
            Some(field_type) => Err(SarissaError::unsupported_encoding(
                field,
                format!("{field_type} fields cannot carry a numeric range"),
            )),
            None => Err(SarissaError::unsupported_encoding(
                field,
                "field is not defined in the schema",
            )),
        }
    }

    /// Convert a document's values to the declared field types.
    pub fn coerce(&self, document: Document) -> Document {
        let mut coerced = Document::new();
        for (name, value) in document.fields() {
            let value = match self.field_type(name) {
                Some(field_type) => field_type.coerce(value.clone()),
                None => value.clone(),
            };
            coerced.add_field(name.clone(), value);
        }
        coerced
    }

    /// Infer a schema from sample documents.
    ///
    /// A field whose every non-null value reads as a number becomes `Float`
    /// (or `Integer` when all values are integers); the unique key becomes
    /// `String`; anything else becomes `Text`.
    pub fn infer<'a, I>(documents: I) -> Self
    where
        I: IntoIterator<Item = &'a Document>,
    {
        let mut inferred: BTreeMap<String, FieldType> = BTreeMap::new();
        let unique_key = default_unique_key();

        for doc in documents {
            for (name, value) in doc.fields() {
                if matches!(value, FieldValue::Null) {
                    continue;
                }
                let observed = match value {
                    FieldValue::Integer(_) => FieldType::Integer,
                    FieldValue::Float(_) => FieldType::Float,
                    FieldValue::Boolean(_) => FieldType::Boolean,
                    FieldValue::Text(_) if value.as_f64().is_some() => FieldType::Float,
                    _ => FieldType::Text,
                };
                let merged = match (inferred.get(name), observed) {
                    (None, t) => t,
                    (Some(a), b) if *a == b => b,
                    (Some(FieldType::Integer), FieldType::Float)
                    | (Some(FieldType::Float), FieldType::Integer) => FieldType::Float,
                    _ => FieldType::Text,
                };
                inferred.insert(name.clone(), merged);
            }
        }

        if inferred.contains_key(&unique_key) {
            inferred.insert(unique_key.clone(), FieldType::String);
        }

        Schema {
            unique_key,
            fields: inferred,
        }
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}

/// Fluent schema construction.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    unique_key: Option<String>,
    fields: Vec<(String, FieldType)>,
}

impl SchemaBuilder {
    /// Set the unique-key field name.
    pub fn unique_key<S: Into<String>>(mut self, name: S) -> Self {
        self.unique_key = Some(name.into());
        self
    }

    /// Declare a field.
    pub fn field<S: Into<String>>(mut self, name: S, field_type: FieldType) -> Self {
        self.fields.push((name.into(), field_type));
        self
    }

    /// Build the schema, rejecting duplicate or empty field names.
    pub fn build(self) -> Result<Schema> {
        let mut schema = Schema::new();
        if let Some(unique_key) = self.unique_key {
            schema.unique_key = unique_key;
        }
        for (name, field_type) in self.fields {
            schema.add_field(name, field_type)?;
        }
        Ok(schema)
    }
}
