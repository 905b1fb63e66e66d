//! Exact-value filter on a single field.

use std::any::Any;

use crate::analysis::UnicodeWordTokenizer;
use crate::document::field_value::parse_bool;
use crate::error::Result;
use crate::index::{DocId, IndexReader};
use crate::query::doc_set::DocSet;
use crate::query::filter::{Filter, FilterContext};
use crate::schema::FieldType;

/// A filter matching `field:value`.
///
/// The comparison follows the field type: numeric fields compare as
/// numbers (`rating:4` matches `4.0`), text fields require every word of
/// the value to occur in the field, other fields compare exact strings.
#[derive(Debug, Clone, PartialEq)]
pub struct TermFilter {
    field: String,
    value: String,
}

impl TermFilter {
    /// Create a new term filter.
    pub fn new<F: Into<String>, V: Into<String>>(field: F, value: V) -> Self {
        TermFilter {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Get the field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Get the value.
    pub fn value(&self) -> &str {
        &self.value
    }

    fn matches(&self, reader: &dyn IndexReader, doc_id: DocId, words: &[String]) -> bool {
        match reader.schema().field_type(&self.field) {
            Some(FieldType::Float | FieldType::Integer) => {
                match (reader.field_f64(doc_id, &self.field), self.value.trim().parse::<f64>()) {
                    (Some(stored), Ok(wanted)) => stored == wanted,
                    _ => false,
                }
            }
            Some(FieldType::Text) => reader
                .terms(doc_id, &self.field)
                .is_some_and(|terms| words.iter().all(|w| terms.contains(w))),
            Some(FieldType::Boolean) => {
                let stored = reader
                    .field_value(doc_id, &self.field)
                    .and_then(|v| v.as_boolean());
                stored.is_some() && stored == parse_bool(&self.value)
            }
            Some(FieldType::String) | None => reader
                .field_value(doc_id, &self.field)
                .is_some_and(|v| v.to_string() == self.value),
        }
    }
}

impl Filter for TermFilter {
    fn evaluate(&self, ctx: &FilterContext<'_>, candidates: &DocSet) -> Result<DocSet> {
        let reader = ctx.reader();
        let words = UnicodeWordTokenizer::new().tokenize(&self.value);
        let mut accepted = DocSet::empty(candidates.max_doc());
        for doc_id in candidates.iter() {
            if self.matches(reader, doc_id, &words) {
                accepted.insert(doc_id);
            }
        }
        Ok(accepted)
    }

    fn cache_key(&self) -> Option<String> {
        Some(format!("{}:{}", self.field, self.value))
    }

    fn description(&self) -> String {
        format!("TermFilter(field:{}, value:{})", self.field, self.value)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
