//! Search responses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::index::DocId;

/// One returned document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Internal document id within the searched snapshot.
    pub doc_id: DocId,
    /// Unique key of the document.
    pub key: Option<String>,
    /// Relevance score.
    pub score: f32,
    /// Stored fields.
    pub document: Document,
}

/// Result of a search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Hits of the requested page, in sort order.
    pub hits: Vec<SearchHit>,
    /// Number of documents matching the request before pagination.
    pub total_hits: usize,
    /// Offset of the first hit.
    pub start: usize,
    /// Named blocks added by search components.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sections: BTreeMap<String, serde_json::Value>,
}

impl SearchResponse {
    /// Add or replace a named block.
    pub fn add_section<S: Into<String>>(&mut self, name: S, value: serde_json::Value) {
        self.sections.insert(name.into(), value);
    }

    /// Get a named block.
    pub fn section(&self, name: &str) -> Option<&serde_json::Value> {
        self.sections.get(name)
    }

    /// Unique keys of the hits, in order.
    pub fn keys(&self) -> Vec<&str> {
        self.hits.iter().filter_map(|hit| hit.key.as_deref()).collect()
    }

    /// Internal ids of the hits, in order.
    pub fn doc_ids(&self) -> Vec<DocId> {
        self.hits.iter().map(|hit| hit.doc_id).collect()
    }
}
