//! Index reader for searching and retrieving documents.

use std::fmt::Debug;
use std::sync::Arc;

use ahash::AHashMap;

use crate::document::{Document, FieldValue};
use crate::index::DocId;
use crate::query::DocSet;
use crate::schema::Schema;

/// Read-only access to one committed index snapshot.
///
/// `field_f64` is the per-document scalar lookup the spatial filters use;
/// it never fails, it only reports absence.
pub trait IndexReader: Send + Sync + Debug {
    /// Exclusive upper bound of document ids in this snapshot.
    fn max_doc(&self) -> DocId;

    /// Number of live (non-deleted) documents.
    fn num_docs(&self) -> usize;

    /// Check if a document is deleted.
    fn is_deleted(&self, doc_id: DocId) -> bool;

    /// Get a stored document by id.
    fn document(&self, doc_id: DocId) -> Option<&Document>;

    /// Get the schema for this reader.
    fn schema(&self) -> &Schema;

    /// Snapshot generation; changes on every commit.
    fn generation(&self) -> u64;

    /// Tokenized terms of a text field, if the field was analyzed.
    fn terms(&self, doc_id: DocId, field: &str) -> Option<&[String]>;

    /// Get a raw stored field value.
    fn field_value(&self, doc_id: DocId, field: &str) -> Option<&FieldValue> {
        self.document(doc_id).and_then(|doc| doc.get_field(field))
    }

    /// Get a field as a finite float.
    fn field_f64(&self, doc_id: DocId, field: &str) -> Option<f64> {
        self.field_value(doc_id, field).and_then(FieldValue::as_f64)
    }

    /// External unique key of a document.
    fn unique_key(&self, doc_id: DocId) -> Option<String> {
        let key_field = self.schema().unique_key();
        match self.field_value(doc_id, key_field)? {
            FieldValue::Null => None,
            value => Some(value.to_string()),
        }
    }

    /// All live documents.
    fn live_docs(&self) -> DocSet {
        let mut docs = DocSet::empty(self.max_doc());
        for doc_id in 0..self.max_doc() {
            if !self.is_deleted(doc_id) {
                docs.insert(doc_id);
            }
        }
        docs
    }
}

/// A stored document together with its analyzed text fields.
#[derive(Debug)]
pub(crate) struct StoredDocument {
    pub(crate) document: Document,
    pub(crate) terms: AHashMap<String, Vec<String>>,
}

/// Immutable snapshot produced by [`MemoryIndex::commit`](crate::index::MemoryIndex::commit).
#[derive(Debug)]
pub struct MemoryIndexReader {
    schema: Arc<Schema>,
    docs: Vec<Option<Arc<StoredDocument>>>,
    num_docs: usize,
    generation: u64,
}

impl MemoryIndexReader {
    pub(crate) fn new(
        schema: Arc<Schema>,
        docs: Vec<Option<Arc<StoredDocument>>>,
        generation: u64,
    ) -> Self {
        let num_docs = docs.iter().filter(|d| d.is_some()).count();
        MemoryIndexReader {
            schema,
            docs,
            num_docs,
            generation,
        }
    }

    /// Find the internal id of the live document with the given unique key.
    pub fn doc_id_for_key(&self, key: &str) -> Option<DocId> {
        (0..self.max_doc()).find(|&doc_id| self.unique_key(doc_id).as_deref() == Some(key))
    }

    pub(crate) fn stored_arc(&self, doc_id: DocId) -> Option<Arc<StoredDocument>> {
        self.docs.get(doc_id as usize)?.clone()
    }

    fn stored(&self, doc_id: DocId) -> Option<&StoredDocument> {
        self.docs.get(doc_id as usize)?.as_deref()
    }
}

impl IndexReader for MemoryIndexReader {
    fn max_doc(&self) -> DocId {
        self.docs.len() as DocId
    }

    fn num_docs(&self) -> usize {
        self.num_docs
    }

    fn is_deleted(&self, doc_id: DocId) -> bool {
        self.stored(doc_id).is_none()
    }

    fn document(&self, doc_id: DocId) -> Option<&Document> {
        self.stored(doc_id).map(|stored| &stored.document)
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn generation(&self) -> u64 {
        self.generation
    }

    fn terms(&self, doc_id: DocId, field: &str) -> Option<&[String]> {
        self.stored(doc_id)?.terms.get(field).map(|t| t.as_slice())
    }
}
