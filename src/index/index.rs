//! In-memory index with commit generations.

use std::sync::Arc;

use ahash::AHashMap;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::analysis::UnicodeWordTokenizer;
use crate::document::Document;
use crate::error::{Result, SarissaError};
use crate::index::reader::{IndexReader, MemoryIndexReader, StoredDocument};
use crate::schema::Schema;

/// Summary statistics for an index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Live documents in the committed snapshot.
    pub doc_count: usize,
    /// Id slots, including deleted documents.
    pub max_doc: u32,
    /// Uncommitted additions.
    pub pending_docs: usize,
    /// Uncommitted deletions.
    pub pending_deletes: usize,
    /// Generation of the committed snapshot.
    pub generation: u64,
}

/// An index held entirely in memory.
///
/// Added and deleted documents become visible only after [`commit`](Self::commit).
/// Adding a document whose unique key already exists replaces the old one.
#[derive(Debug)]
pub struct MemoryIndex {
    schema: Arc<Schema>,
    tokenizer: UnicodeWordTokenizer,
    committed: Arc<MemoryIndexReader>,
    pending_docs: Vec<Document>,
    pending_deletes: Vec<String>,
}

impl MemoryIndex {
    /// Create an empty index for the given schema.
    pub fn new(schema: Schema) -> Self {
        let schema = Arc::new(schema);
        MemoryIndex {
            committed: Arc::new(MemoryIndexReader::new(schema.clone(), Vec::new(), 0)),
            schema,
            tokenizer: UnicodeWordTokenizer::new(),
            pending_docs: Vec::new(),
            pending_deletes: Vec::new(),
        }
    }

    /// The index schema.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Stage a document for the next commit.
    pub fn add_document(&mut self, doc: Document) -> Result<()> {
        let key_field = self.schema.unique_key();
        if !doc.has_field(key_field) {
            return Err(SarissaError::index(format!(
                "Document is missing unique key field '{key_field}'"
            )));
        }
        self.pending_docs.push(self.schema.coerce(doc));
        Ok(())
    }

    /// Stage multiple documents for the next commit.
    pub fn add_documents<I: IntoIterator<Item = Document>>(&mut self, docs: I) -> Result<()> {
        for doc in docs {
            self.add_document(doc)?;
        }
        Ok(())
    }

    /// Stage the deletion of the document with the given unique key.
    pub fn delete_by_key<S: Into<String>>(&mut self, key: S) {
        self.pending_deletes.push(key.into());
    }

    /// Stage the deletion of every document.
    pub fn delete_all(&mut self) {
        self.pending_docs.clear();
        self.pending_deletes.clear();
        for doc_id in 0..self.committed.max_doc() {
            if let Some(key) = self.committed.unique_key(doc_id) {
                self.pending_deletes.push(key);
            }
        }
    }

    /// Publish pending changes as a new reader snapshot.
    pub fn commit(&mut self) -> Result<()> {
        if self.pending_docs.is_empty() && self.pending_deletes.is_empty() {
            return Ok(());
        }

        let mut docs: Vec<Option<Arc<StoredDocument>>> = (0..self.committed.max_doc())
            .map(|doc_id| self.committed_stored(doc_id))
            .collect();
        let mut by_key: AHashMap<String, usize> = AHashMap::new();
        for (slot, stored) in docs.iter().enumerate() {
            if let Some(key) = stored.as_ref().and_then(|s| self.key_of(&s.document)) {
                by_key.insert(key, slot);
            }
        }

        for key in self.pending_deletes.drain(..) {
            if let Some(slot) = by_key.remove(&key) {
                docs[slot] = None;
            }
        }

        let added = self.pending_docs.len();
        for doc in std::mem::take(&mut self.pending_docs) {
            let key = self.key_of(&doc);
            let stored = Arc::new(self.analyze(doc));
            if let Some(slot) = key.as_ref().and_then(|k| by_key.get(k)) {
                docs[*slot] = None;
            }
            if let Some(key) = key {
                by_key.insert(key, docs.len());
            }
            docs.push(Some(stored));
        }

        let generation = self.committed.generation() + 1;
        self.committed = Arc::new(MemoryIndexReader::new(self.schema.clone(), docs, generation));
        info!(
            "Committed generation {generation}: {added} added, {} live documents",
            self.committed.num_docs()
        );
        Ok(())
    }

    /// The latest committed snapshot.
    pub fn reader(&self) -> Arc<MemoryIndexReader> {
        self.committed.clone()
    }

    /// Get index statistics.
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            doc_count: self.committed.num_docs(),
            max_doc: self.committed.max_doc(),
            pending_docs: self.pending_docs.len(),
            pending_deletes: self.pending_deletes.len(),
            generation: self.committed.generation(),
        }
    }

    fn committed_stored(&self, doc_id: u32) -> Option<Arc<StoredDocument>> {
        if self.committed.is_deleted(doc_id) {
            return None;
        }
        self.committed.stored_arc(doc_id)
    }

    fn key_of(&self, doc: &Document) -> Option<String> {
        doc.get_field(self.schema.unique_key()).map(|v| v.to_string())
    }

    fn analyze(&self, document: Document) -> StoredDocument {
        let mut terms = AHashMap::new();
        for field in self.schema.text_fields() {
            if let Some(text) = document.get_field(field).and_then(|v| v.as_text()) {
                terms.insert(field.to_string(), self.tokenizer.tokenize(text));
            }
        }
        debug!("Analyzed {} text fields", terms.len());
        StoredDocument { document, terms }
    }
}
