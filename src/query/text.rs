//! Scored text queries.

use std::any::Any;
use std::collections::BTreeSet;
use std::fmt::Debug;

use crate::analysis::UnicodeWordTokenizer;
use crate::index::{DocId, IndexReader};

/// Trait for scored queries.
///
/// A query decides which documents match and how relevant each one is.
/// Filters run afterwards and never change scores.
pub trait Query: Send + Sync + Debug {
    /// Score a document, or `None` if it does not match.
    fn score(&self, reader: &dyn IndexReader, doc_id: DocId) -> Option<f32>;

    /// Get a human-readable description of this query.
    fn description(&self) -> String;

    /// Get this query as Any for downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// Matches every live document with a constant score of 1.0.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchAllQuery;

impl MatchAllQuery {
    /// Create a new match-all query.
    pub fn new() -> Self {
        MatchAllQuery
    }
}

impl Query for MatchAllQuery {
    fn score(&self, reader: &dyn IndexReader, doc_id: DocId) -> Option<f32> {
        (!reader.is_deleted(doc_id)).then_some(1.0)
    }

    fn description(&self) -> String {
        "MatchAllQuery".to_string()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A disjunction of words searched across several text fields.
///
/// A document matches when at least `min_should_match` distinct query
/// words occur in any of the fields. The score is the number of distinct
/// words matched, multiplied by the boost.
#[derive(Debug, Clone, PartialEq)]
pub struct TextQuery {
    fields: Vec<String>,
    terms: Vec<String>,
    min_should_match: usize,
    boost: f32,
}

impl TextQuery {
    /// Create a text query. The text is tokenized the same way text
    /// fields are at index time.
    pub fn new<S: AsRef<str>>(fields: Vec<String>, text: S) -> Self {
        let terms: BTreeSet<String> = UnicodeWordTokenizer::new()
            .tokenize(text.as_ref())
            .into_iter()
            .collect();
        TextQuery {
            fields,
            terms: terms.into_iter().collect(),
            min_should_match: 1,
            boost: 1.0,
        }
    }

    /// Require at least `n` distinct words to match. Values below one are
    /// treated as one.
    pub fn with_min_should_match(mut self, n: usize) -> Self {
        self.min_should_match = n.max(1);
        self
    }

    /// Set the boost factor.
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    /// The searched fields.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// The distinct query words, sorted.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// The minimum number of words that must match.
    pub fn min_should_match(&self) -> usize {
        self.min_should_match
    }

    fn matched_terms(&self, reader: &dyn IndexReader, doc_id: DocId) -> usize {
        self.terms
            .iter()
            .filter(|term| {
                self.fields.iter().any(|field| {
                    reader
                        .terms(doc_id, field)
                        .is_some_and(|doc_terms| doc_terms.contains(term))
                })
            })
            .count()
    }
}

impl Query for TextQuery {
    fn score(&self, reader: &dyn IndexReader, doc_id: DocId) -> Option<f32> {
        if self.terms.is_empty() || reader.is_deleted(doc_id) {
            return None;
        }
        let matched = self.matched_terms(reader, doc_id);
        (matched >= self.min_should_match).then(|| matched as f32 * self.boost)
    }

    fn description(&self) -> String {
        format!(
            "TextQuery(fields:{:?}, terms:{:?}, mm:{})",
            self.fields, self.terms, self.min_should_match
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
