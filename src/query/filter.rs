//! Filter abstraction and basic filters.
//!
//! A [`Filter`] narrows a candidate [`DocSet`] to the documents it accepts.
//! Filters compose by AND through [`BooleanFilter`]; the search pipeline
//! intersects each request filter with the running candidate set.

use std::any::Any;
use std::fmt::{self, Debug};
use std::sync::Arc;

use uuid::Uuid;

use crate::error::Result;
use crate::index::IndexReader;
use crate::query::doc_set::DocSet;

/// Identifies one physical execution of a search request.
///
/// Two executions of the same request, even against the same snapshot,
/// never share an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExecutionId(Uuid);

impl ExecutionId {
    /// Allocate a fresh execution id.
    pub fn new() -> Self {
        ExecutionId(Uuid::new_v4())
    }
}

impl Default for ExecutionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a filter sees while it is evaluated.
#[derive(Clone, Copy)]
pub struct FilterContext<'a> {
    reader: &'a dyn IndexReader,
    execution: ExecutionId,
}

impl<'a> FilterContext<'a> {
    /// Create a context for one execution against one reader.
    pub fn new(reader: &'a dyn IndexReader, execution: ExecutionId) -> Self {
        FilterContext { reader, execution }
    }

    /// The snapshot being searched.
    pub fn reader(&self) -> &'a dyn IndexReader {
        self.reader
    }

    /// The execution this evaluation belongs to.
    pub fn execution(&self) -> ExecutionId {
        self.execution
    }
}

impl Debug for FilterContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterContext")
            .field("generation", &self.reader.generation())
            .field("execution", &self.execution)
            .finish()
    }
}

/// Trait for document filters.
pub trait Filter: Send + Sync + Debug {
    /// Return the subset of `candidates` this filter accepts.
    fn evaluate(&self, ctx: &FilterContext<'_>, candidates: &DocSet) -> Result<DocSet>;

    /// Key under which results may be cached, or `None` if the filter's
    /// result must not be cached. Structurally identical filters must
    /// return identical keys.
    fn cache_key(&self) -> Option<String> {
        None
    }

    /// Get a human-readable description of this filter.
    fn description(&self) -> String;

    /// Get this filter as Any for downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// A filter that accepts every candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchAllFilter;

impl MatchAllFilter {
    /// Create a new match-all filter.
    pub fn new() -> Self {
        MatchAllFilter
    }
}

impl Filter for MatchAllFilter {
    fn evaluate(&self, _ctx: &FilterContext<'_>, candidates: &DocSet) -> Result<DocSet> {
        Ok(candidates.clone())
    }

    fn cache_key(&self) -> Option<String> {
        Some("*:*".to_string())
    }

    fn description(&self) -> String {
        "MatchAllFilter".to_string()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Conjunction of filters: a document passes iff every clause accepts it.
///
/// Clauses are evaluated in order, each against the survivors of the
/// previous one. An empty conjunction accepts everything.
#[derive(Debug, Clone, Default)]
pub struct BooleanFilter {
    must: Vec<Arc<dyn Filter>>,
}

impl BooleanFilter {
    /// Create an empty conjunction.
    pub fn new() -> Self {
        BooleanFilter { must: Vec::new() }
    }

    /// Add a required clause.
    pub fn must(mut self, filter: Arc<dyn Filter>) -> Self {
        self.must.push(filter);
        self
    }

    /// Add a required clause in place.
    pub fn add_must(&mut self, filter: Arc<dyn Filter>) {
        self.must.push(filter);
    }

    /// The required clauses.
    pub fn clauses(&self) -> &[Arc<dyn Filter>] {
        &self.must
    }
}

impl Filter for BooleanFilter {
    fn evaluate(&self, ctx: &FilterContext<'_>, candidates: &DocSet) -> Result<DocSet> {
        let mut survivors = candidates.clone();
        for clause in &self.must {
            if survivors.is_empty() {
                break;
            }
            survivors = clause.evaluate(ctx, &survivors)?;
        }
        Ok(survivors)
    }

    fn cache_key(&self) -> Option<String> {
        let keys = self
            .must
            .iter()
            .map(|clause| clause.cache_key())
            .collect::<Option<Vec<_>>>()?;
        Some(format!("+({})", keys.join(" AND ")))
    }

    fn description(&self) -> String {
        let clauses: Vec<String> = self.must.iter().map(|c| c.description()).collect();
        format!("BooleanFilter(must: [{}])", clauses.join(", "))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::index::MemoryIndex;
    use crate::query::range::NumericRangeFilter;
    use crate::schema::{FieldType, Schema};

    fn reader() -> Arc<crate::index::MemoryIndexReader> {
        let schema = Schema::builder()
            .field("id", FieldType::String)
            .field("rating", FieldType::Float)
            .build()
            .unwrap();
        let mut index = MemoryIndex::new(schema);
        for (id, rating) in [("1", 4.0), ("2", 5.0), ("3", 3.0)] {
            index
                .add_document(
                    Document::builder()
                        .add_text("id", id)
                        .add_float("rating", rating)
                        .build(),
                )
                .unwrap();
        }
        index.commit().unwrap();
        index.reader()
    }

    #[test]
    fn test_match_all() {
        let reader = reader();
        let ctx = FilterContext::new(reader.as_ref(), ExecutionId::new());
        let candidates = DocSet::from_ids(3, [0, 2]);
        let result = MatchAllFilter::new().evaluate(&ctx, &candidates).unwrap();
        assert_eq!(result, candidates);
    }

    #[test]
    fn test_boolean_and() {
        let reader = reader();
        let ctx = FilterContext::new(reader.as_ref(), ExecutionId::new());

        let filter = BooleanFilter::new()
            .must(Arc::new(NumericRangeFilter::inclusive("rating", 3.5, 6.0)))
            .must(Arc::new(NumericRangeFilter::inclusive("rating", 0.0, 4.5)));
        let result = filter.evaluate(&ctx, &reader.live_docs()).unwrap();
        assert_eq!(result.iter().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_boolean_cache_key() {
        let filter = BooleanFilter::new()
            .must(Arc::new(NumericRangeFilter::inclusive("lat", 1.0, 2.0)))
            .must(Arc::new(MatchAllFilter::new()));
        assert_eq!(
            filter.cache_key().as_deref(),
            Some("+(lat:[1 TO 2] AND *:*)")
        );
    }

    #[test]
    fn test_execution_ids_are_unique() {
        assert_ne!(ExecutionId::new(), ExecutionId::new());
    }
}
