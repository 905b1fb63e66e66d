//! Search engine combining an in-memory index with the search pipeline.

use std::cmp::Ordering;
use std::sync::Arc;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::Result;
use crate::index::{DocId, IndexReader, IndexStats, MemoryIndex, MemoryIndexReader};
use crate::query::{
    DocSet, Filter, FilterContext, FilterQueryParser, MatchAllQuery, Query, TextQuery,
};
use crate::schema::Schema;
use crate::search::cache::FilterCache;
use crate::search::component::{ComponentExecution, QueryContext, SearchComponent};
use crate::search::request::SearchRequest;
use crate::search::response::{SearchHit, SearchResponse};
use crate::search::sort::{SortKey, SortSpec, compare_field_values};

/// Engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Page size used when a request does not set `rows`.
    pub default_rows: usize,
    /// Maximum number of cached filter results.
    pub filter_cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            default_rows: 10,
            filter_cache_capacity: 512,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ScoredDoc {
    doc_id: DocId,
    score: f32,
}

/// A search engine over a [`MemoryIndex`].
///
/// Every call to [`search`](Self::search) is one physical execution with a
/// fresh [`ExecutionId`](crate::query::ExecutionId), even when an identical
/// request was just served. Filter results are cached per index generation.
#[derive(Debug)]
pub struct SearchEngine {
    config: EngineConfig,
    index: MemoryIndex,
    components: Vec<Arc<dyn SearchComponent>>,
    filter_cache: FilterCache,
}

impl SearchEngine {
    /// Create an engine with an empty index.
    pub fn new(schema: Schema, config: EngineConfig) -> Self {
        SearchEngine {
            filter_cache: FilterCache::new(config.filter_cache_capacity),
            index: MemoryIndex::new(schema),
            components: Vec::new(),
            config,
        }
    }

    /// Register a search component.
    pub fn with_component(mut self, component: Arc<dyn SearchComponent>) -> Self {
        self.add_component(component);
        self
    }

    /// Register a search component.
    pub fn add_component(&mut self, component: Arc<dyn SearchComponent>) {
        debug!("Registered search component '{}'", component.name());
        self.components.push(component);
    }

    /// Get the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get the index schema.
    pub fn schema(&self) -> &Arc<Schema> {
        self.index.schema()
    }

    /// Stage a document.
    pub fn add_document(&mut self, doc: Document) -> Result<()> {
        self.index.add_document(doc)
    }

    /// Stage multiple documents.
    pub fn add_documents<I: IntoIterator<Item = Document>>(&mut self, docs: I) -> Result<()> {
        self.index.add_documents(docs)
    }

    /// Stage a deletion by unique key.
    pub fn delete_by_key<S: Into<String>>(&mut self, key: S) {
        self.index.delete_by_key(key);
    }

    /// Stage the deletion of every document.
    pub fn delete_all(&mut self) {
        self.index.delete_all();
    }

    /// Publish staged changes.
    pub fn commit(&mut self) -> Result<()> {
        self.index.commit()
    }

    /// The latest committed snapshot.
    pub fn reader(&self) -> Arc<MemoryIndexReader> {
        self.index.reader()
    }

    /// Get index statistics.
    pub fn stats(&self) -> IndexStats {
        self.index.stats()
    }

    /// The filter result cache.
    pub fn filter_cache(&self) -> &FilterCache {
        &self.filter_cache
    }

    /// Execute a search.
    pub fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let reader = self.index.reader();
        let ctx = QueryContext::new(request, reader.as_ref(), Default::default());
        debug!(
            "Execution {} against generation {}",
            ctx.execution(),
            reader.generation()
        );

        let mut executions: Vec<Box<dyn ComponentExecution>> = Vec::new();
        for component in &self.components {
            if let Some(execution) = component.prepare_filter(&ctx)? {
                trace!("Component '{}' joined the execution", component.name());
                executions.push(execution);
            }
        }

        let mut filters = Vec::new();
        let parser = FilterQueryParser::new(self.index.schema().clone());
        for fq in &request.filter_queries {
            filters.push(parser.parse(fq)?);
        }
        filters.extend(executions.iter().filter_map(|e| e.filter()));

        let query = self.build_query(request);
        let live = reader.live_docs();
        let mut candidates = live.clone();
        for filter in &filters {
            let accepted = self.evaluate_filter(filter.as_ref(), &ctx.filter_context(), &live)?;
            candidates.intersect_with(&accepted);
        }

        let mut matches: Vec<ScoredDoc> = candidates
            .iter()
            .filter_map(|doc_id| {
                query
                    .score(reader.as_ref(), doc_id)
                    .map(|score| ScoredDoc { doc_id, score })
            })
            .collect();
        debug!(
            "{} documents matched {} after {} filters",
            matches.len(),
            query.description(),
            filters.len()
        );

        let mut sort = request.sort.as_deref().map(SortSpec::parse).transpose()?;
        for execution in &mut executions {
            sort = execution.compute_sort(&ctx, sort)?;
        }
        if let Some(sort) = &sort {
            debug!("Sorting by {sort}");
        }
        matches.sort_by(|a, b| compare_docs(reader.as_ref(), sort.as_ref(), a, b));

        let rows = request.rows.unwrap_or(self.config.default_rows);
        let total_hits = matches.len();
        let page: Vec<ScoredDoc> = matches.into_iter().skip(request.start).take(rows).collect();
        let page_ids: Vec<DocId> = page.iter().map(|d| d.doc_id).collect();

        let hits = page
            .iter()
            .filter_map(|scored| {
                let document = reader.document(scored.doc_id)?.clone();
                Some(SearchHit {
                    doc_id: scored.doc_id,
                    key: reader.unique_key(scored.doc_id),
                    score: scored.score,
                    document,
                })
            })
            .collect();

        let mut response = SearchResponse {
            hits,
            total_hits,
            start: request.start,
            ..Default::default()
        };
        for execution in &mut executions {
            execution.format_response(&ctx, &page_ids, &mut response)?;
        }
        Ok(response)
    }

    fn build_query(&self, request: &SearchRequest) -> Box<dyn Query> {
        match request.query.as_deref().map(str::trim) {
            None | Some("") | Some("*:*") => Box::new(MatchAllQuery::new()),
            Some(text) => {
                let fields = if request.query_fields.is_empty() {
                    let schema = self.index.schema();
                    schema.text_fields().into_iter().map(String::from).collect()
                } else {
                    request.query_fields.clone()
                };
                Box::new(
                    TextQuery::new(fields, text).with_min_should_match(request.min_should_match),
                )
            }
        }
    }

    fn evaluate_filter(
        &self,
        filter: &dyn Filter,
        ctx: &FilterContext<'_>,
        live: &DocSet,
    ) -> Result<DocSet> {
        let generation = ctx.reader().generation();
        let Some(key) = filter.cache_key() else {
            return filter.evaluate(ctx, live);
        };
        if let Some(cached) = self.filter_cache.get(&key, generation) {
            trace!("Filter cache hit for {key}");
            return Ok(cached);
        }
        let docs = filter.evaluate(ctx, live)?;
        self.filter_cache.insert(key, generation, docs.clone());
        Ok(docs)
    }
}

fn compare_docs(
    reader: &dyn IndexReader,
    sort: Option<&SortSpec>,
    a: &ScoredDoc,
    b: &ScoredDoc,
) -> Ordering {
    let Some(sort) = sort else {
        return b
            .score
            .total_cmp(&a.score)
            .then_with(|| a.doc_id.cmp(&b.doc_id));
    };
    for entry in sort.entries() {
        let ordering = match &entry.key {
            SortKey::Score => entry.order.apply(a.score.total_cmp(&b.score)),
            SortKey::Field(field) => compare_field_values(
                reader.field_value(a.doc_id, field),
                reader.field_value(b.doc_id, field),
                entry.order,
            ),
            SortKey::Computed(comparator) => comparator.compare(a.doc_id, b.doc_id, entry.order),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    a.doc_id.cmp(&b.doc_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldType;

    fn engine() -> SearchEngine {
        let schema = Schema::builder()
            .field("id", FieldType::String)
            .field("name_t", FieldType::Text)
            .field("rating", FieldType::Float)
            .build()
            .unwrap();
        let mut engine = SearchEngine::new(schema, EngineConfig::default());
        for (id, name, rating) in [
            ("1", "New York", 4.0),
            ("2", "Brooklyn", 5.0),
            ("3", "New Haven", 3.0),
            ("4", "Yonkers", 4.0),
        ] {
            engine
                .add_document(
                    Document::builder()
                        .add_text("id", id)
                        .add_text("name_t", name)
                        .add_float("rating", rating)
                        .build(),
                )
                .unwrap();
        }
        engine.commit().unwrap();
        engine
    }

    #[test]
    fn test_match_all_in_id_order() {
        let engine = engine();
        let response = engine.search(&SearchRequest::new()).unwrap();
        assert_eq!(response.total_hits, 4);
        assert_eq!(response.keys(), vec!["1", "2", "3", "4"]);
        assert!(response.sections.is_empty());
    }

    #[test]
    fn test_text_query_with_filter_and_sort() {
        let engine = engine();
        let request = SearchRequest::new()
            .with_query("new")
            .add_filter_query("rating:[3.5 TO *]");
        assert_eq!(engine.search(&request).unwrap().keys(), vec!["1"]);

        let request = SearchRequest::new().with_sort("rating desc, name_t asc");
        assert_eq!(engine.search(&request).unwrap().keys(), vec!["2", "1", "4", "3"]);
    }

    #[test]
    fn test_pagination() {
        let engine = engine();
        let response = engine
            .search(&SearchRequest::new().with_start(1).with_rows(2))
            .unwrap();
        assert_eq!(response.total_hits, 4);
        assert_eq!(response.start, 1);
        assert_eq!(response.keys(), vec!["2", "3"]);
    }

    #[test]
    fn test_filter_cache_reuse() {
        let engine = engine();
        let request = SearchRequest::new().add_filter_query("rating:4.0");
        engine.search(&request).unwrap();
        engine.search(&request).unwrap();
        let stats = engine.filter_cache().stats();
        assert_eq!((stats.hits, stats.misses), (1, 1));
    }

    #[test]
    fn test_bad_filter_query() {
        let engine = engine();
        let err = engine
            .search(&SearchRequest::new().add_filter_query("rating"))
            .unwrap_err();
        assert!(err.is_bad_request());
    }
}
