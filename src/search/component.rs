//! Search component lifecycle.
//!
//! A [`SearchComponent`] is registered once with the engine. For every
//! physical execution of a request it may return a [`ComponentExecution`]
//! that owns whatever state that execution needs. The engine then calls
//! the execution at fixed points of the pipeline:
//!
//! 1. [`ComponentExecution::filter`] after preparation, to add a filter;
//! 2. [`ComponentExecution::compute_sort`] before results are ordered;
//! 3. [`ComponentExecution::format_response`] once the page is known.
//!
//! State flows through the execution value only. Nothing is shared
//! between executions.

use std::fmt::Debug;
use std::sync::Arc;

use crate::error::Result;
use crate::index::{DocId, IndexReader};
use crate::query::{ExecutionId, Filter, FilterContext};
use crate::search::request::SearchRequest;
use crate::search::response::SearchResponse;
use crate::search::sort::SortSpec;

/// Everything a component sees about the running execution.
#[derive(Debug, Clone, Copy)]
pub struct QueryContext<'a> {
    request: &'a SearchRequest,
    reader: &'a dyn IndexReader,
    execution: ExecutionId,
}

impl<'a> QueryContext<'a> {
    /// Create a context.
    pub fn new(
        request: &'a SearchRequest,
        reader: &'a dyn IndexReader,
        execution: ExecutionId,
    ) -> Self {
        QueryContext {
            request,
            reader,
            execution,
        }
    }

    /// The request being executed.
    pub fn request(&self) -> &'a SearchRequest {
        self.request
    }

    /// The snapshot being searched.
    pub fn reader(&self) -> &'a dyn IndexReader {
        self.reader
    }

    /// Id of this physical execution.
    pub fn execution(&self) -> ExecutionId {
        self.execution
    }

    /// Context for evaluating filters in this execution.
    pub fn filter_context(&self) -> FilterContext<'a> {
        FilterContext::new(self.reader, self.execution)
    }
}

/// A pluggable extension of the search pipeline.
pub trait SearchComponent: Send + Sync + Debug {
    /// Component name, used in logs.
    fn name(&self) -> &str;

    /// Inspect the request and, if it concerns this component, start an
    /// execution. Errors abort the search.
    fn prepare_filter(&self, ctx: &QueryContext<'_>) -> Result<Option<Box<dyn ComponentExecution>>>;
}

/// Per-execution state of a component.
pub trait ComponentExecution: Debug {
    /// Filter this execution adds to the request, if any.
    fn filter(&self) -> Option<Arc<dyn Filter>> {
        None
    }

    /// Adjust the sort about to be applied. `None` means relevance order.
    fn compute_sort(
        &mut self,
        _ctx: &QueryContext<'_>,
        sort: Option<SortSpec>,
    ) -> Result<Option<SortSpec>> {
        Ok(sort)
    }

    /// Add to the response once the returned page is known.
    fn format_response(
        &mut self,
        _ctx: &QueryContext<'_>,
        _page: &[DocId],
        _response: &mut SearchResponse,
    ) -> Result<()> {
        Ok(())
    }
}
