//! Search component wiring spatial filtering, sorting and reporting into
//! the search pipeline.

use std::sync::Arc;

use log::debug;

use crate::error::Result;
use crate::index::DocId;
use crate::query::{Filter, MatchAllFilter};
use crate::search::{ComponentExecution, QueryContext, SearchComponent, SearchResponse, SortSpec};
use crate::spatial::bounding_box::BoundingBoxBuilder;
use crate::spatial::config::SpatialConfig;
use crate::spatial::distance::{DistanceFilter, DistanceMap};
use crate::spatial::parser::{SpatialQueryParser, SpatialRequest};
use crate::spatial::report::DistanceReporter;
use crate::spatial::sort::{DISTANCE_SORT_KEY, SortMerger};

/// Reads the spatial request parameter and, when present, restricts,
/// orders and annotates results by distance from its centerpoint.
#[derive(Debug, Clone)]
pub struct SpatialComponent {
    config: SpatialConfig,
    parser: SpatialQueryParser,
}

impl Default for SpatialComponent {
    fn default() -> Self {
        Self::new(SpatialConfig::default())
    }
}

impl SpatialComponent {
    /// Create a component with the given settings.
    pub fn new(config: SpatialConfig) -> Self {
        SpatialComponent {
            parser: SpatialQueryParser::new(&config),
            config,
        }
    }

    /// Get the settings.
    pub fn config(&self) -> &SpatialConfig {
        &self.config
    }
}

impl SearchComponent for SpatialComponent {
    fn name(&self) -> &str {
        "spatial"
    }

    fn prepare_filter(&self, ctx: &QueryContext<'_>) -> Result<Option<Box<dyn ComponentExecution>>> {
        let Some(raw) = ctx.request().params.get(&self.config.param_name) else {
            return Ok(None);
        };
        let request = self.parser.parse_param(raw)?;

        let inner: Arc<dyn Filter> = match request.radius_miles {
            Some(radius) => {
                let builder = BoundingBoxBuilder::new(ctx.reader().schema());
                Arc::new(builder.build(
                    request.center,
                    radius,
                    &request.lat_field,
                    &request.lng_field,
                )?)
            }
            None => Arc::new(MatchAllFilter::new()),
        };
        debug!("Spatial request {request:?} with pre-filter {}", inner.description());

        Ok(Some(Box::new(SpatialExecution {
            filter: Arc::new(DistanceFilter::new(&request, inner)),
            request,
            response_key: self.config.response_key.clone(),
        })))
    }
}

/// Spatial state for one execution.
#[derive(Debug)]
pub struct SpatialExecution {
    request: SpatialRequest,
    filter: Arc<DistanceFilter>,
    response_key: String,
}

impl SpatialExecution {
    /// The parsed spatial request.
    pub fn request(&self) -> &SpatialRequest {
        &self.request
    }

    fn distances(&self, ctx: &QueryContext<'_>) -> Result<Arc<DistanceMap>> {
        let reader = ctx.reader();
        self.filter
            .ensure_evaluated(&ctx.filter_context(), &reader.live_docs())
    }
}

impl ComponentExecution for SpatialExecution {
    fn filter(&self) -> Option<Arc<dyn Filter>> {
        Some(self.filter.clone())
    }

    fn compute_sort(
        &mut self,
        ctx: &QueryContext<'_>,
        sort: Option<SortSpec>,
    ) -> Result<Option<SortSpec>> {
        let requested = sort
            .as_ref()
            .is_some_and(|spec| spec.position(DISTANCE_SORT_KEY).is_some());
        if !self.request.want_sort && !requested {
            return Ok(sort);
        }
        let distances = self.distances(ctx)?;
        Ok(Some(SortMerger::merge(sort, distances)))
    }

    fn format_response(
        &mut self,
        ctx: &QueryContext<'_>,
        page: &[DocId],
        response: &mut SearchResponse,
    ) -> Result<()> {
        let distances = self.distances(ctx)?;
        let reader = ctx.reader();
        let table = DistanceReporter::report(page, &distances, |doc_id| reader.unique_key(doc_id));
        response.add_section(self.response_key.clone(), table.to_json());
        Ok(())
    }
}
