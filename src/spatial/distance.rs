//! Exact distance filtering with per-execution memoization.
//!
//! [`DistanceFilter`] refines an inner pre-filter (normally the bounding
//! box) by great-circle distance. While it evaluates, it records the
//! distance of every candidate the inner filter passed in a
//! [`DistanceMap`] tagged with the execution that produced it. Sorting and
//! reporting read that map later in the same execution.
//!
//! The map is never trusted across executions. When the engine serves the
//! filter's result from its cache the filter is not evaluated, so
//! [`DistanceFilter::ensure_evaluated`] runs a full evaluation on demand.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use ahash::AHashMap;
use log::{debug, warn};
use parking_lot::RwLock;

use crate::error::{Result, SarissaError};
use crate::index::{DocId, IndexReader};
use crate::query::{DocSet, ExecutionId, Filter, FilterContext};
use crate::spatial::geo::{GeoPoint, haversine_miles};
use crate::spatial::parser::SpatialRequest;

/// Distances in miles, by document, computed during one execution.
///
/// A document is present iff it was evaluated in that execution. Absence
/// does not mean "far away".
#[derive(Debug, Clone)]
pub struct DistanceMap {
    execution: ExecutionId,
    distances: AHashMap<DocId, f64>,
    skipped: usize,
}

impl DistanceMap {
    /// Create an empty map for an execution.
    pub fn new(execution: ExecutionId) -> Self {
        DistanceMap {
            execution,
            distances: AHashMap::new(),
            skipped: 0,
        }
    }

    /// The execution that computed these distances.
    pub fn execution(&self) -> ExecutionId {
        self.execution
    }

    /// Distance of a document, if it was evaluated.
    pub fn get(&self, doc_id: DocId) -> Option<f64> {
        self.distances.get(&doc_id).copied()
    }

    /// Check if a document was evaluated.
    pub fn contains(&self, doc_id: DocId) -> bool {
        self.distances.contains_key(&doc_id)
    }

    /// Record a distance.
    pub fn insert(&mut self, doc_id: DocId, distance: f64) {
        self.distances.insert(doc_id, distance);
    }

    /// Number of evaluated documents.
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    /// Check if no document was evaluated.
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// Candidates excluded for missing or unreadable coordinates.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Iterate over `(doc_id, distance)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (DocId, f64)> + '_ {
        self.distances.iter().map(|(&doc_id, &distance)| (doc_id, distance))
    }

    fn merge(&mut self, other: DistanceMap) {
        self.distances.extend(other.distances);
        self.skipped += other.skipped;
    }
}

/// Filter accepting documents within a radius of a centerpoint.
pub struct DistanceFilter {
    inner: Arc<dyn Filter>,
    center: GeoPoint,
    radius_miles: Option<f64>,
    lat_field: String,
    lng_field: String,
    state: RwLock<Option<Arc<DistanceMap>>>,
}

impl DistanceFilter {
    /// Wrap `inner` with the exact distance check described by `request`.
    ///
    /// With no radius every candidate passing `inner` is accepted, but
    /// distances are still computed.
    pub fn new(request: &SpatialRequest, inner: Arc<dyn Filter>) -> Self {
        DistanceFilter {
            inner,
            center: request.center,
            radius_miles: request.radius_miles,
            lat_field: request.lat_field.clone(),
            lng_field: request.lng_field.clone(),
            state: RwLock::new(None),
        }
    }

    /// The centerpoint.
    pub fn center(&self) -> GeoPoint {
        self.center
    }

    /// The radius in miles, if filtering.
    pub fn radius_miles(&self) -> Option<f64> {
        self.radius_miles
    }

    /// The wrapped pre-filter.
    pub fn inner(&self) -> &Arc<dyn Filter> {
        &self.inner
    }

    /// Distances computed by `execution`, if this filter was evaluated in it.
    pub fn distances_for(&self, execution: ExecutionId) -> Option<Arc<DistanceMap>> {
        self.state
            .read()
            .as_ref()
            .filter(|map| map.execution() == execution)
            .cloned()
    }

    /// Distances for the context's execution, evaluating over `candidates`
    /// first if this execution has not evaluated the filter yet.
    pub fn ensure_evaluated(
        &self,
        ctx: &FilterContext<'_>,
        candidates: &DocSet,
    ) -> Result<Arc<DistanceMap>> {
        if let Some(map) = self.distances_for(ctx.execution()) {
            return Ok(map);
        }
        debug!(
            "Distances missing for execution {}, evaluating {} candidates",
            ctx.execution(),
            candidates.len()
        );
        let (_, map) = self.compute(ctx, candidates)?;
        Ok(self.store(map))
    }

    fn compute(&self, ctx: &FilterContext<'_>, candidates: &DocSet) -> Result<(DocSet, DistanceMap)> {
        let reader = ctx.reader();
        let prefiltered = self.inner.evaluate(ctx, candidates)?;
        let mut accepted = DocSet::empty(candidates.max_doc());
        let mut map = DistanceMap::new(ctx.execution());

        for doc_id in prefiltered.iter() {
            let distance = match self.coordinates(reader, doc_id) {
                Ok((lat, lng)) => haversine_miles(self.center.lat, self.center.lng, lat, lng),
                Err(e) => {
                    warn!("Skipping document {doc_id}: {e}");
                    map.skipped += 1;
                    continue;
                }
            };
            map.insert(doc_id, distance);
            if self.radius_miles.is_none_or(|radius| distance <= radius) {
                accepted.insert(doc_id);
            }
        }

        debug!(
            "{} of {} pre-filtered candidates within {:?} miles of ({}, {}), {} skipped",
            accepted.len(),
            prefiltered.len(),
            self.radius_miles,
            self.center.lat,
            self.center.lng,
            map.skipped
        );
        Ok((accepted, map))
    }

    fn coordinates(&self, reader: &dyn IndexReader, doc_id: DocId) -> Result<(f64, f64)> {
        let read = |field: &str| {
            reader
                .field_f64(doc_id, field)
                .ok_or_else(|| SarissaError::missing_coordinate(doc_id, field))
        };
        Ok((read(&self.lat_field)?, read(&self.lng_field)?))
    }

    fn store(&self, map: DistanceMap) -> Arc<DistanceMap> {
        let mut state = self.state.write();
        let merged = match state.take() {
            Some(previous) if previous.execution() == map.execution() => {
                let mut merged = Arc::unwrap_or_clone(previous);
                merged.merge(map);
                merged
            }
            _ => map,
        };
        let merged = Arc::new(merged);
        *state = Some(merged.clone());
        merged
    }
}

impl Filter for DistanceFilter {
    fn evaluate(&self, ctx: &FilterContext<'_>, candidates: &DocSet) -> Result<DocSet> {
        let (accepted, map) = self.compute(ctx, candidates)?;
        self.store(map);
        Ok(accepted)
    }

    fn cache_key(&self) -> Option<String> {
        let inner = self.inner.cache_key()?;
        let radius = self
            .radius_miles
            .map_or_else(|| "*".to_string(), |r| r.to_string());
        Some(format!(
            "{{!geodist pt={},{} r={radius} fields={},{}}}{inner}",
            self.center.lat, self.center.lng, self.lat_field, self.lng_field
        ))
    }

    fn description(&self) -> String {
        format!(
            "DistanceFilter(center:({}, {}), radius:{:?}, fields:{}/{}, inner:{})",
            self.center.lat,
            self.center.lng,
            self.radius_miles,
            self.lat_field,
            self.lng_field,
            self.inner.description()
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Debug for DistanceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DistanceFilter")
            .field("center", &self.center)
            .field("radius_miles", &self.radius_miles)
            .field("lat_field", &self.lat_field)
            .field("lng_field", &self.lng_field)
            .field("inner", &self.inner)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::index::{MemoryIndex, MemoryIndexReader};
    use crate::query::MatchAllFilter;
    use crate::schema::{FieldType, Schema};
    use crate::spatial::parser::SpatialQueryParser;

    fn reader() -> Arc<MemoryIndexReader> {
        let schema = Schema::builder()
            .field("id", FieldType::String)
            .field("lat", FieldType::Float)
            .field("lng", FieldType::Float)
            .build()
            .unwrap();
        let mut index = MemoryIndex::new(schema);
        for (id, lat, lng) in [
            ("si", 40.5834379, -74.1495875),
            ("ny", 40.7142691, -74.0059729),
            ("yo", 40.9312099, -73.8987469),
            ("bk", 40.6501037, -73.9495823),
        ] {
            index
                .add_document(Document::builder().add_text("id", id).add_location("lat", "lng", lat, lng).build())
                .unwrap();
        }
        index
            .add_document(Document::builder().add_text("id", "nowhere").add_float("lat", 40.7).build())
            .unwrap();
        index.commit().unwrap();
        index.reader()
    }

    fn filter(raw: &str) -> DistanceFilter {
        let request = SpatialQueryParser::default().parse_param(raw).unwrap();
        DistanceFilter::new(&request, Arc::new(MatchAllFilter::new()))
    }

    #[test]
    fn test_radius_filter_and_memoization() {
        let reader = reader();
        let ctx = FilterContext::new(reader.as_ref(), ExecutionId::new());
        let filter = filter("{!radius=10}40.7142691,-74.0059729");

        let accepted = filter.evaluate(&ctx, &reader.live_docs()).unwrap();
        assert_eq!(accepted.iter().collect::<Vec<_>>(), vec![1, 3]);

        let map = filter.distances_for(ctx.execution()).unwrap();
        assert_eq!(map.len(), 4);
        assert_eq!(map.skipped(), 1);
        assert!(!map.contains(4));
        assert_eq!(map.get(1), Some(0.0));
        assert!(map.get(0).unwrap() > 10.0);
    }

    #[test]
    fn test_no_radius_accepts_all_with_coordinates() {
        let reader = reader();
        let ctx = FilterContext::new(reader.as_ref(), ExecutionId::new());
        let filter = filter("40.7142691,-74.0059729");

        let accepted = filter.evaluate(&ctx, &reader.live_docs()).unwrap();
        assert_eq!(accepted.len(), 4);
        assert!(filter.cache_key().unwrap().contains("r=*"));
    }

    #[test]
    fn test_map_is_scoped_to_execution() {
        let reader = reader();
        let filter = filter("{!radius=10}40.7142691,-74.0059729");
        let first = FilterContext::new(reader.as_ref(), ExecutionId::new());
        filter.evaluate(&first, &reader.live_docs()).unwrap();

        let second = FilterContext::new(reader.as_ref(), ExecutionId::new());
        assert!(filter.distances_for(second.execution()).is_none());

        let map = filter.ensure_evaluated(&second, &reader.live_docs()).unwrap();
        assert_eq!(map.execution(), second.execution());
        assert_eq!(map.len(), 4);
        assert!(filter.distances_for(first.execution()).is_none());
    }

    #[test]
    fn test_repeated_evaluation_in_one_execution_merges() {
        let reader = reader();
        let ctx = FilterContext::new(reader.as_ref(), ExecutionId::new());
        let filter = filter("40.7142691,-74.0059729");

        filter.evaluate(&ctx, &DocSet::from_ids(reader.max_doc(), [0])).unwrap();
        filter.evaluate(&ctx, &DocSet::from_ids(reader.max_doc(), [2])).unwrap();
        let map = filter.distances_for(ctx.execution()).unwrap();
        assert!(map.contains(0) && map.contains(2));
        assert_eq!(map.len(), 2);
    }
}
