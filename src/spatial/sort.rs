//! Ordering by distance.

use std::sync::Arc;

use crate::index::DocId;
use crate::search::{DocComparator, SortEntry, SortKey, SortOrder, SortSpec};
use crate::spatial::distance::DistanceMap;

/// Sort key name of the distance comparator.
pub const DISTANCE_SORT_KEY: &str = "geo_distance";

/// Orders documents by memoized distance, nearest first when ascending.
/// Documents without a distance sort last.
#[derive(Debug, Clone)]
pub struct DistanceComparator {
    distances: Arc<DistanceMap>,
}

impl DistanceComparator {
    /// Create a comparator over a distance map.
    pub fn new(distances: Arc<DistanceMap>) -> Self {
        DistanceComparator { distances }
    }
}

impl DocComparator for DistanceComparator {
    fn name(&self) -> &str {
        DISTANCE_SORT_KEY
    }

    fn value(&self, doc_id: DocId) -> Option<f64> {
        self.distances.get(doc_id)
    }
}

/// Adds distance ordering to a sort specification.
#[derive(Debug, Clone, Copy, Default)]
pub struct SortMerger;

impl SortMerger {
    /// Merge ascending distance ordering into `existing`.
    ///
    /// Without an existing sort, distance becomes the only key. Otherwise it
    /// is appended as the last tie-break and earlier keys keep their
    /// precedence. If a distance key is already present it is refreshed in
    /// place with the new map rather than added twice, keeping its order.
    /// A `geo_distance` clause given in the request's sort counts as such a
    /// key.
    pub fn merge(existing: Option<SortSpec>, distances: Arc<DistanceMap>) -> SortSpec {
        let entry = SortEntry::new(
            SortKey::Computed(Arc::new(DistanceComparator::new(distances))),
            SortOrder::Asc,
        );
        let mut spec = existing.unwrap_or_default();
        match spec.position(DISTANCE_SORT_KEY) {
            Some(index) => {
                let order = spec.entries()[index].order;
                spec.replace(index, SortEntry { order, ..entry });
            }
            None => spec.push(entry),
        }
        spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::ExecutionId;
    use std::cmp::Ordering;

    fn distances(values: &[(DocId, f64)]) -> Arc<DistanceMap> {
        let mut map = DistanceMap::new(ExecutionId::new());
        for &(doc_id, distance) in values {
            map.insert(doc_id, distance);
        }
        Arc::new(map)
    }

    #[test]
    fn test_sole_key_without_existing_sort() {
        let spec = SortMerger::merge(None, distances(&[]));
        assert_eq!(spec.to_string(), "geo_distance asc");
    }

    #[test]
    fn test_appended_last() {
        let existing = SortSpec::parse("rating desc, name asc").unwrap();
        let spec = SortMerger::merge(Some(existing), distances(&[]));
        assert_eq!(spec.to_string(), "rating desc, name asc, geo_distance asc");
    }

    #[test]
    fn test_merge_is_idempotent() {
        let map = distances(&[(0, 1.0)]);
        let once = SortMerger::merge(Some(SortSpec::parse("rating desc").unwrap()), map.clone());
        let twice = SortMerger::merge(Some(once.clone()), map);
        assert_eq!(once.len(), 2);
        assert_eq!(twice.len(), once.len());
    }

    #[test]
    fn test_requested_distance_clause_is_replaced() {
        let map = distances(&[(0, 1.0), (1, 9.0)]);
        let requested = SortSpec::parse("geo_distance desc, rating desc").unwrap();
        let spec = SortMerger::merge(Some(requested), map);
        assert_eq!(spec.to_string(), "geo_distance desc, rating desc");

        let entry = &spec.entries()[0];
        assert_eq!(entry.order, SortOrder::Desc);
        let SortKey::Computed(comparator) = &entry.key else {
            panic!("expected a computed key");
        };
        assert_eq!(comparator.compare(1, 0, entry.order), Ordering::Less);
    }

    #[test]
    fn test_refresh_uses_new_distances() {
        let stale = SortMerger::merge(None, distances(&[(0, 9.0), (1, 1.0)]));
        let fresh = SortMerger::merge(Some(stale), distances(&[(0, 1.0), (1, 9.0)]));
        let SortKey::Computed(comparator) = &fresh.entries()[0].key else {
            panic!("expected a computed key");
        };
        assert_eq!(comparator.compare(0, 1, SortOrder::Asc), Ordering::Less);
    }

    #[test]
    fn test_comparator_missing_last() {
        let comparator = DistanceComparator::new(distances(&[(0, 5.3), (1, 0.0)]));
        assert_eq!(comparator.compare(1, 0, SortOrder::Asc), Ordering::Less);
        assert_eq!(comparator.compare(0, 2, SortOrder::Asc), Ordering::Less);
        assert_eq!(comparator.compare(0, 2, SortOrder::Desc), Ordering::Less);
        assert_eq!(comparator.compare(2, 3, SortOrder::Asc), Ordering::Equal);
    }
}
