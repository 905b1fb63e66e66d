//! Per-hit distances for the response.

use serde_json::{Map, Value};

use crate::index::DocId;
use crate::spatial::distance::DistanceMap;

/// Distances of the returned page, keyed by unique key, in page order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistanceTable {
    entries: Vec<(String, f64)>,
}

impl DistanceTable {
    /// Distance of the document with the given unique key.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|&(_, distance)| distance)
    }

    /// Entries in page order.
    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// JSON object mapping unique key to distance in miles.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .entries
            .iter()
            .map(|(key, distance)| (key.clone(), Value::from(*distance)))
            .collect();
        Value::Object(map)
    }
}

/// Maps memoized distances onto the unique keys of a result page.
#[derive(Debug, Clone, Copy, Default)]
pub struct DistanceReporter;

impl DistanceReporter {
    /// Build the table for exactly the documents of `page`.
    ///
    /// Documents with no memoized distance or no unique key are left out.
    pub fn report<F>(page: &[DocId], distances: &DistanceMap, resolve_key: F) -> DistanceTable
    where
        F: Fn(DocId) -> Option<String>,
    {
        let entries = page
            .iter()
            .filter_map(|&doc_id| Some((resolve_key(doc_id)?, distances.get(doc_id)?)))
            .collect();
        DistanceTable { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::ExecutionId;

    #[test]
    fn test_report_restricted_to_page() {
        let mut map = DistanceMap::new(ExecutionId::new());
        map.insert(0, 11.76);
        map.insert(1, 0.0);
        map.insert(3, 5.33);

        let table = DistanceReporter::report(&[1, 3, 2], &map, |doc_id| Some(format!("doc{doc_id}")));
        assert_eq!(
            table.entries(),
            &[("doc1".to_string(), 0.0), ("doc3".to_string(), 5.33)]
        );
        assert_eq!(table.get("doc0"), None);
        assert_eq!(table.to_json()["doc3"], 5.33);
    }

    #[test]
    fn test_unresolvable_keys_are_skipped() {
        let mut map = DistanceMap::new(ExecutionId::new());
        map.insert(0, 1.0);
        let table = DistanceReporter::report(&[0], &map, |_| None);
        assert!(table.is_empty());
    }
}
