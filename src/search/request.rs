//! Search request model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Named request parameters that components read.
///
/// A parameter may carry several values; [`get`](Self::get) returns the
/// first one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Params {
    values: BTreeMap<String, Vec<String>>,
}

impl Params {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Params::default()
    }

    /// Replace all values of `name` with `value`.
    pub fn set<K: Into<String>, V: Into<String>>(&mut self, name: K, value: V) {
        self.values.insert(name.into(), vec![value.into()]);
    }

    /// Append a value to `name`.
    pub fn add<K: Into<String>, V: Into<String>>(&mut self, name: K, value: V) {
        self.values.entry(name.into()).or_default().push(value.into());
    }

    /// First value of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name)?.first().map(String::as_str)
    }

    /// All values of `name`.
    pub fn get_all(&self, name: &str) -> &[String] {
        self.values.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Check if `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Remove `name` and return its values.
    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.values.remove(name)
    }

    /// Iterate over parameter names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

/// A search request.
///
/// `query` is matched against `query_fields` (all text fields of the schema
/// when empty). `filter_queries` restrict the result without affecting
/// scores. Components read their own parameters from `params`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Free-text query; `None` or `*:*` matches every document.
    pub query: Option<String>,
    /// Fields the text query searches.
    pub query_fields: Vec<String>,
    /// Minimum number of query words that must match.
    pub min_should_match: usize,
    /// Filter queries, ANDed together.
    pub filter_queries: Vec<String>,
    /// Sort specification, e.g. `rating desc, name asc`.
    pub sort: Option<String>,
    /// Offset of the first returned hit.
    pub start: usize,
    /// Page size; the engine default applies when `None`.
    pub rows: Option<usize>,
    /// Component parameters.
    pub params: Params,
}

impl SearchRequest {
    /// Create a request matching all documents.
    pub fn new() -> Self {
        SearchRequest {
            min_should_match: 1,
            ..Default::default()
        }
    }

    /// Set the text query.
    pub fn with_query<S: Into<String>>(mut self, query: S) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Set the fields searched by the text query.
    pub fn with_query_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Set the minimum number of matching query words.
    pub fn with_min_should_match(mut self, n: usize) -> Self {
        self.min_should_match = n;
        self
    }

    /// Add a filter query.
    pub fn add_filter_query<S: Into<String>>(mut self, fq: S) -> Self {
        self.filter_queries.push(fq.into());
        self
    }

    /// Set the sort specification.
    pub fn with_sort<S: Into<String>>(mut self, sort: S) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Set the offset of the first hit.
    pub fn with_start(mut self, start: usize) -> Self {
        self.start = start;
        self
    }

    /// Set the page size.
    pub fn with_rows(mut self, rows: usize) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Set a component parameter.
    pub fn with_param<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.params.set(name, value);
        self
    }
}
