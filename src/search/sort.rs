//! Multi-key sort specifications.

use std::cmp::Ordering;
use std::fmt::{self, Debug, Display};
use std::str::FromStr;
use std::sync::Arc;

use crate::document::FieldValue;
use crate::error::{Result, SarissaError};
use crate::index::DocId;

/// Sort order for search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Ascending order (lowest to highest).
    #[default]
    Asc,
    /// Descending order (highest to lowest).
    Desc,
}

impl SortOrder {
    /// Apply this order to an ascending comparison.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = SarissaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(SarissaError::query(format!(
                "Unknown sort order '{other}', expected 'asc' or 'desc'"
            ))),
        }
    }
}

/// A sort key computed outside the stored fields, such as a distance.
///
/// Documents without a value always sort after documents with one,
/// whatever the order.
pub trait DocComparator: Send + Sync + Debug {
    /// Name the key is known by in a sort specification.
    fn name(&self) -> &str;

    /// Sort value of a document, if it has one.
    fn value(&self, doc_id: DocId) -> Option<f64>;

    /// Compare two documents.
    fn compare(&self, a: DocId, b: DocId, order: SortOrder) -> Ordering {
        compare_missing_last(self.value(a), self.value(b), order, |x, y| x.total_cmp(y))
    }
}

/// What a sort entry orders by.
#[derive(Debug, Clone)]
pub enum SortKey {
    /// Relevance score.
    Score,
    /// A stored field.
    Field(String),
    /// A computed key.
    Computed(Arc<dyn DocComparator>),
}

impl SortKey {
    /// Name of the key as it appears in a sort specification.
    pub fn name(&self) -> &str {
        match self {
            SortKey::Score => "score",
            SortKey::Field(name) => name,
            SortKey::Computed(comparator) => comparator.name(),
        }
    }
}

/// One key of a sort specification.
#[derive(Debug, Clone)]
pub struct SortEntry {
    /// The key.
    pub key: SortKey,
    /// The direction.
    pub order: SortOrder,
}

impl SortEntry {
    /// Create a sort entry.
    pub fn new(key: SortKey, order: SortOrder) -> Self {
        SortEntry { key, order }
    }

    /// Ascending entry on a stored field.
    pub fn field_asc<S: Into<String>>(field: S) -> Self {
        Self::new(SortKey::Field(field.into()), SortOrder::Asc)
    }

    /// Descending entry on a stored field.
    pub fn field_desc<S: Into<String>>(field: S) -> Self {
        Self::new(SortKey::Field(field.into()), SortOrder::Desc)
    }
}

/// An ordered list of sort keys; earlier entries take precedence.
#[derive(Debug, Clone, Default)]
pub struct SortSpec {
    entries: Vec<SortEntry>,
}

impl SortSpec {
    /// Create an empty specification.
    pub fn new() -> Self {
        SortSpec::default()
    }

    /// Create a specification from entries.
    pub fn from_entries(entries: Vec<SortEntry>) -> Self {
        SortSpec { entries }
    }

    /// Parse `"rating desc, name asc"`. The direction defaults to ascending,
    /// except for `score` which defaults to descending.
    pub fn parse(input: &str) -> Result<Self> {
        let mut entries = Vec::new();
        for clause in input.split(',').map(str::trim).filter(|c| !c.is_empty()) {
            let mut parts = clause.split_whitespace();
            let name = parts.next().unwrap_or_default();
            let key = match name {
                "score" => SortKey::Score,
                field => SortKey::Field(field.to_string()),
            };
            let order = match parts.next() {
                Some(order) => order.parse()?,
                None if matches!(key, SortKey::Score) => SortOrder::Desc,
                None => SortOrder::Asc,
            };
            if let Some(extra) = parts.next() {
                return Err(SarissaError::query(format!(
                    "Unexpected '{extra}' in sort clause '{clause}'"
                )));
            }
            entries.push(SortEntry::new(key, order));
        }

        if entries.is_empty() {
            return Err(SarissaError::query("Empty sort specification"));
        }
        Ok(SortSpec { entries })
    }

    /// Append a lowest-precedence entry.
    pub fn push(&mut self, entry: SortEntry) {
        self.entries.push(entry);
    }

    /// Position of the first entry with the given key name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.key.name() == name)
    }

    /// Replace the entry at `index`.
    pub fn replace(&mut self, index: usize, entry: SortEntry) {
        self.entries[index] = entry;
    }

    /// The entries, highest precedence first.
    pub fn entries(&self) -> &[SortEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let clauses: Vec<String> = self
            .entries
            .iter()
            .map(|e| format!("{} {}", e.key.name(), e.order))
            .collect();
        write!(f, "{}", clauses.join(", "))
    }
}

/// Compare optional values, putting missing ones last regardless of order.
pub fn compare_missing_last<T, F>(a: Option<T>, b: Option<T>, order: SortOrder, cmp: F) -> Ordering
where
    F: Fn(&T, &T) -> Ordering,
{
    match (a, b) {
        (Some(a), Some(b)) => order.apply(cmp(&a, &b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Compare stored field values: numerically when both are numeric,
/// otherwise by their text form.
pub fn compare_field_values(
    a: Option<&FieldValue>,
    b: Option<&FieldValue>,
    order: SortOrder,
) -> Ordering {
    fn present(v: Option<&FieldValue>) -> Option<&FieldValue> {
        v.filter(|v| !matches!(v, FieldValue::Null))
    }
    compare_missing_last(present(a), present(b), order, |x, y| {
        match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            _ => x.to_string().cmp(&y.to_string()),
        }
    })
}
