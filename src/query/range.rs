//! Numeric range filter for restricting a field to an interval.

use std::any::Any;
use std::fmt::{self, Debug, Display};

use crate::error::Result;
use crate::query::doc_set::DocSet;
use crate::query::filter::{Filter, FilterContext};
use crate::schema::Schema;

/// Bound type for range filters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound<T> {
    /// Inclusive bound.
    Included(T),
    /// Exclusive bound.
    Excluded(T),
    /// Unbounded (no limit).
    Unbounded,
}

impl<T: PartialOrd> Bound<T> {
    /// Check if a value satisfies this bound as a lower bound.
    pub fn contains_lower(&self, value: &T) -> bool {
        match self {
            Bound::Included(bound) => value >= bound,
            Bound::Excluded(bound) => value > bound,
            Bound::Unbounded => true,
        }
    }

    /// Check if a value satisfies this bound as an upper bound.
    pub fn contains_upper(&self, value: &T) -> bool {
        match self {
            Bound::Included(bound) => value <= bound,
            Bound::Excluded(bound) => value < bound,
            Bound::Unbounded => true,
        }
    }
}

/// A filter that accepts documents whose numeric field lies within a range.
///
/// Documents without a readable numeric value in the field are rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericRangeFilter {
    /// The field to test.
    field: String,
    /// Lower bound of the range.
    lower: Bound<f64>,
    /// Upper bound of the range.
    upper: Bound<f64>,
}

impl NumericRangeFilter {
    /// Create a range filter with custom bound types.
    pub fn new<S: Into<String>>(field: S, lower: Bound<f64>, upper: Bound<f64>) -> Self {
        NumericRangeFilter {
            field: field.into(),
            lower,
            upper,
        }
    }

    /// Create a range filter with both bounds inclusive.
    pub fn inclusive<S: Into<String>>(field: S, lower: f64, upper: f64) -> Self {
        Self::new(field, Bound::Included(lower), Bound::Included(upper))
    }

    /// Create an inclusive range filter after checking that the schema can
    /// encode a numeric range on `field`.
    pub fn for_schema<S: Into<String>>(
        schema: &Schema,
        field: S,
        lower: Bound<f64>,
        upper: Bound<f64>,
    ) -> Result<Self> {
        let field = field.into();
        schema.check_range_encoding(&field)?;
        Ok(Self::new(field, lower, upper))
    }

    /// Get the field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Get the lower bound.
    pub fn lower_bound(&self) -> Bound<f64> {
        self.lower
    }

    /// Get the upper bound.
    pub fn upper_bound(&self) -> Bound<f64> {
        self.upper
    }

    /// Check if a value falls within the range.
    pub fn contains(&self, value: f64) -> bool {
        self.lower.contains_lower(&value) && self.upper.contains_upper(&value)
    }
}

impl Filter for NumericRangeFilter {
    fn evaluate(&self, ctx: &FilterContext<'_>, candidates: &DocSet) -> Result<DocSet> {
        let reader = ctx.reader();
        let mut accepted = DocSet::empty(candidates.max_doc());
        for doc_id in candidates.iter() {
            if let Some(value) = reader.field_f64(doc_id, &self.field) {
                if self.contains(value) {
                    accepted.insert(doc_id);
                }
            }
        }
        Ok(accepted)
    }

    fn cache_key(&self) -> Option<String> {
        Some(self.to_string())
    }

    fn description(&self) -> String {
        format!(
            "NumericRangeFilter(field:{}, lower:{:?}, upper:{:?})",
            self.field, self.lower, self.upper
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Display for NumericRangeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (open, low) = match self.lower {
            Bound::Included(v) => ('[', v.to_string()),
            Bound::Excluded(v) => ('{', v.to_string()),
            Bound::Unbounded => ('[', "*".to_string()),
        };
        let (close, high) = match self.upper {
            Bound::Included(v) => (']', v.to_string()),
            Bound::Excluded(v) => ('}', v.to_string()),
            Bound::Unbounded => (']', "*".to_string()),
        };
        write!(f, "{}:{open}{low} TO {high}{close}", self.field)
    }
}
