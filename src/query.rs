//! Filters and scored queries over an index snapshot.

pub mod doc_set;
pub mod filter;
pub mod parser;
pub mod range;
pub mod term;
pub mod text;

pub use doc_set::DocSet;
pub use filter::{BooleanFilter, ExecutionId, Filter, FilterContext, MatchAllFilter};
pub use parser::FilterQueryParser;
pub use range::{Bound, NumericRangeFilter};
pub use term::TermFilter;
pub use text::{MatchAllQuery, Query, TextQuery};
