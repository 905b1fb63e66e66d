//! Parser for filter-query strings.

use std::iter::Peekable;
use std::str::Chars;
use std::sync::Arc;

use crate::error::{Result, SarissaError};
use crate::query::filter::{BooleanFilter, Filter, MatchAllFilter};
use crate::query::range::{Bound, NumericRangeFilter};
use crate::query::term::TermFilter;
use crate::schema::Schema;

/// Parses filter queries such as `rating:4.0` or `lat:[40 TO 41] AND open:true`.
///
/// Supported syntax:
/// - Match all: `*:*`
/// - Exact values: `field:value`, `field:"quoted value"`
/// - Ranges: `field:[lo TO hi]`, `field:{lo TO hi}`, `*` for an open end
/// - Conjunction: clauses separated by whitespace or `AND`
///
/// Range clauses are checked against the schema and fail with
/// [`SarissaError::UnsupportedFieldEncoding`] on non-numeric fields.
#[derive(Debug, Clone)]
pub struct FilterQueryParser {
    schema: Arc<Schema>,
}

impl FilterQueryParser {
    /// Create a parser bound to a schema.
    pub fn new(schema: Arc<Schema>) -> Self {
        FilterQueryParser { schema }
    }

    /// Parse a filter query string.
    pub fn parse(&self, input: &str) -> Result<Arc<dyn Filter>> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(SarissaError::query("Empty filter query"));
        }

        let mut parser = ClauseParser {
            chars: trimmed.chars().peekable(),
            schema: &self.schema,
        };
        let mut clauses = Vec::new();
        while let Some(clause) = parser.next_clause()? {
            clauses.push(clause);
        }

        if clauses.len() == 1 {
            return Ok(clauses.remove(0));
        }
        let mut filter = BooleanFilter::new();
        for clause in clauses {
            filter.add_must(clause);
        }
        Ok(Arc::new(filter))
    }
}

struct ClauseParser<'a> {
    chars: Peekable<Chars<'a>>,
    schema: &'a Schema,
}

impl ClauseParser<'_> {
    fn next_clause(&mut self) -> Result<Option<Arc<dyn Filter>>> {
        self.skip_whitespace();
        if self.chars.peek().is_none() {
            return Ok(None);
        }

        let field = self.read_until(|c| c == ':' || c.is_whitespace());
        if field == "AND" {
            return self.next_clause();
        }
        if self.chars.next() != Some(':') || field.is_empty() {
            return Err(SarissaError::query(format!(
                "Expected 'field:value' in filter query, found '{field}'"
            )));
        }

        match self.chars.peek() {
            Some('[') | Some('{') => self.parse_range(field).map(Some),
            Some('"') => {
                self.chars.next();
                let value = self.read_until(|c| c == '"');
                if self.chars.next() != Some('"') {
                    return Err(SarissaError::query("Unterminated quoted value"));
                }
                Ok(Some(Arc::new(TermFilter::new(field, value))))
            }
            _ => {
                let value = self.read_until(char::is_whitespace);
                if value.is_empty() {
                    return Err(SarissaError::query(format!("Missing value for field '{field}'")));
                }
                if field == "*" && value == "*" {
                    return Ok(Some(Arc::new(MatchAllFilter::new())));
                }
                Ok(Some(Arc::new(TermFilter::new(field, value))))
            }
        }
    }

    fn parse_range(&mut self, field: String) -> Result<Arc<dyn Filter>> {
        let inclusive_low = self.chars.next() == Some('[');
        let body = self.read_until(|c| c == ']' || c == '}');
        let inclusive_high = match self.chars.next() {
            Some(']') => true,
            Some('}') => false,
            _ => return Err(SarissaError::query(format!("Unterminated range on '{field}'"))),
        };

        let parts: Vec<&str> = body.split_whitespace().collect();
        let [low, to, high] = parts.as_slice() else {
            return Err(SarissaError::query(format!(
                "Expected '[lo TO hi]' on '{field}', found '{body}'"
            )));
        };
        if *to != "TO" {
            return Err(SarissaError::query(format!(
                "Expected 'TO' in range on '{field}', found '{to}'"
            )));
        }

        let lower = parse_bound(low, inclusive_low)?;
        let upper = parse_bound(high, inclusive_high)?;
        let filter = NumericRangeFilter::for_schema(self.schema, field, lower, upper)?;
        Ok(Arc::new(filter))
    }

    fn skip_whitespace(&mut self) {
        while self.chars.peek().is_some_and(|c| c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn read_until<P: Fn(char) -> bool>(&mut self, stop: P) -> String {
        let mut out = String::new();
        while let Some(&c) = self.chars.peek() {
            if stop(c) {
                break;
            }
            out.push(c);
            self.chars.next();
        }
        out
    }
}

fn parse_bound(text: &str, inclusive: bool) -> Result<Bound<f64>> {
    if text == "*" {
        return Ok(Bound::Unbounded);
    }
    let value: f64 = text
        .parse()
        .map_err(|_| SarissaError::query(format!("Invalid range bound '{text}'")))?;
    Ok(if inclusive {
        Bound::Included(value)
    } else {
        Bound::Excluded(value)
    })
}
