//! Query-local parameters: `{!key=value key2='quoted value'}body`.

use std::collections::BTreeMap;

use crate::error::{Result, SarissaError};

/// Options attached to a single query clause.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalParams {
    values: BTreeMap<String, String>,
}

impl LocalParams {
    /// Create an empty set of local params.
    pub fn new() -> Self {
        LocalParams::default()
    }

    /// Split `raw` into its local params and the remaining body.
    ///
    /// Without a leading `{!` the whole (trimmed) string is the body and no
    /// options apply. Values may be wrapped in single or double quotes.
    pub fn parse(raw: &str) -> Result<(LocalParams, &str)> {
        let trimmed = raw.trim();
        let Some(rest) = trimmed.strip_prefix("{!") else {
            return Ok((LocalParams::new(), trimmed));
        };

        let mut params = LocalParams::new();
        let mut chars = rest.char_indices().peekable();
        loop {
            while chars.peek().is_some_and(|(_, c)| c.is_whitespace()) {
                chars.next();
            }
            let Some(&(start, c)) = chars.peek() else {
                return Err(SarissaError::malformed_query(format!(
                    "Unterminated local params in '{raw}'"
                )));
            };
            if c == '}' {
                let body = &rest[start + 1..];
                return Ok((params, body.trim()));
            }

            let mut key = String::new();
            while let Some(&(_, c)) = chars.peek() {
                if c == '=' || c == '}' || c.is_whitespace() {
                    break;
                }
                key.push(c);
                chars.next();
            }
            if chars.next().map(|(_, c)| c) != Some('=') || key.is_empty() {
                return Err(SarissaError::malformed_query(format!(
                    "Expected key=value in local params of '{raw}'"
                )));
            }

            let mut value = String::new();
            match chars.peek().map(|&(_, c)| c) {
                Some(quote @ ('\'' | '"')) => {
                    chars.next();
                    let mut closed = false;
                    for (_, c) in chars.by_ref() {
                        if c == quote {
                            closed = true;
                            break;
                        }
                        value.push(c);
                    }
                    if !closed {
                        return Err(SarissaError::malformed_query(format!(
                            "Unterminated quoted value for '{key}'"
                        )));
                    }
                }
                _ => {
                    while let Some(&(_, c)) = chars.peek() {
                        if c == '}' || c.is_whitespace() {
                            break;
                        }
                        value.push(c);
                        chars.next();
                    }
                }
            }
            params.values.insert(key, value);
        }
    }

    /// Set an option.
    pub fn set<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.values.insert(key.into(), value.into());
    }

    /// Get an option.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Iterate over option names.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of options.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if no options are set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_options() {
        let (params, body) = LocalParams::parse("{!radius=10 sort=true}40.7,-74.0").unwrap();
        assert_eq!(params.get("radius"), Some("10"));
        assert_eq!(params.get("sort"), Some("true"));
        assert_eq!(body, "40.7,-74.0");
    }

    #[test]
    fn test_parse_without_options() {
        let (params, body) = LocalParams::parse("  40.7,-74.0 ").unwrap();
        assert!(params.is_empty());
        assert_eq!(body, "40.7,-74.0");
    }

    #[test]
    fn test_parse_quoted_and_empty() {
        let (params, body) = LocalParams::parse("{! note='a b}c' }x").unwrap();
        assert_eq!(params.get("note"), Some("a b}c"));
        assert_eq!(body, "x");

        let (params, body) = LocalParams::parse("{!}y").unwrap();
        assert!(params.is_empty());
        assert_eq!(body, "y");
    }

    #[test]
    fn test_parse_errors() {
        for raw in ["{!radius=10", "{!radius}x", "{!=3}x", "{!a='b}x"] {
            let err = LocalParams::parse(raw).unwrap_err();
            assert!(
                matches!(err, SarissaError::MalformedQuerySyntax(_)),
                "{raw} gave {err:?}"
            );
        }
    }
}
