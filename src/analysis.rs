//! Text analysis for tokenized fields.
//!
//! Splits text on Unicode word boundaries (UAX #29) and lowercases each
//! word. Punctuation and whitespace segments are dropped.
//!
//! ```
//! use sarissa_spatial::analysis::UnicodeWordTokenizer;
//!
//! let tokens = UnicodeWordTokenizer::new().tokenize("New Haven, CT");
//! assert_eq!(tokens, vec!["new", "haven", "ct"]);
//! ```

use unicode_segmentation::UnicodeSegmentation;

/// A tokenizer that splits text on Unicode word boundaries.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnicodeWordTokenizer;

impl UnicodeWordTokenizer {
    /// Create a new Unicode word tokenizer.
    pub fn new() -> Self {
        UnicodeWordTokenizer
    }

    /// Split `text` into lowercased words.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.unicode_words().map(|word| word.to_lowercase()).collect()
    }
}
