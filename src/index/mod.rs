//! Index module for Sarissa.
//!
//! An in-memory index: [`MemoryIndex`] is the writer side, and every commit
//! publishes an immutable [`MemoryIndexReader`] snapshot that queries run
//! against. Each snapshot carries a generation number that caches key on.

#[allow(clippy::module_inception)]
pub mod index;
pub mod reader;

/// Internal document identifier, dense within one reader snapshot.
pub type DocId = u32;

pub use index::{IndexStats, MemoryIndex};
pub use reader::{IndexReader, MemoryIndexReader};
