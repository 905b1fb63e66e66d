//! Search pipeline: requests, sorting, filter caching and pluggable
//! search components.

pub mod cache;
pub mod component;
pub mod engine;
pub mod local_params;
pub mod request;
pub mod response;
pub mod sort;

pub use self::cache::{CacheStats, FilterCache};
pub use self::component::{ComponentExecution, QueryContext, SearchComponent};
pub use self::engine::{EngineConfig, SearchEngine};
pub use self::local_params::LocalParams;
pub use self::request::{Params, SearchRequest};
pub use self::response::{SearchHit, SearchResponse};
pub use self::sort::{DocComparator, SortEntry, SortKey, SortOrder, SortSpec};
