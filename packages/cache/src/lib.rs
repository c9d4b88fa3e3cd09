//! Content cache: the sole authority on whether a component needs re-rendering.
//!
//! Maps a source path to the content hash recorded when its fragment was last
//! written. The table is read from disk once per process and written back in
//! one atomic operation.

pub mod cache;
pub mod error;

pub use cache::{ContentCache, CACHE_FILE};
pub use error::{CacheError, CacheResult};
