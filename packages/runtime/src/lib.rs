//! Client-side loader for prerendered component fragments.
//!
//! Browser capabilities (HTTP, DOM, viewport and resource observation) are
//! traits, so the loader runs against `reqwest` in a native client and
//! against scripted fakes in tests.

pub mod config;
pub mod document;
pub mod error;
pub mod fetch;
pub mod loader;
pub mod observer;
pub mod stats;

pub use config::{CssMode, LoaderConfig, BASE_STYLESHEET, LEGACY_STYLESHEET};
pub use document::{Document, MemoryDocument};
pub use error::{LoadError, LoadResult};
pub use fetch::{fetch_with_retry, Fetcher, HttpFetcher, Response};
pub use loader::{ErrorCallback, LazyLoader, LazyLoaderBuilder, StylesheetManifest};
pub use observer::{ResourceEntry, ResourceObserver, ViewportObserver};
pub use stats::LoadStats;
