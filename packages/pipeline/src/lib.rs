//! The prerender build pipeline.
//!
//! Discovers component sources, skips unchanged ones via the content cache,
//! renders the rest (full renderer with structural fallback), extracts their
//! styles and classes, writes cleaned HTML fragments, and emits a tree-shaken
//! stylesheet once per pass. Watch events are applied incrementally.

pub mod config;
pub mod discovery;
pub mod error;
pub mod ledger;
pub mod orchestrator;
pub mod plugin;
pub mod watcher;

pub use config::{Config, DEFAULT_CONFIG_NAME};
pub use discovery::{discover_components, is_component_path};
pub use error::{PipelineError, PipelineResult};
pub use ledger::{StyleContribution, StyleLedger, LEDGER_FILE};
pub use orchestrator::{
    Capabilities, ComponentOutcome, ComponentReport, ComponentState, Orchestrator, PassReport,
};
pub use plugin::{DevServer, Mode, PrerenderPlugin};
pub use watcher::{EventQueue, FileWatcher, WatchEvent, DEFAULT_DEBOUNCE};
