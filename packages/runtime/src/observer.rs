use crate::error::LoadResult;
use async_trait::async_trait;
use std::time::Duration;

/// Viewport intersection trigger.
///
/// Resolves once the element matching `selector` becomes visible. One-shot:
/// implementations stop observing after resolving.
#[async_trait]
pub trait ViewportObserver: Send + Sync {
    async fn wait_until_visible(&self, selector: &str) -> LoadResult<()>;
}

/// A network resource the page fetched on its own (images, fonts) after an injection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEntry {
    pub url: String,
    pub bytes: u64,
}

/// Passive network observation.
#[async_trait]
pub trait ResourceObserver: Send + Sync {
    /// Resources started within `window`; `None` when the capability is unavailable
    async fn collect(&self, window: Duration) -> Option<Vec<ResourceEntry>>;
}
