use crate::config::{CssMode, LoaderConfig, BASE_STYLESHEET, LEGACY_STYLESHEET};
use crate::document::Document;
use crate::error::{LoadError, LoadResult};
use crate::fetch::{fetch_with_retry, Fetcher};
use crate::observer::{ResourceObserver, ViewportObserver};
use crate::stats::LoadStats;
use futures::future::join_all;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Component name → stylesheet file, relative to the base URL
pub type StylesheetManifest = HashMap<String, String>;

pub type ErrorCallback = Arc<dyn Fn(&str, &LoadError) + Send + Sync>;

#[derive(Default)]
struct State {
    html: HashMap<String, String>,
    /// Stylesheet URLs attached (or being attached) this session
    stylesheets: HashSet<String>,
    manifest: Option<Arc<StylesheetManifest>>,
    /// Set once a manifest failure forces legacy mode
    degraded: bool,
    stats: LoadStats,
}

struct Inner {
    config: LoaderConfig,
    fetcher: Arc<dyn Fetcher>,
    document: Arc<dyn Document>,
    viewport: Option<Arc<dyn ViewportObserver>>,
    resources: Option<Arc<dyn ResourceObserver>>,
    on_error: Option<ErrorCallback>,
    state: Mutex<State>,
}

/// Loads prerendered fragments and their stylesheets on demand.
///
/// Cloning is cheap; clones share caches and statistics.
#[derive(Clone)]
pub struct LazyLoader {
    inner: Arc<Inner>,
}

pub struct LazyLoaderBuilder {
    config: LoaderConfig,
    fetcher: Arc<dyn Fetcher>,
    document: Arc<dyn Document>,
    viewport: Option<Arc<dyn ViewportObserver>>,
    resources: Option<Arc<dyn ResourceObserver>>,
    on_error: Option<ErrorCallback>,
}

impl LazyLoaderBuilder {
    pub fn viewport(mut self, observer: Arc<dyn ViewportObserver>) -> Self {
        self.viewport = Some(observer);
        self
    }

    pub fn resources(mut self, observer: Arc<dyn ResourceObserver>) -> Self {
        self.resources = Some(observer);
        self
    }

    pub fn on_error(mut self, callback: impl Fn(&str, &LoadError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(callback));
        self
    }

    pub fn build(self) -> LazyLoader {
        LazyLoader {
            inner: Arc::new(Inner {
                config: self.config,
                fetcher: self.fetcher,
                document: self.document,
                viewport: self.viewport,
                resources: self.resources,
                on_error: self.on_error,
                state: Mutex::new(State::default()),
            }),
        }
    }
}

impl LazyLoader {
    pub fn builder(config: LoaderConfig, fetcher: Arc<dyn Fetcher>, document: Arc<dyn Document>) -> LazyLoaderBuilder {
        LazyLoaderBuilder {
            config,
            fetcher,
            document,
            viewport: None,
            resources: None,
            on_error: None,
        }
    }

    pub fn new(config: LoaderConfig, fetcher: Arc<dyn Fetcher>, document: Arc<dyn Document>) -> Self {
        Self::builder(config, fetcher, document).build()
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.inner.config
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// CSS mode in effect, after any manifest degradation
    pub fn css_mode(&self) -> CssMode {
        if self.state().degraded {
            CssMode::Legacy
        } else {
            self.inner.config.css_mode
        }
    }

    /// Fragment HTML for `name`, from the in-memory cache or the network
    pub async fn load(&self, name: &str) -> LoadResult<String> {
        {
            let mut state = self.state();
            state.stats.total_loads += 1;
            if self.inner.config.cache_enabled {
                if let Some(html) = state.html.get(name).cloned() {
                    state.stats.cache_hits += 1;
                    debug!(component = name, "Cache hit");
                    return Ok(html);
                }
            }
            state.stats.cache_misses += 1;
        }

        let started = Instant::now();
        self.ensure_styles(name).await;

        let url = self.inner.config.fragment_url(name);
        let result = fetch_with_retry(
            self.inner.fetcher.as_ref(),
            &url,
            self.inner.config.retry_attempts,
            self.inner.config.retry_delay,
        )
        .await;

        match result {
            Ok(html) => {
                let latency = started.elapsed();
                let mut state = self.state();
                state.stats.record_network_load(html.len(), latency);
                if self.inner.config.cache_enabled {
                    state.html.insert(name.to_string(), html.clone());
                }
                info!(component = name, bytes = html.len(), latency_ms = latency.as_millis() as u64, "Loaded component");
                Ok(html)
            }
            Err(e) => Err(self.report(name, e)),
        }
    }

    /// Load `name` and write it into the element matching `selector`
    pub async fn inject(&self, name: &str, selector: &str) -> LoadResult<()> {
        let html = self.load(name).await?;

        if !self.inner.document.set_inner_html(selector, &html) {
            let error = LoadError::SelectorNotFound {
                selector: selector.to_string(),
            };
            return Err(self.report(name, error));
        }

        debug!(component = name, selector, "Injected component");
        self.observe_resources();
        Ok(())
    }

    /// Inject `name` once `selector` scrolls into view.
    ///
    /// Without a viewport observer the injection starts immediately. Failures
    /// are logged and passed to the error callback.
    pub fn observe_and_load(&self, name: &str, selector: &str) -> JoinHandle<()> {
        let loader = self.clone();
        let name = name.to_string();
        let selector = selector.to_string();

        tokio::spawn(async move {
            if let Some(viewport) = loader.inner.viewport.clone() {
                if let Err(e) = viewport.wait_until_visible(&selector).await {
                    let e = loader.report(&name, e);
                    warn!(component = %name, selector = %selector, error = %e, "Viewport observation failed");
                    return;
                }
            }

            if let Err(e) = loader.inject(&name, &selector).await {
                warn!(component = %name, selector = %selector, error = %e, "Deferred injection failed");
            }
        })
    }

    /// Load several components concurrently
    pub async fn preload<I, S>(&self, names: I) -> Vec<(String, LoadResult<()>)>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let results = join_all(names.iter().map(|name| self.load(name))).await;

        names
            .into_iter()
            .zip(results)
            .map(|(name, result)| (name, result.map(|_| ())))
            .collect()
    }

    /// Drop cached HTML; attached stylesheets stay attached
    pub fn clear_cache(&self) {
        self.state().html.clear();
    }

    pub fn is_cached(&self, name: &str) -> bool {
        self.state().html.contains_key(name)
    }

    pub fn stats(&self) -> LoadStats {
        self.state().stats.clone()
    }

    pub fn reset(&self) {
        self.state().stats = LoadStats::default();
    }

    /// Count the error and hand it to the callback
    fn report(&self, name: &str, error: LoadError) -> LoadError {
        self.state().stats.errors += 1;
        warn!(component = name, error = %error, "Load failed");
        if let Some(callback) = &self.inner.on_error {
            callback(name, &error);
        }
        error
    }

    async fn ensure_styles(&self, name: &str) {
        if self.css_mode() == CssMode::PerComponent {
            match self.manifest().await {
                Ok(manifest) => {
                    self.ensure_stylesheet(&self.inner.config.url_for(BASE_STYLESHEET)).await;
                    if let Some(file) = manifest.get(name) {
                        self.ensure_stylesheet(&self.inner.config.url_for(file)).await;
                    }
                    return;
                }
                Err(e) => {
                    warn!(error = %e, "Stylesheet manifest unavailable, using the shared stylesheet");
                    self.state().degraded = true;
                }
            }
        }

        self.ensure_stylesheet(&self.inner.config.url_for(LEGACY_STYLESHEET)).await;
    }

    async fn manifest(&self) -> LoadResult<Arc<StylesheetManifest>> {
        let cached = self.state().manifest.clone();
        if let Some(manifest) = cached {
            return Ok(manifest);
        }

        let url = self.inner.config.manifest_url();
        let manifest_error = |message: String| LoadError::Manifest {
            url: url.clone(),
            message,
        };

        let body = fetch_with_retry(
            self.inner.fetcher.as_ref(),
            &url,
            self.inner.config.retry_attempts,
            self.inner.config.retry_delay,
        )
        .await
        .map_err(|e| manifest_error(e.to_string()))?;

        let manifest: StylesheetManifest =
            serde_json::from_str(&body).map_err(|e| manifest_error(e.to_string()))?;
        let manifest = Arc::new(manifest);

        debug!(url = %url, entries = manifest.len(), "Loaded stylesheet manifest");
        self.state().manifest = Some(manifest.clone());
        Ok(manifest)
    }

    /// Attach the stylesheet at `url` unless this session already has it
    async fn ensure_stylesheet(&self, url: &str) {
        if !self.state().stylesheets.insert(url.to_string()) {
            return;
        }

        let result = fetch_with_retry(
            self.inner.fetcher.as_ref(),
            url,
            self.inner.config.retry_attempts,
            self.inner.config.retry_delay,
        )
        .await;

        match result {
            Ok(css) => {
                self.inner.document.add_stylesheet(url, &css);
                debug!(url, bytes = css.len(), "Attached stylesheet");
            }
            Err(e) => {
                // allow a later load to try again
                self.state().stylesheets.remove(url);
                warn!(url, error = %e, "Stylesheet failed to load");
            }
        }
    }

    fn observe_resources(&self) {
        let Some(observer) = self.inner.resources.clone() else {
            return;
        };
        let loader = self.clone();
        let window = self.inner.config.resource_window;

        tokio::spawn(async move {
            let Some(entries) = observer.collect(window).await else {
                return;
            };
            let mut state = loader.state();
            state.stats.secondary_assets += entries.len() as u64;
            state.stats.secondary_bytes += entries.iter().map(|entry| entry.bytes).sum::<u64>();
        });
    }
}
