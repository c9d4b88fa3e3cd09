use crate::config::Config;
use crate::discovery::{discover_components, is_component_path};
use crate::error::{PipelineError, PipelineResult};
use crate::ledger::{StyleContribution, StyleLedger};
use crate::watcher::{FileWatcher, WatchEvent};
use prerender_cache::ContentCache;
use prerender_common::{logical_name, remove_if_exists, write_atomic, SourceComponent};
use prerender_compiler_css::{
    clean_html, extract_classes, extract_styles, CssMode, GenerateOutcome, RuleTableCompiler, StylesheetGenerator,
    UtilityCompiler,
};
use prerender_compiler_html::{
    calculate_compression_ratio, minify_html, BuiltinCompiler, ComponentCompiler, FullRenderer, LocalModuleContext, ModuleExecutor, Renderer,
    RendererKind, StructuralRenderer,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Lifecycle of one component within a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentState {
    Discovered,
    Cached,
    Rendering,
    Rendered,
    Extracting,
    Written,
    Failed,
}

#[derive(Debug)]
pub enum ComponentOutcome {
    /// Hash matched the cache; nothing rendered or written
    Cached,
    Written { fragment: PathBuf, renderer: RendererKind },
    Failed(PipelineError),
}

impl ComponentOutcome {
    pub fn state(&self) -> ComponentState {
        match self {
            ComponentOutcome::Cached => ComponentState::Cached,
            ComponentOutcome::Written { .. } => ComponentState::Written,
            ComponentOutcome::Failed(_) => ComponentState::Failed,
        }
    }
}

#[derive(Debug)]
pub struct ComponentReport {
    pub path: PathBuf,
    pub name: String,
    pub outcome: ComponentOutcome,
}

#[derive(Debug)]
pub struct PassReport {
    pub components: Vec<ComponentReport>,
    pub stylesheet: GenerateOutcome,
}

impl PassReport {
    fn count(&self, state: ComponentState) -> usize {
        self.components.iter().filter(|c| c.outcome.state() == state).count()
    }

    pub fn written(&self) -> usize {
        self.count(ComponentState::Written)
    }

    pub fn cached(&self) -> usize {
        self.count(ComponentState::Cached)
    }

    pub fn failed(&self) -> usize {
        self.count(ComponentState::Failed)
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &PipelineError)> {
        self.components.iter().filter_map(|c| match &c.outcome {
            ComponentOutcome::Failed(e) => Some((c.path.as_path(), e)),
            _ => None,
        })
    }
}

/// Pluggable capabilities behind the pipeline
pub struct Capabilities {
    pub compiler: Arc<dyn ComponentCompiler>,
    /// Module context for the full renderer; `None` means it always declines
    pub module_context: Option<Arc<dyn ModuleExecutor>>,
    pub utility: Arc<dyn UtilityCompiler>,
}

impl Default for Capabilities {
    fn default() -> Self {
        let compiler: Arc<dyn ComponentCompiler> = Arc::new(BuiltinCompiler);
        Self {
            module_context: Some(Arc::new(LocalModuleContext::new(compiler.clone()))),
            compiler,
            utility: Arc::new(RuleTableCompiler),
        }
    }
}

/// Drives discovery, cache checks, rendering, extraction and output for a
/// project root. One instance owns the cache and stylesheet state for the
/// whole process.
pub struct Orchestrator {
    config: Config,
    components_dir: PathBuf,
    output_dir: PathBuf,
    cache: ContentCache,
    ledger: StyleLedger,
    stylesheet: StylesheetGenerator,
    renderers: Vec<Box<dyn Renderer>>,
}

impl Orchestrator {
    pub fn new(root: &Path, config: Config) -> PipelineResult<Self> {
        Self::with_capabilities(root, config, Capabilities::default())
    }

    pub fn with_capabilities(root: &Path, config: Config, capabilities: Capabilities) -> PipelineResult<Self> {
        let components_dir = config.components_dir(root);
        if !components_dir.is_dir() {
            return Err(PipelineError::RootNotFound { path: components_dir });
        }
        // cache keys are canonical paths; event paths are resolved the same way
        let components_dir = std::fs::canonicalize(&components_dir).unwrap_or(components_dir);

        let renderers = config
            .renderer
            .fallback_order()
            .iter()
            .map(|kind| -> Box<dyn Renderer> {
                match kind {
                    RendererKind::Full => Box::new(FullRenderer::new(capabilities.module_context.clone())),
                    RendererKind::Structural => Box::new(StructuralRenderer::new(capabilities.compiler.clone())),
                }
            })
            .collect();

        let stylesheet = StylesheetGenerator::new(
            config.utility.clone(),
            config.generate_utility_css,
            capabilities.utility,
        );

        Ok(Self {
            output_dir: config.output_dir(root),
            cache: ContentCache::new(config.cache_dir(root)),
            ledger: StyleLedger::new(config.cache_dir(root)),
            components_dir,
            stylesheet,
            renderers,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn components_dir(&self) -> &Path {
        &self.components_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }

    pub fn fragment_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{}.html", name))
    }

    fn discover(&self) -> Vec<PathBuf> {
        discover_components(&self.components_dir, &self.config.extensions, &self.config.exclude)
    }

    fn ensure_loaded(&mut self) {
        self.cache.load();
        self.ledger.load();
    }

    /// Process every discovered component, then write the stylesheet and the cache once
    pub fn run_pass(&mut self) -> PipelineResult<PassReport> {
        self.ensure_loaded();

        let paths = self.discover();
        info!(count = paths.len(), dir = %self.components_dir.display(), "Starting prerender pass");

        let mut components = Vec::with_capacity(paths.len());
        for path in &paths {
            let outcome = self.process_component(path);
            components.push(ComponentReport {
                path: path.clone(),
                name: logical_name(path),
                outcome,
            });
        }

        let stylesheet = self.finish(&paths)?;
        let report = PassReport { components, stylesheet };
        info!(
            written = report.written(),
            cached = report.cached(),
            failed = report.failed(),
            "Prerender pass complete"
        );
        Ok(report)
    }

    /// Apply one watch event incrementally
    pub fn handle_event(&mut self, event: &WatchEvent) -> PipelineResult<Option<ComponentOutcome>> {
        let path = canonical_event_path(event.path());
        if !is_component_path(&path, &self.components_dir, &self.config.extensions, &self.config.exclude) {
            debug!(path = %path.display(), "Ignoring non-component path");
            return Ok(None);
        }

        self.ensure_loaded();

        let outcome = match event {
            WatchEvent::Change(_) | WatchEvent::Add(_) => {
                info!(path = %path.display(), "Component changed");
                Some(self.process_component(&path))
            }
            WatchEvent::Remove(_) => {
                info!(path = %path.display(), "Component removed");
                self.remove_component(&path)?;
                None
            }
        };

        let paths = self.discover();
        self.finish(&paths)?;
        Ok(outcome)
    }

    /// Block on file system events under the components directory
    pub fn watch(&mut self, debounce: Duration) -> PipelineResult<()> {
        let watcher = FileWatcher::new(&self.components_dir)?;
        info!(dir = %self.components_dir.display(), "Watching for changes");

        while let Some(batch) = watcher.next_batch(debounce) {
            let events = match batch {
                Ok(events) => events,
                Err(e) => {
                    warn!(error = %e, "Watch error");
                    continue;
                }
            };
            for event in &events {
                if let Err(e) = self.handle_event(event) {
                    error!(path = %event.path().display(), error = %e, "Failed to apply change");
                }
            }
        }

        Ok(())
    }

    fn process_component(&mut self, path: &Path) -> ComponentOutcome {
        let key = cache_key(path);
        debug!(path = %key, state = ?ComponentState::Discovered, "Component");

        let source = match SourceComponent::read(path) {
            Ok(source) => source,
            Err(source) => {
                return self.fail(
                    &key,
                    PipelineError::Source {
                        path: path.to_path_buf(),
                        source,
                    },
                )
            }
        };

        // without a ledger entry a cached component would drop out of the stylesheet
        if self.cache.is_cached(&key, source.hash.as_str()) && self.ledger.get(&key).is_some() {
            debug!(path = %key, state = ?ComponentState::Cached, "Component");
            return ComponentOutcome::Cached;
        }

        debug!(path = %key, state = ?ComponentState::Rendering, "Component");
        let (renderer, html) = match self.render_with_fallback(path) {
            Ok(rendered) => rendered,
            Err(e) => return self.fail(&key, e),
        };

        debug!(path = %key, state = ?ComponentState::Rendered, renderer = %renderer, "Component");
        debug!(path = %key, state = ?ComponentState::Extracting, "Component");
        let contribution = StyleContribution {
            component: source.name.clone(),
            classes: extract_classes(&html),
            styles: extract_styles(&html),
        };

        let cleaned = clean_html(&html);
        let fragment_html = if self.config.minify {
            let minified = minify_html(&cleaned);
            debug!(
                path = %key,
                saved_percent = calculate_compression_ratio(cleaned.len(), minified.len()),
                "Minified fragment"
            );
            minified
        } else {
            cleaned
        };

        let fragment = self.fragment_path(&source.name);
        if let Err(source) = write_atomic(&fragment, fragment_html.as_bytes()) {
            return self.fail(&key, PipelineError::Write { path: fragment, source });
        }

        self.ledger.set(key.clone(), contribution);
        self.cache.set(key.clone(), source.hash.as_str());
        debug!(path = %key, state = ?ComponentState::Written, fragment = %fragment.display(), "Component");

        ComponentOutcome::Written { fragment, renderer }
    }

    fn fail(&self, key: &str, error: PipelineError) -> ComponentOutcome {
        error!(path = %key, state = ?ComponentState::Failed, error = %error, "Component failed");
        ComponentOutcome::Failed(error)
    }

    fn render_with_fallback(&self, path: &Path) -> PipelineResult<(RendererKind, String)> {
        for renderer in &self.renderers {
            match renderer.render(path) {
                Ok(Some(html)) => return Ok((renderer.kind(), html)),
                Ok(None) => {
                    debug!(path = %path.display(), renderer = %renderer.kind(), "Renderer declined, falling back");
                }
                Err(source) => {
                    return Err(PipelineError::Render {
                        path: path.to_path_buf(),
                        source,
                    })
                }
            }
        }
        Err(PipelineError::NoRenderer {
            path: path.to_path_buf(),
        })
    }

    fn remove_component(&mut self, path: &Path) -> PipelineResult<()> {
        let key = cache_key(path);
        let name = logical_name(path);

        self.cache.delete(&key);
        self.ledger.remove(&key);

        let fragment = self.fragment_path(&name);
        remove_if_exists(&fragment).map_err(|source| PipelineError::Write {
            path: fragment.clone(),
            source,
        })?;

        if self.config.css_mode == CssMode::PerComponent {
            let css = self.output_dir.join(format!("{}.css", name));
            remove_if_exists(&css).map_err(|source| PipelineError::Write { path: css, source })?;
        }
        Ok(())
    }

    /// Rebuild the stylesheet from the ledger in discovery order, then persist state
    fn finish(&mut self, paths: &[PathBuf]) -> PipelineResult<GenerateOutcome> {
        self.stylesheet.clear();
        for path in paths {
            if let Some(contribution) = self.ledger.get(&cache_key(path)) {
                self.stylesheet.add_classes(contribution.classes.iter().cloned());
                self.stylesheet
                    .add_styles(&contribution.component, contribution.styles.iter().cloned());
            }
        }

        let generated = match self.config.css_mode {
            CssMode::Legacy => self
                .stylesheet
                .generate(&self.output_dir.join(&self.config.stylesheet_name)),
            CssMode::PerComponent => self
                .stylesheet
                .generate_per_component(&self.output_dir, &self.config.manifest_name),
        };

        self.cache.save()?;
        self.ledger.save()?;
        Ok(generated?)
    }
}

fn cache_key(path: &Path) -> String {
    path.display().to_string()
}

/// Resolve a host-supplied event path to the form discovery produces.
///
/// Only the parent is canonicalized: a removed file no longer exists, and a
/// symlinked component keeps its own name during discovery.
fn canonical_event_path(path: &Path) -> PathBuf {
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => {
            let parent = if parent.as_os_str().is_empty() { Path::new(".") } else { parent };
            std::fs::canonicalize(parent)
                .map(|parent| parent.join(name))
                .unwrap_or_else(|_| path.to_path_buf())
        }
        _ => path.to_path_buf(),
    }
}
