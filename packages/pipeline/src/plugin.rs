//! Build-tool lifecycle adapter around the [`Orchestrator`]

use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};
use crate::orchestrator::{Capabilities, ComponentOutcome, Orchestrator, PassReport};
use crate::watcher::WatchEvent;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Build,
    Serve,
}

/// The host's dev server, as far as the plugin needs it
pub trait DevServer {
    fn add_watch_path(&mut self, path: &Path);
}

pub struct PrerenderPlugin {
    options: Option<Config>,
    capabilities: Option<Capabilities>,
    mode: Option<Mode>,
    orchestrator: Option<Orchestrator>,
}

impl PrerenderPlugin {
    /// Inline `options` replace the config file entirely when given
    pub fn new(options: Option<Config>) -> Self {
        Self {
            options,
            capabilities: None,
            mode: None,
            orchestrator: None,
        }
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = Some(capabilities);
        self
    }

    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    /// Resolve configuration against the project root; a missing components
    /// directory aborts here
    pub fn config_resolved(&mut self, root: &Path, mode: Mode) -> PipelineResult<()> {
        let config = match self.options.clone() {
            Some(config) => config,
            None => Config::load(root)?,
        };
        let capabilities = self.capabilities.take().unwrap_or_default();

        self.orchestrator = Some(Orchestrator::with_capabilities(root, config, capabilities)?);
        self.mode = Some(mode);
        info!(root = %root.display(), ?mode, "Prerender configured");
        Ok(())
    }

    fn orchestrator(&mut self) -> PipelineResult<&mut Orchestrator> {
        self.orchestrator.as_mut().ok_or(PipelineError::NotConfigured)
    }

    pub fn build_start(&mut self) -> PipelineResult<PassReport> {
        self.orchestrator()?.run_pass()
    }

    pub fn configure_server(&mut self, server: &mut dyn DevServer) -> PipelineResult<PathBuf> {
        let dir = self.orchestrator()?.components_dir().to_path_buf();
        server.add_watch_path(&dir);
        Ok(dir)
    }

    pub fn on_change(&mut self, path: PathBuf) -> PipelineResult<Option<ComponentOutcome>> {
        self.orchestrator()?.handle_event(&WatchEvent::Change(path))
    }

    pub fn on_add(&mut self, path: PathBuf) -> PipelineResult<Option<ComponentOutcome>> {
        self.orchestrator()?.handle_event(&WatchEvent::Add(path))
    }

    pub fn on_remove(&mut self, path: PathBuf) -> PipelineResult<Option<ComponentOutcome>> {
        self.orchestrator()?.handle_event(&WatchEvent::Remove(path))
    }
}
