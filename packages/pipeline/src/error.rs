use prerender_cache::CacheError;
use prerender_common::CommonError;
use prerender_compiler_css::CssError;
use prerender_compiler_html::RenderError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Components directory does not exist: {}", path.display())]
    RootNotFound { path: PathBuf },

    #[error("Invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("Plugin used before config_resolved")]
    NotConfigured,

    #[error("Failed to read {}: {source}", path.display())]
    Source {
        path: PathBuf,
        #[source]
        source: CommonError,
    },

    #[error("Render failed for {}: {source}", path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: RenderError,
    },

    #[error("No renderer could handle {}", path.display())]
    NoRenderer { path: PathBuf },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: CommonError,
    },

    #[error("Stylesheet generation failed: {0}")]
    Stylesheet(#[from] CssError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),
}

impl PipelineError {
    /// Failures confined to one component; the pass carries on without it
    pub fn is_component_failure(&self) -> bool {
        matches!(
            self,
            PipelineError::Source { .. }
                | PipelineError::Render { .. }
                | PipelineError::NoRenderer { .. }
                | PipelineError::Write { .. }
        )
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
