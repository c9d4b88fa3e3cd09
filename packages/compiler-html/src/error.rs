use prerender_common::CommonError;
use prerender_parser::ParseError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort rendering of a single component
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to read component source: {0}")]
    Source(#[from] CommonError),

    #[error("Parse error in {}: {error}", path.display())]
    Parse {
        path: PathBuf,
        source_text: String,
        error: ParseError,
    },

    #[error("Component `{name}` used in {} is not imported", importer.display())]
    UnresolvedComponent { name: String, importer: PathBuf },

    #[error("Circular component import: {chain}")]
    CircularImport { chain: String },

    #[error("Module execution failed for {}: {message}", path.display())]
    Execution { path: PathBuf, message: String },

    #[error("Malformed HTML from {}: {message}", path.display())]
    Extraction { path: PathBuf, message: String },
}

pub type RenderResult<T> = Result<T, RenderError>;
