use prerender_common::CommonError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CssError {
    #[error("Utility CSS compilation failed: {0}")]
    Compile(String),

    #[error("Failed to serialize stylesheet manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("Failed to write stylesheet: {0}")]
    Write(#[from] CommonError),
}

pub type CssResult<T> = Result<T, CssError>;
