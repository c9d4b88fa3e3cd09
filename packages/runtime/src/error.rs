use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    /// One request failed below the HTTP layer
    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("Failed to fetch {url} after {attempts} attempt(s): {message}")]
    Network {
        url: String,
        attempts: u32,
        message: String,
    },

    #[error("Not found: {url}")]
    NotFound { url: String },

    #[error("No element matches selector '{selector}'")]
    SelectorNotFound { selector: String },

    #[error("Invalid stylesheet manifest at {url}: {message}")]
    Manifest { url: String, message: String },

    #[error("Viewport observation failed: {0}")]
    Viewport(String),
}

impl LoadError {
    /// Whether another attempt could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, LoadError::Transport { .. } | LoadError::Network { .. })
    }
}

pub type LoadResult<T> = Result<T, LoadError>;
