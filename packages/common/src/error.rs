use std::path::PathBuf;
use thiserror::Error;

/// Errors shared by every prerender crate that touches the file system
#[derive(Error, Debug)]
pub enum CommonError {
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Generic error: {0}")]
    Generic(String),
}

impl CommonError {
    /// Wrap an IO error, mapping `ErrorKind::NotFound` onto [`CommonError::NotFound`]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            CommonError::NotFound { path }
        } else {
            CommonError::Io { path, source }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CommonError::NotFound { .. })
    }
}

impl From<String> for CommonError {
    fn from(s: String) -> Self {
        CommonError::Generic(s)
    }
}

impl From<&str> for CommonError {
    fn from(s: &str) -> Self {
        CommonError::Generic(s.to_string())
    }
}
