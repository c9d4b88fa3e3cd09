use crate::error::CommonError;
use crate::hash::ContentHash;
use crate::result::CommonResult;
use std::path::{Path, PathBuf};

/// A component source file as read at the start of one pipeline pass.
///
/// Immutable once read; the pipeline re-reads it on every pass.
#[derive(Debug, Clone)]
pub struct SourceComponent {
    pub path: PathBuf,
    pub content: String,
    pub hash: ContentHash,
    pub name: String,
}

impl SourceComponent {
    pub fn read(path: &Path) -> CommonResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| CommonError::io(path, e))?;
        let hash = ContentHash::from_bytes(&bytes);
        let content = String::from_utf8(bytes)
            .map_err(|e| CommonError::Generic(format!("{} is not valid UTF-8: {}", path.display(), e)))?;

        Ok(Self {
            path: path.to_path_buf(),
            name: logical_name(path),
            content,
            hash,
        })
    }
}

/// Logical component name: the file stem (`src/components/Footer.astro` → `Footer`)
pub fn logical_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("component")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_name() {
        assert_eq!(logical_name(Path::new("/site/src/components/Footer.astro")), "Footer");
        assert_eq!(logical_name(Path::new("Nav.bar.astro")), "Nav.bar");
    }

    #[test]
    fn test_read_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Header.astro");
        std::fs::write(&path, "<header>Hi</header>").unwrap();

        let source = SourceComponent::read(&path).unwrap();
        assert_eq!(source.name, "Header");
        assert_eq!(source.content, "<header>Hi</header>");
        assert_eq!(source.hash, ContentHash::from_bytes(b"<header>Hi</header>"));
    }

    #[test]
    fn test_read_missing_source_is_not_found() {
        let err = SourceComponent::read(Path::new("/definitely/missing/Card.astro")).unwrap_err();
        assert!(err.is_not_found());
    }
}
