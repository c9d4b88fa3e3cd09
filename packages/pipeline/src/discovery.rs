use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Whether `path` is a component source under the configured filters.
///
/// Exclude patterns match against the path relative to `dir`, so directories
/// above the components root never exclude anything.
pub fn is_component_path(path: &Path, dir: &Path, extensions: &[String], exclude: &[String]) -> bool {
    let matches_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|allowed| allowed == ext))
        .unwrap_or(false);
    if !matches_extension {
        return false;
    }

    let relative = path.strip_prefix(dir).unwrap_or(path);
    let display = relative.to_string_lossy();
    !exclude.iter().any(|pattern| !pattern.is_empty() && display.contains(pattern.as_str()))
}

/// All component sources under `dir`, sorted for a stable discovery order
pub fn discover_components(dir: &Path, extensions: &[String], exclude: &[String]) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_component_path(path, dir, extensions, exclude))
        .collect();

    paths.sort();
    debug!(dir = %dir.display(), count = paths.len(), "Discovered components");
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn astro() -> Vec<String> {
        vec!["astro".to_string()]
    }

    #[test]
    fn test_discovers_sorted_with_filters() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("nested")).unwrap();
        fs::create_dir_all(dir.path().join("drafts")).unwrap();
        fs::write(dir.path().join("Header.astro"), "").unwrap();
        fs::write(dir.path().join("Footer.astro"), "").unwrap();
        fs::write(dir.path().join("nested/Card.astro"), "").unwrap();
        fs::write(dir.path().join("drafts/Wip.astro"), "").unwrap();
        fs::write(dir.path().join("notes.md"), "").unwrap();

        let found = discover_components(dir.path(), &astro(), &["drafts".to_string()]);
        let names: Vec<_> = found
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();

        assert_eq!(names, vec!["Footer.astro", "Header.astro", "nested/Card.astro"]);
    }

    #[test]
    fn test_is_component_path() {
        let exts = vec!["astro".to_string(), "html".to_string()];
        let dir = Path::new("/a");
        assert!(is_component_path(Path::new("/a/B.astro"), dir, &exts, &[]));
        assert!(is_component_path(Path::new("/a/B.html"), dir, &exts, &[]));
        assert!(!is_component_path(Path::new("/a/B.css"), dir, &exts, &[]));
        assert!(!is_component_path(Path::new("/a/B"), dir, &exts, &[]));
        assert!(!is_component_path(Path::new("/a/old/B.astro"), dir, &exts, &["old/".to_string()]));
    }

    #[test]
    fn test_exclude_ignores_directories_above_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("drafts/site/components");
        fs::create_dir_all(root.join("drafts")).unwrap();
        fs::write(root.join("Header.astro"), "").unwrap();
        fs::write(root.join("drafts/Wip.astro"), "").unwrap();

        let found = discover_components(&root, &astro(), &["drafts".to_string()]);

        assert_eq!(found, vec![root.join("Header.astro")]);
    }

    #[test]
    fn test_missing_dir_is_empty() {
        assert!(discover_components(Path::new("/no/such/dir"), &astro(), &[]).is_empty());
    }
}
