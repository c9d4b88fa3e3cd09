//! File system helpers shared by the cache, the stylesheet generator and the pipeline

use crate::error::CommonError;
use crate::result::CommonResult;
use std::io::Write;
use std::path::Path;

/// Write `contents` to `path` without ever exposing a partially written file.
///
/// The bytes go to a sibling temp file first, which is then renamed over the
/// destination. Missing parent directories are created.
pub fn write_atomic(path: &Path, contents: &[u8]) -> CommonResult<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(|e| CommonError::io(parent, e))?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CommonError::Generic(format!("Invalid output path: {}", path.display())))?;
    let tmp_path = parent.join(format!(".{}.{}.tmp", file_name, std::process::id()));

    let result = (|| -> std::io::Result<()> {
        let mut file = std::fs::File::create(&tmp_path)?;
        file.write_all(contents)?;
        file.sync_all()?;
        std::fs::rename(&tmp_path, path)
    })();

    if let Err(e) = result {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(CommonError::io(path, e));
    }

    Ok(())
}

/// Remove a file, treating an already-missing file as success
pub fn remove_if_exists(path: &Path) -> CommonResult<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(CommonError::io(path, e)),
    }
}
