use crate::error::{CacheError, CacheResult};
use prerender_common::write_atomic;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Name of the persisted cache document within the cache directory
pub const CACHE_FILE: &str = "content-cache.json";

/// Source path → content hash of the last successfully written fragment.
///
/// A missing entry means "never rendered or evicted". Entries are kept in a
/// `BTreeMap` so a load followed by an unchanged save is byte-identical.
#[derive(Debug)]
pub struct ContentCache {
    file: PathBuf,
    entries: BTreeMap<String, String>,
    loaded: bool,
}

impl ContentCache {
    pub fn new(cache_dir: impl AsRef<Path>) -> Self {
        Self {
            file: cache_dir.as_ref().join(CACHE_FILE),
            entries: BTreeMap::new(),
            loaded: false,
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file
    }

    /// Read the persisted table once per process.
    ///
    /// A missing or corrupt file is an empty cache, never an error. Entries set
    /// before the first load take precedence over the persisted ones.
    pub fn load(&mut self) {
        if self.loaded {
            return;
        }
        self.loaded = true;

        let content = match std::fs::read_to_string(&self.file) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.file.display(), "No persisted content cache, starting fresh");
                return;
            }
            Err(e) => {
                warn!(path = %self.file.display(), error = %e, "Unreadable content cache, starting fresh");
                return;
            }
        };

        match serde_json::from_str::<BTreeMap<String, String>>(&content) {
            Ok(mut persisted) => {
                persisted.append(&mut self.entries);
                self.entries = persisted;
                debug!(entries = self.entries.len(), "Loaded content cache");
            }
            Err(e) => {
                warn!(path = %self.file.display(), error = %e, "Corrupt content cache, starting fresh");
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// True iff the stored hash for `path` equals `hash` exactly
    pub fn is_cached(&self, path: &str, hash: &str) -> bool {
        self.entries.get(path).map(|stored| stored == hash).unwrap_or(false)
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    pub fn set(&mut self, path: impl Into<String>, hash: impl Into<String>) {
        self.entries.insert(path.into(), hash.into());
    }

    /// Remove an entry; removing a missing entry is a no-op
    pub fn delete(&mut self, path: &str) -> bool {
        self.entries.remove(path).is_some()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the whole table in one atomic replace
    pub fn save(&self) -> CacheResult<()> {
        let mut json = serde_json::to_string_pretty(&self.entries).map_err(|source| {
            CacheError::Serialization {
                path: self.file.clone(),
                source,
            }
        })?;
        json.push('\n');

        write_atomic(&self.file, json.as_bytes())?;
        debug!(path = %self.file.display(), entries = self.entries.len(), "Saved content cache");
        Ok(())
    }
}
