use prerender_cache::CacheError;
use prerender_common::write_atomic;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const LEDGER_FILE: &str = "style-ledger.json";

/// What one written fragment contributed to the stylesheet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleContribution {
    pub component: String,
    #[serde(default)]
    pub classes: BTreeSet<String>,
    #[serde(default)]
    pub styles: Vec<String>,
}

/// Per-source stylesheet contributions, persisted next to the content cache.
///
/// Cached components are not re-rendered, so their classes and style blocks
/// are replayed from here to keep every generated stylesheet complete.
#[derive(Debug)]
pub struct StyleLedger {
    file: PathBuf,
    entries: BTreeMap<String, StyleContribution>,
    loaded: bool,
}

impl StyleLedger {
    pub fn new(cache_dir: impl AsRef<Path>) -> Self {
        Self {
            file: cache_dir.as_ref().join(LEDGER_FILE),
            entries: BTreeMap::new(),
            loaded: false,
        }
    }

    pub fn load(&mut self) {
        if self.loaded {
            return;
        }
        self.loaded = true;

        let Ok(content) = std::fs::read_to_string(&self.file) else {
            debug!(path = %self.file.display(), "No style ledger, starting fresh");
            return;
        };

        match serde_json::from_str::<BTreeMap<String, StyleContribution>>(&content) {
            Ok(mut persisted) => {
                persisted.append(&mut self.entries);
                self.entries = persisted;
            }
            Err(e) => warn!(path = %self.file.display(), error = %e, "Corrupt style ledger, starting fresh"),
        }
    }

    pub fn get(&self, path: &str) -> Option<&StyleContribution> {
        self.entries.get(path)
    }

    pub fn set(&mut self, path: impl Into<String>, contribution: StyleContribution) {
        self.entries.insert(path.into(), contribution);
    }

    pub fn remove(&mut self, path: &str) -> Option<StyleContribution> {
        self.entries.remove(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn save(&self) -> Result<(), CacheError> {
        let mut json = serde_json::to_string_pretty(&self.entries).map_err(|source| {
            CacheError::Serialization {
                path: self.file.clone(),
                source,
            }
        })?;
        json.push('\n');
        write_atomic(&self.file, json.as_bytes())?;
        Ok(())
    }
}
