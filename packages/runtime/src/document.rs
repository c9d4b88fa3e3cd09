use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

/// The page the loader writes into
pub trait Document: Send + Sync {
    /// Replace the content of the element matching `selector`; false when nothing matches
    fn set_inner_html(&self, selector: &str, html: &str) -> bool;

    /// Attach a fetched stylesheet to the page
    fn add_stylesheet(&self, href: &str, css: &str);
}

/// A document held entirely in memory: named mount points and attached stylesheets
#[derive(Debug, Default)]
pub struct MemoryDocument {
    mounts: Mutex<BTreeMap<String, String>>,
    stylesheets: Mutex<Vec<(String, String)>>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an element the loader may target
    pub fn with_mount(self, selector: impl Into<String>) -> Self {
        self.mounts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(selector.into(), String::new());
        self
    }

    pub fn inner_html(&self, selector: &str) -> Option<String> {
        self.mounts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(selector)
            .cloned()
    }

    /// Attached stylesheet hrefs, in attach order
    pub fn stylesheets(&self) -> Vec<String> {
        self.stylesheets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(href, _)| href.clone())
            .collect()
    }

    pub fn stylesheet_css(&self, href: &str) -> Option<String> {
        self.stylesheets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|(h, _)| h == href)
            .map(|(_, css)| css.clone())
    }
}

impl Document for MemoryDocument {
    fn set_inner_html(&self, selector: &str, html: &str) -> bool {
        let mut mounts = self.mounts.lock().unwrap_or_else(PoisonError::into_inner);
        match mounts.get_mut(selector) {
            Some(content) => {
                *content = html.to_string();
                true
            }
            None => false,
        }
    }

    fn add_stylesheet(&self, href: &str, css: &str) {
        self.stylesheets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((href.to_string(), css.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mounts() {
        let doc = MemoryDocument::new().with_mount("#header");

        assert!(doc.set_inner_html("#header", "<header>Hi</header>"));
        assert!(!doc.set_inner_html("#missing", "<p></p>"));
        assert_eq!(doc.inner_html("#header").as_deref(), Some("<header>Hi</header>"));
    }
}
