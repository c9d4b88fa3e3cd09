use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const LEGACY_STYLESHEET: &str = "lazy-components.css";
pub const BASE_STYLESHEET: &str = "base.css";

/// Which stylesheets accompany a fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CssMode {
    /// One shared stylesheet, loaded once per session
    #[default]
    Legacy,
    /// `base.css` plus the component's own stylesheet from the manifest
    PerComponent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoaderConfig {
    /// Prefix for fragment and stylesheet URLs
    pub base_url: String,

    /// Stylesheet manifest URL; defaults to `{base_url}/css-manifest.json`
    pub manifest_url: Option<String>,

    pub css_mode: CssMode,

    /// Keep fetched HTML in memory until `clear_cache`
    pub cache_enabled: bool,

    pub retry_attempts: u32,

    /// Base backoff; attempt `n` waits `retry_delay * n`
    #[serde(with = "millis")]
    pub retry_delay: Duration,

    /// How long to watch for secondary resources after an injection
    #[serde(with = "millis")]
    pub resource_window: Duration,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            base_url: "/components".to_string(),
            manifest_url: None,
            css_mode: CssMode::default(),
            cache_enabled: true,
            retry_attempts: 3,
            retry_delay: Duration::from_secs(1),
            resource_window: Duration::from_millis(100),
        }
    }
}

impl LoaderConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn url_for(&self, file: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), file.trim_start_matches('/'))
    }

    pub fn fragment_url(&self, name: &str) -> String {
        self.url_for(&format!("{}.html", name))
    }

    pub fn manifest_url(&self) -> String {
        self.manifest_url
            .clone()
            .unwrap_or_else(|| self.url_for("css-manifest.json"))
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}
