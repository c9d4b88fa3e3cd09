use crate::error::{PipelineError, PipelineResult};
use prerender_compiler_css::{CssMode, UtilityConfig};
use prerender_compiler_html::RendererKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "prerender.config.json";

/// Prerender configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory scanned for component sources
    #[serde(default = "default_components_dir")]
    pub components_dir: String,

    /// Directory receiving fragments and stylesheets
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Path substrings excluded from discovery
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Preferred renderer; `full` falls back to `structural`
    #[serde(default)]
    pub renderer: RendererKind,

    #[serde(default = "default_true")]
    pub minify: bool,

    #[serde(rename = "generateUtilityCSS", default = "default_true")]
    pub generate_utility_css: bool,

    /// Directory holding the content cache and style ledger
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,

    /// Component file extensions, without the dot
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    #[serde(default)]
    pub css_mode: CssMode,

    /// Combined stylesheet name in legacy mode
    #[serde(default = "default_stylesheet_name")]
    pub stylesheet_name: String,

    /// Manifest name in per-component mode
    #[serde(default = "default_manifest_name")]
    pub manifest_name: String,

    #[serde(default)]
    pub utility: UtilityConfig,
}

fn default_components_dir() -> String {
    "src/components".to_string()
}

fn default_output_dir() -> String {
    "public/components".to_string()
}

fn default_cache_dir() -> String {
    ".prerender-cache".to_string()
}

fn default_extensions() -> Vec<String> {
    vec!["astro".to_string()]
}

fn default_stylesheet_name() -> String {
    "lazy-components.css".to_string()
}

fn default_manifest_name() -> String {
    "css-manifest.json".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load `prerender.config.json` from `root`, or defaults when absent
    pub fn load(root: &Path) -> PipelineResult<Self> {
        let config_path = root.join(DEFAULT_CONFIG_NAME);

        let content = match std::fs::read_to_string(&config_path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
            Err(e) => {
                return Err(PipelineError::Config {
                    path: config_path,
                    message: e.to_string(),
                })
            }
        };

        serde_json::from_str(&content).map_err(|e| PipelineError::Config {
            path: config_path,
            message: e.to_string(),
        })
    }

    pub fn components_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.components_dir)
    }

    pub fn output_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.output_dir)
    }

    pub fn cache_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.cache_dir)
    }

    pub fn to_json(&self) -> String {
        let mut json = serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string());
        json.push('\n');
        json
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            components_dir: default_components_dir(),
            output_dir: default_output_dir(),
            exclude: vec![],
            renderer: RendererKind::default(),
            minify: true,
            generate_utility_css: true,
            cache_dir: default_cache_dir(),
            extensions: default_extensions(),
            css_mode: CssMode::default(),
            stylesheet_name: default_stylesheet_name(),
            manifest_name: default_manifest_name(),
            utility: UtilityConfig::default(),
        }
    }
}
