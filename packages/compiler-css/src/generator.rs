use crate::error::CssResult;
use crate::utility::{UtilityCompiler, UtilityConfig};
use prerender_common::write_atomic;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// File name of the shared stylesheet in per-component mode
pub const BASE_STYLESHEET: &str = "base.css";

/// Raw CSS from one `<style>` block, tagged with its component for provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleBlock {
    pub component: String,
    pub css: String,
}

/// How extracted CSS is laid out on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CssMode {
    /// One combined stylesheet
    #[default]
    Legacy,
    /// `base.css` + one stylesheet per component + a manifest
    PerComponent,
}

/// Component name → stylesheet file, relative to the output directory
pub type StylesheetManifest = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq)]
pub enum GenerateOutcome {
    /// Nothing accumulated (or nothing left to write); no file touched
    Skipped,
    Written {
        path: PathBuf,
        bytes: usize,
    },
    Split {
        base: PathBuf,
        manifest: PathBuf,
        components: usize,
    },
}

/// Accumulates classes and style blocks over one pipeline pass and writes
/// the tree-shaken stylesheet.
pub struct StylesheetGenerator {
    classes: BTreeSet<String>,
    styles: Vec<StyleBlock>,
    generate_utility: bool,
    config: UtilityConfig,
    compiler: Arc<dyn UtilityCompiler>,
}

impl StylesheetGenerator {
    pub fn new(config: UtilityConfig, generate_utility: bool, compiler: Arc<dyn UtilityCompiler>) -> Self {
        Self {
            classes: BTreeSet::new(),
            styles: Vec::new(),
            generate_utility,
            config,
            compiler,
        }
    }

    pub fn add_classes<I, S>(&mut self, classes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classes.extend(classes.into_iter().map(Into::into));
    }

    pub fn add_styles<I, S>(&mut self, component: &str, styles: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.styles.extend(styles.into_iter().map(|css| StyleBlock {
            component: component.to_string(),
            css: css.into(),
        }));
    }

    pub fn clear(&mut self) {
        self.classes.clear();
        self.styles.clear();
    }

    pub fn classes(&self) -> &BTreeSet<String> {
        &self.classes
    }

    pub fn styles(&self) -> &[StyleBlock] {
        &self.styles
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.styles.is_empty()
    }

    /// Utility rules for exactly the accumulated classes, or `None` when disabled
    fn utility_css(&self) -> CssResult<Option<String>> {
        if !self.generate_utility {
            return Ok(None);
        }
        let css = self.compiler.compile(&self.config, &self.classes)?;
        debug!(classes = self.classes.len(), bytes = css.len(), "Compiled utility CSS");
        Ok(Some(css))
    }

    /// Combined stylesheet text: utility rules, then style blocks in discovery order
    pub fn render(&self) -> CssResult<Option<String>> {
        if self.is_empty() {
            return Ok(None);
        }

        let utility = self.utility_css()?;
        if utility.is_none() && self.styles.is_empty() {
            return Ok(None);
        }

        let mut css = utility.unwrap_or_default();
        let components = concat_blocks(self.styles.iter());
        if !components.is_empty() {
            if !css.is_empty() {
                css.push('\n');
            }
            css.push_str(&components);
        }

        Ok(Some(css))
    }

    /// Write the combined stylesheet to `output_path`
    pub fn generate(&self, output_path: &Path) -> CssResult<GenerateOutcome> {
        let Some(css) = self.render()? else {
            info!("No classes or styles collected, skipping stylesheet");
            return Ok(GenerateOutcome::Skipped);
        };

        write_atomic(output_path, css.as_bytes())?;
        info!(
            path = %output_path.display(),
            classes = self.classes.len(),
            styles = self.styles.len(),
            bytes = css.len(),
            "Wrote stylesheet"
        );

        Ok(GenerateOutcome::Written {
            path: output_path.to_path_buf(),
            bytes: css.len(),
        })
    }

    /// Write `base.css`, one `<Component>.css` per styled component, and the manifest
    pub fn generate_per_component(&self, output_dir: &Path, manifest_name: &str) -> CssResult<GenerateOutcome> {
        if self.is_empty() {
            info!("No classes or styles collected, skipping stylesheets");
            return Ok(GenerateOutcome::Skipped);
        }

        let base = output_dir.join(BASE_STYLESHEET);
        let base_css = self.utility_css()?.unwrap_or_default();
        write_atomic(&base, base_css.as_bytes())?;

        let mut by_component: BTreeMap<&str, Vec<&StyleBlock>> = BTreeMap::new();
        for block in &self.styles {
            by_component.entry(block.component.as_str()).or_default().push(block);
        }

        let mut manifest = StylesheetManifest::new();
        for (component, blocks) in &by_component {
            let file_name = format!("{}.css", component);
            write_atomic(&output_dir.join(&file_name), concat_blocks(blocks.iter().copied()).as_bytes())?;
            manifest.insert(component.to_string(), file_name);
        }

        let manifest_path = output_dir.join(manifest_name);
        let mut json = serde_json::to_string_pretty(&manifest)?;
        json.push('\n');
        write_atomic(&manifest_path, json.as_bytes())?;

        info!(
            base = %base.display(),
            manifest = %manifest_path.display(),
            components = manifest.len(),
            "Wrote per-component stylesheets"
        );

        Ok(GenerateOutcome::Split {
            base,
            manifest: manifest_path,
            components: manifest.len(),
        })
    }
}

fn concat_blocks<'a>(blocks: impl Iterator<Item = &'a StyleBlock>) -> String {
    let mut css = String::new();
    for block in blocks {
        css.push_str(&format!("/* {} */\n{}\n", block.component, block.css.trim()));
    }
    css
}
