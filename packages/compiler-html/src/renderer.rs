use crate::error::{RenderError, RenderResult};
use prerender_common::CommonError;
use prerender_parser::ast::ComponentFile;
use prerender_parser::ParseResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Which rendering strategy a build is configured for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    #[default]
    Structural,
    Full,
}

impl RendererKind {
    /// Strategies to attempt, in order, when a build is configured for `self`
    pub fn fallback_order(self) -> &'static [RendererKind] {
        match self {
            RendererKind::Full => &[RendererKind::Full, RendererKind::Structural],
            RendererKind::Structural => &[RendererKind::Structural],
        }
    }
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RendererKind::Structural => f.write_str("structural"),
            RendererKind::Full => f.write_str("full"),
        }
    }
}

impl std::str::FromStr for RendererKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "structural" => Ok(RendererKind::Structural),
            "full" => Ok(RendererKind::Full),
            other => Err(format!("Unknown renderer: {}. Use: structural or full", other)),
        }
    }
}

/// Shared capability of every rendering strategy.
///
/// `Ok(None)` means "this strategy cannot handle this source" and lets the
/// caller fall back to the next strategy. `Err` aborts the component.
pub trait Renderer: Send + Sync {
    fn kind(&self) -> RendererKind;

    fn render(&self, path: &Path) -> RenderResult<Option<String>>;
}

/// The component compiler capability: source text to node tree
pub trait ComponentCompiler: Send + Sync {
    fn parse(&self, source: &str) -> ParseResult<ComponentFile>;
}

/// Component compiler backed by `prerender_parser`
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinCompiler;

impl ComponentCompiler for BuiltinCompiler {
    fn parse(&self, source: &str) -> ParseResult<ComponentFile> {
        prerender_parser::parse(source)
    }
}

/// Read and parse a component, mapping failures onto [`RenderError`]
pub(crate) fn load_component(
    compiler: &dyn ComponentCompiler,
    path: &Path,
) -> RenderResult<ComponentFile> {
    let source_text = std::fs::read_to_string(path).map_err(|e| CommonError::io(path, e))?;

    compiler
        .parse(&source_text)
        .map_err(|error| RenderError::Parse {
            path: path.to_path_buf(),
            source_text,
            error,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_order() {
        assert_eq!(
            RendererKind::Full.fallback_order(),
            &[RendererKind::Full, RendererKind::Structural]
        );
        assert_eq!(RendererKind::Structural.fallback_order(), &[RendererKind::Structural]);
    }

    #[test]
    fn test_kind_serde_and_parse() {
        let kind: RendererKind = serde_json::from_str("\"full\"").unwrap();
        assert_eq!(kind, RendererKind::Full);
        assert_eq!("structural".parse::<RendererKind>().unwrap(), RendererKind::Structural);
        assert!("ssr".parse::<RendererKind>().is_err());
    }
}
