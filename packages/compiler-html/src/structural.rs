use crate::compiler::{compile_nodes, NestedComponents};
use crate::error::RenderResult;
use crate::renderer::{load_component, BuiltinCompiler, ComponentCompiler, Renderer, RendererKind};
use prerender_parser::ast::Element;
use prerender_parser::frontmatter;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Renders a component from its syntax tree alone.
///
/// Imports are never resolved: every nested component reference becomes an
/// HTML comment placeholder. Fails only on unreadable or unparsable source.
pub struct StructuralRenderer {
    compiler: Arc<dyn ComponentCompiler>,
}

impl StructuralRenderer {
    pub fn new(compiler: Arc<dyn ComponentCompiler>) -> Self {
        Self { compiler }
    }
}

impl Default for StructuralRenderer {
    fn default() -> Self {
        Self::new(Arc::new(BuiltinCompiler))
    }
}

struct Placeholders<'a> {
    path: &'a Path,
}

impl NestedComponents for Placeholders<'_> {
    fn render_nested(&mut self, element: &Element, _slot_html: String) -> RenderResult<String> {
        warn!(
            path = %self.path.display(),
            component = %element.tag,
            "Nested component left as placeholder; use the full renderer to resolve it"
        );
        Ok(format!("<!-- Component: {} -->", element.tag))
    }
}

impl Renderer for StructuralRenderer {
    fn kind(&self) -> RendererKind {
        RendererKind::Structural
    }

    fn render(&self, path: &Path) -> RenderResult<Option<String>> {
        let file = load_component(self.compiler.as_ref(), path)?;
        let variables = frontmatter::variables(file.frontmatter_text());
        debug!(path = %path.display(), variables = variables.len(), "Structural render");

        let html = compile_nodes(&file.nodes, &variables, None, &mut Placeholders { path })?;
        Ok(Some(html.trim().to_string()))
    }
}
