use crate::compiler::{compile_nodes, substitute, NestedComponents};
use crate::error::{RenderError, RenderResult};
use crate::renderer::{load_component, BuiltinCompiler, ComponentCompiler, Renderer, RendererKind};
use prerender_parser::ast::{AttributeValue, Element};
use prerender_parser::frontmatter;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Props passed to a component's default export
pub type Props = BTreeMap<String, String>;

/// Live module-loading context supplied by the host.
///
/// Executes a module's default export in isolation and returns its HTML with
/// nested components resolved, or `None` when the module has nothing to render.
pub trait ModuleExecutor: Send + Sync {
    fn execute_and_render(&self, module_path: &Path, props: &Props) -> RenderResult<Option<String>>;
}

/// Renders by executing the component through a [`ModuleExecutor`].
///
/// Without a context this renderer declines every component (`Ok(None)`), so
/// the caller falls back to the structural renderer.
pub struct FullRenderer {
    context: Option<Arc<dyn ModuleExecutor>>,
}

impl FullRenderer {
    pub fn new(context: Option<Arc<dyn ModuleExecutor>>) -> Self {
        Self { context }
    }

    pub fn has_context(&self) -> bool {
        self.context.is_some()
    }
}

impl Renderer for FullRenderer {
    fn kind(&self) -> RendererKind {
        RendererKind::Full
    }

    fn render(&self, path: &Path) -> RenderResult<Option<String>> {
        let Some(context) = &self.context else {
            debug!(path = %path.display(), "No module context available, declining");
            return Ok(None);
        };

        Ok(context
            .execute_and_render(path, &Props::new())?
            .map(|html| html.trim().to_string()))
    }
}

/// Module context that loads components straight from disk.
///
/// Imports (`import Nav from "./Nav.astro"`) resolve relative to the importing
/// file. Literal attributes on a reference become props; a prop fills a
/// placeholder only when the component's frontmatter does not declare it.
/// Children of a reference replace its `<slot />`.
pub struct LocalModuleContext {
    compiler: Arc<dyn ComponentCompiler>,
}

impl LocalModuleContext {
    pub fn new(compiler: Arc<dyn ComponentCompiler>) -> Self {
        Self { compiler }
    }

    fn render_module(
        &self,
        path: &Path,
        props: &Props,
        slot: Option<&str>,
        stack: &mut Vec<PathBuf>,
    ) -> RenderResult<Option<String>> {
        let key = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        if stack.contains(&key) {
            let chain = stack
                .iter()
                .chain(std::iter::once(&key))
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(RenderError::CircularImport { chain });
        }

        let file = load_component(self.compiler.as_ref(), path)?;
        if file.is_empty() {
            debug!(path = %path.display(), "Module has no renderable default export");
            return Ok(None);
        }

        let mut variables = frontmatter::variables(file.frontmatter_text());
        for (name, value) in props {
            variables.entry(name.clone()).or_insert_with(|| value.clone());
        }

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let imports = frontmatter::imports(file.frontmatter_text())
            .into_iter()
            .map(|import| (import.name, base_dir.join(import.specifier)))
            .collect();

        stack.push(key);
        let mut resolver = ImportResolver {
            context: self,
            importer: path,
            imports,
            variables: &variables,
            stack: &mut *stack,
        };
        let html = compile_nodes(&file.nodes, &variables, slot, &mut resolver);
        stack.pop();

        html.map(Some)
    }
}

impl Default for LocalModuleContext {
    fn default() -> Self {
        Self::new(Arc::new(BuiltinCompiler))
    }
}

impl ModuleExecutor for LocalModuleContext {
    fn execute_and_render(&self, module_path: &Path, props: &Props) -> RenderResult<Option<String>> {
        let mut stack = Vec::new();
        self.render_module(module_path, props, None, &mut stack)
    }
}

struct ImportResolver<'a> {
    context: &'a LocalModuleContext,
    importer: &'a Path,
    imports: HashMap<String, PathBuf>,
    variables: &'a BTreeMap<String, String>,
    stack: &'a mut Vec<PathBuf>,
}

impl NestedComponents for ImportResolver<'_> {
    fn render_nested(&mut self, element: &Element, slot_html: String) -> RenderResult<String> {
        let target = self
            .imports
            .get(&element.tag)
            .ok_or_else(|| RenderError::UnresolvedComponent {
                name: element.tag.clone(),
                importer: self.importer.to_path_buf(),
            })?
            .clone();

        let props: Props = element
            .attributes
            .iter()
            .filter_map(|attr| match &attr.value {
                AttributeValue::Literal(value) => Some((attr.name.clone(), value.clone())),
                AttributeValue::Expression(code) => substitute(code, self.variables)
                    .map(|value| (attr.name.clone(), value.to_string())),
                AttributeValue::Empty => None,
            })
            .collect();

        debug!(
            importer = %self.importer.display(),
            component = %element.tag,
            target = %target.display(),
            "Resolving nested component"
        );

        let html = self
            .context
            .render_module(&target, &props, Some(&slot_html), self.stack)?;
        Ok(html.unwrap_or_default())
    }
}
