mod compiler;
mod error;
mod full;
mod minify;
mod renderer;
mod structural;

#[cfg(test)]
mod tests;

pub use compiler::{compile_nodes, escape_html, NestedComponents};
pub use error::{RenderError, RenderResult};
pub use full::{FullRenderer, LocalModuleContext, ModuleExecutor, Props};
pub use minify::{calculate_compression_ratio, minify_html};
pub use renderer::{BuiltinCompiler, ComponentCompiler, Renderer, RendererKind};
pub use structural::StructuralRenderer;
