use crate::{
    minify_html, FullRenderer, LocalModuleContext, RenderError, Renderer, RendererKind,
    StructuralRenderer,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn write(dir: &Path, name: &str, source: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, source).unwrap();
    path
}

#[test]
fn test_structural_renders_frontmatter_literal() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "Footer.astro", "---\nyear = \"2024\"\n---\n<p>{year}</p>\n");

    let html = StructuralRenderer::default().render(&path).unwrap();

    assert_eq!(html.as_deref(), Some("<p>2024</p>"));
}

#[test]
fn test_structural_leaves_expressions_literal() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "Stats.astro",
        "---\nconst total = 3 + 4;\nconst label = \"Total\";\n---\n<p>{label}: {total}</p>",
    );

    let html = StructuralRenderer::default().render(&path).unwrap().unwrap();

    assert_eq!(html, "<p>Total: {total}</p>");
}

#[test]
fn test_nested_component_placeholder_vs_resolved() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "Logo.astro", "<img src=\"/logo.svg\" alt=\"Logo\">");
    let header = write(
        dir.path(),
        "Header.astro",
        "---\nimport Logo from \"./Logo.astro\";\n---\n<header class=\"site-header\"><Logo /></header>",
    );

    let structural = StructuralRenderer::default().render(&header).unwrap().unwrap();
    assert_eq!(
        structural,
        "<header class=\"site-header\"><!-- Component: Logo --></header>"
    );

    let full = FullRenderer::new(Some(Arc::new(LocalModuleContext::default())))
        .render(&header)
        .unwrap()
        .unwrap();
    assert_eq!(
        full,
        "<header class=\"site-header\"><img src=\"/logo.svg\" alt=\"Logo\" /></header>"
    );
}

#[test]
fn test_structural_keeps_styles_and_scripts_for_extraction() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "Card.astro",
        "<div class=\"card\">x</div>\n<style>.card { color: red; }</style>\n<script>console.log(1)</script>",
    );

    let html = StructuralRenderer::default().render(&path).unwrap().unwrap();

    assert!(html.contains("<style>.card { color: red; }</style>"));
    assert!(html.contains("<script>console.log(1)</script>"));
}

#[test]
fn test_structural_errors_on_missing_source() {
    let err = StructuralRenderer::default()
        .render(Path::new("/no/such/Widget.astro"))
        .unwrap_err();
    assert!(matches!(err, RenderError::Source(_)));
}

#[test]
fn test_structural_errors_on_parse_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "Broken.astro", "<div><span></div>");

    let err = StructuralRenderer::default().render(&path).unwrap_err();
    assert!(matches!(err, RenderError::Parse { .. }));
}

#[test]
fn test_renderer_kinds() {
    assert_eq!(StructuralRenderer::default().kind(), RendererKind::Structural);
    assert_eq!(FullRenderer::new(None).kind(), RendererKind::Full);
}

#[test]
fn test_rendered_output_minifies() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "List.astro",
        "---\nconst first = \"One\";\n---\n<ul>\n  <li>{first}</li>\n  <li>Two</li>\n</ul>\n",
    );

    let html = StructuralRenderer::default().render(&path).unwrap().unwrap();

    assert_eq!(minify_html(&html), "<ul><li>One</li><li>Two</li></ul>");
}
