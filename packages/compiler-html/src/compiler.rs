use crate::error::RenderResult;
use prerender_parser::ast::*;
use std::collections::BTreeMap;

/// Elements written as `<tag />`
const SELF_CLOSING: &[&str] = &["img", "br", "hr", "input", "meta", "link"];

/// Hook for nested component references (`<Nav />`).
///
/// `slot_html` is the already-compiled markup of the reference's children.
pub trait NestedComponents {
    fn render_nested(&mut self, element: &Element, slot_html: String) -> RenderResult<String>;
}

struct Context<'a> {
    variables: &'a BTreeMap<String, String>,
    slot: Option<&'a str>,
    buffer: String,
}

impl<'a> Context<'a> {
    fn new(variables: &'a BTreeMap<String, String>, slot: Option<&'a str>) -> Self {
        Self {
            variables,
            slot,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Compile a node tree to HTML.
///
/// `{name}` placeholders are replaced with frontmatter string values; any
/// other expression is written back as its literal `{code}` text.
pub fn compile_nodes(
    nodes: &[Node],
    variables: &BTreeMap<String, String>,
    slot: Option<&str>,
    components: &mut dyn NestedComponents,
) -> RenderResult<String> {
    let mut ctx = Context::new(variables, slot);
    for node in nodes {
        compile_node(node, &mut ctx, components)?;
    }
    Ok(ctx.get_output())
}

fn compile_node(
    node: &Node,
    ctx: &mut Context,
    components: &mut dyn NestedComponents,
) -> RenderResult<()> {
    match node {
        Node::Element(element) => compile_element(element, ctx, components),

        Node::Text { content, .. } => {
            ctx.add(content);
            Ok(())
        }

        Node::Expression { code, .. } => {
            match substitute(code, ctx.variables) {
                Some(value) => ctx.add(&escape_html(value)),
                None => ctx.add(&format!("{{{}}}", code)),
            }
            Ok(())
        }

        Node::Comment { content, .. } => {
            ctx.add(&format!("<!--{}-->", content));
            Ok(())
        }

        Node::Doctype { content, .. } => {
            ctx.add(&format!("<!{}>", content));
            Ok(())
        }
    }
}

fn compile_element(
    element: &Element,
    ctx: &mut Context,
    components: &mut dyn NestedComponents,
) -> RenderResult<()> {
    if element.is_component_reference() {
        let slot_html = compile_nodes(&element.children, ctx.variables, ctx.slot, components)?;
        let rendered = components.render_nested(element, slot_html)?;
        ctx.add(&rendered);
        return Ok(());
    }

    if element.tag == "slot" {
        match ctx.slot {
            Some(slot_html) => ctx.add(slot_html),
            None => {
                for child in &element.children {
                    compile_node(child, ctx, components)?;
                }
            }
        }
        return Ok(());
    }

    ctx.add(&format!("<{}", element.tag));
    for attribute in &element.attributes {
        ctx.add(" ");
        compile_attribute(attribute, ctx);
    }

    if is_self_closing(&element.tag) {
        ctx.add(" />");
        return Ok(());
    }

    ctx.add(">");
    for child in &element.children {
        compile_node(child, ctx, components)?;
    }
    ctx.add(&format!("</{}>", element.tag));

    Ok(())
}

fn compile_attribute(attribute: &Attribute, ctx: &mut Context) {
    ctx.add(&attribute.name);

    match &attribute.value {
        AttributeValue::Empty => {}
        AttributeValue::Literal(value) => {
            ctx.add(&format!("=\"{}\"", value.replace('"', "&quot;")));
        }
        AttributeValue::Expression(code) => match substitute(code, ctx.variables) {
            Some(value) => ctx.add(&format!("=\"{}\"", escape_html(value))),
            None => ctx.add(&format!("=\"{{{}}}\"", code.replace('"', "&quot;"))),
        },
    }
}

/// Value for a bare `{name}` placeholder, if the frontmatter declares it
pub fn substitute<'v>(code: &str, variables: &'v BTreeMap<String, String>) -> Option<&'v str> {
    variables.get(code.trim()).map(String::as_str)
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn is_self_closing(tag: &str) -> bool {
    SELF_CLOSING.contains(&tag.to_ascii_lowercase().as_str())
}
