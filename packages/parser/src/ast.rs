use serde::{Deserialize, Serialize};

/// Byte range in the component source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Root of a parsed component source file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentFile {
    pub frontmatter: Option<Frontmatter>,
    pub nodes: Vec<Node>,
}

impl ComponentFile {
    /// Raw frontmatter text, or "" when the file has none
    pub fn frontmatter_text(&self) -> &str {
        self.frontmatter
            .as_ref()
            .map(|fm| fm.content.as_str())
            .unwrap_or("")
    }

    /// True when the file has no markup to render
    pub fn is_empty(&self) -> bool {
        self.nodes.iter().all(|node| match node {
            Node::Text { content, .. } => content.trim().is_empty(),
            _ => false,
        })
    }
}

/// The `---` fenced script block at the top of a component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frontmatter {
    pub content: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Element(Element),
    Text { content: String, span: Span },
    /// `{code}` interpolation in text position
    Expression { code: String, span: Span },
    Comment { content: String, span: Span },
    Doctype { content: String, span: Span },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
    pub self_closing: bool,
    pub span: Span,
}

impl Element {
    /// Capitalized or dotted tags (`<Nav />`, `<Icons.Star />`) reference other components
    pub fn is_component_reference(&self) -> bool {
        self.tag
            .chars()
            .next()
            .map(|c| c.is_ascii_uppercase())
            .unwrap_or(false)
            || self.tag.contains('.')
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: AttributeValue,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    /// Bare attribute (`<input disabled>`)
    Empty,
    /// Quoted or unquoted literal text
    Literal(String),
    /// `name={code}`
    Expression(String),
}
