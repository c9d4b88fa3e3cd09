use crate::ast::*;
use crate::error::{ParseError, ParseResult};

/// Elements that never have children, whether or not they are written self-closing
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose content is kept verbatim (CSS/JS braces are not interpolations)
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Hand-written parser for component source files
pub struct Parser<'src> {
    source: &'src str,
    pos: usize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self { source, pos: 0 }
    }

    /// Parse a complete component file
    pub fn parse_component(&mut self) -> ParseResult<ComponentFile> {
        let frontmatter = self.parse_frontmatter()?;
        let nodes = self.parse_nodes(None)?;
        Ok(ComponentFile { frontmatter, nodes })
    }

    fn parse_frontmatter(&mut self) -> ParseResult<Option<Frontmatter>> {
        let len = self.source.len();
        let fence_start = len - self.source.trim_start().len();
        let rest = &self.source[fence_start..];

        if !rest.starts_with("---") {
            return Ok(None);
        }

        let open_end = match rest.find('\n') {
            Some(i) => fence_start + i + 1,
            None => {
                return Err(ParseError::unexpected_eof(
                    len,
                    "closing `---` of the frontmatter",
                ))
            }
        };
        if self.source[fence_start..open_end].trim() != "---" {
            return Ok(None);
        }

        let mut line_start = open_end;
        loop {
            if line_start >= len {
                return Err(ParseError::unexpected_eof(
                    len,
                    "closing `---` of the frontmatter",
                ));
            }

            let line_end = self.source[line_start..]
                .find('\n')
                .map(|i| line_start + i)
                .unwrap_or(len);

            if self.source[line_start..line_end].trim() == "---" {
                let content = self.source[open_end..line_start].to_string();
                self.pos = (line_end + 1).min(len);
                return Ok(Some(Frontmatter {
                    content,
                    span: Span::new(fence_start, line_end),
                }));
            }

            line_start = line_end + 1;
        }
    }

    /// Parse sibling nodes until EOF, or until the closing tag of `stop`
    fn parse_nodes(&mut self, stop: Option<&str>) -> ParseResult<Vec<Node>> {
        let mut nodes = Vec::new();

        loop {
            if self.is_at_end() {
                return match stop {
                    Some(tag) => Err(ParseError::unexpected_eof(
                        self.pos,
                        format!("closing tag </{}>", tag),
                    )),
                    None => Ok(nodes),
                };
            }

            if self.starts_with("<!--") {
                nodes.push(self.parse_comment()?);
            } else if self.starts_with("</") {
                let start = self.pos;
                self.advance_by(2);
                let name = self.read_tag_name();
                self.skip_whitespace();
                self.expect_str(">")?;

                return match stop {
                    Some(tag) if tag == name => Ok(nodes),
                    Some(tag) => Err(ParseError::invalid_syntax(
                        start,
                        format!("Mismatched closing tag </{}>, expected </{}>", name, tag),
                    )),
                    None => Err(ParseError::invalid_syntax(
                        start,
                        format!("Unexpected closing tag </{}>", name),
                    )),
                };
            } else if self.starts_with("<!") {
                nodes.push(self.parse_doctype()?);
            } else if self.starts_with("<") && self.peek_nth(1).map(|c| c.is_ascii_alphabetic()).unwrap_or(false) {
                nodes.push(Node::Element(self.parse_element()?));
            } else if self.starts_with("{") {
                let start = self.pos;
                let code = self.parse_braced()?;
                nodes.push(Node::Expression {
                    code,
                    span: Span::new(start, self.pos),
                });
            } else {
                nodes.push(self.parse_text());
            }
        }
    }

    fn parse_element(&mut self) -> ParseResult<Element> {
        let start = self.pos;
        self.expect_str("<")?;

        let tag = self.read_tag_name();
        if tag.is_empty() {
            return Err(ParseError::unexpected_token(
                self.pos,
                "tag name",
                self.describe_current(),
            ));
        }

        let mut attributes = Vec::new();
        let self_closing = loop {
            self.skip_whitespace();

            if self.starts_with("/>") {
                self.advance_by(2);
                break true;
            }
            if self.starts_with(">") {
                self.advance_by(1);
                break false;
            }

            match self.peek_char() {
                None => {
                    return Err(ParseError::unexpected_eof(
                        self.pos,
                        format!("end of <{}> tag", tag),
                    ))
                }
                Some('{') => {
                    // Shorthand `{title}` means `title={title}`
                    let attr_start = self.pos;
                    let code = self.parse_braced()?;
                    attributes.push(Attribute {
                        name: code.trim().to_string(),
                        value: AttributeValue::Expression(code),
                        span: Span::new(attr_start, self.pos),
                    });
                }
                Some(_) => attributes.push(self.parse_attribute()?),
            }
        };

        let lower = tag.to_ascii_lowercase();
        let children = if self_closing || VOID_ELEMENTS.contains(&lower.as_str()) {
            Vec::new()
        } else if RAW_TEXT_ELEMENTS.contains(&lower.as_str()) {
            self.parse_raw_text(&tag)?
        } else {
            self.parse_nodes(Some(&tag))?
        };

        Ok(Element {
            tag,
            attributes,
            children,
            self_closing,
            span: Span::new(start, self.pos),
        })
    }

    fn parse_attribute(&mut self) -> ParseResult<Attribute> {
        let start = self.pos;
        let name = self.take_while(|c| {
            !c.is_whitespace() && !matches!(c, '=' | '>' | '/' | '"' | '\'' | '{')
        });

        if name.is_empty() {
            return Err(ParseError::unexpected_token(
                self.pos,
                "attribute name",
                self.describe_current(),
            ));
        }

        self.skip_whitespace();
        if !self.starts_with("=") {
            return Ok(Attribute {
                name,
                value: AttributeValue::Empty,
                span: Span::new(start, self.pos),
            });
        }

        self.advance_by(1);
        self.skip_whitespace();

        let value = match self.peek_char() {
            Some(quote @ ('"' | '\'')) => {
                self.advance_by(1);
                let value = self.take_while(|c| c != quote);
                if self.is_at_end() {
                    return Err(ParseError::unexpected_eof(
                        self.pos,
                        format!("closing {} of attribute `{}`", quote, name),
                    ));
                }
                self.advance_by(1);
                AttributeValue::Literal(value)
            }
            Some('{') => AttributeValue::Expression(self.parse_braced()?),
            Some(_) => {
                AttributeValue::Literal(self.take_while(|c| !c.is_whitespace() && c != '>'))
            }
            None => {
                return Err(ParseError::unexpected_eof(
                    self.pos,
                    format!("value of attribute `{}`", name),
                ))
            }
        };

        Ok(Attribute {
            name,
            value,
            span: Span::new(start, self.pos),
        })
    }

    /// Content of `<script>`/`<style>` up to the matching close tag, verbatim
    fn parse_raw_text(&mut self, tag: &str) -> ParseResult<Vec<Node>> {
        let needle = format!("</{}", tag.to_ascii_lowercase());
        let haystack = self.rest().to_ascii_lowercase();

        let offset = haystack.find(&needle).ok_or_else(|| {
            ParseError::unexpected_eof(self.source.len(), format!("closing tag </{}>", tag))
        })?;

        let start = self.pos;
        let content = self.rest()[..offset].to_string();
        self.advance_by(offset + needle.len());
        self.skip_whitespace();
        self.expect_str(">")?;

        if content.is_empty() {
            return Ok(Vec::new());
        }

        Ok(vec![Node::Text {
            span: Span::new(start, start + content.len()),
            content,
        }])
    }

    fn parse_comment(&mut self) -> ParseResult<Node> {
        let start = self.pos;
        self.advance_by(4);

        let end = self
            .rest()
            .find("-->")
            .ok_or_else(|| ParseError::unexpected_eof(self.source.len(), "`-->`"))?;
        let content = self.rest()[..end].to_string();
        self.advance_by(end + 3);

        Ok(Node::Comment {
            content,
            span: Span::new(start, self.pos),
        })
    }

    fn parse_doctype(&mut self) -> ParseResult<Node> {
        let start = self.pos;
        self.advance_by(2);

        let end = self
            .rest()
            .find('>')
            .ok_or_else(|| ParseError::unexpected_eof(self.source.len(), "`>`"))?;
        let content = self.rest()[..end].trim().to_string();
        self.advance_by(end + 1);

        Ok(Node::Doctype {
            content,
            span: Span::new(start, self.pos),
        })
    }

    fn parse_text(&mut self) -> Node {
        let start = self.pos;
        // Always consume one char so a stray `<` cannot stall the parser
        self.advance_char();
        while let Some(c) = self.peek_char() {
            if c == '<' || c == '{' {
                break;
            }
            self.advance_char();
        }

        Node::Text {
            content: self.source[start..self.pos].to_string(),
            span: Span::new(start, self.pos),
        }
    }

    /// Parse `{ ... }` with nesting and quoted strings, returning the inner code
    fn parse_braced(&mut self) -> ParseResult<String> {
        let start = self.pos;
        self.expect_str("{")?;

        let mut depth = 1usize;
        while let Some(c) = self.advance_char() {
            match c {
                '"' | '\'' | '`' => self.skip_string(c)?,
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(self.source[start + 1..self.pos - 1].to_string());
                    }
                }
                _ => {}
            }
        }

        Err(ParseError::unexpected_eof(self.pos, "closing `}`"))
    }

    fn skip_string(&mut self, quote: char) -> ParseResult<()> {
        while let Some(c) = self.advance_char() {
            if c == '\\' {
                self.advance_char();
            } else if c == quote {
                return Ok(());
            }
        }
        Err(ParseError::unexpected_eof(
            self.pos,
            format!("closing {} of string", quote),
        ))
    }

    fn read_tag_name(&mut self) -> String {
        self.take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
    }

    fn take_while(&mut self, predicate: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if !predicate(c) {
                break;
            }
            self.advance_char();
        }
        self.source[start..self.pos].to_string()
    }

    fn expect_str(&mut self, expected: &str) -> ParseResult<()> {
        if self.starts_with(expected) {
            self.advance_by(expected.len());
            Ok(())
        } else if self.is_at_end() {
            Err(ParseError::unexpected_eof(self.pos, format!("`{}`", expected)))
        } else {
            Err(ParseError::unexpected_token(
                self.pos,
                format!("`{}`", expected),
                self.describe_current(),
            ))
        }
    }

    fn describe_current(&self) -> String {
        match self.peek_char() {
            Some(c) => format!("`{}`", c),
            None => "end of file".to_string(),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if !c.is_whitespace() {
                break;
            }
            self.advance_char();
        }
    }

    fn rest(&self) -> &'src str {
        &self.source[self.pos..]
    }

    fn starts_with(&self, s: &str) -> bool {
        self.rest().starts_with(s)
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn advance_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn advance_by(&mut self, bytes: usize) {
        self.pos = (self.pos + bytes).min(self.source.len());
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }
}

/// Parse component source text into a [`ComponentFile`]
pub fn parse(source: &str) -> ParseResult<ComponentFile> {
    Parser::new(source).parse_component()
}
