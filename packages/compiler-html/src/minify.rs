//! HTML minification for written fragments

use regex::Regex;
use std::sync::LazyLock;

/// Blocks whose whitespace is significant or not HTML at all
static PRESERVED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<pre\b.*?</pre\s*>|<textarea\b.*?</textarea\s*>|<script\b.*?</script\s*>|<style\b.*?</style\s*>")
        .expect("preserved block pattern is valid")
});

/// Whitespace between two tags that contains a line break (source indentation)
static INDENT_BETWEEN_TAGS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">\s*\n\s*<").expect("indentation pattern is valid"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Minify an HTML fragment.
///
/// Drops line-broken indentation between tags and collapses every other
/// whitespace run to one space. Comments are kept, and `pre`, `textarea`,
/// `script` and `style` contents are left untouched.
pub fn minify_html(html: &str) -> String {
    let mut preserved = Vec::new();
    let masked = PRESERVED_RE.replace_all(html, |caps: &regex::Captures| {
        preserved.push(caps[0].to_string());
        format!("<\u{1}{}>", preserved.len() - 1)
    });

    let without_indent = INDENT_BETWEEN_TAGS_RE.replace_all(&masked, "><");
    let mut output = WHITESPACE_RE
        .replace_all(&without_indent, " ")
        .trim()
        .to_string();

    for (i, block) in preserved.iter().enumerate() {
        output = output.replacen(&format!("<\u{1}{}>", i), block, 1);
    }

    output
}

/// Percentage saved by minification
pub fn calculate_compression_ratio(original_size: usize, minified_size: usize) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    (original_size.saturating_sub(minified_size) as f64 / original_size as f64) * 100.0
}
