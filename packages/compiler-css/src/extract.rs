//! Style and class extraction from rendered HTML

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<style\b[^>]*>(.*?)</style\s*>").expect("style pattern is valid")
});

static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("script pattern is valid")
});

static CLASS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:^|\s)class\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("class pattern is valid")
});

/// Source-location attributes injected by dev tooling (`data-astro-source-file`, `data-astro-source-loc`)
static DEBUG_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\s+data-astro-source-[a-z-]*(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+))?"#)
        .expect("debug attribute pattern is valid")
});

/// Raw CSS text of every `<style>` element, in document order
pub fn extract_styles(html: &str) -> Vec<String> {
    STYLE_RE
        .captures_iter(html)
        .filter_map(|caps| {
            let css = caps[1].trim();
            (!css.is_empty()).then(|| css.to_string())
        })
        .collect()
}

/// Every class token used in a `class` attribute.
///
/// Unresolved `{placeholder}` tokens are not real class names and are skipped.
pub fn extract_classes(html: &str) -> BTreeSet<String> {
    CLASS_RE
        .captures_iter(html)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .flat_map(|value| value.as_str().split_whitespace())
        .filter(|token| !token.contains('{') && !token.contains('}'))
        .map(str::to_string)
        .collect()
}

/// Strip scripts, styles (extracted separately) and debug attributes.
///
/// Runs to a fixed point, so `clean_html(clean_html(x)) == clean_html(x)`
/// even when a removal splices two halves of a tag back together.
pub fn clean_html(html: &str) -> String {
    let mut current = html.to_string();
    loop {
        let next = clean_once(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

fn clean_once(html: &str) -> String {
    let without_scripts = SCRIPT_RE.replace_all(html, "");
    let without_styles = STYLE_RE.replace_all(&without_scripts, "");
    DEBUG_ATTR_RE.replace_all(&without_styles, "").into_owned()
}
