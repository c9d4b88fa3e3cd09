//! The utility CSS compiler capability and a rule-table implementation

use crate::error::CssResult;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

/// Project rule definitions handed to the utility compiler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtilityConfig {
    /// Class name → declarations (`"btn": "padding: 0.5rem 1rem; border-radius: 4px"`)
    #[serde(default)]
    pub rules: BTreeMap<String, String>,

    /// Base CSS emitted ahead of every utility rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preflight: Option<String>,

    /// Generate the built-in spacing/layout/typography utilities
    #[serde(default = "default_builtins")]
    pub builtins: bool,
}

fn default_builtins() -> bool {
    true
}

impl Default for UtilityConfig {
    fn default() -> Self {
        Self {
            rules: BTreeMap::new(),
            preflight: None,
            builtins: true,
        }
    }
}

/// Turns class names into CSS rules.
///
/// Implementations must emit rules only for classes in `allowed`, and the
/// output must depend only on the set, never on insertion order.
pub trait UtilityCompiler: Send + Sync {
    fn compile(&self, config: &UtilityConfig, allowed: &BTreeSet<String>) -> CssResult<String>;
}

/// Utility compiler backed by the configured rule table plus built-in utilities
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleTableCompiler;

impl UtilityCompiler for RuleTableCompiler {
    fn compile(&self, config: &UtilityConfig, allowed: &BTreeSet<String>) -> CssResult<String> {
        let mut css = String::new();

        if let Some(preflight) = config.preflight.as_deref().map(str::trim) {
            if !preflight.is_empty() {
                css.push_str(preflight);
                css.push('\n');
            }
        }

        for class in allowed {
            if let Some(rule) = compile_class(config, class) {
                css.push_str(&rule);
                css.push('\n');
            }
        }

        Ok(css)
    }
}

const BREAKPOINTS: &[(&str, &str)] = &[
    ("sm", "640px"),
    ("md", "768px"),
    ("lg", "1024px"),
    ("xl", "1280px"),
];

const PSEUDO_CLASSES: &[&str] = &["hover", "focus", "active", "disabled", "first", "last"];

fn compile_class(config: &UtilityConfig, class: &str) -> Option<String> {
    let (variants, base) = match class.rfind(':') {
        Some(i) => (&class[..i], &class[i + 1..]),
        None => ("", class),
    };

    let declarations = config
        .rules
        .get(base)
        .cloned()
        .or_else(|| config.builtins.then(|| builtin_declarations(base)).flatten())?;

    let mut selector = format!(".{}", escape_class(class));
    let mut media = None;

    for variant in variants.split(':').filter(|v| !v.is_empty()) {
        if let Some((_, width)) = BREAKPOINTS.iter().find(|(name, _)| *name == variant) {
            media = Some(*width);
        } else if PSEUDO_CLASSES.contains(&variant) {
            let pseudo = match variant {
                "first" => "first-child",
                "last" => "last-child",
                other => other,
            };
            let _ = write!(selector, ":{}", pseudo);
        } else {
            return None;
        }
    }

    let rule = format!("{} {{ {} }}", selector, declarations.trim().trim_end_matches(';'));
    Some(match media {
        Some(width) => format!("@media (min-width: {}) {{ {} }}", width, rule),
        None => rule,
    })
}

fn builtin_declarations(class: &str) -> Option<String> {
    let fixed = match class {
        "block" => Some("display: block"),
        "inline" => Some("display: inline"),
        "inline-block" => Some("display: inline-block"),
        "flex" => Some("display: flex"),
        "inline-flex" => Some("display: inline-flex"),
        "grid" => Some("display: grid"),
        "hidden" => Some("display: none"),
        "flex-row" => Some("flex-direction: row"),
        "flex-col" => Some("flex-direction: column"),
        "items-center" => Some("align-items: center"),
        "justify-center" => Some("justify-content: center"),
        "justify-between" => Some("justify-content: space-between"),
        "text-left" => Some("text-align: left"),
        "text-center" => Some("text-align: center"),
        "text-right" => Some("text-align: right"),
        "text-justify" => Some("text-align: justify"),
        "font-normal" => Some("font-weight: 400"),
        "font-medium" => Some("font-weight: 500"),
        "font-semibold" => Some("font-weight: 600"),
        "font-bold" => Some("font-weight: 700"),
        "w-full" => Some("width: 100%"),
        "h-full" => Some("height: 100%"),
        _ => None,
    };
    if let Some(declarations) = fixed {
        return Some(declarations.to_string());
    }

    let (prefix, value) = class.split_once('-')?;
    let properties: &[&str] = match prefix {
        "p" => &["padding"],
        "px" => &["padding-left", "padding-right"],
        "py" => &["padding-top", "padding-bottom"],
        "pt" => &["padding-top"],
        "pr" => &["padding-right"],
        "pb" => &["padding-bottom"],
        "pl" => &["padding-left"],
        "m" => &["margin"],
        "mx" => &["margin-left", "margin-right"],
        "my" => &["margin-top", "margin-bottom"],
        "mt" => &["margin-top"],
        "mr" => &["margin-right"],
        "mb" => &["margin-bottom"],
        "ml" => &["margin-left"],
        "gap" => &["gap"],
        _ => return None,
    };

    let length = if value == "auto" && prefix.starts_with('m') {
        "auto".to_string()
    } else {
        spacing(value)?
    };

    Some(
        properties
            .iter()
            .map(|property| format!("{}: {}", property, length))
            .collect::<Vec<_>>()
            .join("; "),
    )
}

/// Spacing scale: `4` → `1rem`, `0` → `0`
fn spacing(value: &str) -> Option<String> {
    let steps: u32 = value.parse().ok()?;
    if steps > 96 {
        return None;
    }
    if steps == 0 {
        return Some("0".to_string());
    }
    let rem = steps as f64 * 0.25;
    Some(format!("{}rem", rem))
}

/// Escape a class name for use in a selector (`md:p-4` → `md\:p-4`)
pub fn escape_class(class: &str) -> String {
    let mut escaped = String::with_capacity(class.len());
    for (i, c) in class.chars().enumerate() {
        if i == 0 && c.is_ascii_digit() {
            let _ = write!(escaped, "\\3{} ", c);
        } else if c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() {
            escaped.push(c);
        } else {
            escaped.push('\\');
            escaped.push(c);
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(classes: &[&str]) -> BTreeSet<String> {
        classes.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_only_allowed_classes_are_emitted() {
        let css = RuleTableCompiler
            .compile(&UtilityConfig::default(), &set(&["p-4", "flex"]))
            .unwrap();

        assert_eq!(css, ".flex { display: flex }\n.p-4 { padding: 1rem }\n");
        assert!(!css.contains("text-center"));
    }

    #[test]
    fn test_unknown_classes_are_skipped() {
        let css = RuleTableCompiler
            .compile(&UtilityConfig::default(), &set(&["card", "p-999", "foo:p-4"]))
            .unwrap();
        assert_eq!(css, "");
    }

    #[test]
    fn test_configured_rules_override_builtins() {
        let mut config = UtilityConfig::default();
        config.rules.insert("flex".to_string(), "display: flex; gap: 1rem;".to_string());
        config.rules.insert("btn".to_string(), "padding: 0.5rem 1rem".to_string());

        let css = RuleTableCompiler.compile(&config, &set(&["btn", "flex"])).unwrap();

        assert_eq!(
            css,
            ".btn { padding: 0.5rem 1rem }\n.flex { display: flex; gap: 1rem }\n"
        );
    }

    #[test]
    fn test_builtins_can_be_disabled() {
        let config = UtilityConfig {
            builtins: false,
            ..Default::default()
        };
        let css = RuleTableCompiler.compile(&config, &set(&["p-4"])).unwrap();
        assert_eq!(css, "");
    }

    #[test]
    fn test_spacing_scale() {
        assert_eq!(builtin_declarations("p-0").as_deref(), Some("padding: 0"));
        assert_eq!(builtin_declarations("px-2").as_deref(), Some("padding-left: 0.5rem; padding-right: 0.5rem"));
        assert_eq!(builtin_declarations("mx-auto").as_deref(), Some("margin-left: auto; margin-right: auto"));
        assert_eq!(builtin_declarations("px-auto"), None);
        assert_eq!(builtin_declarations("gap-6").as_deref(), Some("gap: 1.5rem"));
    }

    #[test]
    fn test_variants() {
        let css = RuleTableCompiler
            .compile(&UtilityConfig::default(), &set(&["hover:font-bold", "md:p-4"]))
            .unwrap();

        assert_eq!(
            css,
            ".hover\\:font-bold:hover { font-weight: 700 }\n@media (min-width: 768px) { .md\\:p-4 { padding: 1rem } }\n"
        );
    }

    #[test]
    fn test_preflight_comes_first() {
        let config = UtilityConfig {
            preflight: Some("*, ::before, ::after { box-sizing: border-box; }\n".to_string()),
            ..Default::default()
        };
        let css = RuleTableCompiler.compile(&config, &set(&["block"])).unwrap();
        assert_eq!(css, "*, ::before, ::after { box-sizing: border-box; }\n.block { display: block }\n");
    }

    #[test]
    fn test_escape_class() {
        assert_eq!(escape_class("w-1/2"), "w-1\\/2");
        assert_eq!(escape_class("2xl"), "\\32 xl");
        assert_eq!(escape_class("p-0.5"), "p-0\\.5");
    }
}
