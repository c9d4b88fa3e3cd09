//! Pattern-based scanning of the frontmatter block.
//!
//! Only `name = "literal"` declarations are recognized. Expressions, numbers
//! and computed values are not evaluated; placeholders that reference them are
//! left as literal `{name}` text by the renderers.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static VARIABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?m)^[ \t]*(?:(?:const|let|var)[ \t]+)?([A-Za-z_$][\w$]*)[ \t]*=[ \t]*(?:"([^"\\\n]*)"|'([^'\\\n]*)'|`([^`$\\]*)`)[ \t]*;?[ \t]*\r?$"#,
    )
    .expect("variable pattern is valid")
});

static IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^[ \t]*import[ \t]+([A-Za-z_$][\w$]*)[ \t]+from[ \t]+["']([^"']+)["'][ \t]*;?"#)
        .expect("import pattern is valid")
});

/// A default import of another component: `import Nav from "./Nav.astro"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentImport {
    pub name: String,
    pub specifier: String,
}

/// String-literal variable declarations, last declaration wins
pub fn variables(frontmatter: &str) -> BTreeMap<String, String> {
    VARIABLE_RE
        .captures_iter(frontmatter)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str().to_string();
            let value = caps.get(2).or_else(|| caps.get(3)).or_else(|| caps.get(4))?;
            Some((name, value.as_str().to_string()))
        })
        .collect()
}

/// Default imports declared in the frontmatter, in declaration order
pub fn imports(frontmatter: &str) -> Vec<ComponentImport> {
    IMPORT_RE
        .captures_iter(frontmatter)
        .map(|caps| ComponentImport {
            name: caps[1].to_string(),
            specifier: caps[2].to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_literal_declarations() {
        let vars = variables(
            r#"
const title = "Welcome";
let subtitle = 'Hello there';
var tagline = `Static only`;
year = "2024"
"#,
        );

        assert_eq!(vars.get("title").map(String::as_str), Some("Welcome"));
        assert_eq!(vars.get("subtitle").map(String::as_str), Some("Hello there"));
        assert_eq!(vars.get("tagline").map(String::as_str), Some("Static only"));
        assert_eq!(vars.get("year").map(String::as_str), Some("2024"));
    }

    #[test]
    fn test_expressions_are_not_evaluated() {
        let vars = variables(
            r#"
const count = 42;
const greeting = "Hello, " + name;
const now = new Date().getFullYear();
const templated = `Hi ${name}`;
const { title } = Astro.props;
"#,
        );

        assert!(vars.is_empty(), "unexpected variables: {:?}", vars);
    }

    #[test]
    fn test_last_declaration_wins() {
        let vars = variables("const a = \"one\";\na = \"two\";\n");
        assert_eq!(vars.get("a").map(String::as_str), Some("two"));
    }

    #[test]
    fn test_imports() {
        let found = imports(
            r#"
import Nav from "./Nav.astro";
import Logo from '../shared/Logo.astro'
import { helper } from "./utils.js";
const title = "x";
"#,
        );

        assert_eq!(
            found,
            vec![
                ComponentImport {
                    name: "Nav".to_string(),
                    specifier: "./Nav.astro".to_string(),
                },
                ComponentImport {
                    name: "Logo".to_string(),
                    specifier: "../shared/Logo.astro".to_string(),
                },
            ]
        );
    }
}
