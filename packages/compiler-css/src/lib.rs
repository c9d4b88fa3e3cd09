//! Style/class extraction and tree-shaken stylesheet generation

pub mod error;
pub mod extract;
pub mod generator;
pub mod utility;

pub use error::{CssError, CssResult};
pub use extract::{clean_html, extract_classes, extract_styles};
pub use generator::{
    CssMode, GenerateOutcome, StyleBlock, StylesheetGenerator, StylesheetManifest, BASE_STYLESHEET,
};
pub use utility::{escape_class, RuleTableCompiler, UtilityCompiler, UtilityConfig};
