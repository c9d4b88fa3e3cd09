pub mod ast;
pub mod error;
pub mod frontmatter;
pub mod parser;

pub use error::{ParseError, ParseResult};
pub use frontmatter::ComponentImport;
pub use parser::{parse, Parser};
