pub mod error;
pub mod fs;
pub mod hash;
pub mod result;
pub mod source;

pub use error::*;
pub use fs::{remove_if_exists, write_atomic};
pub use hash::ContentHash;
pub use result::*;
pub use source::{logical_name, SourceComponent};
