pub mod build;
pub mod fetch;
pub mod init;
pub mod watch;

pub use build::{build, BuildArgs};
pub use fetch::{fetch, FetchArgs};
pub use init::{init, InitArgs};
pub use watch::{watch, WatchArgs};
