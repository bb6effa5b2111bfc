//! Command implementations.

mod build;
mod utils;
mod watch;

pub use build::build_execute;
pub use watch::watch_execute;
