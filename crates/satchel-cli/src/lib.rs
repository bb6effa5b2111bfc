//! Satchel CLI library.
//!
//! Exposed as a library so integration tests can exercise command logic
//! without spawning the binary.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod notifier;
pub mod ui;

pub use error::{CliError, Result};
