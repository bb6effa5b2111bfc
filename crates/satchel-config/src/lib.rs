//! Build configuration for the Satchel pipeline.
//!
//! This crate owns the resolution of process environment and defaults into a
//! single immutable [`BuildConfig`] value, created once at startup and shared
//! read-only by every pipeline stage.
//!
//! Resolution layers, lowest priority first:
//!
//! 1. Compiled-in defaults
//! 2. `SATCHEL_*` environment overrides (via figment)
//! 3. Explicit caller overrides (CLI flags)
//!
//! The three contract variables `NODE_ENV`, `WATCH` and `CRITICAL` are not
//! part of the figment layering; they are captured into an [`EnvSnapshot`]
//! so resolution stays a deterministic function of its inputs.

pub mod config;
pub mod env;
pub mod error;
mod validation;

pub use config::{
    BuildConfig, Mode, ModeRequest, Overrides, PerformanceConfig, PwaConfig, WatchConfig,
};
pub use env::EnvSnapshot;
pub use error::ConfigError;
