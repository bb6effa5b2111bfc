//! Configuration error types.
//!
//! Every variant here is fatal: the pipeline refuses to start on a broken
//! configuration rather than guessing.

use thiserror::Error;

/// Errors produced while resolving or validating a [`BuildConfig`](crate::BuildConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Watch mode was requested but the `WATCH` environment signal is absent.
    #[error(
        "watch mode requested but the WATCH environment variable is not set\n\n\
         Hint: run with WATCH=1, or use a one-shot build instead"
    )]
    WatchSignalMissing,

    /// The layered figment sources could not be merged into a config value.
    #[error("invalid configuration: {0}\n\nHint: check SATCHEL_* environment overrides")]
    Extraction(#[from] figment::Error),

    /// A required field is missing or empty.
    #[error("missing required field: {field}\n\nHint: {hint}")]
    MissingField {
        /// Name of the missing field.
        field: String,
        /// Guidance for providing it.
        hint: String,
    },

    /// A field holds a value the pipeline cannot work with.
    #[error("invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        /// Name of the offending field.
        field: String,
        /// The rejected value.
        value: String,
        /// Guidance for a correct value.
        hint: String,
    },
}
