//! Error handling for the Satchel CLI.
//!
//! [`CliError`] wraps the pipeline's domain errors via `#[from]` conversions;
//! [`cli_error_to_miette`] turns them into diagnostics at the binary
//! boundary. Hints live in the domain error messages themselves.

use satchel_config::ConfigError;
use satchel_pipeline::{CleanupError, EngineError, PipelineError};
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration resolution or validation failures
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline failures: cleanup, illegal state, compiler engine, watching
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Invalid command-line arguments or options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the CLI.
pub type Result<T> = std::result::Result<T, CliError>;

/// Convert a [`CliError`] into a miette report.
pub fn cli_error_to_miette(err: CliError) -> miette::Report {
    match err {
        CliError::Config(ConfigError::WatchSignalMissing) => miette::miette!(
            help = "set WATCH=true in the environment, or run 'satchel build' for a one-shot pass",
            "watch mode requested without the WATCH signal"
        ),
        CliError::Pipeline(PipelineError::Cleanup(e)) => cleanup_error_to_miette(e),
        CliError::Pipeline(PipelineError::Engine(e)) => engine_error_to_miette(e),
        _ => miette::miette!("{}", err),
    }
}

fn cleanup_error_to_miette(err: CleanupError) -> miette::Report {
    match err {
        CleanupError::OutsideRoot { pattern, path } => miette::miette!(
            help = "cleanup patterns must stay inside the public root; check for symlinks or '..' segments",
            "pattern '{pattern}' matched '{}' outside the output tree",
            path.display()
        ),
        other => miette::miette!("Cleanup failed: {}", other),
    }
}

fn engine_error_to_miette(err: EngineError) -> miette::Report {
    match err {
        EngineError::Spawn { command, source } => miette::miette!(
            help = "pass the compiler executable with --compiler <CMD>",
            "could not start compiler '{command}': {source}"
        ),
        EngineError::AbnormalExit { status, stderr } => miette::miette!(
            "compiler exited with status {status}\n{stderr}"
        ),
        other => miette::miette!("Compiler engine error: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watch_signal_report_carries_help() {
        let report = cli_error_to_miette(CliError::Config(ConfigError::WatchSignalMissing));
        let rendered = format!("{report:?}");
        assert!(rendered.contains("WATCH"));
    }

    #[test]
    fn pipeline_errors_convert() {
        let err: CliError = PipelineError::IllegalState("run before composition".to_string()).into();
        assert!(err.to_string().contains("Pipeline error"));
    }
}
