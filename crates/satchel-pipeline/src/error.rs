//! Pipeline error taxonomy.
//!
//! Three tiers, mirroring the failure semantics of the orchestrator:
//!
//! - [`PipelineError`] - fatal; the pipeline stops with non-zero status.
//! - [`CleanupError`] - fatal; no build proceeds over an unclean output tree.
//! - Compiler diagnostics are *not* errors here - they travel inside
//!   [`BuildResult`](crate::report::BuildResult) and never abort the pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level fatal pipeline error.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Configuration resolution or validation failed.
    #[error("configuration error: {0}")]
    Config(#[from] satchel_config::ConfigError),

    /// Pre-build cleanup failed; the build is aborted before compilation.
    #[error("cleanup error: {0}")]
    Cleanup(#[from] CleanupError),

    /// A compiler instance was used out of order.
    #[error("illegal state: {0}\n\nHint: compose stages exactly once, then run or watch")]
    IllegalState(String),

    /// The external compiler collaborator misbehaved at the process level.
    #[error("compiler engine error: {0}")]
    Engine(#[from] EngineError),

    /// The filesystem observer could not be started.
    #[error("file watcher error: {0}")]
    Watch(#[from] notify::Error),

    /// Generic I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures during pre-build cleanup.
#[derive(Debug, Error)]
pub enum CleanupError {
    /// The caller passed an empty target list.
    #[error("cleanup called with no target patterns")]
    NoTargets,

    /// A pattern resolved to a path outside the output root.
    ///
    /// Nothing is deleted for the offending pattern; this is the safety
    /// invariant of the stage.
    #[error("pattern '{pattern}' resolved outside the output root: {}", .path.display())]
    OutsideRoot {
        /// The offending glob pattern.
        pattern: String,
        /// The escaping resolved path.
        path: PathBuf,
    },

    /// The glob pattern itself is malformed.
    #[error("invalid cleanup pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },

    /// Filesystem deletion failed.
    #[error("failed to remove {}: {source}", .path.display())]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The output root could not be inspected.
    #[error("cannot access output root {}: {source}", .root.display())]
    Root {
        root: PathBuf,
        source: std::io::Error,
    },
}

/// Failures of the opaque compiler engine, below the diagnostics level.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The compiler process could not be spawned.
    #[error("failed to spawn compiler '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    /// The compiler exited abnormally instead of reporting diagnostics.
    #[error("compiler exited with status {status}\n{stderr}")]
    AbnormalExit { status: i32, stderr: String },

    /// The compiler's stats output violated the wire protocol.
    #[error("malformed compiler stats: {0}")]
    Protocol(String),

    /// I/O on the compiler's stdio failed.
    #[error("compiler I/O error: {0}")]
    Io(#[from] std::io::Error),
}
