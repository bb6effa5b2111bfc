//! Satchel build pipeline - orchestration around an external asset compiler.
//!
//! The pipeline has no transformation logic of its own. It sequences four
//! concerns around an opaque compiler collaborator:
//!
//! - [`clean`] - ordered, awaited pre-build cleanup of the output tree
//! - [`compose`] - deterministic stage-plugin composition per mode
//! - [`compiler`] - exclusive-ownership adapter over the compiler engine,
//!   one-shot runs and long-lived watch sessions
//! - [`report`] - pure result formatting plus console/notification emission
//!
//! [`orchestrator`] ties them together as a small state machine:
//! `Idle → Resolving → Cleaning → Composing → Running → (Idle | Watching)`.
//!
//! Scheduling is single-threaded and promise-shaped: every suspension point
//! is an awaited future, cleanup fully completes before composition, and no
//! two compilation passes ever overlap on the same instance.

pub mod clean;
pub mod compiler;
pub mod compose;
pub mod engine;
pub mod error;
pub mod orchestrator;
pub mod report;
pub mod stage;
pub mod stages;
pub mod watch;

pub use clean::{CleanupReport, CleanupStage};
pub use compiler::{CompileSpec, CompilerEngine, CompilerInstance, ConfigVariant, RawStats};
pub use compose::compose;
pub use engine::ProcessEngine;
pub use error::{CleanupError, EngineError, PipelineError};
pub use orchestrator::{Orchestrator, Outcome, PipelineState, PreBuildCleaner};
pub use report::{BuildResult, Classification, Notifier, Report, ReportEmitter, Timing};
pub use stage::{StageDirective, StagePhase, StagePlugin};
pub use watch::{ChangeBatch, WatchOptions, WatchSession};
