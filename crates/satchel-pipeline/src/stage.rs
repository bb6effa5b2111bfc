//! The stage-plugin capability.
//!
//! A stage plugin is a pure configuration-plus-behavior unit: it carries its
//! options and knows how to register itself against a fresh
//! [`CompilerInstance`](crate::compiler::CompilerInstance). Plugins are
//! created per build invocation by [`compose`](crate::compose::compose) and
//! discarded afterwards.

use crate::compiler::CompilerInstance;
use crate::error::PipelineError;
use serde::Serialize;

/// Execution phase of a stage inside the compiler.
///
/// Composition order and execution order are different things: stages are
/// composed in a fixed, documented order, but the compiler runs their hooks
/// by phase. Manifest emission is composed early (downstream stages depend on
/// its hook being registered) yet executes in the emission phase, after
/// optimization stages such as minification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StagePhase {
    /// Progress and reporting hooks.
    Reporting,
    /// Chunk-level restructuring (merge, dedup).
    Chunking,
    /// Code-level optimization (concatenation, constant folding, minify).
    Optimization,
    /// Artifact emission (manifests, service worker, critical CSS).
    Emission,
    /// Post-emission compression of written assets.
    Compression,
}

/// Serialized form of one applied stage, handed to the compiler engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageDirective {
    /// Stable stage name; unique within one instance.
    pub name: &'static str,
    /// Execution phase.
    pub phase: StagePhase,
    /// Stage-specific options.
    pub options: serde_json::Value,
}

/// One discrete build behavior attachable to a compiler instance.
pub trait StagePlugin: Send + Sync {
    /// Stable name, used for duplicate detection and logs.
    fn name(&self) -> &'static str;

    /// Phase in which the compiler executes this stage's hook.
    fn phase(&self) -> StagePhase;

    /// Stage options as a JSON value.
    fn options(&self) -> serde_json::Value;

    /// Register this stage against a fresh compiler instance.
    ///
    /// The default implementation registers the directive; plugins with no
    /// extra wiring need nothing else.
    fn apply(&self, compiler: &mut CompilerInstance) -> Result<(), PipelineError> {
        compiler.register_stage(StageDirective {
            name: self.name(),
            phase: self.phase(),
            options: self.options(),
        })
    }
}
