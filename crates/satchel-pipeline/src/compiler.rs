//! Adapter over the opaque compiler collaborator.
//!
//! The pipeline never looks inside the compiler; it hands it a
//! [`CompileSpec`] and receives [`RawStats`] back. [`CompilerInstance`] adds
//! the ownership discipline the orchestrator relies on: stages are attached
//! exactly once, and `run`/`watch` consume the instance so a second
//! invocation against the same instance is unrepresentable.

use crate::error::{EngineError, PipelineError};
use crate::report::{BuildResult, Timing};
use crate::stage::{StageDirective, StagePlugin};
use crate::watch::{ChangeBatch, WatchOptions, WatchSession};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Base configuration variant the compiler starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigVariant {
    Development,
    Production,
}

/// Everything one compilation pass needs, serialized to the engine.
#[derive(Debug, Clone, Serialize)]
pub struct CompileSpec {
    pub variant: ConfigVariant,
    pub public_root: PathBuf,
    pub entries: Vec<String>,
    pub output_template: String,
    /// Applied stages, ordered by phase then composition order.
    pub stages: Vec<StageDirective>,
}

impl CompileSpec {
    /// Derive the spec skeleton from the resolved configuration.
    pub fn from_config(config: &satchel_config::BuildConfig) -> Self {
        let variant = if config.mode.is_production() {
            ConfigVariant::Production
        } else {
            ConfigVariant::Development
        };
        Self {
            variant,
            public_root: config.public_root.clone(),
            entries: config.js_entries.clone(),
            output_template: config.js_output_template.clone(),
            stages: Vec::new(),
        }
    }
}

/// Wire-format stats as the external compiler reports them.
///
/// All fields are optional on the wire; normalization decides what absence
/// means.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStats {
    pub errors: Option<Vec<String>>,
    pub warnings: Option<Vec<String>>,
    pub start_time: Option<u64>,
    pub end_time: Option<u64>,
}

impl RawStats {
    /// Normalize wire stats into a [`BuildResult`].
    ///
    /// An *absent* diagnostics field is a protocol violation and is recorded
    /// as such - distinct from an empty list, which is a genuinely clean
    /// pass. Timing is kept only when both timestamps are present.
    pub fn normalize(self) -> BuildResult {
        let mut protocol_warnings = Vec::new();

        let errors = match self.errors {
            Some(errors) => errors,
            None => {
                protocol_warnings.push("stats omitted the 'errors' field".to_string());
                Vec::new()
            }
        };
        let warnings = match self.warnings {
            Some(warnings) => warnings,
            None => {
                protocol_warnings.push("stats omitted the 'warnings' field".to_string());
                Vec::new()
            }
        };

        let timing = match (self.start_time, self.end_time) {
            (Some(start_ms), Some(end_ms)) => Some(Timing { start_ms, end_ms }),
            (None, None) => {
                protocol_warnings.push("stats omitted timing fields".to_string());
                None
            }
            _ => {
                protocol_warnings.push("stats carried only one timing field".to_string());
                None
            }
        };

        BuildResult {
            errors,
            warnings,
            timing,
            protocol_warnings,
        }
    }
}

/// The opaque compiler collaborator.
///
/// One call is one compilation pass; diagnostics travel inside the returned
/// stats, so an `Err` here means the collaborator itself broke, not the
/// user's code.
#[async_trait]
pub trait CompilerEngine: Send + Sync {
    async fn compile(&self, spec: &CompileSpec) -> Result<RawStats, EngineError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InstanceState {
    Fresh,
    Configured,
}

/// One exclusively-owned compiler instance, live for one build or one watch
/// session.
pub struct CompilerInstance {
    engine: Arc<dyn CompilerEngine>,
    spec: CompileSpec,
    stage_names: HashSet<&'static str>,
    state: InstanceState,
}

impl CompilerInstance {
    /// Wrap an engine with a fresh spec. No stages are attached yet.
    pub fn new(engine: Arc<dyn CompilerEngine>, spec: CompileSpec) -> Self {
        Self {
            engine,
            spec,
            stage_names: HashSet::new(),
            state: InstanceState::Fresh,
        }
    }

    /// Attach a composed stage list. Callable exactly once.
    ///
    /// After attachment the directives are ordered by phase (stable within a
    /// phase), which is the order the engine executes hooks in.
    ///
    /// # Errors
    ///
    /// `IllegalState` when the instance is already configured or a stage
    /// name repeats.
    pub fn attach(&mut self, stages: Vec<Box<dyn StagePlugin>>) -> Result<(), PipelineError> {
        if self.state != InstanceState::Fresh {
            return Err(PipelineError::IllegalState(
                "stages were already attached to this compiler instance".to_string(),
            ));
        }
        for stage in &stages {
            stage.apply(self)?;
        }
        self.spec.stages.sort_by_key(|directive| directive.phase);
        self.state = InstanceState::Configured;
        tracing::debug!(stages = self.spec.stages.len(), "compiler configured");
        Ok(())
    }

    /// Register one stage directive. Called by [`StagePlugin::apply`].
    pub fn register_stage(&mut self, directive: StageDirective) -> Result<(), PipelineError> {
        if !self.stage_names.insert(directive.name) {
            return Err(PipelineError::IllegalState(format!(
                "stage '{}' composed twice",
                directive.name
            )));
        }
        self.spec.stages.push(directive);
        Ok(())
    }

    /// The spec as currently configured. Mostly useful to tests and logs.
    pub fn spec(&self) -> &CompileSpec {
        &self.spec
    }

    /// Trigger exactly one compilation pass.
    ///
    /// Consumes the instance: it cannot be run or watched again.
    ///
    /// # Errors
    ///
    /// Fails fast with `IllegalState` when composition was skipped, or with
    /// the engine's error when the collaborator breaks.
    pub async fn run(self) -> Result<BuildResult, PipelineError> {
        self.ensure_configured("run")?;
        let raw = self.engine.compile(&self.spec).await?;
        Ok(raw.normalize())
    }

    /// Start a persistent watch session over the given roots.
    ///
    /// Consumes the instance; the session owns it until stopped. Each change
    /// batch triggers exactly one pass, strictly sequential.
    pub fn watch(self, options: WatchOptions) -> Result<WatchSession, PipelineError> {
        self.ensure_configured("watch")?;
        let (watcher, source) = crate::watch::fs_change_source(&options)?;
        Ok(WatchSession::spawn(
            self.engine,
            self.spec,
            source,
            Some(watcher),
        ))
    }

    /// Start a watch session fed by an external change-batch channel.
    ///
    /// The seam used by tests and embedders that already observe the
    /// filesystem themselves.
    pub fn watch_from_source(
        self,
        source: mpsc::Receiver<ChangeBatch>,
    ) -> Result<WatchSession, PipelineError> {
        self.ensure_configured("watch")?;
        Ok(WatchSession::spawn(self.engine, self.spec, source, None))
    }

    fn ensure_configured(&self, operation: &str) -> Result<(), PipelineError> {
        if self.state != InstanceState::Configured {
            return Err(PipelineError::IllegalState(format!(
                "{operation} called before stage composition"
            )));
        }
        Ok(())
    }
}
