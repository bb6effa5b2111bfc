//! The top-level pipeline state machine.
//!
//! `Idle → Resolving → Cleaning → Composing → Running → (Idle | Watching)`.
//!
//! Every transition is gated on the previous stage having fully resolved:
//! cleanup completes before any compiler stage sees the filesystem, and
//! composition completes before the compiler is invoked. Fatal errors
//! (configuration, cleanup, illegal state) abort the run; compiler
//! diagnostics are reported and never abort.

use crate::clean::{CleanupReport, CleanupStage};
use crate::compiler::{CompileSpec, CompilerEngine, CompilerInstance};
use crate::compose::compose;
use crate::error::{CleanupError, PipelineError};
use crate::report::{self, Notifier, Report, ReportEmitter};
use crate::watch::{ChangeBatch, WatchOptions, WatchSession};
use async_trait::async_trait;
use satchel_config::{BuildConfig, ConfigError, EnvSnapshot, Mode, ModeRequest, Overrides};
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Orchestrator states, recorded per transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Resolving,
    Cleaning,
    Composing,
    Running,
    Watching,
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PipelineState::Idle => "idle",
            PipelineState::Resolving => "resolving",
            PipelineState::Cleaning => "cleaning",
            PipelineState::Composing => "composing",
            PipelineState::Running => "running",
            PipelineState::Watching => "watching",
        };
        write!(f, "{name}")
    }
}

/// Result of one orchestrator run.
#[derive(Debug)]
pub enum Outcome {
    /// One-shot build finished and was reported.
    Completed(Report),
    /// Watch session ended after the given number of reported rebuilds.
    Watched { rebuilds: usize },
}

/// Seam for the pre-build cleanup step.
///
/// Production code uses [`FsCleaner`]; tests inject delayed or failing
/// cleaners to verify ordering and abort semantics.
#[async_trait]
pub trait PreBuildCleaner: Send + Sync {
    async fn clean(
        &self,
        public_root: &Path,
        patterns: &[String],
    ) -> Result<CleanupReport, CleanupError>;
}

/// Default cleaner backed by [`CleanupStage`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FsCleaner;

#[async_trait]
impl PreBuildCleaner for FsCleaner {
    async fn clean(
        &self,
        public_root: &Path,
        patterns: &[String],
    ) -> Result<CleanupReport, CleanupError> {
        CleanupStage::new(public_root).clean(patterns).await
    }
}

/// Top-level pipeline driver.
///
/// Owns exactly one live [`CompilerInstance`] at a time; the instance is
/// constructed fresh per run and consumed by it.
pub struct Orchestrator {
    engine: Arc<dyn CompilerEngine>,
    cleaner: Arc<dyn PreBuildCleaner>,
    notifier: Arc<dyn Notifier>,
    state: PipelineState,
    trace: Vec<PipelineState>,
}

impl Orchestrator {
    pub fn new(engine: Arc<dyn CompilerEngine>, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_cleaner(engine, notifier, Arc::new(FsCleaner))
    }

    /// Replace the cleanup seam. Used by tests.
    pub fn with_cleaner(
        engine: Arc<dyn CompilerEngine>,
        notifier: Arc<dyn Notifier>,
        cleaner: Arc<dyn PreBuildCleaner>,
    ) -> Self {
        Self {
            engine,
            cleaner,
            notifier,
            state: PipelineState::Idle,
            trace: vec![PipelineState::Idle],
        }
    }

    /// All states visited so far, in order.
    pub fn state_trace(&self) -> &[PipelineState] {
        &self.trace
    }

    fn transition(&mut self, next: PipelineState) {
        tracing::debug!(from = %self.state, to = %next, "pipeline transition");
        self.state = next;
        self.trace.push(next);
    }

    /// Run the pipeline to completion for the requested mode.
    ///
    /// `shutdown` is only consulted in watch mode, where it ends the session.
    pub async fn run(
        &mut self,
        snapshot: &EnvSnapshot,
        request: ModeRequest,
        overrides: &Overrides,
        shutdown: impl Future<Output = ()> + Send,
    ) -> Result<Outcome, PipelineError> {
        match request {
            ModeRequest::Watch => {
                let rebuilds = self.run_watch(snapshot, overrides, shutdown).await?;
                Ok(Outcome::Watched { rebuilds })
            }
            _ => Ok(Outcome::Completed(
                self.run_once(snapshot, request, overrides).await?,
            )),
        }
    }

    /// One-shot pipeline: resolve, clean, compose, run, report, idle.
    pub async fn run_once(
        &mut self,
        snapshot: &EnvSnapshot,
        request: ModeRequest,
        overrides: &Overrides,
    ) -> Result<Report, PipelineError> {
        let (config, instance) = self.prepare(snapshot, request, overrides).await?;
        if config.mode == Mode::Watch {
            return Err(PipelineError::IllegalState(
                "one-shot run invoked in watch mode".to_string(),
            ));
        }
        let emitter = ReportEmitter::new(self.notifier.clone(), &config);

        self.transition(PipelineState::Running);
        let result = instance.run().await?;
        let formatted = report::format(&result);
        emitter.emit(&formatted, &result, false);
        self.transition(PipelineState::Idle);
        Ok(formatted)
    }

    /// Watch pipeline over the filesystem observer.
    pub async fn run_watch(
        &mut self,
        snapshot: &EnvSnapshot,
        overrides: &Overrides,
        shutdown: impl Future<Output = ()> + Send,
    ) -> Result<usize, PipelineError> {
        let (config, instance) = self
            .prepare(snapshot, ModeRequest::Watch, overrides)
            .await?;
        self.ensure_watch_signal(&config)?;
        self.transition(PipelineState::Running);
        let session = instance.watch(WatchOptions::from_config(&config))?;
        self.watch_loop(&config, session, shutdown).await
    }

    /// Watch pipeline over an injected change-batch source.
    pub async fn run_watch_from_source(
        &mut self,
        snapshot: &EnvSnapshot,
        overrides: &Overrides,
        source: mpsc::Receiver<ChangeBatch>,
        shutdown: impl Future<Output = ()> + Send,
    ) -> Result<usize, PipelineError> {
        let (config, instance) = self
            .prepare(snapshot, ModeRequest::Watch, overrides)
            .await?;
        self.ensure_watch_signal(&config)?;
        self.transition(PipelineState::Running);
        let session = instance.watch_from_source(source)?;
        self.watch_loop(&config, session, shutdown).await
    }

    /// Shared Resolving → Cleaning → Composing prefix.
    async fn prepare(
        &mut self,
        snapshot: &EnvSnapshot,
        request: ModeRequest,
        overrides: &Overrides,
    ) -> Result<(BuildConfig, CompilerInstance), PipelineError> {
        self.transition(PipelineState::Resolving);
        let config = BuildConfig::resolve(snapshot, request, overrides)?;
        tracing::info!(mode = %config.mode, "build mode");

        self.transition(PipelineState::Cleaning);
        let cleaned = self
            .cleaner
            .clean(&config.public_root, &config.clean_targets())
            .await?;
        tracing::debug!(
            patterns = cleaned.patterns_cleaned,
            removed = cleaned.paths_removed,
            "output tree cleaned"
        );

        if config.verbose {
            tracing::info!(
                entries = ?config.js_entries,
                assets = %config.assets_path.display(),
                production = config.mode.is_production(),
                watch = config.mode == Mode::Watch,
                "environment loaded"
            );
        }

        self.transition(PipelineState::Composing);
        let stages = compose(&config, config.mode);
        let mut instance =
            CompilerInstance::new(self.engine.clone(), CompileSpec::from_config(&config));
        instance.attach(stages)?;

        Ok((config, instance))
    }

    /// Refuse `Running → Watching` when the watch signal is absent.
    fn ensure_watch_signal(&self, config: &BuildConfig) -> Result<(), PipelineError> {
        if !config.watch_signal {
            return Err(ConfigError::WatchSignalMissing.into());
        }
        Ok(())
    }

    async fn watch_loop(
        &mut self,
        config: &BuildConfig,
        mut session: WatchSession,
        shutdown: impl Future<Output = ()> + Send,
    ) -> Result<usize, PipelineError> {
        enum Turn {
            Result(Option<crate::report::BuildResult>),
            Shutdown,
        }

        let emitter = ReportEmitter::new(self.notifier.clone(), config);
        self.transition(PipelineState::Watching);
        tracing::info!("watching assets");

        tokio::pin!(shutdown);
        let mut rebuilds = 0usize;
        loop {
            let turn = tokio::select! {
                maybe = session.next_result() => Turn::Result(maybe),
                _ = &mut shutdown => Turn::Shutdown,
            };

            match turn {
                Turn::Result(Some(result)) => {
                    self.transition(PipelineState::Running);
                    emitter.emit(&report::format(&result), &result, true);
                    rebuilds += 1;
                    self.transition(PipelineState::Watching);
                }
                // Source closed; the session is over.
                Turn::Result(None) => break,
                Turn::Shutdown => {
                    // Let any in-flight pass finish and report before teardown.
                    for result in session.stop().await {
                        emitter.emit(&report::format(&result), &result, true);
                        rebuilds += 1;
                    }
                    break;
                }
            }
        }

        self.transition(PipelineState::Idle);
        Ok(rebuilds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn states_display_lowercase() {
        assert_eq!(PipelineState::Resolving.to_string(), "resolving");
        assert_eq!(PipelineState::Watching.to_string(), "watching");
    }
}
