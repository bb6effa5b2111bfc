//! Watch sessions: filesystem observation, debouncing and sequential
//! rebuild scheduling.
//!
//! A [`WatchSession`] owns the compiler for its whole lifetime. Change
//! events are aggregated into batches per the debounce window; each batch
//! triggers exactly one compilation pass, and the next batch is not compiled
//! until the previous result has been delivered. Stopping lets an in-flight
//! pass finish and report before teardown.

use crate::compiler::{CompileSpec, CompilerEngine};
use crate::error::PipelineError;
use crate::report::BuildResult;
use notify::{Config as NotifyConfig, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Debounce/poll configuration of one watch session.
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Directory observed recursively.
    pub root: PathBuf,
    /// Quiet period closing a change batch.
    pub aggregate_timeout: Duration,
    /// Fallback polling interval for the observer backend.
    pub poll_interval: Duration,
    /// Path fragments excluded from observation.
    pub ignored: Vec<String>,
}

impl WatchOptions {
    pub fn from_config(config: &satchel_config::BuildConfig) -> Self {
        Self {
            root: config.assets_path.clone(),
            aggregate_timeout: Duration::from_millis(config.watch.aggregate_timeout_ms),
            poll_interval: Duration::from_millis(config.watch.poll_interval_ms),
            ignored: config.watch.ignored.clone(),
        }
    }
}

/// One debounced batch of filesystem changes.
#[derive(Debug, Clone, Default)]
pub struct ChangeBatch {
    pub paths: Vec<PathBuf>,
}

/// Check whether a changed path is irrelevant to the session.
fn should_ignore(path: &Path, root: &Path, ignored: &[String]) -> bool {
    let rel = match path.strip_prefix(root) {
        Ok(rel) => rel,
        // Events outside the watched root are never ours to react to.
        Err(_) => return true,
    };
    let rel_str = rel.to_string_lossy();

    for pattern in ignored {
        if let Some(ext) = pattern.strip_prefix('*') {
            if rel_str.ends_with(ext) {
                return true;
            }
        } else if rel_str.starts_with(pattern.as_str())
            || rel_str.contains(&format!("/{pattern}"))
        {
            return true;
        }
    }

    // Hidden files and directories are editor noise.
    rel.components().any(|component| {
        component
            .as_os_str()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
    })
}

/// Build a notify-backed change-batch source for the given options.
///
/// Returns the watcher handle (dropping it stops observation) and the batch
/// channel. Must be called within a tokio runtime; the aggregation task is
/// spawned onto it.
pub fn fs_change_source(
    options: &WatchOptions,
) -> Result<(RecommendedWatcher, mpsc::Receiver<ChangeBatch>), PipelineError> {
    let (raw_tx, mut raw_rx) = mpsc::channel::<PathBuf>(256);
    let root = options.root.clone();
    let ignored = options.ignored.clone();

    let mut watcher = RecommendedWatcher::new(
        move |event: notify::Result<Event>| {
            if let Ok(event) = event {
                for path in event.paths {
                    if !should_ignore(&path, &root, &ignored) {
                        // Full channel means a batch is already pending.
                        let _ = raw_tx.try_send(path);
                    }
                }
            }
        },
        NotifyConfig::default().with_poll_interval(options.poll_interval),
    )?;
    watcher.watch(&options.root, RecursiveMode::Recursive)?;

    let aggregate_timeout = options.aggregate_timeout;
    let (batch_tx, batch_rx) = mpsc::channel(16);
    tokio::spawn(async move {
        while let Some(first) = raw_rx.recv().await {
            let mut paths = vec![first];
            // Extend the batch until the quiet period elapses.
            while let Ok(Some(path)) =
                tokio::time::timeout(aggregate_timeout, raw_rx.recv()).await
            {
                paths.push(path);
            }
            paths.dedup();
            if batch_tx.send(ChangeBatch { paths }).await.is_err() {
                return;
            }
        }
    });

    Ok((watcher, batch_rx))
}

/// A live watch session. Owns the compiler spec and engine until stopped.
pub struct WatchSession {
    results: mpsc::Receiver<BuildResult>,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
    // Kept alive for the session's lifetime; dropping stops fs observation.
    _watcher: Option<RecommendedWatcher>,
}

impl WatchSession {
    /// Spawn the rebuild loop over a change-batch source.
    pub(crate) fn spawn(
        engine: Arc<dyn CompilerEngine>,
        spec: CompileSpec,
        mut source: mpsc::Receiver<ChangeBatch>,
        watcher: Option<RecommendedWatcher>,
    ) -> Self {
        let (result_tx, result_rx) = mpsc::channel(16);
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.changed() => break,
                    maybe = source.recv() => {
                        let Some(batch) = maybe else { break };
                        tracing::debug!(changes = batch.paths.len(), "rebuilding");
                        match engine.compile(&spec).await {
                            Ok(raw) => {
                                if result_tx.send(raw.normalize()).await.is_err() {
                                    break;
                                }
                            }
                            Err(e) => {
                                tracing::error!("compiler engine failed while watching: {e}");
                                break;
                            }
                        }
                    }
                }
            }
        });

        Self {
            results: result_rx,
            shutdown: shutdown_tx,
            task,
            _watcher: watcher,
        }
    }

    /// Next rebuild result, or `None` once the session has ended.
    pub async fn next_result(&mut self) -> Option<BuildResult> {
        self.results.recv().await
    }

    /// Stop the session.
    ///
    /// An in-flight pass is allowed to finish; its result, along with any
    /// other undelivered ones, is returned for final reporting.
    pub async fn stop(mut self) -> Vec<BuildResult> {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;

        let mut leftovers = Vec::new();
        while let Ok(result) = self.results.try_recv() {
            leftovers.push(result);
        }
        leftovers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{CompileSpec, ConfigVariant, RawStats};
    use crate::error::EngineError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn spec() -> CompileSpec {
        CompileSpec {
            variant: ConfigVariant::Development,
            public_root: PathBuf::from("public"),
            entries: vec!["main.js".to_string()],
            output_template: "[name]-[hash].js".to_string(),
            stages: vec![],
        }
    }

    /// Engine that stamps each pass with a counter and asserts no overlap.
    struct CountingEngine {
        passes: AtomicU64,
        in_flight: AtomicU64,
    }

    impl CountingEngine {
        fn new() -> Self {
            Self {
                passes: AtomicU64::new(0),
                in_flight: AtomicU64::new(0),
            }
        }
    }

    #[async_trait]
    impl CompilerEngine for CountingEngine {
        async fn compile(&self, _spec: &CompileSpec) -> Result<RawStats, EngineError> {
            assert_eq!(self.in_flight.fetch_add(1, Ordering::SeqCst), 0);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            let pass = self.passes.fetch_add(1, Ordering::SeqCst);
            Ok(RawStats {
                errors: Some(vec![]),
                warnings: Some(vec![]),
                start_time: Some(pass * 100),
                end_time: Some(pass * 100 + 10),
            })
        }
    }

    #[tokio::test]
    async fn two_batches_yield_two_sequential_results() {
        let (tx, rx) = mpsc::channel(4);
        let mut session =
            WatchSession::spawn(Arc::new(CountingEngine::new()), spec(), rx, None);

        tx.send(ChangeBatch::default()).await.unwrap();
        tx.send(ChangeBatch::default()).await.unwrap();

        let first = session.next_result().await.unwrap();
        let second = session.next_result().await.unwrap();
        assert_eq!(first.timing.unwrap().start_ms, 0);
        assert_eq!(second.timing.unwrap().start_ms, 100);

        drop(tx);
        assert!(session.stop().await.is_empty());
    }

    #[tokio::test]
    async fn stop_delivers_in_flight_result() {
        let (tx, rx) = mpsc::channel(4);
        let session = WatchSession::spawn(Arc::new(CountingEngine::new()), spec(), rx, None);

        tx.send(ChangeBatch::default()).await.unwrap();
        // Let the pass start before stopping.
        tokio::time::sleep(Duration::from_millis(2)).await;

        let leftovers = session.stop().await;
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn ignores_configured_fragments_and_hidden_paths() {
        let root = PathBuf::from("/project/assets");
        let ignored = vec!["node_modules".to_string(), "*.log".to_string()];

        assert!(should_ignore(
            Path::new("/project/assets/node_modules/x/y.js"),
            &root,
            &ignored
        ));
        assert!(should_ignore(
            Path::new("/project/assets/debug.log"),
            &root,
            &ignored
        ));
        assert!(should_ignore(
            Path::new("/project/assets/.git/config"),
            &root,
            &ignored
        ));
        assert!(should_ignore(Path::new("/elsewhere/a.js"), &root, &ignored));
        assert!(!should_ignore(
            Path::new("/project/assets/js/main.js"),
            &root,
            &ignored
        ));
    }
}
