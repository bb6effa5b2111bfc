//! Structured result reporting.
//!
//! [`format`] is a pure function from a [`BuildResult`] to a [`Report`]; it
//! never fails, degrading to an omitted timing line when the compiler did
//! not provide timestamps. Console and notification output is the emitter's
//! delegated side effect, kept out of the pure part.

use std::sync::Arc;
use std::time::Duration;

/// Start/end timestamps of one compilation pass, in unix milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub start_ms: u64,
    pub end_ms: u64,
}

impl Timing {
    /// Elapsed wall time; saturates on inverted timestamps.
    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.end_ms.saturating_sub(self.start_ms))
    }
}

/// Diagnostics and timing of one compilation pass.
///
/// Produced once per pass, consumed exactly once by the formatter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// Absent when the compiler omitted timing fields.
    pub timing: Option<Timing>,
    /// Wire-protocol violations detected while normalizing the raw stats,
    /// e.g. an absent (rather than empty) diagnostics field.
    pub protocol_warnings: Vec<String>,
}

/// Summary classification of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Clean,
    Warnings,
    Errors,
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Classification::Clean => write!(f, "clean"),
            Classification::Warnings => write!(f, "warnings"),
            Classification::Errors => write!(f, "errors"),
        }
    }
}

/// The formatted report of one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub classification: Classification,
    pub error_count: usize,
    pub warning_count: usize,
    /// Elapsed seconds at millisecond precision; `None` without timing.
    pub elapsed_secs: Option<f64>,
}

/// Turn a build result into a report. Pure; never fails.
pub fn format(result: &BuildResult) -> Report {
    let classification = if !result.errors.is_empty() {
        Classification::Errors
    } else if !result.warnings.is_empty() {
        Classification::Warnings
    } else {
        Classification::Clean
    };

    Report {
        classification,
        error_count: result.errors.len(),
        warning_count: result.warnings.len(),
        elapsed_secs: result
            .timing
            .map(|t| t.elapsed().as_millis() as f64 / 1000.0),
    }
}

/// Fire-and-forget desktop/terminal notification sink.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, message: &str);
}

/// Notifier that drops everything, for quiet mode and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _title: &str, _message: &str) {}
}

/// Emits reports to the log and, when enabled, the notifier.
pub struct ReportEmitter {
    notifier: Arc<dyn Notifier>,
    app_name: String,
    notifications: bool,
    ignore_warnings: bool,
    performance_log: bool,
    verbose: bool,
}

impl ReportEmitter {
    pub fn new(notifier: Arc<dyn Notifier>, config: &satchel_config::BuildConfig) -> Self {
        Self {
            notifier,
            app_name: config.pwa.app_name.clone(),
            notifications: config.notifications,
            ignore_warnings: config.ignore_warnings,
            performance_log: config.performance_log,
            verbose: config.verbose,
        }
    }

    /// Log the report and notify on diagnostics. Never fails.
    pub fn emit(&self, report: &Report, result: &BuildResult, watching: bool) {
        for violation in &result.protocol_warnings {
            tracing::warn!("compiler protocol: {violation}");
        }

        match report.classification {
            Classification::Clean => tracing::info!("all good, great job"),
            Classification::Errors => {
                tracing::error!("build has {} error(s)", report.error_count);
                if self.verbose {
                    for (index, error) in result.errors.iter().enumerate() {
                        tracing::error!("error #{}: {error}", index + 1);
                    }
                }
                if self.notifications {
                    self.notifier.notify(
                        &self.app_name,
                        &format!("Build has {} error(s)!", report.error_count),
                    );
                }
            }
            Classification::Warnings => {
                if self.ignore_warnings {
                    tracing::debug!("{} warning(s) ignored", report.warning_count);
                } else {
                    tracing::warn!("build has {} warning(s)", report.warning_count);
                    if self.verbose {
                        for (index, warning) in result.warnings.iter().enumerate() {
                            tracing::warn!("warning #{}: {warning}", index + 1);
                        }
                    }
                    if self.notifications {
                        self.notifier.notify(
                            &self.app_name,
                            &format!("Build has {} warning(s)!", report.warning_count),
                        );
                    }
                }
            }
        }

        if self.performance_log {
            if let Some(secs) = report.elapsed_secs {
                tracing::info!("built in {secs:.3} sec");
            }
        }

        if watching {
            tracing::info!("watching for changes...");
        } else {
            tracing::info!("build complete");
        }
    }
}
