//! The immutable build configuration value and its resolution.

use crate::env::EnvSnapshot;
use crate::error::ConfigError;
use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Active pipeline mode. Exactly one is active per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// One-shot development build.
    Development,
    /// One-shot production build.
    Production,
    /// Continuous watch-build (development base configuration).
    Watch,
}

impl Mode {
    /// Whether this mode composes the production-only stages.
    pub fn is_production(self) -> bool {
        matches!(self, Mode::Production)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Development => write!(f, "development"),
            Mode::Production => write!(f, "production"),
            Mode::Watch => write!(f, "watch"),
        }
    }
}

/// What the caller asked for, before the environment has its say.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeRequest {
    /// One-shot build; `NODE_ENV=prod` selects the production variant.
    OneShot,
    /// One-shot build, production variant forced regardless of `NODE_ENV`.
    Production,
    /// Continuous watch-build; requires the `WATCH` signal.
    Watch,
}

/// Caller-level overrides merged on top of defaults and `SATCHEL_*` env.
///
/// Only fields that are `Some` participate in the merge.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_pwa: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_warnings: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_root: Option<PathBuf>,
}

/// Progressive-web-app metadata, emitted into the PWA manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PwaConfig {
    pub app_name: String,
    pub short_name: String,
    pub description: String,
    pub background_color: String,
    pub theme_color: String,
    /// Path to the logo used for every generated icon entry.
    pub logo: PathBuf,
    /// Square icon sizes generated from the logo.
    pub icon_sizes: Vec<u32>,
    /// Single large icon specification, `WxH` form.
    pub large_icon_size: String,
}

/// Performance thresholds consumed by production stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceConfig {
    /// Assets below this byte size are skipped by the compression stage.
    pub compression_threshold: u64,
}

/// Debounce and polling knobs for watch sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Quiet period after the first change before a rebuild fires.
    pub aggregate_timeout_ms: u64,
    /// Fallback polling interval for the filesystem observer.
    pub poll_interval_ms: u64,
    /// Path fragments excluded from watching.
    pub ignored: Vec<String>,
}

/// The resolved, immutable build configuration.
///
/// Created once per process by [`BuildConfig::resolve`] and never mutated
/// afterwards; every stage borrows it read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Active mode; invariant: exactly one of the three.
    pub mode: Mode,
    /// Whether PWA stages are composed. Orthogonal to `mode`.
    pub is_pwa: bool,
    /// Critical-CSS extraction variant, toggled by `CRITICAL`.
    pub critical: bool,
    /// Present iff the `WATCH` environment signal was set at resolution.
    pub watch_signal: bool,

    /// Root of the generated output tree. Cleanup never escapes it.
    pub public_root: PathBuf,
    /// Base path recorded in the assets manifest.
    pub manifest_base: String,
    /// Javascript output subdirectory, relative to `public_root`.
    pub js_path: String,
    /// Stylesheet output subdirectory, relative to `public_root`.
    pub css_path: String,
    /// Source assets location, watched in watch mode.
    pub assets_path: PathBuf,

    /// Entry files handed to the compiler.
    pub js_entries: Vec<String>,
    /// Output naming template for scripts.
    pub js_output_template: String,
    /// Output naming template for stylesheets.
    pub css_output_template: String,

    pub pwa: PwaConfig,
    pub performance: PerformanceConfig,
    pub watch: WatchConfig,

    /// Chatty per-step logging.
    pub verbose: bool,
    /// Desktop/terminal notifications on diagnostics.
    pub notifications: bool,
    /// Suppress warning itemization and notification.
    pub ignore_warnings: bool,
    /// Log the elapsed-time line after each pass.
    pub performance_log: bool,
}

impl BuildConfig {
    /// Resolve the configuration from the environment snapshot, the caller's
    /// mode request and explicit overrides.
    ///
    /// Deterministic: the same inputs (plus identical `SATCHEL_*` process
    /// environment) always produce an identical value.
    ///
    /// # Errors
    ///
    /// Fails fast with [`ConfigError::WatchSignalMissing`] when watch mode is
    /// requested without the `WATCH` signal, or with extraction/validation
    /// errors for malformed overrides. Never falls back silently.
    pub fn resolve(
        snapshot: &EnvSnapshot,
        request: ModeRequest,
        overrides: &Overrides,
    ) -> Result<Self, ConfigError> {
        let mode = match request {
            ModeRequest::Production => Mode::Production,
            ModeRequest::OneShot => {
                if snapshot.is_production() {
                    Mode::Production
                } else {
                    Mode::Development
                }
            }
            ModeRequest::Watch => {
                if !snapshot.watch {
                    return Err(ConfigError::WatchSignalMissing);
                }
                Mode::Watch
            }
        };

        let defaults = Self::default_config(mode, snapshot);

        let mut config: Self = Figment::new()
            .merge(Serialized::defaults(defaults))
            .merge(Env::prefixed("SATCHEL_").split("__"))
            .merge(Serialized::defaults(overrides))
            .extract()?;

        // Mode and signal fields are contract values, not override surface.
        config.mode = mode;
        config.critical = snapshot.critical;
        config.watch_signal = snapshot.watch;

        config.validate()?;
        tracing::debug!(mode = %config.mode, is_pwa = config.is_pwa, "configuration resolved");
        Ok(config)
    }

    /// Compiled-in defaults for a given mode.
    pub(crate) fn default_config(mode: Mode, snapshot: &EnvSnapshot) -> Self {
        Self {
            mode,
            is_pwa: false,
            critical: snapshot.critical,
            watch_signal: snapshot.watch,
            public_root: PathBuf::from("public"),
            manifest_base: "/".to_string(),
            js_path: "js".to_string(),
            css_path: "css".to_string(),
            assets_path: PathBuf::from("resources/assets"),
            js_entries: vec!["main.js".to_string()],
            js_output_template: "[name]-[hash].js".to_string(),
            css_output_template: "[name]-[hash].css".to_string(),
            pwa: PwaConfig {
                app_name: "Satchel".to_string(),
                short_name: "Satchel".to_string(),
                description: "Satchel".to_string(),
                background_color: "#3a74a5".to_string(),
                theme_color: "#3a74a5".to_string(),
                logo: PathBuf::from("public/favicon.ico"),
                icon_sizes: vec![96, 128, 192, 256, 384, 512],
                large_icon_size: "1024x1024".to_string(),
            },
            performance: PerformanceConfig {
                compression_threshold: 0,
            },
            watch: WatchConfig {
                aggregate_timeout_ms: 300,
                poll_interval_ms: 1000,
                ignored: vec!["node_modules".to_string()],
            },
            verbose: false,
            notifications: true,
            ignore_warnings: false,
            performance_log: true,
        }
    }

    /// Glob patterns cleaned before every build, relative to `public_root`.
    ///
    /// Ordered: stylesheets first, then scripts, matching the dependent-folder
    /// cleanup order the log output documents.
    pub fn clean_targets(&self) -> Vec<String> {
        vec![format!("{}/*", self.css_path), format!("{}/*", self.js_path)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dev_snapshot() -> EnvSnapshot {
        EnvSnapshot::from_values(Some("development"), false, false)
    }

    #[test]
    fn resolve_is_deterministic() {
        let snap = dev_snapshot();
        let a = BuildConfig::resolve(&snap, ModeRequest::OneShot, &Overrides::default()).unwrap();
        let b = BuildConfig::resolve(&snap, ModeRequest::OneShot, &Overrides::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn node_env_prod_selects_production() {
        let snap = EnvSnapshot::from_values(Some("prod"), false, false);
        let config =
            BuildConfig::resolve(&snap, ModeRequest::OneShot, &Overrides::default()).unwrap();
        assert_eq!(config.mode, Mode::Production);
    }

    #[test]
    fn default_mode_is_development() {
        let config = BuildConfig::resolve(
            &EnvSnapshot::default(),
            ModeRequest::OneShot,
            &Overrides::default(),
        )
        .unwrap();
        assert_eq!(config.mode, Mode::Development);
        assert!(!config.is_pwa);
    }

    #[test]
    fn production_request_overrides_node_env() {
        let config = BuildConfig::resolve(
            &dev_snapshot(),
            ModeRequest::Production,
            &Overrides::default(),
        )
        .unwrap();
        assert_eq!(config.mode, Mode::Production);
    }

    #[test]
    fn watch_without_signal_is_refused() {
        let err = BuildConfig::resolve(
            &EnvSnapshot::from_values(None, false, false),
            ModeRequest::Watch,
            &Overrides::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::WatchSignalMissing));
    }

    #[test]
    fn watch_with_signal_resolves() {
        let snap = EnvSnapshot::from_values(None, true, false);
        let config =
            BuildConfig::resolve(&snap, ModeRequest::Watch, &Overrides::default()).unwrap();
        assert_eq!(config.mode, Mode::Watch);
        assert!(config.watch_signal);
    }

    #[test]
    fn critical_flag_carried_from_snapshot() {
        let snap = EnvSnapshot::from_values(None, false, true);
        let config =
            BuildConfig::resolve(&snap, ModeRequest::OneShot, &Overrides::default()).unwrap();
        assert!(config.critical);
    }

    #[test]
    fn overrides_win_over_defaults() {
        let overrides = Overrides {
            is_pwa: Some(true),
            verbose: Some(true),
            ..Overrides::default()
        };
        let config = BuildConfig::resolve(&dev_snapshot(), ModeRequest::OneShot, &overrides)
            .unwrap();
        assert!(config.is_pwa);
        assert!(config.verbose);
        // Untouched fields keep their defaults.
        assert!(config.notifications);
    }

    #[test]
    fn clean_targets_are_ordered_and_rooted() {
        let config = BuildConfig::resolve(
            &dev_snapshot(),
            ModeRequest::OneShot,
            &Overrides::default(),
        )
        .unwrap();
        assert_eq!(config.clean_targets(), vec!["css/*", "js/*"]);
    }
}
