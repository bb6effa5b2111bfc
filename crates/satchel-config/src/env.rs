//! Snapshot of the contract environment variables.
//!
//! `NODE_ENV`, `WATCH` and `CRITICAL` are the externally documented signals
//! that select the pipeline mode. They are read exactly once into an
//! [`EnvSnapshot`] so that [`BuildConfig::resolve`](crate::BuildConfig::resolve)
//! is a pure function of the snapshot: same snapshot, identical config.

/// Captured values of the mode-selecting environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    /// Raw value of `NODE_ENV`, if set.
    pub node_env: Option<String>,
    /// Whether `WATCH` is set (any non-empty value counts).
    pub watch: bool,
    /// Whether `CRITICAL` is set, enabling the critical-CSS variant.
    pub critical: bool,
}

impl EnvSnapshot {
    /// Capture the snapshot from the process environment.
    pub fn capture() -> Self {
        Self {
            node_env: std::env::var("NODE_ENV").ok().filter(|v| !v.is_empty()),
            watch: std::env::var("WATCH").is_ok_and(|v| !v.is_empty()),
            critical: std::env::var("CRITICAL").is_ok_and(|v| !v.is_empty()),
        }
    }

    /// Build a snapshot from explicit values, for deterministic tests.
    pub fn from_values(node_env: Option<&str>, watch: bool, critical: bool) -> Self {
        Self {
            node_env: node_env.map(str::to_owned),
            watch,
            critical,
        }
    }

    /// Whether `NODE_ENV` selects the production base configuration.
    ///
    /// The recognized value is the exact string `prod`.
    pub fn is_production(&self) -> bool {
        self.node_env.as_deref() == Some("prod")
    }
}
