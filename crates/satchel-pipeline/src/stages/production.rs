//! Production-only stages, appended after shared and PWA stages.

use crate::stage::{StagePhase, StagePlugin};
use satchel_config::BuildConfig;
use serde::Serialize;

/// Folds `NODE_ENV` into a compile-time constant so dev-only branches drop
/// out in production bundles.
#[derive(Debug, Clone, Serialize)]
pub struct DefineEnvPlugin {
    pub node_env: String,
}

impl Default for DefineEnvPlugin {
    fn default() -> Self {
        Self {
            node_env: "production".to_string(),
        }
    }
}

impl StagePlugin for DefineEnvPlugin {
    fn name(&self) -> &'static str {
        "define-env"
    }

    fn phase(&self) -> StagePhase {
        StagePhase::Optimization
    }

    fn options(&self) -> serde_json::Value {
        serde_json::json!({ "process.env": { "NODE_ENV": self.node_env } })
    }
}

/// Derives module identifiers from relative paths so hashes stay stable
/// across builds.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashedModuleIdsPlugin;

impl StagePlugin for HashedModuleIdsPlugin {
    fn name(&self) -> &'static str {
        "hashed-module-ids"
    }

    fn phase(&self) -> StagePhase {
        StagePhase::Optimization
    }

    fn options(&self) -> serde_json::Value {
        serde_json::json!({})
    }
}

/// Minifies emitted scripts.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MinifyPlugin {
    pub ecma: u8,
    pub safari10: bool,
    pub ie8: bool,
}

impl Default for MinifyPlugin {
    fn default() -> Self {
        Self {
            ecma: 5,
            safari10: true,
            ie8: false,
        }
    }
}

impl StagePlugin for MinifyPlugin {
    fn name(&self) -> &'static str {
        "minify"
    }

    fn phase(&self) -> StagePhase {
        StagePhase::Optimization
    }

    fn options(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Writes a gzip sibling next to each emitted asset so the server can send
/// precompressed responses.
#[derive(Debug, Clone, Serialize)]
pub struct CompressionPlugin {
    pub algorithm: String,
    pub asset_template: String,
    /// Extensions eligible for compression.
    pub extensions: Vec<String>,
    /// Assets below this byte size are skipped.
    pub threshold: u64,
}

impl CompressionPlugin {
    pub fn from_config(config: &BuildConfig) -> Self {
        Self {
            algorithm: "gzip".to_string(),
            asset_template: "[path].gz[query]".to_string(),
            extensions: ["js", "css", "html", "eot", "ttf", "woff", "svg"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            threshold: config.performance.compression_threshold,
        }
    }
}

impl StagePlugin for CompressionPlugin {
    fn name(&self) -> &'static str {
        "compression"
    }

    fn phase(&self) -> StagePhase {
        StagePhase::Compression
    }

    fn options(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use satchel_config::{EnvSnapshot, ModeRequest, Overrides};

    #[test]
    fn compression_reads_threshold_from_config() {
        let mut config = BuildConfig::resolve(
            &EnvSnapshot::default(),
            ModeRequest::Production,
            &Overrides::default(),
        )
        .unwrap();
        config.performance.compression_threshold = 10_240;

        let plugin = CompressionPlugin::from_config(&config);
        assert_eq!(plugin.threshold, 10_240);
        assert_eq!(plugin.options()["algorithm"], "gzip");
    }

    #[test]
    fn define_env_targets_production() {
        let options = DefineEnvPlugin::default().options();
        assert_eq!(options["process.env"]["NODE_ENV"], "production");
    }

    #[test]
    fn minify_defaults_match_legacy_targets() {
        let plugin = MinifyPlugin::default();
        assert_eq!(plugin.ecma, 5);
        assert!(plugin.safari10);
        assert!(!plugin.ie8);
    }
}
