//! Stages composed in every mode, in fixed order.

use crate::stage::{StagePhase, StagePlugin};
use satchel_config::BuildConfig;
use serde::Serialize;

/// Streams compilation progress to the console.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressPlugin;

impl StagePlugin for ProgressPlugin {
    fn name(&self) -> &'static str {
        "progress"
    }

    fn phase(&self) -> StagePhase {
        StagePhase::Reporting
    }

    fn options(&self) -> serde_json::Value {
        serde_json::json!({})
    }
}

/// Merges modules shared by several chunks into a common chunk and drops
/// obsolete chunks left over from previous passes.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ChunkMergePlugin {
    /// A module appearing in at least this many chunks is hoisted.
    pub min_chunks: u32,
}

impl Default for ChunkMergePlugin {
    fn default() -> Self {
        Self { min_chunks: 2 }
    }
}

impl StagePlugin for ChunkMergePlugin {
    fn name(&self) -> &'static str {
        "chunk-merge"
    }

    fn phase(&self) -> StagePhase {
        StagePhase::Chunking
    }

    fn options(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Concatenates module scopes inside each chunk.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModuleConcatenationPlugin;

impl StagePlugin for ModuleConcatenationPlugin {
    fn name(&self) -> &'static str {
        "module-concatenation"
    }

    fn phase(&self) -> StagePhase {
        StagePhase::Optimization
    }

    fn options(&self) -> serde_json::Value {
        serde_json::json!({})
    }
}

/// Emits the assets manifest mapping logical names to hashed output paths.
///
/// Composed with the shared block so downstream stages can register against
/// its hook, but executed in the emission phase, after optimization.
#[derive(Debug, Clone, Serialize)]
pub struct ManifestPlugin {
    pub file_name: String,
    pub base_path: String,
    pub seed_name: String,
}

impl ManifestPlugin {
    pub fn from_config(config: &BuildConfig) -> Self {
        Self {
            file_name: "mix-manifest.json".to_string(),
            base_path: config.manifest_base.clone(),
            seed_name: "Build assets manifest".to_string(),
        }
    }
}

impl StagePlugin for ManifestPlugin {
    fn name(&self) -> &'static str {
        "manifest"
    }

    fn phase(&self) -> StagePhase {
        StagePhase::Emission
    }

    fn options(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Critical-CSS extraction variant, toggled by the `CRITICAL` signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct CriticalCssPlugin;

impl StagePlugin for CriticalCssPlugin {
    fn name(&self) -> &'static str {
        "critical-css"
    }

    fn phase(&self) -> StagePhase {
        StagePhase::Emission
    }

    fn options(&self) -> serde_json::Value {
        serde_json::json!({})
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use satchel_config::{EnvSnapshot, ModeRequest, Overrides};

    #[test]
    fn manifest_carries_file_name_and_base() {
        let config = BuildConfig::resolve(
            &EnvSnapshot::default(),
            ModeRequest::OneShot,
            &Overrides::default(),
        )
        .unwrap();
        let plugin = ManifestPlugin::from_config(&config);
        let options = plugin.options();
        assert_eq!(options["file_name"], "mix-manifest.json");
        assert_eq!(options["base_path"], "/");
        assert_eq!(options["seed_name"], "Build assets manifest");
    }

    #[test]
    fn chunk_merge_defaults_to_two() {
        assert_eq!(ChunkMergePlugin::default().options()["min_chunks"], 2);
    }
}
