//! Deterministic stage-plugin composition.
//!
//! The single place where conditional stage attachment lives. The ordering
//! rules are load-bearing:
//!
//! 1. Shared stages first, fixed order - downstream stages depend on the
//!    manifest hook being registered before them.
//! 2. PWA stages only when `is_pwa`, after shared and before mode-specific,
//!    so they see the final chunk list.
//! 3. Production-only stages last, only in production mode.

use crate::stage::StagePlugin;
use crate::stages::{
    ChunkMergePlugin, CompressionPlugin, CriticalCssPlugin, DefineEnvPlugin,
    HashedModuleIdsPlugin, ManifestPlugin, MinifyPlugin, ModuleConcatenationPlugin,
    ProgressPlugin, PwaManifestPlugin, ServiceWorkerPlugin,
};
use satchel_config::{BuildConfig, Mode};

/// Build the ordered stage list for one compiler invocation.
///
/// Pure and stable: identical `(config, mode)` always yields the same
/// sequence. The plugins are fresh values owned by the caller.
pub fn compose(config: &BuildConfig, mode: Mode) -> Vec<Box<dyn StagePlugin>> {
    let mut stages: Vec<Box<dyn StagePlugin>> = vec![
        Box::new(ProgressPlugin),
        Box::new(ChunkMergePlugin::default()),
        Box::new(ModuleConcatenationPlugin),
        Box::new(ManifestPlugin::from_config(config)),
    ];

    if config.critical {
        stages.push(Box::new(CriticalCssPlugin));
    }

    if config.is_pwa {
        stages.push(Box::new(ServiceWorkerPlugin::default()));
        stages.push(Box::new(PwaManifestPlugin::from_config(config)));
    }

    if mode.is_production() {
        stages.push(Box::new(DefineEnvPlugin::default()));
        stages.push(Box::new(HashedModuleIdsPlugin));
        stages.push(Box::new(MinifyPlugin::default()));
        stages.push(Box::new(CompressionPlugin::from_config(config)));
    }

    stages
}

#[cfg(test)]
mod tests {
    use super::*;
    use satchel_config::{EnvSnapshot, ModeRequest, Overrides};

    fn config(request: ModeRequest, pwa: bool) -> BuildConfig {
        BuildConfig::resolve(
            &EnvSnapshot::default(),
            request,
            &Overrides {
                is_pwa: Some(pwa),
                ..Overrides::default()
            },
        )
        .unwrap()
    }

    fn names(stages: &[Box<dyn StagePlugin>]) -> Vec<&'static str> {
        stages.iter().map(|s| s.name()).collect()
    }

    #[test]
    fn development_composition() {
        let config = config(ModeRequest::OneShot, false);
        let stages = compose(&config, config.mode);
        assert_eq!(
            names(&stages),
            vec!["progress", "chunk-merge", "module-concatenation", "manifest"]
        );
    }

    #[test]
    fn production_appends_mode_stages_last() {
        let config = config(ModeRequest::Production, false);
        let stages = compose(&config, config.mode);
        assert_eq!(
            names(&stages),
            vec![
                "progress",
                "chunk-merge",
                "module-concatenation",
                "manifest",
                "define-env",
                "hashed-module-ids",
                "minify",
                "compression",
            ]
        );
    }

    #[test]
    fn pwa_stages_sit_between_shared_and_production() {
        let config = config(ModeRequest::Production, true);
        let stages = compose(&config, config.mode);
        let names = names(&stages);
        let sw = names.iter().position(|n| *n == "service-worker").unwrap();
        let manifest = names.iter().position(|n| *n == "manifest").unwrap();
        let define = names.iter().position(|n| *n == "define-env").unwrap();
        assert!(manifest < sw);
        assert!(sw < define);
        assert_eq!(names[sw + 1], "pwa-manifest");
    }

    #[test]
    fn composition_is_stable_across_calls() {
        let config = config(ModeRequest::Production, true);
        let a = names(&compose(&config, config.mode));
        let b = names(&compose(&config, config.mode));
        assert_eq!(a, b);
    }

    #[test]
    fn no_duplicate_stage_names() {
        let mut config = config(ModeRequest::Production, true);
        config.critical = true;
        let stages = compose(&config, config.mode);
        let mut seen = std::collections::HashSet::new();
        for stage in &stages {
            assert!(seen.insert(stage.name()), "duplicate stage {}", stage.name());
        }
    }

    #[test]
    fn watch_mode_uses_development_set() {
        let snap = EnvSnapshot::from_values(None, true, false);
        let config = BuildConfig::resolve(&snap, ModeRequest::Watch, &Overrides::default()).unwrap();
        let stages = compose(&config, config.mode);
        assert!(!names(&stages).contains(&"minify"));
    }

    #[test]
    fn critical_stage_toggled_by_flag() {
        let mut config = config(ModeRequest::OneShot, false);
        config.critical = true;
        let stages = compose(&config, config.mode);
        assert!(names(&stages).contains(&"critical-css"));
    }
}
