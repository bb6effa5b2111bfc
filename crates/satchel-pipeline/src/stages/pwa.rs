//! PWA stages, inserted only when the configuration enables PWA mode.

use crate::stage::{StagePhase, StagePlugin};
use satchel_config::BuildConfig;
use serde::Serialize;

/// Injects the offline service worker runtime.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ServiceWorkerPlugin {
    /// Expose lifecycle events to the page runtime.
    pub events: bool,
}

impl Default for ServiceWorkerPlugin {
    fn default() -> Self {
        Self { events: true }
    }
}

impl StagePlugin for ServiceWorkerPlugin {
    fn name(&self) -> &'static str {
        "service-worker"
    }

    fn phase(&self) -> StagePhase {
        StagePhase::Emission
    }

    fn options(&self) -> serde_json::Value {
        serde_json::json!({ "service_worker": { "events": self.events } })
    }
}

/// One icon entry of the PWA manifest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PwaIcon {
    pub src: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sizes: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

/// Generates the PWA manifest JSON file.
///
/// The manifest shape is part of the external contract: a fixed
/// portrait/standalone header, the application metadata from configuration,
/// and two icon entries derived from the single configured logo.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PwaManifestPlugin {
    pub file_name: String,
    pub orientation: String,
    pub display: String,
    pub start_url: String,
    pub inject: bool,
    pub fingerprints: bool,
    pub ios: bool,
    pub name: String,
    pub short_name: String,
    pub description: String,
    pub background_color: String,
    pub theme_color: String,
    pub icons: Vec<PwaIcon>,
}

impl PwaManifestPlugin {
    pub fn from_config(config: &BuildConfig) -> Self {
        let logo = config.pwa.logo.to_string_lossy().into_owned();
        Self {
            file_name: "manifest-pwa.json".to_string(),
            orientation: "portrait".to_string(),
            display: "standalone".to_string(),
            start_url: "/".to_string(),
            inject: true,
            fingerprints: false,
            ios: false,
            name: config.pwa.app_name.clone(),
            short_name: config.pwa.short_name.clone(),
            description: config.pwa.description.clone(),
            background_color: config.pwa.background_color.clone(),
            theme_color: config.pwa.theme_color.clone(),
            icons: vec![
                PwaIcon {
                    src: logo.clone(),
                    sizes: Some(config.pwa.icon_sizes.clone()),
                    size: None,
                },
                PwaIcon {
                    src: logo,
                    sizes: None,
                    size: Some(config.pwa.large_icon_size.clone()),
                },
            ],
        }
    }

    /// The manifest document itself, as written to `file_name`.
    pub fn manifest_json(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "short_name": self.short_name,
            "description": self.description,
            "background_color": self.background_color,
            "theme_color": self.theme_color,
            "orientation": self.orientation,
            "display": self.display,
            "start_url": self.start_url,
            "icons": self.icons,
        })
    }
}

impl StagePlugin for PwaManifestPlugin {
    fn name(&self) -> &'static str {
        "pwa-manifest"
    }

    fn phase(&self) -> StagePhase {
        StagePhase::Emission
    }

    fn options(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}
