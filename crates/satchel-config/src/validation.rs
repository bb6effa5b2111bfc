//! Post-resolution validation of the configuration value.

use crate::config::BuildConfig;
use crate::error::ConfigError;
use std::path::Path;

impl BuildConfig {
    /// Validate invariants that the type system cannot express.
    ///
    /// Called by [`BuildConfig::resolve`]; exposed for callers that build a
    /// config value by hand in tests.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.js_entries.is_empty() {
            return Err(ConfigError::MissingField {
                field: "js_entries".to_string(),
                hint: "at least one entry file is required".to_string(),
            });
        }

        // Output subpaths must stay relative so cleanup targets resolve
        // under public_root.
        for (field, value) in [("js_path", &self.js_path), ("css_path", &self.css_path)] {
            if Path::new(value).is_absolute() || value.contains("..") || value.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: value.clone(),
                    hint: "must be a non-empty relative path without '..'".to_string(),
                });
            }
        }

        if self.is_pwa && self.pwa.app_name.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "pwa.app_name".to_string(),
                hint: "PWA mode needs an application name for the manifest".to_string(),
            });
        }

        Ok(())
    }
}
