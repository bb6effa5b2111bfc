//! Terminal UI helpers: status messages and output formatting.
//!
//! Everything prints to stderr so build-tool output stays pipeable. Color
//! handling degrades gracefully in CI and non-TTY environments.

mod format;
mod messages;

pub use format::{format_duration, print_outcome};
pub use messages::{error, info, success, warning};

/// Check if running in a CI environment.
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
}

/// Check if color output should be enabled.
///
/// Respects NO_COLOR and FORCE_COLOR, falls back to terminal detection.
pub fn should_use_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }
    console::user_attended_stderr()
}

/// Initialize color support based on environment.
///
/// owo-colors respects NO_COLOR and terminal capabilities on its own; this
/// exists for explicit initialization at startup.
pub fn init_colors() {
    let _ = should_use_color();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn ci_detection_reads_ci_var() {
        std::env::set_var("CI", "true");
        assert!(is_ci());
        std::env::remove_var("CI");
    }

    #[test]
    #[serial]
    fn no_color_overrides_force_color() {
        std::env::set_var("NO_COLOR", "1");
        std::env::set_var("FORCE_COLOR", "1");
        assert!(!should_use_color());
        std::env::remove_var("NO_COLOR");
        std::env::remove_var("FORCE_COLOR");
    }

    #[test]
    fn init_colors_does_not_panic() {
        init_colors();
    }
}
