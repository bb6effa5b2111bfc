//! Logging setup for the Satchel CLI.
//!
//! Structured logging via the `tracing` ecosystem with verbosity flags and
//! `RUST_LOG` overrides.
//!
//! # Verbosity Levels
//!
//! 1. `--verbose`: DEBUG for satchel crates
//! 2. `--quiet`: errors only
//! 3. `RUST_LOG` environment variable: custom filter
//! 4. Default: INFO for satchel crates

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global tracing subscriber. Call once, before any logging.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let filter = if verbose {
        EnvFilter::new("satchel_cli=debug,satchel_pipeline=debug,satchel_config=debug")
    } else if quiet {
        EnvFilter::new("satchel_cli=error,satchel_pipeline=error,satchel_config=error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("satchel_cli=info,satchel_pipeline=info,satchel_config=info")
        })
    };

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

/// Check whether colored output should be enabled.
///
/// Respects the `NO_COLOR` and `FORCE_COLOR` conventions, then falls back to
/// terminal capability detection.
pub fn should_use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }
    console::Term::stdout().features().colors_supported()
}
