//! Command-line interface definition for the Satchel pipeline runner.
//!
//! Defined with clap v4's derive macros for type-safe parsing.
//!
//! # Command Structure
//!
//! - `satchel build` - run one build pass (development or production)
//! - `satchel watch` - rebuild continuously on asset changes

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Satchel - asset build pipeline runner
#[derive(Parser, Debug)]
#[command(
    name = "satchel",
    version,
    about = "Orchestrates asset compilation: cleanup, stage composition, builds and watch sessions",
    long_about = "Satchel wraps an external asset compiler in a deterministic pipeline:\n\
                  it cleans the output tree, composes the stage plugins for the active\n\
                  mode, runs the compiler, and reports classified results. The mode is\n\
                  driven by the NODE_ENV, WATCH and CRITICAL environment variables plus\n\
                  the chosen subcommand."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    ///
    /// Shows per-step pipeline detail: resolved configuration, cleanup
    /// results, composed stages and itemized diagnostics.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available Satchel subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one build pass
    ///
    /// Selects the development variant unless NODE_ENV=prod or --production
    /// is given. Cleans the output tree first, then compiles once.
    Build(BuildArgs),

    /// Rebuild continuously as assets change
    ///
    /// Requires the WATCH environment variable. Each debounced batch of
    /// changes triggers exactly one rebuild; Ctrl-C stops the session after
    /// the in-flight pass finishes.
    Watch(WatchArgs),
}

/// Options shared by both subcommands.
#[derive(Args, Debug)]
pub struct SharedArgs {
    /// Compiler executable invoked per pass
    ///
    /// The compiler reads a JSON compile spec on stdin and writes its stats
    /// as JSON on stdout. Diagnostics belong in the stats; a non-zero exit
    /// is treated as a compiler failure.
    #[arg(long, default_value = "satchel-compiler", value_name = "CMD")]
    pub compiler: String,

    /// Extra argument passed to the compiler (repeatable)
    #[arg(long = "compiler-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub compiler_args: Vec<String>,

    /// Root of the generated output tree
    ///
    /// Pre-build cleanup is scoped to this directory and never escapes it.
    #[arg(long, value_name = "DIR")]
    pub public_root: Option<PathBuf>,

    /// Compose the progressive-web-app stages
    #[arg(long)]
    pub pwa: bool,

    /// Skip terminal notifications on build results
    #[arg(long)]
    pub no_notify: bool,

    /// Drop warning itemization and warning notifications
    #[arg(long)]
    pub ignore_warnings: bool,
}

/// Arguments for the build command
#[derive(Args, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    pub shared: SharedArgs,

    /// Force the production variant regardless of NODE_ENV
    ///
    /// Composes the production-only stages: environment define, hashed
    /// module ids, minification and compression.
    #[arg(short, long)]
    pub production: bool,
}

/// Arguments for the watch command
#[derive(Args, Debug)]
pub struct WatchArgs {
    #[command(flatten)]
    pub shared: SharedArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn build_accepts_production_and_pwa() {
        let cli = Cli::parse_from(["satchel", "build", "--production", "--pwa"]);
        match cli.command {
            Command::Build(args) => {
                assert!(args.production);
                assert!(args.shared.pwa);
            }
            _ => panic!("expected build command"),
        }
    }

    #[test]
    fn compiler_args_accumulate() {
        let cli = Cli::parse_from([
            "satchel",
            "watch",
            "--compiler",
            "node",
            "--compiler-arg",
            "compiler.js",
            "--compiler-arg",
            "--strict",
        ]);
        match cli.command {
            Command::Watch(args) => {
                assert_eq!(args.shared.compiler, "node");
                assert_eq!(args.shared.compiler_args, vec!["compiler.js", "--strict"]);
            }
            _ => panic!("expected watch command"),
        }
    }

    #[test]
    fn verbose_conflicts_with_quiet() {
        let result = Cli::try_parse_from(["satchel", "-v", "-q", "build"]);
        assert!(result.is_err());
    }
}
