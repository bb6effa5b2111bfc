//! Satchel CLI - asset build pipeline runner.
//!
//! Entry point: parses arguments, initializes logging and colors, then
//! dispatches to the requested command.

use clap::Parser;
use miette::Result;
use satchel_cli::{cli, commands, error, logger, ui};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors();

    let result = match args.command {
        cli::Command::Build(build_args) => commands::build_execute(build_args, args.verbose).await,
        cli::Command::Watch(watch_args) => commands::watch_execute(watch_args, args.verbose).await,
    };

    // Convert CLI errors to miette diagnostics for readable reporting
    result.map_err(error::cli_error_to_miette)
}
