//! The `satchel build` command: one pipeline pass.

use satchel_config::{EnvSnapshot, ModeRequest};

use super::utils::{orchestrator_from, overrides_from};
use crate::cli::BuildArgs;
use crate::error::Result;
use crate::ui;

pub async fn build_execute(args: BuildArgs, verbose: bool) -> Result<()> {
    let snapshot = EnvSnapshot::capture();
    let request = if args.production {
        ModeRequest::Production
    } else {
        // NODE_ENV=prod still selects the production variant.
        ModeRequest::OneShot
    };
    let overrides = overrides_from(&args.shared, verbose);

    let mut orchestrator = orchestrator_from(&args.shared);
    let report = orchestrator.run_once(&snapshot, request, &overrides).await?;

    ui::print_outcome(&report);
    Ok(())
}
