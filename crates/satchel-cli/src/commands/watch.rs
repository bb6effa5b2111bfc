//! The `satchel watch` command: continuous rebuilds on asset changes.

use satchel_config::EnvSnapshot;

use super::utils::{orchestrator_from, overrides_from};
use crate::cli::WatchArgs;
use crate::error::Result;
use crate::ui;

pub async fn watch_execute(args: WatchArgs, verbose: bool) -> Result<()> {
    let snapshot = EnvSnapshot::capture();
    let overrides = overrides_from(&args.shared, verbose);

    let mut orchestrator = orchestrator_from(&args.shared);

    // Ctrl-C ends the session; an in-flight pass finishes and reports first.
    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("shutdown requested");
    };

    let rebuilds = orchestrator
        .run_watch(&snapshot, &overrides, shutdown)
        .await?;

    ui::success(&format!("watch session ended after {rebuilds} rebuild(s)"));
    Ok(())
}
