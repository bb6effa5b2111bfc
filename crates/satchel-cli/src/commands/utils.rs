//! Shared wiring between the build and watch commands.

use std::sync::Arc;

use satchel_config::Overrides;
use satchel_pipeline::{Notifier, Orchestrator, ProcessEngine};

use crate::cli::SharedArgs;
use crate::notifier::TerminalNotifier;

/// Translate shared CLI flags into configuration overrides.
///
/// Only flags the user actually set become `Some`; everything else is left
/// to defaults and the `SATCHEL_*` environment.
pub(super) fn overrides_from(args: &SharedArgs, verbose: bool) -> Overrides {
    Overrides {
        is_pwa: args.pwa.then_some(true),
        verbose: verbose.then_some(true),
        notifications: args.no_notify.then_some(false),
        ignore_warnings: args.ignore_warnings.then_some(true),
        public_root: args.public_root.clone(),
    }
}

/// Wire up the orchestrator over the configured compiler executable.
pub(super) fn orchestrator_from(args: &SharedArgs) -> Orchestrator {
    let engine = Arc::new(ProcessEngine::new(
        args.compiler.clone(),
        args.compiler_args.clone(),
    ));
    let notifier: Arc<dyn Notifier> = Arc::new(TerminalNotifier);
    Orchestrator::new(engine, notifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn shared() -> SharedArgs {
        SharedArgs {
            compiler: "satchel-compiler".to_string(),
            compiler_args: vec![],
            public_root: None,
            pwa: false,
            no_notify: false,
            ignore_warnings: false,
        }
    }

    #[test]
    fn unset_flags_stay_out_of_the_overrides() {
        let overrides = overrides_from(&shared(), false);
        assert_eq!(overrides.is_pwa, None);
        assert_eq!(overrides.notifications, None);
        assert_eq!(overrides.public_root, None);
    }

    #[test]
    fn set_flags_become_overrides() {
        let mut args = shared();
        args.pwa = true;
        args.no_notify = true;
        args.public_root = Some(PathBuf::from("dist"));

        let overrides = overrides_from(&args, true);
        assert_eq!(overrides.is_pwa, Some(true));
        assert_eq!(overrides.verbose, Some(true));
        assert_eq!(overrides.notifications, Some(false));
        assert_eq!(overrides.public_root, Some(PathBuf::from("dist")));
    }
}
