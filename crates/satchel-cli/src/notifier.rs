//! Terminal notification sink.
//!
//! No desktop notification daemon is assumed; diagnostics are surfaced as
//! colored status lines on stderr, which survives CI and ssh sessions alike.

use satchel_pipeline::Notifier;

use crate::ui;

/// Notifier that renders notifications as terminal status messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, title: &str, message: &str) {
        if message.contains("error") {
            ui::error(&format!("{title}: {message}"));
        } else {
            ui::warning(&format!("{title}: {message}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notify_does_not_panic() {
        TerminalNotifier.notify("Satchel", "Build has 1 error(s)!");
        TerminalNotifier.notify("Satchel", "Build has 2 warning(s)!");
    }
}
