//! Output formatting for build summaries.

use owo_colors::OwoColorize;
use satchel_pipeline::{Classification, Report};

/// Format a duration in seconds for display.
///
/// Sub-second durations show milliseconds, longer ones seconds with three
/// decimals.
pub fn format_duration(secs: f64) -> String {
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else {
        format!("{secs:.3}s")
    }
}

/// Print the final one-line summary for a finished pass.
pub fn print_outcome(report: &Report) {
    let timing = report
        .elapsed_secs
        .map(|secs| format!(" in {}", format_duration(secs)))
        .unwrap_or_default();

    match report.classification {
        Classification::Clean => {
            super::success(&format!("build finished{timing}"));
        }
        Classification::Warnings => {
            super::warning(&format!(
                "build finished with {} warning(s){timing}",
                report.warning_count
            ));
        }
        Classification::Errors => {
            super::error(&format!(
                "build finished with {} error(s){}{timing}",
                report.error_count,
                if report.warning_count > 0 {
                    format!(", {} warning(s)", report.warning_count.yellow())
                } else {
                    String::new()
                }
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_pick_sensible_units() {
        assert_eq!(format_duration(0.042), "42ms");
        assert_eq!(format_duration(1.5), "1.500s");
    }

    #[test]
    fn outcome_printing_does_not_panic() {
        print_outcome(&Report {
            classification: Classification::Errors,
            error_count: 2,
            warning_count: 1,
            elapsed_secs: Some(0.3),
        });
        print_outcome(&Report {
            classification: Classification::Clean,
            error_count: 0,
            warning_count: 0,
            elapsed_secs: None,
        });
    }
}
