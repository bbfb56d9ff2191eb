//! Progress UI (spinner) for harvest runs.

use std::time::Duration;

use harvester_core::Source;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Starts a stderr spinner when requested; `None` otherwise.
pub(crate) fn start_spinner(use_spinner: bool, source: Source) -> Option<ProgressBar> {
    if !use_spinner {
        return None;
    }
    let spinner = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Harvesting from {source}..."));
    spinner.enable_steady_tick(Duration::from_millis(100));
    Some(spinner)
}
