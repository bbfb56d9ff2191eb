//! Metrics command handler: score literal citation counts.

use anyhow::{Context, Result};
use harvester_core::calculate_metrics;

use crate::cli::MetricsArgs;
use crate::output;

pub fn run_metrics_command(args: &MetricsArgs) -> Result<()> {
    let metrics = calculate_metrics(&args.counts);
    let rendered = if args.json {
        serde_json::to_string_pretty(&metrics).context("Failed to serialize metrics")?
    } else {
        output::render_metrics(&metrics)
    };
    output::write_output(&rendered, None)
}
