//! Search command handler: harvest, post-filter, and render records.

use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use harvester_core::harvest::DEFAULT_MAX_RESULTS;
use harvester_core::{HarvestOutcome, Harvester, MetricsResult};
use tracing::{debug, info, warn};

use crate::ProcessExit;
use crate::app_config::LoadedConfig;
use crate::cli::{OutputFormat, ProviderArg, SearchArgs};
use crate::exit_handler::determine_exit_outcome;
use crate::{output, progress};

pub async fn run_search_command(
    args: &SearchArgs,
    loaded_config: &LoadedConfig,
    quiet: bool,
) -> Result<ProcessExit> {
    let file_config = loaded_config.effective();
    let provider = args
        .provider
        .or(file_config.provider)
        .unwrap_or(ProviderArg::Crossref);
    let source = provider.source();
    let max_results = args
        .max_results
        .or(file_config.max_results)
        .map_or(DEFAULT_MAX_RESULTS, usize::from);
    let request = args.to_request(max_results)?;

    let mut harvest_config = file_config.harvest_config(source);
    if let Some(mailto) = &args.mailto {
        harvest_config.mailto = Some(mailto.clone());
    }
    if let Some(base_url) = &args.base_url {
        harvest_config.base_url = Some(base_url.clone());
    }
    debug!(?request, "Search request built");

    let harvester = Harvester::new(source, harvest_config)
        .with_context(|| format!("Failed to set up {source} harvester"))?;

    let use_spinner = !quiet && io::stderr().is_terminal();
    let spinner = progress::start_spinner(use_spinner, source);
    let HarvestOutcome {
        mut records,
        failure,
        pages_fetched,
        total_available,
    } = harvester.search(&request).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let harvested = records.len();
    let exit = determine_exit_outcome(harvested, failure.is_some());
    if let Some(error) = failure {
        if exit == ProcessExit::Failure {
            return Err(anyhow::Error::new(error).context("Harvest failed"));
        }
        warn!(
            collected = harvested,
            error = %error,
            "Harvest stopped early; writing partial results"
        );
    }

    request.filters.retain_matching(&mut records);
    if records.len() < harvested {
        info!(
            removed = harvested - records.len(),
            "Post-search filters removed records"
        );
    }
    info!(
        %source,
        pages = pages_fetched,
        available = total_available.unwrap_or(0),
        records = records.len(),
        "Harvest finished"
    );

    let rendered = output::render_records(&records, args.format, output::terminal_width())?;
    output::write_output(&rendered, args.output.as_deref())?;

    if args.metrics {
        write_metrics(&MetricsResult::from_records(&records), args)?;
    }

    Ok(exit)
}

/// JSON on stdout stays parseable: metrics for a JSON format go to stderr unless records went to a file.
fn write_metrics(metrics: &MetricsResult, args: &SearchArgs) -> Result<()> {
    let rendered = output::render_metrics(metrics);
    if args.format != OutputFormat::Summary && args.output.is_none() {
        eprintln!("{rendered}");
        return Ok(());
    }
    output::write_output(&rendered, None)
}
