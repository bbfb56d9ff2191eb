//! Config command handlers: show effective configuration.

use anyhow::Result;
use harvester_core::harvest::DEFAULT_MAX_RESULTS;

use crate::app_config::{LoadedConfig, VerbositySetting};
use crate::cli::ProviderArg;

pub fn run_config_show_command(loaded_config: &LoadedConfig) -> Result<()> {
    for line in config_show_lines(loaded_config) {
        println!("{line}");
    }
    Ok(())
}

fn config_show_lines(loaded_config: &LoadedConfig) -> Vec<String> {
    let file_config = loaded_config.effective();
    let provider = file_config.provider.unwrap_or(ProviderArg::Crossref);
    let crossref = file_config.harvest_config(ProviderArg::Crossref.source());
    let openalex = file_config.harvest_config(ProviderArg::Openalex.source());

    let resolved_path = loaded_config.path.as_ref().map_or_else(
        || "<unresolved>".to_string(),
        |path| path.display().to_string(),
    );
    let delay_label = |delay: Option<std::time::Duration>| {
        delay.map_or_else(
            || "provider default".to_string(),
            |delay| delay.as_millis().to_string(),
        )
    };

    vec![
        format!("config_path = {resolved_path}"),
        format!(
            "config_file = {}",
            if loaded_config.loaded_from_file {
                "loaded"
            } else {
                "not found (using defaults)"
            }
        ),
        format!(
            "mailto = {}",
            crossref.mailto.as_deref().unwrap_or("<unset>")
        ),
        format!("provider = {}", provider.as_str()),
        format!(
            "max_results = {}",
            file_config
                .max_results
                .map_or(DEFAULT_MAX_RESULTS, usize::from)
        ),
        format!("connect_timeout_secs = {}", crossref.connect_timeout.as_secs()),
        format!("read_timeout_secs = {}", crossref.read_timeout.as_secs()),
        format!("max_attempts = {}", crossref.retry.max_attempts()),
        format!("retry_backoff_ms = {}", crossref.retry.backoff().as_millis()),
        format!("crossref_page_delay_ms = {}", delay_label(crossref.page_delay)),
        format!("openalex_page_delay_ms = {}", delay_label(openalex.page_delay)),
        format!(
            "verbosity = {}",
            file_config
                .verbosity
                .unwrap_or(VerbositySetting::Default)
                .as_str()
        ),
    ]
}
