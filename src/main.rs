//! CLI entry point for the harvester tool.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

mod app_config;
mod cli;
mod commands;
mod exit_handler;
mod output;
mod progress;

use app_config::LoadedConfig;
use cli::{Args, Command, ConfigCommand};

/// Process outcome, mapped to the exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProcessExit {
    /// Harvest completed.
    Success,
    /// Harvest failed after collecting records; results were still written.
    Partial,
    /// Nothing usable was produced.
    Failure,
}

impl ProcessExit {
    pub(crate) fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
            Self::Partial => 2,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Config verbosity feeds the default log level
    let loaded_config = app_config::load_default_file_config();
    init_tracing(&args, loaded_config.as_ref().ok());

    let outcome = match loaded_config {
        Ok(loaded_config) => run(&args, &loaded_config).await,
        Err(error) => Err(error),
    };
    match outcome {
        Ok(exit) => ExitCode::from(exit.code()),
        Err(error) => {
            eprintln!("Error: {error:#}");
            ExitCode::from(ProcessExit::Failure.code())
        }
    }
}

async fn run(args: &Args, loaded_config: &LoadedConfig) -> Result<ProcessExit> {
    debug!(?args, "CLI arguments parsed");
    match &args.command {
        Command::Search(search_args) => {
            commands::run_search_command(search_args, loaded_config, args.quiet).await
        }
        Command::Metrics(metrics_args) => {
            commands::run_metrics_command(metrics_args)?;
            Ok(ProcessExit::Success)
        }
        Command::Config {
            command: ConfigCommand::Show,
        } => {
            commands::run_config_show_command(loaded_config)?;
            Ok(ProcessExit::Success)
        }
    }
}

/// Installs the stderr subscriber.
///
/// Priority: `RUST_LOG` > `--quiet` > `-v`/`-vv` > config `verbosity` > info.
fn init_tracing(args: &Args, loaded_config: Option<&LoadedConfig>) {
    let configured = loaded_config
        .and_then(|loaded| loaded.config.as_ref())
        .and_then(|config| config.verbosity);
    let default_level = resolve_default_log_level(args.quiet, args.verbose, configured);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_default_log_level(
    quiet: bool,
    verbose: u8,
    configured: Option<app_config::VerbositySetting>,
) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => configured.map_or("info", app_config::VerbositySetting::log_level),
        1 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::resolve_default_log_level;
    use crate::app_config::VerbositySetting;

    #[test]
    fn test_log_level_quiet_wins_over_verbose() {
        assert_eq!(resolve_default_log_level(true, 2, None), "error");
    }

    #[test]
    fn test_log_level_verbose_counts() {
        assert_eq!(resolve_default_log_level(false, 1, None), "debug");
        assert_eq!(resolve_default_log_level(false, 3, None), "trace");
    }

    #[test]
    fn test_log_level_flag_wins_over_config() {
        assert_eq!(
            resolve_default_log_level(false, 2, Some(VerbositySetting::Quiet)),
            "trace"
        );
    }

    #[test]
    fn test_log_level_from_config_or_default() {
        assert_eq!(
            resolve_default_log_level(false, 0, Some(VerbositySetting::Quiet)),
            "error"
        );
        assert_eq!(resolve_default_log_level(false, 0, None), "info");
    }
}
