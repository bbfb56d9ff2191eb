//! CLI command handlers.

mod config;
mod metrics;
mod search;

pub use config::run_config_show_command;
pub use metrics::run_metrics_command;
pub use search::run_search_command;
