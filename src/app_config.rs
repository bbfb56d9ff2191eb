//! Application configuration loading for CLI defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use harvester_core::{HarvestConfig, RetryPolicy, Source};
use serde::Deserialize;

use crate::cli::ProviderArg;

/// TOML-backed file configuration for harvester defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Contact address sent to the providers' polite pools.
    pub mailto: Option<String>,
    /// Default provider for `harvester search`.
    pub provider: Option<ProviderArg>,
    /// Default result cap (same range as CLI).
    pub max_results: Option<u16>,
    pub connect_timeout_secs: Option<u64>,
    pub read_timeout_secs: Option<u64>,
    /// Attempts per page, including the first.
    pub max_attempts: Option<u32>,
    pub retry_backoff_ms: Option<u64>,
    pub crossref_page_delay_ms: Option<u64>,
    pub openalex_page_delay_ms: Option<u64>,
    /// Default verbosity mode.
    pub verbosity: Option<VerbositySetting>,
}

impl FileConfig {
    /// Validates config values against runtime and CLI constraints.
    pub fn validate(&self) -> Result<()> {
        if let Some(mailto) = &self.mailto
            && (mailto.trim().is_empty() || mailto.chars().any(char::is_control))
        {
            bail!("Invalid config value for `mailto`: {mailto:?}. Expected a plain email address");
        }
        if let Some(max_results) = self.max_results
            && !(1..=5000).contains(&max_results)
        {
            bail!("Invalid config value for `max_results`: {max_results}. Expected range: 1..=5000");
        }
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("read_timeout_secs", self.read_timeout_secs)?;
        if let Some(max_attempts) = self.max_attempts
            && !(1..=10).contains(&max_attempts)
        {
            bail!("Invalid config value for `max_attempts`: {max_attempts}. Expected range: 1..=10");
        }
        validate_delay_ms("retry_backoff_ms", self.retry_backoff_ms)?;
        validate_delay_ms("crossref_page_delay_ms", self.crossref_page_delay_ms)?;
        validate_delay_ms("openalex_page_delay_ms", self.openalex_page_delay_ms)?;
        Ok(())
    }

    /// Builds the library harvest settings for `source`.
    pub fn harvest_config(&self, source: Source) -> HarvestConfig {
        let defaults = HarvestConfig::default();
        let retry_defaults = RetryPolicy::default();
        let retry = RetryPolicy::new(
            self.max_attempts.unwrap_or(retry_defaults.max_attempts()),
            self.retry_backoff_ms
                .map_or(retry_defaults.backoff(), Duration::from_millis),
        );
        let page_delay_ms = match source {
            Source::CrossRef => self.crossref_page_delay_ms,
            Source::OpenAlex => self.openalex_page_delay_ms,
        };

        HarvestConfig {
            mailto: self.mailto.clone(),
            connect_timeout: self
                .connect_timeout_secs
                .map_or(defaults.connect_timeout, Duration::from_secs),
            read_timeout: self
                .read_timeout_secs
                .map_or(defaults.read_timeout, Duration::from_secs),
            retry,
            page_delay: page_delay_ms.map(Duration::from_millis),
            base_url: None,
        }
    }
}

fn validate_timeout_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=3600).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 1..=3600");
    }
    Ok(())
}

fn validate_delay_ms(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if value > 60_000 {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 0..=60000");
    }
    Ok(())
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerbositySetting {
    Default,
    Verbose,
    Quiet,
    Debug,
}

impl VerbositySetting {
    /// Returns the stable string label for display output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Verbose => "verbose",
            Self::Quiet => "quiet",
            Self::Debug => "debug",
        }
    }

    /// Log level used when neither `RUST_LOG` nor a CLI flag decides.
    #[must_use]
    pub fn log_level(self) -> &'static str {
        match self {
            Self::Default => "info",
            Self::Verbose | Self::Debug => "debug",
            Self::Quiet => "error",
        }
    }
}

/// Loaded config metadata.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed file config when a config file exists and was valid.
    pub config: Option<FileConfig>,
    /// Indicates whether configuration was loaded from disk.
    pub loaded_from_file: bool,
}

impl LoadedConfig {
    /// File config, or all-defaults when no file was loaded.
    #[must_use]
    pub fn effective(&self) -> FileConfig {
        self.config.clone().unwrap_or_default()
    }
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/harvester/config.toml`
/// 2. `$HOME/.config/harvester/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("harvester")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("harvester")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from default path if present.
pub fn load_default_file_config() -> Result<LoadedConfig> {
    let path = resolve_default_config_path();
    let Some(path_ref) = path.as_deref() else {
        return Ok(LoadedConfig::default());
    };

    if !path_ref.exists() {
        return Ok(LoadedConfig {
            path,
            config: None,
            loaded_from_file: false,
        });
    }

    let config = load_file_config(path_ref)?;
    Ok(LoadedConfig {
        path,
        config: Some(config),
        loaded_from_file: true,
    })
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let config: FileConfig = toml::from_str(raw).context("Invalid config syntax")?;
    config.validate()?;
    Ok(config)
}
