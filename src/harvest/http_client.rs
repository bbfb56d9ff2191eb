//! Shared HTTP client construction for provider adapters.
//!
//! Every harvester uses one client policy: connect and read timeouts from
//! [`HarvestConfig`], the project User-Agent, and gzip.

use std::panic::{AssertUnwindSafe, catch_unwind};

use reqwest::{Client, ClientBuilder, Proxy};
use tracing::warn;

use crate::user_agent::harvester_user_agent;

use super::{HarvestConfig, HarvestError};

/// Builds the provider HTTP client for `config`.
///
/// # Errors
///
/// Returns [`HarvestError::ClientBuild`] when client construction fails.
pub(crate) fn build_harvest_http_client(config: &HarvestConfig) -> Result<Client, HarvestError> {
    match try_build_client(config, false) {
        Ok(client) => Ok(client),
        Err(BuildClientFailure::Panic) => {
            // Some sandboxed macOS environments panic while reading system
            // proxy settings; retry with env-only proxy discovery.
            warn!("HTTP client hit system proxy panic; using env-proxy fallback builder");
            try_build_client(config, true).map_err(BuildClientFailure::into_error)
        }
        Err(failure) => Err(failure.into_error()),
    }
}

enum BuildClientFailure {
    Panic,
    Build(reqwest::Error),
}

impl BuildClientFailure {
    fn into_error(self) -> HarvestError {
        match self {
            Self::Panic => HarvestError::client_build("client construction panicked"),
            Self::Build(error) => HarvestError::client_build(error.to_string()),
        }
    }
}

fn try_build_client(
    config: &HarvestConfig,
    disable_system_proxy_lookup: bool,
) -> Result<Client, BuildClientFailure> {
    catch_unwind(AssertUnwindSafe(|| {
        let mut builder = base_builder(config);
        if disable_system_proxy_lookup {
            builder = apply_env_proxy_fallback(builder.no_proxy());
        }
        builder.build().map_err(BuildClientFailure::Build)
    }))
    .map_err(|_| BuildClientFailure::Panic)?
}

fn base_builder(config: &HarvestConfig) -> ClientBuilder {
    Client::builder()
        .connect_timeout(config.connect_timeout)
        .timeout(config.read_timeout)
        .user_agent(harvester_user_agent(config.mailto.as_deref()))
        .gzip(true)
}

fn apply_env_proxy_fallback(mut builder: ClientBuilder) -> ClientBuilder {
    let https = first_env_var(&["HTTPS_PROXY", "https_proxy", "ALL_PROXY", "all_proxy"]);
    if let Some(proxy) = https
        && let Ok(resolved) = Proxy::https(&proxy)
    {
        builder = builder.proxy(resolved);
    }
    let http = first_env_var(&["HTTP_PROXY", "http_proxy", "ALL_PROXY", "all_proxy"]);
    if let Some(proxy) = http
        && let Ok(resolved) = Proxy::http(&proxy)
    {
        builder = builder.proxy(resolved);
    }
    builder
}

fn first_env_var(names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| {
        std::env::var(name)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_client_with_default_config() {
        assert!(build_harvest_http_client(&HarvestConfig::default()).is_ok());
    }

    #[test]
    fn test_build_client_with_mailto() {
        let config = HarvestConfig {
            mailto: Some("team@example.org".to_string()),
            ..HarvestConfig::default()
        };
        assert!(build_harvest_http_client(&config).is_ok());
    }

    #[test]
    fn test_first_env_var_skips_unset_names() {
        assert_eq!(first_env_var(&["HARVESTER_TEST_UNSET_PROXY_VAR"]), None);
    }
}
