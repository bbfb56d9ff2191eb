//! Paginated, deduplicated, retrying harvesting from metadata providers.
//!
//! This module provides:
//! - [`Harvester`] - runs one search against one provider
//! - [`ProviderAdapter`] - per-provider query, filter and page translation
//! - [`CrossrefAdapter`] / [`OpenAlexAdapter`] - the two provider implementations
//! - [`HarvestOutcome`] - collected records plus an optional failure
//! - [`SearchRequest`] and friends - the provider-agnostic search intent
//!
//! # Pagination
//!
//! [`Harvester::search`] drives every provider through the same loop: request
//! a page, normalize and deduplicate its items, then stop when enough unique
//! records were collected, the page was empty, or the provider's reported
//! total is covered. Requests are strictly sequential. A transient failure
//! is retried per [`RetryPolicy`]; a failure that survives retries ends the
//! harvest but keeps every record collected so far.
//!
//! # Example
//!
//! ```no_run
//! use harvester_core::{HarvestConfig, Harvester, SearchField, SearchRequest, Source};
//!
//! # async fn example() -> Result<(), harvester_core::HarvestError> {
//! let harvester = Harvester::new(Source::OpenAlex, HarvestConfig::default())?;
//! let request = SearchRequest::simple(SearchField::Title, "graphene").with_max_results(50);
//! let outcome = harvester.search(&request).await;
//! println!("{} records", outcome.records.len());
//! # Ok(())
//! # }
//! ```

mod crossref;
mod dedup;
mod error;
mod http_client;
mod openalex;
mod request;
mod retry;

pub use crossref::CrossrefAdapter;
pub use dedup::{DedupKey, DedupSet};
pub use error::HarvestError;
pub use openalex::OpenAlexAdapter;
pub use request::{
    AdvancedQuery, BooleanOperator, DEFAULT_MAX_RESULTS, DocumentType, MAX_RESULTS_LIMIT,
    SearchField, SearchFilters, SearchMode, SearchRequest, SortPreference,
};
pub use retry::{
    DEFAULT_BACKOFF, DEFAULT_MAX_ATTEMPTS, FailureType, RetryDecision, RetryPolicy, classify_error,
};

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::normalize::normalize_item;
use crate::record::{PublicationRecord, Source};

const CONNECT_TIMEOUT_SECS: u64 = 10;
const READ_TIMEOUT_SECS: u64 = 30;

/// Runtime settings shared by every provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestConfig {
    /// Contact address for the providers' polite pools.
    pub mailto: Option<String>,
    pub connect_timeout: Duration,
    /// Whole-request timeout per attempt.
    pub read_timeout: Duration,
    pub retry: RetryPolicy,
    /// Overrides the adapter's inter-page delay.
    pub page_delay: Option<Duration>,
    /// Overrides the provider API root (e.g. a mock server).
    pub base_url: Option<String>,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            mailto: None,
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(READ_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
            page_delay: None,
            base_url: None,
        }
    }
}

/// One decoded page of provider results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPage {
    /// Raw provider items, not yet normalized.
    pub items: Vec<Value>,
    /// Total matches the provider reports for the query.
    pub total_results: u64,
}

/// Translation between a [`SearchRequest`] and one provider's HTTP API.
///
/// Implementations are pure: they build parameters and decode bodies, while
/// [`Harvester`] owns the network, retry and deduplication.
pub trait ProviderAdapter: Send + Sync {
    /// Provider the adapter talks to.
    fn source(&self) -> Source;

    /// Default API root, without the `/works` path.
    fn default_base_url(&self) -> &'static str;

    /// Items requested per page.
    fn page_size(&self) -> usize;

    /// Courtesy delay between successful pages.
    fn page_delay(&self) -> Duration;

    /// Native filter clauses for `filters`.
    fn build_filters(&self, filters: &SearchFilters) -> Vec<String>;

    /// Query parameters for `request`, excluding pagination.
    fn build_query(&self, request: &SearchRequest, mailto: Option<&str>) -> Vec<(String, String)>;

    /// Pagination parameters for the zero-based `page_index`.
    fn page_params(&self, page_index: usize) -> Vec<(String, String)>;

    /// Decodes a response body.
    ///
    /// # Errors
    ///
    /// Returns the JSON error when the body is not a recognizable page.
    fn parse_page(&self, body: &[u8]) -> Result<RawPage, serde_json::Error>;
}

/// Selects the adapter for `source`.
#[must_use]
pub fn adapter_for(source: Source) -> Box<dyn ProviderAdapter> {
    match source {
        Source::CrossRef => Box::new(CrossrefAdapter),
        Source::OpenAlex => Box::new(OpenAlexAdapter),
    }
}

/// Records collected by one search, plus the failure that ended it early.
#[derive(Debug)]
pub struct HarvestOutcome {
    /// Unique records in arrival order, at most `max_results`.
    pub records: Vec<PublicationRecord>,
    /// Set when the harvest stopped because of an error.
    pub failure: Option<HarvestError>,
    /// Pages successfully fetched.
    pub pages_fetched: usize,
    /// Provider-reported total from the last decoded page.
    pub total_available: Option<u64>,
}

impl HarvestOutcome {
    fn failed(error: HarvestError) -> Self {
        Self {
            records: Vec::new(),
            failure: Some(error),
            pages_fetched: 0,
            total_available: None,
        }
    }

    /// True when the harvest ended without a failure.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }

    /// Returns the records, or the failure if there was one.
    ///
    /// # Errors
    ///
    /// Returns the harvest failure, discarding partial records.
    pub fn into_result(self) -> Result<Vec<PublicationRecord>, HarvestError> {
        match self.failure {
            Some(error) => Err(error),
            None => Ok(self.records),
        }
    }
}

/// Runs searches against one provider.
///
/// `search` takes `&self`, so a harvester can be reused across searches; all
/// per-search state is local to each call.
pub struct Harvester {
    adapter: Box<dyn ProviderAdapter>,
    client: Client,
    config: HarvestConfig,
}

impl Harvester {
    /// Creates a harvester for `source`.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError`] if `mailto` contains control characters or the
    /// HTTP client cannot be built.
    #[tracing::instrument(skip_all, fields(source = %source))]
    pub fn new(source: Source, config: HarvestConfig) -> Result<Self, HarvestError> {
        Self::with_adapter(adapter_for(source), config)
    }

    /// Creates a harvester around a custom adapter.
    ///
    /// # Errors
    ///
    /// Same as [`Harvester::new`].
    pub fn with_adapter(
        adapter: Box<dyn ProviderAdapter>,
        config: HarvestConfig,
    ) -> Result<Self, HarvestError> {
        if let Some(mailto) = &config.mailto
            && mailto.chars().any(char::is_control)
        {
            return Err(HarvestError::invalid_request(
                "mailto contains invalid control characters",
                "Use a plain email address",
            ));
        }
        let client = http_client::build_harvest_http_client(&config)?;
        Ok(Self {
            adapter,
            client,
            config,
        })
    }

    /// Provider this harvester queries.
    #[must_use]
    pub fn source(&self) -> Source {
        self.adapter.source()
    }

    fn endpoint(&self) -> String {
        let base = self
            .config
            .base_url
            .as_deref()
            .unwrap_or_else(|| self.adapter.default_base_url());
        format!("{}/works", base.trim_end_matches('/'))
    }

    /// Runs `request` to completion.
    ///
    /// Never panics and never discards collected records: an invalid request
    /// or a failed page is reported through [`HarvestOutcome::failure`].
    #[instrument(skip_all, fields(source = %self.source(), max_results = request.max_results))]
    pub async fn search(&self, request: &SearchRequest) -> HarvestOutcome {
        if let Err(error) = request.validate() {
            return HarvestOutcome::failed(error);
        }
        let endpoint = match Url::parse(&self.endpoint()) {
            Ok(url) => url,
            Err(error) => {
                return HarvestOutcome::failed(HarvestError::invalid_request(
                    &format!("provider URL is invalid: {error}"),
                    "Check the configured base URL",
                ));
            }
        };

        let source = self.source();
        let page_size = self.adapter.page_size();
        let page_delay = self.config.page_delay.unwrap_or_else(|| self.adapter.page_delay());
        let base_params = self
            .adapter
            .build_query(request, self.config.mailto.as_deref());

        let mut dedup = DedupSet::new();
        let mut records: Vec<PublicationRecord> = Vec::new();
        let mut outcome_failure = None;
        let mut pages_fetched = 0;
        let mut total_available = None;
        let mut page_index = 0;

        loop {
            let mut url = endpoint.clone();
            url.query_pairs_mut()
                .extend_pairs(base_params.iter().chain(&self.adapter.page_params(page_index)));

            let body = match self.fetch_page(&url).await {
                Ok(body) => body,
                Err(error) => {
                    warn!(page = page_index, error = %error, "Page fetch failed; keeping partial results");
                    outcome_failure = Some(error);
                    break;
                }
            };
            pages_fetched += 1;

            let page = match self.adapter.parse_page(&body) {
                Ok(page) => page,
                Err(error) => {
                    warn!(page = page_index, error = %error, "Malformed provider response; treating as end of results");
                    break;
                }
            };
            total_available = Some(page.total_results);

            if page.items.is_empty() {
                info!(%source, page = page_index, "Provider returned no items; stopping");
                break;
            }

            let received = page.items.len();
            for item in &page.items {
                let record = normalize_item(source, item);
                if dedup.insert(&record) {
                    records.push(record);
                } else {
                    debug!(doi = %record.doi, title = %record.title, "Dropped duplicate record");
                }
            }

            info!(
                %source,
                page = page_index,
                received,
                total = page.total_results,
                unique = records.len(),
                "Fetched page"
            );

            let covered = (page_index as u64 + 1).saturating_mul(page_size as u64);
            if records.len() >= request.max_results || covered >= page.total_results {
                break;
            }

            page_index += 1;
            tokio::time::sleep(page_delay).await;
        }

        records.truncate(request.max_results);
        HarvestOutcome {
            records,
            failure: outcome_failure,
            pages_fetched,
            total_available,
        }
    }

    /// Fetches one page body, retrying transient failures.
    #[instrument(skip(self), fields(url = %url))]
    async fn fetch_page(&self, url: &Url) -> Result<Vec<u8>, HarvestError> {
        let mut attempt = 1;
        loop {
            let error = match self.client.get(url.clone()).send().await {
                Ok(response) => {
                    let status = response.status();
                    if !status.is_success() {
                        return Err(HarvestError::http_status(url.as_str(), status.as_u16()));
                    }
                    match response.bytes().await {
                        Ok(bytes) => return Ok(bytes.to_vec()),
                        Err(error) => error,
                    }
                }
                Err(error) => error,
            };

            let failure_type = classify_error(&error);
            match self.config.retry.should_retry(failure_type, attempt) {
                RetryDecision::Retry {
                    delay,
                    attempt: next,
                } => {
                    warn!(
                        attempt,
                        max_attempts = self.config.retry.max_attempts(),
                        delay_ms = delay.as_millis(),
                        error = %error,
                        "Transient request failure; retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt = next;
                }
                RetryDecision::DoNotRetry { reason } => {
                    debug!(attempt, reason = %reason, "Giving up on request");
                    return Err(match failure_type {
                        FailureType::Transient => {
                            HarvestError::retries_exhausted(url.as_str(), attempt, error)
                        }
                        FailureType::Permanent => HarvestError::request(url.as_str(), error),
                    });
                }
            }
        }
    }
}

impl std::fmt::Debug for Harvester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Harvester")
            .field("source", &self.source())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
