//! CrossRef `works` search adapter.
//!
//! CrossRef pages by `offset` in steps of `rows`, reports its total under
//! `message.total-results`, and ORs repeated filter clauses that share a key.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::request::term_of;
use super::{
    BooleanOperator, ProviderAdapter, RawPage, SearchField, SearchFilters, SearchMode,
    SearchRequest, SortPreference,
};
use crate::record::Source;

/// Default CrossRef API base URL.
const DEFAULT_BASE_URL: &str = "https://api.crossref.org";

/// Largest `rows` value CrossRef accepts.
const ROWS_PER_PAGE: usize = 100;

const PAGE_DELAY: Duration = Duration::from_millis(100);

// ==================== CrossRef API Response Types ====================

/// Top-level CrossRef list response.
#[derive(Debug, Deserialize)]
struct CrossrefListResponse {
    message: CrossrefListMessage,
}

/// The `message` field of a works list response.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
struct CrossrefListMessage {
    items: Vec<Value>,
    total_results: u64,
}

// ==================== CrossrefAdapter ====================

/// Translates searches into CrossRef `works` queries.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrossrefAdapter;

impl CrossrefAdapter {
    fn query_params(mode: &SearchMode) -> Vec<(String, String)> {
        let mut params = Vec::new();
        match mode {
            SearchMode::Simple { field, query } => {
                let key = match field {
                    SearchField::Author => "query.author",
                    SearchField::Title => "query.title",
                    SearchField::Keyword => "query",
                    SearchField::Affiliation => "query.affiliation",
                    SearchField::AllFields => "query.bibliographic",
                };
                params.push((key.to_string(), query.trim().to_string()));
            }
            SearchMode::Advanced(query) => {
                if query.operator == BooleanOperator::Or {
                    debug!("CrossRef field queries are conjunctive; ignoring OR operator");
                }
                let fields = [
                    ("query.bibliographic", &query.main),
                    ("query.author", &query.author),
                    ("query.title", &query.title),
                    ("query.affiliation", &query.affiliation),
                    ("query.container-title", &query.journal),
                    ("query", &query.abstract_text),
                ];
                for (key, term) in fields {
                    if let Some(term) = term_of(term) {
                        params.push((key.to_string(), term.to_string()));
                    }
                }
            }
        }
        params
    }

    fn sort_params(sort: SortPreference) -> [(&'static str, &'static str); 2] {
        let (field, order) = match sort {
            SortPreference::Relevance => ("relevance", "desc"),
            SortPreference::DateNewest => ("published", "desc"),
            SortPreference::DateOldest => ("published", "asc"),
            SortPreference::CitationsDesc => ("is-referenced-by-count", "desc"),
        };
        [("sort", field), ("order", order)]
    }
}

impl ProviderAdapter for CrossrefAdapter {
    fn source(&self) -> Source {
        Source::CrossRef
    }

    fn default_base_url(&self) -> &'static str {
        DEFAULT_BASE_URL
    }

    fn page_size(&self) -> usize {
        ROWS_PER_PAGE
    }

    fn page_delay(&self) -> Duration {
        PAGE_DELAY
    }

    fn build_filters(&self, filters: &SearchFilters) -> Vec<String> {
        let mut clauses = Vec::new();
        if let Some(from) = filters.from_year {
            clauses.push(format!("from-pub-date:{from}"));
        }
        if let Some(to) = filters.to_year {
            clauses.push(format!("until-pub-date:{to}"));
        }
        clauses.extend(
            filters
                .doc_types
                .iter()
                .map(|doc_type| format!("type:{}", doc_type.crossref_type())),
        );
        if filters.has_doi {
            clauses.push("has-doi:true".to_string());
        }
        if filters.has_abstract {
            clauses.push("has-abstract:true".to_string());
        }
        if filters.open_access_only {
            clauses.push("has-license:true".to_string());
        }
        clauses
    }

    fn build_query(&self, request: &SearchRequest, mailto: Option<&str>) -> Vec<(String, String)> {
        let mut params = Self::query_params(&request.mode);

        let filters = self.build_filters(&request.filters);
        if !filters.is_empty() {
            params.push(("filter".to_string(), filters.join(",")));
        }
        params.extend(
            Self::sort_params(request.sort)
                .into_iter()
                .map(|(key, value)| (key.to_string(), value.to_string())),
        );
        if let Some(mailto) = mailto.map(str::trim).filter(|m| !m.is_empty()) {
            params.push(("mailto".to_string(), mailto.to_string()));
        }
        params
    }

    fn page_params(&self, page_index: usize) -> Vec<(String, String)> {
        vec![
            ("rows".to_string(), ROWS_PER_PAGE.to_string()),
            ("offset".to_string(), (page_index * ROWS_PER_PAGE).to_string()),
        ]
    }

    fn parse_page(&self, body: &[u8]) -> Result<RawPage, serde_json::Error> {
        let response: CrossrefListResponse = serde_json::from_slice(body)?;
        Ok(RawPage {
            items: response.message.items,
            total_results: response.message.total_results,
        })
    }
}
