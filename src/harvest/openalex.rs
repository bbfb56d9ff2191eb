//! OpenAlex `works` search adapter.
//!
//! OpenAlex pages by 1-based `page` number, reports its total under
//! `meta.count`, and expresses most field searches as `filter` clauses.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use super::request::term_of;
use super::{
    BooleanOperator, ProviderAdapter, RawPage, SearchField, SearchFilters, SearchMode,
    SearchRequest, SortPreference,
};
use crate::record::Source;

/// Default OpenAlex API base URL.
const DEFAULT_BASE_URL: &str = "https://api.openalex.org";

/// Largest `per-page` value OpenAlex accepts.
const RESULTS_PER_PAGE: usize = 200;

const PAGE_DELAY: Duration = Duration::from_millis(50);

const AUTHOR_FILTER: &str = "raw_author_name.search";
const TITLE_FILTER: &str = "title.search";
const AFFILIATION_FILTER: &str = "institutions.display_name.search";
const JOURNAL_FILTER: &str = "host_venue.display_name.search";

// ==================== OpenAlex API Response Types ====================

#[derive(Debug, Deserialize)]
struct OpenAlexListResponse {
    #[serde(default)]
    meta: OpenAlexMeta,
    #[serde(default)]
    results: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OpenAlexMeta {
    count: u64,
}

// ==================== OpenAlexAdapter ====================

/// Translates searches into OpenAlex `works` queries.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenAlexAdapter;

/// Free-text `search` value and field-scoped filter clauses for one request.
#[derive(Debug, Default, PartialEq, Eq)]
struct QueryParts {
    search: Option<String>,
    field_clauses: Vec<String>,
    operator: BooleanOperator,
}

impl OpenAlexAdapter {
    fn query_parts(mode: &SearchMode) -> QueryParts {
        match mode {
            SearchMode::Simple { field, query } => {
                let query = query.trim();
                let filter_key = match field {
                    SearchField::Keyword | SearchField::AllFields => {
                        return QueryParts {
                            search: Some(query.to_string()),
                            ..QueryParts::default()
                        };
                    }
                    SearchField::Author => AUTHOR_FILTER,
                    SearchField::Title => TITLE_FILTER,
                    SearchField::Affiliation => AFFILIATION_FILTER,
                };
                QueryParts {
                    field_clauses: vec![field_clause(filter_key, query)],
                    ..QueryParts::default()
                }
            }
            SearchMode::Advanced(query) => {
                let search = [term_of(&query.main), term_of(&query.abstract_text)]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(" ");
                let field_clauses = [
                    (AUTHOR_FILTER, &query.author),
                    (TITLE_FILTER, &query.title),
                    (AFFILIATION_FILTER, &query.affiliation),
                    (JOURNAL_FILTER, &query.journal),
                ]
                .into_iter()
                .filter_map(|(key, term)| term_of(term).map(|term| field_clause(key, term)))
                .collect();
                QueryParts {
                    search: (!search.is_empty()).then_some(search),
                    field_clauses,
                    operator: query.operator,
                }
            }
        }
    }

    fn sort_token(sort: SortPreference) -> &'static str {
        match sort {
            SortPreference::Relevance => "relevance_score:desc",
            SortPreference::DateNewest => "publication_date:desc",
            SortPreference::DateOldest => "publication_date:asc",
            SortPreference::CitationsDesc => "cited_by_count:desc",
        }
    }
}

/// `key:value` with the filter syntax separators removed from `value`.
fn field_clause(key: &str, value: &str) -> String {
    let value: String = value
        .chars()
        .map(|c| if c == ',' || c == '|' { ' ' } else { c })
        .collect();
    format!("{key}:{}", value.trim())
}

impl ProviderAdapter for OpenAlexAdapter {
    fn source(&self) -> Source {
        Source::OpenAlex
    }

    fn default_base_url(&self) -> &'static str {
        DEFAULT_BASE_URL
    }

    fn page_size(&self) -> usize {
        RESULTS_PER_PAGE
    }

    fn page_delay(&self) -> Duration {
        PAGE_DELAY
    }

    fn build_filters(&self, filters: &SearchFilters) -> Vec<String> {
        let mut clauses = Vec::new();
        match (filters.from_year, filters.to_year) {
            (Some(from), Some(to)) => clauses.push(format!("publication_year:{from}-{to}")),
            (Some(from), None) => {
                clauses.push(format!("publication_year:>{}", from.saturating_sub(1)));
            }
            (None, Some(to)) => {
                clauses.push(format!("publication_year:<{}", to.saturating_add(1)));
            }
            (None, None) => {}
        }
        if !filters.doc_types.is_empty() {
            let types: Vec<&str> = filters
                .doc_types
                .iter()
                .map(|doc_type| doc_type.openalex_type())
                .collect();
            clauses.push(format!("type:{}", types.join("|")));
        }
        if filters.open_access_only {
            clauses.push("is_oa:true".to_string());
        }
        if filters.has_doi {
            clauses.push("has_doi:true".to_string());
        }
        if filters.has_abstract {
            clauses.push("has_abstract:true".to_string());
        }
        if filters.min_citations > 0 {
            clauses.push(format!("cited_by_count:>{}", filters.min_citations - 1));
        }
        clauses
    }

    fn build_query(&self, request: &SearchRequest, mailto: Option<&str>) -> Vec<(String, String)> {
        let parts = Self::query_parts(&request.mode);
        let mut params = Vec::new();
        if let Some(search) = parts.search {
            params.push(("search".to_string(), search));
        }

        let field_separator = match parts.operator {
            BooleanOperator::And => ",",
            BooleanOperator::Or => "|",
        };
        let mut filter_groups = Vec::new();
        if !parts.field_clauses.is_empty() {
            filter_groups.push(parts.field_clauses.join(field_separator));
        }
        filter_groups.extend(self.build_filters(&request.filters));
        if !filter_groups.is_empty() {
            params.push(("filter".to_string(), filter_groups.join(",")));
        }

        params.push(("sort".to_string(), Self::sort_token(request.sort).to_string()));
        if let Some(mailto) = mailto.map(str::trim).filter(|m| !m.is_empty()) {
            params.push(("mailto".to_string(), mailto.to_string()));
        }
        params
    }

    fn page_params(&self, page_index: usize) -> Vec<(String, String)> {
        vec![
            ("per-page".to_string(), RESULTS_PER_PAGE.to_string()),
            ("page".to_string(), (page_index + 1).to_string()),
        ]
    }

    fn parse_page(&self, body: &[u8]) -> Result<RawPage, serde_json::Error> {
        let response: OpenAlexListResponse = serde_json::from_slice(body)?;
        Ok(RawPage {
            items: response.results,
            total_results: response.meta.count,
        })
    }
}
