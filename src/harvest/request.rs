//! Provider-agnostic search intent.
//!
//! A [`SearchRequest`] describes what to look for; each provider adapter
//! translates it into its own query, filter and sort vocabulary.

use std::fmt;

use crate::record::{PublicationRecord, Source};

use super::HarvestError;

/// Results requested when the caller does not say otherwise.
pub const DEFAULT_MAX_RESULTS: usize = 100;

/// Upper bound on results per search.
pub const MAX_RESULTS_LIMIT: usize = 5000;

/// Publication years accepted by the year-range filters.
pub const YEAR_BOUNDS: std::ops::RangeInclusive<i32> = 0..=9999;

/// Field targeted by a simple search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Author,
    Title,
    Keyword,
    Affiliation,
    AllFields,
}

/// How multiple advanced-search terms combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BooleanOperator {
    #[default]
    And,
    Or,
}

/// Multi-field search terms. Blank terms are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AdvancedQuery {
    /// Free-text term applied across all fields.
    pub main: Option<String>,
    pub author: Option<String>,
    pub title: Option<String>,
    pub abstract_text: Option<String>,
    pub affiliation: Option<String>,
    pub journal: Option<String>,
    pub operator: BooleanOperator,
}

impl AdvancedQuery {
    /// Returns true when every term is absent or blank.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [
            &self.main,
            &self.author,
            &self.title,
            &self.abstract_text,
            &self.affiliation,
            &self.journal,
        ]
        .into_iter()
        .all(|term| term_of(term).is_none())
    }
}

/// Trimmed, non-blank term.
pub(crate) fn term_of(term: &Option<String>) -> Option<&str> {
    term.as_deref().map(str::trim).filter(|term| !term.is_empty())
}

/// Simple single-field search or advanced multi-field search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchMode {
    Simple { field: SearchField, query: String },
    Advanced(AdvancedQuery),
}

/// Provider-agnostic document type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocumentType {
    JournalArticle,
    BookChapter,
    ConferencePaper,
    Preprint,
    Report,
    /// Any other provider-native tag, passed through unchanged.
    Other(String),
}

impl DocumentType {
    /// Parses a canonical label. Unknown labels become [`DocumentType::Other`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "journal-article" => Self::JournalArticle,
            "book-chapter" => Self::BookChapter,
            "conference-paper" => Self::ConferencePaper,
            "preprint" => Self::Preprint,
            "report" => Self::Report,
            _ => Self::Other(label.trim().to_string()),
        }
    }

    /// Canonical label (`journal-article`, `conference-paper`, ...).
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::JournalArticle => "journal-article",
            Self::BookChapter => "book-chapter",
            Self::ConferencePaper => "conference-paper",
            Self::Preprint => "preprint",
            Self::Report => "report",
            Self::Other(label) => label,
        }
    }

    /// CrossRef `type` vocabulary.
    #[must_use]
    pub fn crossref_type(&self) -> &str {
        match self {
            Self::ConferencePaper => "proceedings-article",
            Self::Preprint => "posted-content",
            other => other.label(),
        }
    }

    /// OpenAlex `type` vocabulary.
    #[must_use]
    pub fn openalex_type(&self) -> &str {
        match self {
            Self::JournalArticle => "article",
            Self::ConferencePaper => "proceedings-article",
            other => other.label(),
        }
    }

    /// Native tag for records coming from `source`.
    #[must_use]
    pub fn native_type(&self, source: Source) -> &str {
        match source {
            Source::CrossRef => self.crossref_type(),
            Source::OpenAlex => self.openalex_type(),
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result ordering preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortPreference {
    #[default]
    Relevance,
    DateNewest,
    DateOldest,
    CitationsDesc,
}

impl SortPreference {
    /// Parses a UI label (`Date (Newest)`) or short form (`newest`).
    ///
    /// Unknown labels fall back to [`SortPreference::Relevance`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Date (Newest)" | "newest" => Self::DateNewest,
            "Date (Oldest)" | "oldest" => Self::DateOldest,
            "Citations (High to Low)" | "citations" => Self::CitationsDesc,
            _ => Self::Relevance,
        }
    }
}

/// Filters applied natively by the provider where supported.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchFilters {
    pub from_year: Option<i32>,
    pub to_year: Option<i32>,
    /// Allowed document types; empty means any.
    pub doc_types: Vec<DocumentType>,
    pub open_access_only: bool,
    pub has_doi: bool,
    pub has_abstract: bool,
    /// Minimum citation count; 0 disables the filter.
    pub min_citations: u64,
}

impl SearchFilters {
    /// Returns true when `record` satisfies every active filter.
    ///
    /// Year bounds are not checked here; providers apply them natively.
    #[must_use]
    pub fn matches(&self, record: &PublicationRecord) -> bool {
        if self.open_access_only && !record.is_open_access {
            return false;
        }
        if self.has_abstract && record.abstract_text.trim().is_empty() {
            return false;
        }
        if self.has_doi && !record.has_doi() {
            return false;
        }
        if record.citations < self.min_citations {
            return false;
        }
        self.doc_types.is_empty()
            || self
                .doc_types
                .iter()
                .any(|doc_type| doc_type.native_type(record.source) == record.doc_type)
    }

    /// Drops records that fail [`SearchFilters::matches`], preserving order.
    pub fn retain_matching(&self, records: &mut Vec<PublicationRecord>) {
        records.retain(|record| self.matches(record));
    }
}

/// A complete search intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub mode: SearchMode,
    pub filters: SearchFilters,
    pub sort: SortPreference,
    pub max_results: usize,
}

impl SearchRequest {
    /// Creates a simple search with default filters, sort and cap.
    #[must_use]
    pub fn simple(field: SearchField, query: impl Into<String>) -> Self {
        Self::new(SearchMode::Simple {
            field,
            query: query.into(),
        })
    }

    /// Creates an advanced search with default filters, sort and cap.
    #[must_use]
    pub fn advanced(query: AdvancedQuery) -> Self {
        Self::new(SearchMode::Advanced(query))
    }

    fn new(mode: SearchMode) -> Self {
        Self {
            mode,
            filters: SearchFilters::default(),
            sort: SortPreference::default(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    #[must_use]
    pub fn with_filters(mut self, filters: SearchFilters) -> Self {
        self.filters = filters;
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort: SortPreference) -> Self {
        self.sort = sort;
        self
    }

    #[must_use]
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Rejects requests that cannot produce a meaningful provider query.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::InvalidRequest`] for a blank simple query, an
    /// advanced query with no terms, a year outside `0..=9999`, an inverted
    /// year range, or a result cap outside `1..=5000`.
    pub fn validate(&self) -> Result<(), HarvestError> {
        match &self.mode {
            SearchMode::Simple { query, .. } if query.trim().is_empty() => {
                return Err(HarvestError::invalid_request(
                    "search query is empty",
                    "Provide a search term",
                ));
            }
            SearchMode::Advanced(query) if query.is_empty() => {
                return Err(HarvestError::invalid_request(
                    "advanced search has no terms",
                    "Provide at least one of main, author, title, abstract, affiliation or journal",
                ));
            }
            _ => {}
        }

        for year in [self.filters.from_year, self.filters.to_year].into_iter().flatten() {
            if !YEAR_BOUNDS.contains(&year) {
                return Err(HarvestError::invalid_request(
                    &format!("year {year} is out of range"),
                    &format!(
                        "Use a year between {} and {}",
                        YEAR_BOUNDS.start(),
                        YEAR_BOUNDS.end()
                    ),
                ));
            }
        }

        if let (Some(from), Some(to)) = (self.filters.from_year, self.filters.to_year)
            && from > to
        {
            return Err(HarvestError::invalid_request(
                &format!("year range {from}-{to} is inverted"),
                "Make the start year less than or equal to the end year",
            ));
        }

        if !(1..=MAX_RESULTS_LIMIT).contains(&self.max_results) {
            return Err(HarvestError::invalid_request(
                &format!("max results {} is out of range", self.max_results),
                &format!("Request between 1 and {MAX_RESULTS_LIMIT} results"),
            ));
        }

        Ok(())
    }
}
