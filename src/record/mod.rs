//! Canonical publication record shared by every pipeline stage.
//!
//! Provider normalizers produce [`PublicationRecord`] values; the Dublin Core
//! mapper and the metrics engine consume them. Records are plain data: once a
//! harvest returns them the caller owns them outright.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Title substituted when a provider item carries none.
pub const MISSING_TITLE: &str = "No title";

/// Language assumed when a provider item does not declare one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Metadata provider a record was harvested from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    /// `api.crossref.org`
    CrossRef,
    /// `api.openalex.org`
    OpenAlex,
}

impl Source {
    /// Returns the display label used in records and exports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CrossRef => "CrossRef",
            Self::OpenAlex => "OpenAlex",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured date as published by CrossRef (`[year, month?, day?]`).
///
/// Parts after the first missing component are dropped, so `[2024, null, 3]`
/// is stored as `[2024]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateParts(Vec<i32>);

impl DateParts {
    /// Builds date parts from the first row of a CrossRef `date-parts` array.
    ///
    /// Returns `None` when the row is empty or the year is missing.
    #[must_use]
    pub fn from_row(row: &[Option<i32>]) -> Option<Self> {
        let parts: Vec<i32> = row.iter().map_while(|part| *part).take(3).collect();
        if parts.is_empty() {
            None
        } else {
            Some(Self(parts))
        }
    }

    /// Year component.
    #[must_use]
    pub fn year(&self) -> Option<i32> {
        self.0.first().copied()
    }

    /// Raw components in `[year, month, day]` order.
    #[must_use]
    pub fn parts(&self) -> &[i32] {
        &self.0
    }
}

/// One license entry attached to a CrossRef work.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LicenseEntry {
    /// License URL (e.g. a `creativecommons.org` deed).
    pub url: String,
    /// Version of the content the license applies to (`vor`, `am`, `tdm`).
    pub content_version: Option<String>,
    /// Embargo delay in days relative to publication.
    pub delay_in_days: Option<i64>,
}

/// Provider-independent publication record.
///
/// String fields are empty and collections are empty when the provider did
/// not supply a value; normalization never leaves a field undefined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicationRecord {
    pub title: String,
    pub authors: Vec<String>,
    pub year: Option<i32>,
    pub journal: String,
    /// Bare DOI (`10.xxxx/yyyy`), empty when absent. Primary dedup key.
    pub doi: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub citations: u64,
    pub url: String,
    pub publisher: String,
    /// Provider-native document type tag (`journal-article`, `article`, ...).
    #[serde(rename = "type")]
    pub doc_type: String,
    pub source: Source,

    pub issn: Vec<String>,
    pub isbn: Vec<String>,
    pub volume: String,
    pub issue: String,
    pub pages: String,
    pub language: String,
    pub subjects: Vec<String>,
    pub keywords: Vec<String>,
    pub institutions: Vec<String>,
    pub affiliations: Vec<String>,
    pub countries: Vec<String>,
    pub is_open_access: bool,
    pub open_access_url: String,
    pub license: Vec<LicenseEntry>,
    pub editors: Vec<String>,
    pub funders: Vec<String>,
    /// Provider relevance score for the query that produced this record.
    pub score: f64,

    pub openalex_id: Option<String>,
    pub references_count: u64,
    pub referenced_works_count: u64,
    pub is_referenced_by_count: u64,
    pub related_works: Vec<String>,
    /// ISO date string as published by OpenAlex (`2021-03-14`).
    pub publication_date: String,
    pub published_print: Option<DateParts>,
    pub published_online: Option<DateParts>,
    pub alternative_urls: Vec<String>,
    pub mesh_terms: Vec<String>,
    pub sustainable_development_goals: Vec<String>,
}

impl PublicationRecord {
    /// Creates an empty record for `source` with every field at its default.
    #[must_use]
    pub fn new(source: Source) -> Self {
        Self {
            title: String::new(),
            authors: Vec::new(),
            year: None,
            journal: String::new(),
            doi: String::new(),
            abstract_text: String::new(),
            citations: 0,
            url: String::new(),
            publisher: String::new(),
            doc_type: String::new(),
            source,
            issn: Vec::new(),
            isbn: Vec::new(),
            volume: String::new(),
            issue: String::new(),
            pages: String::new(),
            language: DEFAULT_LANGUAGE.to_string(),
            subjects: Vec::new(),
            keywords: Vec::new(),
            institutions: Vec::new(),
            affiliations: Vec::new(),
            countries: Vec::new(),
            is_open_access: false,
            open_access_url: String::new(),
            license: Vec::new(),
            editors: Vec::new(),
            funders: Vec::new(),
            score: 0.0,
            openalex_id: None,
            references_count: 0,
            referenced_works_count: 0,
            is_referenced_by_count: 0,
            related_works: Vec::new(),
            publication_date: String::new(),
            published_print: None,
            published_online: None,
            alternative_urls: Vec::new(),
            mesh_terms: Vec::new(),
            sustainable_development_goals: Vec::new(),
        }
    }

    /// Returns true when the record carries a non-blank DOI.
    #[must_use]
    pub fn has_doi(&self) -> bool {
        !self.doi.trim().is_empty()
    }
}

/// Removes duplicates from `values` keeping the first occurrence of each.
pub(crate) fn dedup_preserving_order(values: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_date_parts_stops_at_first_missing_component() {
        let parts = DateParts::from_row(&[Some(2024), None, Some(3)]).unwrap();
        assert_eq!(parts.parts(), &[2024]);
        assert_eq!(parts.year(), Some(2024));
    }

    #[test]
    fn test_date_parts_empty_row_is_none() {
        assert!(DateParts::from_row(&[]).is_none());
        assert!(DateParts::from_row(&[None]).is_none());
    }

    #[test]
    fn test_new_record_defaults() {
        let record = PublicationRecord::new(Source::OpenAlex);
        assert_eq!(record.language, "en");
        assert_eq!(record.citations, 0);
        assert!(!record.has_doi());
        assert_eq!(record.source.to_string(), "OpenAlex");
    }

    #[test]
    fn test_record_serializes_with_provider_field_names() {
        let mut record = PublicationRecord::new(Source::CrossRef);
        record.abstract_text = "Summary".to_string();
        record.doc_type = "journal-article".to_string();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["abstract"], "Summary");
        assert_eq!(json["type"], "journal-article");
        assert_eq!(json["source"], "CrossRef");
    }

    #[test]
    fn test_dedup_preserving_order() {
        let values = ["b", "a", "b", "c", "a"].map(String::from);
        assert_eq!(dedup_preserving_order(values), vec!["b", "a", "c"]);
    }
}
