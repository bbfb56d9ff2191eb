//! Dublin Core (DCMES 1.1) mapping for publication records.
//!
//! [`map_to_dublin_core`] turns one [`PublicationRecord`] into a
//! [`DublinCoreRecord`] holding the 15 standard elements plus a set of
//! extended passthrough fields for spreadsheet-style exports. The mapping is
//! a pure function of the record.
//!
//! Multi-valued elements are joined with [`VALUE_SEPARATOR`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::record::{DateParts, PublicationRecord};

/// Separator used for every multi-valued element.
pub const VALUE_SEPARATOR: &str = "; ";

/// Placeholder for an unknown creator or date.
const UNKNOWN: &str = "Unknown";

/// Related works kept in `dc:relation`.
const MAX_RELATED_WORKS: usize = 5;

/// Dublin Core representation of one publication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DublinCoreRecord {
    #[serde(rename = "dc:title")]
    pub title: String,
    #[serde(rename = "dc:creator")]
    pub creator: String,
    #[serde(rename = "dc:subject")]
    pub subject: String,
    #[serde(rename = "dc:description")]
    pub description: String,
    #[serde(rename = "dc:publisher")]
    pub publisher: String,
    #[serde(rename = "dc:contributor")]
    pub contributor: String,
    #[serde(rename = "dc:date")]
    pub date: String,
    #[serde(rename = "dc:type")]
    pub dc_type: String,
    #[serde(rename = "dc:format")]
    pub format: String,
    #[serde(rename = "dc:identifier")]
    pub identifier: String,
    #[serde(rename = "dc:source")]
    pub source: String,
    #[serde(rename = "dc:language")]
    pub language: String,
    #[serde(rename = "dc:relation")]
    pub relation: String,
    #[serde(rename = "dc:coverage")]
    pub coverage: String,
    #[serde(rename = "dc:rights")]
    pub rights: String,

    #[serde(flatten)]
    pub extended: ExtendedFields,
}

/// Non-DC columns carried alongside the standard elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtendedFields {
    pub citations: u64,
    pub year: Option<i32>,
    pub doi: String,
    pub url: String,
    pub data_source: String,
    pub original_type: String,
    pub volume: String,
    pub issue: String,
    pub pages: String,
    pub issn: String,
    pub isbn: String,
    pub is_open_access: bool,
    pub open_access_url: String,
    pub references_count: u64,
    pub referenced_works_count: u64,
    pub is_referenced_by_count: u64,
    pub mesh_terms: String,
    pub sustainable_development_goals: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openalex_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative_urls: Option<String>,
}

impl DublinCoreRecord {
    /// The 15 standard elements as `(name, value)` pairs in DCMES order.
    #[must_use]
    pub fn elements(&self) -> [(&'static str, &str); 15] {
        [
            ("dc:title", &self.title),
            ("dc:creator", &self.creator),
            ("dc:subject", &self.subject),
            ("dc:description", &self.description),
            ("dc:publisher", &self.publisher),
            ("dc:contributor", &self.contributor),
            ("dc:date", &self.date),
            ("dc:type", &self.dc_type),
            ("dc:format", &self.format),
            ("dc:identifier", &self.identifier),
            ("dc:source", &self.source),
            ("dc:language", &self.language),
            ("dc:relation", &self.relation),
            ("dc:coverage", &self.coverage),
            ("dc:rights", &self.rights),
        ]
    }
}

/// Maps a publication record to Dublin Core.
#[must_use]
pub fn map_to_dublin_core(record: &PublicationRecord) -> DublinCoreRecord {
    let creator = if record.authors.is_empty() {
        UNKNOWN.to_string()
    } else {
        join(&record.authors)
    };

    DublinCoreRecord {
        title: record.title.clone(),
        creator,
        subject: join(&subjects(record)),
        description: record.abstract_text.clone(),
        publisher: record.publisher.clone(),
        contributor: join(&contributors(record)),
        date: dc_date(record),
        dc_type: map_publication_type(&record.doc_type).to_string(),
        format: "text".to_string(),
        identifier: join(&identifiers(record)),
        source: record.journal.clone(),
        language: record.language.clone(),
        relation: join(&relations(record)),
        coverage: join(&coverage(record)),
        rights: join(&rights(record)),
        extended: ExtendedFields {
            citations: record.citations,
            year: record.year,
            doi: record.doi.clone(),
            url: record.url.clone(),
            data_source: record.source.to_string(),
            original_type: record.doc_type.clone(),
            volume: record.volume.clone(),
            issue: record.issue.clone(),
            pages: record.pages.clone(),
            issn: join(&record.issn),
            isbn: join(&record.isbn),
            is_open_access: record.is_open_access,
            open_access_url: record.open_access_url.clone(),
            references_count: record.references_count,
            referenced_works_count: record.referenced_works_count,
            is_referenced_by_count: record.is_referenced_by_count,
            mesh_terms: join(&record.mesh_terms),
            sustainable_development_goals: join(&record.sustainable_development_goals),
            openalex_id: record.openalex_id.clone(),
            alternative_urls: (!record.alternative_urls.is_empty())
                .then(|| join(&record.alternative_urls)),
        },
    }
}

/// Maps every record in `records`, preserving order.
#[must_use]
pub fn export_dublin_core(records: &[PublicationRecord]) -> Vec<DublinCoreRecord> {
    records.iter().map(map_to_dublin_core).collect()
}

/// Maps a provider-native type tag to a DCMI type bucket (case-insensitive).
///
/// Unrecognized tags map to `Text`; only an explicit `other` maps to `Other`.
#[must_use]
pub fn map_publication_type(original_type: &str) -> &'static str {
    match original_type.trim().to_ascii_lowercase().as_str() {
        "dataset" | "component" | "data-set" => "Dataset",
        "software" => "Software",
        "journal" | "journal-issue" | "journal-volume" => "Collection",
        "other" => "Other",
        _ => "Text",
    }
}

/// Formats a DOI as a resolvable identifier.
///
/// Bare `10.` DOIs become `https://doi.org/` URLs, other non-URL values are
/// prefixed `DOI:`, and URLs pass through unchanged.
#[must_use]
pub fn format_identifier(doi: &str) -> String {
    let doi = doi.trim();
    if doi.is_empty() {
        String::new()
    } else if doi.starts_with("http") {
        doi.to_string()
    } else if doi.starts_with("10.") {
        format!("https://doi.org/{doi}")
    } else {
        format!("DOI:{doi}")
    }
}

/// Formats date parts as `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
#[must_use]
pub fn format_date_parts(date: &DateParts) -> String {
    match date.parts() {
        [year, month, day, ..] => format!("{year:04}-{month:02}-{day:02}"),
        [year, month] => format!("{year:04}-{month:02}"),
        [year] => year.to_string(),
        [] => String::new(),
    }
}

fn join(values: &[String]) -> String {
    values.join(VALUE_SEPARATOR)
}

fn subjects(record: &PublicationRecord) -> Vec<String> {
    let mut seen = HashSet::new();
    record
        .subjects
        .iter()
        .chain(&record.keywords)
        .filter(|subject| seen.insert(subject.as_str()))
        .cloned()
        .collect()
}

fn dc_date(record: &PublicationRecord) -> String {
    if !record.publication_date.is_empty() {
        return record.publication_date.clone();
    }
    record
        .published_online
        .as_ref()
        .or(record.published_print.as_ref())
        .map(format_date_parts)
        .filter(|date| !date.is_empty())
        .or_else(|| record.year.map(|year| year.to_string()))
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn identifiers(record: &PublicationRecord) -> Vec<String> {
    let mut identifiers = Vec::new();
    if record.has_doi() {
        identifiers.push(format_identifier(&record.doi));
    }
    if let Some(openalex_id) = record.openalex_id.as_ref().filter(|id| !id.is_empty()) {
        identifiers.push(openalex_id.clone());
    }
    identifiers.extend(record.issn.iter().map(|issn| format!("ISSN:{issn}")));
    identifiers.extend(record.isbn.iter().map(|isbn| format!("ISBN:{isbn}")));
    identifiers
}

fn contributors(record: &PublicationRecord) -> Vec<String> {
    let editors = record.editors.iter().map(|name| format!("Editor:{name}"));
    let funders = record.funders.iter().map(|name| format!("Funder:{name}"));
    let institutions = record
        .institutions
        .iter()
        .map(|name| format!("Institution:{name}"));
    editors.chain(funders).chain(institutions).collect()
}

fn coverage(record: &PublicationRecord) -> Vec<String> {
    let mut coverage: Vec<String> = record
        .countries
        .iter()
        .map(|country| format!("Country:{country}"))
        .collect();
    if let Some(year) = record.year {
        coverage.push(format!("Temporal:{year}"));
    }
    coverage
}

fn relations(record: &PublicationRecord) -> Vec<String> {
    let mut relations = Vec::new();
    if !record.journal.is_empty() {
        relations.push(format!("Published in: {}", record.journal));
    }
    if !record.volume.is_empty() {
        relations.push(format!("Volume: {}", record.volume));
    }
    if !record.issue.is_empty() {
        relations.push(format!("Issue: {}", record.issue));
    }
    if !record.pages.is_empty() {
        relations.push(format!("Pages: {}", record.pages));
    }
    relations.extend(
        record
            .related_works
            .iter()
            .take(MAX_RELATED_WORKS)
            .map(|work| format!("Related:{work}")),
    );
    relations
}

fn rights(record: &PublicationRecord) -> Vec<String> {
    let mut rights = Vec::new();
    if record.is_open_access {
        rights.push("Open Access".to_string());
    }
    rights.extend(record.license.iter().map(|license| license.url.clone()));
    rights
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::record::{LicenseEntry, Source};

    fn sample_record() -> PublicationRecord {
        let mut record = PublicationRecord::new(Source::CrossRef);
        record.title = "Deep Learning for Proteins".to_string();
        record.authors = vec!["Ada Lovelace".to_string(), "Alan Turing".to_string()];
        record.year = Some(2021);
        record.journal = "Nature".to_string();
        record.doi = "10.1038/s41586-021-03819-2".to_string();
        record.doc_type = "journal-article".to_string();
        record
    }

    // ==================== Type mapping ====================

    #[test]
    fn test_map_publication_type_unknown_is_text() {
        assert_eq!(map_publication_type("xyz-unknown"), "Text");
    }

    #[test]
    fn test_map_publication_type_other_and_dataset() {
        assert_eq!(map_publication_type("other"), "Other");
        assert_eq!(map_publication_type("dataset"), "Dataset");
        assert_eq!(map_publication_type("component"), "Dataset");
    }

    #[test]
    fn test_map_publication_type_is_case_insensitive() {
        assert_eq!(map_publication_type("SOFTWARE"), "Software");
        assert_eq!(map_publication_type("Journal-Issue"), "Collection");
        assert_eq!(map_publication_type("Proceedings-Article"), "Text");
    }

    // ==================== Identifiers and dates ====================

    #[test]
    fn test_format_identifier_variants() {
        assert_eq!(format_identifier("10.1000/xyz"), "https://doi.org/10.1000/xyz");
        assert_eq!(format_identifier(" 10.1000/xyz "), "https://doi.org/10.1000/xyz");
        assert_eq!(format_identifier("abc/123"), "DOI:abc/123");
        assert_eq!(
            format_identifier("https://doi.org/10.1000/xyz"),
            "https://doi.org/10.1000/xyz"
        );
        assert_eq!(format_identifier(""), "");
    }

    #[test]
    fn test_format_date_parts_precision() {
        let full = DateParts::from_row(&[Some(2024), Some(3), Some(7)]).unwrap();
        let month = DateParts::from_row(&[Some(2024), Some(3)]).unwrap();
        let year = DateParts::from_row(&[Some(2024)]).unwrap();
        assert_eq!(format_date_parts(&full), "2024-03-07");
        assert_eq!(format_date_parts(&month), "2024-03");
        assert_eq!(format_date_parts(&year), "2024");
    }

    // ==================== Element mapping ====================

    #[test]
    fn test_map_core_elements() {
        let dc = map_to_dublin_core(&sample_record());
        assert_eq!(dc.title, "Deep Learning for Proteins");
        assert_eq!(dc.creator, "Ada Lovelace; Alan Turing");
        assert_eq!(dc.dc_type, "Text");
        assert_eq!(dc.format, "text");
        assert_eq!(dc.language, "en");
        assert_eq!(dc.identifier, "https://doi.org/10.1038/s41586-021-03819-2");
        assert_eq!(dc.source, "Nature");
        assert_eq!(dc.date, "2021");
        assert_eq!(dc.coverage, "Temporal:2021");
        assert_eq!(dc.relation, "Published in: Nature");
        assert_eq!(dc.extended.data_source, "CrossRef");
    }

    #[test]
    fn test_missing_authors_and_date_are_unknown() {
        let record = PublicationRecord::new(Source::OpenAlex);
        let dc = map_to_dublin_core(&record);
        assert_eq!(dc.creator, "Unknown");
        assert_eq!(dc.date, "Unknown");
        assert_eq!(dc.identifier, "");
        assert_eq!(dc.rights, "");
    }

    #[test]
    fn test_date_prefers_publication_date_then_online_then_print() {
        let mut record = sample_record();
        record.published_print = DateParts::from_row(&[Some(2021), Some(9)]);
        assert_eq!(map_to_dublin_core(&record).date, "2021-09");

        record.published_online = DateParts::from_row(&[Some(2021), Some(7), Some(15)]);
        assert_eq!(map_to_dublin_core(&record).date, "2021-07-15");

        record.publication_date = "2021-07-01".to_string();
        assert_eq!(map_to_dublin_core(&record).date, "2021-07-01");
    }

    #[test]
    fn test_subjects_merge_keywords_without_duplicates() {
        let mut record = sample_record();
        record.subjects = vec!["Biology".to_string(), "Chemistry".to_string()];
        record.keywords = vec!["Chemistry".to_string(), "Folding".to_string()];
        assert_eq!(map_to_dublin_core(&record).subject, "Biology; Chemistry; Folding");
    }

    #[test]
    fn test_contributors_identifiers_and_rights() {
        let mut record = sample_record();
        record.editors = vec!["E. Editor".to_string()];
        record.funders = vec!["NSF".to_string()];
        record.institutions = vec!["MIT".to_string()];
        record.issn = vec!["0028-0836".to_string()];
        record.is_open_access = true;
        record.license = vec![LicenseEntry {
            url: "https://creativecommons.org/licenses/by/4.0/".to_string(),
            ..LicenseEntry::default()
        }];

        let dc = map_to_dublin_core(&record);
        assert_eq!(dc.contributor, "Editor:E. Editor; Funder:NSF; Institution:MIT");
        assert_eq!(
            dc.identifier,
            "https://doi.org/10.1038/s41586-021-03819-2; ISSN:0028-0836"
        );
        assert_eq!(
            dc.rights,
            "Open Access; https://creativecommons.org/licenses/by/4.0/"
        );
        assert_eq!(dc.extended.issn, "0028-0836");
    }

    #[test]
    fn test_relations_cap_related_works() {
        let mut record = sample_record();
        record.volume = "596".to_string();
        record.related_works = (1..=7).map(|n| format!("W{n}")).collect();
        let dc = map_to_dublin_core(&record);
        assert!(dc.relation.starts_with("Published in: Nature; Volume: 596; Related:W1"));
        assert!(dc.relation.ends_with("Related:W5"));
    }

    #[test]
    fn test_optional_extended_fields_skipped_when_absent() {
        let json = serde_json::to_value(map_to_dublin_core(&sample_record())).unwrap();
        assert!(json.get("openalex_id").is_none());
        assert!(json.get("alternative_urls").is_none());
        assert_eq!(json["dc:title"], "Deep Learning for Proteins");
        assert_eq!(json["citations"], 0);
    }

    #[test]
    fn test_elements_in_canonical_order() {
        let dc = map_to_dublin_core(&sample_record());
        let names: Vec<&str> = dc.elements().iter().map(|(name, _)| *name).collect();
        assert_eq!(names.first(), Some(&"dc:title"));
        assert_eq!(names.last(), Some(&"dc:rights"));
        assert_eq!(names.len(), 15);
    }

    #[test]
    fn test_export_preserves_order() {
        let mut second = sample_record();
        second.title = "Second".to_string();
        let exported = export_dublin_core(&[sample_record(), second]);
        assert_eq!(exported.len(), 2);
        assert_eq!(exported[1].title, "Second");
    }
}
