//! CrossRef `works` item normalization.

use serde_json::Value;
use tracing::trace;

use super::{
    array_field, count_field, first_string, float_field, person_name, string_field, string_list,
};
use crate::record::{
    DEFAULT_LANGUAGE, DateParts, LicenseEntry, MISSING_TITLE, PublicationRecord, Source,
};

/// Type reported when a CrossRef item has none.
const DEFAULT_TYPE: &str = "article";

/// License URL marker treated as an open-access signal.
const CREATIVE_COMMONS_MARKER: &str = "creativecommons.org";

/// Link content type treated as a secondary open-access signal.
const UNLABELED_CONTENT_TYPE: &str = "unspecified";

/// Normalizes one CrossRef work item.
#[must_use]
pub fn normalize_work(item: &Value) -> PublicationRecord {
    let mut record = PublicationRecord::new(Source::CrossRef);

    let title = first_string(item, "title");
    record.title = if title.trim().is_empty() {
        MISSING_TITLE.to_string()
    } else {
        title
    };
    record.authors = people(item, "author");
    record.published_print = extract_date_parts(item, "published-print");
    record.published_online = extract_date_parts(item, "published-online");
    record.year = record
        .published_print
        .as_ref()
        .or(record.published_online.as_ref())
        .and_then(DateParts::year);
    record.journal = first_string(item, "container-title");
    record.doi = string_field(item, "DOI").trim().to_string();
    record.abstract_text = string_field(item, "abstract");
    record.citations = count_field(item, "is-referenced-by-count");
    record.is_referenced_by_count = record.citations;
    record.url = string_field(item, "URL");
    record.publisher = string_field(item, "publisher");
    record.doc_type = non_empty_or(string_field(item, "type"), DEFAULT_TYPE);

    record.issn = string_list(item, "ISSN");
    record.isbn = string_list(item, "ISBN");
    record.volume = string_field(item, "volume");
    record.issue = string_field(item, "issue");
    record.pages = string_field(item, "page");
    record.language = non_empty_or(string_field(item, "language"), DEFAULT_LANGUAGE);
    record.subjects = string_list(item, "subject");
    record.references_count = count_field(item, "references-count");
    record.license = extract_licenses(item);
    record.editors = people(item, "editor");
    record.funders = array_field(item, "funder")
        .iter()
        .filter_map(|funder| funder.get("name").and_then(Value::as_str))
        .map(ToOwned::to_owned)
        .collect();
    record.alternative_urls = array_field(item, "link")
        .iter()
        .filter_map(|link| link.get("URL").and_then(Value::as_str))
        .map(ToOwned::to_owned)
        .collect();
    record.score = float_field(item, "score");

    let (is_open_access, open_access_url) = detect_open_access(item, &record);
    record.is_open_access = is_open_access;
    record.open_access_url = open_access_url;

    trace!(doi = %record.doi, title = %record.title, "Normalized CrossRef work");
    record
}

/// Heuristic open-access detection.
///
/// A Creative Commons license URL is taken as open access. Failing that, a
/// cited work exposing a link with content type `unspecified` is also taken
/// as open access. The second signal is weak and can produce false
/// positives; it is kept for compatibility with existing exports.
fn detect_open_access(item: &Value, record: &PublicationRecord) -> (bool, String) {
    if let Some(license) = record
        .license
        .iter()
        .find(|license| license.url.contains(CREATIVE_COMMONS_MARKER))
    {
        return (true, license.url.clone());
    }

    if record.citations > 0 {
        let unlabeled = array_field(item, "link").iter().find_map(|link| {
            let content_type = link.get("content-type").and_then(Value::as_str)?;
            let url = link.get("URL").and_then(Value::as_str)?;
            (content_type == UNLABELED_CONTENT_TYPE && !url.is_empty()).then(|| url.to_string())
        });
        if let Some(url) = unlabeled {
            return (true, url);
        }
    }

    (false, String::new())
}

/// First row of `item[key]["date-parts"]`.
fn extract_date_parts(item: &Value, key: &str) -> Option<DateParts> {
    let row = item
        .get(key)?
        .get("date-parts")?
        .as_array()?
        .first()?
        .as_array()?;
    let parts: Vec<Option<i32>> = row
        .iter()
        .map(|part| part.as_i64().and_then(|n| i32::try_from(n).ok()))
        .collect();
    DateParts::from_row(&parts)
}

fn extract_licenses(item: &Value) -> Vec<LicenseEntry> {
    array_field(item, "license")
        .iter()
        .filter(|license| license.is_object())
        .map(|license| LicenseEntry {
            url: string_field(license, "URL"),
            content_version: license
                .get("content-version")
                .and_then(Value::as_str)
                .map(ToOwned::to_owned),
            delay_in_days: license.get("delay-in-days").and_then(Value::as_i64),
        })
        .collect()
}

fn people(item: &Value, key: &str) -> Vec<String> {
    array_field(item, key).iter().filter_map(person_name).collect()
}

fn non_empty_or(value: String, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value
    }
}
