//! OpenAlex `works` result normalization.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::trace;

use super::{array_field, count_field, float_field, string_field, string_list};
use crate::record::{
    DEFAULT_LANGUAGE, MISSING_TITLE, PublicationRecord, Source, dedup_preserving_order,
};

/// Type reported when an OpenAlex work has none.
const DEFAULT_TYPE: &str = "article";

/// Concepts at or below this score are not kept as subjects.
const CONCEPT_SCORE_THRESHOLD: f64 = 0.3;

/// Related works kept per record.
const MAX_RELATED_WORKS: usize = 5;

const DOI_URL_PREFIX: &str = "https://doi.org/";

/// Normalizes one OpenAlex work.
#[must_use]
pub fn normalize_work(item: &Value) -> PublicationRecord {
    let mut record = PublicationRecord::new(Source::OpenAlex);

    let title = string_field(item, "title");
    record.title = if title.trim().is_empty() {
        MISSING_TITLE.to_string()
    } else {
        title
    };

    let authorships = array_field(item, "authorships");
    record.authors = authorships
        .iter()
        .filter_map(|authorship| {
            authorship
                .get("author")
                .and_then(|author| author.get("display_name"))
                .and_then(Value::as_str)
        })
        .filter(|name| !name.is_empty())
        .map(ToOwned::to_owned)
        .collect();
    record.affiliations = institution_values(authorships, "display_name");
    record.institutions = dedup_preserving_order(record.affiliations.clone());
    record.countries = dedup_preserving_order(institution_values(authorships, "country_code"));

    record.year = item
        .get("publication_year")
        .and_then(Value::as_i64)
        .and_then(|year| i32::try_from(year).ok());

    if let Some(source) = item.get("primary_location").and_then(|loc| loc.get("source")) {
        record.journal = string_field(source, "display_name");
        record.issn = string_list(source, "issn");
    }

    let doi_url = string_field(item, "doi");
    record.doi = doi_url
        .strip_prefix(DOI_URL_PREFIX)
        .unwrap_or(&doi_url)
        .to_string();
    record.url = doi_url;

    record.abstract_text = reconstruct_abstract(item.get("abstract_inverted_index"))
        .unwrap_or_else(|| string_field(item, "abstract"));
    record.citations = count_field(item, "cited_by_count");
    record.doc_type = match string_field(item, "type") {
        t if t.trim().is_empty() => DEFAULT_TYPE.to_string(),
        t => t,
    };
    let id = string_field(item, "id");
    record.openalex_id = (!id.is_empty()).then_some(id);

    let language = string_field(item, "language");
    record.language = if language.is_empty() {
        DEFAULT_LANGUAGE.to_string()
    } else {
        language
    };

    let concepts: Vec<String> = array_field(item, "concepts")
        .iter()
        .filter(|concept| float_field(concept, "score") > CONCEPT_SCORE_THRESHOLD)
        .map(|concept| string_field(concept, "display_name"))
        .filter(|name| !name.is_empty())
        .collect();
    record.subjects.clone_from(&concepts);
    record.keywords = concepts;

    if let Some(open_access) = item.get("open_access") {
        record.is_open_access = open_access
            .get("is_oa")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        record.open_access_url = string_field(open_access, "oa_url");
    }

    record.referenced_works_count = array_field(item, "referenced_works").len() as u64;
    record.related_works = string_list(item, "related_works")
        .into_iter()
        .take(MAX_RELATED_WORKS)
        .collect();
    record.publication_date = string_field(item, "publication_date");
    record.sustainable_development_goals =
        named_entries(item, "sustainable_development_goals", "display_name");
    record.mesh_terms = named_entries(item, "mesh", "descriptor_name");

    if let Some(biblio) = item.get("biblio") {
        record.volume = string_field(biblio, "volume");
        record.issue = string_field(biblio, "issue");
        record.pages = page_range(
            &string_field(biblio, "first_page"),
            &string_field(biblio, "last_page"),
        );
    }

    record.score = float_field(item, "relevance_score");

    trace!(doi = %record.doi, title = %record.title, "Normalized OpenAlex work");
    record
}

/// Rebuilds abstract text from OpenAlex's `{word: [positions]}` index.
#[must_use]
pub fn reconstruct_abstract(index: Option<&Value>) -> Option<String> {
    let index = index?.as_object()?;
    let mut positioned: BTreeMap<u64, &str> = BTreeMap::new();
    for (word, positions) in index {
        let Some(positions) = positions.as_array() else {
            continue;
        };
        for position in positions.iter().filter_map(Value::as_u64) {
            positioned.insert(position, word.as_str());
        }
    }

    let text = positioned.into_values().collect::<Vec<_>>().join(" ");
    if text.is_empty() { None } else { Some(text) }
}

/// `first-last`, or whichever exists.
fn page_range(first: &str, last: &str) -> String {
    match (first.is_empty(), last.is_empty()) {
        (false, false) => format!("{first}-{last}"),
        (false, true) => first.to_string(),
        (true, false) => last.to_string(),
        (true, true) => String::new(),
    }
}

/// `authorships[].institutions[].<key>` strings in document order.
fn institution_values(authorships: &[Value], key: &str) -> Vec<String> {
    authorships
        .iter()
        .flat_map(|authorship| array_field(authorship, "institutions"))
        .map(|institution| string_field(institution, key))
        .filter(|value| !value.is_empty())
        .collect()
}

fn named_entries(item: &Value, key: &str, name_key: &str) -> Vec<String> {
    array_field(item, key)
        .iter()
        .map(|entry| string_field(entry, name_key))
        .filter(|name| !name.is_empty())
        .collect()
}
