//! Provider JSON to [`PublicationRecord`] normalization.
//!
//! Each provider has its own normalizer:
//!
//! - [`crossref::normalize_work`] - one item of CrossRef `message.items`
//! - [`openalex::normalize_work`] - one item of OpenAlex `results`
//!
//! Normalizers are total: absent, null or mistyped fields fall back to a
//! default (empty string, empty list, zero) instead of failing. They read the
//! raw [`serde_json::Value`] so one odd field never discards a whole item.

pub mod crossref;
pub mod openalex;

use serde_json::Value;

use crate::record::{PublicationRecord, Source};

/// Normalizes one raw item using the normalizer for `source`.
#[must_use]
pub fn normalize_item(source: Source, item: &Value) -> PublicationRecord {
    match source {
        Source::CrossRef => crossref::normalize_work(item),
        Source::OpenAlex => openalex::normalize_work(item),
    }
}

// ==================== Lenient accessors ====================

/// String at `key`, or empty. Numbers are rendered (CrossRef sends some
/// volume and issue values as integers).
pub(crate) fn string_field(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    }
}

/// First string of the array at `key`, or empty.
pub(crate) fn first_string(value: &Value, key: &str) -> String {
    string_list(value, key).into_iter().next().unwrap_or_default()
}

/// Every string element of the array at `key`.
pub(crate) fn string_list(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(ToOwned::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

/// Elements of the array at `key`, empty when absent or not an array.
pub(crate) fn array_field<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map_or(&[], Vec::as_slice)
}

/// Non-negative integer at `key`, or zero.
pub(crate) fn count_field(value: &Value, key: &str) -> u64 {
    value.get(key).and_then(Value::as_u64).unwrap_or(0)
}

/// Float at `key`, or zero.
pub(crate) fn float_field(value: &Value, key: &str) -> f64 {
    value.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

/// Assembles `given family`, skipping absent parts. `None` when both are absent.
pub(crate) fn person_name(person: &Value) -> Option<String> {
    let parts: Vec<&str> = ["given", "family"]
        .into_iter()
        .filter_map(|key| person.get(key).and_then(Value::as_str))
        .filter(|part| !part.trim().is_empty())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}
