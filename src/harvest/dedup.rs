//! Per-search duplicate detection.
//!
//! A [`DedupSet`] lives for exactly one search call; the pagination driver
//! creates a fresh one on entry, so nothing carries over between searches.

use std::collections::HashSet;

use crate::record::PublicationRecord;

/// Identity used to detect duplicate records.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DedupKey {
    /// Exact, case-preserved DOI.
    Doi(String),
    /// Lowercased, trimmed title, used when the DOI is empty.
    Title(String),
}

impl DedupKey {
    /// Derives the key for `record`. `None` when it has neither DOI nor title.
    #[must_use]
    pub fn for_record(record: &PublicationRecord) -> Option<Self> {
        let doi = record.doi.trim();
        if !doi.is_empty() {
            return Some(Self::Doi(doi.to_string()));
        }
        let title = record.title.trim().to_lowercase();
        if title.is_empty() {
            None
        } else {
            Some(Self::Title(title))
        }
    }
}

/// Keys already accepted during the current search.
#[derive(Debug, Default)]
pub struct DedupSet {
    seen: HashSet<DedupKey>,
}

impl DedupSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `record`'s key and returns true if it was not seen before.
    ///
    /// Records with no usable key are rejected.
    pub fn insert(&mut self, record: &PublicationRecord) -> bool {
        DedupKey::for_record(record).is_some_and(|key| self.seen.insert(key))
    }

    /// Number of distinct keys accepted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
