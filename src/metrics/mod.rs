//! Bibliometric indicators computed from citation counts.
//!
//! All functions are pure and deterministic. Inputs are treated as a multiset:
//! order does not matter, and every function sorts its own copy.

use serde::{Deserialize, Serialize};

use crate::record::PublicationRecord;

/// Summary indicators for a set of publications.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricsResult {
    pub total_publications: usize,
    pub total_citations: u64,
    /// Mean citations per publication, rounded to two decimals.
    pub avg_citations: f64,
    pub h_index: usize,
    pub g_index: usize,
}

impl MetricsResult {
    /// Computes metrics over the citation counts of `records`.
    #[must_use]
    pub fn from_records(records: &[PublicationRecord]) -> Self {
        let counts: Vec<u64> = records.iter().map(|record| record.citations).collect();
        calculate_metrics(&counts)
    }
}

/// Computes every indicator for `citation_counts`.
///
/// Returns an all-zero result for empty input.
#[must_use]
pub fn calculate_metrics(citation_counts: &[u64]) -> MetricsResult {
    if citation_counts.is_empty() {
        return MetricsResult::default();
    }

    let total_citations = citation_counts
        .iter()
        .fold(0u64, |total, &count| total.saturating_add(count));
    #[allow(clippy::cast_precision_loss)]
    let avg = total_citations as f64 / citation_counts.len() as f64;

    MetricsResult {
        total_publications: citation_counts.len(),
        total_citations,
        avg_citations: round_to_cents(avg),
        h_index: calculate_h_index(citation_counts),
        g_index: calculate_g_index(citation_counts),
    }
}

/// Like [`calculate_metrics`], discarding missing counts first.
#[must_use]
pub fn calculate_metrics_lenient(citation_counts: &[Option<u64>]) -> MetricsResult {
    let counts: Vec<u64> = citation_counts.iter().flatten().copied().collect();
    calculate_metrics(&counts)
}

/// Largest `h` such that the top `h` publications each have at least `h` citations.
#[must_use]
pub fn calculate_h_index(citation_counts: &[u64]) -> usize {
    let sorted = sorted_descending(citation_counts);
    let mut h = 0;
    for (index, &count) in sorted.iter().enumerate() {
        let rank = index as u64 + 1;
        if count >= rank {
            h = index + 1;
        } else {
            break;
        }
    }
    h
}

/// Largest `g` such that the top `g` publications together have at least `g²` citations.
#[must_use]
pub fn calculate_g_index(citation_counts: &[u64]) -> usize {
    let sorted = sorted_descending(citation_counts);
    let mut g = 0;
    let mut cumulative: u64 = 0;
    for (index, &count) in sorted.iter().enumerate() {
        cumulative = cumulative.saturating_add(count);
        let rank = index as u64 + 1;
        if cumulative >= rank.saturating_mul(rank) {
            g = index + 1;
        } else {
            break;
        }
    }
    g
}

fn sorted_descending(citation_counts: &[u64]) -> Vec<u64> {
    let mut sorted = citation_counts.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
