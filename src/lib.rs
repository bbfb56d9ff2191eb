//! Harvester Core Library
//!
//! This library harvests bibliographic records from CrossRef and OpenAlex,
//! normalizes them into one record shape, maps them to Dublin Core, and
//! computes citation metrics.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`harvest`] - Paginated, deduplicated, retrying provider searches
//! - [`normalize`] - Provider JSON to [`PublicationRecord`] normalization
//! - [`record`] - The canonical publication record
//! - [`dublin_core`] - Dublin Core element mapping
//! - [`metrics`] - h-index, g-index and citation averages

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod dublin_core;
pub mod harvest;
pub mod metrics;
pub mod normalize;
pub mod record;
mod user_agent;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use dublin_core::{DublinCoreRecord, export_dublin_core, map_to_dublin_core};
pub use harvest::{
    AdvancedQuery, BooleanOperator, DocumentType, HarvestConfig, HarvestError, HarvestOutcome,
    Harvester, RetryPolicy, SearchField, SearchFilters, SearchMode, SearchRequest,
    SortPreference,
};
pub use metrics::{MetricsResult, calculate_g_index, calculate_h_index, calculate_metrics};
pub use record::{PublicationRecord, Source};
