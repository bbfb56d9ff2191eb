//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use harvester_core::{
    AdvancedQuery, BooleanOperator, DocumentType, SearchField, SearchFilters, SearchRequest,
    SortPreference, Source,
};
use serde::Deserialize;

/// Harvest bibliographic records from CrossRef and OpenAlex.
///
/// Searches one provider, normalizes and deduplicates what it returns, and
/// prints records, Dublin Core metadata, or citation metrics.
#[derive(Parser, Debug)]
#[command(name = "harvester")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search a provider and print the harvested records
    Search(SearchArgs),
    /// Compute h-index, g-index and averages for literal citation counts
    Metrics(MetricsArgs),
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Print the effective configuration and where it came from
    Show,
}

/// Metadata provider selectable on the command line and in config.
#[derive(ValueEnum, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderArg {
    Crossref,
    Openalex,
}

impl ProviderArg {
    pub fn source(self) -> Source {
        match self {
            Self::Crossref => Source::CrossRef,
            Self::Openalex => Source::OpenAlex,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Crossref => "crossref",
            Self::Openalex => "openalex",
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldArg {
    Author,
    Title,
    Keyword,
    Affiliation,
    All,
}

impl From<FieldArg> for SearchField {
    fn from(field: FieldArg) -> Self {
        match field {
            FieldArg::Author => Self::Author,
            FieldArg::Title => Self::Title,
            FieldArg::Keyword => Self::Keyword,
            FieldArg::Affiliation => Self::Affiliation,
            FieldArg::All => Self::AllFields,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorArg {
    And,
    Or,
}

impl From<OperatorArg> for BooleanOperator {
    fn from(operator: OperatorArg) -> Self {
        match operator {
            OperatorArg::And => Self::And,
            OperatorArg::Or => Self::Or,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortArg {
    Relevance,
    Newest,
    Oldest,
    Citations,
}

impl From<SortArg> for SortPreference {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::Relevance => Self::Relevance,
            SortArg::Newest => Self::DateNewest,
            SortArg::Oldest => Self::DateOldest,
            SortArg::Citations => Self::CitationsDesc,
        }
    }
}

/// Output rendering for harvested records.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One line per record
    #[default]
    Summary,
    /// Normalized records as a JSON array
    Json,
    /// Dublin Core records as a JSON array
    DublinCore,
}

/// Arguments for `harvester search`.
#[derive(ClapArgs, Debug, Clone)]
pub struct SearchArgs {
    /// Search text; the main term in advanced mode
    pub query: Option<String>,

    /// Provider to query [default: config `provider`, else crossref]
    #[arg(short, long, value_enum)]
    pub provider: Option<ProviderArg>,

    /// Field targeted by a simple search
    #[arg(long, value_enum, default_value_t = FieldArg::Keyword)]
    pub field: FieldArg,

    /// Advanced: author term
    #[arg(long)]
    pub author: Option<String>,

    /// Advanced: title term
    #[arg(long)]
    pub title: Option<String>,

    /// Advanced: abstract term
    #[arg(long = "abstract")]
    pub abstract_text: Option<String>,

    /// Advanced: affiliation term
    #[arg(long)]
    pub affiliation: Option<String>,

    /// Advanced: journal term
    #[arg(long)]
    pub journal: Option<String>,

    /// Advanced: how terms combine
    #[arg(long, value_enum, default_value_t = OperatorArg::And)]
    pub operator: OperatorArg,

    /// Earliest publication year
    #[arg(long)]
    pub from_year: Option<i32>,

    /// Latest publication year
    #[arg(long)]
    pub to_year: Option<i32>,

    /// Document type (journal-article, book-chapter, conference-paper, preprint, report); repeatable
    #[arg(long = "type", value_name = "TYPE")]
    pub doc_types: Vec<String>,

    /// Only open-access records
    #[arg(long)]
    pub open_access: bool,

    /// Only records with a DOI
    #[arg(long)]
    pub has_doi: bool,

    /// Only records with an abstract
    #[arg(long)]
    pub has_abstract: bool,

    /// Minimum citation count
    #[arg(long, default_value_t = 0)]
    pub min_citations: u64,

    /// Result ordering
    #[arg(short, long, value_enum, default_value_t = SortArg::Relevance)]
    pub sort: SortArg,

    /// Maximum records to return (1-5000) [default: config `max_results`, else 100]
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u16).range(1..=5000))]
    pub max_results: Option<u16>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Summary)]
    pub format: OutputFormat,

    /// Write output to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print citation metrics for the harvested records
    #[arg(long)]
    pub metrics: bool,

    /// Contact email for the providers' polite pools [default: config `mailto`]
    #[arg(long)]
    pub mailto: Option<String>,

    /// Override the provider API root
    #[arg(long, hide = true)]
    pub base_url: Option<String>,
}

impl SearchArgs {
    /// True when any advanced-only term flag was given.
    pub fn is_advanced(&self) -> bool {
        [
            &self.author,
            &self.title,
            &self.abstract_text,
            &self.affiliation,
            &self.journal,
        ]
        .into_iter()
        .any(Option::is_some)
    }

    pub fn filters(&self) -> SearchFilters {
        SearchFilters {
            from_year: self.from_year,
            to_year: self.to_year,
            doc_types: self
                .doc_types
                .iter()
                .map(|label| DocumentType::from_label(label))
                .collect(),
            open_access_only: self.open_access,
            has_doi: self.has_doi,
            has_abstract: self.has_abstract,
            min_citations: self.min_citations,
        }
    }

    /// Builds the library request, capping results at `max_results`.
    pub fn to_request(&self, max_results: usize) -> Result<SearchRequest> {
        let request = if self.is_advanced() {
            SearchRequest::advanced(AdvancedQuery {
                main: self.query.clone(),
                author: self.author.clone(),
                title: self.title.clone(),
                abstract_text: self.abstract_text.clone(),
                affiliation: self.affiliation.clone(),
                journal: self.journal.clone(),
                operator: self.operator.into(),
            })
        } else {
            let Some(query) = self.query.as_deref() else {
                bail!("A search query is required unless --author, --title, --abstract, --affiliation or --journal is given");
            };
            SearchRequest::simple(self.field.into(), query)
        };
        Ok(request
            .with_filters(self.filters())
            .with_sort(self.sort.into())
            .with_max_results(max_results))
    }
}

/// Arguments for `harvester metrics`.
#[derive(ClapArgs, Debug, Clone)]
pub struct MetricsArgs {
    /// Citation count of each publication
    #[arg(required = true, value_name = "COUNT")]
    pub counts: Vec<u64>,

    /// Print metrics as JSON
    #[arg(long)]
    pub json: bool,
}
