//! CLI output formatting and display helpers.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use harvester_core::{MetricsResult, PublicationRecord, export_dublin_core};

use crate::cli::OutputFormat;

/// Returns terminal width from COLUMNS, or 80 if unset/invalid.
pub fn terminal_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|width| *width >= 20)
        .unwrap_or(80)
}

/// Truncates text to at most `width` chars, appending ellipsis if truncated.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    let text_len = text.chars().count();
    if text_len <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    if width == 1 {
        return "…".to_string();
    }

    let mut output: String = text.chars().take(width - 1).collect();
    output.push('…');
    output
}

/// Renders `records` in `format`.
pub fn render_records(
    records: &[PublicationRecord],
    format: OutputFormat,
    width: usize,
) -> Result<String> {
    match format {
        OutputFormat::Summary => Ok(render_summary(records, width)),
        OutputFormat::Json => {
            serde_json::to_string_pretty(records).context("Failed to serialize records")
        }
        OutputFormat::DublinCore => serde_json::to_string_pretty(&export_dublin_core(records))
            .context("Failed to serialize Dublin Core records"),
    }
}

/// Two lines per record: numbered title, then year, authors, venue and DOI.
pub fn render_summary(records: &[PublicationRecord], width: usize) -> String {
    if records.is_empty() {
        return "No records found.".to_string();
    }
    let index_width = records.len().to_string().len();
    let mut lines = Vec::with_capacity(records.len() * 2);
    for (index, record) in records.iter().enumerate() {
        let heading = format!("{:>index_width$}. {}", index + 1, record.title);
        lines.push(truncate_to_width(&heading, width));

        let mut details = vec![
            record
                .year
                .map_or_else(|| "n.d.".to_string(), |year| year.to_string()),
            author_label(&record.authors),
        ];
        if !record.journal.is_empty() {
            details.push(record.journal.clone());
        }
        details.push(format!("cited {}", record.citations));
        if !record.doi.is_empty() {
            details.push(format!("doi:{}", record.doi));
        }
        let indent = " ".repeat(index_width + 2);
        lines.push(truncate_to_width(
            &format!("{indent}{}", details.join(" | ")),
            width,
        ));
    }
    lines.join("\n")
}

fn author_label(authors: &[String]) -> String {
    match authors {
        [] => "Unknown".to_string(),
        [only] => only.clone(),
        [first, second] => format!("{first}; {second}"),
        [first, rest @ ..] => format!("{first} et al. (+{})", rest.len()),
    }
}

/// Plain-text metrics block.
pub fn render_metrics(metrics: &MetricsResult) -> String {
    [
        format!("publications    = {}", metrics.total_publications),
        format!("total_citations = {}", metrics.total_citations),
        format!("avg_citations   = {:.2}", metrics.avg_citations),
        format!("h_index         = {}", metrics.h_index),
        format!("g_index         = {}", metrics.g_index),
    ]
    .join("\n")
}

/// Writes `content` to `path`, or to stdout when no path is given.
pub fn write_output(content: &str, path: Option<&Path>) -> Result<()> {
    if let Some(path) = path {
        fs::write(path, format!("{content}\n"))
            .with_context(|| format!("Failed to write output file '{}'", path.display()))?;
        return Ok(());
    }
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{content}").context("Failed to write to stdout")?;
    Ok(())
}
