//! Text projections of search results

use crate::error::{Error, Result};
use crate::gateway::SearchResult;
use chrono::{DateTime, Utc};
use std::str::FromStr;

/// Output format for result listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// `path  size  modified` per line
    #[default]
    Compact,
    /// Multi-line block per result
    Full,
    /// One path per line
    Paths,
    /// Pretty JSON array
    Json,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(OutputFormat::Compact),
            "full" => Ok(OutputFormat::Full),
            "paths" => Ok(OutputFormat::Paths),
            "json" => Ok(OutputFormat::Json),
            _ => Err(Error::InvalidFormat(s.to_string())),
        }
    }
}

const NO_RESULTS: &str = "No results.";

/// Render results in the requested format
pub fn render(results: &[SearchResult], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(results)?),
        OutputFormat::Paths => Ok(results
            .iter()
            .map(|r| r.path.as_str())
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Compact if results.is_empty() => Ok(NO_RESULTS.to_string()),
        OutputFormat::Compact => Ok(results
            .iter()
            .map(|r| {
                format!(
                    "{}  {}  {}",
                    r.path,
                    format_bytes(r.size),
                    format_date(r.modified)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Full if results.is_empty() => Ok(NO_RESULTS.to_string()),
        OutputFormat::Full => Ok(results
            .iter()
            .map(render_full)
            .collect::<Vec<_>>()
            .join("\n\n")),
    }
}

fn render_full(r: &SearchResult) -> String {
    let mut lines = vec![
        r.path.clone(),
        format!("  name:     {}", r.name),
    ];
    if let Some(ref kind) = r.kind {
        lines.push(format!("  kind:     {}", kind));
    }
    if !r.content_type.is_empty() {
        lines.push(format!("  type:     {}", r.content_type));
    }
    lines.push(format!("  size:     {} ({} bytes)", format_bytes(r.size), r.size));
    lines.push(format!("  modified: {}", format_date(r.modified)));
    lines.push(format!("  created:  {}", format_date(r.created)));
    lines.join("\n")
}

/// Format bytes as human-readable size
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else if bytes < GB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    }
}

fn format_date(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}
