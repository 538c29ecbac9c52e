//! Crawl summary
//!
//! Records what a completed crawl produced, in visit order, and prints it in
//! a human-readable form for the command-line tool.

use crate::convert::OutputFormat;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Outcome of a completed crawl
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    /// Table the crawl started from
    pub start_table: String,

    /// Serialization used for every artifact
    pub format: OutputFormat,

    /// Visited tables with the location of their artifact, in write order
    pub artifacts: Vec<(String, PathBuf)>,

    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl CrawlSummary {
    pub fn new(start_table: impl Into<String>, format: OutputFormat) -> Self {
        Self {
            start_table: start_table.into(),
            format,
            artifacts: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Records that a table's artifact was written
    pub fn record(&mut self, table_name: impl Into<String>, location: PathBuf) {
        self.artifacts.push((table_name.into(), location));
    }

    /// Marks the crawl as finished
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Names of visited tables, in visit order
    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.artifacts.iter().map(|(name, _)| name.as_str())
    }

    pub fn tables_visited(&self) -> usize {
        self.artifacts.len()
    }

    /// Wall-clock duration in milliseconds, once finished
    pub fn duration_ms(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_milliseconds())
    }
}

/// Prints a crawl summary to stdout
pub fn print_summary(summary: &CrawlSummary) {
    println!("=== Crawl Summary ===\n");
    println!("Start table: {}", summary.start_table);
    println!("Format: {}", summary.format);
    println!("Tables visited: {}", summary.tables_visited());
    if let Some(ms) = summary.duration_ms() {
        println!("Duration: {}ms", ms);
    }

    println!("\nArtifacts:");
    for (table, path) in &summary.artifacts {
        println!("  - {} -> {}", table, path.display());
    }
}
