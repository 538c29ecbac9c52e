//! Crawler coordinator - main crawl orchestration logic
//!
//! The crawl is a depth-first, pre-order walk over the `relatedTables`
//! graph:
//! - a table's artifact is written before any of its related tables is
//!   fetched
//! - related tables are visited in the order the API lists them, each
//!   subtree finishing before the next sibling starts
//! - every table is visited at most once per crawl, so cycles terminate
//!
//! The walk uses an explicit work stack instead of recursion. Any error
//! aborts the whole crawl; artifacts already written are left in place.

use crate::convert::{render, OutputFormat};
use crate::crawler::cancel::Cancellation;
use crate::crawler::records::validate_table_name;
use crate::crawler::traits::TableSource;
use crate::output::{Artifact, ArtifactWriter, CrawlSummary};
use crate::{CrawlError, Result};
use std::collections::HashSet;

/// Main crawler structure
///
/// Owns the visited set for the crawl in progress; each call to
/// [`Crawler::crawl`] starts from an empty set.
pub struct Crawler<S, W> {
    source: S,
    writer: W,
    format: OutputFormat,
    cancellation: Cancellation,
    visited: HashSet<String>,
}

impl<S: TableSource, W: ArtifactWriter> Crawler<S, W> {
    /// Creates a new crawler
    ///
    /// # Arguments
    ///
    /// * `source` - Where table records come from
    /// * `writer` - Where artifacts go
    /// * `format` - Serialization used for every artifact
    pub fn new(source: S, writer: W, format: OutputFormat) -> Self {
        Self {
            source,
            writer,
            format,
            cancellation: Cancellation::new(),
            visited: HashSet::new(),
        }
    }

    /// Replaces the crawler's cancellation handle
    pub fn with_cancellation(mut self, cancellation: Cancellation) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Tables visited by the most recent crawl
    pub fn visited(&self) -> &HashSet<String> {
        &self.visited
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Checks the start table against the endpoint registry, then crawls
    ///
    /// # Errors
    ///
    /// * `InputValidation` if the name is unusable or the registry does not
    ///   list it; no table data is fetched in that case
    /// * Any error from [`Crawler::crawl`]
    pub async fn run(&mut self, start_table: &str) -> Result<CrawlSummary> {
        validate_table_name(start_table)?;

        let registry = self
            .cancellation
            .guard(self.source.fetch_endpoints())
            .await?;
        registry.ensure_contains(start_table)?;

        self.crawl(start_table).await
    }

    /// Crawls every table reachable from `start_table`
    pub async fn crawl(&mut self, start_table: &str) -> Result<CrawlSummary> {
        validate_table_name(start_table)?;

        self.visited.clear();
        let mut summary = CrawlSummary::new(start_table, self.format);
        let mut stack = vec![start_table.to_string()];

        tracing::info!("Starting {} crawl from table {}", self.format, start_table);

        while let Some(table_name) = stack.pop() {
            if self.cancellation.is_cancelled() {
                tracing::warn!(
                    "Crawl cancelled after {} table(s)",
                    summary.tables_visited()
                );
                return Err(CrawlError::Cancelled);
            }

            if !self.visited.insert(table_name.clone()) {
                continue;
            }

            let related = self.visit(&table_name, &mut summary).await?;

            // Reversed so the first related table is popped first
            stack.extend(
                related
                    .into_iter()
                    .rev()
                    .filter(|name| !self.visited.contains(name)),
            );
        }

        summary.finish();
        tracing::info!(
            "Crawl completed: {} table(s) written",
            summary.tables_visited()
        );
        Ok(summary)
    }

    /// Fetches, converts and writes one table, returning its related tables
    async fn visit(
        &mut self,
        table_name: &str,
        summary: &mut CrawlSummary,
    ) -> Result<Vec<String>> {
        tracing::debug!("Fetching table {}", table_name);

        let record = self
            .cancellation
            .guard(self.source.fetch_table(table_name))
            .await?;

        let content = render(self.format, table_name, record.data)?;
        let artifact = Artifact::new(table_name, self.format, content);
        let location = self.writer.write(&artifact).await?;

        tracing::info!("Wrote {} -> {}", table_name, location.display());
        summary.record(table_name, location);

        Ok(record.related_tables)
    }
}
