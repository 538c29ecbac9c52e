//! Crawler module for table fetching and traversal
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching of the registry, table records and pages
//! - The pagination walker
//! - Depth-first traversal of the `relatedTables` graph
//! - Cooperative cancellation

mod cancel;
mod coordinator;
mod fetcher;
mod pagination;
pub mod records;
mod traits;

pub use cancel::Cancellation;
pub use coordinator::Crawler;
pub use fetcher::{build_http_client, ApiClient};
pub use pagination::{export_all_pages, fetch_all_pages};
pub use records::{validate_table_name, EndpointRegistry, Page, TableRecord};
pub use traits::TableSource;

use crate::config::Config;
use crate::convert::OutputFormat;
use crate::output::{CrawlSummary, FileArtifactWriter};
use crate::Result;

/// Runs a complete crawl against the configured API
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client from the configuration
/// 2. Check the start table against the endpoint registry
/// 3. Walk every reachable table, writing one artifact each into the
///    configured output directory
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `start_table` - Table to start from
/// * `format` - Serialization for the artifacts
/// * `cancellation` - Handle that aborts the crawl when cancelled
///
/// # Example
///
/// ```no_run
/// use table_crawler::config::Config;
/// use table_crawler::crawler::{crawl, Cancellation};
/// use table_crawler::OutputFormat;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let summary = crawl(&Config::default(), "Widgets", OutputFormat::JsonLd, Cancellation::new()).await?;
/// println!("{} tables written", summary.tables_visited());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(
    config: &Config,
    start_table: &str,
    format: OutputFormat,
    cancellation: Cancellation,
) -> Result<CrawlSummary> {
    let client = ApiClient::new(config)?;
    let writer = FileArtifactWriter::new(&config.output.directory);

    let mut crawler = Crawler::new(client, writer, format).with_cancellation(cancellation);
    crawler.run(start_table).await
}
