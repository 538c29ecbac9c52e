//! Source trait for the crawl orchestrator
//!
//! The orchestrator only needs two reads from the API: the endpoint registry
//! and individual table records. [`ApiClient`](crate::crawler::ApiClient) is
//! the HTTP implementation.

use crate::crawler::records::{EndpointRegistry, TableRecord};
use crate::Result;
use async_trait::async_trait;

/// Read access to the tables exposed by a data API
#[async_trait]
pub trait TableSource: Send + Sync {
    /// Fetches the registry of advertised tables
    async fn fetch_endpoints(&self) -> Result<EndpointRegistry>;

    /// Fetches a single table record
    ///
    /// # Arguments
    ///
    /// * `table_name` - Name of the table, as listed in the registry or in a
    ///   parent's `relatedTables`
    async fn fetch_table(&self, table_name: &str) -> Result<TableRecord>;
}
