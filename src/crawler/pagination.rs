//! Pagination walker
//!
//! Follows `nextPage` cursors from a starting endpoint, collecting the
//! `items` of every page in order. Pages are fetched one at a time.

use crate::convert::{render, OutputFormat};
use crate::crawler::fetcher::ApiClient;
use crate::crawler::records::{validate_table_name, Page};
use crate::output::{Artifact, ArtifactWriter};
use crate::{CrawlError, Result};
use serde_json::Value;
use std::collections::HashSet;
use std::path::PathBuf;

/// Fetches every page of a paginated endpoint
///
/// The walk starts at `{base}/{endpoint}` and ends at the first page whose
/// `nextPage` is absent, `null` or empty. A relative `nextPage` is resolved
/// against the page that returned it.
///
/// # Errors
///
/// * Any fetch error from [`ApiClient::fetch_json`]
/// * `MalformedResponse` if a page lacks an `items` array, carries an
///   unparsable `nextPage`, or points back at a page already fetched
pub async fn fetch_all_pages(client: &ApiClient, endpoint: &str) -> Result<Vec<Value>> {
    let mut results = Vec::new();
    let mut fetched = HashSet::new();
    let mut cursor = Some(client.endpoint_url(endpoint)?);

    while let Some(url) = cursor.take() {
        if !fetched.insert(url.clone()) {
            return Err(CrawlError::malformed(
                url.as_str(),
                "nextPage points back at a page that was already fetched",
            ));
        }

        let value = client.fetch_json(url.as_str()).await?;
        let page = Page::from_value(url.as_str(), value)?;

        cursor = match page.next_cursor() {
            Some(next) => Some(url.join(next).map_err(|e| {
                CrawlError::malformed(url.as_str(), format!("invalid nextPage {:?}: {}", next, e))
            })?),
            None => None,
        };

        tracing::debug!(
            "Page {} from {}: {} item(s)",
            fetched.len(),
            url,
            page.items.len()
        );
        results.extend(page.items);
    }

    tracing::info!(
        "Collected {} item(s) from {} page(s) of {}",
        results.len(),
        fetched.len(),
        endpoint
    );
    Ok(results)
}

/// Collects a paginated endpoint and writes it as a single artifact
///
/// The artifact is named after the last path segment of `endpoint` and its
/// payload is the array of collected items.
pub async fn export_all_pages<W: ArtifactWriter>(
    client: &ApiClient,
    writer: &mut W,
    format: OutputFormat,
    endpoint: &str,
) -> Result<PathBuf> {
    let name = artifact_name(endpoint);
    validate_table_name(name)?;

    let items = fetch_all_pages(client, endpoint).await?;
    let content = render(format, name, Value::Array(items))?;
    let path = writer.write(&Artifact::new(name, format, content)).await?;

    tracing::info!("Wrote {}", path.display());
    Ok(path)
}

/// `v1/orders?status=open` -> `orders`
fn artifact_name(endpoint: &str) -> &str {
    let path = endpoint.split(['?', '#']).next().unwrap_or_default();
    path.trim_matches('/').rsplit('/').next().unwrap_or_default()
}
