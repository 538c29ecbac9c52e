//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests against the data API:
//! - Building the HTTP client with user agent and timeouts
//! - Resolving table and endpoint paths under the API base URL
//! - GET requests returning parsed JSON bodies
//! - Error classification (HTTP status, transport, malformed body)
//!
//! There is no retry logic: one call is one request.

use crate::config::{ApiConfig, Config, UserAgentConfig};
use crate::crawler::records::{EndpointRegistry, TableRecord};
use crate::crawler::traits::TableSource;
use crate::{ConfigError, CrawlError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `api` - Timeouts applied to every request
/// * `user_agent` - Identification sent with every request
pub fn build_http_client(
    api: &ApiConfig,
    user_agent: &UserAgentConfig,
) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(api.request_timeout_secs))
        .connect_timeout(Duration::from_secs(api.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Client for the table API rooted at a base URL
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Creates a client from the `[api]` and `[user-agent]` config sections
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = Url::parse(&config.api.base_url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid base-url '{}': {}", config.api.base_url, e))
        })?;

        let client = build_http_client(&config.api, &config.user_agent).map_err(|e| {
            ConfigError::Validation(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Self { client, base_url })
    }

    /// Resolves `{base}/{path}`
    ///
    /// The path is appended to the base URL rather than joined as a relative
    /// reference, so a base of `http://host/api` yields `http://host/api/path`.
    pub fn endpoint_url(&self, path: &str) -> Result<Url> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| {
            CrawlError::InputValidation(format!("Cannot build URL for {:?}: {}", path, e))
        })
    }

    /// Fetches a URL and parses the body as JSON
    ///
    /// # Errors
    ///
    /// | Condition | Error |
    /// |-----------|-------|
    /// | Non-2xx status | `Http` with status and reason phrase |
    /// | DNS, connect, timeout, body read failure | `Network` |
    /// | Body is not JSON | `MalformedResponse` |
    pub async fn fetch_json(&self, url: &str) -> Result<Value> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await
            .map_err(|e| network_error(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::Http {
                url: url.to_string(),
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown status").to_string(),
            });
        }

        let body = response.text().await.map_err(|e| network_error(url, &e))?;

        serde_json::from_str(&body)
            .map_err(|e| CrawlError::malformed(url, format!("body is not valid JSON: {}", e)))
    }

    /// Fetches the endpoint registry from the API root
    pub async fn fetch_endpoints(&self) -> Result<EndpointRegistry> {
        let url = self.base_url.as_str();
        let value = self.fetch_json(url).await?;
        let registry = EndpointRegistry::from_value(url, value)?;
        tracing::debug!("API advertises {} table(s)", registry.len());
        Ok(registry)
    }

    /// Fetches `{base}/{table_name}` as a table record
    pub async fn fetch_table(&self, table_name: &str) -> Result<TableRecord> {
        let url = self.endpoint_url(table_name)?;
        let value = self.fetch_json(url.as_str()).await?;
        TableRecord::from_value(url.as_str(), value)
    }
}

#[async_trait]
impl TableSource for ApiClient {
    async fn fetch_endpoints(&self) -> Result<EndpointRegistry> {
        ApiClient::fetch_endpoints(self).await
    }

    async fn fetch_table(&self, table_name: &str) -> Result<TableRecord> {
        ApiClient::fetch_table(self, table_name).await
    }
}

/// Classifies a transport-level failure
fn network_error(url: &str, error: &reqwest::Error) -> CrawlError {
    let message = if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        format!("Connection failed: {}", error)
    } else {
        error.to_string()
    };

    CrawlError::Network {
        url: url.to_string(),
        message,
    }
}
