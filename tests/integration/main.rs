//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock table APIs and check the full
//! fetch → convert → write cycle end-to-end against a temporary output
//! directory.

mod crawl_tests;

use table_crawler::config::Config;
use tempfile::TempDir;
use wiremock::MockServer;

/// Creates a configuration pointing at `{mock_server}/api` that writes into `output_dir`
pub fn create_test_config(mock_server: &MockServer, output_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.api.base_url = format!("{}/api", mock_server.uri());
    config.api.request_timeout_secs = 5;
    config.api.connect_timeout_secs = 2;
    config.output.directory = output_dir.path().to_string_lossy().into_owned();
    config
}
