use crate::create_test_config;
use oxigraph::io::{RdfFormat, RdfParser};
use oxigraph::model::vocab::rdf;
use oxigraph::model::{Literal, NamedNode, Term};
use serde_json::{json, Value};
use std::time::Duration;
use table_crawler::crawler::{crawl, ApiClient, Cancellation};
use table_crawler::{CrawlError, OutputFormat};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts the endpoint registry at `/api`
async fn mount_registry(mock_server: &MockServer, tables: &[&str]) {
    let registry: serde_json::Map<String, Value> = tables
        .iter()
        .map(|name| (name.to_string(), json!({})))
        .collect();

    Mock::given(method("GET"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Object(registry)))
        .expect(1)
        .mount(mock_server)
        .await;
}

/// Mounts `/api/{name}`, expected to be fetched exactly once
async fn mount_table(mock_server: &MockServer, name: &str, related: &[&str], data: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/{}", name)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "metadata": { "relatedTables": related },
            "data": data,
        })))
        .expect(1)
        .mount(mock_server)
        .await;
}

async fn requested_paths(mock_server: &MockServer) -> Vec<String> {
    mock_server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| request.url.path().to_string())
        .collect()
}

#[tokio::test]
async fn test_end_to_end_json_ld() {
    let mock_server = MockServer::start().await;
    let output_dir = TempDir::new().unwrap();

    mount_registry(&mock_server, &["A", "B"]).await;
    mount_table(&mock_server, "A", &["B"], json!({"rows": [1, 2]})).await;
    mount_table(&mock_server, "B", &[], json!({"rows": []})).await;

    let config = create_test_config(&mock_server, &output_dir);
    let summary = crawl(&config, "A", OutputFormat::JsonLd, Cancellation::new())
        .await
        .expect("Crawl failed");

    assert_eq!(summary.tables().collect::<Vec<_>>(), vec!["A", "B"]);
    assert_eq!(
        requested_paths(&mock_server).await,
        vec!["/api", "/api/A", "/api/B"]
    );

    let a_path = output_dir.path().join("A.json-ld");
    let b_path = output_dir.path().join("B.json-ld");
    assert_eq!(summary.artifacts[0].1, a_path);
    assert_eq!(summary.artifacts[1].1, b_path);

    let a: Value = serde_json::from_str(&std::fs::read_to_string(&a_path).unwrap()).unwrap();
    assert_eq!(
        a,
        json!({"@context": "http://schema.org", "@type": "A", "data": {"rows": [1, 2]}})
    );

    let b: Value = serde_json::from_str(&std::fs::read_to_string(&b_path).unwrap()).unwrap();
    assert_eq!(b["@type"], "B");
}

#[tokio::test]
async fn test_end_to_end_ttl() {
    let mock_server = MockServer::start().await;
    let output_dir = TempDir::new().unwrap();

    mount_registry(&mock_server, &["Widgets"]).await;
    mount_table(&mock_server, "Widgets", &[], json!({"x": 1})).await;

    let config = create_test_config(&mock_server, &output_dir);
    crawl(&config, "Widgets", OutputFormat::Ttl, Cancellation::new())
        .await
        .expect("Crawl failed");

    let ttl = std::fs::read_to_string(output_dir.path().join("Widgets.ttl")).unwrap();
    let quads = RdfParser::from_format(RdfFormat::Turtle)
        .for_reader(ttl.as_bytes())
        .collect::<Result<Vec<_>, _>>()
        .expect("artifact is not valid Turtle");

    assert_eq!(quads.len(), 2);
    assert!(quads.iter().any(|q| q.predicate.as_ref() == rdf::TYPE
        && q.object == Term::from(NamedNode::new_unchecked("http://schema.org/Widgets"))));
    assert!(quads.iter().any(|q| q.predicate.as_str() == "http://schema.org/x"
        && q.object == Term::from(Literal::from(1_i64))));
}

#[tokio::test]
async fn test_unknown_table_rejected_before_table_fetch() {
    let mock_server = MockServer::start().await;
    let output_dir = TempDir::new().unwrap();

    mount_registry(&mock_server, &["A"]).await;
    Mock::given(method("GET"))
        .and(path("/api/Z"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server, &output_dir);
    let err = crawl(&config, "Z", OutputFormat::JsonLd, Cancellation::new())
        .await
        .unwrap_err();

    assert!(matches!(err, CrawlError::InputValidation(_)), "{err}");
    assert_eq!(requested_paths(&mock_server).await, vec!["/api"]);
    assert_eq!(std::fs::read_dir(output_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_acyclic_graph_visits_each_table_once() {
    let mock_server = MockServer::start().await;
    let output_dir = TempDir::new().unwrap();

    // Diamond: A -> [B, C], B -> [D], C -> [D]
    mount_registry(&mock_server, &["A", "B", "C", "D"]).await;
    mount_table(&mock_server, "A", &["B", "C"], json!(1)).await;
    mount_table(&mock_server, "B", &["D"], json!(2)).await;
    mount_table(&mock_server, "C", &["D"], json!(3)).await;
    mount_table(&mock_server, "D", &[], json!(4)).await;

    let config = create_test_config(&mock_server, &output_dir);
    let summary = crawl(&config, "A", OutputFormat::Ttl, Cancellation::new())
        .await
        .expect("Crawl failed");

    assert_eq!(summary.tables().collect::<Vec<_>>(), vec!["A", "B", "D", "C"]);
    for name in ["A", "B", "C", "D"] {
        assert!(output_dir.path().join(format!("{}.ttl", name)).exists());
    }
}

#[tokio::test]
async fn test_cyclic_graph_terminates() {
    let mock_server = MockServer::start().await;
    let output_dir = TempDir::new().unwrap();

    // A -> [B], B -> [C, A], C -> [A]
    mount_registry(&mock_server, &["A", "B", "C"]).await;
    mount_table(&mock_server, "A", &["B"], json!({})).await;
    mount_table(&mock_server, "B", &["C", "A"], json!({})).await;
    mount_table(&mock_server, "C", &["A"], json!({})).await;

    let config = create_test_config(&mock_server, &output_dir);
    let summary = crawl(&config, "A", OutputFormat::JsonLd, Cancellation::new())
        .await
        .expect("Crawl failed");

    assert_eq!(summary.tables().collect::<Vec<_>>(), vec!["A", "B", "C"]);
    assert_eq!(std::fs::read_dir(output_dir.path()).unwrap().count(), 3);
}

#[tokio::test]
async fn test_server_error_aborts_after_earlier_artifacts() {
    let mock_server = MockServer::start().await;
    let output_dir = TempDir::new().unwrap();

    mount_registry(&mock_server, &["A", "B"]).await;
    mount_table(&mock_server, "A", &["B", "C"], json!({})).await;
    Mock::given(method("GET"))
        .and(path("/api/B"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/C"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server, &output_dir);
    let err = crawl(&config, "A", OutputFormat::JsonLd, Cancellation::new())
        .await
        .unwrap_err();

    match err {
        CrawlError::Http {
            status, message, ..
        } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Internal Server Error");
        }
        other => panic!("expected HTTP error, got {other}"),
    }
    assert!(output_dir.path().join("A.json-ld").exists());
    assert!(!output_dir.path().join("B.json-ld").exists());
}

#[tokio::test]
async fn test_malformed_table_record() {
    let mock_server = MockServer::start().await;
    let output_dir = TempDir::new().unwrap();

    mount_registry(&mock_server, &["A"]).await;
    Mock::given(method("GET"))
        .and(path("/api/A"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server, &output_dir);
    let err = crawl(&config, "A", OutputFormat::JsonLd, Cancellation::new())
        .await
        .unwrap_err();

    assert!(matches!(err, CrawlError::MalformedResponse { .. }), "{err}");
    assert!(!output_dir.path().join("A.json-ld").exists());
}

#[tokio::test]
async fn test_non_json_body() {
    let mock_server = MockServer::start().await;
    let output_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server, &output_dir);
    let client = ApiClient::new(&config).unwrap();
    let err = client.fetch_endpoints().await.unwrap_err();

    assert!(matches!(err, CrawlError::MalformedResponse { .. }), "{err}");
}

#[tokio::test]
async fn test_request_timeout_is_network_error() {
    let mock_server = MockServer::start().await;
    let output_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/api"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"A": {}}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server, &output_dir);
    config.api.request_timeout_secs = 1;

    let err = crawl(&config, "A", OutputFormat::JsonLd, Cancellation::new())
        .await
        .unwrap_err();

    match err {
        CrawlError::Network { message, .. } => assert_eq!(message, "Request timeout"),
        other => panic!("expected network error, got {other}"),
    }
}

#[tokio::test]
async fn test_cancellation_interrupts_in_flight_fetch() {
    let mock_server = MockServer::start().await;
    let output_dir = TempDir::new().unwrap();

    mount_registry(&mock_server, &["A"]).await;
    Mock::given(method("GET"))
        .and(path("/api/A"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"metadata": {"relatedTables": []}, "data": {}}))
                .set_delay(Duration::from_secs(4)),
        )
        .mount(&mock_server)
        .await;

    let cancellation = Cancellation::new();
    let trigger = cancellation.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        trigger.cancel();
    });

    let config = create_test_config(&mock_server, &output_dir);
    let started = std::time::Instant::now();
    let err = crawl(&config, "A", OutputFormat::JsonLd, cancellation)
        .await
        .unwrap_err();

    assert!(matches!(err, CrawlError::Cancelled), "{err}");
    assert!(started.elapsed() < Duration::from_secs(3));
    assert!(!output_dir.path().join("A.json-ld").exists());
}
