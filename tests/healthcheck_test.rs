//! Capability negotiation over a real HTTP server
//!
//! Exercises the one-shot healthcheck against scripted agent replies,
//! including the legacy-agent and unsupported-version paths.

mod common;

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{agent_with_healthcheck, percy_for};
use percy_oxide::page::MockPage;
use percy_oxide::SessionType;

#[tokio::test]
async fn supported_agent_enables_the_client() {
    let server = agent_with_healthcheck(Some("1.3.0"), json!({})).await;
    let percy = percy_for(&server, Arc::new(MockPage::new())).await;

    assert!(percy.enabled());
    assert_eq!(percy.session_type(), SessionType::Unknown);
}

#[tokio::test]
async fn session_type_comes_from_the_healthcheck_body() {
    let server = agent_with_healthcheck(Some("1.30.0"), json!({ "type": "web" })).await;
    let percy = percy_for(&server, Arc::new(MockPage::new())).await;

    assert!(percy.enabled());
    assert_eq!(percy.session_type(), SessionType::Web);
}

#[tokio::test]
async fn missing_version_header_disables_the_client() {
    let server = agent_with_healthcheck(None, json!({})).await;
    let percy = percy_for(&server, Arc::new(MockPage::new())).await;

    assert!(!percy.enabled());
}

#[tokio::test]
async fn newer_major_version_disables_the_client() {
    let server = agent_with_healthcheck(Some("2.0.0"), json!({})).await;
    let percy = percy_for(&server, Arc::new(MockPage::new())).await;

    assert!(!percy.enabled());
}

#[tokio::test]
async fn failing_healthcheck_disables_the_client() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/percy/healthcheck"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let percy = percy_for(&server, Arc::new(MockPage::new())).await;
    assert!(!percy.enabled());
}

#[tokio::test]
async fn unreachable_agent_disables_the_client() {
    // Bind a server just to grab an address nothing listens on afterwards
    let server = MockServer::start().await;
    let address = server.uri();
    drop(server);

    let config = percy_oxide::config::Config {
        server_address: address,
        ..Default::default()
    };
    let transport = Arc::new(percy_oxide::transport::HttpTransport::new(&config));
    let percy = percy_oxide::Percy::with_transport(
        Arc::new(MockPage::new()),
        transport,
        config,
        Arc::new(percy_oxide::SessionCache::new()),
    )
    .await;

    assert!(!percy.enabled());
}

#[tokio::test]
async fn disabled_client_sends_no_capture_traffic() {
    let server = agent_with_healthcheck(Some("2.0.0"), json!({})).await;
    let percy = percy_for(&server, Arc::new(MockPage::new())).await;

    assert_eq!(percy.snapshot("Test").await.unwrap(), None);
    assert_eq!(percy.screenshot("Test").await.unwrap(), None);

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), "/percy/healthcheck");
}
