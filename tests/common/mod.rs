//! Common test utilities
//!
//! Shared fixtures for driving the real HTTP transport against a scripted
//! local agent.

use std::sync::Arc;

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use percy_oxide::config::Config;
use percy_oxide::page::MockPage;
use percy_oxide::transport::HttpTransport;
use percy_oxide::{Percy, SessionCache};

/// Serialization script served as dom.js by the scripted agent
pub const DOM_JS: &str = "window.PercyDOM = { serialize: (options) => ({}) };";

/// Start an agent whose healthcheck reports the given core version header
/// and body
pub async fn agent_with_healthcheck(core_version: Option<&str>, body: Value) -> MockServer {
    let server = MockServer::start().await;

    let mut template = ResponseTemplate::new(200).set_body_json(body);
    if let Some(version) = core_version {
        template = template.insert_header("x-percy-core-version", version);
    }

    Mock::given(method("GET"))
        .and(path("/percy/healthcheck"))
        .respond_with(template)
        .mount(&server)
        .await;

    server
}

/// Start a healthy web-session agent serving dom.js and accepting snapshots
pub async fn healthy_web_agent() -> MockServer {
    let server = agent_with_healthcheck(Some("1.30.0"), json!({ "type": "web" })).await;

    Mock::given(method("GET"))
        .and(path("/percy/dom.js"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DOM_JS))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/percy/snapshot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "success": true } })))
        .mount(&server)
        .await;

    server
}

/// Start a healthy automate-session agent accepting screenshot descriptors
pub async fn healthy_automate_agent() -> MockServer {
    let server = agent_with_healthcheck(Some("1.30.0"), json!({ "type": "automate" })).await;

    Mock::given(method("POST"))
        .and(path("/percy/automateScreenshot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "success": true } })))
        .mount(&server)
        .await;

    server
}

/// Build a client against a scripted agent, with an isolated session cache
pub async fn percy_for(server: &MockServer, page: Arc<MockPage>) -> Percy {
    let config = Config {
        server_address: server.uri(),
        ..Config::default()
    };
    let transport = Arc::new(HttpTransport::new(&config));
    Percy::with_transport(page, transport, config, Arc::new(SessionCache::new())).await
}

/// Bodies of requests received for a path, in arrival order
pub async fn request_bodies(server: &MockServer, request_path: &str) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == request_path)
        .map(|request| request.body_json().expect("request body is JSON"))
        .collect()
}
