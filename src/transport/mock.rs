//! Mock agent transport for testing
//!
//! GET responses are scripted per path; unscripted paths behave like a
//! refused connection. Every call is recorded for assertions.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::transport::traits::{AgentResponse, AgentTransport};

/// Mock agent transport
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<HashMap<String, AgentResponse>>,
    post_data: Mutex<Option<Value>>,
    gets: Mutex<Vec<String>>,
    posts: Mutex<Vec<(String, Value)>>,
}

impl MockTransport {
    /// Create a transport with no scripted responses
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a GET response for a path
    pub fn with_response(self, path: &str, response: AgentResponse) -> Self {
        self.responses
            .lock()
            .expect("mock lock poisoned")
            .insert(path.to_string(), response);
        self
    }

    /// Script a healthcheck reply with the given version header and body
    pub fn with_healthcheck(self, core_version: Option<&str>, body: Value) -> Self {
        self.with_response(
            "/percy/healthcheck",
            AgentResponse {
                status: 200,
                core_version: core_version.map(str::to_owned),
                body: body.to_string(),
            },
        )
    }

    /// Script an enabled web-session agent with a DOM script available
    pub fn healthy_web_agent() -> Self {
        Self::new()
            .with_healthcheck(Some("1.30.0"), json!({ "type": "web" }))
            .with_response(
                "/percy/dom.js",
                AgentResponse {
                    status: 200,
                    core_version: None,
                    body: "window.PercyDOM = { serialize: () => ({}) };".to_string(),
                },
            )
    }

    /// Script an enabled automate-session agent
    pub fn healthy_automate_agent() -> Self {
        Self::new().with_healthcheck(Some("1.30.0"), json!({ "type": "automate" }))
    }

    /// Set the `data` value returned by every POST
    pub fn set_post_data(&self, data: Value) {
        *self.post_data.lock().expect("mock lock poisoned") = Some(data);
    }

    /// Paths requested via GET so far
    pub fn gets(&self) -> Vec<String> {
        self.gets.lock().expect("mock lock poisoned").clone()
    }

    /// Recorded POSTs (path, body) so far
    pub fn posts(&self) -> Vec<(String, Value)> {
        self.posts.lock().expect("mock lock poisoned").clone()
    }

    /// Number of POSTs issued so far
    pub fn post_count(&self) -> usize {
        self.posts.lock().expect("mock lock poisoned").len()
    }
}

#[async_trait]
impl AgentTransport for MockTransport {
    async fn get(&self, path: &str) -> Result<AgentResponse> {
        self.gets
            .lock()
            .expect("mock lock poisoned")
            .push(path.to_string());

        self.responses
            .lock()
            .expect("mock lock poisoned")
            .get(path)
            .cloned()
            .ok_or_else(|| Error::agent(format!("connection refused: {path}")))
    }

    async fn post(&self, path: &str, body: &Value) -> Option<Value> {
        self.posts
            .lock()
            .expect("mock lock poisoned")
            .push((path.to_string(), body.clone()));

        self.post_data.lock().expect("mock lock poisoned").clone()
    }
}
