//! Mock page implementation for testing
//!
//! Records every evaluation and answers from scripted state, so tests can
//! assert how the client drives the page without a real browser.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::page::traits::{EngineInfo, PageHandle};

/// Mock page handle
#[derive(Debug)]
pub struct MockPage {
    page_guid: String,
    frame_guid: String,
    browser_guid: String,
    url: String,
    /// JSON string returned by the vendor `getSessionDetails` command
    session_details: String,
    /// Value returned when the serialization call runs
    dom_snapshot: Value,
    fail_identity: AtomicBool,
    fail_evaluation: AtomicBool,
    evaluations: Mutex<Vec<String>>,
    arg_evaluations: Mutex<Vec<(String, Value)>>,
}

impl MockPage {
    /// Create a new mock page with generated identifiers
    pub fn new() -> Self {
        Self {
            page_guid: format!("page@{}", uuid::Uuid::new_v4()),
            frame_guid: format!("frame@{}", uuid::Uuid::new_v4()),
            browser_guid: format!("browser@{}", uuid::Uuid::new_v4()),
            url: "http://localhost:8000/".to_string(),
            session_details: json!({ "hashed_id": "abc123" }).to_string(),
            dom_snapshot: json!({ "html": "<html><body>Mock DOM</body></html>" }),
            fail_identity: AtomicBool::new(false),
            fail_evaluation: AtomicBool::new(false),
            evaluations: Mutex::new(Vec::new()),
            arg_evaluations: Mutex::new(Vec::new()),
        }
    }

    /// Override the page guid
    pub fn with_page_guid<S: Into<String>>(mut self, guid: S) -> Self {
        self.page_guid = guid.into();
        self
    }

    /// Override the frame guid
    pub fn with_frame_guid<S: Into<String>>(mut self, guid: S) -> Self {
        self.frame_guid = guid.into();
        self
    }

    /// Override the browser guid
    pub fn with_browser_guid<S: Into<String>>(mut self, guid: S) -> Self {
        self.browser_guid = guid.into();
        self
    }

    /// Override the page URL
    pub fn with_url<S: Into<String>>(mut self, url: S) -> Self {
        self.url = url.into();
        self
    }

    /// Override the raw session-details string the vendor command returns
    pub fn with_session_details<S: Into<String>>(mut self, details: S) -> Self {
        self.session_details = details.into();
        self
    }

    /// Override the serialized DOM the page hands back
    pub fn with_dom_snapshot(mut self, snapshot: Value) -> Self {
        self.dom_snapshot = snapshot;
        self
    }

    /// Make identity lookups fail until cleared
    pub fn set_fail_identity(&self, fail: bool) {
        self.fail_identity.store(fail, Ordering::Relaxed);
    }

    /// Make script evaluations fail until cleared
    pub fn set_fail_evaluation(&self, fail: bool) {
        self.fail_evaluation.store(fail, Ordering::Relaxed);
    }

    /// Scripts evaluated so far
    pub fn evaluations(&self) -> Vec<String> {
        self.evaluations.lock().expect("mock lock poisoned").clone()
    }

    /// Number of argument-carrying evaluations (vendor commands) so far
    pub fn arg_evaluation_count(&self) -> usize {
        self.arg_evaluations.lock().expect("mock lock poisoned").len()
    }
}

impl Default for MockPage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageHandle for MockPage {
    fn page_guid(&self) -> Result<String> {
        if self.fail_identity.load(Ordering::Relaxed) {
            return Err(Error::agent("mock identity lookup failed"));
        }
        Ok(self.page_guid.clone())
    }

    fn frame_guid(&self) -> Result<String> {
        if self.fail_identity.load(Ordering::Relaxed) {
            return Err(Error::agent("mock identity lookup failed"));
        }
        Ok(self.frame_guid.clone())
    }

    fn browser_guid(&self) -> Result<String> {
        if self.fail_identity.load(Ordering::Relaxed) {
            return Err(Error::agent("mock identity lookup failed"));
        }
        Ok(self.browser_guid.clone())
    }

    fn framework(&self) -> String {
        "playwright".to_string()
    }

    fn engine(&self) -> EngineInfo {
        EngineInfo {
            name: "playwright".to_string(),
            version: "1.49.0".to_string(),
        }
    }

    async fn url(&self) -> String {
        self.url.clone()
    }

    async fn evaluate(&self, script: &str) -> Result<Value> {
        self.evaluations
            .lock()
            .expect("mock lock poisoned")
            .push(script.to_string());

        if self.fail_evaluation.load(Ordering::Relaxed) {
            return Err(Error::script_evaluation("mock evaluation failed"));
        }

        if script.contains("PercyDOM.serialize") {
            Ok(self.dom_snapshot.clone())
        } else {
            Ok(Value::Null)
        }
    }

    async fn evaluate_with_arg(&self, expression: &str, arg: Value) -> Result<Value> {
        self.arg_evaluations
            .lock()
            .expect("mock lock poisoned")
            .push((expression.to_string(), arg));

        if self.fail_evaluation.load(Ordering::Relaxed) {
            return Err(Error::script_evaluation("mock evaluation failed"));
        }

        Ok(Value::String(self.session_details.clone()))
    }
}
