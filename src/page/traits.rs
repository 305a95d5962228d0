//! Page layer traits
//!
//! This module defines the abstract interface between the client and the
//! caller's browser-automation engine. Adapters implement [`PageHandle`]
//! per target ecosystem; any privileged access to engine internals stays
//! behind this one seam.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Automation-engine identity used to tag outbound requests
#[derive(Debug, Clone)]
pub struct EngineInfo {
    /// Engine name (e.g., "playwright")
    pub name: String,
    /// Engine version string
    pub version: String,
}

/// Handle to one browser page owned by the caller's automation engine
///
/// Identity lookups read runtime-assigned identifiers from the engine's
/// internal object graph. Each lookup either yields the full identifier or
/// fails; partially-resolved values are never returned.
#[async_trait]
pub trait PageHandle: Send + Sync + std::fmt::Debug {
    /// Runtime identity of the page
    fn page_guid(&self) -> Result<String>;

    /// Runtime identity of the page's main frame
    fn frame_guid(&self) -> Result<String>;

    /// Runtime identity of the browser owning the page's context
    fn browser_guid(&self) -> Result<String>;

    /// Automation framework label sent with automate screenshots
    fn framework(&self) -> String;

    /// Engine identity for request tagging
    fn engine(&self) -> EngineInfo;

    /// Current URL of the page
    async fn url(&self) -> String;

    /// Evaluate a script in the page
    async fn evaluate(&self, script: &str) -> Result<Value>;

    /// Evaluate a function expression in the page with a single argument
    async fn evaluate_with_arg(&self, expression: &str, arg: Value) -> Result<Value>;
}
