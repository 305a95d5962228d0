//! Transport layer traits
//!
//! This module defines the abstract interface for talking to the local
//! Percy agent over HTTP.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Response header carrying the agent's core version
pub const CORE_VERSION_HEADER: &str = "x-percy-core-version";

/// Result of a GET against the agent
#[derive(Debug, Clone)]
pub struct AgentResponse {
    /// HTTP status code
    pub status: u16,
    /// Value of the `x-percy-core-version` header, if present
    pub core_version: Option<String>,
    /// Raw response body
    pub body: String,
}

/// Transport toward the local Percy agent
#[async_trait]
pub trait AgentTransport: Send + Sync + std::fmt::Debug {
    /// Issue a GET against the agent; failures propagate to the caller
    async fn get(&self, path: &str) -> Result<AgentResponse>;

    /// POST a JSON body to the agent
    ///
    /// Returns the `data` field of the JSON envelope. Transport failures,
    /// non-2xx replies, and malformed bodies are logged and collapse to
    /// `None`; this call never errors out of the boundary.
    async fn post(&self, path: &str, body: &Value) -> Option<Value>;
}
