//! Capture options forwarded to the agent
//!
//! Every set field is serialized into the snapshot envelope verbatim; the
//! agent interprets them. Unknown or newer options go through `extra`.

use serde::Serialize;
use serde_json::{Map, Value};

/// Options for a DOM snapshot capture
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotOptions {
    /// Browser widths to render at, in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub widths: Option<Vec<u32>>,

    /// Minimum height of the resulting snapshot, in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_height: Option<u32>,

    /// Enable JavaScript in the rendering environment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_java_script: Option<bool>,

    /// CSS applied only in the rendering environment
    #[serde(rename = "percyCSS", skip_serializing_if = "Option::is_none")]
    pub percy_css: Option<String>,

    /// CSS selector scoping the capture
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// Wait for snapshot processing and return its details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync: Option<bool>,

    /// JavaScript source transforming the DOM before serialization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dom_transformation: Option<String>,

    /// Additional options passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SnapshotOptions {
    /// Serialize into the flat JSON object sent to the page and the agent
    pub fn to_object(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}
