//! Page metadata resolver
//!
//! Extracts the runtime identifiers an automate screenshot must carry.
//! Guids are memoized per resolver; remote session details are cached
//! process-wide per browser guid, since every page of a browser session
//! shares them. A failed resolution never populates a cache, so later
//! calls retry.

use serde_json::{Map, Value};
use std::sync::{Arc, OnceLock};
use tracing::warn;

use crate::error::{Error, Result};
use crate::page::PageHandle;
use crate::session::cache::SessionCache;

/// No-op function evaluated with the vendor command as its argument
const SESSION_DETAILS_EXPRESSION: &str = "_ => {}";

/// Vendor command requesting session details from the automation backend
const SESSION_DETAILS_COMMAND: &str =
    r#"browserstack_executor: {"action": "getSessionDetails"}"#;

/// Resolver for the runtime identity of one page
#[derive(Debug)]
pub struct PageMetadata {
    page: Arc<dyn PageHandle>,
    cache: Arc<SessionCache>,
    page_guid: OnceLock<String>,
    frame_guid: OnceLock<String>,
    browser_guid: OnceLock<String>,
}

impl PageMetadata {
    /// Create a resolver for a page, backed by the given session cache
    pub fn new(page: Arc<dyn PageHandle>, cache: Arc<SessionCache>) -> Self {
        Self {
            page,
            cache,
            page_guid: OnceLock::new(),
            frame_guid: OnceLock::new(),
            browser_guid: OnceLock::new(),
        }
    }

    /// Automation framework label
    pub fn framework(&self) -> String {
        self.page.framework()
    }

    /// Runtime identity of the page, resolved at most once
    pub fn page_guid(&self) -> Result<String> {
        if let Some(guid) = self.page_guid.get() {
            return Ok(guid.clone());
        }

        let guid = self.page.page_guid().map_err(|err| {
            warn!("Failed to fetch page guid, error: {err}");
            Error::metadata_unavailable("Failed to fetch page guid")
        })?;
        let _ = self.page_guid.set(guid.clone());
        Ok(guid)
    }

    /// Runtime identity of the page's main frame, resolved at most once
    pub fn frame_guid(&self) -> Result<String> {
        if let Some(guid) = self.frame_guid.get() {
            return Ok(guid.clone());
        }

        let guid = self.page.frame_guid().map_err(|err| {
            warn!("Failed to fetch frame guid, error: {err}");
            Error::metadata_unavailable("Failed to fetch frame guid")
        })?;
        let _ = self.frame_guid.set(guid.clone());
        Ok(guid)
    }

    /// Runtime identity of the owning browser, resolved at most once
    pub fn browser_guid(&self) -> Result<String> {
        if let Some(guid) = self.browser_guid.get() {
            return Ok(guid.clone());
        }

        let guid = self.page.browser_guid().map_err(|err| {
            warn!("Failed to fetch browser guid, error: {err}");
            Error::metadata_unavailable("Failed to fetch browser guid")
        })?;
        let _ = self.browser_guid.set(guid.clone());
        Ok(guid)
    }

    /// Remote session details, fetched once per distinct browser guid
    pub async fn session_details(&self) -> Result<Map<String, Value>> {
        let browser_guid = self.browser_guid()?;
        let key = format!("sessionDetails_{browser_guid}");

        if let Some(Value::Object(details)) = self.cache.get(&key) {
            return Ok(details);
        }

        let details = self.fetch_session_details().await.map_err(|err| {
            warn!("Failed to fetch session details, error: {err}");
            Error::metadata_unavailable("Failed to fetch session details")
        })?;
        self.cache.insert(key, Value::Object(details.clone()));
        Ok(details)
    }

    async fn fetch_session_details(&self) -> Result<Map<String, Value>> {
        let response = self
            .page
            .evaluate_with_arg(
                SESSION_DETAILS_EXPRESSION,
                Value::String(SESSION_DETAILS_COMMAND.to_string()),
            )
            .await?;

        let raw = response
            .as_str()
            .ok_or_else(|| Error::agent("session details response is not a string"))?;
        Ok(serde_json::from_str(raw)?)
    }

    /// Remote session id, read from the `hashed_id` session detail
    pub async fn session_id(&self) -> Result<String> {
        let details = self.session_details().await?;

        match details.get("hashed_id") {
            Some(Value::String(id)) => Ok(id.clone()),
            Some(other) => Ok(other.to_string()),
            None => {
                warn!("Failed to fetch session id, hashed_id missing from session details");
                Err(Error::metadata_unavailable("Failed to fetch session id"))
            }
        }
    }
}
