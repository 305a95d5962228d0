//! Percy client
//!
//! One client wraps one page of the caller's automation engine. At
//! construction the client probes the local agent once; the outcome gates
//! every later capture. Web sessions upload serialized DOM snapshots,
//! automate sessions upload session/frame descriptors, and the two modes
//! are mutually exclusive for the life of the client.

use serde_json::{Map, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::environment;
use crate::error::{Error, Result};
use crate::options::SnapshotOptions;
use crate::page::PageHandle;
use crate::region::{Region, RegionParams};
use crate::session::{PageMetadata, SessionCache};
use crate::transport::{AgentTransport, HttpTransport};

const HEALTHCHECK_PATH: &str = "/percy/healthcheck";
const DOM_SCRIPT_PATH: &str = "/percy/dom.js";
const SNAPSHOT_PATH: &str = "/percy/snapshot";
const AUTOMATE_SCREENSHOT_PATH: &str = "/percy/automateScreenshot";

const SNAPSHOT_IN_AUTOMATE_MESSAGE: &str = "Invalid function call - snapshot(). Please use screenshot() function while using Percy with Automate. For more information on usage of PercyScreenshot, refer https://www.browserstack.com/docs/percy/integrate/functional-and-visual";

const SCREENSHOT_IN_WEB_MESSAGE: &str = "Invalid function call - screenshot(). Please use snapshot() function for taking screenshot. screenshot() should be used only while using Percy with Automate. For more information on usage of snapshot(), refer doc for your language https://www.browserstack.com/docs/percy/integrate/overview";

/// Capture mode negotiated with the agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionType {
    /// Agent did not report a session type; both capture modes are allowed
    #[default]
    Unknown,
    /// DOM-snapshot session
    Web,
    /// Session/frame-identifier session
    Automate,
}

impl SessionType {
    fn from_response(value: Option<&str>) -> Self {
        match value {
            Some("web") => SessionType::Web,
            Some("automate") => SessionType::Automate,
            _ => SessionType::Unknown,
        }
    }
}

/// Percy client for visual testing
#[derive(Debug)]
pub struct Percy {
    page: Arc<dyn PageHandle>,
    transport: Arc<dyn AgentTransport>,
    config: Config,
    enabled: AtomicBool,
    session_type: SessionType,
    /// DOM serialization script, fetched once; empty means not yet fetched
    dom_script: Mutex<String>,
    metadata: PageMetadata,
}

impl Percy {
    /// Create a client for a page, probing the agent configured by the
    /// environment
    pub async fn new(page: Arc<dyn PageHandle>) -> Self {
        let config = Config::from_env();
        let transport = Arc::new(HttpTransport::new(&config));
        Self::with_transport(page, transport, config, SessionCache::shared()).await
    }

    /// Create a client over an explicit transport, configuration, and
    /// session cache
    ///
    /// Runs the one-shot capability negotiation before returning. Probe
    /// failures never surface as errors; they disable the client.
    pub async fn with_transport(
        page: Arc<dyn PageHandle>,
        transport: Arc<dyn AgentTransport>,
        config: Config,
        cache: Arc<SessionCache>,
    ) -> Self {
        let (enabled, session_type) = healthcheck(transport.as_ref(), config.debug).await;

        Self {
            metadata: PageMetadata::new(page.clone(), cache),
            page,
            transport,
            config,
            enabled: AtomicBool::new(enabled),
            session_type,
            dom_script: Mutex::new(String::new()),
        }
    }

    /// Whether captures are enabled for this client
    pub fn enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Session type reported by the agent at construction
    pub fn session_type(&self) -> SessionType {
        self.session_type
    }

    /// Build a comparison region for snapshot options
    pub fn create_region(&self, params: &RegionParams) -> Region {
        Region::build(params)
    }

    /// Capture a DOM snapshot and upload it to the agent
    ///
    /// `name` should be unique within the build. Returns the agent's
    /// response data, or `None` when the client is disabled or the upload
    /// failed.
    pub async fn snapshot(&self, name: &str) -> Result<Option<Value>> {
        self.snapshot_with(name, &SnapshotOptions::default()).await
    }

    /// Capture a DOM snapshot with options
    pub async fn snapshot_with(
        &self,
        name: &str,
        options: &SnapshotOptions,
    ) -> Result<Option<Value>> {
        if !self.enabled() {
            return Ok(None);
        }
        match self.session_type {
            SessionType::Automate => {
                return Err(Error::wrong_capture_mode(SNAPSHOT_IN_AUTOMATE_MESSAGE));
            }
            SessionType::Web | SessionType::Unknown => {}
        }

        let options = options.to_object();
        let dom_snapshot = self.capture_dom_snapshot(&options).await;
        self.post_snapshot(name, dom_snapshot, options).await
    }

    /// Upload a screenshot descriptor for the current automate session
    ///
    /// Session metadata resolution failures propagate to the caller; this
    /// path never degrades to a partial descriptor.
    pub async fn screenshot(&self, name: &str) -> Result<Option<Value>> {
        self.screenshot_with(name, Map::new()).await
    }

    /// Upload a screenshot descriptor with options
    pub async fn screenshot_with(
        &self,
        name: &str,
        options: Map<String, Value>,
    ) -> Result<Option<Value>> {
        if !self.enabled() {
            return Ok(None);
        }
        match self.session_type {
            SessionType::Web => {
                return Err(Error::wrong_capture_mode(SCREENSHOT_IN_WEB_MESSAGE));
            }
            SessionType::Automate | SessionType::Unknown => {}
        }

        let session_id = self.metadata.session_id().await?;
        let page_guid = self.metadata.page_guid()?;
        let frame_guid = self.metadata.frame_guid()?;

        let mut body = Map::new();
        body.insert("sessionId".to_string(), Value::String(session_id));
        body.insert("pageGuid".to_string(), Value::String(page_guid));
        body.insert("frameGuid".to_string(), Value::String(frame_guid));
        body.insert(
            "framework".to_string(),
            Value::String(self.metadata.framework()),
        );
        body.insert("snapshotName".to_string(), Value::String(name.to_string()));
        body.insert("options".to_string(), Value::Object(options));
        body.insert(
            "clientInfo".to_string(),
            Value::String(environment::client_info()),
        );
        body.insert(
            "environmentInfo".to_string(),
            Value::String(environment::environment_info(&self.page.engine())),
        );

        Ok(self
            .transport
            .post(AUTOMATE_SCREENSHOT_PATH, &Value::Object(body))
            .await)
    }

    /// Serialize the page DOM, degrading to `None` on any evaluation error
    async fn capture_dom_snapshot(&self, options: &Map<String, Value>) -> Option<Value> {
        let dom_script = self.dom_script().await;

        let result = async {
            self.page.evaluate(&dom_script).await?;
            self.page.evaluate(&serialize_script(options)).await
        }
        .await;

        match result {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                if self.config.debug {
                    debug!("{err}");
                }
                None
            }
        }
    }

    /// POST the snapshot envelope, merging the options in verbatim
    async fn post_snapshot(
        &self,
        name: &str,
        dom_snapshot: Option<Value>,
        options: Map<String, Value>,
    ) -> Result<Option<Value>> {
        // The dom.js fetch may have disabled the client mid-call
        if !self.enabled() {
            return Ok(None);
        }

        let mut body = options;
        body.insert("url".to_string(), Value::String(self.page.url().await));
        body.insert("name".to_string(), Value::String(name.to_string()));
        body.insert(
            "domSnapshot".to_string(),
            dom_snapshot.unwrap_or(Value::Null),
        );
        body.insert(
            "clientInfo".to_string(),
            Value::String(environment::client_info()),
        );
        body.insert(
            "environmentInfo".to_string(),
            Value::String(environment::environment_info(&self.page.engine())),
        );

        Ok(self
            .transport
            .post(SNAPSHOT_PATH, &Value::Object(body))
            .await)
    }

    /// Fetch the DOM serialization script from the agent, memoizing it
    ///
    /// Without this script snapshots cannot be captured, so any failure
    /// here disables the whole client rather than just the current call.
    async fn dom_script(&self) -> String {
        let mut cached = self.dom_script.lock().await;
        if !cached.trim().is_empty() {
            return cached.clone();
        }

        let fetched = self
            .transport
            .get(DOM_SCRIPT_PATH)
            .await
            .and_then(|response| {
                if response.status == 200 {
                    Ok(response.body)
                } else {
                    Err(Error::agent(format!(
                        "dom.js fetch failed with status {}",
                        response.status
                    )))
                }
            });

        match fetched {
            Ok(script) => {
                *cached = script.clone();
                script
            }
            Err(err) => {
                self.enabled.store(false, Ordering::Relaxed);
                if self.config.debug {
                    debug!("{err}");
                }
                String::new()
            }
        }
    }
}

/// In-page expression invoking the agent-established serializer
fn serialize_script(options: &Map<String, Value>) -> String {
    format!(
        "PercyDOM.serialize({})\n",
        Value::Object(options.clone())
    )
}

/// One-shot agent probe deciding whether captures run at all and in which
/// mode
async fn healthcheck(transport: &dyn AgentTransport, debug: bool) -> (bool, SessionType) {
    let response = match transport.get(HEALTHCHECK_PATH).await {
        Ok(response) if response.status == 200 => response,
        Ok(response) => {
            info!("Percy is not running, disabling snapshots");
            if debug {
                debug!("healthcheck failed with status {}", response.status);
            }
            return (false, SessionType::Unknown);
        }
        Err(err) => {
            info!("Percy is not running, disabling snapshots");
            if debug {
                debug!("{err}");
            }
            return (false, SessionType::Unknown);
        }
    };

    let Some(version) = response.core_version else {
        warn!(
            "You may be using @percy/agent which is no longer supported by this SDK. \
             Please uninstall @percy/agent and install @percy/cli instead. \
             https://www.browserstack.com/docs/percy/migration/migrate-to-cli"
        );
        return (false, SessionType::Unknown);
    };

    if version.split('.').next() != Some("1") {
        warn!("Unsupported Percy CLI version, {version}");
        return (false, SessionType::Unknown);
    }

    let body: Value = match serde_json::from_str(&response.body) {
        Ok(body) => body,
        Err(err) => {
            info!("Percy is not running, disabling snapshots");
            if debug {
                debug!("{err}");
            }
            return (false, SessionType::Unknown);
        }
    };

    let session_type = SessionType::from_response(body.get("type").and_then(Value::as_str));
    (true, session_type)
}
