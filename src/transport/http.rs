//! Reqwest-backed agent transport

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::Result;
use crate::transport::traits::{AgentResponse, AgentTransport, CORE_VERSION_HEADER};

/// HTTP transport against the agent base address
#[derive(Debug)]
pub struct HttpTransport {
    base_address: String,
    debug: bool,
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport from the client configuration
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_default();

        Self {
            base_address: config.server_address.trim_end_matches('/').to_string(),
            debug: config.debug,
            client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_address, path)
    }
}

#[async_trait]
impl AgentTransport for HttpTransport {
    async fn get(&self, path: &str) -> Result<AgentResponse> {
        let response = self.client.get(self.url(path)).send().await?;

        let status = response.status().as_u16();
        let core_version = response
            .headers()
            .get(CORE_VERSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.text().await?;

        Ok(AgentResponse {
            status,
            core_version,
            body,
        })
    }

    async fn post(&self, path: &str, body: &Value) -> Option<Value> {
        let response = match self.client.post(self.url(path)).json(body).send().await {
            Ok(response) => response,
            Err(err) => {
                if self.debug {
                    debug!("{err}");
                }
                warn!("Could not post to {path}");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!("Could not post to {path}, agent returned {}", response.status());
            return None;
        }

        match response.json::<Value>().await {
            Ok(mut envelope) => envelope.get_mut("data").map(Value::take),
            Err(err) => {
                if self.debug {
                    debug!("{err}");
                }
                warn!("Could not post to {path}");
                None
            }
        }
    }
}
