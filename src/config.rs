//! Configuration management for Percy-Oxide

use std::env;
use std::time::Duration;

/// Default agent base address when `PERCY_SERVER_ADDRESS` is unset
pub const DEFAULT_SERVER_ADDRESS: &str = "http://localhost:5338";

/// Client configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base address of the local Percy agent
    pub server_address: String,

    /// Verbose error logging, enabled by `PERCY_LOGLEVEL=debug`
    pub debug: bool,

    /// Timeout applied to every agent request
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_address: DEFAULT_SERVER_ADDRESS.to_string(),
            debug: false,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Config::default();

        if let Ok(address) = env::var("PERCY_SERVER_ADDRESS") {
            config.server_address = address;
        }

        if let Ok(level) = env::var("PERCY_LOGLEVEL") {
            config.debug = level == "debug";
        }

        config
    }
}
