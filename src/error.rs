//! Unified error types for Percy-Oxide

use thiserror::Error;

/// Unified Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for Percy-Oxide
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP transport errors
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Agent replied with an unexpected status or body
    #[error("Agent error: {0}")]
    Agent(String),

    /// Capture operation does not match the negotiated session type
    #[error("{0}")]
    WrongCaptureMode(String),

    /// Page, frame, or browser runtime identity could not be resolved
    #[error("{0}")]
    MetadataUnavailable(String),

    /// In-page script evaluation failed
    #[error("Script evaluation failed: {0}")]
    ScriptEvaluation(String),
}

impl Error {
    /// Create a new agent error
    pub fn agent<S: Into<String>>(msg: S) -> Self {
        Error::Agent(msg.into())
    }

    /// Create a new wrong capture mode error
    pub fn wrong_capture_mode<S: Into<String>>(msg: S) -> Self {
        Error::WrongCaptureMode(msg.into())
    }

    /// Create a new metadata unavailable error
    pub fn metadata_unavailable<S: Into<String>>(msg: S) -> Self {
        Error::MetadataUnavailable(msg.into())
    }

    /// Create a new script evaluation error
    pub fn script_evaluation<S: Into<String>>(msg: S) -> Self {
        Error::ScriptEvaluation(msg.into())
    }
}
