//! Error types for the client information registry
//!
//! Most registry operations are total and never fail. Errors come from
//! record construction, configuration validation and hint feeds.

use std::net::IpAddr;
use thiserror::Error;

/// Result type alias for client registry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the client registry
#[derive(Error, Debug)]
pub enum Error {
    /// The address cannot identify a client
    #[error("Invalid client address: {0}")]
    InvalidAddress(IpAddr),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Hint feed errors
    #[error("Hint feed error: {0}")]
    Feed(String),

    /// Malformed hint on a text feed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a hint feed error
    pub fn feed(msg: impl Into<String>) -> Self {
        Self::Feed(msg.into())
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
