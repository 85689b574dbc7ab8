//! Error types for the DDNS system
//!
//! Only [`Error::Config`] is fatal. Every other variant is a steady-state
//! failure that the engine logs and recovers from on the next cycle.

use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DDNS system
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Required setting absent or unusable at startup
    #[error("Configuration error: {0}")]
    Config(String),

    /// The IP check service answered with something that is not an IPv4 address
    #[error("Malformed response from IP address check: {0:?}")]
    MalformedResponse(String),

    /// The IP check call failed or timed out
    #[error("Network error: {0}")]
    Network(String),

    /// The DNS update call failed, timed out, or returned a non-2xx status
    #[error("DNS update failed ({provider}): {message}")]
    Update {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a malformed response error carrying the raw body
    pub fn malformed(body: impl Into<String>) -> Self {
        Self::MalformedResponse(body.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create an update failure for the named provider
    pub fn update(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Update {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Whether this error must stop the process before the loop starts
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
