//! Error types for simrun-client

use reqwest::StatusCode;
use thiserror::Error;

/// Result type for simulation client operations
pub type Result<T> = std::result::Result<T, SimulationError>;

/// Errors that can occur while talking to the simulation service
#[derive(Error, Debug)]
pub enum SimulationError {
    /// Network failure before a complete response was obtained
    #[error("transport error talking to {endpoint}: {source}")]
    Transport {
        /// Endpoint the request was sent to
        endpoint: String,
        /// Underlying client error
        #[source]
        source: reqwest::Error,
    },

    /// Service answered with a non-success status
    #[error("simulation service at {endpoint} returned {status}: {body}")]
    HttpStatus {
        /// Endpoint that answered
        endpoint: String,
        /// Status code of the response
        status: StatusCode,
        /// Response body, truncated
        body: String,
    },

    /// Response body is not valid JSON or does not match the expected shape
    #[error("failed to decode response from {endpoint}: {source}")]
    Decode {
        /// Endpoint that sent the body
        endpoint: String,
        /// Parse error
        #[source]
        source: serde_json::Error,
    },

    /// Already-decoded result does not fit the requested type
    #[error("simulation result does not match the requested type: {0}")]
    ResultShape(#[source] serde_json::Error),

    /// Request could not be serialized
    #[error("failed to encode simulation request: {0}")]
    Encode(#[source] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl SimulationError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn transport(endpoint: &reqwest::Url, source: reqwest::Error) -> Self {
        Self::Transport {
            endpoint: endpoint.to_string(),
            source,
        }
    }

    pub(crate) fn decode(endpoint: &reqwest::Url, source: serde_json::Error) -> Self {
        Self::Decode {
            endpoint: endpoint.to_string(),
            source,
        }
    }

    /// True for connection, DNS, timeout and body-read failures
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// True if the request timed out
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport { source, .. } if source.is_timeout())
    }

    /// True if a response body or result could not be decoded
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. } | Self::ResultShape(_))
    }

    /// HTTP status of a rejected response, if any
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
