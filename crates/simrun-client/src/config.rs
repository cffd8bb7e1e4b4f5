//! Client configuration
//!
//! Layers, lowest priority first: built-in defaults, an optional JSON file,
//! then `SIMRUN_*` environment variables.

use crate::error::{Result, SimulationError};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Endpoint used when nothing else is configured
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/simulate";

/// Environment variable overriding the endpoint
pub const ENV_ENDPOINT: &str = "SIMRUN_ENDPOINT";

/// Environment variable setting the request timeout (seconds)
pub const ENV_TIMEOUT_SECS: &str = "SIMRUN_TIMEOUT_SECS";

/// Environment variable selecting the status policy (`enforce` or `ignore`)
pub const ENV_STATUS_POLICY: &str = "SIMRUN_STATUS_POLICY";

/// How non-2xx responses are treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusPolicy {
    /// Non-2xx responses fail with [`SimulationError::HttpStatus`]
    #[default]
    Enforce,
    /// Decode the body whatever the status code
    Ignore,
}

impl StatusPolicy {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "enforce" => Some(Self::Enforce),
            "ignore" => Some(Self::Ignore),
            _ => None,
        }
    }
}

/// Simulation client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Simulation endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Whole-request timeout in milliseconds (none = wait indefinitely)
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Treatment of non-2xx responses
    #[serde(default)]
    pub status_policy: StatusPolicy,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_user_agent() -> String {
    format!("simrun/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_ms: None,
            status_policy: StatusPolicy::default(),
            user_agent: default_user_agent(),
        }
    }
}

impl ClientConfig {
    /// Create a config for the given endpoint
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Set endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set request timeout (millisecond resolution; zero disables it)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = if timeout.is_zero() {
            None
        } else {
            // Sub-millisecond remainders round up so a tiny timeout never becomes zero
            let millis = timeout.as_nanos().div_ceil(1_000_000);
            Some(u64::try_from(millis).unwrap_or(u64::MAX))
        };
        self
    }

    /// Set or clear the request timeout
    pub fn with_optional_timeout(self, timeout: Option<Duration>) -> Self {
        match timeout {
            Some(timeout) => self.with_timeout(timeout),
            None => Self {
                timeout_ms: None,
                ..self
            },
        }
    }

    /// Set status policy
    pub fn with_status_policy(mut self, policy: StatusPolicy) -> Self {
        self.status_policy = policy;
        self
    }

    /// Set User-Agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Request timeout, if configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Parse and check the endpoint URL
    pub fn endpoint_url(&self) -> Result<Url> {
        let url = Url::parse(&self.endpoint).map_err(|e| {
            SimulationError::config(format!("invalid endpoint '{}': {}", self.endpoint, e))
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(SimulationError::config(format!(
                "unsupported endpoint scheme '{}' in '{}'",
                other, self.endpoint
            ))),
        }
    }

    /// Load a config from a JSON file; missing fields take their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            SimulationError::config(format!("failed to read {}: {}", path.display(), e))
        })?;

        serde_json::from_str(&text).map_err(|e| {
            SimulationError::config(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// Defaults overridden by `SIMRUN_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::default().apply_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by values from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::default().apply_lookup(lookup)
    }

    /// Override fields present in the lookup, keeping the rest
    pub fn apply_lookup<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENV_ENDPOINT) {
            self.endpoint = endpoint;
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs = raw.trim().parse::<u64>().map_err(|e| {
                SimulationError::config(format!("invalid {}='{}': {}", ENV_TIMEOUT_SECS, raw, e))
            })?;
            self = self.with_optional_timeout((secs > 0).then(|| Duration::from_secs(secs)));
        }

        if let Some(raw) = lookup(ENV_STATUS_POLICY) {
            self.status_policy = StatusPolicy::from_str(&raw).ok_or_else(|| {
                SimulationError::config(format!(
                    "invalid {}='{}': expected 'enforce' or 'ignore'",
                    ENV_STATUS_POLICY, raw
                ))
            })?;
        }

        Ok(self)
    }
}
