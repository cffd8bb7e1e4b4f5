//! Simulation service client
//!
//! One call, one exchange:
//!
//! ```text
//! POST /simulate HTTP/1.1
//! Content-Type: application/json
//!
//! {"particles": 2, "steps": 10}
//! ```
//!
//! answered with a JSON body such as `{"snapshots": [[0,0],[1,1]]}`.
//! No retries are attempted; every failure is returned to the caller.

use crate::config::{ClientConfig, StatusPolicy};
use crate::error::{Result, SimulationError};
use crate::types::{SNAPSHOTS_FIELD, SimulationResult};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Url;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

/// Longest error body kept in [`SimulationError::HttpStatus`]
const MAX_ERROR_BODY_BYTES: usize = 512;

const APPLICATION_JSON: &str = "application/json";

/// Client for the remote simulation service
#[derive(Debug, Clone)]
pub struct SimulationClient {
    /// Client configuration
    config: ClientConfig,

    /// Parsed endpoint
    endpoint: Url,

    /// HTTP client
    client: reqwest::Client,
}

impl SimulationClient {
    /// Create a new client, validating the endpoint
    pub fn new(config: ClientConfig) -> Result<Self> {
        let endpoint = config.endpoint_url()?;

        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| SimulationError::config(format!("failed to build HTTP client: {}", e)))?;

        debug!(endpoint = %endpoint, timeout = ?config.timeout(), "Simulation client ready");

        Ok(Self {
            config,
            endpoint,
            client,
        })
    }

    /// Client for `http://localhost:8080/simulate` with default settings
    pub fn default_local() -> Result<Self> {
        Self::new(ClientConfig::default())
    }

    /// Submit a simulation request and return the decoded result
    ///
    /// Performs exactly one `POST` against the configured endpoint. On success the
    /// `snapshots` field of the result is reported through `tracing` at info level.
    pub async fn run_simulation<R>(&self, request: &R) -> Result<SimulationResult>
    where
        R: Serialize + ?Sized,
    {
        let body = self.exchange(request).await?;

        let value: serde_json::Value = serde_json::from_slice(&body)
            .map_err(|e| SimulationError::decode(&self.endpoint, e))?;
        let result = SimulationResult::new(value);

        match result.get(SNAPSHOTS_FIELD) {
            Some(snapshots) => info!(
                endpoint = %self.endpoint,
                count = result.snapshots().map_or(0, <[_]>::len),
                snapshots = %snapshots,
                "Simulation finished"
            ),
            None => warn!(
                endpoint = %self.endpoint,
                "Simulation response has no '{}' field",
                SNAPSHOTS_FIELD
            ),
        }

        Ok(result)
    }

    /// Submit a simulation request and decode the body into `T`
    pub async fn run_simulation_as<R, T>(&self, request: &R) -> Result<T>
    where
        R: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.exchange(request).await?;
        serde_json::from_slice(&body).map_err(|e| SimulationError::decode(&self.endpoint, e))
    }

    /// Send the request and return the raw response body
    async fn exchange<R>(&self, request: &R) -> Result<Vec<u8>>
    where
        R: Serialize + ?Sized,
    {
        let payload = serde_json::to_vec(request).map_err(SimulationError::Encode)?;

        debug!(
            endpoint = %self.endpoint,
            bytes = payload.len(),
            "Submitting simulation request"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, APPLICATION_JSON)
            .header(ACCEPT, APPLICATION_JSON)
            .body(payload)
            .send()
            .await
            .map_err(|e| SimulationError::transport(&self.endpoint, e))?;

        let status = response.status();
        debug!(endpoint = %self.endpoint, status = %status, "Simulation service responded");

        let body = response
            .bytes()
            .await
            .map_err(|e| SimulationError::transport(&self.endpoint, e))?;

        if !status.is_success() {
            match self.config.status_policy {
                StatusPolicy::Enforce => {
                    return Err(SimulationError::HttpStatus {
                        endpoint: self.endpoint.to_string(),
                        status,
                        body: truncate_body(&body),
                    });
                }
                StatusPolicy::Ignore => {
                    warn!(
                        endpoint = %self.endpoint,
                        status = %status,
                        "Non-success status ignored, decoding body anyway"
                    );
                }
            }
        }

        Ok(body.to_vec())
    }

    /// Get the endpoint URL
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Get the configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

/// Lossy UTF-8 view of an error body, cut at a char boundary
fn truncate_body(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    if text.len() <= MAX_ERROR_BODY_BYTES {
        return text.trim().to_string();
    }

    let mut cut = MAX_ERROR_BODY_BYTES;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", text[..cut].trim_end())
}
