//! # Simrun Client
//!
//! Submits simulation requests to a remote simulation service over HTTP and
//! returns the decoded result.
//!
//! ## Architecture
//!
//! ```text
//! caller                 SimulationClient               simulation service
//! ├── SimulationRequest ──► POST {endpoint} (JSON) ─────► /simulate
//! └── SimulationResult  ◄── decode JSON body ◄─────────── {"snapshots": [...]}
//! ```
//!
//! The client owns no state besides its configuration and a pooled
//! `reqwest::Client`; every call is an independent exchange with no retries.
//!
//! ```no_run
//! # async fn demo() -> simrun_client::Result<()> {
//! use simrun_client::{SimulationClient, SimulationRequest};
//!
//! let client = SimulationClient::default_local()?;
//! let request = SimulationRequest::new().with("particles", 2).with("steps", 10);
//! let result = client.run_simulation(&request).await?;
//! println!("{:?}", result.snapshots());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod error;
pub mod types;

// Client
pub use client::SimulationClient;

// Configuration
pub use config::{
    ClientConfig, StatusPolicy, DEFAULT_ENDPOINT, ENV_ENDPOINT, ENV_STATUS_POLICY,
    ENV_TIMEOUT_SECS,
};

// Error handling
pub use error::{Result, SimulationError};

// Request/result values
pub use types::{SimulationRequest, SimulationResult, SNAPSHOTS_FIELD};
