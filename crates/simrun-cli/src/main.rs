//! Simrun CLI - Submit a simulation run and print its trajectory
//!
//! ```bash
//! # Parameters inline
//! simrun --param particles=2 --param steps=10
//!
//! # Request from a file, against a remote service
//! simrun --endpoint http://sim.internal:8080/simulate request.json
//!
//! # Request from stdin, whole result pretty-printed
//! echo '{"particles": 2}' | simrun --full --pretty -
//! ```
//!
//! Snapshots go to stdout as JSON; logs go to stderr.
//!
//! Binary: simrun

use anyhow::Context;
use clap::Parser;
use serde_json::Value;
use simrun_client::{ClientConfig, SNAPSHOTS_FIELD, SimulationClient, SimulationResult, StatusPolicy};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod request;

/// Simrun CLI - remote simulation runner
#[derive(Parser)]
#[command(name = "simrun")]
#[command(about = "Submit a simulation request and print the resulting snapshots", long_about = None)]
struct Cli {
    /// Simulation endpoint URL
    #[arg(long, env = "SIMRUN_ENDPOINT")]
    endpoint: Option<String>,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Request timeout in seconds (0 = none)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Decode the response body even for non-2xx statuses
    #[arg(long)]
    ignore_status: bool,

    /// Print the whole result instead of the snapshots
    #[arg(long)]
    full: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Request field as KEY=VALUE (repeatable, overrides the request file)
    #[arg(short, long = "param", value_name = "KEY=VALUE")]
    params: Vec<String>,

    /// Request JSON file, or '-' for stdin
    request: Option<String>,
}

impl Cli {
    /// Defaults, then config file, then SIMRUN_* values from `lookup`, then flags
    fn client_config<F>(&self, lookup: F) -> anyhow::Result<ClientConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = match &self.config {
            Some(path) => ClientConfig::from_file(path)?,
            None => ClientConfig::default(),
        };
        let mut config = base.apply_lookup(lookup)?;

        if let Some(ref endpoint) = self.endpoint {
            config = config.with_endpoint(endpoint.clone());
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_optional_timeout((secs > 0).then(|| Duration::from_secs(secs)));
        }
        if self.ignore_status {
            config = config.with_status_policy(StatusPolicy::Ignore);
        }

        Ok(config)
    }
}

/// JSON text printed on stdout for a successful run
fn render_output(result: &SimulationResult, full: bool, pretty: bool) -> anyhow::Result<String> {
    let null = Value::Null;
    let output = if full {
        result.as_value()
    } else {
        match result.get(SNAPSHOTS_FIELD) {
            Some(snapshots) => snapshots,
            None => {
                warn!("Result has no '{}' field", SNAPSHOTS_FIELD);
                &null
            }
        }
    };

    let text = if pretty {
        serde_json::to_string_pretty(output)?
    } else {
        serde_json::to_string(output)?
    };
    Ok(text)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging (stderr, so stdout stays machine-readable)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "simrun=info,simrun_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = cli.client_config(|key| std::env::var(key).ok())?;
    let client = SimulationClient::new(config)?;
    let request = request::build_request(cli.request.as_deref(), &cli.params)?;

    info!(
        endpoint = %client.endpoint(),
        fields = request.len(),
        "Running simulation"
    );

    let result = client
        .run_simulation(&request)
        .await
        .with_context(|| format!("simulation run against {} failed", client.endpoint()))?;

    println!("{}", render_output(&result, cli.full, cli.pretty)?);

    Ok(())
}
