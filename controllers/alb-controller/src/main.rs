//! ALB Controller
//!
//! Keeps the attributes of a cluster's ELBv2 load balancers in line with a
//! declared set:
//! - Lists every load balancer in the account and keeps those named `<cluster>-…`
//! - Compares canonical desired and observed attributes to detect drift
//! - Applies only the changed attributes (or just reports them in dry-run mode)

mod backoff;
mod config;
mod controller;
mod error;
mod reconciler;

use anyhow::Result;
use config::Config;
use controller::Controller;
use elbv2_client::Elbv2Client;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting ALB Controller");

    // Load configuration from environment variables
    let config = Config::from_env()?;
    let desired = config.load_desired_attributes()?;

    info!("Configuration:");
    info!("  Cluster: {}", config.cluster_name);
    info!("  ELBv2 endpoint: {}", config.endpoint);
    info!("  Interval: {:?}", config.interval);
    info!("  Desired attributes: {}", desired.len());
    info!("  Dry run: {}", config.dry_run);

    // Initialize and run controller
    let client = Elbv2Client::new(config.endpoint.clone())?;
    let mut controller = Controller::new(Arc::new(client), &config, desired);
    controller.run().await?;

    info!("ALB Controller stopped");
    Ok(())
}
