//! Controller configuration.
//!
//! Read from environment variables at startup. The desired attribute set is an
//! optional YAML mapping of attribute key to value, e.g.
//!
//! ```yaml
//! idle_timeout.timeout_seconds: "120"
//! deletion_protection.enabled: "true"
//! ```

use crate::error::ControllerError;
use elbv2_client::Attributes;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

const DEFAULT_ENDPOINT: &str = "http://localhost:8080";
const DEFAULT_INTERVAL_SECS: u64 = 60;
const DEFAULT_BACKOFF_MIN_SECS: u64 = 5;
const DEFAULT_BACKOFF_MAX_SECS: u64 = 300;
const DEFAULT_CONCURRENCY: usize = 4;

/// Runtime configuration for the controller
#[derive(Debug, Clone)]
pub struct Config {
    /// Cluster whose load balancers are reconciled
    pub cluster_name: String,
    /// ELBv2 endpoint (signing proxy)
    pub endpoint: String,
    pub interval: Duration,
    pub backoff_min: Duration,
    pub backoff_max: Duration,
    /// Attribute fetches in flight at once
    pub concurrency: usize,
    /// Report drift without modifying anything
    pub dry_run: bool,
    pub desired_attributes_file: Option<String>,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ControllerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ControllerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let cluster_name = lookup("CLUSTER_NAME")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ControllerError::InvalidConfig(
                "CLUSTER_NAME environment variable is required".to_string()
            ))?;

        let endpoint = lookup("ELBV2_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let interval = parse_u64(&lookup, "RECONCILE_INTERVAL_SECS", DEFAULT_INTERVAL_SECS)?;
        let backoff_min = parse_u64(&lookup, "BACKOFF_MIN_SECS", DEFAULT_BACKOFF_MIN_SECS)?;
        let backoff_max = parse_u64(&lookup, "BACKOFF_MAX_SECS", DEFAULT_BACKOFF_MAX_SECS)?;
        let concurrency = parse_u64(&lookup, "ATTRIBUTE_FETCH_CONCURRENCY", DEFAULT_CONCURRENCY as u64)?;

        if interval == 0 {
            return Err(ControllerError::InvalidConfig(
                "RECONCILE_INTERVAL_SECS must be greater than zero".to_string()
            ));
        }
        if backoff_min > backoff_max {
            return Err(ControllerError::InvalidConfig(format!(
                "BACKOFF_MIN_SECS ({}) exceeds BACKOFF_MAX_SECS ({})",
                backoff_min, backoff_max
            )));
        }

        let dry_run = match lookup("DRY_RUN").as_deref().map(str::trim) {
            None | Some("") => false,
            Some(v) if v.eq_ignore_ascii_case("true") || v == "1" => true,
            Some(v) if v.eq_ignore_ascii_case("false") || v == "0" => false,
            Some(v) => {
                return Err(ControllerError::InvalidConfig(format!(
                    "DRY_RUN must be true or false, got {:?}",
                    v
                )));
            }
        };

        Ok(Self {
            cluster_name,
            endpoint,
            interval: Duration::from_secs(interval),
            backoff_min: Duration::from_secs(backoff_min),
            backoff_max: Duration::from_secs(backoff_max),
            concurrency: usize::try_from(concurrency).unwrap_or(usize::MAX).max(1),
            dry_run,
            desired_attributes_file: lookup("DESIRED_ATTRIBUTES_FILE").filter(|s| !s.is_empty()),
        })
    }

    /// Load the desired attribute set; empty when no file is configured
    pub fn load_desired_attributes(&self) -> Result<Attributes, ControllerError> {
        match &self.desired_attributes_file {
            Some(path) => load_desired_attributes(Path::new(path)),
            None => Ok(Attributes::new()),
        }
    }
}

fn parse_u64<F>(lookup: &F, key: &str, default: u64) -> Result<u64, ControllerError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ControllerError::InvalidConfig(format!(
            "{} must be a non-negative integer, got {:?}",
            key, raw
        ))),
    }
}

/// Read a YAML `key: value` mapping into canonical attributes
pub fn load_desired_attributes(path: &Path) -> Result<Attributes, ControllerError> {
    let raw = std::fs::read_to_string(path)?;
    parse_desired_attributes(&raw)
}

/// Parse a YAML `key: value` mapping into canonical attributes.
///
/// Scalar values (numbers, booleans) are accepted and stored in their string
/// form, which is how ELBv2 reports every attribute.
pub fn parse_desired_attributes(raw: &str) -> Result<Attributes, ControllerError> {
    if raw.trim().is_empty() {
        return Ok(Attributes::new());
    }
    let map: BTreeMap<String, serde_yaml::Value> = serde_yaml::from_str(raw)?;

    let mut attributes = Attributes::new();
    for (key, value) in map {
        let value = match value {
            serde_yaml::Value::String(s) => s,
            serde_yaml::Value::Bool(b) => b.to_string(),
            serde_yaml::Value::Number(n) => n.to_string(),
            other => {
                return Err(ControllerError::InvalidConfig(format!(
                    "attribute {} must be a scalar, got {:?}",
                    key, other
                )));
            }
        };
        attributes.insert(key, value);
    }
    Ok(attributes.canonical())
}
