//! ELBv2 API Client
//!
//! A Rust client library for the Elastic Load Balancing v2 Query API, plus the two
//! pure transformations a cluster-scoped load balancer controller is built on:
//!
//! - **Cluster membership**: pick the load balancers named `<cluster>-…` out of the
//!   account-wide inventory ([`filter_by_cluster`], [`cluster_load_balancers`])
//! - **Attribute canonicalization**: order attribute sets so desired and observed
//!   state compare equal exactly when they hold the same pairs ([`Attributes`])
//!
//! # Example
//!
//! ```no_run
//! use elbv2_client::{cluster_load_balancers, Attributes, Elbv2Client, Elbv2ClientTrait};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Elbv2Client::new("http://localhost:8080".to_string())?;
//!
//! let desired = Attributes::from_pairs([("idle_timeout.timeout_seconds", "60")]);
//! for lb in cluster_load_balancers(&client, "prod").await? {
//!     let Some(arn) = lb.load_balancer_arn.as_deref() else { continue };
//!     let observed = client.describe_load_balancer_attributes(arn).await?;
//!     if desired.has_drift_from(&observed) {
//!         client.modify_load_balancer_attributes(arn, &desired.changes_from(&observed)).await?;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod attributes;
pub mod client;
pub mod cluster;
pub mod common;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod elbv2_trait;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use attributes::{canonical_order, canonicalize, Attributes, LoadBalancerAttribute};
pub use client::Elbv2Client;
pub use cluster::{cluster_load_balancers, cluster_prefix, filter_by_cluster, is_cluster_member, ClusterScoped};
pub use common::HttpClient;
pub use elbv2_trait::Elbv2ClientTrait;
pub use error::Elbv2Error;
pub use models::*;
#[cfg(any(test, feature = "test-util"))]
pub use mock::MockElbv2Client;
