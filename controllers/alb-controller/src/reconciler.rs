//! Reconciliation logic for cluster load balancer attributes.
//!
//! One pass lists the whole account inventory, keeps the load balancers that
//! belong to the configured cluster, and brings each one's attributes in line
//! with the desired set. A listing failure aborts the pass; failures on an
//! individual load balancer are counted and the pass carries on.

use crate::error::ControllerError;
use chrono::{DateTime, Utc};
use elbv2_client::{filter_by_cluster, Attributes, Elbv2ClientTrait, LoadBalancer, LoadBalancerStateCode};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// What happened to one load balancer during a pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadBalancerOutcome {
    /// Observed attributes already match
    InSync,
    /// Drift found but not corrected (dry run)
    Drifted(Attributes),
    /// Drift corrected with these changes
    Updated(Attributes),
    /// Not reconciled
    Skipped(String),
    /// Describe or modify call failed
    Failed(String),
}

/// Counters for one reconciliation pass
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileSummary {
    pub cluster: String,
    /// Load balancers in the account inventory
    pub total_seen: usize,
    /// Load balancers owned by the cluster
    pub members: usize,
    pub in_sync: usize,
    pub drifted: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Attribute changes applied, or pending in dry-run mode
    pub attribute_changes: usize,
    /// Error messages of failed members
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<String>,
    pub finished_at: DateTime<Utc>,
}

impl ReconcileSummary {
    fn new(cluster: &str, total_seen: usize, members: usize) -> Self {
        Self {
            cluster: cluster.to_string(),
            total_seen,
            members,
            in_sync: 0,
            drifted: 0,
            updated: 0,
            skipped: 0,
            failed: 0,
            attribute_changes: 0,
            failures: Vec::new(),
            finished_at: Utc::now(),
        }
    }

    fn record(&mut self, outcome: &LoadBalancerOutcome) {
        match outcome {
            LoadBalancerOutcome::InSync => self.in_sync += 1,
            LoadBalancerOutcome::Drifted(changes) => {
                self.drifted += 1;
                self.attribute_changes += changes.len();
            }
            LoadBalancerOutcome::Updated(changes) => {
                self.updated += 1;
                self.attribute_changes += changes.len();
            }
            LoadBalancerOutcome::Skipped(reason) => {
                self.skipped += 1;
                debug!("Skipped load balancer: {}", reason);
            }
            LoadBalancerOutcome::Failed(message) => {
                self.failed += 1;
                self.failures.push(message.clone());
            }
        }
    }

    /// Whether every member was handled without error
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Reconciles the attributes of one cluster's load balancers
pub struct Reconciler<C: ?Sized> {
    client: Arc<C>,
    cluster_name: String,
    desired: Attributes,
    dry_run: bool,
    concurrency: usize,
}

impl<C> Reconciler<C>
where
    C: Elbv2ClientTrait + ?Sized,
{
    /// Creates a new reconciler; `desired` is canonicalized once here.
    pub fn new(client: Arc<C>, cluster_name: String, desired: Attributes) -> Self {
        Self {
            client,
            cluster_name,
            desired: desired.canonical(),
            dry_run: false,
            concurrency: 1,
        }
    }

    /// Report drift without modifying load balancers
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Number of load balancers handled concurrently (minimum 1)
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn cluster_name(&self) -> &str {
        &self.cluster_name
    }

    /// Run one reconciliation pass
    pub async fn reconcile(&self) -> Result<ReconcileSummary, ControllerError> {
        let all = self.client.list_all_load_balancers().await.map_err(|e| {
            error!("Failed to list load balancers for cluster {}: {}", self.cluster_name, e);
            ControllerError::Elbv2(e)
        })?;
        let members = filter_by_cluster(&all, &self.cluster_name);
        debug!("Cluster {} owns {} of {} load balancers", self.cluster_name, members.len(), all.len());

        let mut summary = ReconcileSummary::new(&self.cluster_name, all.len(), members.len());

        let outcomes: Vec<LoadBalancerOutcome> = stream::iter(members.iter())
            .map(|lb| self.reconcile_load_balancer(lb))
            .buffered(self.concurrency)
            .collect()
            .await;
        for outcome in &outcomes {
            summary.record(outcome);
        }
        summary.finished_at = Utc::now();

        info!(
            "Reconciled cluster {}: {}",
            self.cluster_name,
            serde_json::to_string(&summary).unwrap_or_default()
        );
        Ok(summary)
    }

    /// Bring one load balancer's attributes in line with the desired set
    pub async fn reconcile_load_balancer(&self, lb: &LoadBalancer) -> LoadBalancerOutcome {
        let name = lb.display_name();

        let Some(arn) = lb.load_balancer_arn.as_deref().filter(|a| !a.is_empty()) else {
            warn!("Load balancer {} has no ARN, skipping", name);
            return LoadBalancerOutcome::Skipped("missing ARN".to_string());
        };

        if lb.state_code() == LoadBalancerStateCode::Failed {
            warn!("Load balancer {} is in failed state, skipping", name);
            return LoadBalancerOutcome::Skipped("failed state".to_string());
        }

        if self.desired.is_empty() {
            return LoadBalancerOutcome::InSync;
        }

        let observed = match self.client.describe_load_balancer_attributes(arn).await {
            Ok(observed) => observed,
            Err(e) => {
                error!("Failed to describe attributes of {}: {}", name, e);
                return LoadBalancerOutcome::Failed(e.to_string());
            }
        };

        let changes = self.desired.changes_from(&observed);
        if changes.is_empty() {
            debug!("Load balancer {} attributes already up-to-date", name);
            return LoadBalancerOutcome::InSync;
        }

        let keys: Vec<&str> = changes.iter().map(|a| a.key.as_str()).collect();
        warn!("Load balancer {} attribute drift detected: {:?}", name, keys);

        if self.dry_run {
            info!("Dry run: not modifying {}", name);
            return LoadBalancerOutcome::Drifted(changes);
        }

        match self.client.modify_load_balancer_attributes(arn, &changes).await {
            Ok(_) => {
                info!("Updated {} attributes on {}", changes.len(), name);
                LoadBalancerOutcome::Updated(changes)
            }
            Err(e) => {
                error!("Failed to modify attributes of {}: {}", name, e);
                LoadBalancerOutcome::Failed(e.to_string())
            }
        }
    }
}
