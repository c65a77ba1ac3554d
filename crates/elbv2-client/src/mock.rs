//! Mock Elbv2Client for unit testing
//!
//! This module provides a mock implementation of Elbv2ClientTrait that can be used
//! in unit tests without a reachable ELBv2 endpoint. Load balancers are served in
//! pages of a configurable size with `page-N` markers, so pagination is exercised
//! the same way the real client drives it.

use crate::attributes::Attributes;
use crate::elbv2_trait::Elbv2ClientTrait;
use crate::error::Elbv2Error;
use crate::models::{LoadBalancer, LoadBalancersPage};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Mock Elbv2Client for testing
///
/// This mock stores resources in memory and can be configured to fail specific
/// calls for testing error paths.
#[derive(Debug, Clone)]
pub struct MockElbv2Client {
    endpoint: String,
    // In-memory storage for resources
    load_balancers: Arc<Mutex<Vec<LoadBalancer>>>,
    attributes: Arc<Mutex<HashMap<String, Attributes>>>,
    page_size: Arc<Mutex<usize>>,
    // Failure injection
    failing_page: Arc<Mutex<Option<(usize, String)>>>,
    stuck_marker: Arc<Mutex<bool>>,
    cycling_marker: Arc<Mutex<bool>>,
    failing_modify: Arc<Mutex<HashMap<String, String>>>,
    // Call recording
    page_requests: Arc<Mutex<Vec<Option<String>>>>,
    modify_calls: Arc<Mutex<Vec<(String, Attributes)>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockElbv2Client {
    /// Create a new mock client
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            load_balancers: Arc::new(Mutex::new(Vec::new())),
            attributes: Arc::new(Mutex::new(HashMap::new())),
            page_size: Arc::new(Mutex::new(usize::MAX)),
            failing_page: Arc::new(Mutex::new(None)),
            stuck_marker: Arc::new(Mutex::new(false)),
            cycling_marker: Arc::new(Mutex::new(false)),
            failing_modify: Arc::new(Mutex::new(HashMap::new())),
            page_requests: Arc::new(Mutex::new(Vec::new())),
            modify_calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a load balancer to the mock store (for test setup)
    pub fn add_load_balancer(&self, load_balancer: LoadBalancer) {
        lock(&self.load_balancers).push(load_balancer);
    }

    /// Add a load balancer with an ARN and attributes in one go (for test setup)
    pub fn add_load_balancer_with_attributes(&self, name: &str, arn: &str, attributes: Attributes) {
        let mut lb = LoadBalancer::named(name);
        lb.load_balancer_arn = Some(arn.to_string());
        self.add_load_balancer(lb);
        self.set_attributes(arn, attributes);
    }

    /// Set the attributes reported for an ARN (for test setup)
    pub fn set_attributes(&self, load_balancer_arn: &str, attributes: Attributes) {
        lock(&self.attributes).insert(load_balancer_arn.to_string(), attributes);
    }

    /// Serve `DescribeLoadBalancers` in pages of `page_size` (minimum 1)
    pub fn set_page_size(&self, page_size: usize) {
        *lock(&self.page_size) = page_size.max(1);
    }

    /// Fail the listing when page `page_index` (0-based) is requested
    pub fn fail_on_page(&self, page_index: usize, message: impl Into<String>) {
        *lock(&self.failing_page) = Some((page_index, message.into()));
    }

    /// Make every page point back at the same marker
    pub fn repeat_marker(&self) {
        *lock(&self.stuck_marker) = true;
    }

    /// Make markers cycle `page-1`, `page-2`, `page-1`, ...
    pub fn cycle_markers(&self) {
        *lock(&self.cycling_marker) = true;
    }

    /// Fail `ModifyLoadBalancerAttributes` for an ARN
    pub fn fail_modify(&self, load_balancer_arn: &str, message: impl Into<String>) {
        lock(&self.failing_modify).insert(load_balancer_arn.to_string(), message.into());
    }

    /// Markers passed to `describe_load_balancers_page`, in call order
    pub fn page_requests(&self) -> Vec<Option<String>> {
        lock(&self.page_requests).clone()
    }

    /// Recorded `(arn, attributes)` modify calls, in call order
    pub fn modify_calls(&self) -> Vec<(String, Attributes)> {
        lock(&self.modify_calls).clone()
    }

    /// Current stored attributes for an ARN
    pub fn attributes_of(&self, load_balancer_arn: &str) -> Option<Attributes> {
        lock(&self.attributes).get(load_balancer_arn).cloned()
    }

    fn page_index(marker: Option<&str>) -> Result<usize, Elbv2Error> {
        match marker {
            None => Ok(0),
            Some(m) => m
                .strip_prefix("page-")
                .and_then(|n| n.parse().ok())
                .ok_or_else(|| Elbv2Error::InvalidRequest(format!("unknown marker: {}", m))),
        }
    }
}

#[async_trait::async_trait]
impl Elbv2ClientTrait for MockElbv2Client {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn describe_load_balancers_page(&self, marker: Option<&str>) -> Result<LoadBalancersPage, Elbv2Error> {
        lock(&self.page_requests).push(marker.map(str::to_string));

        let index = Self::page_index(marker)?;
        if let Some((failing, message)) = lock(&self.failing_page).as_ref() {
            if *failing == index {
                return Err(Elbv2Error::Api(message.clone()));
            }
        }

        let page_size = *lock(&self.page_size);
        let all = lock(&self.load_balancers);
        let start = index.saturating_mul(page_size).min(all.len());
        let end = start.saturating_add(page_size).min(all.len());

        let next_marker = if *lock(&self.stuck_marker) {
            Some(format!("page-{}", index.max(1)))
        } else if *lock(&self.cycling_marker) {
            Some(format!("page-{}", index % 2 + 1))
        } else if end < all.len() {
            Some(format!("page-{}", index + 1))
        } else {
            None
        };

        Ok(LoadBalancersPage {
            load_balancers: all[start..end].to_vec(),
            next_marker,
        })
    }

    async fn describe_load_balancer_attributes(&self, load_balancer_arn: &str) -> Result<Attributes, Elbv2Error> {
        lock(&self.attributes)
            .get(load_balancer_arn)
            .cloned()
            .ok_or_else(|| Elbv2Error::NotFound(format!("Load balancer {} not found", load_balancer_arn)))
    }

    async fn modify_load_balancer_attributes(&self, load_balancer_arn: &str, attributes: &Attributes) -> Result<Attributes, Elbv2Error> {
        lock(&self.modify_calls).push((load_balancer_arn.to_string(), attributes.clone()));

        if let Some(message) = lock(&self.failing_modify).get(load_balancer_arn) {
            return Err(Elbv2Error::Api(message.clone()));
        }

        let mut store = lock(&self.attributes);
        let current = store
            .get_mut(load_balancer_arn)
            .ok_or_else(|| Elbv2Error::NotFound(format!("Load balancer {} not found", load_balancer_arn)))?;
        for attr in attributes {
            current.insert(attr.key.clone(), attr.value.clone());
        }
        Ok(current.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::cluster_load_balancers;

    fn seeded(page_size: usize) -> MockElbv2Client {
        let mock = MockElbv2Client::new("http://mock-elbv2");
        for name in ["prod-abc123456789", "dev-abc123456789", "prod-123456789abc", "qa-abc123456789"] {
            mock.add_load_balancer(LoadBalancer::named(name));
        }
        mock.set_page_size(page_size);
        mock
    }

    #[tokio::test]
    async fn test_list_all_drains_every_page() {
        let mock = seeded(1);
        let all = mock.list_all_load_balancers().await.expect("listing succeeds");
        assert_eq!(all.len(), 4);
        assert_eq!(
            mock.page_requests(),
            vec![
                None,
                Some("page-1".to_string()),
                Some("page-2".to_string()),
                Some("page-3".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_cluster_load_balancers_across_pages() {
        let mock = seeded(3);
        let prod = cluster_load_balancers(&mock, "prod").await.expect("listing succeeds");
        let names: Vec<&str> = prod.iter().map(LoadBalancer::display_name).collect();
        assert_eq!(names, vec!["prod-abc123456789", "prod-123456789abc"]);

        assert!(cluster_load_balancers(&mock, "miss").await.expect("listing succeeds").is_empty());
        assert!(cluster_load_balancers(&mock, "").await.expect("listing succeeds").is_empty());
    }

    #[tokio::test]
    async fn test_page_failure_aborts_listing() {
        let mock = seeded(2);
        mock.fail_on_page(1, "connection reset");
        let result = cluster_load_balancers(&mock, "prod").await;
        match result {
            Err(Elbv2Error::Api(msg)) => assert_eq!(msg, "connection reset"),
            other => panic!("expected listing failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_stuck_marker_is_reported() {
        let mock = seeded(1);
        mock.repeat_marker();
        let result = mock.list_all_load_balancers().await;
        assert!(matches!(result, Err(Elbv2Error::Api(msg)) if msg.contains("did not advance")));
    }

    #[tokio::test]
    async fn test_cycling_marker_is_reported() {
        let mock = seeded(1);
        mock.cycle_markers();
        let result = tokio::time::timeout(std::time::Duration::from_secs(5), mock.list_all_load_balancers())
            .await
            .expect("listing terminates");
        assert!(matches!(result, Err(Elbv2Error::Api(msg)) if msg.contains("page-1 was already requested")));
        assert_eq!(
            mock.page_requests(),
            vec![None, Some("page-1".to_string()), Some("page-2".to_string())]
        );
    }

    #[tokio::test]
    async fn test_modify_merges_attributes() {
        let mock = MockElbv2Client::new("http://mock-elbv2");
        mock.add_load_balancer_with_attributes(
            "prod-a",
            "arn:prod-a",
            Attributes::from_pairs([("idle_timeout.timeout_seconds", "60"), ("deletion_protection.enabled", "false")]),
        );

        let updated = mock
            .modify_load_balancer_attributes("arn:prod-a", &Attributes::from_pairs([("idle_timeout.timeout_seconds", "120")]))
            .await
            .expect("modify succeeds");
        assert_eq!(updated.get("idle_timeout.timeout_seconds"), Some("120"));
        assert_eq!(updated.get("deletion_protection.enabled"), Some("false"));
        assert_eq!(mock.modify_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_arn_is_not_found() {
        let mock = MockElbv2Client::new("http://mock-elbv2");
        let result = mock.describe_load_balancer_attributes("arn:missing").await;
        assert!(matches!(result, Err(Elbv2Error::NotFound(_))));
    }
}
