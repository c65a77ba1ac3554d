//! Elbv2ClientTrait for mocking
//!
//! This trait abstracts the ELBv2 client to enable mocking in unit tests.
//! The concrete Elbv2Client implements this trait, and tests can use mock implementations.

use crate::attributes::Attributes;
use crate::error::Elbv2Error;
use crate::models::{LoadBalancer, LoadBalancersPage};
use std::collections::HashSet;
use tracing::debug;

/// Trait for ELBv2 API client operations
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait Elbv2ClientTrait: Send + Sync {
    /// Get the endpoint requests are sent to
    fn endpoint(&self) -> &str;

    /// Fetch a single page of `DescribeLoadBalancers`
    async fn describe_load_balancers_page(&self, marker: Option<&str>) -> Result<LoadBalancersPage, Elbv2Error>;

    /// Fetch the attributes of one load balancer, in provider order
    async fn describe_load_balancer_attributes(&self, load_balancer_arn: &str) -> Result<Attributes, Elbv2Error>;

    /// Apply attribute changes; returns the load balancer's attributes after the change
    async fn modify_load_balancer_attributes(&self, load_balancer_arn: &str, attributes: &Attributes) -> Result<Attributes, Elbv2Error>;

    /// Fetch every load balancer visible to the account.
    ///
    /// All pages are drained before returning. A failure on any page fails the
    /// whole listing so callers never see a partial inventory. A marker that was
    /// already requested, whether repeated or reached through a cycle, is an error.
    async fn list_all_load_balancers(&self) -> Result<Vec<LoadBalancer>, Elbv2Error> {
        let mut all_results = Vec::new();
        let mut marker: Option<String> = None;
        let mut seen_markers: HashSet<String> = HashSet::new();
        let mut pages = 0usize;

        loop {
            let page = self.describe_load_balancers_page(marker.as_deref()).await?;
            pages += 1;
            debug!("Fetched page {} with {} load balancers", pages, page.load_balancers.len());
            all_results.extend(page.load_balancers);

            let Some(next) = page.next_marker else {
                break;
            };
            if !seen_markers.insert(next.clone()) {
                return Err(Elbv2Error::Api(format!(
                    "pagination marker did not advance after page {}: {} was already requested",
                    pages, next
                )));
            }
            marker = Some(next);
        }

        Ok(all_results)
    }
}
