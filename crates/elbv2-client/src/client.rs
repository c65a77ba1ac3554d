//! ELBv2 API client
//!
//! Speaks the ELBv2 Query API (`?Action=…&Version=2015-12-01`). Requests are
//! sent unsigned to an endpoint fronted by a SigV4 signing proxy sidecar, which
//! owns credentials.

use crate::attributes::Attributes;
use crate::common::{attribute_params, HttpClient};
use crate::elbv2_trait::Elbv2ClientTrait;
use crate::error::Elbv2Error;
use crate::models::{
    DescribeLoadBalancerAttributesResponse, DescribeLoadBalancersResponse, LoadBalancersPage,
    ModifyLoadBalancerAttributesResponse,
};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Largest page size `DescribeLoadBalancers` accepts
pub const MAX_PAGE_SIZE: u32 = 400;

/// ELBv2 API client
#[derive(Debug)]
pub struct Elbv2Client {
    http: HttpClient,
    page_size: u32,
}

impl Elbv2Client {
    /// Create a new ELBv2 client
    ///
    /// # Arguments
    /// * `endpoint` - Signing proxy URL (e.g., "http://localhost:8080")
    pub fn new(endpoint: String) -> Result<Self, Elbv2Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http: HttpClient::new(client, endpoint),
            page_size: MAX_PAGE_SIZE,
        })
    }

    /// Override the `PageSize` sent with `DescribeLoadBalancers` (clamped to 1..=400)
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    fn require_arn(load_balancer_arn: &str) -> Result<(), Elbv2Error> {
        if load_balancer_arn.is_empty() {
            return Err(Elbv2Error::InvalidRequest("load balancer ARN is empty".to_string()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Elbv2ClientTrait for Elbv2Client {
    fn endpoint(&self) -> &str {
        self.http.endpoint()
    }

    async fn describe_load_balancers_page(&self, marker: Option<&str>) -> Result<LoadBalancersPage, Elbv2Error> {
        let mut params = vec![("PageSize".to_string(), self.page_size.to_string())];
        if let Some(marker) = marker {
            params.push(("Marker".to_string(), marker.to_string()));
        }

        let response: DescribeLoadBalancersResponse = self.http.call("DescribeLoadBalancers", &params).await?;
        Ok(response.into_page())
    }

    async fn describe_load_balancer_attributes(&self, load_balancer_arn: &str) -> Result<Attributes, Elbv2Error> {
        Self::require_arn(load_balancer_arn)?;
        let params = [("LoadBalancerArn".to_string(), load_balancer_arn.to_string())];

        let response: DescribeLoadBalancerAttributesResponse =
            self.http.call("DescribeLoadBalancerAttributes", &params).await?;
        debug!("{} has {} attributes", load_balancer_arn, response.result.attributes.len());
        Ok(Attributes::from(response.result.attributes))
    }

    async fn modify_load_balancer_attributes(&self, load_balancer_arn: &str, attributes: &Attributes) -> Result<Attributes, Elbv2Error> {
        Self::require_arn(load_balancer_arn)?;
        if attributes.is_empty() {
            return Err(Elbv2Error::InvalidRequest(format!(
                "no attributes to modify on {}",
                load_balancer_arn
            )));
        }

        let mut params = vec![("LoadBalancerArn".to_string(), load_balancer_arn.to_string())];
        params.extend(attribute_params(attributes));

        let response: ModifyLoadBalancerAttributesResponse =
            self.http.call("ModifyLoadBalancerAttributes", &params).await?;
        Ok(Attributes::from(response.result.attributes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_trims_endpoint() {
        let client = Elbv2Client::new("http://localhost:8080/".to_string()).expect("client builds");
        assert_eq!(client.endpoint(), "http://localhost:8080");
    }

    #[test]
    fn test_page_size_is_clamped() {
        let client = Elbv2Client::new("http://localhost:8080".to_string())
            .expect("client builds")
            .with_page_size(10_000);
        assert_eq!(client.page_size, MAX_PAGE_SIZE);
        let client = client.with_page_size(0);
        assert_eq!(client.page_size, 1);
    }

    #[tokio::test]
    async fn test_empty_arn_rejected_without_request() {
        let client = Elbv2Client::new("http://127.0.0.1:9".to_string()).expect("client builds");
        let result = client.describe_load_balancer_attributes("").await;
        assert!(matches!(result, Err(Elbv2Error::InvalidRequest(_))));

        let result = client
            .modify_load_balancer_attributes("arn:aws:x", &Attributes::new())
            .await;
        assert!(matches!(result, Err(Elbv2Error::InvalidRequest(_))));
    }
}
