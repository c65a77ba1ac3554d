//! ELBv2 API models
//!
//! These models match the ELBv2 Query API (version 2015-12-01) XML shapes.
//! Lists on the wire are wrapped in `<member>` elements; they are flattened
//! into plain `Vec`s here.

use crate::attributes::LoadBalancerAttribute;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// ELBv2 API version sent with every Query API request
pub const API_VERSION: &str = "2015-12-01";

/// Wire wrapper for `<Foo><member>..</member><member>..</member></Foo>` lists
#[derive(Debug, Deserialize)]
struct MemberList<T> {
    #[serde(rename = "member", default = "Vec::new")]
    member: Vec<T>,
}

/// Deserialize a `<member>` list into a `Vec`
pub(crate) fn members<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    MemberList::<T>::deserialize(deserializer).map(|list| list.member)
}

/// Load balancer as returned by `DescribeLoadBalancers`
///
/// Only `load_balancer_name` is interpreted by this crate (cluster membership);
/// everything else is carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoadBalancer {
    #[serde(default)]
    pub load_balancer_arn: Option<String>,
    #[serde(default)]
    pub load_balancer_name: Option<String>,
    #[serde(rename = "DNSName", default)]
    pub dns_name: Option<String>,
    #[serde(default)]
    pub canonical_hosted_zone_id: Option<String>,
    #[serde(default)]
    pub scheme: Option<String>, // internet-facing | internal
    #[serde(default)]
    pub vpc_id: Option<String>,
    #[serde(rename = "Type", default)]
    pub load_balancer_type: Option<String>, // application | network | gateway
    #[serde(default)]
    pub state: Option<LoadBalancerState>,
    #[serde(default, deserialize_with = "members")]
    pub availability_zones: Vec<AvailabilityZone>,
    #[serde(default, deserialize_with = "members")]
    pub security_groups: Vec<String>,
    #[serde(default)]
    pub ip_address_type: Option<String>,
    #[serde(default)]
    pub created_time: Option<String>, // ISO 8601 datetime
}

impl LoadBalancer {
    /// Build a load balancer carrying only a name (fixtures, mocks)
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            load_balancer_name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Name or a placeholder for log lines
    pub fn display_name(&self) -> &str {
        self.load_balancer_name.as_deref().unwrap_or("<unnamed>")
    }

    /// Provisioning state, `Unknown` when absent
    pub fn state_code(&self) -> LoadBalancerStateCode {
        self.state
            .as_ref()
            .and_then(|s| s.code.as_deref())
            .map(LoadBalancerStateCode::from)
            .unwrap_or(LoadBalancerStateCode::Unknown)
    }
}

/// `State` element of a load balancer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoadBalancerState {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Load balancer state codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadBalancerStateCode {
    Active,
    Provisioning,
    ActiveImpaired,
    Failed,
    Unknown,
}

impl From<&str> for LoadBalancerStateCode {
    fn from(code: &str) -> Self {
        match code {
            "active" => Self::Active,
            "provisioning" => Self::Provisioning,
            "active_impaired" => Self::ActiveImpaired,
            "failed" => Self::Failed,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for LoadBalancerStateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Active => "active",
            Self::Provisioning => "provisioning",
            Self::ActiveImpaired => "active_impaired",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Availability zone placement of a load balancer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AvailabilityZone {
    #[serde(default)]
    pub zone_name: Option<String>,
    #[serde(default)]
    pub subnet_id: Option<String>,
}

/// One page of `DescribeLoadBalancers`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadBalancersPage {
    pub load_balancers: Vec<LoadBalancer>,
    /// Marker for the next page, `None` on the last page
    pub next_marker: Option<String>,
}

/// `DescribeLoadBalancersResponse` envelope
#[derive(Debug, Deserialize)]
pub(crate) struct DescribeLoadBalancersResponse {
    #[serde(rename = "DescribeLoadBalancersResult")]
    pub result: DescribeLoadBalancersResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct DescribeLoadBalancersResult {
    #[serde(default, deserialize_with = "members")]
    pub load_balancers: Vec<LoadBalancer>,
    #[serde(default)]
    pub next_marker: Option<String>,
}

impl DescribeLoadBalancersResponse {
    pub(crate) fn into_page(self) -> LoadBalancersPage {
        LoadBalancersPage {
            load_balancers: self.result.load_balancers,
            // An empty <NextMarker/> means there is nothing left to fetch
            next_marker: self.result.next_marker.filter(|m| !m.is_empty()),
        }
    }
}

/// `DescribeLoadBalancerAttributesResponse` envelope
#[derive(Debug, Deserialize)]
pub(crate) struct DescribeLoadBalancerAttributesResponse {
    #[serde(rename = "DescribeLoadBalancerAttributesResult")]
    pub result: AttributesResult,
}

/// `ModifyLoadBalancerAttributesResponse` envelope
#[derive(Debug, Deserialize)]
pub(crate) struct ModifyLoadBalancerAttributesResponse {
    #[serde(rename = "ModifyLoadBalancerAttributesResult")]
    pub result: AttributesResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct AttributesResult {
    #[serde(default, deserialize_with = "members")]
    pub attributes: Vec<LoadBalancerAttribute>,
}

/// `ErrorResponse` envelope returned with non-2xx status codes
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ErrorResponse {
    pub error: ApiErrorDetail,
    #[serde(default)]
    pub request_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ApiErrorDetail {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}
