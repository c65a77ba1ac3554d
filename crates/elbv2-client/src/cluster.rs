//! Cluster membership of ELBv2 resources
//!
//! Resources created on behalf of a cluster are named `<cluster>-<suffix>`.
//! Membership is decided on that prefix alone, separator included, so cluster
//! `prod` never claims `production-…` resources or a bare `prod`.

use crate::elbv2_trait::Elbv2ClientTrait;
use crate::error::Elbv2Error;
use crate::models::LoadBalancer;
use tracing::debug;

/// Separator between the cluster name and the rest of a resource name
pub const CLUSTER_NAME_SEPARATOR: char = '-';

/// Resources whose name can place them in a cluster
pub trait ClusterScoped {
    /// Provider-assigned name, `None` when the provider omitted it
    fn resource_name(&self) -> Option<&str>;
}

impl ClusterScoped for LoadBalancer {
    fn resource_name(&self) -> Option<&str> {
        self.load_balancer_name.as_deref()
    }
}

/// Name prefix owned by `cluster_name`, or `None` for an empty cluster name
pub fn cluster_prefix(cluster_name: &str) -> Option<String> {
    if cluster_name.is_empty() {
        None
    } else {
        Some(format!("{cluster_name}{CLUSTER_NAME_SEPARATOR}"))
    }
}

/// Whether a resource called `name` belongs to `cluster_name`
pub fn is_cluster_member(name: Option<&str>, cluster_name: &str) -> bool {
    match (name, cluster_prefix(cluster_name)) {
        (Some(name), Some(prefix)) => name.starts_with(&prefix),
        _ => false,
    }
}

/// Resources belonging to `cluster_name`, in their original order.
///
/// The result is a fresh `Vec`; the input is only read. An empty cluster name
/// matches nothing and resources without a name are never members.
pub fn filter_by_cluster<R>(all: &[R], cluster_name: &str) -> Vec<R>
where
    R: ClusterScoped + Clone,
{
    if cluster_name.is_empty() {
        return Vec::new();
    }
    all.iter()
        .filter(|r| is_cluster_member(r.resource_name(), cluster_name))
        .cloned()
        .collect()
}

/// List every load balancer and keep the ones belonging to `cluster_name`.
///
/// Listing errors are returned unchanged; the filter only ever runs on a
/// complete inventory.
pub async fn cluster_load_balancers<C>(client: &C, cluster_name: &str) -> Result<Vec<LoadBalancer>, Elbv2Error>
where
    C: Elbv2ClientTrait + ?Sized,
{
    let all = client.list_all_load_balancers().await?;
    let members = filter_by_cluster(&all, cluster_name);
    debug!(
        "Cluster {:?} owns {} of {} load balancers",
        cluster_name,
        members.len(),
        all.len()
    );
    Ok(members)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fixtures() -> Vec<LoadBalancer> {
        vec![
            LoadBalancer::named("prod-abc123456789"),
            LoadBalancer::named("dev-abc123456789"),
            LoadBalancer::named("prod-123456789abc"),
            LoadBalancer::named("qa-abc123456789"),
        ]
    }

    fn names(lbs: &[LoadBalancer]) -> Vec<&str> {
        lbs.iter().map(LoadBalancer::display_name).collect()
    }

    #[test]
    fn test_cluster_load_balancers() {
        let all = fixtures();

        let cases: Vec<(&str, Vec<&str>)> = vec![
            ("prod", vec!["prod-abc123456789", "prod-123456789abc"]),
            ("miss", vec![]),
            ("", vec![]),
        ];

        for (cluster, expected) in cases {
            let result = filter_by_cluster(&all, cluster);
            assert_eq!(names(&result), expected, "cluster {:?}", cluster);
        }
        // input untouched
        assert_eq!(all, fixtures());
    }

    #[test]
    fn test_no_separator_collision() {
        let all = vec![
            LoadBalancer::named("production-x"),
            LoadBalancer::named("prod"),
            LoadBalancer::named("prodx"),
            LoadBalancer::named("prod-"),
            LoadBalancer::named("prod-x"),
        ];
        let result = filter_by_cluster(&all, "prod");
        assert_eq!(names(&result), vec!["prod-", "prod-x"]);
    }

    #[test]
    fn test_unnamed_resources_are_excluded() {
        let all = vec![
            LoadBalancer::default(),
            LoadBalancer::named("prod-a"),
            LoadBalancer::default(),
        ];
        let result = filter_by_cluster(&all, "prod");
        assert_eq!(result.len(), 1);
        assert!(filter_by_cluster(&all, "").is_empty());
    }

    #[test]
    fn test_empty_inventory() {
        let all: Vec<LoadBalancer> = Vec::new();
        assert!(filter_by_cluster(&all, "prod").is_empty());
    }

    #[test]
    fn test_cluster_prefix() {
        assert_eq!(cluster_prefix("prod").as_deref(), Some("prod-"));
        assert_eq!(cluster_prefix(""), None);
        assert!(is_cluster_member(Some("a-b-c"), "a-b"));
        assert!(!is_cluster_member(None, "prod"));
        assert!(!is_cluster_member(Some("anything"), ""));
    }

    #[test]
    fn test_metadata_passed_through() {
        let mut lb = LoadBalancer::named("prod-abc");
        lb.load_balancer_arn = Some("arn:aws:elasticloadbalancing:us-east-1:1:loadbalancer/app/prod-abc/1".to_string());
        lb.security_groups = vec!["sg-1".to_string()];
        let result = filter_by_cluster(std::slice::from_ref(&lb), "prod");
        assert_eq!(result, vec![lb]);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_empty_cluster_matches_nothing(raw in prop::collection::vec(prop::option::of("[a-z-]{0,10}"), 0..10)) {
            let all: Vec<LoadBalancer> = raw
                .into_iter()
                .map(|name| LoadBalancer { load_balancer_name: name, ..Default::default() })
                .collect();
            prop_assert!(filter_by_cluster(&all, "").is_empty());
        }

        #[test]
        fn prop_disjoint_clusters_partition(
            c1 in "[a-z]{1,6}",
            c2 in "[a-z]{1,6}",
            suffixes in prop::collection::vec("[a-z0-9]{1,8}", 0..8),
        ) {
            // Cluster names without the separator can never prefix each other's "<name>-"
            prop_assume!(c1 != c2);
            let all: Vec<LoadBalancer> = suffixes
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    let owner = if i % 2 == 0 { &c1 } else { &c2 };
                    LoadBalancer::named(format!("{owner}-{s}"))
                })
                .collect();

            let first = filter_by_cluster(&all, &c1);
            let second = filter_by_cluster(&all, &c2);
            for lb in &first {
                prop_assert!(!second.contains(lb));
            }
            prop_assert_eq!(first.len() + second.len(), all.len());
        }

        #[test]
        fn prop_filter_preserves_order(suffixes in prop::collection::vec("[a-z0-9]{1,8}", 0..8)) {
            let all: Vec<LoadBalancer> = suffixes
                .iter()
                .map(|s| LoadBalancer::named(format!("prod-{s}")))
                .collect();
            prop_assert_eq!(filter_by_cluster(&all, "prod"), all);
        }
    }
}
