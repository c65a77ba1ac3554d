//! Integration tests for the ELBv2 client
//!
//! These tests require a reachable ELBv2 endpoint (normally a SigV4 signing proxy).
//! Set ELBV2_ENDPOINT and optionally CLUSTER_NAME to run.

use elbv2_client::{cluster_load_balancers, filter_by_cluster, Elbv2Client, Elbv2ClientTrait};

fn client() -> Elbv2Client {
    let endpoint = std::env::var("ELBV2_ENDPOINT")
        .unwrap_or_else(|_| "http://localhost:8080".to_string());
    Elbv2Client::new(endpoint).expect("Failed to create client")
}

#[tokio::test]
#[ignore] // Requires a reachable ELBv2 endpoint
async fn test_list_all_load_balancers() {
    let client = client();

    let all = client.list_all_load_balancers().await
        .expect("Failed to list load balancers");

    println!("Found {} load balancers", all.len());
}

#[tokio::test]
#[ignore]
async fn test_small_pages_match_full_listing() {
    let full = client().list_all_load_balancers().await
        .expect("Failed to list load balancers");
    let paged = client().with_page_size(1).list_all_load_balancers().await
        .expect("Failed to list load balancers page by page");

    assert_eq!(full.len(), paged.len());
}

#[tokio::test]
#[ignore]
async fn test_cluster_load_balancers() {
    let cluster = std::env::var("CLUSTER_NAME").unwrap_or_else(|_| "prod".to_string());
    let client = client();

    let all = client.list_all_load_balancers().await
        .expect("Failed to list load balancers");
    let members = cluster_load_balancers(&client, &cluster).await
        .expect("Failed to list cluster load balancers");

    assert_eq!(members, filter_by_cluster(&all, &cluster));
    for lb in &members {
        let arn = lb.load_balancer_arn.as_deref().expect("load balancer has an ARN");
        let attributes = client.describe_load_balancer_attributes(arn).await
            .expect("Failed to describe attributes");
        println!("{}: {} attributes", lb.display_name(), attributes.len());
    }
}
