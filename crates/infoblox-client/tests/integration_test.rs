//! Integration tests for the Infoblox client
//!
//! These tests require a reachable Infoblox grid master.
//! Set INFOBLOX_SERVER, INFOBLOX_USERNAME and INFOBLOX_PASSWORD to run.
//! The allocation test also needs network container 10.0.0.0/16 in the default view.

use infoblox_client::{ClientConfig, ExtAttrs, InfobloxClient, ObjectManagerTrait};

fn live_client() -> InfobloxClient {
    let server = std::env::var("INFOBLOX_SERVER")
        .expect("INFOBLOX_SERVER environment variable must be set");
    let username = std::env::var("INFOBLOX_USERNAME")
        .expect("INFOBLOX_USERNAME environment variable must be set");
    let password = std::env::var("INFOBLOX_PASSWORD")
        .expect("INFOBLOX_PASSWORD environment variable must be set");

    InfobloxClient::new(ClientConfig {
        server,
        username,
        password,
        sslverify: false,
        cmp_type: "terraform_test".to_string(),
        ..ClientConfig::default()
    })
    .expect("Failed to create client")
}

#[tokio::test]
#[ignore] // Requires running Infoblox appliance
async fn test_validate_credentials() {
    let client = live_client();
    client.validate_credentials().await.expect("credentials rejected");
}

#[tokio::test]
#[ignore]
async fn test_create_find_and_delete_network() {
    let client = live_client();

    let network = client
        .create_network("default", "10.10.0.0/24", "demo-network", "test", &ExtAttrs::new())
        .await
        .expect("Failed to create network");
    println!("Created network: {}", network.reference);

    let found = client
        .get_network("default", "10.10.0.0/24")
        .await
        .expect("Failed to search networks");
    assert_eq!(found.map(|n| n.reference), Some(network.reference.clone()));

    client.delete_network(&network.reference).await.expect("Failed to delete network");
    let err = client.get_network_by_ref(&network.reference).await.unwrap_err();
    assert!(err.is_not_found(), "expected not found, got {:?}", err);
}

#[tokio::test]
#[ignore]
async fn test_allocate_two_subnets() {
    let client = live_client();

    let first = client
        .allocate_network("default", "10.0.0.0/16", 24, "demo-network", "test", &ExtAttrs::new())
        .await
        .expect("Failed to allocate first network");
    let second = client
        .allocate_network("default", "10.0.0.0/16", 24, "demo-network", "test", &ExtAttrs::new())
        .await
        .expect("Failed to allocate second network");
    println!("Allocated {} and {}", first.network, second.network);
    assert_ne!(first.network, second.network);

    let _ = client.delete_network(&first.reference).await;
    let _ = client.delete_network(&second.reference).await;
}

#[tokio::test]
#[ignore]
async fn test_srv_record_round_trip() {
    let client = live_client();

    let record = client
        .create_srv_record("default", "demo1.aa.com", 17357, 42, "something.demo", 10, "test", &ExtAttrs::new())
        .await
        .expect("Failed to create SRV record");
    assert_eq!(record.name, "demo1.aa.com");

    let updated = client.update_srv_record(&record.reference, 17358).await.expect("Failed to update");
    assert_eq!(updated.priority, 42);
    assert_eq!(updated.weight, 10);

    let _ = client.delete_srv_record(&updated.reference).await;
}
