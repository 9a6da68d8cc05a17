//! Test utilities for unit testing adapters and the plugin server
//!
//! This module provides helpers for creating test configurations and a
//! provider wired to the in-memory object manager.

use crate::config::ProviderConfig;
use crate::server::Provider;
use infoblox_client::MockObjectManager;
use serde_json::{Value, json};
use std::sync::Arc;

/// Mock object manager with a `10.0.0.0/16` container in the default view
pub fn mock_with_container() -> MockObjectManager {
    let mock = MockObjectManager::new("http://test-infoblox/wapi/v2.5");
    mock.add_network_container("default", "10.0.0.0/16");
    mock
}

/// Configuration of a fixed network
pub fn fixed_network_config(cidr: &str) -> Value {
    json!({
        "network_view_name": "default",
        "network_name": "demo-network",
        "cidr": cidr,
        "tenant_id": "foo"
    })
}

/// Configuration allocating a `/prefix_len` from `10.0.0.0/16`
pub fn allocated_network_config(prefix_len: u8) -> Value {
    json!({
        "network_view_name": "default",
        "network_name": "demo-network",
        "cidr": "10.0.0.0/16",
        "tenant_id": "foo",
        "allocate_prefix_len": prefix_len
    })
}

/// Configuration of `demo1.aa.com`
pub fn srv_record_config() -> Value {
    json!({
        "record_name": "demo1",
        "zone": "aa.com",
        "port": 17357,
        "priority": 42,
        "weight": 10,
        "target": "something.demo",
        "tenant_id": "test"
    })
}

/// Provider configuration good enough to pass validation
pub fn test_provider_config() -> ProviderConfig {
    ProviderConfig {
        server: "infoblox.test".to_string(),
        username: "admin".to_string(),
        password: "secret".to_string(),
        ..ProviderConfig::default()
    }
}

/// Provider already configured against `mock`
pub fn configured_provider(mock: &MockObjectManager) -> Arc<Provider> {
    Arc::new(Provider::with_client(test_provider_config(), Arc::new(mock.clone())))
}
