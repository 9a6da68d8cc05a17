//! Mock object manager for unit testing
//!
//! This module provides an in-memory implementation of `ObjectManagerTrait` that
//! can be used in unit tests without a running Infoblox appliance.
//!
//! The mock is organized into domain-specific modules:
//! - `network.rs` - networks, network containers, next-available-network allocation
//! - `record.rs` - SRV records
//! - `helpers.rs` - reference generation and lock handling

mod helpers;
mod network;
mod record;

use crate::error::InfobloxError;
use crate::models::*;
use crate::object_manager_trait::ObjectManagerTrait;
use helpers::lock;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock object manager for testing
///
/// Stores objects in memory keyed by reference. Cloning shares the same store,
/// so a test can keep a handle while the code under test owns another.
#[derive(Clone, Debug)]
pub struct MockObjectManager {
    pub(crate) base_url: String,
    pub(crate) cmp_type: String,
    pub(crate) networks: Arc<Mutex<HashMap<ObjectRef, Network>>>,
    /// Registered network containers as (network view, CIDR)
    pub(crate) containers: Arc<Mutex<Vec<(String, String)>>>,
    pub(crate) srv_records: Arc<Mutex<HashMap<ObjectRef, SrvRecord>>>,
    /// Error returned by the next call, for failure-path tests
    pub(crate) next_error: Arc<Mutex<Option<InfobloxError>>>,
    // Counter for generating references
    pub(crate) next_id: Arc<Mutex<u64>>,
}

impl MockObjectManager {
    /// Create a new mock object manager
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            cmp_type: "Terraform".to_string(),
            networks: Arc::new(Mutex::new(HashMap::new())),
            containers: Arc::new(Mutex::new(Vec::new())),
            srv_records: Arc::new(Mutex::new(HashMap::new())),
            next_error: Arc::new(Mutex::new(None)),
            next_id: Arc::new(Mutex::new(1)),
        }
    }

    /// Register a network container allocations can be carved from (for test setup)
    pub fn add_network_container(&self, network_view: &str, cidr: &str) {
        lock(&self.containers).push((network_view.to_string(), cidr.to_string()));
    }

    /// Make the next object-manager call fail with `error` (for test setup)
    pub fn fail_next(&self, error: InfobloxError) {
        *lock(&self.next_error) = Some(error);
    }

    /// Number of networks currently stored
    pub fn network_count(&self) -> usize {
        lock(&self.networks).len()
    }

    /// Number of SRV records currently stored
    pub fn srv_record_count(&self) -> usize {
        lock(&self.srv_records).len()
    }

    /// Generate next ID
    pub(crate) fn next_id(&self) -> u64 {
        let mut id = lock(&self.next_id);
        let current = *id;
        *id += 1;
        current
    }

    /// Return the injected failure, if any
    pub(crate) fn take_injected_error(&self) -> Result<(), InfobloxError> {
        match lock(&self.next_error).take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl ObjectManagerTrait for MockObjectManager {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn validate_credentials(&self) -> Result<(), InfobloxError> {
        self.take_injected_error()
    }

    // IPAM Operations - delegated to network module
    async fn create_network(&self, network_view: &str, cidr: &str, network_name: &str, tenant_id: &str, ea: &ExtAttrs) -> Result<Network, InfobloxError> {
        network::create_network(self, network_view, cidr, network_name, tenant_id, ea)
    }

    async fn allocate_network(&self, network_view: &str, container_cidr: &str, prefix_len: u8, network_name: &str, tenant_id: &str, ea: &ExtAttrs) -> Result<Network, InfobloxError> {
        network::allocate_network(self, network_view, container_cidr, prefix_len, network_name, tenant_id, ea)
    }

    async fn get_network(&self, network_view: &str, cidr: &str) -> Result<Option<Network>, InfobloxError> {
        network::get_network(self, network_view, cidr)
    }

    async fn get_network_by_ref(&self, reference: &ObjectRef) -> Result<Network, InfobloxError> {
        network::get_network_by_ref(self, reference)
    }

    async fn update_network(&self, reference: &ObjectRef, network_name: &str, tenant_id: &str, ea: &ExtAttrs) -> Result<Network, InfobloxError> {
        network::update_network(self, reference, network_name, tenant_id, ea)
    }

    async fn delete_network(&self, reference: &ObjectRef) -> Result<ObjectRef, InfobloxError> {
        network::delete_network(self, reference)
    }

    // DNS Operations - delegated to record module
    async fn create_srv_record(&self, dns_view: &str, name: &str, port: u16, priority: u16, target: &str, weight: u16, tenant_id: &str, ea: &ExtAttrs) -> Result<SrvRecord, InfobloxError> {
        record::create_srv_record(self, dns_view, name, port, priority, target, weight, tenant_id, ea)
    }

    async fn get_srv_record_by_ref(&self, reference: &ObjectRef) -> Result<SrvRecord, InfobloxError> {
        record::get_srv_record_by_ref(self, reference)
    }

    async fn update_srv_record(&self, reference: &ObjectRef, port: u16) -> Result<SrvRecord, InfobloxError> {
        record::update_srv_record(self, reference, port)
    }

    async fn delete_srv_record(&self, reference: &ObjectRef) -> Result<ObjectRef, InfobloxError> {
        record::delete_srv_record(self, reference)
    }
}
