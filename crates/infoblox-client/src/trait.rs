//! ObjectManagerTrait for mocking
//!
//! This trait abstracts the Infoblox object manager so resource adapters can be
//! exercised against an in-memory mock. The concrete `InfobloxClient` implements
//! it over WAPI; `MockObjectManager` implements it in memory.

use crate::error::InfobloxError;
use crate::models::*;

/// Trait for Infoblox object-manager operations
///
/// Every create call stamps the object-manager extensible attributes
/// (`CMP Type`, `Tenant ID`) on top of the caller supplied ones.
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait ObjectManagerTrait: Send + Sync {
    /// Get the WAPI base URL
    fn base_url(&self) -> &str;

    /// Check credentials and reachability
    async fn validate_credentials(&self) -> Result<(), InfobloxError>;

    // IPAM Operations
    async fn create_network(&self, network_view: &str, cidr: &str, network_name: &str, tenant_id: &str, ea: &ExtAttrs) -> Result<Network, InfobloxError>;
    async fn allocate_network(&self, network_view: &str, container_cidr: &str, prefix_len: u8, network_name: &str, tenant_id: &str, ea: &ExtAttrs) -> Result<Network, InfobloxError>;
    async fn get_network(&self, network_view: &str, cidr: &str) -> Result<Option<Network>, InfobloxError>;
    async fn get_network_by_ref(&self, reference: &ObjectRef) -> Result<Network, InfobloxError>;
    async fn update_network(&self, reference: &ObjectRef, network_name: &str, tenant_id: &str, ea: &ExtAttrs) -> Result<Network, InfobloxError>;
    async fn delete_network(&self, reference: &ObjectRef) -> Result<ObjectRef, InfobloxError>;

    // DNS Operations
    #[allow(clippy::too_many_arguments, reason = "mirrors the record:srv field set")]
    async fn create_srv_record(&self, dns_view: &str, name: &str, port: u16, priority: u16, target: &str, weight: u16, tenant_id: &str, ea: &ExtAttrs) -> Result<SrvRecord, InfobloxError>;
    async fn get_srv_record_by_ref(&self, reference: &ObjectRef) -> Result<SrvRecord, InfobloxError>;
    async fn update_srv_record(&self, reference: &ObjectRef, port: u16) -> Result<SrvRecord, InfobloxError>;
    async fn delete_srv_record(&self, reference: &ObjectRef) -> Result<ObjectRef, InfobloxError>;
}

/// Build the extensible attribute set the object manager attaches on create
pub fn object_manager_ext_attrs(cmp_type: &str, tenant_id: &str, user: &ExtAttrs) -> ExtAttrs {
    let mut ea = user.clone();
    ea.insert(EA_CMP_TYPE.to_string(), EaValue::string(cmp_type));
    ea.insert(EA_TENANT_ID.to_string(), EaValue::string(tenant_id));
    ea
}

/// Check a reference points at the expected WAPI object type
pub fn expect_object_type(reference: &ObjectRef, object_type: &str) -> Result<(), InfobloxError> {
    if reference.object_type() == object_type {
        Ok(())
    } else {
        Err(InfobloxError::InvalidRequest(format!(
            "reference '{}' is not a {} object",
            reference, object_type
        )))
    }
}
