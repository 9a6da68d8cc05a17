//! Resource registry
//!
//! Maps resource type names to their adapters. The set of resource types is
//! closed, so dispatch is a plain match rather than a table of trait objects.

use crate::adapter::{self, NetworkAdapter, SrvRecordAdapter};
use crate::error::ProviderError;
use infoblox_client::ObjectManagerTrait;
use resources::{NETWORK_TYPE_NAME, ResourceSchema, SRV_RECORD_TYPE_NAME, network_schema, srv_record_schema};
use serde_json::Value;

/// Resource types served by this provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Network,
    SrvRecord,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 2] = [ResourceKind::Network, ResourceKind::SrvRecord];

    pub fn type_name(self) -> &'static str {
        match self {
            ResourceKind::Network => NETWORK_TYPE_NAME,
            ResourceKind::SrvRecord => SRV_RECORD_TYPE_NAME,
        }
    }

    pub fn from_type_name(name: &str) -> Result<Self, ProviderError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.type_name() == name)
            .ok_or_else(|| ProviderError::UnknownResource(name.to_string()))
    }

    pub fn schema(self) -> ResourceSchema {
        match self {
            ResourceKind::Network => network_schema(),
            ResourceKind::SrvRecord => srv_record_schema(),
        }
    }

    pub fn validate(self, config: Value) -> Result<(), ProviderError> {
        match self {
            ResourceKind::Network => adapter::validate(&NetworkAdapter, config),
            ResourceKind::SrvRecord => adapter::validate(&SrvRecordAdapter, config),
        }
    }

    /// Attributes whose change forces replacement
    pub fn plan(self, prior: &Value, config: Value) -> Result<Vec<&'static str>, ProviderError> {
        match self {
            ResourceKind::Network => adapter::plan(&NetworkAdapter, prior, config),
            ResourceKind::SrvRecord => adapter::plan(&SrvRecordAdapter, prior, config),
        }
    }

    pub async fn create(self, client: &dyn ObjectManagerTrait, config: Value) -> Result<Value, ProviderError> {
        match self {
            ResourceKind::Network => adapter::create(&NetworkAdapter, client, config).await,
            ResourceKind::SrvRecord => adapter::create(&SrvRecordAdapter, client, config).await,
        }
    }

    pub async fn read(self, client: &dyn ObjectManagerTrait, state: Value) -> Result<Option<Value>, ProviderError> {
        match self {
            ResourceKind::Network => adapter::read(&NetworkAdapter, client, state).await,
            ResourceKind::SrvRecord => adapter::read(&SrvRecordAdapter, client, state).await,
        }
    }

    pub async fn update(self, client: &dyn ObjectManagerTrait, state: Value, config: Value) -> Result<Value, ProviderError> {
        match self {
            ResourceKind::Network => adapter::update(&NetworkAdapter, client, state, config).await,
            ResourceKind::SrvRecord => adapter::update(&SrvRecordAdapter, client, state, config).await,
        }
    }

    pub async fn delete(self, client: &dyn ObjectManagerTrait, state: Value) -> Result<(), ProviderError> {
        match self {
            ResourceKind::Network => adapter::delete(&NetworkAdapter, client, state).await,
            ResourceKind::SrvRecord => adapter::delete(&SrvRecordAdapter, client, state).await,
        }
    }
}
