//! Infoblox WAPI models
//!
//! These models match the WAPI object schemas for `network` and `record:srv`.
//! Only the fields requested through `_return_fields` are modelled.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Extensible attribute name carrying the cloud-management-platform type
pub const EA_CMP_TYPE: &str = "CMP Type";
/// Extensible attribute name carrying the tenant identifier
pub const EA_TENANT_ID: &str = "Tenant ID";
/// Extensible attribute name carrying a network's display name
pub const EA_NETWORK_NAME: &str = "Network Name";

/// Fields returned for `network` objects
pub const NETWORK_RETURN_FIELDS: &str = "network,network_view,comment,extattrs";
/// Fields returned for `record:srv` objects
pub const SRV_RECORD_RETURN_FIELDS: &str = "name,port,priority,weight,target,view,extattrs";

/// Opaque managed object reference (`_ref`) assigned by the appliance
///
/// Format: `<object type>/<opaque id>:<human readable suffix>`,
/// e.g. `network/ZG5zLm5ldHdvcmskMTAuMTAuMC4wLzI0LzA:10.10.0.0/24/default`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectRef(String);

impl ObjectRef {
    /// Wrap a reference string returned by the appliance or persisted in state
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// The raw reference string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The WAPI object type the reference points at (`network`, `record:srv`, ...)
    pub fn object_type(&self) -> &str {
        self.0.split_once('/').map_or("", |(object_type, _)| object_type)
    }

    /// True if the reference is empty (resource never created or already deleted)
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ObjectRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A single extensible attribute value
///
/// WAPI wraps every value in an object (`{"value": ...}`); the value itself may be
/// a string, integer, or list depending on the attribute definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EaValue {
    pub value: serde_json::Value,
}

impl EaValue {
    /// String-typed extensible attribute value
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            value: serde_json::Value::String(value.into()),
        }
    }

    /// The value as a string, if it is one
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_str()
    }
}

/// Extensible attributes keyed by attribute name
pub type ExtAttrs = BTreeMap<String, EaValue>;

/// Build an [`ExtAttrs`] map from string pairs
pub fn ext_attrs_from_strings<'a, I>(pairs: I) -> ExtAttrs
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.clone(), EaValue::string(v.clone())))
        .collect()
}

/// Network object (`network`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    #[serde(rename = "_ref")]
    pub reference: ObjectRef,
    /// Network in CIDR notation (e.g. "10.10.0.0/24")
    pub network: String,
    pub network_view: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default)]
    pub extattrs: ExtAttrs,
}

impl Network {
    /// Value of the `Network Name` extensible attribute
    pub fn name(&self) -> Option<&str> {
        self.extattrs.get(EA_NETWORK_NAME).and_then(EaValue::as_str)
    }
}

/// SRV record object (`record:srv`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SrvRecord {
    #[serde(rename = "_ref")]
    pub reference: ObjectRef,
    /// Fully-qualified record name
    pub name: String,
    pub port: u16,
    pub priority: u16,
    pub weight: u16,
    pub target: String,
    #[serde(default)]
    pub view: String,
    #[serde(default)]
    pub extattrs: ExtAttrs,
}

/// Request body for creating a network
///
/// `network` is either a CIDR or a `func:nextavailablenetwork:...` expression.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkRequest {
    pub network_view: String,
    pub network: String,
    pub extattrs: ExtAttrs,
}

/// Request body for updating a network's mutable fields
#[derive(Debug, Clone, Serialize)]
pub struct NetworkUpdate {
    pub extattrs: ExtAttrs,
}

/// Request body for creating an SRV record
#[derive(Debug, Clone, Serialize)]
pub struct SrvRecordRequest {
    pub name: String,
    pub port: u16,
    pub priority: u16,
    pub weight: u16,
    pub target: String,
    pub view: String,
    pub extattrs: ExtAttrs,
}

/// Request body for updating an SRV record
#[derive(Debug, Clone, Serialize)]
pub struct SrvRecordUpdate {
    pub port: u16,
}

/// Error body returned by WAPI on non-2xx responses
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WapiErrorBody {
    #[serde(rename = "Error", default)]
    pub error: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub text: String,
}

impl WapiErrorBody {
    /// Most specific human readable message in the body
    pub fn message(&self) -> &str {
        if self.text.is_empty() { &self.error } else { &self.text }
    }
}

/// Build the `func:nextavailablenetwork` expression for a container allocation
pub fn next_available_network_expr(container_cidr: &str, network_view: &str, prefix_len: u8) -> String {
    format!("func:nextavailablenetwork:{},{},{}", container_cidr, network_view, prefix_len)
}
