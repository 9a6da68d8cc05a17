//! `infoblox_network` resource
//!
//! Claims a fixed network, or allocates the next free subnet of
//! `allocate_prefix_len` from the container named by `cidr`.

use crate::error::ValidationError;
use crate::schema::{Attribute, AttributeType, ResourceSchema};
use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Resource type name of the network resource
pub const NETWORK_TYPE_NAME: &str = "infoblox_network";

/// Desired state of an Infoblox network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Network view the network lives in
    pub network_view_name: String,

    /// Network CIDR, or the container CIDR when `allocate_prefix_len` is set
    pub cidr: String,

    /// Display name stored in the `Network Name` extensible attribute
    pub network_name: String,

    /// Tenant stamped into the `Tenant ID` extensible attribute
    pub tenant_id: String,

    /// Allocate the next available subnet of this prefix length inside `cidr`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allocate_prefix_len: Option<u8>,

    /// Additional extensible attributes, passed through untouched
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extensible_attributes: BTreeMap<String, String>,
}

impl NetworkConfig {
    /// Validate values beyond presence and primitive type
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("network_view_name", &self.network_view_name),
            ("network_name", &self.network_name),
            ("tenant_id", &self.tenant_id),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::invalid(NETWORK_TYPE_NAME, field, "must not be empty"));
            }
        }

        let net: IpNet = self
            .cidr
            .parse()
            .map_err(|e| ValidationError::invalid(NETWORK_TYPE_NAME, "cidr", format!("'{}': {}", self.cidr, e)))?;

        if let Some(prefix_len) = self.allocate_prefix_len {
            if prefix_len <= net.prefix_len() || prefix_len > net.max_prefix_len() {
                return Err(ValidationError::invalid(
                    NETWORK_TYPE_NAME,
                    "allocate_prefix_len",
                    format!(
                        "/{} must be longer than container /{} and at most /{}",
                        prefix_len,
                        net.prefix_len(),
                        net.max_prefix_len()
                    ),
                ));
            }
        }
        Ok(())
    }
}

/// Persisted state of an Infoblox network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkState {
    /// Managed object reference
    pub id: String,

    #[serde(flatten)]
    pub config: NetworkConfig,

    /// Network actually held on the appliance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allocated_cidr: Option<String>,
}

/// Schema of the `infoblox_network` resource
pub fn network_schema() -> ResourceSchema {
    ResourceSchema {
        type_name: NETWORK_TYPE_NAME,
        version: 0,
        description: "A network claimed or allocated in an Infoblox network view.",
        attributes: vec![
            Attribute::required("network_view_name", AttributeType::String, "Network view in which the network is created.").force_new(),
            Attribute::required("cidr", AttributeType::String, "Network CIDR, or the container CIDR when allocate_prefix_len is set.").force_new(),
            Attribute::required("network_name", AttributeType::String, "Name of the network, stored in the 'Network Name' extensible attribute."),
            Attribute::required("tenant_id", AttributeType::String, "Unique identifier of your tenant in cloud.").force_new(),
            Attribute::optional("allocate_prefix_len", AttributeType::Int, "Allocate the next available network of this prefix length from the container given in cidr.").force_new(),
            Attribute::optional("extensible_attributes", AttributeType::StringMap, "Additional extensible attributes attached to the network."),
            Attribute::computed("id", AttributeType::String, "Infoblox object reference of the network."),
            Attribute::computed("allocated_cidr", AttributeType::String, "Network CIDR held on the appliance."),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode;
    use serde_json::json;

    fn config() -> NetworkConfig {
        NetworkConfig {
            network_view_name: "default".to_string(),
            cidr: "10.10.0.0/24".to_string(),
            network_name: "demo-network".to_string(),
            tenant_id: "foo".to_string(),
            allocate_prefix_len: None,
            extensible_attributes: BTreeMap::new(),
        }
    }

    #[test]
    fn test_decode_fixed_network() {
        let decoded: NetworkConfig = decode(
            &network_schema(),
            json!({
                "network_view_name": "default",
                "network_name": "demo-network",
                "cidr": "10.10.0.0/24",
                "tenant_id": "foo",
                "allocate_prefix_len": null
            }),
        )
        .unwrap();
        assert_eq!(decoded, config());
        assert_eq!(decoded.allocate_prefix_len, None);
        decoded.validate().unwrap();
    }

    #[test]
    fn test_decode_rejects_string_prefix_len() {
        let err = decode::<NetworkConfig>(
            &network_schema(),
            json!({
                "network_view_name": "default",
                "network_name": "demo-network",
                "cidr": "10.0.0.0/16",
                "tenant_id": "foo",
                "allocate_prefix_len": "24"
            }),
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::Malformed { .. }));
    }

    #[test]
    fn test_validate_allocation_prefix() {
        let mut c = config();
        c.cidr = "10.0.0.0/16".to_string();
        c.allocate_prefix_len = Some(24);
        c.validate().unwrap();

        c.allocate_prefix_len = Some(16);
        assert!(c.validate().is_err());
        c.allocate_prefix_len = Some(33);
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_validate_bad_cidr_and_empty_fields() {
        let mut c = config();
        c.cidr = "10.10.0.0".to_string();
        let err = c.validate().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { ref field, .. } if field == "cidr"));

        let mut c = config();
        c.tenant_id = " ".to_string();
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_state_round_trips_flat() {
        let state = NetworkState {
            id: "network/abc:10.10.0.0/24/default".to_string(),
            config: config(),
            allocated_cidr: Some("10.10.0.0/24".to_string()),
        };
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["cidr"], "10.10.0.0/24");
        assert_eq!(value["id"], "network/abc:10.10.0.0/24/default");

        let decoded: NetworkState = decode(&network_schema(), value).unwrap();
        assert_eq!(decoded, state);
    }
}
