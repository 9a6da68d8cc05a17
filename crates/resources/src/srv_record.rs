//! `infoblox_srv_record` resource

use crate::error::ValidationError;
use crate::schema::{Attribute, AttributeType, ResourceSchema};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;

/// Resource type name of the SRV record resource
pub const SRV_RECORD_TYPE_NAME: &str = "infoblox_srv_record";

fn default_view() -> String {
    "default".to_string()
}

/// Desired state of an SRV record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrvRecordConfig {
    /// Record label, joined with `zone` into the fully-qualified name
    pub record_name: String,

    /// Zone the record is created in
    pub zone: String,

    pub port: u16,
    pub priority: u16,
    pub weight: u16,

    /// Target host of the service
    #[serde(default = "default_view")]
    pub target: String,

    /// DNS view under which the zone has been created
    #[serde(default = "default_view")]
    pub dns_view: String,

    /// Tenant stamped into the `Tenant ID` extensible attribute
    pub tenant_id: String,

    /// Additional extensible attributes, passed through untouched
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extensible_attributes: BTreeMap<String, String>,
}

impl SrvRecordConfig {
    /// Fully-qualified record name: `record_name.zone`
    pub fn fqdn(&self) -> String {
        format!("{}.{}", self.record_name, self.zone)
    }

    /// Validate values beyond presence and primitive type
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("record_name", &self.record_name),
            ("zone", &self.zone),
            ("target", &self.target),
            ("dns_view", &self.dns_view),
            ("tenant_id", &self.tenant_id),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::invalid(SRV_RECORD_TYPE_NAME, field, "must not be empty"));
            }
        }
        if self.record_name.ends_with('.') || self.zone.starts_with('.') {
            return Err(ValidationError::invalid(
                SRV_RECORD_TYPE_NAME,
                "record_name",
                format!("'{}' would produce an empty label", self.fqdn()),
            ));
        }
        Ok(())
    }
}

/// Persisted state of an SRV record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrvRecordState {
    /// Managed object reference
    pub id: String,

    #[serde(flatten)]
    pub config: SrvRecordConfig,

    /// Fully-qualified record name on the appliance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fqdn: Option<String>,
}

/// Schema of the `infoblox_srv_record` resource
pub fn srv_record_schema() -> ResourceSchema {
    ResourceSchema {
        type_name: SRV_RECORD_TYPE_NAME,
        version: 0,
        description: "An SRV record in an Infoblox DNS view.",
        attributes: vec![
            Attribute::required("record_name", AttributeType::String, "The name of the record.").force_new(),
            Attribute::required("zone", AttributeType::String, "Zone under which record has to be created.").force_new(),
            Attribute::required("port", AttributeType::Int, "The port of the service."),
            Attribute::required("priority", AttributeType::Int, "The priority of the record."),
            Attribute::required("weight", AttributeType::Int, "The weighting of the record."),
            Attribute::optional("target", AttributeType::String, "The target of the record.").with_default(json!("default")),
            Attribute::optional("dns_view", AttributeType::String, "Dns View under which the zone has been created.")
                .with_default(json!("default"))
                .force_new(),
            Attribute::required("tenant_id", AttributeType::String, "Unique identifier of your tenant in cloud.").force_new(),
            // Updates only carry the port, so attribute changes need a new record
            Attribute::optional("extensible_attributes", AttributeType::StringMap, "Additional extensible attributes attached to the record.")
                .with_default(json!({}))
                .force_new(),
            Attribute::computed("id", AttributeType::String, "Infoblox object reference of the record."),
            Attribute::computed("fqdn", AttributeType::String, "Fully-qualified name of the record."),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode;

    #[test]
    fn test_decode_applies_defaults() {
        let config: SrvRecordConfig = decode(
            &srv_record_schema(),
            json!({
                "record_name": "demo1",
                "zone": "aa.com",
                "port": 17357,
                "priority": 42,
                "weight": 10,
                "tenant_id": "test",
                "target": null
            }),
        )
        .unwrap();
        assert_eq!(config.target, "default");
        assert_eq!(config.dns_view, "default");
        assert_eq!(config.fqdn(), "demo1.aa.com");
        config.validate().unwrap();
    }

    #[test]
    fn test_decode_rejects_out_of_range_port() {
        let err = decode::<SrvRecordConfig>(
            &srv_record_schema(),
            json!({
                "record_name": "demo1",
                "zone": "aa.com",
                "port": 70000,
                "priority": 42,
                "weight": 10,
                "tenant_id": "test"
            }),
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::Malformed { .. }));
    }

    #[test]
    fn test_validate_rejects_empty_labels() {
        let mut config: SrvRecordConfig = decode(
            &srv_record_schema(),
            json!({
                "record_name": "demo1.",
                "zone": "aa.com",
                "port": 1,
                "priority": 1,
                "weight": 1,
                "tenant_id": "test"
            }),
        )
        .unwrap();
        assert!(config.validate().is_err());

        config.record_name = "demo1".to_string();
        config.zone = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_identity_fields_force_replacement() {
        let schema = srv_record_schema();
        let prior = json!({"record_name": "demo1", "zone": "aa.com", "port": 1, "priority": 1, "weight": 1, "tenant_id": "t"});
        let mut proposed = prior.clone();
        proposed["port"] = json!(2);
        proposed["priority"] = json!(5);
        assert!(schema.requires_replace(&prior, &proposed).is_empty());

        proposed["zone"] = json!("bb.com");
        assert_eq!(schema.requires_replace(&prior, &proposed), vec!["zone"]);
    }

    #[test]
    fn test_extensible_attribute_change_forces_replacement() {
        let schema = srv_record_schema();
        let prior = json!({"record_name": "demo1", "zone": "aa.com", "port": 1, "priority": 1, "weight": 1, "tenant_id": "t"});
        let mut proposed = prior.clone();
        proposed["extensible_attributes"] = json!({});
        assert!(schema.requires_replace(&prior, &proposed).is_empty());

        proposed["extensible_attributes"] = json!({"Site": "dc2"});
        assert_eq!(schema.requires_replace(&prior, &proposed), vec!["extensible_attributes"]);
    }
}
