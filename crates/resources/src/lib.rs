//! Infoblox Provider Resource Definitions
//!
//! Typed configuration and state for every resource the provider manages,
//! the attribute schemas the declarative engine sees, and the lifecycle
//! states shared by all resources.
//!
//! Configuration arrives as a flat JSON object. It is decoded once, at the
//! boundary, into a per-resource struct and validated there; adapters never
//! touch untyped maps.

pub mod error;
pub mod lifecycle;
pub mod network;
pub mod schema;
pub mod srv_record;

pub use error::ValidationError;
pub use lifecycle::*;
pub use network::*;
pub use schema::*;
pub use srv_record::*;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decode a flat configuration or state object against `schema`
///
/// Top-level `null`s are treated as absent so optional fields fall back to their
/// defaults. Keys the schema does not declare are rejected.
pub fn decode<T: DeserializeOwned>(schema: &ResourceSchema, value: Value) -> Result<T, ValidationError> {
    let Value::Object(mut map) = value else {
        return Err(ValidationError::NotAnObject(schema.type_name.to_string()));
    };
    map.retain(|_, v| !v.is_null());

    if let Some(unknown) = map.keys().find(|k| schema.attribute(k).is_none()) {
        return Err(ValidationError::UnknownField {
            resource: schema.type_name.to_string(),
            field: unknown.clone(),
        });
    }

    serde_json::from_value(Value::Object(map)).map_err(|e| ValidationError::Malformed {
        resource: schema.type_name.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_rejects_non_object() {
        let err = decode::<NetworkConfig>(&network_schema(), json!(["cidr"])).unwrap_err();
        assert!(matches!(err, ValidationError::NotAnObject(_)));
    }

    #[test]
    fn test_decode_rejects_unknown_field() {
        let err = decode::<NetworkConfig>(
            &network_schema(),
            json!({
                "network_view_name": "default",
                "cidr": "10.10.0.0/24",
                "network_name": "demo-network",
                "tenant_id": "foo",
                "netmask": "255.255.255.0"
            }),
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::UnknownField { ref field, .. } if field == "netmask"));
    }

    #[test]
    fn test_decode_reports_missing_field() {
        let err = decode::<SrvRecordConfig>(
            &srv_record_schema(),
            json!({"record_name": "demo1", "port": 1, "priority": 1, "weight": 1, "tenant_id": "t"}),
        )
        .unwrap_err();
        assert!(err.to_string().contains("zone"), "{}", err);
    }
}
