//! Plugin protocol types.
//!
//! One JSON object per line in each direction. Requests carry an `id` that is
//! echoed on the matching response so the engine can pipeline calls.

use crate::error::ProviderError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Line printed once on stdout before the first response
pub const HANDSHAKE: &str = "INFOBLOX_PROVIDER|1|stdio";

/// Request from the engine.
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

/// Response to one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

/// Error payload of a failed request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

/// A present `result` is success even when it is `null`
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl Response {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Value, error: &ProviderError) -> Self {
        Self {
            id,
            result: None,
            error: Some(ErrorBody {
                kind: error.kind().to_string(),
                message: error.to_string(),
            }),
        }
    }
}

/// Parameters of the per-resource methods.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceParams {
    pub type_name: String,
    #[serde(default)]
    pub config: Value,
    #[serde(default)]
    pub state: Value,
    #[serde(default)]
    pub prior_state: Value,
}

/// Parameters of `configure`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigureParams {
    #[serde(default)]
    pub config: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_delete_success_keeps_null_result() {
        let line = serde_json::to_string(&Response::success(json!(7), Value::Null)).unwrap();
        assert_eq!(line, r#"{"id":7,"result":null}"#);
    }

    #[test]
    fn test_null_result_reads_back_as_success() {
        let response: Response = serde_json::from_str(r#"{"id":2,"result":null}"#).unwrap();
        assert_eq!(response, Response::success(json!(2), Value::Null));

        let response: Response =
            serde_json::from_str(r#"{"id":3,"error":{"kind":"protocol","message":"bad"}}"#).unwrap();
        assert_eq!(response.result, None);
        assert_eq!(response.error.unwrap().kind, "protocol");
    }

    #[test]
    fn test_error_response_carries_kind() {
        let response = Response::error(json!(1), &ProviderError::NotConfigured);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value, json!({"id": 1, "error": {"kind": "not_configured", "message": "Provider is not configured"}}));
    }

    #[test]
    fn test_request_params_default_to_null() {
        let request: Request = serde_json::from_str(r#"{"id": 3, "method": "get_schema"}"#).unwrap();
        assert_eq!(request.method, "get_schema");
        assert!(request.params.is_null());
    }
}
