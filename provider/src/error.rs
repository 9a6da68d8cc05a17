//! Provider error types.
//!
//! Every remote failure is wrapped with the resource type and the remote
//! identifier it concerned, then classified for the engine:
//! validation, remote rejection, unreachable appliance, or not found.

use infoblox_client::InfobloxError;
use resources::{Operation, ResourceState, ValidationError};
use thiserror::Error;

/// Errors surfaced to the declarative engine.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Configuration failed validation; no remote call was made
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Identity attributes changed; the engine must delete and recreate
    #[error("{resource}: changing {fields:?} requires replacing the resource")]
    RequiresReplacement {
        resource: &'static str,
        fields: Vec<&'static str>,
    },

    /// The appliance answered with an application-level error
    #[error("{resource} ({id}): {operation} rejected: {source}")]
    RemoteRejected {
        resource: &'static str,
        id: String,
        operation: Operation,
        #[source]
        source: InfobloxError,
    },

    /// The appliance could not be reached
    #[error("{resource} ({id}): appliance unreachable during {operation}: {source}")]
    RemoteUnreachable {
        resource: &'static str,
        id: String,
        operation: Operation,
        #[source]
        source: InfobloxError,
    },

    /// The referenced object no longer exists
    #[error("{resource} ({id}): not found")]
    NotFound { resource: &'static str, id: String },

    /// Operation not valid in the resource's current lifecycle state
    #[error("{resource}: cannot {operation} a resource that is {state:?}")]
    InvalidTransition {
        resource: &'static str,
        state: ResourceState,
        operation: Operation,
    },

    /// A resource call arrived before `configure`
    #[error("Provider is not configured")]
    NotConfigured,

    /// Invalid provider configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Resource type name not in the registry
    #[error("Unknown resource type: {0}")]
    UnknownResource(String),

    /// Malformed plugin protocol message
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl ProviderError {
    /// Classify a client error raised while operating on `id`.
    pub fn remote(resource: &'static str, id: &str, operation: Operation, source: InfobloxError) -> Self {
        let id = display_id(id);
        if source.is_not_found() {
            ProviderError::NotFound { resource, id }
        } else if source.is_transport() {
            ProviderError::RemoteUnreachable {
                resource,
                id,
                operation,
                source,
            }
        } else {
            ProviderError::RemoteRejected {
                resource,
                id,
                operation,
                source,
            }
        }
    }

    /// Stable error kind reported over the plugin protocol.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::Validation(_) | ProviderError::RequiresReplacement { .. } => "validation",
            ProviderError::RemoteRejected { .. } => "remote_rejected",
            ProviderError::RemoteUnreachable { .. } => "remote_unreachable",
            ProviderError::NotFound { .. } => "not_found",
            ProviderError::InvalidTransition { .. } => "invalid_transition",
            ProviderError::NotConfigured => "not_configured",
            ProviderError::InvalidConfig(_) => "invalid_config",
            ProviderError::UnknownResource(_) => "unknown_resource",
            ProviderError::Protocol(_) => "protocol",
        }
    }
}

/// Identifier shown in messages; objects without a reference yet are `<new resource>`.
pub fn display_id(id: &str) -> String {
    if id.is_empty() {
        "<new resource>".to_string()
    } else {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_classified() {
        let err = ProviderError::remote(
            "infoblox_network",
            "network/abc:10.0.0.0/24/default",
            Operation::Update,
            InfobloxError::NotFound("gone".to_string()),
        );
        assert_eq!(err.kind(), "not_found");
        assert_eq!(err.to_string(), "infoblox_network (network/abc:10.0.0.0/24/default): not found");
    }

    #[test]
    fn test_api_error_is_rejection_with_context() {
        let err = ProviderError::remote(
            "infoblox_srv_record",
            "",
            Operation::Create,
            InfobloxError::Api("duplicate".to_string()),
        );
        assert_eq!(err.kind(), "remote_rejected");
        let msg = err.to_string();
        assert!(msg.contains("infoblox_srv_record (<new resource>)"), "{}", msg);
        assert!(msg.contains("create rejected"), "{}", msg);
    }

    #[test]
    fn test_authentication_is_rejection() {
        let err = ProviderError::remote(
            "infoblox_network",
            "x",
            Operation::Read,
            InfobloxError::Authentication("401".to_string()),
        );
        assert_eq!(err.kind(), "remote_rejected");
    }
}
