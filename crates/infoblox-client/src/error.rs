//! Infoblox client errors

use thiserror::Error;

/// Errors that can occur when interacting with the Infoblox WAPI
#[derive(Debug, Error)]
pub enum InfobloxError {
    /// HTTP transport error (connect, TLS, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// WAPI returned an application-level error
    #[error("WAPI error: {0}")]
    Api(String),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Authentication failed (bad credentials, insufficient permissions)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Referenced object does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request (e.g., reference of the wrong object type)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl InfobloxError {
    /// True when the appliance reported that the object does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, InfobloxError::NotFound(_))
    }

    /// True when the request never produced an appliance response.
    pub fn is_transport(&self) -> bool {
        matches!(self, InfobloxError::Http(_))
    }
}
