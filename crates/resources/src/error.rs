//! Validation errors raised before any remote call

use thiserror::Error;

/// Errors raised while decoding or validating a resource configuration
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Configuration was not a JSON object
    #[error("{0}: configuration must be an object")]
    NotAnObject(String),

    /// Key not declared in the resource schema
    #[error("{resource}: unknown field '{field}'")]
    UnknownField { resource: String, field: String },

    /// Missing required field or wrong primitive type
    #[error("{resource}: {message}")]
    Malformed { resource: String, message: String },

    /// Field present with the right type but an unacceptable value
    #[error("{resource}: invalid value for '{field}': {message}")]
    InvalidValue {
        resource: String,
        field: String,
        message: String,
    },
}

impl ValidationError {
    pub(crate) fn invalid(resource: &str, field: &str, message: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            resource: resource.to_string(),
            field: field.to_string(),
            message: message.into(),
        }
    }
}
