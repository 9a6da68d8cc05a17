//! Attribute schemas exposed to the declarative engine
//!
//! A schema lists every attribute of a resource with its primitive type,
//! presence rules, default, and whether changing it forces the resource to be
//! replaced instead of updated in place.

use serde::Serialize;
use serde_json::Value;

/// Primitive attribute types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
    Int,
    Bool,
    /// Map of string to string
    StringMap,
}

/// One attribute of a resource schema
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
    pub description: &'static str,
    pub required: bool,
    pub optional: bool,
    /// Set by the provider, never by configuration
    pub computed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Changing the value requires delete + create
    pub force_new: bool,
    /// Never echoed in logs or plans
    pub sensitive: bool,
}

impl Attribute {
    fn new(name: &'static str, attr_type: AttributeType, description: &'static str) -> Self {
        Self {
            name,
            attr_type,
            description,
            required: false,
            optional: false,
            computed: false,
            default: None,
            force_new: false,
            sensitive: false,
        }
    }

    /// Attribute that must be present in configuration
    pub fn required(name: &'static str, attr_type: AttributeType, description: &'static str) -> Self {
        Self {
            required: true,
            ..Self::new(name, attr_type, description)
        }
    }

    /// Attribute that may be omitted from configuration
    pub fn optional(name: &'static str, attr_type: AttributeType, description: &'static str) -> Self {
        Self {
            optional: true,
            ..Self::new(name, attr_type, description)
        }
    }

    /// Attribute produced by the provider
    pub fn computed(name: &'static str, attr_type: AttributeType, description: &'static str) -> Self {
        Self {
            computed: true,
            ..Self::new(name, attr_type, description)
        }
    }

    /// Default used when the attribute is omitted
    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Mark the attribute as identity: changes force replacement
    #[must_use]
    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    /// Mark the attribute as sensitive
    #[must_use]
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Value of the attribute in `object`, falling back to its default
    fn effective_value(&self, object: &Value) -> Option<Value> {
        object
            .get(self.name)
            .filter(|v| !v.is_null())
            .cloned()
            .or_else(|| self.default.clone())
    }
}

/// Schema of one resource type (or of the provider configuration block)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceSchema {
    pub type_name: &'static str,
    pub version: u32,
    pub description: &'static str,
    pub attributes: Vec<Attribute>,
}

impl ResourceSchema {
    /// Look up an attribute by name
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Identity attributes whose value differs between `prior` and `proposed`
    ///
    /// Omitted and `null` values compare as the attribute default.
    pub fn requires_replace(&self, prior: &Value, proposed: &Value) -> Vec<&'static str> {
        self.attributes
            .iter()
            .filter(|a| a.force_new && !a.computed)
            .filter(|a| a.effective_value(prior) != a.effective_value(proposed))
            .map(|a| a.name)
            .collect()
    }
}
