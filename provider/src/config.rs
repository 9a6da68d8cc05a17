//! Provider configuration
//!
//! Connection settings are read from `INFOBLOX_*` environment variables at
//! startup. The engine's `configure` call may then override any of them;
//! the merged result must name a server and carry credentials.

use crate::error::ProviderError;
use infoblox_client::ClientConfig;
use resources::{Attribute, AttributeType, ResourceSchema};
use serde::Deserialize;
use serde_json::{Value, json};
use std::fmt;
use std::time::Duration;

pub const ENV_SERVER: &str = "INFOBLOX_SERVER";
pub const ENV_USERNAME: &str = "INFOBLOX_USERNAME";
pub const ENV_PASSWORD: &str = "INFOBLOX_PASSWORD";
pub const ENV_PORT: &str = "INFOBLOX_PORT";
pub const ENV_WAPI_VERSION: &str = "INFOBLOX_WAPI_VERSION";
pub const ENV_SSLVERIFY: &str = "INFOBLOX_SSLVERIFY";
pub const ENV_REQUEST_TIMEOUT: &str = "INFOBLOX_REQUEST_TIMEOUT";
pub const ENV_CONNECT_RETRIES: &str = "INFOBLOX_CONNECT_RETRIES";
pub const ENV_CMP_TYPE: &str = "INFOBLOX_CMP_TYPE";

/// Appliance connection settings
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub server: String,
    pub username: String,
    pub password: String,
    pub port: u16,
    pub wapi_version: String,
    pub sslverify: bool,
    /// Seconds
    pub request_timeout: u64,
    pub connect_retries: u32,
    pub cmp_type: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            server: String::new(),
            username: String::new(),
            password: String::new(),
            port: 443,
            wapi_version: "2.5".to_string(),
            sslverify: true,
            request_timeout: 60,
            connect_retries: 3,
            cmp_type: "Terraform".to_string(),
        }
    }
}

// Password stays out of logs
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("server", &self.server)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("port", &self.port)
            .field("wapi_version", &self.wapi_version)
            .field("sslverify", &self.sslverify)
            .field("request_timeout", &self.request_timeout)
            .field("connect_retries", &self.connect_retries)
            .field("cmp_type", &self.cmp_type)
            .finish()
    }
}

/// Values accepted by `configure`; absent keys keep the environment value
#[derive(Debug, Default, Deserialize)]
struct ConfigOverrides {
    server: Option<String>,
    username: Option<String>,
    password: Option<String>,
    port: Option<u16>,
    wapi_version: Option<String>,
    sslverify: Option<bool>,
    request_timeout: Option<u64>,
    connect_retries: Option<u32>,
    cmp_type: Option<String>,
}

fn parse_env<T: std::str::FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T, ProviderError>
where
    T::Err: fmt::Display,
{
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e| ProviderError::InvalidConfig(format!("{} must be valid: '{}': {}", key, value, e))),
        None => Ok(default),
    }
}

impl ProviderConfig {
    /// Load settings from the process environment
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through `lookup`, falling back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ProviderError> {
        let defaults = Self::default();
        Ok(Self {
            server: lookup(ENV_SERVER).unwrap_or_default(),
            username: lookup(ENV_USERNAME).unwrap_or_default(),
            password: lookup(ENV_PASSWORD).unwrap_or_default(),
            port: parse_env(ENV_PORT, lookup(ENV_PORT), defaults.port)?,
            wapi_version: lookup(ENV_WAPI_VERSION).unwrap_or(defaults.wapi_version),
            sslverify: parse_env(ENV_SSLVERIFY, lookup(ENV_SSLVERIFY), defaults.sslverify)?,
            request_timeout: parse_env(ENV_REQUEST_TIMEOUT, lookup(ENV_REQUEST_TIMEOUT), defaults.request_timeout)?,
            connect_retries: parse_env(ENV_CONNECT_RETRIES, lookup(ENV_CONNECT_RETRIES), defaults.connect_retries)?,
            cmp_type: lookup(ENV_CMP_TYPE).unwrap_or(defaults.cmp_type),
        })
    }

    /// Apply the engine's provider block on top of these settings
    pub fn overlay(mut self, overrides: Value) -> Result<Self, ProviderError> {
        let o: ConfigOverrides = match overrides {
            Value::Null => ConfigOverrides::default(),
            value => resources::decode(&provider_schema(), value)?,
        };
        if let Some(v) = o.server {
            self.server = v;
        }
        if let Some(v) = o.username {
            self.username = v;
        }
        if let Some(v) = o.password {
            self.password = v;
        }
        if let Some(v) = o.port {
            self.port = v;
        }
        if let Some(v) = o.wapi_version {
            self.wapi_version = v;
        }
        if let Some(v) = o.sslverify {
            self.sslverify = v;
        }
        if let Some(v) = o.request_timeout {
            self.request_timeout = v;
        }
        if let Some(v) = o.connect_retries {
            self.connect_retries = v;
        }
        if let Some(v) = o.cmp_type {
            self.cmp_type = v;
        }
        Ok(self)
    }

    /// Check the settings are complete enough to build a client
    pub fn validate(&self) -> Result<(), ProviderError> {
        for (name, value, env) in [
            ("server", &self.server, ENV_SERVER),
            ("username", &self.username, ENV_USERNAME),
            ("password", &self.password, ENV_PASSWORD),
        ] {
            if value.trim().is_empty() {
                return Err(ProviderError::InvalidConfig(format!(
                    "{} is required (set it in the provider block or {})",
                    name, env
                )));
            }
        }
        if self.request_timeout == 0 {
            return Err(ProviderError::InvalidConfig("request_timeout must be at least 1 second".to_string()));
        }
        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            server: self.server.clone(),
            port: self.port,
            wapi_version: self.wapi_version.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            sslverify: self.sslverify,
            request_timeout: Duration::from_secs(self.request_timeout),
            connect_retries: self.connect_retries,
            cmp_type: self.cmp_type.clone(),
        }
    }
}

/// Schema of the provider configuration block
pub fn provider_schema() -> ResourceSchema {
    ResourceSchema {
        type_name: "provider",
        version: 0,
        description: "Connection settings of the Infoblox grid master.",
        attributes: vec![
            Attribute::optional("server", AttributeType::String, "Grid master host name or address. Defaults to INFOBLOX_SERVER."),
            Attribute::optional("username", AttributeType::String, "WAPI user. Defaults to INFOBLOX_USERNAME."),
            Attribute::optional("password", AttributeType::String, "WAPI password. Defaults to INFOBLOX_PASSWORD.").sensitive(),
            Attribute::optional("port", AttributeType::Int, "WAPI port.").with_default(json!(443)),
            Attribute::optional("wapi_version", AttributeType::String, "WAPI version.").with_default(json!("2.5")),
            Attribute::optional("sslverify", AttributeType::Bool, "Verify the appliance TLS certificate.").with_default(json!(true)),
            Attribute::optional("request_timeout", AttributeType::Int, "Request timeout in seconds.").with_default(json!(60)),
            Attribute::optional("connect_retries", AttributeType::Int, "Retries for requests that failed to connect.").with_default(json!(3)),
            Attribute::optional("cmp_type", AttributeType::String, "Value of the 'CMP Type' extensible attribute.")
                .with_default(json!("Terraform")),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = ProviderConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ProviderConfig::default());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_lookup_reads_all_keys() {
        let config = ProviderConfig::from_lookup(lookup(&[
            (ENV_SERVER, "10.0.0.1"),
            (ENV_USERNAME, "admin"),
            (ENV_PASSWORD, "infoblox"),
            (ENV_PORT, "8443"),
            (ENV_WAPI_VERSION, "2.7"),
            (ENV_SSLVERIFY, "false"),
            (ENV_REQUEST_TIMEOUT, "30"),
            (ENV_CONNECT_RETRIES, "0"),
            (ENV_CMP_TYPE, "OpenStack"),
        ]))
        .unwrap();
        config.validate().unwrap();

        let client = config.client_config();
        assert_eq!(client.base_url(), "https://10.0.0.1:8443/wapi/v2.7");
        assert!(!client.sslverify);
        assert_eq!(client.request_timeout, Duration::from_secs(30));
        assert_eq!(client.connect_retries, 0);
        assert_eq!(client.cmp_type, "OpenStack");
    }

    #[test]
    fn test_from_lookup_rejects_bad_port() {
        let err = ProviderConfig::from_lookup(lookup(&[(ENV_PORT, "https")])).unwrap_err();
        assert!(err.to_string().contains(ENV_PORT), "{}", err);
    }

    #[test]
    fn test_overlay_wins_over_environment() {
        let base = ProviderConfig::from_lookup(lookup(&[(ENV_SERVER, "env-host"), (ENV_USERNAME, "env-user")])).unwrap();
        let config = base
            .overlay(json!({"server": "block-host", "password": "secret", "sslverify": false, "port": null}))
            .unwrap();

        assert_eq!(config.server, "block-host");
        assert_eq!(config.username, "env-user");
        assert_eq!(config.password, "secret");
        assert_eq!(config.port, 443);
        assert!(!config.sslverify);
        config.validate().unwrap();
    }

    #[test]
    fn test_overlay_rejects_unknown_keys() {
        let err = ProviderConfig::default().overlay(json!({"insecure": true})).unwrap_err();
        assert_eq!(err.kind(), "validation");
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = ProviderConfig {
            password: "hunter2".to_string(),
            ..ProviderConfig::default()
        };
        let printed = format!("{:?}", config);
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("<redacted>"));
    }
}
