//! Infoblox WAPI client
//!
//! Implements the object-manager operations over WAPI:
//! `/wapi/v{version}/network` and `/wapi/v{version}/record:srv`.
//!
//! Creates and updates ask for `_return_fields` so a single round trip returns
//! the full object instead of a bare reference.

use crate::common::HttpClient;
use crate::common::query::{search_objects, with_return_fields};
use crate::error::InfobloxError;
use crate::models::*;
use crate::object_manager_trait::{ObjectManagerTrait, expect_object_type, object_manager_ext_attrs};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

const NETWORK: &str = "network";
const RECORD_SRV: &str = "record:srv";

/// Connection settings for [`InfobloxClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Grid master host name or address
    pub server: String,
    pub port: u16,
    /// WAPI version, e.g. "2.5"
    pub wapi_version: String,
    pub username: String,
    pub password: String,
    /// Verify the appliance TLS certificate
    pub sslverify: bool,
    pub request_timeout: Duration,
    /// Retries for requests that failed to connect
    pub connect_retries: u32,
    /// Value of the `CMP Type` extensible attribute
    pub cmp_type: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: String::new(),
            port: 443,
            wapi_version: "2.5".to_string(),
            username: String::new(),
            password: String::new(),
            sslverify: true,
            request_timeout: Duration::from_secs(60),
            connect_retries: 3,
            cmp_type: "Terraform".to_string(),
        }
    }
}

impl ClientConfig {
    /// Versioned WAPI root for this configuration
    pub fn base_url(&self) -> String {
        format!("https://{}:{}/wapi/v{}", self.server, self.port, self.wapi_version)
    }
}

/// Infoblox WAPI client
#[derive(Debug)]
pub struct InfobloxClient {
    http: HttpClient,
    cmp_type: String,
}

impl InfobloxClient {
    /// Create a new Infoblox client
    pub fn new(config: ClientConfig) -> Result<Self, InfobloxError> {
        if config.server.is_empty() {
            return Err(InfobloxError::InvalidRequest("server must not be empty".to_string()));
        }

        let client = Client::builder()
            .timeout(config.request_timeout)
            .danger_accept_invalid_certs(!config.sslverify)
            .build()
            .map_err(InfobloxError::Http)?;

        Ok(Self {
            http: HttpClient::new(
                client,
                config.base_url(),
                config.username,
                config.password,
                config.connect_retries,
            ),
            cmp_type: config.cmp_type,
        })
    }

    async fn create_network_object(&self, request: NetworkRequest) -> Result<Network, InfobloxError> {
        self.http
            .post(&with_return_fields(NETWORK, NETWORK_RETURN_FIELDS), &request)
            .await
    }
}

#[async_trait::async_trait]
impl ObjectManagerTrait for InfobloxClient {
    fn base_url(&self) -> &str {
        self.http.base_url()
    }

    async fn validate_credentials(&self) -> Result<(), InfobloxError> {
        self.http.ping().await?;
        debug!("WAPI credentials validated");
        Ok(())
    }

    async fn create_network(&self, network_view: &str, cidr: &str, network_name: &str, tenant_id: &str, ea: &ExtAttrs) -> Result<Network, InfobloxError> {
        debug!("Creating network {} in view {}", cidr, network_view);
        let mut extattrs = object_manager_ext_attrs(&self.cmp_type, tenant_id, ea);
        extattrs.insert(EA_NETWORK_NAME.to_string(), EaValue::string(network_name));

        self.create_network_object(NetworkRequest {
            network_view: network_view.to_string(),
            network: cidr.to_string(),
            extattrs,
        })
        .await
    }

    async fn allocate_network(&self, network_view: &str, container_cidr: &str, prefix_len: u8, network_name: &str, tenant_id: &str, ea: &ExtAttrs) -> Result<Network, InfobloxError> {
        debug!("Allocating /{} from container {} in view {}", prefix_len, container_cidr, network_view);
        let mut extattrs = object_manager_ext_attrs(&self.cmp_type, tenant_id, ea);
        extattrs.insert(EA_NETWORK_NAME.to_string(), EaValue::string(network_name));

        self.create_network_object(NetworkRequest {
            network_view: network_view.to_string(),
            network: next_available_network_expr(container_cidr, network_view, prefix_len),
            extattrs,
        })
        .await
    }

    async fn get_network(&self, network_view: &str, cidr: &str) -> Result<Option<Network>, InfobloxError> {
        debug!("Searching network {} in view {}", cidr, network_view);
        let mut found: Vec<Network> = search_objects(
            &self.http,
            NETWORK,
            &[("network", cidr), ("network_view", network_view)],
            NETWORK_RETURN_FIELDS,
        )
        .await?;
        Ok(if found.is_empty() { None } else { Some(found.swap_remove(0)) })
    }

    async fn get_network_by_ref(&self, reference: &ObjectRef) -> Result<Network, InfobloxError> {
        expect_object_type(reference, NETWORK)?;
        debug!("Fetching network {}", reference);
        self.http
            .get(&with_return_fields(reference.as_str(), NETWORK_RETURN_FIELDS))
            .await
    }

    async fn update_network(&self, reference: &ObjectRef, network_name: &str, tenant_id: &str, ea: &ExtAttrs) -> Result<Network, InfobloxError> {
        expect_object_type(reference, NETWORK)?;
        debug!("Updating network {}", reference);
        // WAPI replaces the whole extattrs set on PUT, so the object-manager
        // attributes are resent alongside the user ones.
        let mut extattrs = object_manager_ext_attrs(&self.cmp_type, tenant_id, ea);
        extattrs.insert(EA_NETWORK_NAME.to_string(), EaValue::string(network_name));

        self.http
            .put(
                &with_return_fields(reference.as_str(), NETWORK_RETURN_FIELDS),
                &NetworkUpdate { extattrs },
            )
            .await
    }

    async fn delete_network(&self, reference: &ObjectRef) -> Result<ObjectRef, InfobloxError> {
        expect_object_type(reference, NETWORK)?;
        self.http.delete(reference).await
    }

    async fn create_srv_record(&self, dns_view: &str, name: &str, port: u16, priority: u16, target: &str, weight: u16, tenant_id: &str, ea: &ExtAttrs) -> Result<SrvRecord, InfobloxError> {
        debug!("Creating SRV record {} in view {}", name, dns_view);
        let request = SrvRecordRequest {
            name: name.to_string(),
            port,
            priority,
            weight,
            target: target.to_string(),
            view: dns_view.to_string(),
            extattrs: object_manager_ext_attrs(&self.cmp_type, tenant_id, ea),
        };
        self.http
            .post(&with_return_fields(RECORD_SRV, SRV_RECORD_RETURN_FIELDS), &request)
            .await
    }

    async fn get_srv_record_by_ref(&self, reference: &ObjectRef) -> Result<SrvRecord, InfobloxError> {
        expect_object_type(reference, RECORD_SRV)?;
        debug!("Fetching SRV record {}", reference);
        self.http
            .get(&with_return_fields(reference.as_str(), SRV_RECORD_RETURN_FIELDS))
            .await
    }

    async fn update_srv_record(&self, reference: &ObjectRef, port: u16) -> Result<SrvRecord, InfobloxError> {
        expect_object_type(reference, RECORD_SRV)?;
        debug!("Updating SRV record {} port to {}", reference, port);
        self.http
            .put(
                &with_return_fields(reference.as_str(), SRV_RECORD_RETURN_FIELDS),
                &SrvRecordUpdate { port },
            )
            .await
    }

    async fn delete_srv_record(&self, reference: &ObjectRef) -> Result<ObjectRef, InfobloxError> {
        expect_object_type(reference, RECORD_SRV)?;
        self.http.delete(reference).await
    }
}
