//! `infoblox_network` adapter
//!
//! Fixed networks are claimed as-is. With `allocate_prefix_len` set the
//! appliance picks the next available subnet inside the container `cidr`
//! and the chosen network is reported as `allocated_cidr`.

use super::{ResourceAdapter, id_string, object_ref};
use crate::error::ProviderError;
use infoblox_client::{EA_CMP_TYPE, EA_NETWORK_NAME, EA_TENANT_ID, Network, ObjectManagerTrait, ext_attrs_from_strings};
use resources::{NETWORK_TYPE_NAME, NetworkConfig, NetworkState, Operation, ResourceSchema, ValidationError, network_schema};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Adapter for the `infoblox_network` resource
#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkAdapter;

/// Build state from the network the appliance returned
fn network_state(mut config: NetworkConfig, network: &Network) -> NetworkState {
    if let Some(name) = network.name() {
        config.network_name = name.to_string();
    }
    NetworkState {
        id: network.reference.to_string(),
        config,
        allocated_cidr: Some(network.network.clone()),
    }
}

/// User-managed extensible attributes, without the ones the object manager owns
fn user_ext_attrs(network: &Network) -> BTreeMap<String, String> {
    network
        .extattrs
        .iter()
        .filter(|(name, _)| ![EA_CMP_TYPE, EA_TENANT_ID, EA_NETWORK_NAME].contains(&name.as_str()))
        .filter_map(|(name, value)| value.as_str().map(|v| (name.clone(), v.to_string())))
        .collect()
}

#[async_trait::async_trait]
impl ResourceAdapter for NetworkAdapter {
    type Config = NetworkConfig;
    type State = NetworkState;

    fn schema(&self) -> ResourceSchema {
        network_schema()
    }

    fn validate(&self, config: &NetworkConfig) -> Result<(), ValidationError> {
        config.validate()
    }

    fn reference<'a>(&self, state: &'a NetworkState) -> &'a str {
        &state.id
    }

    async fn create(&self, client: &dyn ObjectManagerTrait, config: &NetworkConfig) -> Result<NetworkState, ProviderError> {
        info!("{}: Beginning network creation", id_string(NETWORK_TYPE_NAME, ""));
        let ea = ext_attrs_from_strings(&config.extensible_attributes);

        let result = match config.allocate_prefix_len {
            Some(prefix_len) => {
                debug!("Allocating /{} from container {} in view {}", prefix_len, config.cidr, config.network_view_name);
                client
                    .allocate_network(
                        &config.network_view_name,
                        &config.cidr,
                        prefix_len,
                        &config.network_name,
                        &config.tenant_id,
                        &ea,
                    )
                    .await
            }
            None => {
                client
                    .create_network(
                        &config.network_view_name,
                        &config.cidr,
                        &config.network_name,
                        &config.tenant_id,
                        &ea,
                    )
                    .await
            }
        };
        let network = result.map_err(|e| ProviderError::remote(NETWORK_TYPE_NAME, "", Operation::Create, e))?;

        let state = network_state(config.clone(), &network);
        info!("{}: Creation of network complete ({})", id_string(NETWORK_TYPE_NAME, &state.id), network.network);
        Ok(state)
    }

    async fn read(&self, client: &dyn ObjectManagerTrait, state: &NetworkState) -> Result<Option<NetworkState>, ProviderError> {
        debug!("{}: Reading the state of network", id_string(NETWORK_TYPE_NAME, &state.id));
        match client.get_network_by_ref(&object_ref(&state.id)).await {
            Ok(network) => {
                let mut refreshed = network_state(state.config.clone(), &network);
                refreshed.config.extensible_attributes = user_ext_attrs(&network);
                Ok(Some(refreshed))
            }
            Err(e) if e.is_not_found() => {
                warn!("{}: network no longer exists, removing from state", id_string(NETWORK_TYPE_NAME, &state.id));
                Ok(None)
            }
            Err(e) => Err(ProviderError::remote(NETWORK_TYPE_NAME, &state.id, Operation::Read, e)),
        }
    }

    async fn update(&self, client: &dyn ObjectManagerTrait, state: &NetworkState, config: &NetworkConfig) -> Result<NetworkState, ProviderError> {
        info!("{}: Beginning network update", id_string(NETWORK_TYPE_NAME, &state.id));
        let ea = ext_attrs_from_strings(&config.extensible_attributes);
        let network = client
            .update_network(&object_ref(&state.id), &config.network_name, &config.tenant_id, &ea)
            .await
            .map_err(|e| ProviderError::remote(NETWORK_TYPE_NAME, &state.id, Operation::Update, e))?;

        let updated = network_state(config.clone(), &network);
        info!("{}: Update of network complete", id_string(NETWORK_TYPE_NAME, &updated.id));
        Ok(updated)
    }

    async fn delete(&self, client: &dyn ObjectManagerTrait, state: &NetworkState) -> Result<(), ProviderError> {
        info!("{}: Beginning network deletion", id_string(NETWORK_TYPE_NAME, &state.id));
        match client.delete_network(&object_ref(&state.id)).await {
            Ok(_) => {
                info!("{}: Deletion of network complete", id_string(NETWORK_TYPE_NAME, &state.id));
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                warn!("{}: network already deleted", id_string(NETWORK_TYPE_NAME, &state.id));
                Ok(())
            }
            Err(e) => Err(ProviderError::remote(NETWORK_TYPE_NAME, &state.id, Operation::Delete, e)),
        }
    }
}
