//! Network operations for MockObjectManager
//!
//! Handles fixed networks, network containers, and next-available-network
//! allocation. Allocation walks the container's subnets of the requested size
//! in address order and takes the first one not overlapping an existing network
//! in the same view, which matches what the appliance hands out on an empty grid.

use super::MockObjectManager;
use super::helpers::{lock, make_ref};
use crate::error::InfobloxError;
use crate::models::*;
use crate::object_manager_trait::{expect_object_type, object_manager_ext_attrs};
use ipnet::IpNet;
use std::collections::HashMap;

fn parse_cidr(cidr: &str) -> Result<IpNet, InfobloxError> {
    let net: IpNet = cidr
        .parse()
        .map_err(|e| InfobloxError::Api(format!("AdmConDataError: invalid network '{}': {}", cidr, e)))?;
    if net != net.trunc() {
        return Err(InfobloxError::Api(format!(
            "AdmConDataError: '{}' has host bits set, expected {}",
            cidr,
            net.trunc()
        )));
    }
    Ok(net)
}

fn overlaps(a: &IpNet, b: &IpNet) -> bool {
    a.contains(b) || b.contains(a)
}

/// Networks in `network_view` overlapping `candidate`
fn conflicts(networks: &HashMap<ObjectRef, Network>, network_view: &str, candidate: &IpNet) -> bool {
    networks.values().any(|existing| {
        existing.network_view == network_view
            && existing
                .network
                .parse::<IpNet>()
                .is_ok_and(|net| overlaps(&net, candidate))
    })
}

/// Insert under the same guard that checked for conflicts
fn store_network(
    client: &MockObjectManager,
    networks: &mut HashMap<ObjectRef, Network>,
    network_view: &str,
    net: IpNet,
    network_name: &str,
    tenant_id: &str,
    ea: &ExtAttrs,
) -> Network {
    let id = client.next_id();
    let cidr = net.to_string();
    let mut extattrs = object_manager_ext_attrs(&client.cmp_type, tenant_id, ea);
    extattrs.insert(EA_NETWORK_NAME.to_string(), EaValue::string(network_name));

    let network = Network {
        reference: make_ref(
            "network",
            &format!("dns.network${}/{}", cidr, id),
            &format!("{}/{}", cidr, network_view),
        ),
        network: cidr,
        network_view: network_view.to_string(),
        comment: None,
        extattrs,
    };
    networks.insert(network.reference.clone(), network.clone());
    network
}

pub fn create_network(
    client: &MockObjectManager,
    network_view: &str,
    cidr: &str,
    network_name: &str,
    tenant_id: &str,
    ea: &ExtAttrs,
) -> Result<Network, InfobloxError> {
    client.take_injected_error()?;
    let net = parse_cidr(cidr)?;

    let mut networks = lock(&client.networks);
    if conflicts(&networks, network_view, &net) {
        return Err(InfobloxError::Api(format!(
            "AdmConDataError: None (IBDataConflictError: IB.Data.Conflict:The network {} already exists.  Select another network.)",
            net
        )));
    }

    Ok(store_network(client, &mut networks, network_view, net, network_name, tenant_id, ea))
}

pub fn allocate_network(
    client: &MockObjectManager,
    network_view: &str,
    container_cidr: &str,
    prefix_len: u8,
    network_name: &str,
    tenant_id: &str,
    ea: &ExtAttrs,
) -> Result<Network, InfobloxError> {
    client.take_injected_error()?;
    let container = parse_cidr(container_cidr)?;

    let registered = lock(&client.containers)
        .iter()
        .any(|(view, cidr)| view == network_view && cidr.parse::<IpNet>().is_ok_and(|c| c == container));
    if !registered {
        return Err(InfobloxError::Api(format!(
            "AdmConDataError: network container {} not found in network view {}",
            container, network_view
        )));
    }

    let subnets = container.subnets(prefix_len).map_err(|e| {
        InfobloxError::Api(format!(
            "AdmConDataError: invalid prefix length {} for container {}: {}",
            prefix_len, container, e
        ))
    })?;

    let mut networks = lock(&client.networks);
    let free = subnets
        .into_iter()
        .find(|candidate| !conflicts(&networks, network_view, candidate))
        .ok_or_else(|| {
            InfobloxError::Api(format!(
                "AdmConProtoError: Cannot find 1 available network(s) of size /{} in container {}",
                prefix_len, container
            ))
        })?;

    Ok(store_network(client, &mut networks, network_view, free, network_name, tenant_id, ea))
}

pub fn get_network(
    client: &MockObjectManager,
    network_view: &str,
    cidr: &str,
) -> Result<Option<Network>, InfobloxError> {
    client.take_injected_error()?;
    Ok(lock(&client.networks)
        .values()
        .find(|n| n.network_view == network_view && n.network == cidr)
        .cloned())
}

pub fn get_network_by_ref(client: &MockObjectManager, reference: &ObjectRef) -> Result<Network, InfobloxError> {
    expect_object_type(reference, "network")?;
    client.take_injected_error()?;
    lock(&client.networks)
        .get(reference)
        .cloned()
        .ok_or_else(|| not_found(reference))
}

pub fn update_network(
    client: &MockObjectManager,
    reference: &ObjectRef,
    network_name: &str,
    tenant_id: &str,
    ea: &ExtAttrs,
) -> Result<Network, InfobloxError> {
    expect_object_type(reference, "network")?;
    client.take_injected_error()?;
    let mut networks = lock(&client.networks);
    let network = networks.get_mut(reference).ok_or_else(|| not_found(reference))?;

    let mut extattrs = object_manager_ext_attrs(&client.cmp_type, tenant_id, ea);
    extattrs.insert(EA_NETWORK_NAME.to_string(), EaValue::string(network_name));
    network.extattrs = extattrs;

    Ok(network.clone())
}

pub fn delete_network(client: &MockObjectManager, reference: &ObjectRef) -> Result<ObjectRef, InfobloxError> {
    expect_object_type(reference, "network")?;
    client.take_injected_error()?;
    lock(&client.networks)
        .remove(reference)
        .map(|n| n.reference)
        .ok_or_else(|| not_found(reference))
}

pub(super) fn not_found(reference: &ObjectRef) -> InfobloxError {
    InfobloxError::NotFound(format!("AdmConDataNotFoundError: Reference {} not found", reference))
}
