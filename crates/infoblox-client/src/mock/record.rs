//! DNS record operations for MockObjectManager
//!
//! Like WAPI, updates are partial: fields absent from the update body keep
//! their stored values.

use super::MockObjectManager;
use super::helpers::{lock, make_ref};
use super::network::not_found;
use crate::error::InfobloxError;
use crate::models::*;
use crate::object_manager_trait::{expect_object_type, object_manager_ext_attrs};

#[allow(clippy::too_many_arguments, reason = "mirrors the record:srv field set")]
pub fn create_srv_record(
    client: &MockObjectManager,
    dns_view: &str,
    name: &str,
    port: u16,
    priority: u16,
    target: &str,
    weight: u16,
    tenant_id: &str,
    ea: &ExtAttrs,
) -> Result<SrvRecord, InfobloxError> {
    client.take_injected_error()?;
    if name.is_empty() || name.starts_with('.') || name.ends_with('.') {
        return Err(InfobloxError::Api(format!("AdmConDataError: invalid SRV record name '{}'", name)));
    }

    let mut records = lock(&client.srv_records);
    let duplicate = records.values().any(|r| {
        r.view == dns_view && r.name == name && r.port == port && r.priority == priority && r.weight == weight && r.target == target
    });
    if duplicate {
        return Err(InfobloxError::Api(format!(
            "AdmConDataError: None (IBDataConflictError: IB.Data.Conflict:The record '{}' already exists.)",
            name
        )));
    }

    let id = client.next_id();
    let record = SrvRecord {
        reference: make_ref("record:srv", &format!("dns.bind_srv${}", id), &format!("{}/{}", name, dns_view)),
        name: name.to_string(),
        port,
        priority,
        weight,
        target: target.to_string(),
        view: dns_view.to_string(),
        extattrs: object_manager_ext_attrs(&client.cmp_type, tenant_id, ea),
    };
    records.insert(record.reference.clone(), record.clone());
    Ok(record)
}

pub fn get_srv_record_by_ref(client: &MockObjectManager, reference: &ObjectRef) -> Result<SrvRecord, InfobloxError> {
    expect_object_type(reference, "record:srv")?;
    client.take_injected_error()?;
    lock(&client.srv_records)
        .get(reference)
        .cloned()
        .ok_or_else(|| not_found(reference))
}

pub fn update_srv_record(client: &MockObjectManager, reference: &ObjectRef, port: u16) -> Result<SrvRecord, InfobloxError> {
    expect_object_type(reference, "record:srv")?;
    client.take_injected_error()?;
    let mut records = lock(&client.srv_records);
    let record = records.get_mut(reference).ok_or_else(|| not_found(reference))?;
    record.port = port;
    Ok(record.clone())
}

pub fn delete_srv_record(client: &MockObjectManager, reference: &ObjectRef) -> Result<ObjectRef, InfobloxError> {
    expect_object_type(reference, "record:srv")?;
    client.take_injected_error()?;
    lock(&client.srv_records)
        .remove(reference)
        .map(|r| r.reference)
        .ok_or_else(|| not_found(reference))
}
