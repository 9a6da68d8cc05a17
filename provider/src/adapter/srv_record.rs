//! `infoblox_srv_record` adapter
//!
//! The record is created as `record_name.zone` in `dns_view`. An in-place
//! update resubmits the port only; priority, weight and target are left
//! untouched on the appliance, and the returned state reflects what the
//! appliance actually holds.

use super::{ResourceAdapter, id_string, object_ref};
use crate::error::ProviderError;
use infoblox_client::{EA_CMP_TYPE, EA_TENANT_ID, ObjectManagerTrait, SrvRecord, ext_attrs_from_strings};
use resources::{Operation, ResourceSchema, SRV_RECORD_TYPE_NAME, SrvRecordConfig, SrvRecordState, ValidationError, srv_record_schema};
use tracing::{debug, info, warn};

/// Adapter for the `infoblox_srv_record` resource
#[derive(Debug, Clone, Copy, Default)]
pub struct SrvRecordAdapter;

fn record_state(mut config: SrvRecordConfig, record: &SrvRecord) -> SrvRecordState {
    config.port = record.port;
    config.priority = record.priority;
    config.weight = record.weight;
    config.target = record.target.clone();
    if !record.view.is_empty() {
        config.dns_view = record.view.clone();
    }
    SrvRecordState {
        id: record.reference.to_string(),
        config,
        fqdn: Some(record.name.clone()),
    }
}

#[async_trait::async_trait]
impl ResourceAdapter for SrvRecordAdapter {
    type Config = SrvRecordConfig;
    type State = SrvRecordState;

    fn schema(&self) -> ResourceSchema {
        srv_record_schema()
    }

    fn validate(&self, config: &SrvRecordConfig) -> Result<(), ValidationError> {
        config.validate()
    }

    fn reference<'a>(&self, state: &'a SrvRecordState) -> &'a str {
        &state.id
    }

    async fn create(&self, client: &dyn ObjectManagerTrait, config: &SrvRecordConfig) -> Result<SrvRecordState, ProviderError> {
        info!("{}: Beginning to create SRV record", id_string(SRV_RECORD_TYPE_NAME, ""));
        let fqdn = config.fqdn();
        let ea = ext_attrs_from_strings(&config.extensible_attributes);

        let record = client
            .create_srv_record(
                &config.dns_view,
                &fqdn,
                config.port,
                config.priority,
                &config.target,
                config.weight,
                &config.tenant_id,
                &ea,
            )
            .await
            .map_err(|e| ProviderError::remote(SRV_RECORD_TYPE_NAME, "", Operation::Create, e))?;

        let state = record_state(config.clone(), &record);
        info!("{}: Creation of SRV record {} complete", id_string(SRV_RECORD_TYPE_NAME, &state.id), fqdn);
        Ok(state)
    }

    async fn read(&self, client: &dyn ObjectManagerTrait, state: &SrvRecordState) -> Result<Option<SrvRecordState>, ProviderError> {
        debug!("{}: Reading the state of SRV record", id_string(SRV_RECORD_TYPE_NAME, &state.id));
        match client.get_srv_record_by_ref(&object_ref(&state.id)).await {
            Ok(record) => {
                let mut refreshed = record_state(state.config.clone(), &record);
                refreshed.config.extensible_attributes = record
                    .extattrs
                    .iter()
                    .filter(|(name, _)| name.as_str() != EA_CMP_TYPE && name.as_str() != EA_TENANT_ID)
                    .filter_map(|(name, value)| value.as_str().map(|v| (name.clone(), v.to_string())))
                    .collect();
                Ok(Some(refreshed))
            }
            Err(e) if e.is_not_found() => {
                warn!("{}: SRV record no longer exists, removing from state", id_string(SRV_RECORD_TYPE_NAME, &state.id));
                Ok(None)
            }
            Err(e) => Err(ProviderError::remote(SRV_RECORD_TYPE_NAME, &state.id, Operation::Read, e)),
        }
    }

    async fn update(&self, client: &dyn ObjectManagerTrait, state: &SrvRecordState, config: &SrvRecordConfig) -> Result<SrvRecordState, ProviderError> {
        info!("{}: Beginning to update SRV record", id_string(SRV_RECORD_TYPE_NAME, &state.id));
        // Only the port is resubmitted
        let record = client
            .update_srv_record(&object_ref(&state.id), config.port)
            .await
            .map_err(|e| ProviderError::remote(SRV_RECORD_TYPE_NAME, &state.id, Operation::Update, e))?;

        if (record.priority, record.weight, record.target.as_str()) != (config.priority, config.weight, config.target.as_str()) {
            warn!(
                "{}: priority, weight and target are not updated in place (appliance holds {}/{}/{})",
                id_string(SRV_RECORD_TYPE_NAME, &state.id),
                record.priority,
                record.weight,
                record.target
            );
        }

        let updated = record_state(config.clone(), &record);
        info!("{}: Update of SRV record complete", id_string(SRV_RECORD_TYPE_NAME, &updated.id));
        Ok(updated)
    }

    async fn delete(&self, client: &dyn ObjectManagerTrait, state: &SrvRecordState) -> Result<(), ProviderError> {
        info!("{}: Beginning deletion of SRV record", id_string(SRV_RECORD_TYPE_NAME, &state.id));
        match client.delete_srv_record(&object_ref(&state.id)).await {
            Ok(_) => {
                info!("{}: Deletion of SRV record complete", id_string(SRV_RECORD_TYPE_NAME, &state.id));
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                warn!("{}: SRV record already deleted", id_string(SRV_RECORD_TYPE_NAME, &state.id));
                Ok(())
            }
            Err(e) => Err(ProviderError::remote(SRV_RECORD_TYPE_NAME, &state.id, Operation::Delete, e)),
        }
    }
}
