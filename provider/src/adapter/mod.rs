//! Resource adapters
//!
//! Each adapter translates one resource type's lifecycle (create, read,
//! update, delete) into object-manager calls. The generic drivers below own
//! the boundary work shared by every adapter: decoding and validating the
//! flat configuration, tracking the lifecycle state, and serializing the
//! resulting state back for the engine.

pub mod network;
pub mod srv_record;


pub use network::NetworkAdapter;
pub use srv_record::SrvRecordAdapter;

use crate::error::{ProviderError, display_id};
use infoblox_client::{ObjectManagerTrait, ObjectRef};
use resources::{Operation, ResourceSchema, ResourceState, ValidationError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

/// Lifecycle of one resource type against the object manager
#[async_trait::async_trait]
pub trait ResourceAdapter: Send + Sync {
    /// Typed desired state
    type Config: DeserializeOwned + Serialize + Send + Sync;
    /// Typed persisted state
    type State: DeserializeOwned + Serialize + Send + Sync;

    fn schema(&self) -> ResourceSchema;

    fn validate(&self, config: &Self::Config) -> Result<(), ValidationError>;

    /// Object reference recorded in `state` (empty before creation)
    fn reference<'a>(&self, state: &'a Self::State) -> &'a str;

    async fn create(&self, client: &dyn ObjectManagerTrait, config: &Self::Config) -> Result<Self::State, ProviderError>;

    /// Refresh `state` from the appliance; `None` when the object is gone
    async fn read(&self, client: &dyn ObjectManagerTrait, state: &Self::State) -> Result<Option<Self::State>, ProviderError>;

    async fn update(&self, client: &dyn ObjectManagerTrait, state: &Self::State, config: &Self::Config) -> Result<Self::State, ProviderError>;

    /// Remove the object; an already absent object is success
    async fn delete(&self, client: &dyn ObjectManagerTrait, state: &Self::State) -> Result<(), ProviderError>;
}

/// `infoblox_network (ID = network/...)`, used as log prefix
pub fn id_string(type_name: &str, reference: &str) -> String {
    format!("{} (ID = {})", type_name, display_id(reference))
}

fn decode<A: ResourceAdapter, T: DeserializeOwned>(adapter: &A, value: Value) -> Result<T, ProviderError> {
    Ok(resources::decode(&adapter.schema(), value)?)
}

fn decode_config<A: ResourceAdapter>(adapter: &A, value: Value) -> Result<A::Config, ProviderError> {
    let config: A::Config = decode(adapter, value)?;
    adapter.validate(&config)?;
    Ok(config)
}

fn encode<T: Serialize>(value: &T) -> Result<Value, ProviderError> {
    serde_json::to_value(value).map_err(|e| ProviderError::Protocol(format!("Failed to encode state: {}", e)))
}

fn begin<A: ResourceAdapter>(adapter: &A, current: ResourceState, op: Operation) -> Result<ResourceState, ProviderError> {
    let schema = adapter.schema();
    let next = current.begin(op).ok_or(ProviderError::InvalidTransition {
        resource: schema.type_name,
        state: current,
        operation: op,
    })?;
    debug!("{}: {:?} -> {:?}", schema.type_name, current, next);
    Ok(next)
}

fn current_state<A: ResourceAdapter>(adapter: &A, state: &A::State) -> ResourceState {
    if adapter.reference(state).is_empty() {
        ResourceState::Absent
    } else {
        ResourceState::Present
    }
}

/// Decode and validate a configuration without touching the appliance
pub fn validate<A: ResourceAdapter>(adapter: &A, config: Value) -> Result<(), ProviderError> {
    decode_config(adapter, config).map(|_| ())
}

/// Identity attributes that differ between prior state and new configuration.
/// A resource with no recorded reference is created, never replaced.
pub fn plan<A: ResourceAdapter>(adapter: &A, prior: &Value, config: Value) -> Result<Vec<&'static str>, ProviderError> {
    let exists = prior.get("id").and_then(Value::as_str).is_some_and(|id| !id.is_empty());
    let replace = if exists { adapter.schema().requires_replace(prior, &config) } else { Vec::new() };
    decode_config(adapter, config)?;
    Ok(replace)
}

pub async fn create<A: ResourceAdapter>(adapter: &A, client: &dyn ObjectManagerTrait, config: Value) -> Result<Value, ProviderError> {
    let config = decode_config(adapter, config)?;
    let creating = begin(adapter, ResourceState::Absent, Operation::Create)?;
    let state = adapter.create(client, &config).await?;
    let present = creating.finish(true);
    info!(
        "{}: now {:?}",
        id_string(adapter.schema().type_name, adapter.reference(&state)),
        present
    );
    encode(&state)
}

pub async fn read<A: ResourceAdapter>(adapter: &A, client: &dyn ObjectManagerTrait, state: Value) -> Result<Option<Value>, ProviderError> {
    let state: A::State = decode(adapter, state)?;
    let current = current_state(adapter, &state);
    if current == ResourceState::Absent {
        return Ok(None);
    }
    let reading = begin(adapter, current, Operation::Read)?;
    let refreshed = adapter.read(client, &state).await?;
    let after = reading.finish(refreshed.is_some());
    debug!("{}: now {:?}", id_string(adapter.schema().type_name, adapter.reference(&state)), after);
    refreshed.as_ref().map(encode).transpose()
}

/// Update in place; identity changes are refused so nothing is partially applied
pub async fn update<A: ResourceAdapter>(
    adapter: &A,
    client: &dyn ObjectManagerTrait,
    state: Value,
    config: Value,
) -> Result<Value, ProviderError> {
    let schema = adapter.schema();
    let replace = schema.requires_replace(&state, &config);
    if !replace.is_empty() {
        return Err(ProviderError::RequiresReplacement {
            resource: schema.type_name,
            fields: replace,
        });
    }
    let prior: A::State = decode(adapter, state)?;
    let config = decode_config(adapter, config)?;
    let updating = begin(adapter, current_state(adapter, &prior), Operation::Update)?;
    let state = adapter.update(client, &prior, &config).await?;
    let present = updating.finish(true);
    info!("{}: now {:?}", id_string(schema.type_name, adapter.reference(&state)), present);
    encode(&state)
}

pub async fn delete<A: ResourceAdapter>(adapter: &A, client: &dyn ObjectManagerTrait, state: Value) -> Result<(), ProviderError> {
    let state: A::State = decode(adapter, state)?;
    let current = current_state(adapter, &state);
    if current == ResourceState::Absent {
        return Ok(());
    }
    let deleting = begin(adapter, current, Operation::Delete)?;
    adapter.delete(client, &state).await?;
    let absent = deleting.finish(false);
    info!("{}: now {:?}", id_string(adapter.schema().type_name, adapter.reference(&state)), absent);
    Ok(())
}

/// Reference of a stored object, as the client expects it
pub(crate) fn object_ref(reference: &str) -> ObjectRef {
    ObjectRef::new(reference)
}
