//! Plugin server
//!
//! Reads requests line by line, runs each one on its own task, and funnels
//! every response through a single writer task so lines never interleave.
//! The object-manager handle is built once by `configure` and shared by all
//! in-flight requests.

use crate::config::{ProviderConfig, provider_schema};
use crate::error::ProviderError;
use crate::protocol::{ConfigureParams, HANDSHAKE, Request, ResourceParams, Response};
use crate::registry::ResourceKind;
use anyhow::Context;
use infoblox_client::{InfobloxClient, ObjectManagerTrait};
use resources::Operation;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use std::fmt;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{OnceCell, mpsc};
use tracing::{debug, error, info, warn};

/// Provider state shared by all requests
pub struct Provider {
    base_config: ProviderConfig,
    client: OnceCell<Arc<dyn ObjectManagerTrait>>,
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("base_config", &self.base_config)
            .field("configured", &self.client.initialized())
            .finish()
    }
}

fn parse_params<T: DeserializeOwned + Default>(params: Value) -> Result<T, ProviderError> {
    if params.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(params).map_err(|e| ProviderError::Protocol(format!("Invalid params: {}", e)))
}

impl Provider {
    pub fn new(base_config: ProviderConfig) -> Self {
        Self {
            base_config,
            client: OnceCell::new(),
        }
    }

    /// Provider already holding `client`
    #[cfg(test)]
    pub fn with_client(base_config: ProviderConfig, client: Arc<dyn ObjectManagerTrait>) -> Self {
        Self {
            base_config,
            client: OnceCell::new_with(Some(client)),
        }
    }

    fn client(&self) -> Result<&dyn ObjectManagerTrait, ProviderError> {
        self.client.get().map(|c| c.as_ref()).ok_or(ProviderError::NotConfigured)
    }

    /// Provider block schema and every resource schema
    pub fn schema(&self) -> Result<Value, ProviderError> {
        let mut resources = Map::new();
        for kind in ResourceKind::ALL {
            resources.insert(kind.type_name().to_string(), encode(&kind.schema())?);
        }
        Ok(json!({
            "provider": encode(&provider_schema())?,
            "resources": resources,
        }))
    }

    /// Merge the provider block over the environment and connect
    async fn configure(&self, params: ConfigureParams) -> Result<Value, ProviderError> {
        if self.client.initialized() {
            return Err(ProviderError::Protocol("Provider is already configured".to_string()));
        }

        let config = self.base_config.clone().overlay(params.config)?;
        config.validate()?;
        info!("Configuring provider for {}", config.client_config().base_url());

        let client = InfobloxClient::new(config.client_config())
            .map_err(|e| ProviderError::InvalidConfig(e.to_string()))?;
        client
            .validate_credentials()
            .await
            .map_err(|e| ProviderError::remote("provider", &config.server, Operation::Read, e))?;

        let client: Arc<dyn ObjectManagerTrait> = Arc::new(client);
        info!("Provider configured against {}", client.base_url());
        self.client
            .set(client)
            .map_err(|e| ProviderError::Protocol(format!("Provider is already configured: {}", e)))?;
        Ok(Value::Null)
    }

    async fn dispatch(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        match method {
            "get_schema" => self.schema(),
            "configure" => self.configure(parse_params(params)?).await,
            "stop" => Ok(Value::Null),
            "validate" => {
                let (kind, p) = resource_params(params)?;
                kind.validate(p.config)?;
                Ok(Value::Null)
            }
            "plan" => {
                let (kind, p) = resource_params(params)?;
                let replace = kind.plan(&p.prior_state, p.config)?;
                Ok(json!({ "requires_replace": replace }))
            }
            "create" => {
                let (kind, p) = resource_params(params)?;
                kind.create(self.client()?, p.config).await
            }
            "read" => {
                let (kind, p) = resource_params(params)?;
                Ok(kind.read(self.client()?, p.state).await?.unwrap_or(Value::Null))
            }
            "update" => {
                let (kind, p) = resource_params(params)?;
                kind.update(self.client()?, p.state, p.config).await
            }
            "delete" => {
                let (kind, p) = resource_params(params)?;
                kind.delete(self.client()?, p.state).await?;
                Ok(Value::Null)
            }
            other => Err(ProviderError::Protocol(format!("Unknown method '{}'", other))),
        }
    }

    /// Handle one request; failures become error responses
    pub async fn handle_request(&self, request: Request) -> Response {
        debug!("Handling {} (id {})", request.method, request.id);
        match self.dispatch(&request.method, request.params).await {
            Ok(result) => Response::success(request.id, result),
            Err(e) => {
                match e {
                    ProviderError::NotFound { .. } => warn!("{} failed: {}", request.method, e),
                    _ => error!("{} failed: {}", request.method, e),
                }
                Response::error(request.id, &e)
            }
        }
    }
}

fn resource_params(params: Value) -> Result<(ResourceKind, ResourceParams), ProviderError> {
    let p: ResourceParams = serde_json::from_value(params).map_err(|e| ProviderError::Protocol(format!("Invalid params: {}", e)))?;
    let kind = ResourceKind::from_type_name(&p.type_name)?;
    Ok((kind, p))
}

fn encode<T: serde::Serialize>(value: &T) -> Result<Value, ProviderError> {
    serde_json::to_value(value).map_err(|e| ProviderError::Protocol(e.to_string()))
}

async fn send(tx: &mpsc::Sender<String>, response: &Response) {
    match serde_json::to_string(response) {
        Ok(line) => {
            if tx.send(line).await.is_err() {
                error!("Response writer closed, dropping response {}", response.id);
            }
        }
        Err(e) => error!("Failed to encode response {}: {}", response.id, e),
    }
}

/// Run the protocol until `stop` or end of input
pub async fn serve<R, W>(provider: Arc<Provider>, reader: R, mut writer: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::channel::<String>(100);

    let writer_task = tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            writer.write_all(line.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
        Ok::<(), std::io::Error>(())
    });

    tx.send(HANDSHAKE.to_string())
        .await
        .context("Failed to write handshake")?;
    info!("Provider ready");

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await.context("Failed to read request")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let request: Request = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                let err = ProviderError::Protocol(format!("Malformed request: {}", e));
                error!("{}", err);
                send(&tx, &Response::error(Value::Null, &err)).await;
                continue;
            }
        };

        if request.method == "stop" {
            info!("Stop requested");
            send(&tx, &Response::success(request.id, Value::Null)).await;
            break;
        }

        let provider = Arc::clone(&provider);
        let tx = tx.clone();
        tokio::spawn(async move {
            let response = provider.handle_request(request).await;
            send(&tx, &response).await;
        });
    }

    // The writer drains once every in-flight request has answered
    drop(tx);
    writer_task.await.context("Response writer panicked")??;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use tokio::io::{BufReader, duplex, split};

    fn request(id: u64, method: &str, params: Value) -> Request {
        Request {
            id: json!(id),
            method: method.to_string(),
            params,
        }
    }

    #[tokio::test]
    async fn test_schema_lists_all_resources() {
        let provider = Provider::new(ProviderConfig::default());
        let response = provider.handle_request(request(1, "get_schema", Value::Null)).await;
        let result = response.result.unwrap();

        assert!(result["resources"]["infoblox_network"].is_object());
        assert!(result["resources"]["infoblox_srv_record"].is_object());
        assert_eq!(result["provider"]["type_name"], "provider");
    }

    #[tokio::test]
    async fn test_resource_calls_before_configure_fail() {
        let provider = Provider::new(ProviderConfig::default());
        let response = provider
            .handle_request(request(
                2,
                "create",
                json!({"type_name": "infoblox_network", "config": fixed_network_config("10.10.0.0/24")}),
            ))
            .await;
        assert_eq!(response.id, json!(2));
        assert_eq!(response.error.unwrap().kind, "not_configured");
    }

    #[tokio::test]
    async fn test_validate_needs_no_configuration() {
        let provider = Provider::new(ProviderConfig::default());
        let response = provider
            .handle_request(request(3, "validate", json!({"type_name": "infoblox_srv_record", "config": srv_record_config()})))
            .await;
        assert_eq!(response.result, Some(Value::Null));
    }

    #[tokio::test]
    async fn test_configure_without_credentials_fails() {
        let provider = Provider::new(ProviderConfig::default());
        let response = provider
            .handle_request(request(4, "configure", json!({"config": {"server": "10.0.0.1"}})))
            .await;
        assert_eq!(response.error.unwrap().kind, "invalid_config");
        assert!(provider.client().is_err());
    }

    #[tokio::test]
    async fn test_configure_unreachable_appliance_fails() {
        let provider = Provider::new(ProviderConfig {
            connect_retries: 0,
            request_timeout: 5,
            ..test_provider_config()
        });
        let response = provider
            .handle_request(request(5, "configure", json!({"config": {"server": "127.0.0.1", "port": 1}})))
            .await;
        assert_eq!(response.error.unwrap().kind, "remote_unreachable");
        assert!(provider.client().is_err());
    }

    #[tokio::test]
    async fn test_unknown_type_and_method() {
        let mock = mock_with_container();
        let provider = configured_provider(&mock);

        let response = provider
            .handle_request(request(6, "create", json!({"type_name": "infoblox_a_record", "config": {}})))
            .await;
        assert_eq!(response.error.unwrap().kind, "unknown_resource");

        let response = provider.handle_request(request(7, "import", Value::Null)).await;
        assert_eq!(response.error.unwrap().kind, "protocol");
    }

    #[tokio::test]
    async fn test_full_lifecycle_through_requests() {
        let mock = mock_with_container();
        let provider = configured_provider(&mock);

        let created = provider
            .handle_request(request(
                1,
                "create",
                json!({"type_name": "infoblox_network", "config": allocated_network_config(24)}),
            ))
            .await
            .result
            .unwrap();
        assert_eq!(created["allocated_cidr"], "10.0.0.0/24");

        let plan = provider
            .handle_request(request(
                2,
                "plan",
                json!({"type_name": "infoblox_network", "prior_state": created, "config": allocated_network_config(24)}),
            ))
            .await
            .result
            .unwrap();
        assert_eq!(plan, json!({"requires_replace": []}));

        let deleted = provider
            .handle_request(request(3, "delete", json!({"type_name": "infoblox_network", "state": created})))
            .await;
        assert_eq!(deleted.result, Some(Value::Null));

        let read = provider
            .handle_request(request(4, "read", json!({"type_name": "infoblox_network", "state": created})))
            .await;
        assert_eq!(read.result, Some(Value::Null));
    }

    #[tokio::test]
    async fn test_serve_over_stream() {
        let mock = mock_with_container();
        let provider = configured_provider(&mock);

        let (engine, plugin) = duplex(64 * 1024);
        let (plugin_read, plugin_write) = split(plugin);
        let server = tokio::spawn(serve(provider, BufReader::new(plugin_read), plugin_write));

        let (engine_read, mut engine_write) = split(engine);
        let mut lines = BufReader::new(engine_read).lines();
        assert_eq!(lines.next_line().await.unwrap().unwrap(), HANDSHAKE);

        let create = json!({
            "id": 1,
            "method": "create",
            "params": {"type_name": "infoblox_srv_record", "config": srv_record_config()}
        });
        engine_write.write_all(format!("{}\nnot json\n", create).as_bytes()).await.unwrap();

        let mut responses = Vec::new();
        for _ in 0..2 {
            let line = lines.next_line().await.unwrap().unwrap();
            responses.push(serde_json::from_str::<Response>(&line).unwrap());
        }
        let created = responses.iter().find(|r| r.id == json!(1)).unwrap();
        assert_eq!(created.result.as_ref().unwrap()["fqdn"], "demo1.aa.com");
        let malformed = responses.iter().find(|r| r.id.is_null()).unwrap();
        assert_eq!(malformed.error.as_ref().unwrap().kind, "protocol");

        engine_write.write_all(b"{\"id\": 2, \"method\": \"stop\"}\n").await.unwrap();
        let stopped: Response = serde_json::from_str(&lines.next_line().await.unwrap().unwrap()).unwrap();
        assert_eq!(stopped, Response::success(json!(2), Value::Null));

        server.await.unwrap().unwrap();
        assert_eq!(mock.srv_record_count(), 1);
    }
}
