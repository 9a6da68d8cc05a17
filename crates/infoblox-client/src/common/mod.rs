//! Common utilities for the Infoblox WAPI client
//!
//! Provides the authenticated HTTP wrapper and response classification shared by
//! every object operation.

pub mod query;

use crate::backoff::FibonacciBackoff;
use crate::error::InfobloxError;
use crate::models::{ObjectRef, WapiErrorBody};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Marker WAPI puts in error bodies for references that no longer exist
const NOT_FOUND_MARKER: &str = "AdmConDataNotFoundError";

/// HTTP client wrapper with basic authentication
#[derive(Debug)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    username: String,
    password: String,
    connect_retries: u32,
}

impl HttpClient {
    /// Create a new HTTP client wrapper
    ///
    /// `base_url` is the versioned WAPI root, e.g. `https://gm:443/wapi/v2.5`.
    pub fn new(client: Client, base_url: String, username: String, password: String, connect_retries: u32) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            username,
            password,
            connect_retries,
        }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a full URL from an object type, a reference, or a path with query
    pub fn build_url(&self, path: &str) -> String {
        if path.starts_with("http") {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }

    /// Send a request, retrying only failures that happened before a connection
    /// was established, so non-idempotent POSTs are never replayed.
    async fn send(&self, build: impl Fn() -> RequestBuilder) -> Result<Response, InfobloxError> {
        let mut backoff = FibonacciBackoff::default();
        let mut attempt = 0;
        loop {
            let request = build()
                .basic_auth(&self.username, Some(&self.password))
                .header("Accept", "application/json");
            match request.send().await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_connect() && attempt < self.connect_retries => {
                    attempt += 1;
                    let delay = backoff.next_backoff();
                    warn!("Connection to {} failed (attempt {}), retrying in {:?}: {}", self.base_url, attempt, delay, e);
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(InfobloxError::Http(e)),
            }
        }
    }

    /// Read the body of a response, turning non-2xx statuses into typed errors
    async fn read_body(&self, method: &str, path: &str, response: Response) -> Result<String, InfobloxError> {
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(classify_failure(status, &format!("{} {}", method, path), &body))
        }
    }

    fn decode<T: DeserializeOwned>(path: &str, body: &str) -> Result<T, InfobloxError> {
        serde_json::from_str(body).map_err(|e| {
            InfobloxError::Api(format!(
                "error decoding response body of {}: {} - Response (first 500 chars): {}",
                path,
                e,
                body.chars().take(500).collect::<String>()
            ))
        })
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, InfobloxError> {
        let url = self.build_url(path);
        debug!("GET {}", url);

        let response = self.send(|| self.client.get(&url)).await?;
        let body = self.read_body("GET", path, response).await?;
        Self::decode(path, &body)
    }

    /// Make a POST request
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, InfobloxError> {
        let url = self.build_url(path);
        let payload = serde_json::to_value(body)?;
        debug!("POST {} with body: {}", url, payload);

        let response = self.send(|| self.client.post(&url).json(&payload)).await?;
        let text = self.read_body("POST", path, response).await?;
        Self::decode(path, &text)
    }

    /// Make a PUT request
    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, InfobloxError> {
        let url = self.build_url(path);
        let payload = serde_json::to_value(body)?;
        debug!("PUT {} with body: {}", url, payload);

        let response = self.send(|| self.client.put(&url).json(&payload)).await?;
        let text = self.read_body("PUT", path, response).await?;
        Self::decode(path, &text)
    }

    /// Make a DELETE request; WAPI answers with the deleted reference
    pub async fn delete(&self, reference: &ObjectRef) -> Result<ObjectRef, InfobloxError> {
        let url = self.build_url(reference.as_str());
        debug!("DELETE {}", url);

        let response = self.send(|| self.client.delete(&url)).await?;
        let body = self.read_body("DELETE", reference.as_str(), response).await?;
        Self::decode(reference.as_str(), &body)
    }

    /// GET a lightweight endpoint to prove credentials and reachability
    pub async fn ping(&self) -> Result<(), InfobloxError> {
        let url = self.build_url("grid");
        debug!("Validating WAPI credentials against {}", url);

        let response = self.send(|| self.client.get(&url)).await?;
        self.read_body("GET", "grid", response).await.map(|_| ())
    }
}

/// Map a non-2xx WAPI response onto the client error taxonomy
pub fn classify_failure(status: StatusCode, context: &str, body: &str) -> InfobloxError {
    let parsed: Option<WapiErrorBody> = serde_json::from_str(body).ok();
    let message = parsed
        .as_ref()
        .map_or(body, |wapi| wapi.message())
        .to_string();
    let not_found = status == StatusCode::NOT_FOUND
        || parsed.as_ref().is_some_and(|wapi| wapi.error.contains(NOT_FOUND_MARKER))
        || body.contains(NOT_FOUND_MARKER);

    if not_found {
        InfobloxError::NotFound(format!("{} - {}", context, message))
    } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        InfobloxError::Authentication(format!("{} failed: {} - {}", context, status, message))
    } else {
        InfobloxError::Api(format!("{} failed: {} - {}", context, status, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http() -> HttpClient {
        HttpClient::new(Client::new(), "https://gm:443/wapi/v2.5/".to_string(), "admin".to_string(), "secret".to_string(), 0)
    }

    #[test]
    fn test_build_url() {
        let http = http();
        assert_eq!(http.base_url(), "https://gm:443/wapi/v2.5");
        assert_eq!(http.build_url("network"), "https://gm:443/wapi/v2.5/network");
        assert_eq!(
            http.build_url("network/ZG5z:10.0.0.0/24/default"),
            "https://gm:443/wapi/v2.5/network/ZG5z:10.0.0.0/24/default"
        );
        assert_eq!(http.build_url("https://other/x"), "https://other/x");
    }

    #[test]
    fn test_classify_not_found_by_status() {
        let err = classify_failure(StatusCode::NOT_FOUND, "GET network/abc", "");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_classify_not_found_by_wapi_marker() {
        let body = r#"{"Error": "AdmConDataNotFoundError: Reference network/abc not found", "code": "Client.Ibap.Data.NotFound", "text": "Reference network/abc not found"}"#;
        let err = classify_failure(StatusCode::BAD_REQUEST, "GET network/abc", body);
        assert!(err.is_not_found());
        assert!(err.to_string().contains("Reference network/abc not found"));
    }

    #[test]
    fn test_classify_authentication() {
        let err = classify_failure(StatusCode::UNAUTHORIZED, "GET grid", "Authorization Required");
        assert!(matches!(err, InfobloxError::Authentication(_)));
    }

    #[test]
    fn test_classify_conflict_is_api_error() {
        let body = r#"{"Error": "AdmConDataError: None (IBDataConflictError: IB.Data.Conflict:The network 10.10.0.0/24 already exists.)", "code": "Client.Ibap.Data.Conflict", "text": "The network 10.10.0.0/24 already exists."}"#;
        let err = classify_failure(StatusCode::BAD_REQUEST, "POST network", body);
        match err {
            InfobloxError::Api(msg) => assert!(msg.contains("already exists")),
            other => panic!("expected Api error, got {:?}", other),
        }
    }
}
